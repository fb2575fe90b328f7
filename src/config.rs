//! Game tuning values.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Scrap;

/// Errors raised when a [`Config`] cannot back a running engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("craft duration must be at least one second")]
    ZeroDuration,
    #[error("craft duration of {0}s is out of range")]
    DurationOutOfRange(u64),
}

/// Immutable tunables, fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Scrap minted per whole elapsed second.
    pub accrual_rate: Scrap,
    /// One-time cost of unlocking component crafting.
    pub unlock_cost: Scrap,
    /// Cost charged when a craft starts, refunded in full on cancel.
    pub craft_cost: Scrap,
    pub craft_duration_secs: u64,
}

impl Config {
    /// Check the config can be used to build an engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.craft_duration().map(|_| ())
    }

    /// Craft duration as a signed time delta.
    pub fn craft_duration(&self) -> Result<Duration, ConfigError> {
        if self.craft_duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        i64::try_from(self.craft_duration_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(ConfigError::DurationOutOfRange(self.craft_duration_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accrual_rate: Scrap::new(1),
            unlock_cost: Scrap::new(10),
            craft_cost: Scrap::new(10),
            craft_duration_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = Config::default();
        assert_eq!(config.accrual_rate, Scrap::new(1));
        assert_eq!(config.unlock_cost, Scrap::new(10));
        assert_eq!(config.craft_cost, Scrap::new(10));
        assert_eq!(config.craft_duration_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn craft_duration_in_seconds() {
        let config = Config::default();
        assert_eq!(config.craft_duration(), Ok(Duration::seconds(10)));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let config = Config {
            craft_duration_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDuration));
    }

    #[test]
    fn huge_duration_is_rejected() {
        let config = Config {
            craft_duration_secs: u64::MAX,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DurationOutOfRange(u64::MAX))
        );
    }
}
