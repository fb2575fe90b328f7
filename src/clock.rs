//! Time source abstraction.
//!
//! The engine never reads the system time directly; it asks its [`Clock`].
//! Tests and script replay use [`FakeClock`] to simulate elapsed time without
//! real delays.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

/// Supplies the current instant. Called from inside the engine lock, so
/// implementations must not block.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and script replay. Clones share the same
/// instant, so a handle kept outside the engine steers the engine's time.
#[derive(Debug, Clone)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Move forward by `duration` and return the new instant. Stops at
    /// `DateTime::MAX_UTC`.
    pub fn advance(&self, duration: Duration) -> DateTime<Utc> {
        let mut current = self.lock();
        *current = current
            .checked_add_signed(duration)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        *current
    }

    /// Jump to `instant`, backwards included. Replay uses this to pin each
    /// step to its scripted offset.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Starts at the UNIX epoch, the replay time base.
impl Default for FakeClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
