use std::fmt;

use serde::{Deserialize, Serialize};

/// A scrap balance or cost. Unsigned, so it can never go negative; additions
/// saturate at `u64::MAX` instead of wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Scrap(u64);

impl Scrap {
    pub const ZERO: Scrap = Scrap(0);

    pub const fn new(value: u64) -> Self {
        Scrap(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Subtract `rhs`, or `None` if the balance cannot cover it.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Scrap)
    }

    /// Scale a per-second rate by a number of whole seconds.
    pub fn saturating_mul(self, factor: u64) -> Self {
        Scrap(self.0.saturating_mul(factor))
    }
}

impl fmt::Display for Scrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Add for Scrap {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Scrap(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Scrap {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
