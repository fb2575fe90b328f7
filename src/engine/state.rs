use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Scrap;

/// An in-progress component craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub started_at: DateTime<Utc>,
    pub finishes_at: DateTime<Utc>,
    /// Scrap charged at start, refunded in full on cancel.
    pub cost: Scrap,
}

impl Job {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.finishes_at
    }
}

/// The mutable game state. Only the engine holds one; callers get
/// [`StateSnapshot`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct State {
    pub balance: Scrap,
    pub items: u64,
    pub unlocked: bool,
    /// Settlement cursor: everything before this instant has been minted.
    pub settled_at: DateTime<Utc>,
    pub job: Option<Job>,
}

impl State {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            balance: Scrap::ZERO,
            items: 0,
            unlocked: false,
            settled_at: start,
            job: None,
        }
    }

    /// An owned copy detached from the engine.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            balance: self.balance,
            items: self.items,
            unlocked: self.unlocked,
            settled_at: self.settled_at,
            job: self.job,
        }
    }
}

/// Independent copy of the game state at the end of a call. Mutating it
/// has no effect on the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub balance: Scrap,
    /// Crafted components.
    pub items: u64,
    pub unlocked: bool,
    pub settled_at: DateTime<Utc>,
    pub job: Option<Job>,
}
