//! Core domain types for the game engine: the commands it accepts and the
//! events it records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Scrap;

/// Event identifier. Assigned by the engine, starting at 1.
pub type EventId = u64;

/// Caller-supplied identifier propagated to every event a command causes.
pub type CorrelationId = String;

/// A command representing the possible inputs of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Settle and return a snapshot without any other state change.
    SyncState { correlation_id: CorrelationId },
    /// Settle and report the minted amount.
    Settle { correlation_id: CorrelationId },
    /// Pay the one-time technology cost to enable crafting.
    UnlockCrafting { correlation_id: CorrelationId },
    /// Charge the craft cost and occupy the job slot.
    StartCraft { correlation_id: CorrelationId },
    /// Collect the item of a finished job.
    ClaimCraft { correlation_id: CorrelationId },
    /// Abandon the active job for a full refund.
    CancelCraft { correlation_id: CorrelationId },
}

impl Command {
    pub fn correlation_id(&self) -> &str {
        match self {
            Command::SyncState { correlation_id }
            | Command::Settle { correlation_id }
            | Command::UnlockCrafting { correlation_id }
            | Command::StartCraft { correlation_id }
            | Command::ClaimCraft { correlation_id }
            | Command::CancelCraft { correlation_id } => correlation_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::SyncState { .. } => "sync_state",
            Command::Settle { .. } => "settle",
            Command::UnlockCrafting { .. } => "unlock_crafting",
            Command::StartCraft { .. } => "start_craft",
            Command::ClaimCraft { .. } => "claim_craft",
            Command::CancelCraft { .. } => "cancel_craft",
        }
    }
}

/// A recorded fact about a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub at: DateTime<Utc>,
    pub correlation_id: CorrelationId,
    pub payload: EventPayload,
}

/// Typed payload, one variant per event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// Elapsed whole seconds between `from` and `to` were converted to scrap.
    ScrapSettled {
        minted: Scrap,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
    CraftingUnlocked {
        cost: Scrap,
    },
    CraftStarted {
        started_at: DateTime<Utc>,
        finishes_at: DateTime<Utc>,
        cost: Scrap,
    },
    CraftClaimed {
        items_gained: u64,
    },
    CraftCancelled {
        refunded: Scrap,
    },
}

impl EventPayload {
    pub fn name(&self) -> &'static str {
        match self {
            EventPayload::ScrapSettled { .. } => "scrap_settled",
            EventPayload::CraftingUnlocked { .. } => "crafting_unlocked",
            EventPayload::CraftStarted { .. } => "craft_started",
            EventPayload::CraftClaimed { .. } => "craft_claimed",
            EventPayload::CraftCancelled { .. } => "craft_cancelled",
        }
    }

    /// The quantity the event moved: scrap minted, paid or refunded, or
    /// items gained.
    pub fn amount(&self) -> u64 {
        match self {
            EventPayload::ScrapSettled { minted, .. } => minted.get(),
            EventPayload::CraftingUnlocked { cost } | EventPayload::CraftStarted { cost, .. } => {
                cost.get()
            }
            EventPayload::CraftClaimed { items_gained } => *items_gained,
            EventPayload::CraftCancelled { refunded } => refunded.get(),
        }
    }
}
