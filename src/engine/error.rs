//! Error types for command execution.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::Scrap;

/// A failed precondition. State is left untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("insufficient scrap: available {available}, required {required}")]
    InsufficientResource { available: Scrap, required: Scrap },

    #[error("component crafting is already unlocked")]
    AlreadyUnlocked,

    #[error("component crafting is locked")]
    FeatureLocked,

    #[error("craft already in progress until {finishes_at}")]
    JobInProgress { finishes_at: DateTime<Utc> },

    #[error("no active craft")]
    NoActiveJob,

    #[error("craft not complete until {finishes_at}")]
    JobNotComplete { finishes_at: DateTime<Utc> },

    #[error("craft started at {started_at} would finish past the last representable time")]
    FinishOutOfRange { started_at: DateTime<Utc> },
}
