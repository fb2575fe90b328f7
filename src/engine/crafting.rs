//! Crafting transitions over the single job slot.
//!
//! Idle (no job) -> Active (start) -> Idle (claim when due, or cancel at any
//! time). Every transition validates all of its preconditions before touching
//! any field, so a failure leaves the state exactly as it was.

use chrono::{DateTime, Duration, Utc};

use super::error::EngineError;
use super::state::{Job, State};
use crate::Scrap;

/// Unlock component crafting:
/// - Ensure it is not already unlocked
/// - Ensure the balance covers the unlock cost
/// - Charge the cost and set the flag
pub(crate) fn unlock(state: &mut State, cost: Scrap) -> Result<Scrap, EngineError> {
    if state.unlocked {
        return Err(EngineError::AlreadyUnlocked);
    }
    let balance = charge(state.balance, cost)?;

    state.balance = balance;
    state.unlocked = true;
    Ok(cost)
}

/// Start a craft:
/// - Ensure crafting is unlocked
/// - Ensure the job slot is free
/// - Ensure the balance covers the craft cost
/// - Ensure `now + duration` is representable
/// - Charge the cost and occupy the slot until `now + duration`
pub(crate) fn start(
    state: &mut State,
    cost: Scrap,
    duration: Duration,
    now: DateTime<Utc>,
) -> Result<Job, EngineError> {
    if !state.unlocked {
        return Err(EngineError::FeatureLocked);
    }
    if let Some(job) = &state.job {
        return Err(EngineError::JobInProgress {
            finishes_at: job.finishes_at,
        });
    }
    let balance = charge(state.balance, cost)?;
    let finishes_at = now
        .checked_add_signed(duration)
        .ok_or(EngineError::FinishOutOfRange { started_at: now })?;

    let job = Job {
        started_at: now,
        finishes_at,
        cost,
    };

    state.balance = balance;
    state.job = Some(job);
    Ok(job)
}

/// Claim a finished craft:
/// - Ensure a job is active
/// - Ensure it is due
/// - Grant one component and free the slot
pub(crate) fn claim(state: &mut State, now: DateTime<Utc>) -> Result<u64, EngineError> {
    let job = state.job.as_ref().ok_or(EngineError::NoActiveJob)?;
    if !job.is_due(now) {
        return Err(EngineError::JobNotComplete {
            finishes_at: job.finishes_at,
        });
    }

    state.items = state.items.saturating_add(1);
    state.job = None;
    Ok(1)
}

/// Cancel the active craft:
/// - Ensure a job is active
/// - Refund its full cost and free the slot
///
/// A job that is already due is forfeited too: no component is granted.
/// Returns the scrap actually credited, which falls short of the cost only
/// when the balance is capped.
pub(crate) fn cancel(state: &mut State) -> Result<Scrap, EngineError> {
    let job = state.job.take().ok_or(EngineError::NoActiveJob)?;
    let before = state.balance;
    state.balance += job.cost;
    Ok(state.balance.checked_sub(before).unwrap_or(Scrap::ZERO))
}

fn charge(balance: Scrap, cost: Scrap) -> Result<Scrap, EngineError> {
    balance
        .checked_sub(cost)
        .ok_or(EngineError::InsufficientResource {
            available: balance,
            required: cost,
        })
}
