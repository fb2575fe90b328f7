//! Command processing engine.
//!
//! The engine owns the game state and the event log behind a single lock.
//! Every command first settles elapsed time into scrap, then applies its own
//! transition, records events and returns a snapshot, all without releasing
//! the lock. Also supports async stream of commands.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info};

use crate::Scrap;
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, ConfigError};
use crate::model::{Command, Event, EventId, EventPayload};

mod crafting;
mod event_log;
mod settlement;

mod state;
use event_log::EventLog;
use state::State;
pub use state::{Job, StateSnapshot};

mod error;
pub use error::EngineError;

/// The game engine.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct Engine<C: Clock = SystemClock> {
    config: Config,
    craft_duration: Duration,
    clock: C,
    inner: Mutex<Inner>,
}

struct Inner {
    state: State,
    log: EventLog,
}

/// What a single [`Engine::execute`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// State after the call.
    pub state: StateSnapshot,
    /// Events appended by this call, settlement first.
    pub events: Vec<Event>,
    /// Scrap minted by the settlement step.
    pub minted: Scrap,
    /// Whether the command's own transition was applied. Settlement happens
    /// regardless.
    pub result: Result<(), EngineError>,
}

/// Public API
impl<C: Clock> Engine<C> {
    /// Create an engine with an empty state whose settlement cursor starts at
    /// `start`.
    pub fn new(config: Config, clock: C, start: DateTime<Utc>) -> Result<Self, ConfigError> {
        let craft_duration = config.craft_duration()?;
        Ok(Self {
            config,
            craft_duration,
            clock,
            inner: Mutex::new(Inner {
                state: State::new(start),
                log: EventLog::default(),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return a snapshot of the current state, without settling.
    pub fn state(&self) -> StateSnapshot {
        self.lock().state.snapshot()
    }

    /// Return copies of the events after `since_id`, at most `limit` of them
    /// (`0` for no limit).
    pub fn list_events(&self, since_id: EventId, limit: usize) -> Vec<Event> {
        self.lock().log.since(since_id, limit)
    }

    /// Run the engine with the given command stream
    pub async fn run(&self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            // failures are logged by `execute` and must not stop the engine
            self.execute(command);
        }
    }

    /// Apply a single command on top of the current engine state
    pub fn execute(&self, command: Command) -> Outcome {
        let mut inner = self.lock();
        let Inner { state, log } = &mut *inner;
        let now = self.clock.now();
        let correlation_id = command.correlation_id();

        let mut events = Vec::with_capacity(2);
        let mut minted = Scrap::ZERO;
        let settled = settlement::settle(state, now, self.config.accrual_rate)
            .filter(|settled| !settled.minted.is_zero());
        if let Some(settled) = settled {
            debug!(
                correlation_id,
                minted = %settled.minted,
                from = %settled.from,
                to = %settled.to,
                "scrap settled"
            );
            minted = settled.minted;
            events.push(log.append(
                now,
                correlation_id,
                EventPayload::ScrapSettled {
                    minted: settled.minted,
                    from: settled.from,
                    to: settled.to,
                },
            ));
        }

        let transition = match &command {
            Command::SyncState { .. } | Command::Settle { .. } => Ok(None),
            Command::UnlockCrafting { .. } => crafting::unlock(state, self.config.unlock_cost)
                .map(|cost| Some(EventPayload::CraftingUnlocked { cost })),
            Command::StartCraft { .. } => {
                crafting::start(state, self.config.craft_cost, self.craft_duration, now).map(
                    |job| {
                        Some(EventPayload::CraftStarted {
                            started_at: job.started_at,
                            finishes_at: job.finishes_at,
                            cost: job.cost,
                        })
                    },
                )
            }
            Command::ClaimCraft { .. } => crafting::claim(state, now)
                .map(|items_gained| Some(EventPayload::CraftClaimed { items_gained })),
            Command::CancelCraft { .. } => crafting::cancel(state)
                .map(|refunded| Some(EventPayload::CraftCancelled { refunded })),
        };

        let result = transition.map(|payload| {
            if let Some(payload) = payload {
                events.push(log.append(now, correlation_id, payload));
            }
        });
        Self::log_result(&command, &result);

        Outcome {
            state: state.snapshot(),
            events,
            minted,
            result,
        }
    }

    /// Settle and return the minted scrap.
    pub fn settle(&self) -> Scrap {
        self.execute(Command::Settle {
            correlation_id: "settle".into(),
        })
        .minted
    }

    pub fn unlock_crafting(&self) -> Result<(), EngineError> {
        self.execute(Command::UnlockCrafting {
            correlation_id: "unlock_crafting".into(),
        })
        .result
    }

    pub fn start_craft(&self) -> Result<(), EngineError> {
        self.execute(Command::StartCraft {
            correlation_id: "start_craft".into(),
        })
        .result
    }

    /// Claim a finished craft and return the number of components gained.
    pub fn claim_craft(&self) -> Result<u64, EngineError> {
        let outcome = self.execute(Command::ClaimCraft {
            correlation_id: "claim_craft".into(),
        });
        outcome.result?;
        Ok(outcome
            .events
            .iter()
            .map(|event| match event.payload {
                EventPayload::CraftClaimed { items_gained } => items_gained,
                _ => 0,
            })
            .sum())
    }

    pub fn cancel_craft(&self) -> Result<(), EngineError> {
        self.execute(Command::CancelCraft {
            correlation_id: "cancel_craft".into(),
        })
        .result
    }
}

/// Private API
impl<C: Clock> Engine<C> {
    /// Every mutation validates before writing, so a poisoned lock still
    /// guards a consistent state.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Small helper to log `execute` results
    fn log_result(command: &Command, result: &Result<(), EngineError>) {
        match result {
            Ok(()) => {
                info!(
                    correlation_id = command.correlation_id(),
                    "{} applied",
                    command.name()
                );
            }
            Err(e) => {
                info!(
                    correlation_id = command.correlation_id(),
                    reason = %e,
                    "{} skipped",
                    command.name()
                );
            }
        }
    }
}
