pub mod clock;
pub mod config;
pub mod csv;
pub mod engine;
pub mod model;
pub mod scrap;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError};
pub use engine::{Engine, EngineError, Job, Outcome, StateSnapshot};
pub use model::{Command, CorrelationId, Event, EventId, EventPayload};
pub use scrap::Scrap;
