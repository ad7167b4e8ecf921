pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Cli, Command};
pub use config::AppConfig;

pub use adapters::{
    CardDetails, FixedOutcome, MockCardGateway, MockMpesaGateway, NoLatency, RandomOutcome,
    ScriptedOutcome, TokioLatency,
};
pub use core::session::BookingSession;
pub use core::wizard::{Step, WizardEvent, WizardState};
pub use utils::error::{BookingError, Result};
