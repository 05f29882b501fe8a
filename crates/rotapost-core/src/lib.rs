//! `rotapost-core` — shared configuration, error taxonomy, and domain types.

pub mod config;
pub mod error;
pub mod types;

pub use config::RotapostConfig;
pub use error::{Result, RotapostError};
pub use types::{ContentType, FiredTrigger, Outcome, TriggerAction, TriggerKind};
