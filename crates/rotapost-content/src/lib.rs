//! `rotapost-content` — the static content catalog and the persisted cycle clock.
//!
//! The catalog maps `(content type, day index)` to a message body; the clock
//! owns the single `current_day` state variable that drives the rotation.

pub mod catalog;
pub mod clock;
pub mod db;
pub mod error;

pub use catalog::Catalog;
pub use clock::CycleClock;
pub use error::{ContentError, Result};
