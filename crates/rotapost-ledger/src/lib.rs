//! `rotapost-ledger` — append-only delivery history plus cumulative counters.
//!
//! Every delivery attempt, scheduled or manual, successful or not, becomes a
//! `delivery_log` row. The single-row `delivery_stats` aggregate is bumped in
//! the same transaction as the insert, so `posts_sent` always equals the
//! number of successful rows exactly.

pub mod db;
pub mod error;
pub mod ledger;

pub use error::{LedgerError, Result};
pub use ledger::{DeliveryLedger, DeliveryRecord, DeliveryStats};
