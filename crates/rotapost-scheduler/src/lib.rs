//! `rotapost-scheduler` — named recurring triggers driven by a 1 s poll loop.
//!
//! # Overview
//!
//! Triggers are registered in memory at startup from the static posting
//! schedule. The engine polls every second and, when a trigger's `next_fire`
//! has arrived, forwards a [`FiredTrigger`](rotapost_core::FiredTrigger) to
//! the delivery router over mpsc. Fire times are wall-clock times in the
//! audience timezone, re-translated to UTC for every candidate date so the
//! schedule stays correct across DST transitions.
//!
//! # Policies
//!
//! | Situation                                  | Behaviour                |
//! |--------------------------------------------|--------------------------|
//! | Fire within the grace window               | Runs normally            |
//! | Fire later than the grace window (misfire) | Logged, skipped          |
//! | Previous run for the same id still active  | Coalesced, never queued  |

pub mod engine;
pub mod translate;
pub mod types;

pub use engine::Scheduler;
pub use translate::{next_fire, translate};
pub use types::{default_schedule, TriggerInfo, TriggerSpec};
