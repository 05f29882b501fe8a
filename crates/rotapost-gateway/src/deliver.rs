//! Delivery pipeline: resolve the day and body, publish, record the outcome.
//!
//! Scheduled fires (from the engine, via mpsc) and manual sends (from the
//! HTTP layer) both converge on [`deliver`], so every attempt goes through
//! the same publisher and the same ledger write.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use rotapost_content::ContentError;
use rotapost_core::types::{ContentType, FiredTrigger, Outcome, TriggerAction, TriggerKind};
use rotapost_core::RotapostError;
use rotapost_telegram::PublishError;

use crate::app::AppState;

pub(crate) fn content_error(e: ContentError) -> RotapostError {
    match e {
        ContentError::NotFound { content_type, day } => {
            RotapostError::ContentNotFound { content_type, day }
        }
        ContentError::OutOfRange { day, cycle_length } => {
            RotapostError::OutOfRange { day, cycle_length }
        }
        ContentError::Database(e) => RotapostError::Database(e.to_string()),
        ContentError::ZeroCycleLength => RotapostError::Config(e.to_string()),
    }
}

fn publish_error(e: PublishError) -> RotapostError {
    match e {
        PublishError::Transport(d) => RotapostError::Transport(d),
        PublishError::Api(d) => RotapostError::ApiRejection(d),
    }
}

/// Deliver one message and record the attempt.
///
/// `body_override` (manual custom text) wins over the catalog body. Transport
/// failures get exactly one retry; API rejections are terminal. Every attempt
/// that reaches the publisher leaves a ledger row, and so does a failed
/// catalog lookup — the operator should see both in recent history.
pub async fn deliver(
    state: &AppState,
    content_type: ContentType,
    day: u32,
    kind: TriggerKind,
    body_override: Option<&str>,
) -> Result<String, RotapostError> {
    let publisher = state.publisher.as_ref().ok_or_else(|| {
        RotapostError::ConfigMissing("telegram credentials not configured".to_string())
    })?;

    let body = match body_override {
        Some(text) => text.to_string(),
        None => match state.catalog.lookup(content_type, day) {
            Ok(body) => body.to_string(),
            Err(e) => {
                let mapped = content_error(e);
                if let Err(le) =
                    state
                        .ledger
                        .record(content_type, day, kind, Outcome::Failure, &mapped.to_string())
                {
                    error!("ledger write failed: {le}");
                }
                return Err(mapped);
            }
        },
    };

    let mut result = publisher.send(&body).await;
    if let Err(PublishError::Transport(ref detail)) = result {
        warn!(%content_type, %detail, "transport failure, retrying once");
        result = publisher.send(&body).await;
    }

    match result {
        Ok(()) => {
            state
                .ledger
                .record(content_type, day, kind, Outcome::Success, "")
                .map_err(|e| RotapostError::Database(e.to_string()))?;
            Ok(format!("Delivered {content_type} for day {day}"))
        }
        Err(e) => {
            if let Err(le) =
                state
                    .ledger
                    .record(content_type, day, kind, Outcome::Failure, e.detail())
            {
                error!("ledger write failed: {le}");
            }
            Err(publish_error(e))
        }
    }
}

/// Background task consuming fired triggers from the scheduler engine.
///
/// Removes the trigger id from the shared in-flight set only after the
/// delivery fully settles, which is what gives the engine its at-most-one
/// guarantee per trigger id.
pub async fn run_delivery_router(
    state: Arc<AppState>,
    mut fired_rx: mpsc::Receiver<FiredTrigger>,
    in_flight: Arc<DashMap<String, ()>>,
) {
    info!("delivery router started");
    while let Some(fired) = fired_rx.recv().await {
        match fired.action {
            TriggerAction::AdvanceDay => match state.clock.advance() {
                Ok(day) => info!(day, "rotation advanced by schedule"),
                Err(e) => error!("scheduled day advance failed: {e}"),
            },
            TriggerAction::Publish { content_type } => {
                let day = match state.clock.current_day() {
                    Ok(day) => day,
                    Err(e) => {
                        error!("cycle day read failed, delivery skipped: {e}");
                        in_flight.remove(&fired.trigger_id);
                        continue;
                    }
                };
                match deliver(&state, content_type, day, TriggerKind::Scheduled, None).await {
                    Ok(msg) => info!(trigger_id = %fired.trigger_id, "{msg}"),
                    Err(e) => warn!(trigger_id = %fired.trigger_id, "scheduled delivery failed: {e}"),
                }
            }
        }
        in_flight.remove(&fired.trigger_id);
    }
    info!("delivery router stopped");
}
