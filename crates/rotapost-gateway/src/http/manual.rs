use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use rotapost_core::types::{ContentType, TriggerKind};
use rotapost_core::RotapostError;

use crate::app::AppState;
use crate::deliver::{content_error, deliver};
use crate::http::ApiError;

#[derive(Debug, Deserialize)]
pub struct SendManualRequest {
    pub post_type: String,
    /// Day override; defaults to the live rotation day.
    pub day: Option<u32>,
    /// When present and non-blank, replaces the catalog body.
    pub custom_text: Option<String>,
}

/// POST /send-manual — dashboard-initiated delivery. Enters the pipeline at
/// the same publisher/ledger boundary as scheduled fires and awaits the
/// publisher result so the caller gets an explicit success or failure.
pub async fn send_manual(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendManualRequest>,
) -> Result<Json<Value>, ApiError> {
    let content_type: ContentType =
        req.post_type
            .parse()
            .map_err(|_| RotapostError::ContentNotFound {
                content_type: req.post_type.clone(),
                day: 0,
            })?;

    let day = match req.day {
        Some(day) => {
            let cycle_length = state.clock.cycle_length();
            if day < 1 || day > cycle_length {
                return Err(ApiError(RotapostError::OutOfRange { day, cycle_length }));
            }
            day
        }
        None => state.clock.current_day().map_err(content_error)?,
    };

    let custom = req
        .custom_text
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let message = deliver(&state, content_type, day, TriggerKind::Manual, custom).await?;
    Ok(Json(json!({
        "ok": true,
        "message": message,
        "content_type": content_type,
        "day": day,
    })))
}
