use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use rotapost_core::RotapostError;

use crate::app::AppState;
use crate::deliver::content_error;
use crate::http::ApiError;

/// POST /advance-day — manual rotation advance; returns the new day.
pub async fn advance_day(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let day = state.clock.advance().map_err(content_error)?;
    Ok(Json(json!({ "ok": true, "day": day })))
}

#[derive(Debug, Deserialize)]
pub struct SetDayRequest {
    pub day: u32,
}

/// POST /day — explicit day override, validated against the cycle length.
pub async fn set_day(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetDayRequest>,
) -> Result<Json<Value>, ApiError> {
    state.clock.set_day(req.day).map_err(content_error)?;
    Ok(Json(json!({ "ok": true, "day": req.day })))
}

/// POST /clear-logs — destructive: wipes history and zeroes `posts_sent`.
pub async fn clear_logs(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state
        .ledger
        .clear()
        .map_err(|e| RotapostError::Database(e.to_string()))?;
    Ok(Json(json!({ "ok": true, "message": "delivery history cleared" })))
}
