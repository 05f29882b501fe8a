use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use rotapost_core::RotapostError;

use crate::app::AppState;
use crate::http::ApiError;

const RECENT_LIMIT: u32 = 10;

/// GET /stats — cumulative counters, current rotation day, recent history.
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    let stats = state
        .ledger
        .stats()
        .map_err(|e| RotapostError::Database(e.to_string()))?;
    let recent = state
        .ledger
        .recent(RECENT_LIMIT)
        .map_err(|e| RotapostError::Database(e.to_string()))?;
    let day = state
        .clock
        .current_day()
        .map_err(crate::deliver::content_error)?;

    Ok(Json(json!({
        "posts_sent": stats.posts_sent,
        "last_activity": stats.last_activity,
        "current_day": day,
        "cycle_length": state.clock.cycle_length(),
        "recent": recent,
    })))
}
