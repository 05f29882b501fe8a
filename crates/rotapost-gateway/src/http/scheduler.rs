use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use rotapost_core::RotapostError;
use rotapost_scheduler::translate;

use crate::app::AppState;
use crate::http::ApiError;

/// GET /triggers — every registered trigger with its next UTC fire time plus
/// today's translation of the target wall-clock time into the server zone.
pub async fn list_triggers(State(state): State<Arc<AppState>>) -> Json<Value> {
    let today = Utc::now().with_timezone(&state.target_tz).date_naive();
    let triggers: Vec<Value> = state
        .scheduler
        .list_triggers()
        .into_iter()
        .map(|info| {
            let spec = state.schedule.iter().find(|s| s.id == info.id);
            let target_time = spec.map(|s| s.at.format("%H:%M").to_string());
            // The server-zone reading is recomputed for today's date, so it
            // shifts with DST instead of going stale.
            let server_time = spec.and_then(|s| {
                translate(today, s.at, state.target_tz, state.server_tz)
                    .map(|(h, m)| format!("{h:02}:{m:02}"))
            });
            json!({
                "id": info.id,
                "name": info.name,
                "next_fire": info.next_fire.to_rfc3339(),
                "target_time": target_time,
                "server_time": server_time,
            })
        })
        .collect();

    Json(json!({
        "running": state.scheduler.is_running(),
        "triggers": triggers,
    }))
}

/// POST /scheduler/start — idempotent; refused while the publisher is inactive.
pub async fn start(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    if state.publisher.is_none() {
        return Err(ApiError(RotapostError::ConfigMissing(
            "telegram credentials not configured".to_string(),
        )));
    }
    let changed = state.scheduler.start();
    Ok(Json(json!({ "ok": true, "running": true, "changed": changed })))
}

/// POST /scheduler/stop — idempotent. In-flight deliveries finish; new fires stop.
pub async fn stop(State(state): State<Arc<AppState>>) -> Json<Value> {
    let changed = state.scheduler.stop();
    Json(json!({ "ok": true, "running": false, "changed": changed }))
}
