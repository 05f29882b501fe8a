use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

fn presence(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "set"
    } else {
        "missing"
    }
}

/// GET /config — credential presence and channel reachability. Never echoes
/// secret values, only whether they are set.
pub async fn config_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let channel_status = match &state.publisher {
        Some(publisher) => match publisher.check_channel().await {
            Ok(title) => json!({ "reachable": true, "title": title }),
            Err(e) => json!({ "reachable": false, "detail": e.to_string() }),
        },
        None => json!({ "reachable": false, "detail": "publisher inactive" }),
    };

    Json(json!({
        "bot_token": presence(&state.config.telegram.bot_token),
        "channel_id": presence(&state.config.telegram.channel_id),
        "bot_status": if state.publisher.is_some() { "active" } else { "inactive" },
        "channel": channel_status,
        "server_timezone": state.server_tz.name(),
        "target_timezone": state.target_tz.name(),
    }))
}
