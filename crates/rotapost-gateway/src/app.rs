use axum::{
    routing::{get, post},
    Router,
};
use chrono_tz::Tz;
use std::sync::Arc;

use rotapost_content::{Catalog, CycleClock};
use rotapost_core::RotapostConfig;
use rotapost_ledger::DeliveryLedger;
use rotapost_scheduler::{Scheduler, TriggerSpec};
use rotapost_telegram::Publisher;

/// Central shared state — passed as `Arc<AppState>` to all axum handlers and
/// the delivery router task. Built once at startup, no hidden globals.
pub struct AppState {
    pub config: RotapostConfig,
    pub server_tz: Tz,
    pub target_tz: Tz,
    pub catalog: Catalog,
    pub clock: CycleClock,
    pub ledger: DeliveryLedger,
    pub scheduler: Scheduler,
    /// The static posting schedule the triggers were registered from; kept
    /// for the `/triggers` listing (target-time plus translated server time).
    pub schedule: Vec<TriggerSpec>,
    /// `None` when credentials are missing — the core stays inactive.
    pub publisher: Option<Publisher>,
}

/// Assemble the full axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/config", get(crate::http::config::config_handler))
        .route("/stats", get(crate::http::stats::stats_handler))
        .route("/triggers", get(crate::http::scheduler::list_triggers))
        .route("/scheduler/start", post(crate::http::scheduler::start))
        .route("/scheduler/stop", post(crate::http::scheduler::stop))
        .route("/send-manual", post(crate::http::manual::send_manual))
        .route("/advance-day", post(crate::http::admin::advance_day))
        .route("/day", post(crate::http::admin::set_day))
        .route("/clear-logs", post(crate::http::admin::clear_logs))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
