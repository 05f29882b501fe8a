//! Management API handler tests, called directly with shared state.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use dashmap::DashMap;
use rusqlite::Connection;
use tokio::sync::mpsc;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use rotapost_content::{Catalog, CycleClock};
use rotapost_core::{RotapostConfig, RotapostError};
use rotapost_gateway::app::AppState;
use rotapost_gateway::http::{admin, health, manual, scheduler, stats};
use rotapost_ledger::DeliveryLedger;
use rotapost_scheduler::{default_schedule, Scheduler};
use rotapost_telegram::Publisher;

fn build_state(dir: &tempfile::TempDir, publisher: Option<Publisher>) -> Arc<AppState> {
    let db_path = dir.path().join("rotapost.db");
    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let clock = CycleClock::new(Connection::open(&db_path).unwrap(), 20, today).unwrap();
    let ledger = DeliveryLedger::new(Connection::open(&db_path).unwrap()).unwrap();
    let (fired_tx, _fired_rx) = mpsc::channel(8);
    let sched = Scheduler::new(chrono_tz::UTC, 300, fired_tx, Arc::new(DashMap::new()));
    for spec in default_schedule() {
        sched.register(spec);
    }

    Arc::new(AppState {
        config: RotapostConfig::default(),
        server_tz: chrono_tz::UTC,
        target_tz: chrono_tz::Asia::Novokuznetsk,
        catalog: Catalog::new(5),
        clock,
        ledger,
        scheduler: sched,
        schedule: default_schedule(),
        publisher,
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let Json(body) = health::health_handler().await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn stats_exposes_day_and_counters() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, None);
    state.clock.set_day(7).unwrap();

    let Json(body) = stats::stats_handler(State(state)).await.unwrap();
    assert_eq!(body["current_day"], 7);
    assert_eq!(body["cycle_length"], 20);
    assert_eq!(body["posts_sent"], 0);
    assert!(body["recent"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_post_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, None);

    let err = manual::send_manual(
        State(state),
        Json(serde_json::from_value(serde_json::json!({ "post_type": "weather" })).unwrap()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err.0, RotapostError::ContentNotFound { .. }));
}

#[tokio::test]
async fn out_of_range_day_override_is_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let publisher = Publisher::new(&server.uri(), "TEST:TOKEN", "@channel").unwrap();
    let state = build_state(&dir, Some(publisher));

    let err = manual::send_manual(
        State(Arc::clone(&state)),
        Json(
            serde_json::from_value(
                serde_json::json!({ "post_type": "daily_rule", "day": 21 }),
            )
            .unwrap(),
        ),
    )
    .await
    .unwrap_err();
    assert!(matches!(err.0, RotapostError::OutOfRange { day: 21, cycle_length: 20 }));
    assert!(state.ledger.recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn manual_send_defaults_to_the_live_rotation_day() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let publisher = Publisher::new(&server.uri(), "TEST:TOKEN", "@channel").unwrap();
    let state = build_state(&dir, Some(publisher));
    state.clock.set_day(12).unwrap();

    let Json(body) = manual::send_manual(
        State(Arc::clone(&state)),
        Json(serde_json::from_value(serde_json::json!({ "post_type": "daily_rule" })).unwrap()),
    )
    .await
    .unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["day"], 12);
    assert_eq!(state.ledger.recent(1).unwrap()[0].day_index, 12);
}

#[tokio::test]
async fn set_day_and_advance_endpoints_drive_the_clock() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, None);

    let Json(body) = admin::set_day(
        State(Arc::clone(&state)),
        Json(serde_json::from_value(serde_json::json!({ "day": 20 })).unwrap()),
    )
    .await
    .unwrap();
    assert_eq!(body["day"], 20);

    let Json(body) = admin::advance_day(State(Arc::clone(&state))).await.unwrap();
    assert_eq!(body["day"], 1);

    let err = admin::set_day(
        State(state),
        Json(serde_json::from_value(serde_json::json!({ "day": 0 })).unwrap()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err.0, RotapostError::OutOfRange { .. }));
}

#[tokio::test]
async fn clear_logs_resets_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, None);
    state
        .ledger
        .record(
            rotapost_core::types::ContentType::DailyRule,
            1,
            rotapost_core::types::TriggerKind::Manual,
            rotapost_core::types::Outcome::Success,
            "",
        )
        .unwrap();

    let Json(body) = admin::clear_logs(State(Arc::clone(&state))).await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(state.ledger.stats().unwrap().posts_sent, 0);
}

#[tokio::test]
async fn scheduler_start_is_refused_while_inactive() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, None);

    let err = scheduler::start(State(state)).await.unwrap_err();
    assert!(matches!(err.0, RotapostError::ConfigMissing(_)));
}

#[tokio::test]
async fn trigger_listing_translates_target_times() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, None);

    let Json(body) = scheduler::list_triggers(State(state)).await;
    let triggers = body["triggers"].as_array().unwrap();
    assert_eq!(triggers.len(), 7);

    let daily = triggers
        .iter()
        .find(|t| t["id"] == "post:daily_rule")
        .unwrap();
    assert_eq!(daily["target_time"], "08:30");
    // Novokuznetsk is UTC+7 year-round.
    assert_eq!(daily["server_time"], "01:30");
    assert!(daily["next_fire"].as_str().is_some());
}
