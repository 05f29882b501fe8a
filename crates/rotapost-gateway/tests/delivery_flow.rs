//! End-to-end delivery pipeline tests: clock -> catalog -> publisher -> ledger,
//! with the Bot API mocked.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use rusqlite::Connection;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rotapost_content::{Catalog, CycleClock};
use rotapost_core::types::{ContentType, FiredTrigger, Outcome, TriggerAction, TriggerKind};
use rotapost_core::{RotapostConfig, RotapostError};
use rotapost_gateway::app::AppState;
use rotapost_gateway::deliver::{deliver, run_delivery_router};
use rotapost_ledger::DeliveryLedger;
use rotapost_scheduler::{default_schedule, Scheduler};
use rotapost_telegram::Publisher;

fn build_state(dir: &tempfile::TempDir, publisher: Option<Publisher>) -> Arc<AppState> {
    let db_path = dir.path().join("rotapost.db");
    let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let clock = CycleClock::new(Connection::open(&db_path).unwrap(), 20, today).unwrap();
    let ledger = DeliveryLedger::new(Connection::open(&db_path).unwrap()).unwrap();
    let (fired_tx, _fired_rx) = mpsc::channel(8);
    let scheduler = Scheduler::new(chrono_tz::UTC, 300, fired_tx, Arc::new(DashMap::new()));

    Arc::new(AppState {
        config: RotapostConfig::default(),
        server_tz: chrono_tz::UTC,
        target_tz: chrono_tz::Asia::Novokuznetsk,
        catalog: Catalog::new(5),
        clock,
        ledger,
        scheduler,
        schedule: default_schedule(),
        publisher,
    })
}

async fn mock_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/botTEST:TOKEN/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "result": { "message_id": 1 },
        })))
        .mount(server)
        .await;
}

fn publisher_for(server: &MockServer) -> Publisher {
    Publisher::new(&server.uri(), "TEST:TOKEN", "@channel").unwrap()
}

#[tokio::test]
async fn scheduled_delivery_succeeds_and_is_counted() {
    let server = MockServer::start().await;
    mock_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, Some(publisher_for(&server)));

    // Day 20 wraps back to day 1.
    state.clock.set_day(20).unwrap();
    assert_eq!(state.clock.advance().unwrap(), 1);

    let day = state.clock.current_day().unwrap();
    let msg = deliver(&state, ContentType::DailyRule, day, TriggerKind::Scheduled, None)
        .await
        .unwrap();
    assert!(msg.contains("day 1"));

    let stats = state.ledger.stats().unwrap();
    assert_eq!(stats.posts_sent, 1);
    let recent = state.ledger.recent(10).unwrap();
    assert_eq!(recent[0].outcome, Outcome::Success);
    assert_eq!(recent[0].trigger_kind, TriggerKind::Scheduled);
    assert_eq!(recent[0].day_index, 1);
}

#[tokio::test]
async fn api_rejection_is_recorded_without_counting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": false,
            "description": "chat not found",
        })))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, Some(publisher_for(&server)));

    let err = deliver(&state, ContentType::DailyRule, 3, TriggerKind::Scheduled, None)
        .await
        .unwrap_err();
    assert!(matches!(&err, RotapostError::ApiRejection(d) if d == "chat not found"));

    assert_eq!(state.ledger.stats().unwrap().posts_sent, 0);
    let recent = state.ledger.recent(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].outcome, Outcome::Failure);
    assert_eq!(recent[0].detail, "chat not found");
}

#[tokio::test]
async fn transport_failure_is_classified_and_recorded() {
    // Nothing listens here; both the attempt and its single retry fail.
    let dir = tempfile::tempdir().unwrap();
    let publisher = Publisher::new("http://127.0.0.1:9", "TEST:TOKEN", "@channel").unwrap();
    let state = build_state(&dir, Some(publisher));

    let err = deliver(&state, ContentType::Psychology, 2, TriggerKind::Scheduled, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RotapostError::Transport(_)));
    let recent = state.ledger.recent(10).unwrap();
    assert_eq!(recent[0].outcome, Outcome::Failure);
}

#[tokio::test]
async fn manual_custom_text_overrides_the_catalog() {
    let server = MockServer::start().await;
    mock_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, Some(publisher_for(&server)));

    deliver(
        &state,
        ContentType::DailyRule,
        5,
        TriggerKind::Manual,
        Some("<b>Ad-hoc safety notice</b>"),
    )
    .await
    .unwrap();

    let recent = state.ledger.recent(1).unwrap();
    assert_eq!(recent[0].trigger_kind, TriggerKind::Manual);
    assert_eq!(recent[0].outcome, Outcome::Success);
}

#[tokio::test]
async fn missing_credentials_refuse_delivery_without_a_ledger_row() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, None);

    let err = deliver(&state, ContentType::DailyRule, 1, TriggerKind::Manual, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RotapostError::ConfigMissing(_)));
    assert!(state.ledger.recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn unmapped_day_is_recorded_as_a_failed_attempt() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, Some(publisher_for(&server)));

    let err = deliver(&state, ContentType::DailyRule, 0, TriggerKind::Scheduled, None)
        .await
        .unwrap_err();
    assert!(matches!(err, RotapostError::ContentNotFound { .. }));
    let recent = state.ledger.recent(10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].outcome, Outcome::Failure);
    assert_eq!(state.ledger.stats().unwrap().posts_sent, 0);
}

#[tokio::test]
async fn concurrent_manual_and_scheduled_sends_count_exactly() {
    let server = MockServer::start().await;
    mock_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, Some(publisher_for(&server)));

    let day = state.clock.current_day().unwrap();
    let scheduled = deliver(&state, ContentType::DailyRule, day, TriggerKind::Scheduled, None);
    let manual = deliver(&state, ContentType::DailyRule, day, TriggerKind::Manual, None);
    let (a, b) = tokio::join!(scheduled, manual);
    a.unwrap();
    b.unwrap();

    assert_eq!(state.ledger.stats().unwrap().posts_sent, 2);
    assert_eq!(state.ledger.recent(10).unwrap().len(), 2);
}

#[tokio::test]
async fn router_delivers_fired_triggers_and_releases_in_flight() {
    let server = MockServer::start().await;
    mock_ok(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(&dir, Some(publisher_for(&server)));

    let (tx, rx) = mpsc::channel(8);
    let in_flight: Arc<DashMap<String, ()>> = Arc::new(DashMap::new());
    tokio::spawn(run_delivery_router(Arc::clone(&state), rx, Arc::clone(&in_flight)));

    // What the engine does on a due fire: mark in flight, then forward.
    in_flight.insert("post:daily_rule".to_string(), ());
    tx.send(FiredTrigger {
        trigger_id: "post:daily_rule".to_string(),
        action: TriggerAction::Publish {
            content_type: ContentType::DailyRule,
        },
        fired_at: chrono::Utc::now(),
    })
    .await
    .unwrap();

    // Also exercise the housekeeping action.
    let before = state.clock.current_day().unwrap();
    in_flight.insert("clock:advance".to_string(), ());
    tx.send(FiredTrigger {
        trigger_id: "clock:advance".to_string(),
        action: TriggerAction::AdvanceDay,
        fired_at: chrono::Utc::now(),
    })
    .await
    .unwrap();

    // Wait for the router to settle both deliveries.
    for _ in 0..50 {
        if state.ledger.stats().unwrap().posts_sent == 1 && in_flight.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    assert_eq!(state.ledger.stats().unwrap().posts_sent, 1);
    assert!(in_flight.is_empty(), "router must release in-flight ids");
    assert_eq!(state.clock.current_day().unwrap(), before % 20 + 1);
}
