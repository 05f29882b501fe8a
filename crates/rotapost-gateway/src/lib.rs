//! `rotapost-gateway` — service binary: wires the clock, catalog, scheduler,
//! publisher and ledger together and exposes the JSON management API.

pub mod app;
pub mod deliver;
pub mod http;

use std::net::SocketAddr;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{info, warn};

use rotapost_content::{Catalog, CycleClock};
use rotapost_core::RotapostConfig;
use rotapost_ledger::DeliveryLedger;
use rotapost_scheduler::{default_schedule, Scheduler};
use rotapost_telegram::Publisher;

/// Full service startup: config, storage, subsystems, background tasks, HTTP.
pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rotapost_gateway=info,tower_http=debug".into()),
        )
        .init();

    let config_path = std::env::var("ROTAPOST_CONFIG").ok();
    let config = RotapostConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("config load failed ({e}), using defaults");
        RotapostConfig::default()
    });

    let server_tz = config.server_tz()?;
    let target_tz = config.target_tz()?;
    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");
    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    rotapost_content::db::init_db(&db)?;
    rotapost_ledger::db::init_db(&db)?;
    drop(db);

    // Build subsystems — each gets its own connection for thread safety.
    let today = chrono::Utc::now().with_timezone(&target_tz).date_naive();
    let clock = CycleClock::new(
        rusqlite::Connection::open(db_path)?,
        config.rotation.cycle_length,
        today,
    )?;
    let ledger = DeliveryLedger::new(rusqlite::Connection::open(db_path)?)?;
    let catalog = Catalog::new(config.rotation.days_per_week);

    // Fired-trigger channel: Scheduler -> delivery router task. The shared
    // in-flight set is how the engine coalesces overlapping fires.
    let (fired_tx, fired_rx) = tokio::sync::mpsc::channel(64);
    let in_flight = Arc::new(DashMap::new());
    let scheduler = Scheduler::new(
        target_tz,
        config.schedule.grace_secs,
        fired_tx,
        Arc::clone(&in_flight),
    );
    let schedule = default_schedule();
    for spec in &schedule {
        scheduler.register(spec.clone());
    }

    let publisher = if config.telegram_configured() {
        let telegram = &config.telegram;
        Some(Publisher::new(
            &telegram.api_base,
            telegram.bot_token.as_deref().unwrap_or_default(),
            telegram.channel_id.as_deref().unwrap_or_default(),
        )?)
    } else {
        warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHANNEL_ID not set — publisher inactive");
        None
    };
    let active = publisher.is_some();

    let state = Arc::new(app::AppState {
        config,
        server_tz,
        target_tz,
        catalog,
        clock,
        ledger,
        scheduler,
        schedule,
        publisher,
    });

    let state_for_router = Arc::clone(&state);
    tokio::spawn(async move {
        deliver::run_delivery_router(state_for_router, fired_rx, in_flight).await;
    });

    // Credentials absent: keep serving the management API so the operator can
    // see what is wrong, but never start firing triggers.
    if active {
        state.scheduler.start();
        if let Some(ref publisher) = state.publisher {
            match publisher.check_channel().await {
                Ok(title) => info!(channel = %title, "channel access confirmed"),
                Err(e) => warn!("channel access check failed: {e}"),
            }
        }
    }

    let router = app::build_router(Arc::clone(&state));
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    info!("rotapost gateway listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    state.scheduler.stop();
    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
