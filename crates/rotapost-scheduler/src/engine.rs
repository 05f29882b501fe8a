use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use dashmap::DashMap;
use rotapost_core::types::FiredTrigger;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::translate::next_fire;
use crate::types::{TriggerInfo, TriggerSpec};

struct TriggerState {
    spec: TriggerSpec,
    next_fire: DateTime<Utc>,
}

struct Inner {
    target_tz: Tz,
    grace: Duration,
    triggers: Mutex<Vec<TriggerState>>,
    fired_tx: mpsc::Sender<FiredTrigger>,
    /// Trigger ids with a delivery currently in flight. Shared with the
    /// delivery router, which removes an id once its delivery finishes.
    in_flight: Arc<DashMap<String, ()>>,
    /// Some while the poll loop is running; the sender stops it.
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

/// Named-trigger scheduler polling at 1 s precision.
///
/// Fired triggers are forwarded over mpsc with `try_send` so the tick loop is
/// never stalled by a slow consumer. Stopping prevents new fires but leaves
/// in-flight deliveries untouched.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    pub fn new(
        target_tz: Tz,
        grace_secs: u64,
        fired_tx: mpsc::Sender<FiredTrigger>,
        in_flight: Arc<DashMap<String, ()>>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                target_tz,
                grace: Duration::seconds(grace_secs as i64),
                triggers: Mutex::new(Vec::new()),
                fired_tx,
                in_flight,
                shutdown: Mutex::new(None),
            }),
        }
    }

    /// Register a trigger, replacing any existing trigger with the same id.
    pub fn register(&self, spec: TriggerSpec) {
        let next = next_fire(spec.at, self.inner.target_tz, Utc::now());
        let mut triggers = self.inner.triggers.lock().unwrap();
        if let Some(existing) = triggers.iter_mut().find(|t| t.spec.id == spec.id) {
            info!(trigger_id = %spec.id, next = %next, "trigger re-registered");
            *existing = TriggerState { spec, next_fire: next };
        } else {
            info!(trigger_id = %spec.id, next = %next, "trigger registered");
            triggers.push(TriggerState { spec, next_fire: next });
        }
    }

    /// Remove a trigger by id. Returns whether anything was removed.
    pub fn unregister(&self, id: &str) -> bool {
        let mut triggers = self.inner.triggers.lock().unwrap();
        let before = triggers.len();
        triggers.retain(|t| t.spec.id != id);
        before != triggers.len()
    }

    pub fn list_triggers(&self) -> Vec<TriggerInfo> {
        let triggers = self.inner.triggers.lock().unwrap();
        triggers
            .iter()
            .map(|t| TriggerInfo {
                id: t.spec.id.clone(),
                name: t.spec.name.clone(),
                next_fire: t.next_fire,
            })
            .collect()
    }

    pub fn is_running(&self) -> bool {
        self.inner.shutdown.lock().unwrap().is_some()
    }

    /// Start the poll loop. Returns `false` (no-op) if already running.
    pub fn start(&self) -> bool {
        let mut shutdown = self.inner.shutdown.lock().unwrap();
        if shutdown.is_some() {
            return false;
        }
        let (tx, rx) = watch::channel(false);
        *shutdown = Some(tx);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { run(inner, rx).await });
        info!("scheduler started");
        true
    }

    /// Stop the poll loop. Returns `false` (no-op) if not running.
    pub fn stop(&self) -> bool {
        let mut shutdown = self.inner.shutdown.lock().unwrap();
        match shutdown.take() {
            Some(tx) => {
                let _ = tx.send(true);
                info!("scheduler stopped");
                true
            }
            None => false,
        }
    }
}

/// Poll loop: ticks every second until shutdown broadcasts `true`.
async fn run(inner: Arc<Inner>, mut shutdown: watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                inner.tick(Utc::now());
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

impl Inner {
    /// Process all triggers whose fire time has arrived.
    fn tick(&self, now: DateTime<Utc>) {
        let mut triggers = self.triggers.lock().unwrap();
        for state in triggers.iter_mut() {
            if now < state.next_fire {
                continue;
            }
            let id = &state.spec.id;
            let late = now - state.next_fire;

            if late > self.grace {
                warn!(
                    trigger_id = %id,
                    scheduled = %state.next_fire,
                    late_secs = late.num_seconds(),
                    "misfire: grace window exceeded, delivery skipped"
                );
            } else if self.in_flight.contains_key(id) {
                warn!(trigger_id = %id, "previous delivery still in flight, fire coalesced");
            } else {
                self.in_flight.insert(id.clone(), ());
                let fired = FiredTrigger {
                    trigger_id: id.clone(),
                    action: state.spec.action,
                    fired_at: now,
                };
                if self.fired_tx.try_send(fired).is_err() {
                    warn!(trigger_id = %id, "delivery channel full or closed, fire dropped");
                    self.in_flight.remove(id);
                } else {
                    info!(trigger_id = %id, late_secs = late.num_seconds(), "trigger fired");
                }
            }

            // Always recompute from the actual current date so DST shifts in
            // either zone are picked up.
            state.next_fire = next_fire(state.spec.at, self.target_tz, now);
        }
    }
}
