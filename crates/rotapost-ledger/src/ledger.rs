use std::sync::Mutex;

use chrono::Utc;
use rotapost_core::types::{ContentType, Outcome, TriggerKind};
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::db::init_db;
use crate::error::Result;

/// One stored delivery attempt, newest first in `recent()` output.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryRecord {
    pub id: i64,
    pub created_at: String,
    pub content_type: String,
    pub day_index: u32,
    pub trigger_kind: TriggerKind,
    pub outcome: Outcome,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryStats {
    pub posts_sent: u64,
    pub last_activity: Option<String>,
}

/// Thread-safe owner of `delivery_log` and `delivery_stats`.
///
/// Wraps a single SQLite connection in a `Mutex`; the insert and the counter
/// bump share one transaction, so concurrent scheduled and manual deliveries
/// can never leave `posts_sent` out of step with the log.
pub struct DeliveryLedger {
    db: Mutex<Connection>,
}

impl DeliveryLedger {
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Append one attempt; a success also bumps `posts_sent` and stamps
    /// `last_activity` atomically.
    pub fn record(
        &self,
        content_type: ContentType,
        day_index: u32,
        trigger_kind: TriggerKind,
        outcome: Outcome,
        detail: &str,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let mut db = self.db.lock().unwrap();
        let tx = db.transaction()?;
        tx.execute(
            "INSERT INTO delivery_log
             (created_at, content_type, day_index, trigger_kind, outcome, detail)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                now,
                content_type.to_string(),
                day_index,
                trigger_kind.to_string(),
                outcome.to_string(),
                detail
            ],
        )?;
        if outcome == Outcome::Success {
            tx.execute(
                "UPDATE delivery_stats
                 SET posts_sent = posts_sent + 1, last_activity = ?1
                 WHERE id = 1",
                [&now],
            )?;
        }
        tx.commit()?;
        info!(%content_type, day = day_index, %trigger_kind, %outcome, "delivery recorded");
        Ok(())
    }

    /// The newest `limit` records, most recent first.
    pub fn recent(&self, limit: u32) -> Result<Vec<DeliveryRecord>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT id, created_at, content_type, day_index, trigger_kind, outcome, detail
             FROM delivery_log ORDER BY id DESC LIMIT ?1",
        )?;
        let records = stmt
            .query_map([limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .filter_map(|r| {
                let (id, created_at, content_type, day_index, kind_str, outcome_str, detail) =
                    r.ok()?;
                Some(DeliveryRecord {
                    id,
                    created_at,
                    content_type,
                    day_index,
                    trigger_kind: kind_str.parse().ok()?,
                    outcome: outcome_str.parse().ok()?,
                    detail,
                })
            })
            .collect();
        Ok(records)
    }

    pub fn stats(&self) -> Result<DeliveryStats> {
        let db = self.db.lock().unwrap();
        let stats = db.query_row(
            "SELECT posts_sent, last_activity FROM delivery_stats WHERE id = 1",
            [],
            |row| {
                Ok(DeliveryStats {
                    posts_sent: row.get(0)?,
                    last_activity: row.get(1)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Destructive admin action: drop all history and zero the counter.
    pub fn clear(&self) -> Result<()> {
        let mut db = self.db.lock().unwrap();
        let tx = db.transaction()?;
        tx.execute("DELETE FROM delivery_log", [])?;
        tx.execute(
            "UPDATE delivery_stats SET posts_sent = 0, last_activity = NULL WHERE id = 1",
            [],
        )?;
        tx.commit()?;
        info!("delivery ledger cleared");
        Ok(())
    }
}
