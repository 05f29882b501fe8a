use rusqlite::Connection;

use crate::error::Result;

/// Initialise the ledger schema in `conn`. Idempotent; seeds the single
/// stats row on first run.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS delivery_log (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at   TEXT    NOT NULL,
            content_type TEXT    NOT NULL,
            day_index    INTEGER NOT NULL,
            trigger_kind TEXT    NOT NULL,   -- scheduled | manual
            outcome      TEXT    NOT NULL,   -- success | failure
            detail       TEXT    NOT NULL DEFAULT ''
        ) STRICT;
        CREATE INDEX IF NOT EXISTS idx_delivery_log_created
            ON delivery_log (created_at DESC);

        CREATE TABLE IF NOT EXISTS delivery_stats (
            id            INTEGER NOT NULL PRIMARY KEY CHECK (id = 1),
            posts_sent    INTEGER NOT NULL DEFAULT 0,
            last_activity TEXT
        ) STRICT;
        INSERT OR IGNORE INTO delivery_stats (id, posts_sent) VALUES (1, 0);
        ",
    )?;
    Ok(())
}
