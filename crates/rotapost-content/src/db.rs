use rusqlite::Connection;

use crate::error::Result;

/// Initialise the cycle-clock schema in `conn`. Idempotent.
///
/// A single-row table: the CHECK pins the row id so the state can only ever
/// be UPDATEd, never duplicated.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cycle_state (
            id           INTEGER NOT NULL PRIMARY KEY CHECK (id = 1),
            current_day  INTEGER NOT NULL,
            cycle_length INTEGER NOT NULL,
            updated_at   TEXT    NOT NULL
        ) STRICT;
        ",
    )?;
    Ok(())
}
