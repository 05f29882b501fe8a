//! The persisted rotation clock: a single `current_day` bounded by
//! `cycle_length`, advanced once per day and wrapping back to 1.

use std::sync::Mutex;

use chrono::{Datelike, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::db::init_db;
use crate::error::{ContentError, Result};

/// Thread-safe owner of the `cycle_state` row.
///
/// Wraps a single SQLite connection in a `Mutex`; every read-modify-write of
/// `current_day` happens in one SQL statement under the lock, so concurrent
/// advance/override calls cannot lose updates.
pub struct CycleClock {
    db: Mutex<Connection>,
    cycle_length: u32,
}

impl CycleClock {
    /// Open the clock on `conn`, initialising the schema if needed.
    ///
    /// On the first-ever startup the day is seeded from `today` (the current
    /// date in the audience timezone) so a fresh deployment lands on a day
    /// consistent with the calendar; later startups read the persisted value.
    pub fn new(conn: Connection, cycle_length: u32, today: NaiveDate) -> Result<Self> {
        if cycle_length == 0 {
            return Err(ContentError::ZeroCycleLength);
        }
        init_db(&conn)?;

        let stored: Option<(u32, u32)> = conn
            .query_row(
                "SELECT current_day, cycle_length FROM cycle_state WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let now = Utc::now().to_rfc3339();
        match stored {
            None => {
                let seed = seed_day(today, cycle_length);
                conn.execute(
                    "INSERT INTO cycle_state (id, current_day, cycle_length, updated_at)
                     VALUES (1, ?1, ?2, ?3)",
                    rusqlite::params![seed, cycle_length, now],
                )?;
                info!(day = seed, cycle_length, "cycle state seeded from calendar date");
            }
            Some((day, stored_len)) if stored_len != cycle_length => {
                // Configured length changed since last run — re-wrap the
                // stored day into the new range.
                let clamped = (day - 1) % cycle_length + 1;
                conn.execute(
                    "UPDATE cycle_state SET current_day = ?1, cycle_length = ?2, updated_at = ?3
                     WHERE id = 1",
                    rusqlite::params![clamped, cycle_length, now],
                )?;
                info!(
                    old_day = day,
                    day = clamped,
                    cycle_length,
                    "cycle length changed; day re-wrapped"
                );
            }
            Some((day, _)) => {
                info!(day, cycle_length, "cycle state restored");
            }
        }

        Ok(Self {
            db: Mutex::new(conn),
            cycle_length,
        })
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }

    /// Read the active day index.
    pub fn current_day(&self) -> Result<u32> {
        let db = self.db.lock().unwrap();
        let day = db.query_row(
            "SELECT current_day FROM cycle_state WHERE id = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(day)
    }

    /// Advance to the next day, wrapping `cycle_length` back to 1.
    ///
    /// The wrap arithmetic runs inside the UPDATE itself, so the
    /// read-modify-write is atomic even across processes.
    pub fn advance(&self) -> Result<u32> {
        let db = self.db.lock().unwrap();
        let day: u32 = db.query_row(
            "UPDATE cycle_state
             SET current_day = current_day % cycle_length + 1, updated_at = ?1
             WHERE id = 1
             RETURNING current_day",
            [Utc::now().to_rfc3339()],
            |row| row.get(0),
        )?;
        info!(day, "cycle advanced");
        Ok(day)
    }

    /// Explicit operator override. Fails with `OutOfRange` (state untouched)
    /// when `day` is outside [1, cycle_length].
    pub fn set_day(&self, day: u32) -> Result<()> {
        if day < 1 || day > self.cycle_length {
            return Err(ContentError::OutOfRange {
                day,
                cycle_length: self.cycle_length,
            });
        }
        let db = self.db.lock().unwrap();
        db.execute(
            "UPDATE cycle_state SET current_day = ?1, updated_at = ?2 WHERE id = 1",
            rusqlite::params![day, Utc::now().to_rfc3339()],
        )?;
        info!(day, "cycle day set manually");
        Ok(())
    }
}

/// Deterministic first-run seed: days-since-epoch modulo the cycle length.
fn seed_day(today: NaiveDate, cycle_length: u32) -> u32 {
    (today.num_days_from_ce().rem_euclid(cycle_length as i32)) as u32 + 1
}
