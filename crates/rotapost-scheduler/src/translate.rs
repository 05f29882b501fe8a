//! Pure timezone translation for trigger times.
//!
//! The original sin this replaces: converting the posting schedule once at
//! startup and baking the result into cron strings, which drifts by an hour
//! at every DST boundary. Here the conversion is re-derived from the actual
//! candidate date on every computation.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Translate a wall-clock time on a concrete date from one zone to another.
///
/// Returns `None` when the local time does not exist on that date in
/// `from_tz` (the spring-forward gap). Ambiguous times (fall-back repeat)
/// resolve to the earlier instant.
pub fn translate(
    date: NaiveDate,
    local_time: NaiveTime,
    from_tz: Tz,
    to_tz: Tz,
) -> Option<(u32, u32)> {
    let instant = from_tz
        .from_local_datetime(&date.and_time(local_time))
        .earliest()?;
    let converted = instant.with_timezone(&to_tz);
    Some((converted.hour(), converted.minute()))
}

/// Next UTC instant strictly after `after` at which the target-zone wall
/// clock reads `local_time`.
///
/// Walks forward day by day from `after`'s date in `target_tz`; a date where
/// the local time falls into a DST gap is skipped. Terminates within three
/// iterations for every real timezone.
pub fn next_fire(local_time: NaiveTime, target_tz: Tz, after: DateTime<Utc>) -> DateTime<Utc> {
    let mut date = after.with_timezone(&target_tz).date_naive();
    for _ in 0..4 {
        if let Some(local) = target_tz
            .from_local_datetime(&date.and_time(local_time))
            .earliest()
        {
            let utc = local.with_timezone(&Utc);
            if utc > after {
                return utc;
            }
        }
        date += Duration::days(1);
    }
    // Unreachable for IANA zones; degrade to a plain daily cadence.
    after + Duration::days(1)
}
