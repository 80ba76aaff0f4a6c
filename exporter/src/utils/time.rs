//! Time utility functions

use chrono::{DateTime, TimeZone, Utc};

/// Convert nanoseconds since Unix epoch to DateTime<Utc>. Zero (unset) is the epoch.
///
/// Every `u64` is representable (the largest lands in 2554), so this never fails.
pub fn nanos_to_datetime(nanos: u64) -> DateTime<Utc> {
    let secs = (nanos / 1_000_000_000) as i64;
    let nsecs = (nanos % 1_000_000_000) as u32;
    Utc.timestamp_opt(secs, nsecs)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Nanoseconds since Unix epoch, as stored in a DateTime64(9) column.
///
/// DateTime64(9) ends at 2262-04-11; later instants clamp to `i64::MAX` and
/// instants before 1677-09-21 clamp to `i64::MIN`.
pub fn datetime_to_nanos(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_nanos_opt()
        .unwrap_or(if dt.timestamp() < 0 { i64::MIN } else { i64::MAX })
}

/// Convert chrono DateTime to time OffsetDateTime
pub fn chrono_to_time(dt: DateTime<Utc>) -> time::OffsetDateTime {
    time::OffsetDateTime::from_unix_timestamp_nanos(datetime_to_nanos(dt) as i128)
        .unwrap_or(time::OffsetDateTime::UNIX_EPOCH)
}
