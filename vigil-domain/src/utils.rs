use chrono::DateTime;
use time::OffsetDateTime;

pub fn current_millis() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as i64 / 1_000_000
}

/// Millisecond timestamp as `YYYY-MM-DD HH:MM:SS` UTC, falling back to the
/// raw number when out of range.
pub fn format_millis(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}
