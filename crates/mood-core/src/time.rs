//! Lightweight UTC time utilities (no chrono dependency).
//!
//! The engine measures everything in fractional Unix seconds. Scene
//! timestamps are rendered as ISO-8601 with millisecond precision using
//! Howard Hinnant's civil_from_days algorithm.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current UTC time as fractional Unix seconds.
pub fn now_unix_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Convert fractional Unix seconds to an ISO-8601 UTC string with milliseconds.
/// Negative or non-finite inputs clamp to the epoch.
pub fn unix_to_iso8601(secs: f64) -> String {
    let total_ms = if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    };
    let whole = total_ms / 1000;
    let millis = total_ms % 1000;

    let days = (whole / 86400) as i64;
    let time_of_day = whole % 86400;
    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    let (y, m, d) = civil_from_days(days);
    format!("{y:04}-{m:02}-{d:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}

/// Howard Hinnant's civil_from_days: Unix epoch days → (year, month, day).
fn civil_from_days(days: i64) -> (i64, u64, u64) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_epoch() {
        assert_eq!(unix_to_iso8601(0.0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_known_date_with_millis() {
        // 2026-02-21T00:00:00Z = 1771632000
        assert_eq!(
            unix_to_iso8601(1_771_632_000.25),
            "2026-02-21T00:00:00.250Z"
        );
    }

    #[test]
    fn test_negative_clamps_to_epoch() {
        assert_eq!(unix_to_iso8601(-5.0), "1970-01-01T00:00:00.000Z");
        assert_eq!(unix_to_iso8601(f64::NAN), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_now_is_recent() {
        let ts = unix_to_iso8601(now_unix_secs());
        assert!(ts.starts_with("20"), "timestamp should be this century: {ts}");
    }
}
