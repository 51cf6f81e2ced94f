//! Project progress derived from start and end dates.

use chrono::{DateTime, NaiveDate, Utc};

/// Percentage of the project period elapsed at `now`, rounded to the nearest integer.
pub fn compute_progress(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> u8 {
    if now <= start {
        return 0;
    }
    if now >= end {
        return 100;
    }
    let total = (end - start).num_seconds() as f64;
    let elapsed = (now - start).num_seconds() as f64;
    let pct = (elapsed / total * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Accepts the date formats the backend emits: plain `YYYY-MM-DD` or RFC 3339.
pub fn parse_backend_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(s: &str) -> DateTime<Utc> {
        parse_backend_date(s).unwrap()
    }

    #[test]
    fn halfway_is_fifty_percent() {
        assert_eq!(compute_progress(day("2024-01-06"), day("2024-01-01"), day("2024-01-11")), 50);
    }

    #[test]
    fn boundaries_are_exact() {
        let (start, end) = (day("2024-01-01"), day("2024-01-11"));
        assert_eq!(compute_progress(start, start, end), 0);
        assert_eq!(compute_progress(day("2023-06-01"), start, end), 0);
        assert_eq!(compute_progress(end, start, end), 100);
        assert_eq!(compute_progress(day("2025-01-01"), start, end), 100);
    }

    #[test]
    fn parses_timestamps_and_dates() {
        assert_eq!(day("2024-03-01T12:00:00+00:00"), day("2024-03-01") + chrono::Duration::hours(12));
        assert!(parse_backend_date("").is_none());
        assert!(parse_backend_date("soon").is_none());
    }

    proptest! {
        #[test]
        fn prop_progress_is_bounded_and_monotonic(
            len_days in 1i64..2000,
            a in 0i64..3000,
            b in 0i64..3000,
        ) {
            let start = day("2020-01-01");
            let end = start + chrono::Duration::days(len_days);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p_lo = compute_progress(start + chrono::Duration::hours(lo * 12) - chrono::Duration::days(365), start, end);
            let p_hi = compute_progress(start + chrono::Duration::hours(hi * 12) - chrono::Duration::days(365), start, end);
            prop_assert!(p_lo <= 100 && p_hi <= 100);
            prop_assert!(p_lo <= p_hi);
        }
    }
}
