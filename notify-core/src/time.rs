use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Coarse relative time, floored to the largest whole unit.
///
/// Units are never singularized: one hour reads "1 hours ago". Timestamps in
/// the future read as "0 sec ago".
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created_at).num_seconds().max(0);

    if secs >= YEAR {
        format!("{} years ago", secs / YEAR)
    } else if secs >= MONTH {
        format!("{} months ago", secs / MONTH)
    } else if secs >= DAY {
        format!("{} days ago", secs / DAY)
    } else if secs >= HOUR {
        format!("{} hours ago", secs / HOUR)
    } else if secs >= MINUTE {
        format!("{} min ago", secs / MINUTE)
    } else {
        format!("{} sec ago", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ago(secs: i64) -> String {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        time_ago(now - Duration::seconds(secs), now)
    }

    #[test]
    fn boundaries() {
        assert_eq!(ago(0), "0 sec ago");
        assert_eq!(ago(59), "59 sec ago");
        assert_eq!(ago(60), "1 min ago");
        assert_eq!(ago(3599), "59 min ago");
        assert_eq!(ago(3600), "1 hours ago");
        assert_eq!(ago(86_399), "23 hours ago");
        assert_eq!(ago(86_400), "1 days ago");
        assert_eq!(ago(29 * 86_400), "29 days ago");
        assert_eq!(ago(30 * 86_400), "1 months ago");
        assert_eq!(ago(364 * 86_400), "12 months ago");
        assert_eq!(ago(365 * 86_400), "1 years ago");
        assert_eq!(ago(800 * 86_400), "2 years ago");
    }

    #[test]
    fn future_timestamps_clamp_to_zero() {
        assert_eq!(ago(-120), "0 sec ago");
    }
}
