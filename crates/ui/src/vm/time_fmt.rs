use chrono::{DateTime, Utc};
use interview_core::time::{LOW_TIME_THRESHOLD_SECS, format_countdown};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

/// Countdown text shown next to the question, e.g. `1:05`.
#[must_use]
pub fn format_timer(remaining_secs: u32) -> String {
    format_countdown(remaining_secs)
}

#[must_use]
pub fn is_low_time(remaining_secs: u32) -> bool {
    remaining_secs <= LOW_TIME_THRESHOLD_SECS
}

/// Whole minutes and seconds between two instants, e.g. `12m 04s`.
#[must_use]
pub fn format_duration(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> String {
    let secs = (completed_at - started_at).num_seconds().max(0);
    format!("{}m {:02}s", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use interview_core::time::fixed_now;

    #[test]
    fn timer_pads_seconds() {
        assert_eq!(format_timer(125), "2:05");
        assert_eq!(format_timer(9), "0:09");
    }

    #[test]
    fn low_time_includes_threshold() {
        assert!(is_low_time(30));
        assert!(!is_low_time(31));
    }

    #[test]
    fn duration_never_goes_negative() {
        let now = fixed_now();
        assert_eq!(format_duration(now, now + Duration::seconds(724)), "12m 04s");
        assert_eq!(format_duration(now, now - Duration::seconds(5)), "0m 00s");
    }
}
