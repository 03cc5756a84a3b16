use chrono::{Datelike, Duration, NaiveDate};

/// This is the standard way of converting a date to a string in studylog.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_record_name(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Returns Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Amount of calendar days in `[from, to]`, counting both ends. Zero when `to` is before `from`.
pub fn days_inclusive(from: NaiveDate, to: NaiveDate) -> i64 {
    ((to - from).num_days() + 1).max(0)
}

/// Short label used for the weekly chart, e.g. "Jan 8".
pub fn week_label(week_start: NaiveDate) -> String {
    week_start.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{days_inclusive, parse_record_name, week_label, week_start};

    const WEDNESDAY: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    #[test]
    fn test_week_start_is_monday() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(week_start(WEDNESDAY), monday);
        assert_eq!(week_start(monday), monday);
        assert_eq!(
            week_start(NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()),
            monday
        );
    }

    #[test]
    fn test_days_inclusive() {
        assert_eq!(days_inclusive(WEDNESDAY, WEDNESDAY), 1);
        assert_eq!(
            days_inclusive(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), WEDNESDAY),
            6
        );
        assert_eq!(
            days_inclusive(WEDNESDAY, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            0
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(week_label(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()), "Jan 8");
        assert_eq!(parse_record_name("2024-01-10\n"), Some(WEDNESDAY));
        assert_eq!(parse_record_name("yesterday"), None);
    }
}
