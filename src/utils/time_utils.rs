use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
}

/// Calendar day (UTC) a millisecond timestamp falls on.
pub fn day_of(epoch_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(epoch_ms).map(|dt| dt.date_naive())
}

/// Format a millisecond timestamp with a chrono format string.
/// Invalid timestamps format as an empty string.
pub fn epoch_ms_to_utc_with(epoch_ms: i64, format: &str) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(format).to_string(),
        None => String::new(),
    }
}

pub fn epoch_ms_to_utc(epoch_ms: i64) -> String {
    // Used for display purposes
    epoch_ms_to_utc_with(epoch_ms, TimeUtils::STANDARD_TIME_FORMAT)
}

/// Parse a user supplied date bound.
///
/// Accepts a bare year ("2024", January 1st), epoch milliseconds
/// ("1714953600000"), RFC 3339 ("2024-05-06T00:00:00Z"), "YYYY-MM-DD HH:MM:SS"
/// and plain "YYYY-MM-DD" (midnight UTC). Anything else yields `None`.
pub fn parse_date_input(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = text.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc());
    }
    if let Ok(ms) = text.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, TimeUtils::STANDARD_TIME_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Step back a whole number of months from `from`.
pub fn months_before(from: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    from.checked_sub_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_supported_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|n| n.and_utc())
            .unwrap();

        assert_eq!(parse_date_input("2024-01-01"), Some(expected));
        assert_eq!(parse_date_input("2024-01-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_date_input("2024-01-01 00:00:00"), Some(expected));
        assert_eq!(
            parse_date_input(&expected.timestamp_millis().to_string()),
            Some(expected)
        );
    }

    #[test]
    fn four_digits_are_a_year_not_milliseconds() {
        assert_eq!(parse_date_input("2024"), parse_date_input("2024-01-01"));
        assert_eq!(
            parse_date_input("20240").map(|d| d.timestamp_millis()),
            Some(20240)
        );
    }

    #[test]
    fn rejects_garbage_and_empty_input() {
        assert_eq!(parse_date_input(""), None);
        assert_eq!(parse_date_input("   "), None);
        assert_eq!(parse_date_input("not a date"), None);
        assert_eq!(parse_date_input("2024-13-40"), None);
    }

    #[test]
    fn day_of_ignores_time_of_day() {
        let morning = parse_date_input("2024-03-05T01:00:00Z").unwrap();
        let evening = parse_date_input("2024-03-05T23:30:00Z").unwrap();
        assert_eq!(
            day_of(morning.timestamp_millis()),
            day_of(evening.timestamp_millis())
        );
        assert_eq!(epoch_ms_to_utc(evening.timestamp_millis()), "2024-03-05");
    }
}
