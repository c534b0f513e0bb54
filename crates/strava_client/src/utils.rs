//! Date/time conversions for query parameters.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Seconds since the Unix epoch, as taken by the `before`/`after` filters.
pub fn seconds_since_epoch(at: Option<DateTime<Utc>>) -> Option<i64> {
    at.map(|dt| dt.timestamp())
}

/// Local date-time in the form the segment effort filters expect,
/// e.g. `2024-05-01T07:30:00Z`.
pub fn format_local(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn seconds_since_epoch_converts_utc() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(seconds_since_epoch(Some(at)), Some(1_704_067_200));
        assert_eq!(seconds_since_epoch(None), None);
    }

    #[test]
    fn format_local_appends_zulu_suffix() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        assert_eq!(format_local(&at), "2024-05-01T07:30:00Z");
    }
}
