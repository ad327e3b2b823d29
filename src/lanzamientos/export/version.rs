use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// ISO year-week tag for `date`, e.g. `2024-W09`.
pub fn week_version(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Uses `explicit` verbatim when given, otherwise the ISO week of `today`.
pub fn resolve_version(explicit: Option<&str>, today: NaiveDate) -> String {
    match explicit {
        Some(tag) => tag.to_string(),
        None => week_version(today),
    }
}

/// Second-precision UTC timestamp with a `Z` suffix.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn week_is_zero_padded() {
        assert_eq!(week_version(date(2024, 2, 28)), "2024-W09");
    }

    #[test]
    fn iso_year_differs_from_calendar_year_at_boundaries() {
        assert_eq!(week_version(date(2021, 1, 1)), "2020-W53");
        assert_eq!(week_version(date(2024, 12, 30)), "2025-W01");
    }

    #[test]
    fn explicit_tag_is_used_verbatim() {
        let today = date(2024, 2, 28);
        assert_eq!(resolve_version(Some("semana 7"), today), "semana 7");
        assert_eq!(resolve_version(None, today), "2024-W09");
    }

    #[test]
    fn timestamp_has_second_precision() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 5, 9).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-01T08:05:09Z");
    }
}
