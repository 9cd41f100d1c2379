//! Shared utility functions for the AA timeline crates.

/// Date utility functions
pub mod dates {
    use chrono::{Local, Months, NaiveDate};

    /// Format used by forecast CSVs and rendered output: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)?)
    }

    /// Parse a date string in "YYYYMMDD" format
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y%m%d")?)
    }

    /// Parse a calendar day from the shapes forecast exports use:
    /// "YYYY-MM-DD", "YYYYMMDD", or an ISO timestamp whose time part is ignored.
    pub fn parse_calendar_day(s: &str) -> anyhow::Result<NaiveDate> {
        let trimmed = s.trim();
        let day_part = trimmed
            .split(['T', ' '])
            .next()
            .unwrap_or(trimmed);
        if day_part.contains('-') {
            parse_date(day_part)
        } else {
            parse_date_compact(day_part)
        }
    }

    /// Today's date in local time.
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// The date `years` years before `date`, clamped to the end of the month
    /// when the day does not exist (Feb 29).
    pub fn years_before(date: &NaiveDate, years: u32) -> NaiveDate {
        date.checked_sub_months(Months::new(years * 12))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the given month.
    pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = first.checked_add_months(Months::new(1))?;
        next.pred_opt()
    }

    /// Two-digit tail of a year, e.g. 2024 -> "24".
    pub fn short_year(year: i32) -> String {
        format!("{:02}", year.rem_euclid(100))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }

        #[test]
        fn test_parse_calendar_day_shapes() {
            let expected = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
            assert_eq!(parse_calendar_day("2024-02-01").unwrap(), expected);
            assert_eq!(parse_calendar_day("20240201").unwrap(), expected);
            assert_eq!(
                parse_calendar_day("2024-02-01T12:00:00.000Z").unwrap(),
                expected
            );
            assert!(parse_calendar_day("").is_err());
            assert!(parse_calendar_day("not a date").is_err());
        }

        #[test]
        fn test_years_before_leap_day() {
            let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
            assert_eq!(
                years_before(&leap, 5),
                NaiveDate::from_ymd_opt(2019, 2, 28).unwrap()
            );
        }

        #[test]
        fn test_last_day_of_month() {
            assert_eq!(
                last_day_of_month(2024, 2),
                NaiveDate::from_ymd_opt(2024, 2, 29)
            );
            assert_eq!(
                last_day_of_month(2023, 12),
                NaiveDate::from_ymd_opt(2023, 12, 31)
            );
        }

        #[test]
        fn test_short_year() {
            assert_eq!(short_year(2024), "24");
            assert_eq!(short_year(2000), "00");
        }
    }
}
