//! Season boundaries and the season-label oracle.

use crate::error::{EngineError, Result};
use aa_utils::dates::{last_day_of_month, short_year};
use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A day within the year, read from strings such as `"01-August"`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        MonthDay { month, day }
    }

    fn of(date: &NaiveDate) -> Self {
        MonthDay::new(date.month(), date.day())
    }

    /// This month/day in `year`. A day past the end of the month (29-February
    /// in a common year) resolves to the month's last day.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| last_day_of_month(year, self.month))
    }
}

impl TryFrom<String> for MonthDay {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        let invalid = || EngineError::InvalidSeasonBound(value.clone());
        let (day, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let day = day.trim().parse::<u32>().map_err(|_| invalid())?;
        let month = month.trim().parse::<Month>().map_err(|_| invalid())?;
        let month = month.number_from_month();
        if day == 0 || day > 31 {
            return Err(invalid());
        }
        Ok(MonthDay::new(month, day))
    }
}

impl From<MonthDay> for String {
    fn from(value: MonthDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("?", |m| m.name());
        write!(f, "{:02}-{}", self.day, month)
    }
}

/// A season as a pair of yearly boundaries. When `start` falls after `end`
/// the season spans the new year.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct SeasonBounds {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl SeasonBounds {
    pub const fn new(start: MonthDay, end: MonthDay) -> Self {
        SeasonBounds { start, end }
    }

    fn wraps_year(&self) -> bool {
        self.start > self.end
    }

    /// Concrete start and end dates of the occurrence of this season that
    /// contains `date`, if any.
    pub fn containing(&self, date: &NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let year = date.year();
        let day = MonthDay::of(date);
        let (start_year, end_year) = if !self.wraps_year() {
            (year, year)
        } else if day >= self.start {
            (year, year + 1)
        } else {
            (year - 1, year)
        };
        let start = self.start.in_year(start_year)?;
        let end = self.end.in_year(end_year)?;
        (start <= *date && *date <= end).then_some((start, end))
    }
}

/// Calendar quarters, used when a validity configuration names no seasons.
pub const DEFAULT_SEASONS: [SeasonBounds; 4] = [
    SeasonBounds::new(MonthDay::new(1, 1), MonthDay::new(3, 31)),
    SeasonBounds::new(MonthDay::new(4, 1), MonthDay::new(6, 30)),
    SeasonBounds::new(MonthDay::new(7, 1), MonthDay::new(9, 30)),
    SeasonBounds::new(MonthDay::new(10, 1), MonthDay::new(12, 31)),
];

/// Start and end of the first season in `seasons` (or the default table)
/// that contains `date`.
pub fn season_bounds(
    date: &NaiveDate,
    seasons: Option<&[SeasonBounds]>,
) -> Option<(NaiveDate, NaiveDate)> {
    seasons
        .unwrap_or(&DEFAULT_SEASONS)
        .iter()
        .find_map(|bounds| bounds.containing(date))
}

/// Maps a calendar day to the forecast season label rows carry in their
/// `season` column. Treated as an opaque oracle by the render step.
pub trait SeasonCalculator {
    fn season_for(&self, date: NaiveDate) -> String;
}

impl<F> SeasonCalculator for F
where
    F: Fn(NaiveDate) -> String,
{
    fn season_for(&self, date: NaiveDate) -> String {
        self(date)
    }
}

/// Seasons that open on the first day of a fixed month and run for a year,
/// labelled like `"2024-25"`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct StartMonthSeason {
    start_month: u32,
}

impl StartMonthSeason {
    /// `start_month` is 1-based (January = 1).
    pub fn new(start_month: u32) -> Result<Self> {
        if (1..=12).contains(&start_month) {
            Ok(StartMonthSeason { start_month })
        } else {
            Err(EngineError::InvalidSeasonStartMonth(start_month))
        }
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }
}

impl SeasonCalculator for StartMonthSeason {
    fn season_for(&self, date: NaiveDate) -> String {
        let year = date.year();
        let first_year = if date.month() >= self.start_month {
            year
        } else {
            year - 1
        };
        format!("{}-{}", first_year, short_year(first_year + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_day_parse() {
        let parsed = MonthDay::try_from(String::from("01-August")).unwrap();
        assert_eq!(parsed, MonthDay::new(8, 1));
        let parsed = MonthDay::try_from(String::from("28-Feb")).unwrap();
        assert_eq!(parsed, MonthDay::new(2, 28));
        assert!(MonthDay::try_from(String::from("August")).is_err());
        assert!(MonthDay::try_from(String::from("40-August")).is_err());
        assert!(MonthDay::try_from(String::from("01-Smarch")).is_err());
        assert_eq!(MonthDay::new(8, 1).to_string(), "01-August");
    }

    #[test]
    fn test_default_season_bounds() {
        assert_eq!(
            season_bounds(&ymd(2023, 1, 1), None),
            Some((ymd(2023, 1, 1), ymd(2023, 3, 31)))
        );
        assert_eq!(
            season_bounds(&ymd(2023, 11, 20), None),
            Some((ymd(2023, 10, 1), ymd(2023, 12, 31)))
        );
    }

    #[test]
    fn test_custom_season_spanning_new_year() {
        let seasons: Vec<SeasonBounds> =
            serde_json::from_str(r#"[{"start": "01-August", "end": "28-February"}]"#).unwrap();
        assert_eq!(
            season_bounds(&ymd(2023, 1, 1), Some(&seasons)),
            Some((ymd(2022, 8, 1), ymd(2023, 2, 28)))
        );
        assert_eq!(
            season_bounds(&ymd(2023, 9, 15), Some(&seasons)),
            Some((ymd(2023, 8, 1), ymd(2024, 2, 28)))
        );
        assert_eq!(season_bounds(&ymd(2023, 5, 1), Some(&seasons)), None);
    }

    #[test]
    fn test_leap_day_bound_in_common_year() {
        let seasons = [SeasonBounds::new(MonthDay::new(11, 1), MonthDay::new(2, 29))];
        assert_eq!(
            season_bounds(&ymd(2023, 2, 28), Some(&seasons)),
            Some((ymd(2022, 11, 1), ymd(2023, 2, 28)))
        );
        assert_eq!(
            season_bounds(&ymd(2024, 2, 29), Some(&seasons)),
            Some((ymd(2023, 11, 1), ymd(2024, 2, 29)))
        );
    }

    #[test]
    fn test_start_month_season_labels() {
        let season = StartMonthSeason::new(5).unwrap();
        assert_eq!(season.season_for(ymd(2024, 5, 1)), "2024-25");
        assert_eq!(season.season_for(ymd(2024, 12, 31)), "2024-25");
        assert_eq!(season.season_for(ymd(2025, 4, 30)), "2024-25");
        assert_eq!(season.season_for(ymd(1999, 6, 1)), "1999-00");
        assert!(StartMonthSeason::new(0).is_err());
        assert!(StartMonthSeason::new(13).is_err());
    }

    #[test]
    fn test_closure_is_a_season_calculator() {
        let fixed = |_: NaiveDate| String::from("2023-24");
        assert_eq!(fixed.season_for(ymd(2020, 1, 1)), "2023-24");
    }
}
