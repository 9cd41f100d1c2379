use chrono::{Days, NaiveDate};
use std::mem::replace;

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// Number of calendar days in the range, zero when start is after end.
    pub fn day_count(&self) -> usize {
        let days = (self.1 - self.0).num_days() + 1;
        usize::try_from(days).unwrap_or(0)
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let next = self.0 + Days::new(1);
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}
