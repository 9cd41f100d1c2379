use crate::date_range::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One selectable calendar day and the canonical date that backs it.
///
/// `display_date` is the day shown in a date picker; `query_date` is the
/// publish date (or season start) whose data is authoritative for that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateItem {
    pub display_date: NaiveDate,
    pub query_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_start_date: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_end_date: bool,
}

impl DateItem {
    /// A date that maps onto itself with no validity window.
    pub fn self_mapped(date: NaiveDate) -> Self {
        DateItem {
            display_date: date,
            query_date: date,
            start_date: None,
            end_date: None,
            is_start_date: false,
            is_end_date: false,
        }
    }

    /// Expand `[start, end]` into one item per day, all answered by `query_date`.
    pub fn expand_window(query_date: NaiveDate, start: NaiveDate, end: NaiveDate) -> Vec<DateItem> {
        DateRange(start, end)
            .map(|day| DateItem {
                display_date: day,
                query_date,
                start_date: Some(start),
                end_date: Some(end),
                is_start_date: day == start,
                is_end_date: day == end,
            })
            .collect()
    }
}

/// An explicit start/end pair, as published by layers that carry coverage
/// ranges instead of single dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEndDate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Build per-day items for explicit ranges. Each day is answered by its
/// range's start; only the first and last day carry the start/end flags.
pub fn generate_date_items_range(ranges: &[StartEndDate]) -> Vec<DateItem> {
    ranges
        .iter()
        .flat_map(|range| {
            DateRange(range.start_date, range.end_date).map(move |day| DateItem {
                display_date: day,
                query_date: range.start_date,
                start_date: None,
                end_date: None,
                is_start_date: day == range.start_date,
                is_end_date: day == range.end_date,
            })
        })
        .collect()
}

/// Binary search over a slice sorted ascending by `key`.
///
/// Returns the index of an element whose key equals `target`, or `None`.
pub fn binary_find<T, K, F>(sorted: &[T], target: &K, key: F) -> Option<usize>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let (mut low, mut high) = (0usize, sorted.len());
    while low < high {
        let mid = low + (high - low) / 2;
        match key(&sorted[mid]).cmp(target) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
        }
    }
    None
}

/// First item displayed on `day` in a list sorted by `display_date`.
///
/// Overlapping validity windows produce several items for the same day; the
/// one from the earliest-processed canonical date wins.
pub fn find_date_item(items: &[DateItem], day: NaiveDate) -> Option<&DateItem> {
    let first = items.partition_point(|item| item.display_date < day);
    items.get(first).filter(|item| item.display_date == day)
}
