//! Per-window district timelines: Set-state propagation and new-alert flags.

use crate::category::{Phase, Vulnerability, WindowKey};
use crate::date_item::DateItem;
use crate::error::Result;
use crate::event::{parse_events, without_superseded_ready, AAEventRow, RawForecastRow};
use crate::validity::{expand_validity_at, ValidityConfig};
use aa_utils::dates::today;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Timeline rows per district for one forecast window.
pub type DistrictTimelines = BTreeMap<String, Vec<AAEventRow>>;

/// AA forecasts are published per dekad and stay valid for three dekads.
pub fn aa_validity() -> ValidityConfig {
    ValidityConfig::dekad(3, 0)
}

/// First and last publish date seen in a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Derived data for one forecast window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowData {
    pub window_key: WindowKey,
    pub data: DistrictTimelines,
    pub available_dates: Vec<DateItem>,
    pub range: Option<WindowRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredDistrict {
    pub name: String,
    pub vulnerability: Option<Vulnerability>,
}

/// Everything derived from one load of raw forecast rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AAParseResult {
    pub window_data: Vec<WindowData>,
    pub monitored_districts: Vec<MonitoredDistrict>,
}

/// Timeline order: most recent first, most severe first within a date.
pub fn timeline_order(a: &AAEventRow, b: &AAEventRow) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.severity().cmp(&a.severity()))
}

/// Parse raw rows and build every window's timelines, using today's date
/// for the validity cutoff. See [`parse_and_transform_at`].
pub fn parse_and_transform(rows: &[RawForecastRow]) -> Result<AAParseResult> {
    parse_and_transform_at(rows, today())
}

/// Parse raw rows and build, for every window, the per-district timeline,
/// the selectable dates and the window's date range.
pub fn parse_and_transform_at(rows: &[RawForecastRow], today: NaiveDate) -> Result<AAParseResult> {
    let events = parse_events(rows);
    let district_names = monitored_district_names(rows);

    let window_data = WindowKey::ALL
        .iter()
        .map(|window| build_window(*window, &events, &district_names, today))
        .collect::<Result<Vec<WindowData>>>()?;

    let monitored_districts = district_names
        .iter()
        .map(|name| MonitoredDistrict {
            name: name.clone(),
            vulnerability: window_data
                .iter()
                .filter_map(|window| window.data.get(name))
                .flatten()
                .next()
                .and_then(|row| row.vulnerability),
        })
        .collect();

    info!(
        "Derived AA timelines: {} rows, {} events, {} districts",
        rows.len(),
        events.len(),
        district_names.len()
    );
    Ok(AAParseResult {
        window_data,
        monitored_districts,
    })
}

/// Distinct district names in first-seen order, including districts whose
/// rows carry no forecast yet.
fn monitored_district_names(rows: &[RawForecastRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.district_name())
        .filter(|name| seen.insert(*name))
        .map(String::from)
        .collect()
}

fn build_window(
    window: WindowKey,
    events: &[AAEventRow],
    district_names: &[String],
    today: NaiveDate,
) -> Result<WindowData> {
    let in_window: Vec<&AAEventRow> = events
        .iter()
        .filter(|event| event.window == window)
        .collect();
    let window_dates: Vec<NaiveDate> = in_window
        .iter()
        .map(|event| event.date)
        .collect::<BTreeSet<NaiveDate>>()
        .into_iter()
        .collect();
    let available_dates = expand_validity_at(&window_dates, &aa_validity(), today)?;

    let mut grouped: BTreeMap<&str, Vec<&AAEventRow>> = BTreeMap::new();
    for event in in_window {
        grouped.entry(event.district.as_str()).or_default().push(event);
    }

    let mut data: DistrictTimelines = district_names
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();
    for (district, district_events) in grouped {
        data.insert(district.to_string(), district_timeline(district_events, &window_dates));
    }

    let range = window_dates
        .first()
        .zip(window_dates.last())
        .map(|(start, end)| WindowRange {
            start: *start,
            end: *end,
        });

    Ok(WindowData {
        window_key: window,
        data,
        available_dates,
        range,
    })
}

/// Running state of the scan over a district's window dates.
#[derive(Debug, Default)]
struct DistrictScan {
    timeline: Vec<AAEventRow>,
    /// Every valid Set seen so far; each is repeated on all later dates.
    set_elements_to_propagate: Vec<AAEventRow>,
    /// Most severe valid event of the current season.
    prev_max: Option<AAEventRow>,
}

impl DistrictScan {
    /// Advance the scan by one window date. `events` are the district's
    /// genuine events on `date`, least severe first.
    fn step(self, date: NaiveDate, events: &[&AAEventRow]) -> Self {
        let DistrictScan {
            mut timeline,
            mut set_elements_to_propagate,
            mut prev_max,
        } = self;

        let propagated: Vec<AAEventRow> = set_elements_to_propagate
            .iter()
            .map(|row| row.propagated_to(date))
            .collect();

        let mut genuine = Vec::with_capacity(events.len());
        for event in events {
            if prev_max.as_ref().is_some_and(|max| max.season != event.season) {
                prev_max = None;
            }
            if !event.is_valid {
                genuine.push((*event).clone());
                continue;
            }
            if event.phase == Phase::Set {
                set_elements_to_propagate.push((*event).clone());
            }
            let is_new = prev_max
                .as_ref()
                .map_or(true, |max| event.severity() > max.severity());
            let row = (*event).clone().with_new(is_new);
            if is_new {
                prev_max = Some(row.clone());
            }
            genuine.push(row);
        }

        timeline.extend(genuine);
        timeline.extend(propagated);
        DistrictScan {
            timeline,
            set_elements_to_propagate,
            prev_max,
        }
    }
}

fn district_timeline(mut events: Vec<&AAEventRow>, window_dates: &[NaiveDate]) -> Vec<AAEventRow> {
    events.sort_by(|a, b| timeline_order(b, a));
    let scan = window_dates
        .iter()
        .fold(DistrictScan::default(), |scan, date| {
            let on_date: Vec<&AAEventRow> = events
                .iter()
                .copied()
                .filter(|event| event.date == *date)
                .collect();
            scan.step(*date, &without_superseded_ready(&on_date))
        });
    let mut timeline = scan.timeline;
    timeline.sort_by(timeline_order);
    timeline
}
