//! Raw forecast rows and the typed Ready/Set events derived from them.

use crate::category::{Category, Phase, Vulnerability, WindowKey};
use crate::error::Result;
use crate::severity::rank;
use aa_utils::dates::parse_calendar_day;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Columns of the anticipatory-action forecast export the engine reads.
pub const AA_CSV_KEYS: [&str; 13] = [
    "district",
    "index",
    "category",
    "window",
    "season",
    "type",
    "date_ready",
    "date_set",
    "prob_ready",
    "prob_set",
    "trigger_ready",
    "trigger_set",
    "vulnerability",
];

/// One row of a forecast export, kept as text. Numeric columns are coerced
/// only when events are derived: a column missing from the header is `None`,
/// a blank cell is `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawForecastRow {
    #[serde(deserialize_with = "cell")]
    pub district: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub index: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub category: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub window: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub season: Option<String>,
    #[serde(rename = "type", deserialize_with = "cell")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub date_ready: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub date_set: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub prob_ready: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub prob_set: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub trigger_ready: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub trigger_set: Option<String>,
    #[serde(deserialize_with = "cell")]
    pub vulnerability: Option<String>,
}

/// A cell present in the row, blank or not.
fn cell<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}

impl RawForecastRow {
    /// The district name, when the row has a non-blank one.
    pub fn district_name(&self) -> Option<&str> {
        present(&self.district)
    }
}

/// Parse a headered forecast CSV. Unknown columns are ignored, missing
/// columns become `None` and blank cells stay `Some("")`.
pub fn parse_raw_rows_csv(csv_data: &str) -> Result<Vec<RawForecastRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_data.as_bytes());
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawForecastRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// A single phase of a forecast row for one district, category and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AAEventRow {
    pub category: Category,
    pub district: String,
    pub index: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub window: WindowKey,
    pub season: String,
    pub phase: Phase,
    pub probability: f64,
    pub trigger: f64,
    pub date: NaiveDate,
    pub is_valid: bool,
    pub is_other_phase_valid: bool,
    #[serde(default)]
    pub computed_row: bool,
    pub new: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability: Option<Vulnerability>,
}

impl AAEventRow {
    pub fn severity(&self) -> usize {
        rank(self.category, self.phase)
    }

    pub fn is_valid_set(&self) -> bool {
        self.phase == Phase::Set && self.is_valid
    }

    /// Copy of this row carried forward to `date` as a computed, never-new row.
    pub fn propagated_to(&self, date: NaiveDate) -> Self {
        AAEventRow {
            date,
            computed_row: true,
            new: false,
            ..self.clone()
        }
    }

    pub fn with_new(self, new: bool) -> Self {
        AAEventRow { new, ..self }
    }

    pub fn with_computed_row(self, computed_row: bool) -> Self {
        AAEventRow {
            computed_row,
            ..self
        }
    }

    pub fn with_phase(self, phase: Phase) -> Self {
        AAEventRow { phase, ..self }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Numeric coercion for text cells: absent is NaN, blank is zero,
/// anything unparseable is NaN. NaN never compares greater, so such
/// phases are never valid.
fn coerce_number(value: &Option<String>) -> f64 {
    match value.as_deref().map(str::trim) {
        None => f64::NAN,
        Some("") => 0.0,
        Some(s) => s.parse::<f64>().unwrap_or(f64::NAN),
    }
}

fn parse_day(value: &Option<String>) -> Option<NaiveDate> {
    present(value).and_then(|s| parse_calendar_day(s).ok())
}

/// Derive Ready and Set events from raw rows.
///
/// Rows without `prob_ready` are placeholders and are skipped, as are rows
/// whose district, category or window cannot be read. A phase is emitted
/// only when its probability cell is filled and its date parses. A Set is
/// valid only when the Ready of the same row is valid.
pub fn parse_events(rows: &[RawForecastRow]) -> Vec<AAEventRow> {
    let mut events = Vec::with_capacity(rows.len() * 2);
    for row in rows {
        if present(&row.prob_ready).is_none() {
            continue;
        }
        let Some(district) = row.district_name() else {
            debug!("Skipping forecast row without district: {row:?}");
            continue;
        };
        let Some(category) = present(&row.category).and_then(|c| c.parse::<Category>().ok())
        else {
            debug!("Skipping row for {district}: unknown category {:?}", row.category);
            continue;
        };
        let Some(window) = present(&row.window).and_then(|w| w.parse::<WindowKey>().ok()) else {
            debug!("Skipping row for {district}: unknown window {:?}", row.window);
            continue;
        };

        let prob_ready = coerce_number(&row.prob_ready);
        let trigger_ready = coerce_number(&row.trigger_ready);
        let prob_set = coerce_number(&row.prob_set);
        let trigger_set = coerce_number(&row.trigger_set);
        let is_ready_valid = prob_ready > trigger_ready;
        let is_set_above_trigger = prob_set > trigger_set;

        let common = |phase: Phase, probability: f64, trigger: f64, date: NaiveDate| AAEventRow {
            category,
            district: district.to_string(),
            index: present(&row.index).unwrap_or_default().to_string(),
            kind: present(&row.kind).unwrap_or_default().to_string(),
            window,
            season: present(&row.season).unwrap_or_default().to_string(),
            phase,
            probability,
            trigger,
            date,
            is_valid: false,
            is_other_phase_valid: false,
            computed_row: false,
            new: false,
            vulnerability: present(&row.vulnerability).and_then(|v| v.parse().ok()),
        };

        match parse_day(&row.date_ready) {
            Some(date) => events.push(AAEventRow {
                is_valid: is_ready_valid,
                is_other_phase_valid: is_ready_valid && is_set_above_trigger,
                ..common(Phase::Ready, prob_ready, trigger_ready, date)
            }),
            None => debug!("Ready phase for {district} has no date"),
        }

        if present(&row.prob_set).is_some() {
            match parse_day(&row.date_set) {
                Some(date) => events.push(AAEventRow {
                    is_valid: is_ready_valid && is_set_above_trigger,
                    is_other_phase_valid: is_ready_valid,
                    ..common(Phase::Set, prob_set, trigger_set, date)
                }),
                None => debug!("Set phase for {district} has no date"),
            }
        }
    }
    events
}

/// Drop Ready events whose category has a valid Set among `events`.
///
/// Callers pass the events of one district on one date.
pub fn without_superseded_ready<'a>(events: &[&'a AAEventRow]) -> Vec<&'a AAEventRow> {
    let set_categories: HashSet<Category> = events
        .iter()
        .filter(|event| event.is_valid_set())
        .map(|event| event.category)
        .collect();
    events
        .iter()
        .filter(|event| !(event.phase == Phase::Ready && set_categories.contains(&event.category)))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        prob_ready: &str,
        trigger_ready: &str,
        prob_set: &str,
        trigger_set: &str,
    ) -> RawForecastRow {
        RawForecastRow {
            district: Some(String::from("Chibuto")),
            index: Some(String::from("SPI DJF")),
            category: Some(String::from("Moderate")),
            window: Some(String::from("Window 1")),
            season: Some(String::from("2023-24")),
            kind: Some(String::from("SPI")),
            date_ready: Some(String::from("2023-11-01")),
            date_set: Some(String::from("2023-12-01")),
            prob_ready: Some(String::from(prob_ready)),
            prob_set: Some(String::from(prob_set)),
            trigger_ready: Some(String::from(trigger_ready)),
            trigger_set: Some(String::from(trigger_set)),
            vulnerability: None,
        }
    }

    #[test]
    fn test_set_requires_valid_ready() {
        let events = parse_events(&[raw("5", "3", "2", "4")]);
        assert_eq!(events.len(), 2);
        let ready = &events[0];
        let set = &events[1];
        assert_eq!(ready.phase, Phase::Ready);
        assert!(ready.is_valid);
        assert!(!ready.is_other_phase_valid);
        assert_eq!(set.phase, Phase::Set);
        assert!(!set.is_valid);
        assert!(set.is_other_phase_valid);

        let events = parse_events(&[raw("0.2", "0.3", "0.9", "0.1")]);
        assert!(!events[0].is_valid);
        assert!(!events[1].is_valid, "Set cannot validate without Ready");
        assert!(!events[1].is_other_phase_valid);
    }

    #[test]
    fn test_both_phases_valid() {
        let events = parse_events(&[raw("0.6", "0.5", "0.7", "0.5")]);
        assert!(events.iter().all(|event| event.is_valid && event.is_other_phase_valid));
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
        assert_eq!(events[1].date, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(events[1].probability, 0.7);
        assert_eq!(events[1].trigger, 0.5);
    }

    #[test]
    fn test_rows_without_prob_ready_are_dropped() {
        let mut row = raw("", "0.3", "0.9", "0.1");
        assert!(parse_events(&[row.clone()]).is_empty());
        row.prob_ready = None;
        assert!(parse_events(&[row]).is_empty());
    }

    #[test]
    fn test_set_phase_needs_probability() {
        let mut row = raw("0.6", "0.5", "", "0.5");
        assert_eq!(parse_events(&[row.clone()]).len(), 1);
        row.prob_set = None;
        let events = parse_events(&[row]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, Phase::Ready);
        // absent prob_set coerces to NaN, so the Set side never validates
        assert!(!events[0].is_other_phase_valid);
    }

    #[test]
    fn test_blank_trigger_coerces_to_zero() {
        let events = parse_events(&[raw("0.1", "", "abc", "0.1")]);
        assert!(events[0].is_valid);
        assert!(events[1].probability.is_nan());
        assert!(!events[1].is_valid);
    }

    #[test]
    fn test_malformed_grouping_fields_are_skipped() {
        let mut no_district = raw("0.6", "0.5", "0.7", "0.5");
        no_district.district = Some(String::from("  "));
        let mut bad_category = raw("0.6", "0.5", "0.7", "0.5");
        bad_category.category = Some(String::from("Extreme"));
        let mut bad_window = raw("0.6", "0.5", "0.7", "0.5");
        bad_window.window = Some(String::from("Window 9"));
        let mut no_date = raw("0.6", "0.5", "0.7", "0.5");
        no_date.date_set = None;
        let events = parse_events(&[no_district, bad_category, bad_window, no_date]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, Phase::Ready);
    }

    #[test]
    fn test_supersede_drops_ready_of_same_category() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 1).unwrap();
        let events = parse_events(&[raw("0.6", "0.5", "0.7", "0.5")]);
        let set = events[1].clone();
        let mut ready_same = events[0].clone();
        ready_same.date = date;
        let mut ready_other = ready_same.clone();
        ready_other.category = Category::Severe;

        let kept = without_superseded_ready(&[&ready_same, &set, &ready_other]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].phase, Phase::Set);
        assert_eq!(kept[1].category, Category::Severe);

        let invalid_set = AAEventRow {
            is_valid: false,
            ..set.clone()
        };
        let kept = without_superseded_ready(&[&ready_same, &invalid_set]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_propagated_copy_overrides_only_carry_fields() {
        let events = parse_events(&[raw("0.6", "0.5", "0.7", "0.5")]);
        let original = events[1].clone().with_new(true);
        let later = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let copy = original.propagated_to(later);
        assert_eq!(copy.date, later);
        assert!(copy.computed_row);
        assert!(!copy.new);
        assert_eq!(
            AAEventRow {
                date: original.date,
                computed_row: false,
                new: true,
                ..copy
            },
            original
        );
    }

    #[test]
    fn test_parse_raw_rows_csv() {
        let csv_data = "\
district,index,category,window,season,type,date_ready,date_set,issue_ready,\
prob_ready,prob_set,trigger_ready,trigger_set,state
Chibuto,SPI DJF,Mild,Window 1,2023-24,SPI,2023-11-01,2023-12-01,2023-10-15,0.45,,0.3,0.35,Ready
Guija,SPI DJF,Severe,Window 2,2023-24,SPI,2023-11-01,,2023-10-15,,,0.3,0.35,
";
        let rows = parse_raw_rows_csv(csv_data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].district_name(), Some("Chibuto"));
        assert_eq!(rows[0].prob_ready.as_deref(), Some("0.45"));
        assert_eq!(rows[0].prob_set.as_deref(), Some(""));
        assert_eq!(rows[0].vulnerability, None);
        assert_eq!(rows[1].prob_ready.as_deref(), Some(""));

        let events = parse_events(&rows);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, Category::Mild);
        assert_eq!(events[0].kind, "SPI");
    }

    #[test]
    fn test_blank_csv_triggers_read_as_zero() {
        let csv_data = "\
district,category,window,season,date_ready,date_set,prob_ready,prob_set,trigger_ready,trigger_set
Chibuto,Mild,Window 1,2023-24,2023-11-01,2023-12-01,0.10,0.20,,
";
        let rows = parse_raw_rows_csv(csv_data).unwrap();
        assert_eq!(rows[0].trigger_ready.as_deref(), Some(""));
        assert_eq!(rows[0].trigger_set.as_deref(), Some(""));

        let events = parse_events(&rows);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].phase, Phase::Ready);
        assert_eq!(events[0].trigger, 0.0);
        assert!(events[0].is_valid);
        assert_eq!(events[1].phase, Phase::Set);
        assert_eq!(events[1].trigger, 0.0);
        assert!(events[1].is_valid);
        assert!(events[0].is_other_phase_valid);
    }

    #[test]
    fn test_missing_csv_column_reads_as_absent() {
        let csv_data = "\
district,category,window,season,date_ready,prob_ready,trigger_ready
Chibuto,Mild,Window 1,2023-24,2023-11-01,0.10,0.05
";
        let rows = parse_raw_rows_csv(csv_data).unwrap();
        assert_eq!(rows[0].trigger_set, None);
        assert_eq!(rows[0].prob_set, None);
        let events = parse_events(&rows);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_valid);
        assert!(!events[0].is_other_phase_valid);
    }
}
