//! Resident derived state, replaced wholesale on every load.

use crate::category::WindowKey;
use crate::date_item::DateItem;
use crate::error::Result;
use crate::event::{parse_raw_rows_csv, RawForecastRow};
use crate::propagation::{
    parse_and_transform_at, AAParseResult, DistrictTimelines, MonitoredDistrict, WindowRange,
};
use crate::render::{select_rendered_districts, AAFilters, RenderedDistricts};
use crate::season::SeasonCalculator;
use aa_utils::dates::today;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AaState {
    data: BTreeMap<WindowKey, DistrictTimelines>,
    available_dates: BTreeMap<WindowKey, Vec<DateItem>>,
    window_ranges: BTreeMap<WindowKey, Option<WindowRange>>,
    monitored_districts: Vec<MonitoredDistrict>,
}

impl From<AAParseResult> for AaState {
    fn from(result: AAParseResult) -> Self {
        let mut state = AaState {
            monitored_districts: result.monitored_districts,
            ..AaState::default()
        };
        for window in result.window_data {
            state.data.insert(window.window_key, window.data);
            state
                .available_dates
                .insert(window.window_key, window.available_dates);
            state.window_ranges.insert(window.window_key, window.range);
        }
        state
    }
}

impl AaState {
    pub fn load(&mut self, rows: &[RawForecastRow]) -> Result<()> {
        self.load_at(rows, today())
    }

    /// Derive a new state from `rows` and swap it in. On error the current
    /// state is left as it was.
    pub fn load_at(&mut self, rows: &[RawForecastRow], today: NaiveDate) -> Result<()> {
        let next = AaState::from(parse_and_transform_at(rows, today)?);
        *self = next;
        Ok(())
    }

    pub fn load_csv(&mut self, csv_data: &str, today: NaiveDate) -> Result<()> {
        let rows = parse_raw_rows_csv(csv_data)?;
        self.load_at(&rows, today)
    }

    pub fn data(&self) -> &BTreeMap<WindowKey, DistrictTimelines> {
        &self.data
    }

    pub fn available_dates(&self, window: WindowKey) -> &[DateItem] {
        self.available_dates
            .get(&window)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn window_ranges(&self) -> &BTreeMap<WindowKey, Option<WindowRange>> {
        &self.window_ranges
    }

    pub fn monitored_districts(&self) -> &[MonitoredDistrict] {
        &self.monitored_districts
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn rendered_districts<S>(
        &self,
        filters: &AAFilters,
        season: &S,
    ) -> BTreeMap<WindowKey, RenderedDistricts>
    where
        S: SeasonCalculator + ?Sized,
    {
        select_rendered_districts(filters, &self.data, &self.window_ranges, season)
    }
}
