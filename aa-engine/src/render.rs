//! Selection of the state each district shows for the current filters.

use crate::category::{Category, Phase, WindowKey};
use crate::event::AAEventRow;
use crate::propagation::{timeline_order, DistrictTimelines, WindowRange};
use crate::season::SeasonCalculator;
use crate::severity::rank;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User-facing filters of the AA panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AAFilters {
    pub selected_date: Option<NaiveDate>,
    /// `None` shows both windows combined.
    pub selected_window: Option<WindowKey>,
    /// `None` keeps every forecast index.
    pub selected_index: Option<String>,
    pub categories: BTreeMap<Category, bool>,
}

impl Default for AAFilters {
    fn default() -> Self {
        AAFilters {
            selected_date: None,
            selected_window: None,
            selected_index: None,
            categories: Category::ALL
                .into_iter()
                .filter(|c| !matches!(c, Category::Ny | Category::Na))
                .map(|c| (c, true))
                .collect(),
        }
    }
}

impl AAFilters {
    pub fn at(date: NaiveDate) -> Self {
        AAFilters {
            selected_date: Some(date),
            ..AAFilters::default()
        }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.categories.get(&category).copied().unwrap_or(false)
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDistrictState {
    pub category: Category,
    pub phase: Phase,
    pub is_new: bool,
}

impl RenderedDistrictState {
    pub const NOT_YET_MONITORED: RenderedDistrictState = RenderedDistrictState {
        category: Category::Ny,
        phase: Phase::Ny,
        is_new: false,
    };

    pub const NOT_ACTIVE: RenderedDistrictState = RenderedDistrictState {
        category: Category::Na,
        phase: Phase::Na,
        is_new: false,
    };

    pub fn severity(&self) -> usize {
        rank(self.category, self.phase)
    }
}

/// Rendered states per district, most severe first; never empty.
pub type RenderedDistricts = BTreeMap<String, Vec<RenderedDistrictState>>;

/// Compute the displayed state of every district in every window.
///
/// The selected date is clamped to the end of each window's range, so the
/// last forecast of a window stays visible after the window closes. When no
/// row sits exactly on the effective date, the latest valid Set of the
/// season at or before it is shown instead.
pub fn select_rendered_districts<S>(
    filters: &AAFilters,
    data: &BTreeMap<WindowKey, DistrictTimelines>,
    window_ranges: &BTreeMap<WindowKey, Option<WindowRange>>,
    season: &S,
) -> BTreeMap<WindowKey, RenderedDistricts>
where
    S: SeasonCalculator + ?Sized,
{
    data.iter()
        .map(|(window, districts)| {
            let range = window_ranges.get(window).copied().flatten();
            let rendered = districts
                .iter()
                .map(|(district, rows)| {
                    (district.clone(), render_district(filters, rows, range, season))
                })
                .collect();
            (*window, rendered)
        })
        .collect()
}

fn render_district<S>(
    filters: &AAFilters,
    rows: &[AAEventRow],
    range: Option<WindowRange>,
    season: &S,
) -> Vec<RenderedDistrictState>
where
    S: SeasonCalculator + ?Sized,
{
    let Some(selected_date) = filters.selected_date else {
        return vec![RenderedDistrictState::NOT_YET_MONITORED];
    };
    let season = season.season_for(selected_date);
    let in_season: Vec<&AAEventRow> = rows.iter().filter(|row| row.season == season).collect();
    if !in_season.iter().any(|row| row.date <= selected_date) {
        return vec![RenderedDistrictState::NOT_YET_MONITORED];
    }

    let date = match range {
        Some(range) if selected_date >= range.end => range.end,
        _ => selected_date,
    };

    let mut shown: Vec<AAEventRow> = in_season
        .iter()
        .filter(|row| row.date == date)
        .map(|row| (*row).clone())
        .collect();
    if shown.is_empty() {
        shown = in_season
            .iter()
            .copied()
            .filter(|row| row.date <= date && row.is_valid_set())
            .min_by(|a, b| timeline_order(a, b))
            .map(|row| row.clone().with_computed_row(true))
            .into_iter()
            .collect();
    }

    shown.retain(|row| (row.computed_row || row.is_valid) && filters.is_enabled(row.category));
    if shown.is_empty() {
        return vec![RenderedDistrictState::NOT_ACTIVE];
    }

    shown.sort_by(|a, b| b.severity().cmp(&a.severity()));
    shown
        .iter()
        .map(|row| RenderedDistrictState {
            category: row.category,
            phase: row.phase,
            is_new: row.new && !row.computed_row,
        })
        .collect()
}

/// Merge both windows for the combined view: per district, the more severe
/// of the two top states, Window 1 on ties.
pub fn combine_windows(
    rendered: &BTreeMap<WindowKey, RenderedDistricts>,
) -> BTreeMap<String, RenderedDistrictState> {
    let (Some(first), Some(second)) = (
        rendered.get(&WindowKey::Window1),
        rendered.get(&WindowKey::Window2),
    ) else {
        return BTreeMap::new();
    };
    first
        .iter()
        .filter_map(|(district, states)| {
            let one = states.first()?;
            let two = second.get(district)?.first()?;
            let top = if one.severity() >= two.severity() { one } else { two };
            Some((district.clone(), *top))
        })
        .collect()
}

/// Top state per district for the selected window, or both windows
/// combined when no window is selected.
pub fn displayed_districts(
    rendered: &BTreeMap<WindowKey, RenderedDistricts>,
    selected_window: Option<WindowKey>,
) -> BTreeMap<String, RenderedDistrictState> {
    match selected_window {
        None => combine_windows(rendered),
        Some(window) => rendered
            .get(&window)
            .map(|districts| {
                districts
                    .iter()
                    .filter_map(|(district, states)| Some((district.clone(), *states.first()?)))
                    .collect()
            })
            .unwrap_or_default(),
    }
}
