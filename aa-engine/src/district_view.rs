//! Per-district history table: one line per category across the season's
//! forecast dates.

use crate::category::{Category, Phase};
use crate::event::AAEventRow;
use crate::render::AAFilters;
use crate::season::SeasonCalculator;
use aa_utils::dates::today;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictView {
    /// Forecast dates shown as columns, ascending.
    pub dates: Vec<NaiveDate>,
    /// Rows per category, ascending by date.
    pub by_category: BTreeMap<Category, Vec<AAEventRow>>,
}

/// Build the history of one district timeline for the selected season.
///
/// Rows that are not valid are shown with phase `na`. For each date and
/// category only the highest phase is kept, and dates holding nothing but
/// propagated rows are left out.
pub fn district_view<S>(rows: &[AAEventRow], filters: &AAFilters, season: &S) -> DistrictView
where
    S: SeasonCalculator + ?Sized,
{
    let season = season.season_for(filters.selected_date.unwrap_or_else(today));

    let mut by_date: BTreeMap<NaiveDate, Vec<AAEventRow>> = BTreeMap::new();
    rows.iter()
        .filter(|row| {
            filters.is_enabled(row.category)
                && row.season == season
                && filters
                    .selected_index
                    .as_deref()
                    .map_or(true, |index| row.index == index)
        })
        .map(|row| {
            if row.is_valid {
                row.clone()
            } else {
                row.clone().with_phase(Phase::Na)
            }
        })
        .for_each(|row| by_date.entry(row.date).or_default().push(row));

    let mut view = DistrictView {
        dates: Vec::new(),
        by_category: BTreeMap::new(),
    };
    for (date, rows) in by_date {
        if rows.iter().all(|row| row.computed_row) {
            continue;
        }
        let phases_of = |phase: Phase| -> BTreeSet<Category> {
            rows.iter()
                .filter(|row| row.phase == phase)
                .map(|row| row.category)
                .collect()
        };
        let set_categories = phases_of(Phase::Set);
        let ready_categories = phases_of(Phase::Ready);

        let mut kept = false;
        for row in rows.iter().filter(|row| match row.phase {
            Phase::Set => true,
            Phase::Ready => !set_categories.contains(&row.category),
            _ => {
                !set_categories.contains(&row.category) && !ready_categories.contains(&row.category)
            }
        }) {
            kept = true;
            view.by_category
                .entry(row.category)
                .or_default()
                .push(row.clone());
        }
        if kept {
            view.dates.push(date);
        }
    }
    view
}
