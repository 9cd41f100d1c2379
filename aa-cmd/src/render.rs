//! `render` subcommand.

use crate::input::{load_config, load_rows};
use aa_engine::render::{displayed_districts, RenderedDistricts};
use aa_engine::{AAFilters, AaState, Category, RenderedDistrictState, SeasonCalculator, WindowKey};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub struct RenderArgs {
    pub date: NaiveDate,
    pub window: Option<WindowKey>,
    pub categories: Vec<Category>,
    pub config: Option<String>,
    pub season_start_month: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderOutput {
    selected_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_window: Option<WindowKey>,
    season: String,
    windows: BTreeMap<WindowKey, RenderedDistricts>,
    displayed: BTreeMap<String, RenderedDistrictState>,
}

/// Restrict filters to `categories`; an empty list keeps the defaults.
pub fn filters_for(
    date: NaiveDate,
    window: Option<WindowKey>,
    categories: &[Category],
) -> AAFilters {
    let mut filters = AAFilters {
        selected_window: window,
        ..AAFilters::at(date)
    };
    if !categories.is_empty() {
        for (category, enabled) in filters.categories.iter_mut() {
            *enabled = categories.contains(category);
        }
    }
    filters
}

pub fn run_render(input: &str, args: RenderArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(month) = args.season_start_month {
        config.season_start_month = month;
    }
    let season = config.season_calculator()?;

    let mut state = AaState::default();
    state.load(&load_rows(input)?)?;

    let filters = filters_for(args.date, args.window, &args.categories);
    let windows = state.rendered_districts(&filters, &season);
    let output = RenderOutput {
        selected_date: args.date,
        selected_window: filters.selected_window,
        season: season.season_for(args.date),
        displayed: displayed_districts(&windows, filters.selected_window),
        windows,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_for() {
        let date = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        let all = filters_for(date, None, &[]);
        assert!(all.is_enabled(Category::Mild));
        assert!(all.is_enabled(Category::Severe));

        let severe = filters_for(date, Some(WindowKey::Window1), &[Category::Severe]);
        assert!(severe.is_enabled(Category::Severe));
        assert!(!severe.is_enabled(Category::Mild));
        assert_eq!(severe.selected_window, Some(WindowKey::Window1));
        assert_eq!(severe.selected_date, Some(date));
    }
}
