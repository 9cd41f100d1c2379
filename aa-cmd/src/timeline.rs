//! `timeline` subcommand.

use crate::input::load_rows;
use aa_engine::propagation::parse_and_transform_at;
use aa_utils::dates::{format_date, today};
use chrono::NaiveDate;
use log::info;

pub fn run_timeline(input: &str, as_of: Option<NaiveDate>) -> anyhow::Result<()> {
    let rows = load_rows(input)?;
    let as_of = as_of.unwrap_or_else(today);
    info!("Deriving timelines as of {}", format_date(&as_of));
    let result = parse_and_transform_at(&rows, as_of)?;
    for window in &result.window_data {
        info!(
            "{}: {} districts, {} selectable days",
            window.window_key,
            window.data.len(),
            window.available_dates.len()
        );
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
