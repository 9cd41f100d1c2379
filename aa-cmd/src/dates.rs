//! `dates` subcommand.

use crate::input::load_config;
use aa_engine::{expand_validity, ValidityMode};
use chrono::NaiveDate;
use log::info;

pub fn run_dates(
    dates: &[NaiveDate],
    mode: Option<ValidityMode>,
    forward: Option<u32>,
    backward: Option<u32>,
    config: Option<&str>,
) -> anyhow::Result<()> {
    let mut validity = load_config(config)?.validity;
    if let Some(mode) = mode {
        validity.mode = mode;
    }
    if forward.is_some() {
        validity.forward = forward;
    }
    if backward.is_some() {
        validity.backward = backward;
    }

    let mut dates = dates.to_vec();
    dates.sort();
    let items = expand_validity(&dates, &validity)?;
    info!("Expanded {} dates into {} days", dates.len(), items.len());
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}
