//! Validity expansion: sparse canonical publish dates to a dense, per-day
//! calendar of [`DateItem`]s.

use crate::date_item::DateItem;
use crate::error::{EngineError, Result};
use crate::season::{season_bounds, SeasonBounds};
use aa_utils::dates::{today, years_before};
use chrono::{Datelike, Days, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};

/// Dates older than this many years get no validity window.
pub const OLD_DATA_CUTOFF_YEARS: u32 = 5;

/// How a canonical date's validity window is derived.
///
/// `Forward` and `Backward` belong to the older per-layer propagation scheme
/// and are rejected by the expander.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidityMode {
    Days,
    Dekad,
    Season,
    Forward,
    Backward,
}

/// Validity configuration supplied with a layer.
///
/// `forward`/`backward` count days in `Days` mode and dekads in `Dekad` mode.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ValidityConfig {
    pub mode: ValidityMode,
    #[serde(default)]
    pub forward: Option<u32>,
    #[serde(default)]
    pub backward: Option<u32>,
    #[serde(default)]
    pub seasons: Option<Vec<SeasonBounds>>,
}

impl ValidityConfig {
    pub fn days(forward: u32, backward: u32) -> Self {
        ValidityConfig {
            mode: ValidityMode::Days,
            forward: Some(forward),
            backward: Some(backward),
            seasons: None,
        }
    }

    pub fn dekad(forward: u32, backward: u32) -> Self {
        ValidityConfig {
            mode: ValidityMode::Dekad,
            forward: Some(forward),
            backward: Some(backward),
            seasons: None,
        }
    }

    pub fn season(seasons: Option<Vec<SeasonBounds>>) -> Self {
        ValidityConfig {
            mode: ValidityMode::Season,
            forward: None,
            backward: None,
            seasons,
        }
    }

    fn forward(&self) -> u32 {
        self.forward.unwrap_or(0)
    }

    fn backward(&self) -> u32 {
        self.backward.unwrap_or(0)
    }
}

/// The inclusive window a canonical date is valid over.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
struct ValidityWindow {
    query_date: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
}

/// Expand canonical dates against today's date. See [`expand_validity_at`].
pub fn expand_validity(dates: &[NaiveDate], config: &ValidityConfig) -> Result<Vec<DateItem>> {
    expand_validity_at(dates, config, today())
}

/// Expand canonical publish dates into one [`DateItem`] per valid day.
///
/// Windows of different canonical dates may overlap; they are not merged.
/// The result is stably sorted by display date, so on a shared day the item
/// of the earlier canonical date comes first.
pub fn expand_validity_at(
    dates: &[NaiveDate],
    config: &ValidityConfig,
    today: NaiveDate,
) -> Result<Vec<DateItem>> {
    if matches!(config.mode, ValidityMode::Forward | ValidityMode::Backward) {
        return Err(EngineError::UnsupportedMode(config.mode));
    }
    let cutoff = years_before(&today, OLD_DATA_CUTOFF_YEARS);

    let mut items: Vec<DateItem> = Vec::new();
    for date in dates {
        if *date < cutoff {
            items.push(DateItem::self_mapped(*date));
            continue;
        }
        match validity_window(date, config)? {
            Some(window) => items.extend(DateItem::expand_window(
                window.query_date,
                window.start,
                window.end,
            )),
            None => warn!("No season contains {date}; skipping its validity window"),
        }
    }
    items.sort_by_key(|item| item.display_date);
    Ok(items)
}

fn validity_window(date: &NaiveDate, config: &ValidityConfig) -> Result<Option<ValidityWindow>> {
    let out_of_range = || EngineError::OutOfRange(*date);
    match config.mode {
        ValidityMode::Days => {
            let start = date
                .checked_sub_days(Days::new(config.backward().into()))
                .ok_or_else(out_of_range)?;
            let end = date
                .checked_add_days(Days::new(config.forward().into()))
                .ok_or_else(out_of_range)?;
            Ok(Some(ValidityWindow {
                query_date: *date,
                start,
                end,
            }))
        }
        ValidityMode::Dekad => {
            let anchor = dekad_index(date)?;
            let start = shift_dekad(date, anchor, -i64::from(config.backward()))
                .ok_or_else(out_of_range)?;
            let end = if config.forward() > 0 {
                shift_dekad(date, anchor, i64::from(config.forward()))
                    .and_then(|next| next.pred_opt())
                    .ok_or_else(out_of_range)?
            } else {
                *date
            };
            Ok(Some(ValidityWindow {
                query_date: *date,
                start,
                end,
            }))
        }
        ValidityMode::Season => Ok(season_bounds(date, config.seasons.as_deref()).map(
            |(start, end)| ValidityWindow {
                query_date: start,
                start,
                end,
            },
        )),
        ValidityMode::Forward | ValidityMode::Backward => {
            Err(EngineError::UnsupportedMode(config.mode))
        }
    }
}

/// Position of a dekad anchor within its month: day 1 -> 0, 11 -> 1, 21 -> 2.
fn dekad_index(date: &NaiveDate) -> Result<i64> {
    match date.day() {
        1 => Ok(0),
        11 => Ok(1),
        21 => Ok(2),
        _ => Err(EngineError::MisalignedDekad(*date)),
    }
}

/// The dekad anchor `by` dekads away, carrying month and year rollover.
fn shift_dekad(date: &NaiveDate, anchor: i64, by: i64) -> Option<NaiveDate> {
    let months = i64::from(date.year()) * 12 + i64::from(date.month0());
    let absolute = months * 3 + anchor + by;
    let months = absolute.div_euclid(3);
    let anchor = absolute.rem_euclid(3);
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12)).ok()? + 1;
    let day = u32::try_from(anchor).ok()? * 10 + 1;
    NaiveDate::from_ymd_opt(year, month, day)
}
