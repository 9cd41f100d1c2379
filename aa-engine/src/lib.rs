//! Validity expansion and anticipatory-action (AA) timeline derivation.
//!
//! Raw forecast rows go through [`event::parse_events`], are folded into
//! per-window district timelines by [`propagation::parse_and_transform`] and
//! are looked up for display by [`render::select_rendered_districts`].
//! [`validity::expand_validity`] densifies sparse publish dates into per-day
//! date items for any dated layer.

pub mod category;
pub mod config;
pub mod date_item;
pub mod date_range;
pub mod district_view;
pub mod error;
pub mod event;
pub mod propagation;
pub mod render;
pub mod season;
pub mod severity;
pub mod state;
pub mod validity;

pub use category::{Category, Phase, Vulnerability, WindowKey};
pub use config::EngineConfig;
pub use date_item::{find_date_item, DateItem};
pub use error::{EngineError, Result};
pub use event::{parse_raw_rows_csv, AAEventRow, RawForecastRow};
pub use propagation::{parse_and_transform, AAParseResult, WindowData, WindowRange};
pub use render::{select_rendered_districts, AAFilters, RenderedDistrictState};
pub use season::{SeasonBounds, SeasonCalculator, StartMonthSeason};
pub use state::AaState;
pub use validity::{expand_validity, ValidityConfig, ValidityMode};
