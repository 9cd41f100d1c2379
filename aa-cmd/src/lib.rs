//! Command implementations for the AA CLI.
//!
//! Subcommands read a forecast export (optionally gzipped), derive the
//! AA timelines and print the result as JSON on stdout.

use aa_engine::{Category, ValidityMode, WindowKey};
use clap::Subcommand;

pub mod dates;
pub mod input;
pub mod render;
pub mod timeline;

#[derive(Subcommand)]
pub enum Command {
    /// Build per-window district timelines from a forecast CSV
    Timeline {
        /// Forecast CSV, gzipped when it ends in `.gz`
        #[arg(short = 'i', long)]
        input: String,

        /// Reference date for the validity cutoff (defaults to today)
        #[arg(long, value_parser = parse_day)]
        today: Option<chrono::NaiveDate>,
    },

    /// Show the state every district displays for a date
    Render {
        /// Forecast CSV, gzipped when it ends in `.gz`
        #[arg(short = 'i', long)]
        input: String,

        /// Selected date (YYYY-MM-DD)
        #[arg(short = 'd', long, value_parser = parse_day)]
        date: chrono::NaiveDate,

        /// Window to show ("Window 1" or "Window 2"); both combined if omitted
        #[arg(short = 'w', long, value_parser = parse_window)]
        window: Option<WindowKey>,

        /// Restrict to these categories (repeatable); all if omitted
        #[arg(short = 'c', long = "category", value_parser = parse_category)]
        categories: Vec<Category>,

        /// Engine configuration JSON; only its season start month is used here
        #[arg(long)]
        config: Option<String>,

        /// First month of the forecast season, overrides the config file
        #[arg(long)]
        season_start_month: Option<u32>,
    },

    /// Expand publish dates into per-day date items
    Dates {
        /// Canonical publish dates (YYYY-MM-DD), repeatable
        #[arg(short = 'd', long = "date", value_parser = parse_day, required = true)]
        dates: Vec<chrono::NaiveDate>,

        /// Validity mode (days, dekad, season), overrides the config file
        #[arg(short = 'm', long, value_parser = parse_mode)]
        mode: Option<ValidityMode>,

        #[arg(long)]
        forward: Option<u32>,

        #[arg(long)]
        backward: Option<u32>,

        /// Engine configuration JSON holding a `validity` section
        #[arg(long)]
        config: Option<String>,
    },
}

fn parse_day(s: &str) -> Result<chrono::NaiveDate, String> {
    aa_utils::dates::parse_calendar_day(s).map_err(|e| e.to_string())
}

fn parse_window(s: &str) -> Result<WindowKey, String> {
    s.parse().map_err(|_| format!("unknown window: {s}"))
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse().map_err(|_| format!("unknown category: {s}"))
}

fn parse_mode(s: &str) -> Result<ValidityMode, String> {
    serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
        .map_err(|_| format!("unknown validity mode: {s}"))
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Timeline { input, today } => timeline::run_timeline(&input, today),
        Command::Render {
            input,
            date,
            window,
            categories,
            config,
            season_start_month,
        } => render::run_render(
            &input,
            render::RenderArgs {
                date,
                window,
                categories,
                config,
                season_start_month,
            },
        ),
        Command::Dates {
            dates,
            mode,
            forward,
            backward,
            config,
        } => dates::run_dates(&dates, mode, forward, backward, config.as_deref()),
    }
}
