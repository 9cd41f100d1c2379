/// Error types for the AA engine
use crate::validity::ValidityMode;
use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for validity expansion and timeline derivation
#[derive(Error, Debug)]
pub enum EngineError {
    /// Validity mode the expander cannot compute windows for
    #[error("Unsupported validity mode: {0:?}")]
    UnsupportedMode(ValidityMode),

    /// Dekad-mode date that is not on day 1, 11 or 21
    #[error("Date {0} is not a dekad anchor (day 1, 11 or 21)")]
    MisalignedDekad(NaiveDate),

    /// Validity window that leaves the representable calendar
    #[error("Validity window around {0} is out of range")]
    OutOfRange(NaiveDate),

    /// Season boundary string that cannot be read as "DD-MonthName"
    #[error("Invalid season bound: {0}")]
    InvalidSeasonBound(String),

    /// Season start month outside 1..=12
    #[error("Season start month must be within 1..=12, got {0}")]
    InvalidSeasonStartMonth(u32),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to parse configuration JSON
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Type alias for Results using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
