//! Engine configuration read from JSON.

use crate::error::Result;
use crate::propagation::aa_validity;
use crate::season::StartMonthSeason;
use crate::validity::ValidityConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEASON_START_MONTH: u32 = 5;

/// Country-level settings. Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// First month (1-based) of the forecast season.
    pub season_start_month: u32,
    /// Validity applied when expanding publish dates.
    pub validity: ValidityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            season_start_month: DEFAULT_SEASON_START_MONTH,
            validity: aa_validity(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn season_calculator(&self) -> Result<StartMonthSeason> {
        StartMonthSeason::new(self.season_start_month)
    }
}
