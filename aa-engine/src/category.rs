use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forecast severity category.
///
/// Variant order is significant: it is the category half of the severity
/// ranking in [`crate::severity`]. `Ny` (not yet monitored) and `Na` (no
/// active trigger) never appear in forecast CSVs; they are display sentinels.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "ny")]
    Ny,
    #[serde(rename = "na")]
    Na,
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Ny,
        Category::Na,
        Category::Normal,
        Category::Mild,
        Category::Moderate,
        Category::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ny => "ny",
            Category::Na => "na",
            Category::Normal => "Normal",
            Category::Mild => "Mild",
            Category::Moderate => "Moderate",
            Category::Severe => "Severe",
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s.trim())
            .ok_or(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation phase. `Ready` is pre-positioning guidance, `Set` is confirmed
/// activation; `Ny`/`Na` mirror the category sentinels.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "ny")]
    Ny,
    #[serde(rename = "na")]
    Na,
    Ready,
    Set,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Ny, Phase::Na, Phase::Ready, Phase::Set];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ny => "ny",
            Phase::Na => "na",
            Phase::Ready => "Ready",
            Phase::Set => "Set",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forecast lead-time bucket over which Ready/Set triggers are evaluated.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Serialize, Deserialize)]
pub enum WindowKey {
    #[serde(rename = "Window 1")]
    Window1,
    #[serde(rename = "Window 2")]
    Window2,
}

impl WindowKey {
    pub const ALL: [WindowKey; 2] = [WindowKey::Window1, WindowKey::Window2];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKey::Window1 => "Window 1",
            WindowKey::Window2 => "Window 2",
        }
    }
}

impl FromStr for WindowKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowKey::ALL
            .into_iter()
            .find(|window| window.as_str() == s.trim())
            .ok_or(())
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// District vulnerability level carried on forecast rows.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Vulnerability {
    #[serde(rename = "General Triggers")]
    GeneralTriggers,
    #[serde(rename = "Emergency Triggers")]
    EmergencyTriggers,
}

impl FromStr for Vulnerability {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "General Triggers" => Ok(Vulnerability::GeneralTriggers),
            "Emergency Triggers" => Ok(Vulnerability::EmergencyTriggers),
            _ => Err(()),
        }
    }
}
