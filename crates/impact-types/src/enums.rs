//! Enumeration types for the impact dashboard.
//!
//! [`ScoreCategory`] names the three scored dimensions of a year and carries
//! the display metadata used by the ring and line charts. [`View`] is the
//! closed set of pages the dashboard can ask its host to switch to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Score categories
// ---------------------------------------------------------------------------

/// One of the three scored impact dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ScoreCategory {
    /// Community and social outcomes.
    Social,
    /// Income and economic value generated.
    Economic,
    /// Environmental health.
    Ecological,
}

impl ScoreCategory {
    /// All categories in chart order (innermost ring first).
    pub const ALL: [Self; 3] = [Self::Social, Self::Economic, Self::Ecological];

    /// Human-readable chart label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Social => "Social Impact",
            Self::Economic => "Economic Value",
            Self::Ecological => "Ecological Health",
        }
    }

    /// Hex color used for the ring and line series.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Social => "#0EA5E9",
            Self::Economic => "#FACC15",
            Self::Ecological => "#84CC16",
        }
    }

    /// Radius of the concentric ring drawn for this category.
    ///
    /// Rings are nested: social innermost, ecological outermost.
    pub const fn ring_radius(self) -> f64 {
        match self {
            Self::Social => 16.0,
            Self::Economic => 32.0,
            Self::Ecological => 48.0,
        }
    }

    /// Lowercase key, matching the serialized form.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Social => "social",
            Self::Economic => "economic",
            Self::Ecological => "ecological",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A page the host application can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum View {
    /// The yearly impact dashboard.
    #[default]
    Dashboard,
    /// Project background page.
    About,
    /// Detailed metrics page.
    Metrics,
}

impl View {
    /// Lowercase identifier for this view.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::About => "about",
            Self::Metrics => "metrics",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known [`View`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view: {name}")]
pub struct ParseViewError {
    /// The rejected input.
    pub name: String,
}

impl FromStr for View {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dashboard" => Ok(Self::Dashboard),
            "about" => Ok(Self::About),
            "metrics" => Ok(Self::Metrics),
            other => Err(ParseViewError {
                name: other.to_owned(),
            }),
        }
    }
}
