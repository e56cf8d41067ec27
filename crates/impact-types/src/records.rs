//! Yearly impact records and the ordered series the dashboard navigates.
//!
//! Scores are plain floating-point values, conventionally in `[0, 100]` but
//! neither clamped nor validated. Achievement counters are unsigned.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ScoreCategory;

/// The three category scores for one year.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Scores {
    /// Social impact score.
    pub social: f64,
    /// Economic value score.
    pub economic: f64,
    /// Ecological health score.
    pub ecological: f64,
}

impl Scores {
    /// Construct scores from the three category values.
    pub const fn new(social: f64, economic: f64, ecological: f64) -> Self {
        Self {
            social,
            economic,
            ecological,
        }
    }

    /// Return the score for a single category.
    pub const fn get(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::Social => self.social,
            ScoreCategory::Economic => self.economic,
            ScoreCategory::Ecological => self.ecological,
        }
    }

    /// All three scores in [`ScoreCategory::ALL`] order.
    pub const fn as_array(&self) -> [f64; 3] {
        [self.social, self.economic, self.ecological]
    }
}

/// Programmatic achievement counters for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Achievements {
    /// Trees planted.
    pub trees: u64,
    /// Income-generating-activity groups established.
    pub igas: u64,
    /// Cleanups performed.
    pub cleanups: u64,
}

impl Achievements {
    /// Construct a set of counters.
    pub const fn new(trees: u64, igas: u64, cleanups: u64) -> Self {
        Self {
            trees,
            igas,
            cleanups,
        }
    }
}

/// One year's scores and achievement counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct YearRecord {
    /// Calendar year this record describes.
    pub year: i32,
    /// Category scores.
    pub scores: Scores,
    /// Achievement counters.
    pub achievements: Achievements,
}

impl YearRecord {
    /// Construct a record.
    pub const fn new(year: i32, scores: Scores, achievements: Achievements) -> Self {
        Self {
            year,
            scores,
            achievements,
        }
    }
}

/// An ordered sequence of [`YearRecord`]s.
///
/// Insertion order is display order; the years do not have to be sorted.
/// An empty series is a legitimate "no data" state. A series is replaced
/// wholesale, never edited in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ImpactSeries(Vec<YearRecord>);

impl ImpactSeries {
    /// Create an empty series.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series holds no records.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&YearRecord> {
        self.0.get(index)
    }

    /// Iterate over the records in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, YearRecord> {
        self.0.iter()
    }

    /// Years in display order.
    pub fn years(&self) -> Vec<i32> {
        self.0.iter().map(|r| r.year).collect()
    }
}

impl From<Vec<YearRecord>> for ImpactSeries {
    fn from(records: Vec<YearRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<YearRecord> for ImpactSeries {
    fn from_iter<I: IntoIterator<Item = YearRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ImpactSeries {
    type Item = &'a YearRecord;
    type IntoIter = std::slice::Iter<'a, YearRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
