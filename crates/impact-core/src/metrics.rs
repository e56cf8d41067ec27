//! Derived read-only metrics for the record under the cursor.
//!
//! Everything here is a pure function of the series and cursor. Nothing is
//! cached; the series is small enough that recomputing on every cursor
//! move is free.

use std::fmt;

use impact_types::{Achievements, ImpactSeries, ScoreCategory, Scores, YearRecord};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Label shown while no record is available.
pub const PENDING_YEAR_LABEL: &str = "...";

/// Label shown when there is no distinct next year to advance to.
pub const RESTART_LABEL: &str = "Start Over";

/// The year currently displayed, or a placeholder when there is no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum YearLabel {
    /// A concrete year.
    Year(i32),
    /// No record is loaded.
    Pending,
}

impl YearLabel {
    /// The year, if concrete.
    pub const fn year(self) -> Option<i32> {
        match self {
            Self::Year(year) => Some(year),
            Self::Pending => None,
        }
    }
}

impl fmt::Display for YearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Pending => f.write_str(PENDING_YEAR_LABEL),
        }
    }
}

/// The year an advance would move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NextYearLabel {
    /// The following record's year.
    Year(i32),
    /// The series has zero or one entries, so advancing cannot show a
    /// different year.
    StartOver,
}

impl NextYearLabel {
    /// The year, if concrete.
    pub const fn year(self) -> Option<i32> {
        match self {
            Self::Year(year) => Some(year),
            Self::StartOver => None,
        }
    }
}

impl fmt::Display for NextYearLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::StartOver => f.write_str(RESTART_LABEL),
        }
    }
}

/// Record under the cursor, or `None` for an empty series.
pub fn current_record(series: &ImpactSeries, cursor: usize) -> Option<&YearRecord> {
    series.get(cursor)
}

/// Label for the year under the cursor.
pub fn current_year(series: &ImpactSeries, cursor: usize) -> YearLabel {
    current_record(series, cursor).map_or(YearLabel::Pending, |r| YearLabel::Year(r.year))
}

/// Label for the year that follows the cursor, wrapping at the end.
pub fn next_year(series: &ImpactSeries, cursor: usize) -> NextYearLabel {
    if series.len() <= 1 {
        return NextYearLabel::StartOver;
    }
    let next = cursor.saturating_add(1).checked_rem(series.len()).unwrap_or(0);
    series
        .get(next)
        .map_or(NextYearLabel::StartOver, |r| NextYearLabel::Year(r.year))
}

/// Scores of the current record, all zero when there is none.
pub fn current_scores(record: Option<&YearRecord>) -> Scores {
    record.map(|r| r.scores).unwrap_or_default()
}

/// Score for one category, 0 when there is no record.
pub fn score_for(record: Option<&YearRecord>, category: ScoreCategory) -> f64 {
    current_scores(record).get(category)
}

/// Achievement counters, all zero when there is no record.
pub fn achievements(record: Option<&YearRecord>) -> Achievements {
    record.map(|r| r.achievements).unwrap_or_default()
}

/// Rounded mean of the strictly positive scores.
///
/// Scores `<= 0` are left out of both the sum and the count, so a year
/// scored `(60, 0, 90)` has a composite of 75, not 50. When no score is
/// positive the composite is 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn composite_score(scores: &Scores) -> u32 {
    let (sum, count) = scores
        .as_array()
        .into_iter()
        .filter(|s| *s > 0.0)
        .fold((0.0_f64, 0_u32), |(sum, count), s| {
            (sum + s, count.saturating_add(1))
        });
    if count == 0 {
        return 0;
    }
    // Positive mean: `as` saturates and cannot go negative.
    (sum / f64::from(count)).round() as u32
}
