//! Impact data sources.
//!
//! The [`ImpactSource`] trait abstracts where yearly records come from. The
//! loader calls [`fetch`](ImpactSource::fetch) once per attempt after its
//! backoff delay; the source itself does not sleep or retry.
//!
//! - [`MockImpactSource`] -- the built-in five-year record set
//! - [`JsonFileSource`] -- records read from a JSON array on disk
//! - [`FailingSource`] -- failure injection wrapper for exercising retries

use std::path::{Path, PathBuf};

use impact_types::{Achievements, ImpactSeries, Scores, YearRecord};

/// A single fetch attempt failed.
///
/// This is the only error kind the loader deals with. It is always caught
/// and retried, never surfaced to the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source could not be read.
    #[error("failed to read impact data from {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The payload was not a valid record array.
    #[error("failed to decode impact data: {source}")]
    Decode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// A failure raised on purpose by [`FailingSource`].
    #[error("injected failure on attempt {attempt}")]
    Injected {
        /// Zero-based attempt index that failed.
        attempt: u32,
    },
}

/// A source of yearly impact records.
pub trait ImpactSource: Send + Sync {
    /// Fetch the complete series.
    ///
    /// `attempt` is the zero-based attempt index, provided for sources that
    /// want to vary behavior across retries.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when this attempt fails. The loader retries.
    fn fetch(&self, attempt: u32) -> Result<ImpactSeries, FetchError>;
}

impl<S: ImpactSource + ?Sized> ImpactSource for Box<S> {
    fn fetch(&self, attempt: u32) -> Result<ImpactSeries, FetchError> {
        (**self).fetch(attempt)
    }
}

// ---------------------------------------------------------------------------
// Built-in data
// ---------------------------------------------------------------------------

/// The built-in record set, one entry per year from 2021 to 2025.
pub fn mock_series() -> ImpactSeries {
    ImpactSeries::from(vec![
        YearRecord::new(
            2021,
            Scores::new(50.0, 45.0, 58.0),
            Achievements::new(80_000, 8, 50),
        ),
        YearRecord::new(
            2022,
            Scores::new(55.0, 50.0, 65.0),
            Achievements::new(150_000, 12, 85),
        ),
        YearRecord::new(
            2023,
            Scores::new(40.0, 48.0, 61.0),
            Achievements::new(900_000, 12, 100),
        ),
        YearRecord::new(
            2024,
            Scores::new(50.0, 60.0, 75.0),
            Achievements::new(250_000, 16, 80),
        ),
        YearRecord::new(
            2025,
            Scores::new(70.0, 65.0, 80.0),
            Achievements::new(450_000, 20, 150),
        ),
    ])
}

/// Serves an in-memory series. Never fails.
#[derive(Debug, Clone)]
pub struct MockImpactSource {
    series: ImpactSeries,
}

impl MockImpactSource {
    /// Source backed by the built-in five-year record set.
    pub fn new() -> Self {
        Self {
            series: mock_series(),
        }
    }

    /// Source backed by an arbitrary series.
    pub const fn with_series(series: ImpactSeries) -> Self {
        Self { series }
    }
}

impl Default for MockImpactSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImpactSource for MockImpactSource {
    fn fetch(&self, _attempt: u32) -> Result<ImpactSeries, FetchError> {
        Ok(self.series.clone())
    }
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// Reads a JSON array of records from disk on every attempt.
///
/// Missing files and malformed content are fetch failures, so a file that
/// appears between attempts is picked up by the retry.
///
/// The read is blocking and runs on the task that owns the dashboard. It
/// happens once per attempt, after the backoff delay, and is meant for
/// small local files.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImpactSource for JsonFileSource {
    fn fetch(&self, _attempt: u32) -> Result<ImpactSeries, FetchError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

// ---------------------------------------------------------------------------
// Failure injection
// ---------------------------------------------------------------------------

/// Wraps another source and fails its first `failures` attempts.
#[derive(Debug, Clone)]
pub struct FailingSource<S> {
    inner: S,
    failures: u32,
}

impl<S: ImpactSource> FailingSource<S> {
    /// Fail attempts `0..failures`, then delegate to `inner`.
    pub const fn new(inner: S, failures: u32) -> Self {
        Self { inner, failures }
    }

    /// Fail every attempt.
    pub const fn always(inner: S) -> Self {
        Self::new(inner, u32::MAX)
    }
}

impl<S: ImpactSource> ImpactSource for FailingSource<S> {
    fn fetch(&self, attempt: u32) -> Result<ImpactSeries, FetchError> {
        if attempt < self.failures {
            return Err(FetchError::Injected { attempt });
        }
        self.inner.fetch(attempt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mock_series_covers_five_years() {
        let series = MockImpactSource::new().fetch(0).unwrap();
        assert_eq!(series.years(), vec![2021, 2022, 2023, 2024, 2025]);
        let third = series.get(2).unwrap();
        assert_eq!(third.achievements.trees, 900_000);
        assert!((third.scores.social - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn failing_source_recovers_after_n_attempts() {
        let source = FailingSource::new(MockImpactSource::new(), 2);
        assert!(matches!(
            source.fetch(0),
            Err(FetchError::Injected { attempt: 0 })
        ));
        assert!(source.fetch(1).is_err());
        assert_eq!(source.fetch(2).unwrap().len(), 5);
    }

    #[test]
    fn always_failing_source_never_succeeds() {
        let source = FailingSource::always(MockImpactSource::new());
        assert!(source.fetch(0).is_err());
        assert!(source.fetch(1_000).is_err());
    }

    #[test]
    fn json_file_source_reads_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impact.json");
        let json = serde_json::to_string(&mock_series()).unwrap();
        std::fs::write(&path, json).unwrap();

        let source = JsonFileSource::new(&path);
        assert_eq!(source.path(), path.as_path());
        assert_eq!(source.fetch(0).unwrap(), mock_series());
    }

    #[test]
    fn json_file_source_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("missing.json"));
        assert!(matches!(source.fetch(0), Err(FetchError::Io { .. })));
    }

    #[test]
    fn json_file_source_reports_bad_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impact.json");
        std::fs::write(&path, "{\"year\": 2021}").unwrap();
        let source = JsonFileSource::new(&path);
        assert!(matches!(source.fetch(0), Err(FetchError::Decode { .. })));
    }

    #[test]
    fn json_file_source_rereads_on_each_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impact.json");
        let source = JsonFileSource::new(&path);
        assert!(source.fetch(0).is_err());

        std::fs::write(&path, serde_json::to_string(&mock_series()).unwrap()).unwrap();
        assert_eq!(source.fetch(1).unwrap().len(), 5);
    }

    #[test]
    fn boxed_sources_delegate() {
        let source: Box<dyn ImpactSource> = Box::new(MockImpactSource::new());
        assert_eq!(source.fetch(0).unwrap().len(), 5);
    }
}
