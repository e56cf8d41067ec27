//! The dashboard state machine.
//!
//! [`Dashboard`] owns the loaded series, the cursor, and the automation
//! timer. It is the only thing that mutates them.
//!
//! # States
//!
//! ```text
//! Loading ──load──▶ Ready (cursor = 0, automation running)
//!         └───────▶ Empty (automation stopped, advance is a no-op)
//! ```
//!
//! Automation is a sub-state of `Ready` only: it never starts or continues
//! with an empty series. A manual advance stops automation before moving
//! the cursor; an automated advance leaves it running. Navigation is cyclic.
//!
//! # Invariants
//!
//! - `cursor < series.len()` whenever the series is non-empty.
//! - The automation timer exists iff automation is running.
//! - Stop is idempotent, start is guarded, dispose always stops.

use std::time::Duration;

use chrono::{DateTime, Utc};
use impact_types::{Achievements, ImpactSeries, ScoreCategory, Scores, View, YearRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};
use ts_rs::TS;

use crate::automation::AutomationTimer;
use crate::config::{ChartConfig, DashboardConfig};
use crate::events::{AdvanceOrigin, DashboardEvent, EVENT_CAPACITY};
use crate::geometry;
use crate::loader::ImpactLoader;
use crate::metrics::{self, NextYearLabel, YearLabel};
use crate::source::ImpactSource;

/// Lifecycle phase of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DashboardPhase {
    /// Data is being fetched.
    Loading,
    /// A non-empty series is loaded.
    Ready,
    /// Loading finished with no data.
    Empty,
}

/// Per-category chart values for the current year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CategoryView {
    /// Which category.
    pub category: ScoreCategory,
    /// Display label.
    pub label: String,
    /// Series color.
    pub color: String,
    /// Score for the current year.
    pub score: f64,
    /// Ring `stroke-dashoffset` for the current score.
    pub ring_offset: f64,
    /// Line chart path over the whole series.
    pub line_path: String,
}

/// Every derived value for the current cursor, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DashboardSnapshot {
    /// Lifecycle phase.
    pub phase: DashboardPhase,
    /// Cursor position, absent when there is no data.
    pub cursor: Option<u32>,
    /// Number of loaded records.
    pub records: u32,
    /// Year under the cursor.
    pub current_year: YearLabel,
    /// Year an advance would show.
    pub next_year: NextYearLabel,
    /// Rounded mean of the positive scores.
    pub composite_score: u32,
    /// Achievement counters for the current year.
    pub achievements: Achievements,
    /// One entry per category, in ring order.
    pub categories: Vec<CategoryView>,
    /// Whether automation is running.
    pub automated: bool,
    /// When the current series finished loading.
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Auto-advancing dashboard over an [`ImpactSeries`].
#[derive(Debug)]
pub struct Dashboard {
    series: ImpactSeries,
    cursor: usize,
    phase: DashboardPhase,
    timer: AutomationTimer,
    interval: Duration,
    chart: ChartConfig,
    loaded_at: Option<DateTime<Utc>>,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    /// Create a dashboard in the `Loading` phase with no data.
    pub fn new(interval: Duration, chart: ChartConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            series: ImpactSeries::empty(),
            cursor: 0,
            phase: DashboardPhase::Loading,
            timer: AutomationTimer::new(),
            interval,
            chart,
            loaded_at: None,
            events,
        }
    }

    /// Create a dashboard using the automation and chart settings.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.automation.interval(), config.chart)
    }

    /// Subscribe to state change events.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Sender half of the event channel, for handles that outlive a borrow.
    pub(crate) fn events_sender(&self) -> broadcast::Sender<DashboardEvent> {
        self.events.clone()
    }

    fn emit(&self, event: DashboardEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Load data and enter `Ready` or `Empty`.
    ///
    /// Automation starts only once the series is in place, and only if it
    /// is non-empty.
    pub async fn initialize<S: ImpactSource>(&mut self, loader: &ImpactLoader<S>) {
        self.begin_loading();
        let series = loader.load().await;
        self.finish_loading(series);
    }

    /// Enter `Loading`, stopping any running automation.
    pub fn begin_loading(&mut self) {
        self.stop_automation();
        self.phase = DashboardPhase::Loading;
        info!("loading impact data");
        self.emit(DashboardEvent::Loading);
    }

    /// Replace the series with a freshly loaded one and leave `Loading`.
    pub fn finish_loading(&mut self, series: ImpactSeries) {
        self.series = series;
        self.cursor = 0;
        self.loaded_at = Some(Utc::now());
        let records = u32::try_from(self.series.len()).unwrap_or(u32::MAX);
        self.emit(DashboardEvent::Loaded { records });

        if self.series.is_empty() {
            self.phase = DashboardPhase::Empty;
            self.stop_automation();
            info!("no impact data available");
        } else {
            self.phase = DashboardPhase::Ready;
            info!(records, first_year = %self.current_year(), "impact data ready");
            self.start_automation();
        }
    }

    /// Stop automation unconditionally. Call when the host goes away.
    pub fn dispose(&mut self) {
        self.stop_automation();
        debug!("dashboard disposed");
        self.emit(DashboardEvent::Disposed);
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move to the next year, wrapping to the first after the last.
    ///
    /// A [`AdvanceOrigin::Manual`] advance stops automation first. Returns
    /// `false` (and changes nothing) when the series is empty.
    pub fn advance(&mut self, origin: AdvanceOrigin) -> bool {
        if self.series.is_empty() {
            return false;
        }
        if origin == AdvanceOrigin::Manual {
            self.stop_automation();
        }

        self.cursor = self
            .cursor
            .saturating_add(1)
            .checked_rem(self.series.len())
            .unwrap_or(0);

        let year = self.current_record().map_or(0, |r| r.year);
        debug!(cursor = self.cursor, year, ?origin, "cursor moved");
        self.emit(DashboardEvent::CursorMoved {
            cursor: u32::try_from(self.cursor).unwrap_or(u32::MAX),
            year,
            origin,
        });
        true
    }

    /// Ask the host to switch to `view`. Forwarded unchanged.
    pub fn request_view(&self, view: View) {
        debug!(%view, "view change requested");
        self.emit(DashboardEvent::ViewRequested { view });
    }

    // -----------------------------------------------------------------------
    // Automation
    // -----------------------------------------------------------------------

    /// Start automation if stopped, stop it if running.
    ///
    /// Returns whether automation is running afterwards. Cannot start with
    /// an empty series.
    pub fn toggle_automation(&mut self) -> bool {
        if self.timer.is_running() {
            self.stop_automation();
        } else {
            self.start_automation();
        }
        self.timer.is_running()
    }

    /// Arm the timer. No-op if already running or if there is no data.
    pub fn start_automation(&mut self) -> bool {
        if self.series.is_empty() {
            return false;
        }
        if !self.timer.start(self.interval) {
            return false;
        }
        info!(interval_ms = self.interval.as_millis(), "automation started");
        self.emit(DashboardEvent::AutomationChanged { running: true });
        true
    }

    /// Disarm the timer. No-op if already stopped.
    pub fn stop_automation(&mut self) -> bool {
        if !self.timer.stop() {
            return false;
        }
        info!(cursor = self.cursor, "automation stopped");
        self.emit(DashboardEvent::AutomationChanged { running: false });
        true
    }

    /// Wait until the automation timer fires. Pends forever while stopped.
    ///
    /// Cancel safe; meant for a `tokio::select!` branch followed by
    /// `advance(AdvanceOrigin::Automated)`.
    pub async fn automation_due(&mut self) {
        self.timer.tick().await;
    }

    /// Wait for the next automation tick and advance.
    pub async fn run_automation_tick(&mut self) -> bool {
        self.automation_due().await;
        self.advance(AdvanceOrigin::Automated)
    }

    /// Whether automation is running.
    pub const fn is_automated(&self) -> bool {
        self.timer.is_running()
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    /// Lifecycle phase.
    pub const fn phase(&self) -> DashboardPhase {
        self.phase
    }

    /// Whether data is being fetched.
    pub fn is_loading(&self) -> bool {
        self.phase == DashboardPhase::Loading
    }

    /// When the current series finished loading, `None` before the first load.
    pub const fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Cursor position, `None` when there is no data.
    pub fn cursor(&self) -> Option<usize> {
        (!self.series.is_empty()).then_some(self.cursor)
    }

    /// Record under the cursor.
    pub fn current_record(&self) -> Option<&YearRecord> {
        metrics::current_record(&self.series, self.cursor)
    }

    /// Year under the cursor, or the placeholder label.
    pub fn current_year(&self) -> YearLabel {
        metrics::current_year(&self.series, self.cursor)
    }

    /// Year an advance would show, or "Start Over".
    pub fn next_year(&self) -> NextYearLabel {
        metrics::next_year(&self.series, self.cursor)
    }

    /// Current scores (all zero with no data).
    pub fn scores(&self) -> Scores {
        metrics::current_scores(self.current_record())
    }

    /// Score for `category`, 0 with no data.
    pub fn score_for(&self, category: ScoreCategory) -> f64 {
        metrics::score_for(self.current_record(), category)
    }

    /// The three current scores in ring order.
    pub fn chart_data(&self) -> [f64; 3] {
        self.scores().as_array()
    }

    /// Rounded mean of the positive current scores.
    pub fn composite_score(&self) -> u32 {
        metrics::composite_score(&self.scores())
    }

    /// Achievement counters for the current year.
    pub fn achievements(&self) -> Achievements {
        metrics::achievements(self.current_record())
    }

    /// Trees planted in the current year.
    pub fn trees_planted(&self) -> u64 {
        self.achievements().trees
    }

    /// Income-generating-activity groups established in the current year.
    pub fn igas_established(&self) -> u64 {
        self.achievements().igas
    }

    /// Cleanups performed in the current year.
    pub fn cleanups_done(&self) -> u64 {
        self.achievements().cleanups
    }

    /// Ring `stroke-dashoffset` for `category`.
    pub fn ring_offset(&self, category: ScoreCategory) -> f64 {
        geometry::ring_offset(category, self.score_for(category))
    }

    /// Line chart path for `category` across the whole series.
    pub fn line_path(&self, category: ScoreCategory) -> String {
        geometry::line_path(&self.series, category, &self.chart)
    }

    /// Capture every derived value at once.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let categories = ScoreCategory::ALL
            .into_iter()
            .map(|category| CategoryView {
                category,
                label: category.label().to_owned(),
                color: category.color().to_owned(),
                score: self.score_for(category),
                ring_offset: self.ring_offset(category),
                line_path: self.line_path(category),
            })
            .collect();

        DashboardSnapshot {
            phase: self.phase,
            cursor: self
                .cursor()
                .map(|c| u32::try_from(c).unwrap_or(u32::MAX)),
            records: u32::try_from(self.series.len()).unwrap_or(u32::MAX),
            current_year: self.current_year(),
            next_year: self.next_year(),
            composite_score: self.composite_score(),
            achievements: self.achievements(),
            categories,
            automated: self.is_automated(),
            loaded_at: self.loaded_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use impact_types::{Achievements, Scores};

    use super::*;
    use crate::source::mock_series;

    fn dashboard() -> Dashboard {
        Dashboard::new(Duration::from_millis(3000), ChartConfig::default())
    }

    fn series_of(years: &[i32]) -> ImpactSeries {
        years
            .iter()
            .map(|&y| YearRecord::new(y, Scores::new(10.0, 20.0, 30.0), Achievements::default()))
            .collect()
    }

    #[test]
    fn starts_loading_with_no_cursor() {
        let d = dashboard();
        assert!(d.is_loading());
        assert!(d.loaded_at().is_none());
        assert_eq!(d.cursor(), None);
        assert_eq!(d.current_year(), YearLabel::Pending);
        assert!(!d.is_automated());
    }

    #[tokio::test(start_paused = true)]
    async fn loading_data_starts_automation_at_first_year() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        assert_eq!(d.phase(), DashboardPhase::Ready);
        assert_eq!(d.cursor(), Some(0));
        assert_eq!(d.current_year(), YearLabel::Year(2021));
        assert_eq!(d.next_year(), NextYearLabel::Year(2022));
        assert!(d.is_automated());
    }

    #[tokio::test(start_paused = true)]
    async fn automated_advance_cycles_back_to_start() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        for _ in 0..5 {
            assert!(d.advance(AdvanceOrigin::Automated));
            assert!(d.is_automated());
        }
        assert_eq!(d.cursor(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn manual_advance_stops_automation() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        assert!(d.advance(AdvanceOrigin::Manual));
        assert!(!d.is_automated());
        assert_eq!(d.current_year(), YearLabel::Year(2022));
    }

    #[test]
    fn empty_series_is_inert() {
        let mut d = dashboard();
        d.finish_loading(ImpactSeries::empty());
        assert_eq!(d.phase(), DashboardPhase::Empty);
        assert!(!d.advance(AdvanceOrigin::Manual));
        assert!(!d.advance(AdvanceOrigin::Automated));
        assert_eq!(d.cursor(), None);
        assert!(!d.toggle_automation());
        assert!(!d.is_automated());
        assert_eq!(d.composite_score(), 0);
        assert_eq!(d.next_year(), NextYearLabel::StartOver);
        assert!(d.line_path(ScoreCategory::Social).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn single_record_never_moves() {
        let mut d = dashboard();
        d.finish_loading(series_of(&[2030]));
        for _ in 0..3 {
            d.advance(AdvanceOrigin::Automated);
            assert_eq!(d.cursor(), Some(0));
        }
        assert_eq!(d.next_year(), NextYearLabel::StartOver);
        assert_eq!(d.line_path(ScoreCategory::Economic).matches('L').count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_flips_automation_without_moving_cursor() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        d.advance(AdvanceOrigin::Automated);
        assert!(!d.toggle_automation());
        assert!(d.toggle_automation());
        assert_eq!(d.cursor(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_are_guarded() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        assert!(!d.start_automation());
        assert!(d.stop_automation());
        assert!(!d.stop_automation());
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_always_stops() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        d.dispose();
        assert!(!d.is_automated());
        d.dispose();
        assert!(!d.is_automated());
    }

    #[tokio::test(start_paused = true)]
    async fn reloading_resets_cursor_and_stops_timer_while_loading() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        d.advance(AdvanceOrigin::Automated);
        d.begin_loading();
        assert!(d.is_loading());
        assert!(!d.is_automated());
        d.finish_loading(series_of(&[1999, 2000]));
        assert_eq!(d.cursor(), Some(0));
        assert_eq!(d.current_year(), YearLabel::Year(1999));
        assert!(d.is_automated());
    }

    #[tokio::test(start_paused = true)]
    async fn projections_follow_the_cursor() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        d.advance(AdvanceOrigin::Automated);
        d.advance(AdvanceOrigin::Automated);
        // 2023: 40 / 48 / 61
        assert!((d.score_for(ScoreCategory::Social) - 40.0).abs() < f64::EPSILON);
        assert_eq!(d.chart_data(), [40.0, 48.0, 61.0]);
        assert_eq!(d.composite_score(), 50);
        assert_eq!(d.trees_planted(), 900_000);
        assert_eq!(d.igas_established(), 12);
        assert_eq!(d.cleanups_done(), 100);
        let expected = geometry::circumference(ScoreCategory::Ecological) * 0.39;
        assert!((d.ring_offset(ScoreCategory::Ecological) - expected).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_collects_all_projections() {
        let mut d = dashboard();
        d.finish_loading(mock_series());
        let snap = d.snapshot();
        assert_eq!(snap.phase, DashboardPhase::Ready);
        assert_eq!(snap.cursor, Some(0));
        assert_eq!(snap.records, 5);
        assert_eq!(snap.current_year, YearLabel::Year(2021));
        assert_eq!(snap.composite_score, 51);
        assert_eq!(snap.achievements.trees, 80_000);
        assert!(snap.automated);
        assert!(snap.loaded_at.is_some());
        assert_eq!(snap.categories.len(), 3);
        let social = snap.categories.first().unwrap();
        assert_eq!(social.label, "Social Impact");
        assert_eq!(social.color, "#0EA5E9");
        assert_eq!(social.line_path.matches('L').count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn events_trace_the_lifecycle() {
        let mut d = dashboard();
        let mut rx = d.subscribe();
        d.begin_loading();
        d.finish_loading(series_of(&[2021, 2022]));
        d.advance(AdvanceOrigin::Manual);
        d.request_view(View::Metrics);
        d.dispose();

        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        assert_eq!(
            events,
            vec![
                DashboardEvent::Loading,
                DashboardEvent::Loaded { records: 2 },
                DashboardEvent::AutomationChanged { running: true },
                DashboardEvent::AutomationChanged { running: false },
                DashboardEvent::CursorMoved {
                    cursor: 1,
                    year: 2022,
                    origin: AdvanceOrigin::Manual,
                },
                DashboardEvent::ViewRequested { view: View::Metrics },
                DashboardEvent::Disposed,
            ]
        );
    }
}
