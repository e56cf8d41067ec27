//! End-to-end dashboard scenarios driven through the service handle.
//!
//! All tests run on Tokio's paused clock, so the loader's backoff delays
//! and the 3-second automation period elapse instantly and
//! deterministically.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use impact_core::config::ChartConfig;
use impact_core::dashboard::{Dashboard, DashboardPhase};
use impact_core::events::{AdvanceOrigin, DashboardEvent};
use impact_core::loader::{ImpactLoader, RetryPolicy};
use impact_core::metrics::{NextYearLabel, YearLabel};
use impact_core::service::{DashboardHandle, ServiceError, spawn_dashboard};
use impact_core::source::{FailingSource, ImpactSource, MockImpactSource};
use impact_types::{Achievements, ImpactSeries, Scores, View, YearRecord};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};

const INTERVAL: Duration = Duration::from_millis(3000);

/// Just past one automation period.
const ONE_TICK: Duration = Duration::from_millis(3001);

fn start<S: ImpactSource + 'static>(source: S) -> (DashboardHandle, JoinHandle<()>) {
    let dashboard = Dashboard::new(INTERVAL, ChartConfig::default());
    let loader = ImpactLoader::new(source, RetryPolicy::default());
    spawn_dashboard(dashboard, loader)
}

#[tokio::test(start_paused = true)]
async fn load_tick_manual_advance_then_resume() {
    let (handle, _task) = start(MockImpactSource::new());

    let snap = handle.initialize().await.unwrap();
    assert_eq!(snap.phase, DashboardPhase::Ready);
    assert_eq!(snap.records, 5);
    assert_eq!(snap.cursor, Some(0));
    assert_eq!(snap.current_year, YearLabel::Year(2021));
    assert!(snap.automated);

    sleep(ONE_TICK).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.cursor, Some(1));
    assert_eq!(snap.current_year, YearLabel::Year(2022));

    let snap = handle.advance(false).await.unwrap();
    assert!(!snap.automated);
    assert_eq!(snap.cursor, Some(2));
    assert_eq!(snap.current_year, YearLabel::Year(2023));

    assert!(handle.toggle_automation().await.unwrap());
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.cursor, Some(2));
    assert!(snap.automated);

    sleep(ONE_TICK).await;
    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.current_year, YearLabel::Year(2024));
}

#[tokio::test(start_paused = true)]
async fn stopped_automation_never_advances_again() {
    let (handle, _task) = start(MockImpactSource::new());
    handle.initialize().await.unwrap();

    assert!(!handle.toggle_automation().await.unwrap());
    sleep(Duration::from_secs(60)).await;

    let snap = handle.snapshot().await.unwrap();
    assert_eq!(snap.cursor, Some(0));
    assert!(!snap.automated);
}

#[tokio::test(start_paused = true)]
async fn automated_advances_wrap_around() {
    let (handle, _task) = start(MockImpactSource::new());
    handle.initialize().await.unwrap();

    let mut snap = handle.snapshot().await.unwrap();
    for _ in 0..5 {
        snap = handle.advance(true).await.unwrap();
        assert!(snap.automated);
    }
    assert_eq!(snap.cursor, Some(0));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_leave_an_inert_dashboard() {
    let (handle, _task) = start(FailingSource::always(MockImpactSource::new()));

    let started = Instant::now();
    let snap = handle.initialize().await.unwrap();
    // 1500 + 2000 + 4000 ms of backoff.
    assert!(started.elapsed() >= Duration::from_millis(7500));

    assert_eq!(snap.phase, DashboardPhase::Empty);
    assert_eq!(snap.cursor, None);
    assert_eq!(snap.current_year, YearLabel::Pending);
    assert_eq!(snap.current_year.to_string(), "...");
    assert_eq!(snap.next_year, NextYearLabel::StartOver);
    assert_eq!(snap.composite_score, 0);
    assert_eq!(snap.achievements, Achievements::default());
    assert!(!snap.automated);

    assert!(!handle.toggle_automation().await.unwrap());
    let snap = handle.advance(false).await.unwrap();
    assert_eq!(snap.cursor, None);
    assert!(snap.categories.iter().all(|c| c.line_path.is_empty()));
}

#[tokio::test(start_paused = true)]
async fn retry_recovers_before_exhaustion() {
    let (handle, _task) = start(FailingSource::new(MockImpactSource::new(), 2));
    let snap = handle.initialize().await.unwrap();
    assert_eq!(snap.phase, DashboardPhase::Ready);
    assert_eq!(snap.records, 5);
}

#[tokio::test(start_paused = true)]
async fn single_year_series_stays_put() {
    let series = ImpactSeries::from(vec![YearRecord::new(
        2030,
        Scores::new(80.0, 0.0, 60.0),
        Achievements::new(1_000, 1, 2),
    )]);
    let (handle, _task) = start(MockImpactSource::with_series(series));

    let snap = handle.initialize().await.unwrap();
    assert_eq!(snap.next_year, NextYearLabel::StartOver);
    assert_eq!(snap.composite_score, 70);

    for _ in 0..3 {
        let snap = handle.advance(false).await.unwrap();
        assert_eq!(snap.cursor, Some(0));
        assert_eq!(snap.current_year, YearLabel::Year(2030));
    }
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_lifecycle_events() {
    let (handle, _task) = start(MockImpactSource::new());
    let mut events = handle.subscribe();

    handle.initialize().await.unwrap();
    sleep(ONE_TICK).await;
    handle.request_view(View::About).await.unwrap();
    handle.snapshot().await.unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert_eq!(
        seen,
        vec![
            DashboardEvent::Loading,
            DashboardEvent::Loaded { records: 5 },
            DashboardEvent::AutomationChanged { running: true },
            DashboardEvent::CursorMoved {
                cursor: 1,
                year: 2022,
                origin: AdvanceOrigin::Automated,
            },
            DashboardEvent::ViewRequested { view: View::About },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn dispose_stops_the_service() {
    let (handle, task) = start(MockImpactSource::new());
    handle.initialize().await.unwrap();
    let mut events = handle.subscribe();

    handle.dispose().await.unwrap();
    task.await.unwrap();

    assert!(matches!(
        handle.snapshot().await,
        Err(ServiceError::Closed)
    ));
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert_eq!(
        seen,
        vec![
            DashboardEvent::AutomationChanged { running: false },
            DashboardEvent::Disposed,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_ends_the_service() {
    let (handle, task) = start(MockImpactSource::new());
    handle.initialize().await.unwrap();
    drop(handle);
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dashboard_can_be_driven_without_the_service() {
    let mut dashboard = Dashboard::new(INTERVAL, ChartConfig::default());
    let loader = ImpactLoader::new(MockImpactSource::new(), RetryPolicy::default());
    dashboard.initialize(&loader).await;

    let started = Instant::now();
    assert!(dashboard.run_automation_tick().await);
    assert!(started.elapsed() >= INTERVAL);
    assert_eq!(dashboard.current_year(), YearLabel::Year(2022));
    assert!(dashboard.is_automated());
}
