//! The render loop between the dashboard service and the shell.
//!
//! One frame is presented for the initial load and one for every cursor
//! move. `host.max_frames` counts presented frames whether or not the
//! dashboard view is on screen, so the loop ends on budget even while the
//! shell shows another view. An empty dashboard never moves, so the loop
//! returns right after its placeholder frame.

use std::future::Future;

use impact_core::config::HostConfig;
use impact_core::dashboard::DashboardPhase;
use impact_core::events::DashboardEvent;
use impact_core::service::DashboardHandle;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::error::AppError;
use crate::shell::AppShell;

/// Load the dashboard and present frames until `shutdown` resolves, the
/// frame budget is spent, or the dashboard closes.
///
/// Returns the shell so callers can inspect the final view and frame count.
///
/// # Errors
///
/// Returns [`AppError::Service`] if the dashboard service stops while a
/// request is in flight.
pub async fn run<F>(
    handle: &DashboardHandle,
    host: &HostConfig,
    shutdown: F,
) -> Result<AppShell, AppError>
where
    F: Future<Output = ()>,
{
    let mut events = handle.subscribe();
    let mut shell = AppShell::new();
    shell.handle_view_change(host.initial_view);

    let snapshot = handle.initialize().await?;
    shell.render(&snapshot);
    if snapshot.phase == DashboardPhase::Empty {
        warn!("no impact data, dashboard is inert");
        return Ok(shell);
    }

    tokio::pin!(shutdown);
    loop {
        if host.max_frames > 0 && shell.frames() >= host.max_frames {
            info!(frames = shell.frames(), "frame limit reached");
            return Ok(shell);
        }

        tokio::select! {
            () = &mut shutdown => {
                info!("shutdown requested");
                return Ok(shell);
            }
            event = events.recv() => match event {
                Ok(DashboardEvent::CursorMoved { .. }) => {
                    let snapshot = handle.snapshot().await?;
                    shell.render(&snapshot);
                }
                Ok(DashboardEvent::AutomationChanged { running }) => {
                    info!(running, "automation changed");
                }
                Ok(DashboardEvent::ViewRequested { view }) => {
                    shell.handle_view_change(view);
                }
                Ok(DashboardEvent::Loading | DashboardEvent::Loaded { .. }) => {}
                Ok(DashboardEvent::Disposed) | Err(RecvError::Closed) => {
                    info!("dashboard closed");
                    return Ok(shell);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "render loop lagged behind dashboard events");
                }
            },
        }
    }
}
