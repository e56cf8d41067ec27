//! Dashboard service: a single task that owns the [`Dashboard`].
//!
//! [`spawn_dashboard`] moves a dashboard and its loader into a Tokio task
//! and returns a cloneable [`DashboardHandle`]. The task processes one
//! command at a time and otherwise waits on the automation timer, so:
//!
//! - `initialize` completes before any later command is handled;
//! - every advance, manual or automated, runs on the owning task;
//! - once automation is stopped, no further automated advance can happen,
//!   because the stopped timer is the only source of ticks.
//!
//! The task exits on [`DashboardHandle::dispose`] or when every handle is
//! dropped. Either way the dashboard is disposed before the task ends.

use impact_types::View;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dashboard::{Dashboard, DashboardSnapshot};
use crate::events::{AdvanceOrigin, DashboardEvent};
use crate::loader::ImpactLoader;
use crate::source::ImpactSource;

/// Capacity of the command queue.
const COMMAND_CAPACITY: usize = 32;

/// Errors returned by [`DashboardHandle`] methods.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service task has ended.
    #[error("dashboard service is no longer running")]
    Closed,
}

/// A request to the service task.
#[derive(Debug)]
enum Command {
    Initialize {
        reply: oneshot::Sender<DashboardSnapshot>,
    },
    Advance {
        origin: AdvanceOrigin,
        reply: oneshot::Sender<DashboardSnapshot>,
    },
    ToggleAutomation {
        reply: oneshot::Sender<bool>,
    },
    RequestView {
        view: View,
    },
    Snapshot {
        reply: oneshot::Sender<DashboardSnapshot>,
    },
    Dispose {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle for driving a running dashboard service.
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<DashboardEvent>,
}

impl DashboardHandle {
    /// Subscribe to dashboard events.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Load data and return the resulting state.
    pub async fn initialize(&self) -> Result<DashboardSnapshot, ServiceError> {
        self.request(|reply| Command::Initialize { reply }).await
    }

    /// Advance the cursor. `is_automated = false` stops automation first.
    pub async fn advance(&self, is_automated: bool) -> Result<DashboardSnapshot, ServiceError> {
        let origin = AdvanceOrigin::from_automated(is_automated);
        self.request(|reply| Command::Advance { origin, reply }).await
    }

    /// Toggle automation. Returns whether it is running afterwards.
    pub async fn toggle_automation(&self) -> Result<bool, ServiceError> {
        self.request(|reply| Command::ToggleAutomation { reply })
            .await
    }

    /// Forward a view-switch request to subscribers.
    pub async fn request_view(&self, view: View) -> Result<(), ServiceError> {
        self.commands
            .send(Command::RequestView { view })
            .await
            .map_err(|_closed| ServiceError::Closed)
    }

    /// Current derived state.
    pub async fn snapshot(&self) -> Result<DashboardSnapshot, ServiceError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Stop automation and end the service task.
    pub async fn dispose(&self) -> Result<(), ServiceError> {
        self.request(|reply| Command::Dispose { reply }).await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_closed| ServiceError::Closed)?;
        rx.await.map_err(|_dropped| ServiceError::Closed)
    }
}

/// Start the service task.
///
/// The dashboard stays in `Loading` until [`DashboardHandle::initialize`]
/// is called. Must be called from within a Tokio runtime.
pub fn spawn_dashboard<S>(
    dashboard: Dashboard,
    loader: ImpactLoader<S>,
) -> (DashboardHandle, JoinHandle<()>)
where
    S: ImpactSource + 'static,
{
    let (commands, rx) = mpsc::channel(COMMAND_CAPACITY);
    let handle = DashboardHandle {
        commands,
        events: dashboard.events_sender(),
    };
    let task = tokio::spawn(run(dashboard, loader, rx));
    (handle, task)
}

async fn run<S: ImpactSource>(
    mut dashboard: Dashboard,
    loader: ImpactLoader<S>,
    mut commands: mpsc::Receiver<Command>,
) {
    info!("dashboard service started");

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("all dashboard handles dropped");
                    dashboard.dispose();
                    break;
                };
                if !handle_command(&mut dashboard, &loader, command).await {
                    break;
                }
            }
            () = dashboard.automation_due() => {
                dashboard.advance(AdvanceOrigin::Automated);
            }
        }
    }

    info!("dashboard service stopped");
}

/// Apply one command. Returns `false` when the service should stop.
async fn handle_command<S: ImpactSource>(
    dashboard: &mut Dashboard,
    loader: &ImpactLoader<S>,
    command: Command,
) -> bool {
    match command {
        Command::Initialize { reply } => {
            dashboard.initialize(loader).await;
            let _ = reply.send(dashboard.snapshot());
        }
        Command::Advance { origin, reply } => {
            dashboard.advance(origin);
            let _ = reply.send(dashboard.snapshot());
        }
        Command::ToggleAutomation { reply } => {
            let _ = reply.send(dashboard.toggle_automation());
        }
        Command::RequestView { view } => {
            dashboard.request_view(view);
        }
        Command::Snapshot { reply } => {
            let _ = reply.send(dashboard.snapshot());
        }
        Command::Dispose { reply } => {
            dashboard.dispose();
            let _ = reply.send(());
            return false;
        }
    }
    true
}
