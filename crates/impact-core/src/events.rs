//! Events published by the dashboard as its state changes.
//!
//! Hosts subscribe through [`Dashboard::subscribe`] or
//! [`DashboardHandle::subscribe`] and re-render when an event arrives.
//! [`DashboardEvent::ViewRequested`] is the upward view-switch interface:
//! the dashboard has no opinion on what the host does with it.
//!
//! [`Dashboard::subscribe`]: crate::dashboard::Dashboard::subscribe
//! [`DashboardHandle::subscribe`]: crate::service::DashboardHandle::subscribe

use impact_types::View;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Capacity of the event broadcast channel.
///
/// A subscriber that falls more than this many events behind receives
/// `RecvError::Lagged` and skips to the newest event.
pub const EVENT_CAPACITY: usize = 64;

/// Who moved the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AdvanceOrigin {
    /// A person asked for the next year. Stops automation.
    Manual,
    /// The automation timer fired.
    Automated,
}

impl AdvanceOrigin {
    /// Map the boolean form used by hosts (`true` = automated).
    pub const fn from_automated(is_automated: bool) -> Self {
        if is_automated {
            Self::Automated
        } else {
            Self::Manual
        }
    }
}

/// A change in dashboard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DashboardEvent {
    /// Loading started.
    Loading,
    /// Loading finished.
    Loaded {
        /// Number of records loaded (0 means no data).
        records: u32,
    },
    /// The cursor moved.
    CursorMoved {
        /// New cursor position.
        cursor: u32,
        /// Year now displayed.
        year: i32,
        /// What triggered the move.
        origin: AdvanceOrigin,
    },
    /// Automation was started or stopped.
    AutomationChanged {
        /// Whether automation is now running.
        running: bool,
    },
    /// The dashboard asked its host to switch views.
    ViewRequested {
        /// Requested view.
        view: View,
    },
    /// The dashboard was torn down.
    Disposed,
}
