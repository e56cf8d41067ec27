//! The application shell around the dashboard.
//!
//! The shell decides which view is on screen. The dashboard only asks for
//! a switch; the shell applies it. Every frame is presented to the shell,
//! and drawn as a structured log event only while the dashboard view is
//! on screen.

use impact_core::dashboard::DashboardSnapshot;
use impact_types::View;
use tracing::info;

/// Tracks the visible view and renders dashboard frames.
#[derive(Debug, Default)]
pub struct AppShell {
    current_view: View,
    frames: u64,
    drawn: u64,
}

impl AppShell {
    /// Create a shell showing the dashboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// The view currently on screen.
    pub const fn current_view(&self) -> View {
        self.current_view
    }

    /// Number of frames presented so far, drawn or not.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of frames actually drawn on the dashboard view.
    pub const fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Switch to `view`. Returns `false` if it was already showing.
    pub fn handle_view_change(&mut self, view: View) -> bool {
        if self.current_view == view {
            return false;
        }
        info!(from = %self.current_view, to = %view, "switching view");
        self.current_view = view;
        true
    }

    /// Present one frame, drawing it if the dashboard view is showing.
    ///
    /// Returns whether the frame was drawn.
    pub fn render(&mut self, snapshot: &DashboardSnapshot) -> bool {
        self.frames = self.frames.saturating_add(1);
        if self.current_view != View::Dashboard {
            return false;
        }
        self.drawn = self.drawn.saturating_add(1);
        info!(
            frame = self.frames,
            year = %snapshot.current_year,
            next = %snapshot.next_year,
            composite = snapshot.composite_score,
            trees = snapshot.achievements.trees,
            igas = snapshot.achievements.igas,
            cleanups = snapshot.achievements.cleanups,
            automated = snapshot.automated,
            loaded_at = ?snapshot.loaded_at,
            "{}",
            summarize(snapshot)
        );
        for category in &snapshot.categories {
            tracing::debug!(
                category = %category.category,
                score = category.score,
                ring_offset = category.ring_offset,
                path = %category.line_path,
                "{}",
                category.label
            );
        }
        true
    }
}

/// One-line text summary of a frame.
pub fn summarize(snapshot: &DashboardSnapshot) -> String {
    let scores = snapshot
        .categories
        .iter()
        .map(|c| format!("{} {}", c.label, c.score))
        .collect::<Vec<_>>()
        .join(", ");
    let mode = if snapshot.automated { "auto" } else { "paused" };
    format!(
        "{} [{}] composite {} | {} | next: {}",
        snapshot.current_year, mode, snapshot.composite_score, scores, snapshot.next_year
    )
}
