//! Append-only log container with follow-tail scrolling

use tracing::debug;

use crate::app::context::DeploymentPhase;
use crate::ui::layout::{log_max_height, Viewport};
use crate::ui::views::LogView;

/// Appends rendered entries in arrival order.
///
/// Whether to follow the tail is decided once from the phase the view was
/// opened in: live deployments always scroll to the newest entry, finished
/// ones never do so a reader can stay in the middle of the transcript.
pub struct LogAppender {
    view: Box<dyn LogView>,
    follow_tail: bool,
    appended: usize,
}

impl LogAppender {
    pub fn new(view: Box<dyn LogView>, phase: DeploymentPhase) -> Self {
        Self {
            view,
            follow_tail: phase.is_live(),
            appended: 0,
        }
    }

    pub fn follows_tail(&self) -> bool {
        self.follow_tail
    }

    /// Number of entries appended so far
    pub fn len(&self) -> usize {
        self.appended
    }

    pub fn is_empty(&self) -> bool {
        self.appended == 0
    }

    pub fn append(&mut self, markup: &str) {
        self.view.append(markup);
        self.appended += 1;

        if self.follow_tail {
            self.view.scroll_to_bottom();
        }
    }

    /// Recompute the container height for the current viewport
    pub fn resize(&mut self, viewport: &Viewport) {
        let max_height = log_max_height(viewport);
        debug!("Log container max height: {}", max_height);
        self.view.set_max_height(max_height);
    }
}
