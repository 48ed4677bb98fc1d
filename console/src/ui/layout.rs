//! Log container sizing

use serde::{Deserialize, Serialize};

/// Space kept free below the log container
pub const LOG_BOTTOM_MARGIN: u32 = 40;

/// Visible area the log container lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Viewport height
    pub height: u32,

    /// Distance from the top of the page to the log container
    pub log_offset_top: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            height: 900,
            log_offset_top: 220,
        }
    }
}

/// Maximum log height so the log scrolls inside the page instead of
/// growing it
pub fn log_max_height(viewport: &Viewport) -> u32 {
    viewport
        .height
        .saturating_sub(viewport.log_offset_top)
        .saturating_sub(LOG_BOTTOM_MARGIN)
}
