//! Application configuration options

use std::path::PathBuf;
use std::time::Duration;

use crate::storage::settings::Settings;
use crate::ui::favicon::FaviconOptions;
use crate::ui::layout::Viewport;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Dashboard origin used for relative section paths
    pub dashboard_base_url: String,

    /// Timeout for section and kill requests
    pub http_timeout: Duration,

    /// Live log session options
    pub session: SessionOptions,

    /// Icon to rotate; the built-in icon when absent
    pub icon_path: Option<PathBuf>,

    /// Where rotated icon frames are written, if anywhere
    pub icon_output_path: Option<PathBuf>,

    /// Dashboard sections to print before tailing the log
    pub sections: SectionOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            dashboard_base_url: "http://localhost:8080".to_string(),
            http_timeout: Duration::from_secs(30),
            session: SessionOptions::default(),
            icon_path: None,
            icon_output_path: None,
            sections: SectionOptions::default(),
        }
    }
}

impl From<&Settings> for AppOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            dashboard_base_url: settings.dashboard.base_url.clone(),
            http_timeout: Duration::from_secs(settings.dashboard.http_timeout_secs),
            session: SessionOptions {
                favicon: FaviconOptions {
                    frames_per_second: settings.favicon.frames_per_second,
                    rotation_per_frame: settings.favicon.rotation_per_frame,
                    ..Default::default()
                },
                viewport: settings.viewport,
                show_decode_errors: settings.show_decode_errors,
            },
            icon_path: settings.favicon.icon_path.clone(),
            icon_output_path: settings.favicon.output_path.clone(),
            sections: SectionOptions::default(),
        }
    }
}

/// Live log session options
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Title icon animation
    pub favicon: FaviconOptions,

    /// Viewport at load time
    pub viewport: Viewport,

    /// Show an error entry in the log for undecodable messages
    pub show_decode_errors: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            favicon: FaviconOptions::default(),
            viewport: Viewport::default(),
            show_decode_errors: true,
        }
    }
}

/// Paths of the dashboard sections
#[derive(Debug, Clone, Default)]
pub struct SectionOptions {
    pub pulls_path: Option<String>,
    pub branches_path: Option<String>,
    pub diff_path: Option<String>,

    /// Candidate commit for the diff section
    pub commit_sha: Option<String>,

    /// Deployment target for the diff section
    pub target: Option<String>,
}

impl SectionOptions {
    pub fn from_args(args: &std::collections::HashMap<String, String>) -> Self {
        let get = |key: &str| args.get(key).filter(|v| !v.is_empty()).cloned();
        Self {
            pulls_path: get("pulls-path"),
            branches_path: get("branches-path"),
            diff_path: get("diff-path"),
            commit_sha: get("sha"),
            target: get("target"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pulls_path.is_none() && self.branches_path.is_none() && self.diff_path.is_none()
    }
}
