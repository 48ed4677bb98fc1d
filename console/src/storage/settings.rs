//! Settings file management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logs::LogLevel;
use crate::ui::layout::Viewport;

/// Console settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,

    /// Directory for daily log files; stderr only when absent
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Dashboard backend
    #[serde(default)]
    pub dashboard: DashboardSettings,

    /// Title icon animation
    #[serde(default)]
    pub favicon: FaviconSettings,

    /// Viewport used to size the log
    #[serde(default)]
    pub viewport: Viewport,

    /// Show an error entry for undecodable log messages
    #[serde(default = "default_true")]
    pub show_decode_errors: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_dir: None,
            dashboard: DashboardSettings::default(),
            favicon: FaviconSettings::default(),
            viewport: Viewport::default(),
            show_decode_errors: true,
        }
    }
}

/// Dashboard backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Origin of the dashboard
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

/// Favicon animation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaviconSettings {
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: u32,

    /// Degrees per frame
    #[serde(default = "default_rotation_per_frame")]
    pub rotation_per_frame: f32,

    /// PNG to rotate
    #[serde(default)]
    pub icon_path: Option<PathBuf>,

    /// File that receives every rotated frame
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

fn default_frames_per_second() -> u32 {
    10
}

fn default_rotation_per_frame() -> f32 {
    4.0
}

impl Default for FaviconSettings {
    fn default() -> Self {
        Self {
            frames_per_second: default_frames_per_second(),
            rotation_per_frame: default_rotation_per_frame(),
            icon_path: None,
            output_path: None,
        }
    }
}
