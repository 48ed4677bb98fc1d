//! Page context captured once when a deployment view is opened

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConsoleError;

/// Lifecycle phase of the deployment at the time the view was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentPhase {
    #[default]
    New,
    Active,
    Successful,
    Failed,
}

impl DeploymentPhase {
    /// New and active deployments still produce log entries
    pub fn is_live(&self) -> bool {
        matches!(self, DeploymentPhase::New | DeploymentPhase::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentPhase::New => "new",
            DeploymentPhase::Active => "active",
            DeploymentPhase::Successful => "successful",
            DeploymentPhase::Failed => "failed",
        }
    }
}

impl FromStr for DeploymentPhase {
    type Err = String;

    /// Anything that is not recognisably new or active is a finished
    /// deployment; unknown strings fall back to `Failed`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "new" => DeploymentPhase::New,
            "active" => DeploymentPhase::Active,
            "successful" | "success" => DeploymentPhase::Successful,
            _ => DeploymentPhase::Failed,
        })
    }
}

impl Serialize for DeploymentPhase {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeploymentPhase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Everything the server-rendered page used to carry in data attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    /// Phase at load time
    #[serde(default)]
    pub phase: DeploymentPhase,

    /// Host and path of the live log stream, without scheme. Absent for
    /// finished deployments.
    #[serde(default)]
    pub stream_path: Option<String>,

    /// Host and path of the kill endpoint, without scheme
    #[serde(default)]
    pub kill_path: Option<String>,

    /// Whether the dashboard is served over TLS
    #[serde(default)]
    pub secure: bool,
}

impl PageContext {
    /// Build a context from `--key=value` command line arguments
    pub fn from_args(
        args: &std::collections::HashMap<String, String>,
    ) -> Result<Self, ConsoleError> {
        let phase = match args.get("phase") {
            Some(p) => p.parse().map_err(ConsoleError::ConfigError)?,
            None => DeploymentPhase::default(),
        };

        Ok(Self {
            phase,
            stream_path: non_empty(args.get("stream-path")),
            kill_path: non_empty(args.get("kill-path")),
            secure: args.get("secure").map(|v| v == "true").unwrap_or(false),
        })
    }

    /// WebSocket URL of the live stream, if there is one
    pub fn stream_url(&self) -> Option<String> {
        let scheme = if self.secure { "wss://" } else { "ws://" };
        self.stream_path
            .as_ref()
            .map(|p| format!("{}{}", scheme, strip_scheme(p)))
    }

    /// HTTP URL of the kill endpoint, if there is one
    pub fn kill_url(&self) -> Option<String> {
        let scheme = if self.secure { "https://" } else { "http://" };
        self.kill_path
            .as_ref()
            .map(|p| format!("{}{}", scheme, strip_scheme(p)))
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

fn strip_scheme(path: &str) -> &str {
    path.split_once("://").map(|(_, rest)| rest).unwrap_or(path)
}
