//! Deployment log entries as delivered on the live stream

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a log entry. The set is closed: every tag the deployment
/// workers emit has a variant here and nothing else decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    CommandStdoutOutput,
    CommandStderrOutput,
    CommandStart,
    CommandFail,
    CommandSuccess,
    StageStart,
    StageFail,
    StageSuccess,
    StageResult,
    DeploymentStart,
    DeploymentSuccess,
    DeploymentFail,
    KillReceived,
}

impl EntryType {
    /// All known tags, in wire-protocol order
    pub const ALL: [EntryType; 13] = [
        EntryType::CommandStdoutOutput,
        EntryType::CommandStderrOutput,
        EntryType::CommandStart,
        EntryType::CommandFail,
        EntryType::CommandSuccess,
        EntryType::StageStart,
        EntryType::StageFail,
        EntryType::StageSuccess,
        EntryType::StageResult,
        EntryType::DeploymentStart,
        EntryType::DeploymentSuccess,
        EntryType::DeploymentFail,
        EntryType::KillReceived,
    ];

    /// Wire tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::CommandStdoutOutput => "COMMAND_STDOUT_OUTPUT",
            EntryType::CommandStderrOutput => "COMMAND_STDERR_OUTPUT",
            EntryType::CommandStart => "COMMAND_START",
            EntryType::CommandFail => "COMMAND_FAIL",
            EntryType::CommandSuccess => "COMMAND_SUCCESS",
            EntryType::StageStart => "STAGE_START",
            EntryType::StageFail => "STAGE_FAIL",
            EntryType::StageSuccess => "STAGE_SUCCESS",
            EntryType::StageResult => "STAGE_RESULT",
            EntryType::DeploymentStart => "DEPLOYMENT_START",
            EntryType::DeploymentSuccess => "DEPLOYMENT_SUCCESS",
            EntryType::DeploymentFail => "DEPLOYMENT_FAIL",
            EntryType::KillReceived => "KILL_RECEIVED",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Tag-specific fields of an entry. Only the templates look inside.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPayload {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub deployment_id: i64,

    /// Host the entry came from, or `applikatoni` for lifecycle entries
    #[serde(default)]
    pub origin: String,

    #[serde(default)]
    pub message: String,
}

/// One decoded message from the live stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    entry_type: EntryType,
    payload: EntryPayload,
}

impl LogEntry {
    pub fn new(entry_type: EntryType, payload: EntryPayload) -> Self {
        Self {
            entry_type,
            payload,
        }
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn payload(&self) -> &EntryPayload {
        &self.payload
    }
}
