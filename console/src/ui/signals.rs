//! Derived UI signals driven by the entry types seen on the live stream

use serde::{Deserialize, Serialize};

use crate::app::context::DeploymentPhase;
use crate::models::log_entry::EntryType;

/// Title icon animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    Rotating,
    Stopped,
}

/// Status badge next to the deployment header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl StatusLabel {
    /// Initial label for a deployment opened in the given phase
    pub fn for_phase(phase: DeploymentPhase) -> Self {
        match phase {
            DeploymentPhase::New => StatusLabel::Pending,
            DeploymentPhase::Active => StatusLabel::Running,
            DeploymentPhase::Successful => StatusLabel::Succeeded,
            DeploymentPhase::Failed => StatusLabel::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusLabel::Succeeded | StatusLabel::Failed)
    }

    pub fn caption(&self) -> &'static str {
        match self {
            StatusLabel::Pending => "New",
            StatusLabel::Running => "Active",
            StatusLabel::Succeeded => "Successful",
            StatusLabel::Failed => "Failed",
        }
    }

    /// Bootstrap label class used by the badge
    pub fn label_class(&self) -> &'static str {
        match self {
            StatusLabel::Pending => "label-primary",
            StatusLabel::Running => "label-info",
            StatusLabel::Succeeded => "label-success",
            StatusLabel::Failed => "label-danger",
        }
    }
}

/// Kill control state. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KillAvailability {
    /// Control shown and clickable
    Available,

    /// Kill acknowledged; control shown but inert
    Disabled,

    /// Deployment finished; control gone
    Removed,
}

/// Signals that actually changed when an entry was applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalChanges {
    pub animation: Option<AnimationState>,
    pub status: Option<StatusLabel>,
    pub kill: Option<KillAvailability>,
}

impl SignalChanges {
    pub fn is_empty(&self) -> bool {
        self.animation.is_none() && self.status.is_none() && self.kill.is_none()
    }
}

/// The three derived signals.
///
/// Each relevant entry type is a one-way trigger, so the state is updated
/// per entry and never recomputed from history. Applying an entry is
/// idempotent and terminal values are never left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedState {
    animation: AnimationState,
    status: StatusLabel,
    kill: KillAvailability,
}

impl DerivedState {
    /// Initial signals for a view opened in `phase`
    pub fn new(phase: DeploymentPhase, has_kill_control: bool) -> Self {
        let status = StatusLabel::for_phase(phase);
        let kill = if has_kill_control && !status.is_terminal() {
            KillAvailability::Available
        } else {
            KillAvailability::Removed
        };

        Self {
            animation: AnimationState::Stopped,
            status,
            kill,
        }
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn status(&self) -> StatusLabel {
        self.status
    }

    pub fn kill(&self) -> KillAvailability {
        self.kill
    }

    /// Apply the effects of one observed entry type
    pub fn apply(&mut self, entry_type: EntryType) -> SignalChanges {
        match entry_type {
            EntryType::DeploymentStart => {
                // A finished deployment never spins up again
                if self.status.is_terminal() {
                    return SignalChanges::default();
                }
                SignalChanges {
                    animation: self.set_animation(AnimationState::Rotating),
                    ..Default::default()
                }
            }
            EntryType::DeploymentSuccess => self.finish(StatusLabel::Succeeded),
            EntryType::DeploymentFail => self.finish(StatusLabel::Failed),
            EntryType::KillReceived => SignalChanges {
                kill: self.advance_kill(KillAvailability::Disabled),
                ..Default::default()
            },
            EntryType::CommandStdoutOutput
            | EntryType::CommandStderrOutput
            | EntryType::CommandStart
            | EntryType::CommandFail
            | EntryType::CommandSuccess
            | EntryType::StageStart
            | EntryType::StageFail
            | EntryType::StageSuccess
            | EntryType::StageResult => SignalChanges::default(),
        }
    }

    fn finish(&mut self, outcome: StatusLabel) -> SignalChanges {
        let status = if self.status.is_terminal() {
            None
        } else {
            self.status = outcome;
            Some(outcome)
        };

        SignalChanges {
            animation: self.set_animation(AnimationState::Stopped),
            status,
            kill: self.advance_kill(KillAvailability::Removed),
        }
    }

    fn set_animation(&mut self, next: AnimationState) -> Option<AnimationState> {
        if self.animation == next {
            return None;
        }
        self.animation = next;
        Some(next)
    }

    fn advance_kill(&mut self, next: KillAvailability) -> Option<KillAvailability> {
        if next <= self.kill {
            return None;
        }
        self.kill = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_from_phase() {
        let state = DerivedState::new(DeploymentPhase::Active, true);
        assert_eq!(state.animation(), AnimationState::Stopped);
        assert_eq!(state.status(), StatusLabel::Running);
        assert_eq!(state.kill(), KillAvailability::Available);

        let state = DerivedState::new(DeploymentPhase::New, false);
        assert_eq!(state.status(), StatusLabel::Pending);
        assert_eq!(state.kill(), KillAvailability::Removed);

        let state = DerivedState::new(DeploymentPhase::Successful, true);
        assert_eq!(state.status(), StatusLabel::Succeeded);
        assert_eq!(state.kill(), KillAvailability::Removed);
    }

    #[test]
    fn test_success_transition() {
        let mut state = DerivedState::new(DeploymentPhase::Active, true);
        state.apply(EntryType::DeploymentStart);

        let changes = state.apply(EntryType::DeploymentSuccess);
        assert_eq!(changes.animation, Some(AnimationState::Stopped));
        assert_eq!(changes.status, Some(StatusLabel::Succeeded));
        assert_eq!(changes.kill, Some(KillAvailability::Removed));
    }

    #[test]
    fn test_kill_received_disables_once() {
        let mut state = DerivedState::new(DeploymentPhase::Active, true);
        assert_eq!(
            state.apply(EntryType::KillReceived).kill,
            Some(KillAvailability::Disabled)
        );
        assert!(state.apply(EntryType::KillReceived).is_empty());
        assert_eq!(state.status(), StatusLabel::Running);
    }

    #[test]
    fn test_non_lifecycle_entries_are_noops() {
        let mut state = DerivedState::new(DeploymentPhase::Active, true);
        let before = state.clone();
        for t in [
            EntryType::CommandStdoutOutput,
            EntryType::CommandStderrOutput,
            EntryType::CommandStart,
            EntryType::CommandFail,
            EntryType::CommandSuccess,
            EntryType::StageStart,
            EntryType::StageFail,
            EntryType::StageSuccess,
            EntryType::StageResult,
        ] {
            assert!(state.apply(t).is_empty());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_start_after_finish_does_not_rotate() {
        let mut state = DerivedState::new(DeploymentPhase::Active, true);
        state.apply(EntryType::DeploymentFail);
        assert!(state.apply(EntryType::DeploymentStart).is_empty());
        assert_eq!(state.animation(), AnimationState::Stopped);
    }
}
