//! Derived signal state machine tests over entry sequences

use deploy_console::app::context::DeploymentPhase;
use deploy_console::models::log_entry::EntryType;
use deploy_console::ui::signals::{AnimationState, DerivedState, KillAvailability, StatusLabel};

const PHASES: [DeploymentPhase; 4] = [
    DeploymentPhase::New,
    DeploymentPhase::Active,
    DeploymentPhase::Successful,
    DeploymentPhase::Failed,
];

fn sequences(len: usize) -> Vec<Vec<EntryType>> {
    let mut out = vec![Vec::new()];
    for _ in 0..len {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                EntryType::ALL.iter().map(move |t| {
                    let mut next = prefix.clone();
                    next.push(*t);
                    next
                })
            })
            .collect();
    }
    out
}

#[test]
fn test_terminal_status_and_kill_never_regress() {
    for phase in PHASES {
        for sequence in sequences(3) {
            let mut state = DerivedState::new(phase, true);
            let mut kill = state.kill();
            let mut terminal = state.status();

            for entry_type in &sequence {
                state.apply(*entry_type);

                assert!(state.kill() >= kill, "{:?} {:?}", phase, sequence);
                kill = state.kill();

                if terminal.is_terminal() {
                    assert_eq!(state.status(), terminal, "{:?} {:?}", phase, sequence);
                    assert_eq!(state.animation(), AnimationState::Stopped);
                    assert_eq!(state.kill(), KillAvailability::Removed);
                }
                terminal = state.status();
            }
        }
    }
}

#[test]
fn test_each_entry_applied_twice_matches_once() {
    for phase in PHASES {
        for entry_type in EntryType::ALL {
            let mut once = DerivedState::new(phase, true);
            once.apply(entry_type);

            let mut twice = once.clone();
            let changes = twice.apply(entry_type);

            assert!(changes.is_empty(), "{:?} {}", phase, entry_type);
            assert_eq!(once, twice);
        }
    }
}

#[test]
fn test_first_outcome_wins() {
    let mut state = DerivedState::new(DeploymentPhase::Active, true);
    state.apply(EntryType::DeploymentStart);
    state.apply(EntryType::DeploymentFail);
    state.apply(EntryType::DeploymentSuccess);
    state.apply(EntryType::DeploymentStart);

    assert_eq!(state.status(), StatusLabel::Failed);
    assert_eq!(state.animation(), AnimationState::Stopped);
    assert_eq!(state.kill(), KillAvailability::Removed);
}

#[test]
fn test_missing_kill_control_stays_removed() {
    let mut state = DerivedState::new(DeploymentPhase::Active, false);
    assert_eq!(state.kill(), KillAvailability::Removed);

    let changes = state.apply(EntryType::KillReceived);
    assert_eq!(changes.kill, None);
    assert_eq!(state.kill(), KillAvailability::Removed);
}

#[test]
fn test_output_entries_change_nothing() {
    let mut state = DerivedState::new(DeploymentPhase::New, true);
    let before = state.clone();

    for entry_type in [
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
        assert!(state.apply(entry_type).is_empty(), "{}", entry_type);
    }
    assert_eq!(state, before);
}
