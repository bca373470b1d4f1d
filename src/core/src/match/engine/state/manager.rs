use crate::r#match::{ClockMode, MatchStatus};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Prepare,
    Abort,
    Run(ClockMode),
    Pause,
    Resume,
    Complete,
}

/// Owns the session status. Transitions that make no sense from the current
/// status are ignored, which keeps pause/resume/stop idempotent.
#[derive(Debug, Clone)]
pub struct StateManager {
    current_state: MatchStatus,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    pub fn new() -> Self {
        StateManager {
            current_state: MatchStatus::Idle,
        }
    }

    pub fn current(&self) -> MatchStatus {
        self.current_state
    }

    /// Returns `true` when the status changed.
    pub fn apply(&mut self, transition: Transition) -> bool {
        match Self::get_next_state(self.current_state, transition) {
            Some(next_state) => {
                debug!("match state {:?} -> {:?}", self.current_state, next_state);
                self.current_state = next_state;
                true
            }
            None => false,
        }
    }

    fn get_next_state(current_state: MatchStatus, transition: Transition) -> Option<MatchStatus> {
        match (current_state, transition) {
            (MatchStatus::Idle, Transition::Prepare) => Some(MatchStatus::Preparing),
            (MatchStatus::Preparing, Transition::Abort) => Some(MatchStatus::Idle),
            (MatchStatus::Preparing, Transition::Run(mode)) => Some(MatchStatus::Running(mode)),
            (MatchStatus::Running(mode), Transition::Pause) => Some(MatchStatus::Paused(mode)),
            (MatchStatus::Paused(mode), Transition::Resume) => Some(MatchStatus::Running(mode)),
            (MatchStatus::Completed, _) => None,
            (_, Transition::Complete) => Some(MatchStatus::Completed),
            _ => None,
        }
    }
}
