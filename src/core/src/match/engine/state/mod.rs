pub mod manager;

pub use manager::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockMode {
    /// Frame-driven, rendered through a render surface.
    Visual,
    /// Headless, advanced in fixed minute batches.
    Simulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Idle,
    Preparing,
    Running(ClockMode),
    Paused(ClockMode),
    Completed,
}

impl MatchStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, MatchStatus::Running(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, MatchStatus::Completed)
    }

    pub fn mode(&self) -> Option<ClockMode> {
        match self {
            MatchStatus::Running(mode) | MatchStatus::Paused(mode) => Some(*mode),
            _ => None,
        }
    }
}
