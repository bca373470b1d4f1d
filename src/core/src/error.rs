use crate::r#match::{EventKind, Side};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Raised synchronously from `start()`; fatal to that start attempt only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("visual mode requires a render surface")]
    MissingRenderSurface,

    #[error("{side} side has {available} eligible players, at least {required} required")]
    NotEnoughPlayers {
        side: Side,
        available: usize,
        required: usize,
    },

    #[error("speed multiplier {0} is out of range 1..={1}")]
    InvalidSpeed(u32, u32),

    #[error("a clocked match needs a running tokio runtime")]
    NoRuntime,
}

/// An observer failed while handling a dispatched event. Logged, never propagated.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("observer failed on {kind:?} at minute {minute}: {message}")]
pub struct RuntimeEventError {
    pub kind: EventKind,
    pub minute: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("score for {side} is {score} but {goal_events} goal events were logged")]
    ScoreMismatch {
        side: Side,
        score: u8,
        goal_events: usize,
    },

    #[error("statistics count {stat_goals} goals for {side} but score is {score}")]
    StatsMismatch {
        side: Side,
        score: u8,
        stat_goals: u16,
    },

    #[error("minute regressed from {from} to {to}")]
    MinuteRegression { from: u8, to: u8 },

    #[error("possession sums to {0}%")]
    PossessionSum(u16),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PersistenceError {
    #[error("unknown team {0}")]
    UnknownTeam(u32),

    #[error("unknown player {0}")]
    UnknownPlayer(u32),

    #[error("store rejected update: {0}")]
    Rejected(String),
}
