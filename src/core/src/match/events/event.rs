use crate::r#match::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Home => 0,
            Side::Away => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Payload-free discriminant of [`EventDetail`], used to index probability tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Goal,
    Shot,
    Foul,
    YellowCard,
    RedCard,
    Corner,
    Offside,
    Substitution,
    Injury,
}

impl EventKind {
    /// Walk order of the per-minute draw. Changing it changes every seeded match.
    pub const ORDERED: [EventKind; 9] = [
        EventKind::Goal,
        EventKind::Shot,
        EventKind::Foul,
        EventKind::YellowCard,
        EventKind::RedCard,
        EventKind::Corner,
        EventKind::Offside,
        EventKind::Substitution,
        EventKind::Injury,
    ];

    pub const COUNT: usize = 9;

    #[inline]
    pub fn index(self) -> usize {
        match self {
            EventKind::Goal => 0,
            EventKind::Shot => 1,
            EventKind::Foul => 2,
            EventKind::YellowCard => 3,
            EventKind::RedCard => 4,
            EventKind::Corner => 5,
            EventKind::Offside => 6,
            EventKind::Substitution => 7,
            EventKind::Injury => 8,
        }
    }

    /// Whether the event belongs to the side out of possession.
    pub fn is_defensive(self) -> bool {
        matches!(
            self,
            EventKind::Foul | EventKind::YellowCard | EventKind::RedCard
        )
    }

    pub fn is_card(self) -> bool {
        matches!(self, EventKind::YellowCard | EventKind::RedCard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Importance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDetail {
    Goal { assist: Option<PlayerId> },
    Shot { on_target: bool },
    Foul,
    YellowCard,
    RedCard,
    Corner,
    Offside,
    Substitution { player_in: Option<PlayerId> },
    Injury,
}

impl EventDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetail::Goal { .. } => EventKind::Goal,
            EventDetail::Shot { .. } => EventKind::Shot,
            EventDetail::Foul => EventKind::Foul,
            EventDetail::YellowCard => EventKind::YellowCard,
            EventDetail::RedCard => EventKind::RedCard,
            EventDetail::Corner => EventKind::Corner,
            EventDetail::Offside => EventKind::Offside,
            EventDetail::Substitution { .. } => EventKind::Substitution,
            EventDetail::Injury => EventKind::Injury,
        }
    }

    pub fn importance(&self) -> Importance {
        match self {
            EventDetail::Goal { .. } | EventDetail::RedCard => Importance::High,
            EventDetail::Shot { on_target: true }
            | EventDetail::YellowCard
            | EventDetail::Substitution { .. }
            | EventDetail::Injury => Importance::Medium,
            EventDetail::Shot { on_target: false }
            | EventDetail::Foul
            | EventDetail::Corner
            | EventDetail::Offside => Importance::Low,
        }
    }
}

/// One discrete in-match occurrence. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub minute: u8,
    pub side: Side,
    pub player_id: PlayerId,
    pub detail: EventDetail,
    pub importance: Importance,
}

impl MatchEvent {
    pub fn new(minute: u8, side: Side, player_id: PlayerId, detail: EventDetail) -> Self {
        MatchEvent {
            minute,
            side,
            player_id,
            importance: detail.importance(),
            detail,
        }
    }

    pub fn goal(minute: u8, side: Side, player_id: PlayerId) -> Self {
        Self::new(minute, side, player_id, EventDetail::Goal { assist: None })
    }

    #[inline]
    pub fn kind(&self) -> EventKind {
        self.detail.kind()
    }

    #[inline]
    pub fn is_goal(&self) -> bool {
        self.kind() == EventKind::Goal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_matches_index() {
        for (i, kind) in EventKind::ORDERED.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_importance_tiers() {
        assert_eq!(MatchEvent::goal(10, Side::Home, 1).importance, Importance::High);
        assert_eq!(
            MatchEvent::new(10, Side::Home, 1, EventDetail::RedCard).importance,
            Importance::High
        );
        assert_eq!(
            MatchEvent::new(10, Side::Home, 1, EventDetail::Shot { on_target: true }).importance,
            Importance::Medium
        );
        assert_eq!(
            MatchEvent::new(10, Side::Home, 1, EventDetail::Corner).importance,
            Importance::Low
        );
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Home.opponent(), Side::Away);
        assert_eq!(Side::Away.opponent(), Side::Home);
        assert_eq!(Side::Home.to_string(), "home");
    }
}
