use crate::error::PersistenceError;
use crate::r#match::{PlayerId, TeamId, TeamResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Card {
    Yellow,
    Red,
}

/// One match worth of change to a team's season record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSeasonDelta {
    pub result: TeamResult,
    pub goals_for: u8,
    pub goals_against: u8,
}

impl TeamSeasonDelta {
    pub fn points(&self) -> u8 {
        self.result.points()
    }
}

/// Everything one finished match changes in the season, staged before any write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonUpdate {
    pub teams: Vec<(TeamId, TeamSeasonDelta)>,
    pub minutes: Vec<(PlayerId, TeamId, u8)>,
    pub goals: Vec<(PlayerId, TeamId)>,
    pub cards: Vec<(PlayerId, TeamId, Card)>,
}

impl SeasonUpdate {
    /// Every team and player the update touches, with the team they play for.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, TeamId)> + '_ {
        self.minutes
            .iter()
            .map(|(player_id, team_id, _)| (*player_id, *team_id))
            .chain(self.goals.iter().copied())
            .chain(self.cards.iter().map(|(player_id, team_id, _)| (*player_id, *team_id)))
    }
}

/// Season bookkeeping owned by the world layer. Every call is synchronous and
/// either applies fully or fails. `validate` is checked before the first write
/// of a match; once it passes, every call of that update must succeed.
pub trait SeasonStore: Send + Sync {
    fn validate(&self, update: &SeasonUpdate) -> Result<(), PersistenceError>;

    fn record_result(
        &mut self,
        team_id: TeamId,
        delta: &TeamSeasonDelta,
    ) -> Result<(), PersistenceError>;

    fn record_player_goal(
        &mut self,
        player_id: PlayerId,
        team_id: TeamId,
    ) -> Result<(), PersistenceError>;

    fn record_player_card(
        &mut self,
        player_id: PlayerId,
        team_id: TeamId,
        card: Card,
    ) -> Result<(), PersistenceError>;

    fn record_player_minutes(
        &mut self,
        player_id: PlayerId,
        team_id: TeamId,
        minutes: u8,
    ) -> Result<(), PersistenceError>;

    fn resort_standings(&mut self) -> Result<(), PersistenceError>;
}
