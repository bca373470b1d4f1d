use crate::error::PersistenceError;
use crate::league::{Card, SeasonStore, SeasonUpdate, TeamSeasonDelta};
use crate::r#match::{PlayerId, TeamId, TeamRef, TeamResult};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

const FORM_LENGTH: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamSeasonRecord {
    pub team_id: TeamId,
    pub name: String,
    pub played: u16,
    pub won: u16,
    pub drawn: u16,
    pub lost: u16,
    pub goals_for: u16,
    pub goals_against: u16,
    pub points: u16,
    form: VecDeque<TeamResult>,
}

impl TeamSeasonRecord {
    pub fn new(team_id: TeamId, name: &str) -> Self {
        TeamSeasonRecord {
            team_id,
            name: String::from(name),
            ..TeamSeasonRecord::default()
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    /// Last five results, most recent last, e.g. `"WWDLW"`.
    pub fn form(&self) -> String {
        self.form.iter().map(|r| r.letter()).collect()
    }

    fn apply(&mut self, delta: &TeamSeasonDelta) {
        self.played += 1;
        self.goals_for += delta.goals_for as u16;
        self.goals_against += delta.goals_against as u16;
        self.points += delta.points() as u16;

        match delta.result {
            TeamResult::Win => self.won += 1,
            TeamResult::Draw => self.drawn += 1,
            TeamResult::Loss => self.lost += 1,
        }

        if self.form.len() == FORM_LENGTH {
            self.form.pop_front();
        }
        self.form.push_back(delta.result);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerSeasonStats {
    pub team_id: TeamId,
    pub appearances: u16,
    pub minutes: u32,
    pub goals: u16,
    pub yellow_cards: u16,
    pub red_cards: u16,
}

impl PlayerSeasonStats {
    pub fn goals_per_90(&self) -> f32 {
        if self.minutes == 0 {
            return 0.0;
        }
        self.goals as f32 * 90.0 / self.minutes as f32
    }
}

/// In-memory season store: team records, player totals and sorted standings.
#[derive(Debug, Clone, Default)]
pub struct SeasonTable {
    teams: HashMap<TeamId, TeamSeasonRecord>,
    players: HashMap<PlayerId, PlayerSeasonStats>,
    standings: Vec<TeamId>,
}

impl SeasonTable {
    pub fn new(teams: &[TeamRef]) -> Self {
        let mut table = SeasonTable::default();

        for team in teams {
            table.teams.insert(team.id, TeamSeasonRecord::new(team.id, &team.name));
            for player in &team.players {
                table.players.insert(
                    player.id,
                    PlayerSeasonStats {
                        team_id: team.id,
                        ..PlayerSeasonStats::default()
                    },
                );
            }
        }

        table.sort();
        table
    }

    pub fn team(&self, team_id: TeamId) -> Option<&TeamSeasonRecord> {
        self.teams.get(&team_id)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerSeasonStats> {
        self.players.get(&player_id)
    }

    /// Team records in table order.
    pub fn standings(&self) -> Vec<&TeamSeasonRecord> {
        self.standings.iter().filter_map(|id| self.teams.get(id)).collect()
    }

    /// Top `count` scorers, ties broken by fewer minutes then player id.
    pub fn top_scorers(&self, count: usize) -> Vec<(PlayerId, &PlayerSeasonStats)> {
        let mut scorers: Vec<(PlayerId, &PlayerSeasonStats)> = self
            .players
            .iter()
            .filter(|(_, stats)| stats.goals > 0)
            .map(|(id, stats)| (*id, stats))
            .collect();

        scorers.sort_by(|(a_id, a), (b_id, b)| {
            b.goals
                .cmp(&a.goals)
                .then(a.minutes.cmp(&b.minutes))
                .then(a_id.cmp(b_id))
        });
        scorers.truncate(count);
        scorers
    }

    fn sort(&mut self) {
        let teams = &self.teams;
        let mut ids: Vec<TeamId> = teams.keys().copied().collect();

        ids.sort_by(|a, b| {
            let (ra, rb) = (&teams[a], &teams[b]);
            rb.points
                .cmp(&ra.points)
                .then(rb.goal_difference().cmp(&ra.goal_difference()))
                .then(rb.goals_for.cmp(&ra.goals_for))
                .then(a.cmp(b))
        });

        self.standings = ids;
    }

    fn player_mut(
        &mut self,
        player_id: PlayerId,
        team_id: TeamId,
    ) -> Result<&mut PlayerSeasonStats, PersistenceError> {
        match self.players.get_mut(&player_id) {
            Some(stats) if stats.team_id == team_id => Ok(stats),
            _ => Err(PersistenceError::UnknownPlayer(player_id)),
        }
    }
}

impl SeasonStore for SeasonTable {
    fn validate(&self, update: &SeasonUpdate) -> Result<(), PersistenceError> {
        let unknown_team = update.teams.iter().find(|(id, _)| !self.teams.contains_key(id));
        if let Some((team_id, _)) = unknown_team {
            return Err(PersistenceError::UnknownTeam(*team_id));
        }

        for (player_id, team_id) in update.players() {
            match self.players.get(&player_id) {
                Some(stats) if stats.team_id == team_id => {}
                _ => return Err(PersistenceError::UnknownPlayer(player_id)),
            }
        }

        Ok(())
    }

    fn record_result(
        &mut self,
        team_id: TeamId,
        delta: &TeamSeasonDelta,
    ) -> Result<(), PersistenceError> {
        self.teams
            .get_mut(&team_id)
            .ok_or(PersistenceError::UnknownTeam(team_id))?
            .apply(delta);
        Ok(())
    }

    fn record_player_goal(
        &mut self,
        player_id: PlayerId,
        team_id: TeamId,
    ) -> Result<(), PersistenceError> {
        self.player_mut(player_id, team_id)?.goals += 1;
        Ok(())
    }

    fn record_player_card(
        &mut self,
        player_id: PlayerId,
        team_id: TeamId,
        card: Card,
    ) -> Result<(), PersistenceError> {
        let stats = self.player_mut(player_id, team_id)?;
        match card {
            Card::Yellow => stats.yellow_cards += 1,
            Card::Red => stats.red_cards += 1,
        }
        Ok(())
    }

    fn record_player_minutes(
        &mut self,
        player_id: PlayerId,
        team_id: TeamId,
        minutes: u8,
    ) -> Result<(), PersistenceError> {
        let stats = self.player_mut(player_id, team_id)?;
        stats.appearances += 1;
        stats.minutes += minutes as u32;
        Ok(())
    }

    fn resort_standings(&mut self) -> Result<(), PersistenceError> {
        self.sort();
        Ok(())
    }
}
