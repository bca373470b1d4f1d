use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub type TeamId = u32;
pub type PlayerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Position::Goalkeeper => 0,
            Position::Defender => 1,
            Position::Midfielder => 2,
            Position::Forward => 3,
        }
    }

    pub fn is_attacking(self) -> bool {
        matches!(self, Position::Midfielder | Position::Forward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    /// 1..=20
    pub aggression: f32,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        PlayerAttributes { aggression: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub attributes: PlayerAttributes,
    pub overall_rating: u8,
    #[serde(default = "available_by_default")]
    pub is_available: bool,
}

fn available_by_default() -> bool {
    true
}

impl PlayerRef {
    pub fn new(id: PlayerId, name: &str, position: Position, overall_rating: u8) -> Self {
        PlayerRef {
            id,
            name: String::from(name),
            position,
            attributes: PlayerAttributes::default(),
            overall_rating,
            is_available: true,
        }
    }

    pub fn with_aggression(mut self, aggression: f32) -> Self {
        self.attributes.aggression = aggression;
        self
    }
}

/// Read-only team view supplied by the world layer. Players are ordered: starters first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<PlayerRef>,
}

impl TeamRef {
    pub fn new(id: TeamId, name: &str, players: Vec<PlayerRef>) -> Self {
        TeamRef {
            id,
            name: String::from(name),
            players,
        }
    }

    pub fn eligible_players(&self) -> impl Iterator<Item = &PlayerRef> {
        self.players.iter().filter(|p| p.is_available)
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerRef> {
        self.players.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub player_id: PlayerId,
    pub from_minute: u8,
    pub until_minute: Option<u8>,
}

impl Appearance {
    pub fn minutes(&self, final_minute: u8) -> u8 {
        self.until_minute
            .unwrap_or(final_minute)
            .saturating_sub(self.from_minute)
    }
}

/// Who is on the pitch for one side, updated as substitutions and red cards happen.
#[derive(Debug, Clone)]
pub struct Lineup {
    pub team_id: TeamId,
    on_pitch: Vec<PlayerRef>,
    bench: VecDeque<PlayerRef>,
    sent_off: Vec<PlayerId>,
    appearances: Vec<Appearance>,
}

impl Lineup {
    pub fn from_team(team: &TeamRef, starters: usize) -> Self {
        let mut eligible: VecDeque<PlayerRef> = team.eligible_players().cloned().collect();

        let on_pitch: Vec<PlayerRef> = (0..starters).filter_map(|_| eligible.pop_front()).collect();

        let appearances = on_pitch
            .iter()
            .map(|p| Appearance {
                player_id: p.id,
                from_minute: 0,
                until_minute: None,
            })
            .collect();

        Lineup {
            team_id: team.id,
            on_pitch,
            bench: eligible,
            sent_off: Vec::new(),
            appearances,
        }
    }

    pub fn on_pitch(&self) -> &[PlayerRef] {
        &self.on_pitch
    }

    pub fn sent_off(&self) -> &[PlayerId] {
        &self.sent_off
    }

    pub fn appearances(&self) -> &[Appearance] {
        &self.appearances
    }

    pub fn next_substitute(&self) -> Option<&PlayerRef> {
        self.bench.front()
    }

    /// Mean overall rating of the players currently on the pitch.
    pub fn strength(&self) -> f32 {
        if self.on_pitch.is_empty() {
            return 0.0;
        }

        let total: u32 = self.on_pitch.iter().map(|p| p.overall_rating as u32).sum();
        total as f32 / self.on_pitch.len() as f32
    }

    pub fn is_on_pitch(&self, player_id: PlayerId) -> bool {
        self.on_pitch.iter().any(|p| p.id == player_id)
    }

    /// Replaces `player_out` with the next bench player. Returns the incoming player id.
    pub fn substitute(&mut self, player_out: PlayerId, minute: u8) -> Option<PlayerId> {
        let slot = self.on_pitch.iter().position(|p| p.id == player_out)?;
        let incoming = self.bench.pop_front()?;
        let incoming_id = incoming.id;

        self.close_appearance(player_out, minute);
        self.appearances.push(Appearance {
            player_id: incoming_id,
            from_minute: minute,
            until_minute: None,
        });
        self.on_pitch[slot] = incoming;

        Some(incoming_id)
    }

    pub fn send_off(&mut self, player_id: PlayerId, minute: u8) {
        if let Some(slot) = self.on_pitch.iter().position(|p| p.id == player_id) {
            self.on_pitch.remove(slot);
            self.sent_off.push(player_id);
            self.close_appearance(player_id, minute);
        }
    }

    fn close_appearance(&mut self, player_id: PlayerId, minute: u8) {
        if let Some(appearance) = self
            .appearances
            .iter_mut()
            .rev()
            .find(|a| a.player_id == player_id && a.until_minute.is_none())
        {
            appearance.until_minute = Some(minute);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::team;
    use super::*;

    #[test]
    fn test_lineup_takes_first_eleven() {
        let lineup = Lineup::from_team(&team(1, 70, 3), 11);
        assert_eq!(lineup.on_pitch().len(), 11);
        assert_eq!(lineup.next_substitute().map(|p| p.id), Some(112));
    }

    #[test]
    fn test_unavailable_players_skipped() {
        let mut t = team(1, 70, 1);
        t.players[0].is_available = false;

        let lineup = Lineup::from_team(&t, 11);
        assert!(!lineup.is_on_pitch(101));
        assert!(lineup.next_substitute().is_none());
    }

    #[test]
    fn test_substitution_swaps_and_tracks_minutes() {
        let mut lineup = Lineup::from_team(&team(1, 70, 1), 11);

        assert_eq!(lineup.substitute(110, 60), Some(112));
        assert!(!lineup.is_on_pitch(110));
        assert!(lineup.is_on_pitch(112));
        assert_eq!(lineup.on_pitch().len(), 11);

        let out = lineup.appearances().iter().find(|a| a.player_id == 110).unwrap();
        let on = lineup.appearances().iter().find(|a| a.player_id == 112).unwrap();
        assert_eq!(out.minutes(90), 60);
        assert_eq!(on.minutes(90), 30);
    }

    #[test]
    fn test_substitution_with_empty_bench() {
        let mut lineup = Lineup::from_team(&team(1, 70, 0), 11);
        assert_eq!(lineup.substitute(110, 60), None);
        assert!(lineup.is_on_pitch(110));
    }

    #[test]
    fn test_send_off_shrinks_side() {
        let mut lineup = Lineup::from_team(&team(1, 70, 0), 11);
        lineup.send_off(103, 20);

        assert_eq!(lineup.on_pitch().len(), 10);
        assert_eq!(lineup.sent_off(), &[103]);
    }

    #[test]
    fn test_strength_is_mean_rating() {
        let mut t = team(1, 60, 0);
        t.players[0].overall_rating = 82;

        let lineup = Lineup::from_team(&t, 11);
        assert!((lineup.strength() - 62.0).abs() < 1e-4);
    }
}
