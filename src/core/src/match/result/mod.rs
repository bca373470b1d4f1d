pub mod rating;
pub mod synthesizer;

pub use rating::*;
pub use synthesizer::*;

use crate::r#match::events::{MatchEvent, Side};
use crate::r#match::statistics::StatsSnapshot;
use crate::r#match::{PlayerId, Score, TeamId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl MatchOutcome {
    pub fn from_score(score: &Score) -> Self {
        if score.home > score.away {
            MatchOutcome::HomeWin
        } else if score.home < score.away {
            MatchOutcome::AwayWin
        } else {
            MatchOutcome::Draw
        }
    }

    pub fn for_side(&self, side: Side) -> TeamResult {
        match (self, side) {
            (MatchOutcome::Draw, _) => TeamResult::Draw,
            (MatchOutcome::HomeWin, Side::Home) | (MatchOutcome::AwayWin, Side::Away) => {
                TeamResult::Win
            }
            _ => TeamResult::Loss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamResult {
    Win,
    Draw,
    Loss,
}

impl TeamResult {
    pub fn points(&self) -> u8 {
        match self {
            TeamResult::Win => 3,
            TeamResult::Draw => 1,
            TeamResult::Loss => 0,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            TeamResult::Win => 'W',
            TeamResult::Draw => 'D',
            TeamResult::Loss => 'L',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchLine {
    pub player_id: PlayerId,
    pub team_id: TeamId,
    pub side: Side,
    pub minutes: u8,
    pub goals: u16,
    pub assists: u16,
    pub shots: u16,
    pub shots_on_target: u16,
    pub fouls: u16,
    pub yellow_cards: u16,
    pub red_cards: u16,
    pub rating: f32,
}

/// Immutable summary of a finished session. Built at most once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: u8,
    pub away_score: u8,
    pub outcome: MatchOutcome,
    pub result_for_home: TeamResult,
    /// Minutes played; below 90 when the match was stopped early.
    pub duration: u8,
    pub early_terminated: bool,
    pub events: Vec<MatchEvent>,
    pub key_events: Vec<MatchEvent>,
    pub final_stats: StatsSnapshot,
    pub attendance: u32,
    pub kicked_off_at: Option<NaiveDateTime>,
    pub player_lines: Vec<PlayerMatchLine>,
}

impl MatchResult {
    pub fn score(&self) -> Score {
        Score::new(self.home_score, self.away_score)
    }

    pub fn team_id(&self, side: Side) -> TeamId {
        match side {
            Side::Home => self.home_team_id,
            Side::Away => self.away_team_id,
        }
    }

    pub fn result_for(&self, side: Side) -> TeamResult {
        self.outcome.for_side(side)
    }

    /// `"W 2-1"` from the point of view of `side`: own goals first.
    pub fn summary_for(&self, side: Side) -> String {
        let (scored, conceded) = self.score().for_side(side);
        format!("{} {}-{}", self.result_for(side).letter(), scored, conceded)
    }

    pub fn player_line(&self, player_id: PlayerId) -> Option<&PlayerMatchLine> {
        self.player_lines.iter().find(|l| l.player_id == player_id)
    }

    /// Highest rated player, ties broken by the lower player id.
    pub fn player_of_the_match(&self) -> Option<&PlayerMatchLine> {
        self.player_lines.iter().max_by(|a, b| {
            a.rating
                .total_cmp(&b.rating)
                .then_with(|| b.player_id.cmp(&a.player_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        assert_eq!(MatchOutcome::from_score(&Score::new(2, 1)), MatchOutcome::HomeWin);
        assert_eq!(MatchOutcome::from_score(&Score::new(0, 1)), MatchOutcome::AwayWin);
        assert_eq!(MatchOutcome::from_score(&Score::new(0, 0)), MatchOutcome::Draw);
    }

    #[test]
    fn test_outcome_is_symmetric() {
        let outcome = MatchOutcome::HomeWin;
        assert_eq!(outcome.for_side(Side::Home), TeamResult::Win);
        assert_eq!(outcome.for_side(Side::Away), TeamResult::Loss);
        assert_eq!(MatchOutcome::Draw.for_side(Side::Away), TeamResult::Draw);
    }
}
