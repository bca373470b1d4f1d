use crate::r#match::events::{EventDetail, Importance, MatchEvent, Side};
use crate::r#match::result::{MatchOutcome, MatchResult, PlayerMatchLine, RatingInput, match_rating};
use crate::r#match::statistics::FinalStats;
use crate::r#match::{Appearance, PlayerId, Position, Score, TeamRef};
use crate::rng::MatchRng;
use chrono::NaiveDateTime;
use itertools::Itertools;
use std::collections::HashMap;

const BASE_ATTENDANCE: f64 = 15_000.0;
const ATTENDANCE_PER_RATING_POINT: f64 = 400.0;

/// Everything about the fixture itself that the result needs besides score, stats and events.
pub struct MatchSheet<'a> {
    pub home: &'a TeamRef,
    pub away: &'a TeamRef,
    pub appearances: [&'a [Appearance]; 2],
    pub duration: u8,
    pub early_terminated: bool,
    pub kicked_off_at: Option<NaiveDateTime>,
}

impl MatchSheet<'_> {
    fn team(&self, side: Side) -> &TeamRef {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

pub struct ResultSynthesizer;

impl ResultSynthesizer {
    /// Pure given its inputs; the only randomness (attendance) comes from `rng`.
    pub fn build(
        sheet: &MatchSheet<'_>,
        score: Score,
        final_stats: FinalStats,
        rng: &mut dyn MatchRng,
    ) -> MatchResult {
        let outcome = MatchOutcome::from_score(&score);

        let key_events: Vec<MatchEvent> = final_stats
            .events
            .iter()
            .filter(|e| e.importance == Importance::High)
            .cloned()
            .collect();

        let player_lines = Self::player_lines(sheet, &final_stats.events, &score);
        let attendance = Self::estimate_attendance(sheet, rng);

        MatchResult {
            home_team_id: sheet.home.id,
            away_team_id: sheet.away.id,
            home_score: score.home,
            away_score: score.away,
            outcome,
            result_for_home: outcome.for_side(Side::Home),
            duration: sheet.duration,
            early_terminated: sheet.early_terminated,
            events: final_stats.events,
            key_events,
            final_stats: final_stats.stats,
            attendance,
            kicked_off_at: sheet.kicked_off_at,
            player_lines,
        }
    }

    fn player_lines(
        sheet: &MatchSheet<'_>,
        events: &[MatchEvent],
        score: &Score,
    ) -> Vec<PlayerMatchLine> {
        let by_player: HashMap<(Side, PlayerId), Vec<&MatchEvent>> =
            events.iter().into_group_map_by(|e| (e.side, e.player_id));

        let assists = events
            .iter()
            .filter_map(|e| match e.detail {
                EventDetail::Goal { assist: Some(assist) } => Some((e.side, assist)),
                _ => None,
            })
            .counts();

        [Side::Home, Side::Away]
            .into_iter()
            .flat_map(|side| {
                let team = sheet.team(side);
                let (team_goals, opponent_goals) = score.for_side(side);

                sheet.appearances[side.index()]
                    .iter()
                    .unique_by(|a| a.player_id)
                    .map(|appearance| {
                        let player_events = by_player
                            .get(&(side, appearance.player_id))
                            .map(Vec::as_slice)
                            .unwrap_or_default();

                        let assisted = assists.get(&(side, appearance.player_id)).copied();

                        let mut input = RatingInput {
                            assists: assisted.unwrap_or_default() as u16,
                            team_goals,
                            opponent_goals,
                            ..RatingInput::default()
                        };
                        let mut fouls = 0;

                        for event in player_events {
                            match event.detail {
                                EventDetail::Goal { .. } => input.goals += 1,
                                EventDetail::Shot { on_target } => {
                                    input.shots += 1;
                                    if on_target {
                                        input.shots_on_target += 1;
                                    }
                                }
                                EventDetail::Foul => fouls += 1,
                                EventDetail::YellowCard => input.yellow_cards += 1,
                                EventDetail::RedCard => input.red_cards += 1,
                                _ => {}
                            }
                        }

                        let position = team
                            .player(appearance.player_id)
                            .map(|p| p.position)
                            .unwrap_or(Position::Midfielder);

                        PlayerMatchLine {
                            player_id: appearance.player_id,
                            team_id: team.id,
                            side,
                            minutes: sheet
                                .appearances[side.index()]
                                .iter()
                                .filter(|a| a.player_id == appearance.player_id)
                                .map(|a| a.minutes(sheet.duration))
                                .sum(),
                            goals: input.goals,
                            assists: input.assists,
                            shots: input.shots,
                            shots_on_target: input.shots_on_target,
                            fouls,
                            yellow_cards: input.yellow_cards,
                            red_cards: input.red_cards,
                            rating: match_rating(&input, position),
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn estimate_attendance(sheet: &MatchSheet<'_>, rng: &mut dyn MatchRng) -> u32 {
        let mean_rating = |team: &TeamRef| {
            if team.players.is_empty() {
                return 0.0;
            }
            let total: f64 = team.players.iter().map(|p| p.overall_rating as f64).sum();
            total / team.players.len() as f64
        };

        let combined = (mean_rating(sheet.home) + mean_rating(sheet.away)) / 2.0;
        let capacity = BASE_ATTENDANCE + combined * ATTENDANCE_PER_RATING_POINT;

        (capacity * (0.75 + 0.25 * rng.next_f64())).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::squad::fixtures::team;
    use crate::r#match::statistics::StatisticsAggregator;
    use crate::r#match::{Lineup, TeamResult};

    struct FixedRng(f64);

    impl MatchRng for FixedRng {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn build(events: Vec<MatchEvent>, score: Score, duration: u8) -> MatchResult {
        let home = team(1, 70, 0);
        let away = team(2, 70, 0);
        let home_lineup = Lineup::from_team(&home, 11);
        let away_lineup = Lineup::from_team(&away, 11);

        let mut stats = StatisticsAggregator::new();
        events.iter().for_each(|e| stats.record(e));

        let sheet = MatchSheet {
            home: &home,
            away: &away,
            appearances: [home_lineup.appearances(), away_lineup.appearances()],
            duration,
            early_terminated: duration < 90,
            kicked_off_at: None,
        };

        ResultSynthesizer::build(&sheet, score, stats.final_snapshot(), &mut FixedRng(0.0))
    }

    #[test]
    fn test_scoreless_draw() {
        let result = build(Vec::new(), Score::new(0, 0), 90);

        assert_eq!(result.result_for_home, TeamResult::Draw);
        assert_eq!(result.duration, 90);
        assert!(!result.early_terminated);
        assert!(result.key_events.is_empty());
        assert_eq!(result.player_lines.len(), 22);
    }

    #[test]
    fn test_key_events_are_high_importance() {
        let events = vec![
            MatchEvent::goal(10, Side::Home, 110),
            MatchEvent::new(20, Side::Away, 203, EventDetail::Foul),
            MatchEvent::new(30, Side::Away, 203, EventDetail::RedCard),
        ];
        let result = build(events, Score::new(1, 0), 90);

        let minutes: Vec<u8> = result.key_events.iter().map(|e| e.minute).collect();
        assert_eq!(minutes, vec![10, 30]);
        assert_eq!(result.summary_for(Side::Home), "W 1-0");
        assert_eq!(result.summary_for(Side::Away), "L 0-1");
    }

    #[test]
    fn test_player_lines_count_goals_and_assists() {
        let events = vec![
            MatchEvent::new(10, Side::Home, 110, EventDetail::Goal { assist: Some(107) }),
            MatchEvent::new(40, Side::Home, 110, EventDetail::Shot { on_target: true }),
        ];
        let result = build(events, Score::new(1, 0), 90);

        let scorer = result.player_line(110).unwrap();
        assert_eq!(scorer.goals, 1);
        assert_eq!(scorer.shots, 1);
        assert_eq!(scorer.minutes, 90);
        assert!(scorer.rating > 6.0);

        assert_eq!(result.player_line(107).unwrap().assists, 1);
        assert_eq!(result.player_of_the_match().map(|l| l.player_id), Some(110));
    }

    #[test]
    fn test_attendance_from_injected_rng() {
        let low = build(Vec::new(), Score::new(0, 0), 90).attendance;
        assert_eq!(low, ((15_000.0 + 70.0 * 400.0) * 0.75f64).round() as u32);
    }

    #[test]
    fn test_early_stop_duration() {
        let result = build(vec![MatchEvent::goal(12, Side::Home, 110)], Score::new(1, 0), 30);
        assert_eq!(result.duration, 30);
        assert!(result.early_terminated);
        assert_eq!(result.player_line(101).unwrap().minutes, 30);
    }
}
