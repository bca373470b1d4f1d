use crate::error::PersistenceError;
use crate::league::{Card, SeasonStore, SeasonUpdate, TeamSeasonDelta};
use crate::r#match::{EventDetail, MatchResult, Side};
use log::{debug, error};

/// Pushes a finished match into the season stores.
pub struct SeasonRecorder;

impl SeasonRecorder {
    /// Stages team records, player minutes, goals and cards, has the store
    /// validate them, then applies them and resorts the standings. A rejected
    /// update leaves the store untouched.
    pub fn record(
        result: &MatchResult,
        store: &mut dyn SeasonStore,
    ) -> Result<(), PersistenceError> {
        let update = Self::stage(result);

        Self::commit(&update, store).inspect_err(|e| {
            error!(
                "recording {} vs {} failed: {}",
                result.home_team_id, result.away_team_id, e
            );
        })?;

        debug!(
            "recorded {} {} {}",
            result.home_team_id,
            result.score(),
            result.away_team_id
        );

        Ok(())
    }

    pub fn stage(result: &MatchResult) -> SeasonUpdate {
        let mut update = SeasonUpdate::default();

        for side in [Side::Home, Side::Away] {
            let (goals_for, goals_against) = result.score().for_side(side);

            update.teams.push((
                result.team_id(side),
                TeamSeasonDelta {
                    result: result.result_for(side),
                    goals_for,
                    goals_against,
                },
            ));
        }

        update.minutes = result
            .player_lines
            .iter()
            .map(|line| (line.player_id, line.team_id, line.minutes))
            .collect();

        for event in &result.events {
            let team_id = result.team_id(event.side);

            match event.detail {
                EventDetail::Goal { .. } => update.goals.push((event.player_id, team_id)),
                EventDetail::YellowCard => {
                    update.cards.push((event.player_id, team_id, Card::Yellow))
                }
                EventDetail::RedCard => update.cards.push((event.player_id, team_id, Card::Red)),
                _ => {}
            }
        }

        update
    }

    fn commit(update: &SeasonUpdate, store: &mut dyn SeasonStore) -> Result<(), PersistenceError> {
        store.validate(update)?;

        for (team_id, delta) in &update.teams {
            store.record_result(*team_id, delta)?;
        }
        for (player_id, team_id, minutes) in &update.minutes {
            store.record_player_minutes(*player_id, *team_id, *minutes)?;
        }
        for (player_id, team_id) in &update.goals {
            store.record_player_goal(*player_id, *team_id)?;
        }
        for (player_id, team_id, card) in &update.cards {
            store.record_player_card(*player_id, *team_id, *card)?;
        }

        store.resort_standings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::SeasonTable;
    use crate::r#match::squad::fixtures::team;
    use crate::r#match::{PlayerId, TeamId};

    #[derive(Default)]
    struct CallLog {
        calls: Vec<String>,
        read_only: bool,
    }

    impl SeasonStore for CallLog {
        fn validate(&self, _update: &SeasonUpdate) -> Result<(), PersistenceError> {
            if self.read_only {
                return Err(PersistenceError::Rejected(String::from("read only")));
            }
            Ok(())
        }

        fn record_result(
            &mut self,
            team_id: TeamId,
            delta: &TeamSeasonDelta,
        ) -> Result<(), PersistenceError> {
            self.calls.push(format!("result {} {:?}", team_id, delta.result));
            Ok(())
        }

        fn record_player_goal(
            &mut self,
            player_id: PlayerId,
            _team_id: TeamId,
        ) -> Result<(), PersistenceError> {
            self.calls.push(format!("goal {}", player_id));
            Ok(())
        }

        fn record_player_card(
            &mut self,
            player_id: PlayerId,
            _team_id: TeamId,
            card: Card,
        ) -> Result<(), PersistenceError> {
            self.calls.push(format!("card {} {:?}", player_id, card));
            Ok(())
        }

        fn record_player_minutes(
            &mut self,
            _player_id: PlayerId,
            _team_id: TeamId,
            _minutes: u8,
        ) -> Result<(), PersistenceError> {
            Ok(())
        }

        fn resort_standings(&mut self) -> Result<(), PersistenceError> {
            self.calls.push(String::from("resort"));
            Ok(())
        }
    }

    fn result() -> MatchResult {
        use crate::r#match::statistics::StatisticsAggregator;
        use crate::r#match::{MatchEvent, MatchOutcome, TeamResult};

        let events = vec![
            MatchEvent::goal(10, Side::Home, 110),
            MatchEvent::new(30, Side::Away, 203, EventDetail::YellowCard),
        ];
        let mut stats = StatisticsAggregator::new();
        events.iter().for_each(|e| stats.record(e));

        MatchResult {
            home_team_id: 1,
            away_team_id: 2,
            home_score: 1,
            away_score: 0,
            outcome: MatchOutcome::HomeWin,
            result_for_home: TeamResult::Win,
            duration: 90,
            early_terminated: false,
            key_events: vec![events[0].clone()],
            events,
            final_stats: stats.snapshot(),
            attendance: 30_000,
            kicked_off_at: None,
            player_lines: Vec::new(),
        }
    }

    #[test]
    fn test_calls_in_order() {
        let mut store = CallLog::default();
        SeasonRecorder::record(&result(), &mut store).unwrap();

        assert_eq!(
            store.calls,
            vec!["result 1 Win", "result 2 Loss", "goal 110", "card 203 Yellow", "resort"]
        );
    }

    #[test]
    fn test_rejected_update_writes_nothing() {
        let mut store = CallLog {
            read_only: true,
            ..CallLog::default()
        };

        let error = SeasonRecorder::record(&result(), &mut store).unwrap_err();
        assert_eq!(error, PersistenceError::Rejected(String::from("read only")));
        assert!(store.calls.is_empty());
    }

    #[test]
    fn test_unknown_opponent_leaves_table_unchanged() {
        let mut table = SeasonTable::new(&[team(1, 70, 0)]);

        let error = SeasonRecorder::record(&result(), &mut table).unwrap_err();
        assert_eq!(error, PersistenceError::UnknownTeam(2));

        let record = table.team(1).unwrap();
        assert_eq!(record.played, 0);
        assert_eq!(record.points, 0);
        assert_eq!(table.player(110).unwrap().goals, 0);
    }

    #[test]
    fn test_stage_collects_the_whole_match() {
        let update = SeasonRecorder::stage(&result());

        assert_eq!(update.teams.len(), 2);
        assert_eq!(update.teams[1].0, 2);
        assert_eq!(update.teams[1].1.goals_against, 1);
        assert_eq!(update.goals, vec![(110, 1)]);
        assert_eq!(update.cards, vec![(203, 2, Card::Yellow)]);
    }
}
