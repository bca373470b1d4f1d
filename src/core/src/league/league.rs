use crate::config::MatchConfig;
use crate::error::{ConfigurationError, MatchError};
use crate::league::{SeasonRecorder, SeasonStore};
use crate::r#match::{MatchResult, MatchSession, TeamRef};
use chrono::NaiveDateTime;
use log::{debug, info};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Fixture {
    pub home: Arc<TeamRef>,
    pub away: Arc<TeamRef>,
    pub kick_off: Option<NaiveDateTime>,
}

impl Fixture {
    pub fn new(home: Arc<TeamRef>, away: Arc<TeamRef>) -> Self {
        Fixture {
            home,
            away,
            kick_off: None,
        }
    }
}

/// A round of fixtures played headlessly.
pub struct Matchday;

impl Matchday {
    /// Plays every fixture in parallel. Fixture `i` is seeded with the matchday
    /// seed plus `i`, so the same config always gives the same results.
    pub fn play(
        fixtures: &[Fixture],
        config: &MatchConfig,
    ) -> Result<Vec<MatchResult>, ConfigurationError> {
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);

        info!("matchday: {} fixtures, seed {}", fixtures.len(), seed);

        fixtures
            .par_iter()
            .enumerate()
            .map(|(index, fixture)| {
                Self::play_fixture(fixture, config, seed.wrapping_add(index as u64))
            })
            .collect()
    }

    /// Plays the round, then records results into `store` one by one in fixture order.
    pub fn play_and_record(
        fixtures: &[Fixture],
        config: &MatchConfig,
        store: &mut dyn SeasonStore,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let results = Self::play(fixtures, config)?;

        for result in &results {
            SeasonRecorder::record(result, store)?;
        }

        Ok(results)
    }

    fn play_fixture(
        fixture: &Fixture,
        config: &MatchConfig,
        seed: u64,
    ) -> Result<MatchResult, ConfigurationError> {
        debug!("play match: {} vs {}", fixture.home.name, fixture.away.name);

        let mut session = MatchSession::new(
            Arc::clone(&fixture.home),
            Arc::clone(&fixture.away),
            config.clone().with_seed(seed),
        );

        if let Some(kick_off) = fixture.kick_off {
            session = session.with_kick_off(kick_off);
        }

        session.run_to_completion()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::SeasonTable;
    use crate::r#match::squad::fixtures::team;

    fn fixtures() -> (Vec<TeamRef>, Vec<Fixture>) {
        let teams: Vec<TeamRef> = (1..=4).map(|id| team(id, 60 + id as u8 * 3, 3)).collect();
        let shared: Vec<Arc<TeamRef>> = teams.iter().cloned().map(Arc::new).collect();

        let fixtures = vec![
            Fixture::new(Arc::clone(&shared[0]), Arc::clone(&shared[1])),
            Fixture::new(Arc::clone(&shared[2]), Arc::clone(&shared[3])),
        ];

        (teams, fixtures)
    }

    #[test]
    fn test_matchday_is_reproducible() {
        let (_, fixtures) = fixtures();
        let config = MatchConfig::default().with_seed(42);

        let first = Matchday::play(&fixtures, &config).unwrap();
        let second = Matchday::play(&fixtures, &config).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_results_keep_fixture_order() {
        let (_, fixtures) = fixtures();
        let results = Matchday::play(&fixtures, &MatchConfig::default().with_seed(7)).unwrap();

        assert_eq!((results[0].home_team_id, results[0].away_team_id), (1, 2));
        assert_eq!((results[1].home_team_id, results[1].away_team_id), (3, 4));
        assert!(results.iter().all(|r| r.duration == 90 && !r.early_terminated));
    }

    #[test]
    fn test_recorded_into_table() {
        let (teams, fixtures) = fixtures();
        let mut table = SeasonTable::new(&teams);

        let config = MatchConfig::default().with_seed(3);
        let results = Matchday::play_and_record(&fixtures, &config, &mut table).unwrap();

        for result in &results {
            let home = table.team(result.home_team_id).unwrap();
            assert_eq!(home.played, 1);
            assert_eq!(home.goals_for, result.home_score as u16);
            assert_eq!(home.points, result.result_for_home.points() as u16);
        }

        let total_goals: u16 = table.standings().iter().map(|r| r.goals_for).sum();
        let scored: u16 = results.iter().map(|r| (r.home_score + r.away_score) as u16).sum();
        assert_eq!(total_goals, scored);
    }

    #[test]
    fn test_short_squad_fails_matchday() {
        let (_, mut fixtures) = fixtures();
        let mut short = team(9, 60, 0);
        short.players.truncate(5);
        fixtures.push(Fixture::new(Arc::new(short), Arc::new(team(8, 60, 0))));

        assert!(Matchday::play(&fixtures, &MatchConfig::default().with_seed(1)).is_err());
    }
}
