use crate::config::{MATCH_MINUTES, MatchConfig};
use crate::error::{ConfigurationError, InvariantViolation};
use crate::r#match::events::{
    EventDetail, EventGenerator, EventSource, GenerationContext, MatchEvent, Side,
};
use crate::r#match::result::{MatchResult, MatchSheet, ResultSynthesizer};
use crate::r#match::statistics::{StatisticsAggregator, StatsSnapshot};
use crate::r#match::{ClockMode, Lineup, MatchStatus, Score, StateManager, TeamRef, Transition};
use crate::rng::{MatchRng, SeededRng};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

const MIN_POSSESSION_CHANCE: f64 = 0.35;
const MAX_POSSESSION_CHANCE: f64 = 0.65;

/// What happened in one processed minute.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteTick {
    pub minute: u8,
    pub event: Option<MatchEvent>,
    pub score: Score,
    pub completed: bool,
}

/// Point-in-time copy of the session for readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub status: MatchStatus,
    pub minute: u8,
    pub score: Score,
    pub events: Vec<MatchEvent>,
    pub stats: StatsSnapshot,
}

/// All mutable state of one match. Every change goes through `advance_minute`,
/// `apply_event` or the lifecycle methods, so a single lock around the session
/// is enough to keep ticks from interleaving.
pub struct MatchSession {
    home: Arc<TeamRef>,
    away: Arc<TeamRef>,
    config: MatchConfig,
    state: StateManager,
    minute: u8,
    score: Score,
    event_log: Vec<MatchEvent>,
    lineups: [Lineup; 2],
    statistics: StatisticsAggregator,
    source: Box<dyn EventSource>,
    rng: Box<dyn MatchRng>,
    speed: u32,
    early_terminated: bool,
    kicked_off_at: Option<NaiveDateTime>,
    result: Option<MatchResult>,
}

impl MatchSession {
    pub fn new(home: Arc<TeamRef>, away: Arc<TeamRef>, config: MatchConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SeededRng::new(seed),
            None => SeededRng::from_entropy(),
        };
        debug!("session {} vs {} seeded with {}", home.name, away.name, rng.seed());

        let lineups = [
            Lineup::from_team(&home, config.min_players),
            Lineup::from_team(&away, config.min_players),
        ];

        MatchSession {
            home,
            away,
            config,
            state: StateManager::new(),
            minute: 0,
            score: Score::default(),
            event_log: Vec::new(),
            lineups,
            statistics: StatisticsAggregator::new(),
            source: Box::new(EventGenerator::new()),
            rng: Box::new(rng),
            speed: 1,
            early_terminated: false,
            kicked_off_at: None,
            result: None,
        }
    }

    pub fn with_rng(mut self, rng: Box<dyn MatchRng>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_event_source(mut self, source: Box<dyn EventSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_kick_off(mut self, kicked_off_at: NaiveDateTime) -> Self {
        self.kicked_off_at = Some(kicked_off_at);
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn team(&self, side: Side) -> &TeamRef {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    #[inline]
    pub fn status(&self) -> MatchStatus {
        self.state.current()
    }

    #[inline]
    pub fn minute(&self) -> u8 {
        self.minute
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.event_log
    }

    pub fn lineup(&self, side: Side) -> &Lineup {
        &self.lineups[side.index()]
    }

    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// Checks both squads and the speed multiplier without touching the state.
    pub fn validate(&self, speed: u32) -> Result<(), ConfigurationError> {
        if speed == 0 || speed > self.config.max_speed_multiplier {
            return Err(ConfigurationError::InvalidSpeed(
                speed,
                self.config.max_speed_multiplier,
            ));
        }

        for side in [Side::Home, Side::Away] {
            let available = self.team(side).eligible_players().count();
            if available < self.config.min_players {
                return Err(ConfigurationError::NotEnoughPlayers {
                    side,
                    available,
                    required: self.config.min_players,
                });
            }
        }

        Ok(())
    }

    /// Idle -> Preparing -> Running. Returns `Ok(false)` when the session was already started.
    pub fn start(&mut self, mode: ClockMode, speed: u32) -> Result<bool, ConfigurationError> {
        if !matches!(self.status(), MatchStatus::Idle | MatchStatus::Preparing) {
            warn!("start ignored, session is {:?}", self.status());
            return Ok(false);
        }

        self.state.apply(Transition::Prepare);

        if let Err(error) = self.validate(speed) {
            self.state.apply(Transition::Abort);
            return Err(error);
        }

        self.speed = speed;
        self.state.apply(Transition::Run(mode));

        info!(
            "kick off: {} vs {} ({:?}, x{})",
            self.home.name, self.away.name, mode, speed
        );

        Ok(true)
    }

    pub fn pause(&mut self) -> bool {
        let changed = self.state.apply(Transition::Pause);
        if changed {
            info!("match paused at minute {}", self.minute);
        }
        changed
    }

    pub fn resume(&mut self) -> bool {
        let changed = self.state.apply(Transition::Resume);
        if changed {
            info!("match resumed at minute {}", self.minute);
        }
        changed
    }

    /// Processes the next minute. `None` unless the session is running.
    pub fn advance_minute(&mut self) -> Option<MinuteTick> {
        if !self.status().is_running() || self.minute >= MATCH_MINUTES {
            return None;
        }

        self.minute += 1;
        let minute = self.minute;

        let home_possession = self.rng.chance(self.home_possession_chance());
        self.statistics.sample_minute(minute, home_possession);

        let context = GenerationContext::new(
            &self.lineups[0],
            &self.lineups[1],
            self.score.as_array(),
            home_possession,
        );
        let event = self.source.next_event(minute, &context, self.rng.as_mut());

        if let Some(event) = &event {
            self.apply_event(event.clone());
        }

        debug_assert!(
            self.check_invariants().is_ok(),
            "{:?}",
            self.check_invariants()
        );

        if minute >= MATCH_MINUTES {
            self.finish();
        }

        Some(MinuteTick {
            minute,
            event,
            score: self.score,
            completed: self.status().is_completed(),
        })
    }

    /// Runs up to `minutes` minutes, stopping early at full time or when not running.
    pub fn advance(&mut self, minutes: u32) -> Vec<MinuteTick> {
        (0..minutes).map_while(|_| self.advance_minute()).collect()
    }

    fn apply_event(&mut self, event: MatchEvent) {
        let lineup = event.side.index();

        match event.detail {
            EventDetail::Goal { .. } => {
                self.score.increment(event.side);
                info!(
                    "{}' goal for {} by player {}, {}",
                    event.minute,
                    self.team(event.side).name,
                    event.player_id,
                    self.score
                );
            }
            EventDetail::RedCard => self.lineups[lineup].send_off(event.player_id, event.minute),
            EventDetail::Substitution { .. } => {
                if self.lineups[lineup].substitute(event.player_id, event.minute).is_none() {
                    warn!(
                        "{}' substitution for player {} could not be made",
                        event.minute, event.player_id
                    );
                }
            }
            _ => {}
        }

        debug!(
            "{}' {:?} {} player {}",
            event.minute,
            event.kind(),
            event.side,
            event.player_id
        );

        self.statistics.record(&event);
        self.event_log.push(event);
    }

    /// Headless path: starts a simulated match if needed and plays it out.
    pub fn run_to_completion(&mut self) -> Result<MatchResult, ConfigurationError> {
        if matches!(self.status(), MatchStatus::Idle | MatchStatus::Preparing) {
            self.start(ClockMode::Simulated, 1)?;
        }
        self.resume();

        while self.advance_minute().is_some() {}

        Ok(self.stop())
    }

    /// Forces the session to Completed. The result is built once and cached.
    pub fn stop(&mut self) -> MatchResult {
        if let Some(result) = &self.result {
            return result.clone();
        }

        self.early_terminated = self.minute < MATCH_MINUTES;
        if self.early_terminated {
            info!("match stopped at minute {}", self.minute);
        }

        self.finish()
    }

    fn finish(&mut self) -> MatchResult {
        if let Some(result) = &self.result {
            return result.clone();
        }

        self.state.apply(Transition::Complete);

        let sheet = MatchSheet {
            home: &self.home,
            away: &self.away,
            appearances: [self.lineups[0].appearances(), self.lineups[1].appearances()],
            duration: self.minute,
            early_terminated: self.early_terminated,
            kicked_off_at: self.kicked_off_at,
        };

        let result = ResultSynthesizer::build(
            &sheet,
            self.score,
            self.statistics.final_snapshot(),
            self.rng.as_mut(),
        );

        info!(
            "full time: {} {} {} ({} minutes, {} events)",
            self.home.name,
            self.score,
            self.away.name,
            result.duration,
            result.events.len()
        );

        self.result = Some(result.clone());
        result
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            status: self.status(),
            minute: self.minute,
            score: self.score,
            events: self.event_log.clone(),
            stats: self.statistics.snapshot(),
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for side in [Side::Home, Side::Away] {
            let score = self.score.get(side);

            let goal_events = self
                .event_log
                .iter()
                .filter(|e| e.side == side && e.is_goal())
                .count();
            if goal_events != score as usize {
                return Err(InvariantViolation::ScoreMismatch {
                    side,
                    score,
                    goal_events,
                });
            }

            let stat_goals = self.statistics.goals(side);
            if stat_goals != score as u16 {
                return Err(InvariantViolation::StatsMismatch {
                    side,
                    score,
                    stat_goals,
                });
            }
        }

        if let Some(pair) = self
            .event_log
            .windows(2)
            .find(|pair| pair[1].minute <= pair[0].minute)
        {
            return Err(InvariantViolation::MinuteRegression {
                from: pair[0].minute,
                to: pair[1].minute,
            });
        }

        if let Some(last) = self.event_log.last().filter(|e| e.minute > self.minute) {
            return Err(InvariantViolation::MinuteRegression {
                from: last.minute,
                to: self.minute,
            });
        }

        self.statistics.check_possession()
    }

    fn home_possession_chance(&self) -> f64 {
        let difference = (self.lineups[0].strength() - self.lineups[1].strength()) as f64;
        (0.5 + difference / 100.0).clamp(MIN_POSSESSION_CHANCE, MAX_POSSESSION_CHANCE)
    }
}
