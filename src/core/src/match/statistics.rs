use crate::error::InvariantViolation;
use crate::r#match::events::{EventDetail, MatchEvent, Side};
use log::warn;
use serde::{Deserialize, Serialize};

/// Raw per-side counters. Everything else is derived from these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideCounters {
    pub goals: u16,
    pub shots: u16,
    pub shots_on_target: u16,
    pub fouls: u16,
    pub corners: u16,
    pub offsides: u16,
    pub yellow_cards: u16,
    pub red_cards: u16,
    pub substitutions: u16,
    pub injuries: u16,
}

impl SideCounters {
    fn record(&mut self, detail: &EventDetail) {
        match detail {
            EventDetail::Goal { .. } => self.goals += 1,
            EventDetail::Shot { on_target } => {
                self.shots += 1;
                if *on_target {
                    self.shots_on_target += 1;
                }
            }
            EventDetail::Foul => self.fouls += 1,
            EventDetail::YellowCard => self.yellow_cards += 1,
            EventDetail::RedCard => self.red_cards += 1,
            EventDetail::Corner => self.corners += 1,
            EventDetail::Offside => self.offsides += 1,
            EventDetail::Substitution { .. } => self.substitutions += 1,
            EventDetail::Injury => self.injuries += 1,
        }
    }

    /// Percentage of shots on target, `None` before the first shot.
    pub fn shot_accuracy(&self) -> Option<f32> {
        ratio(self.shots_on_target, self.shots)
    }

    /// Goals per attempt as a percentage. Goals are logged apart from shots,
    /// so an attempt is either.
    pub fn conversion_rate(&self) -> Option<f32> {
        ratio(self.goals, self.shots.saturating_add(self.goals))
    }

    pub fn discipline_points(&self) -> u16 {
        self.yellow_cards + self.red_cards * 3
    }
}

fn ratio(part: u16, whole: u16) -> Option<f32> {
    if whole == 0 {
        None
    } else {
        Some(part as f32 * 100.0 / whole as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Possession {
    pub home: u8,
    pub away: u8,
}

impl Possession {
    /// Integer percentages that always sum to 100. Even split before any minute is sampled.
    pub fn from_minutes(home_minutes: u16, away_minutes: u16) -> Self {
        let total = home_minutes as u32 + away_minutes as u32;
        if total == 0 {
            return Possession { home: 50, away: 50 };
        }

        let home = ((home_minutes as u32 * 100 + total / 2) / total) as u8;

        Possession {
            home,
            away: 100 - home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    #[serde(flatten)]
    pub counters: SideCounters,
    pub shot_accuracy: Option<f32>,
    pub conversion_rate: Option<f32>,
    pub discipline_points: u16,
}

impl From<SideCounters> for SideStats {
    fn from(counters: SideCounters) -> Self {
        SideStats {
            shot_accuracy: counters.shot_accuracy(),
            conversion_rate: counters.conversion_rate(),
            discipline_points: counters.discipline_points(),
            counters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub minutes_sampled: u16,
    pub possession: Possession,
    pub home: SideStats,
    pub away: SideStats,
}

impl StatsSnapshot {
    pub fn side(&self, side: Side) -> &SideStats {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalStats {
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    pub events: Vec<MatchEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct StatisticsAggregator {
    counters: [SideCounters; 2],
    possession_minutes: [u16; 2],
    last_sampled_minute: Option<u8>,
    events: Vec<MatchEvent>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &MatchEvent) {
        self.counters[event.side.index()].record(&event.detail);
        self.events.push(event.clone());
    }

    /// Attributes `minute` wholly to one side. A minute is counted at most once.
    pub fn sample_minute(&mut self, minute: u8, home_possession: bool) {
        if self.last_sampled_minute.is_some_and(|last| minute <= last) {
            warn!("possession for minute {} already sampled, ignoring", minute);
            return;
        }

        let side = if home_possession { Side::Home } else { Side::Away };
        self.possession_minutes[side.index()] += 1;
        self.last_sampled_minute = Some(minute);
    }

    #[inline]
    pub fn counters(&self, side: Side) -> &SideCounters {
        &self.counters[side.index()]
    }

    #[inline]
    pub fn goals(&self, side: Side) -> u16 {
        self.counters[side.index()].goals
    }

    pub fn possession(&self) -> Possession {
        Possession::from_minutes(self.possession_minutes[0], self.possession_minutes[1])
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            minutes_sampled: self.possession_minutes[0] + self.possession_minutes[1],
            possession: self.possession(),
            home: SideStats::from(self.counters[0]),
            away: SideStats::from(self.counters[1]),
        }
    }

    pub fn final_snapshot(&self) -> FinalStats {
        FinalStats {
            stats: self.snapshot(),
            events: self.events.clone(),
        }
    }

    pub fn check_possession(&self) -> Result<(), InvariantViolation> {
        let possession = self.possession();
        let sum = possession.home as u16 + possession.away as u16;

        if sum != 100 {
            return Err(InvariantViolation::PossessionSum(sum));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_follow_events() {
        let mut stats = StatisticsAggregator::new();

        stats.record(&MatchEvent::goal(10, Side::Home, 1));
        stats.record(&MatchEvent::new(11, Side::Home, 1, EventDetail::Shot { on_target: true }));
        stats.record(&MatchEvent::new(12, Side::Home, 2, EventDetail::Shot { on_target: false }));
        stats.record(&MatchEvent::new(13, Side::Away, 3, EventDetail::YellowCard));
        stats.record(&MatchEvent::new(14, Side::Away, 3, EventDetail::RedCard));

        assert_eq!(stats.goals(Side::Home), 1);
        assert_eq!(stats.goals(Side::Away), 0);
        assert_eq!(stats.counters(Side::Home).shots, 2);
        assert_eq!(stats.counters(Side::Home).shot_accuracy(), Some(50.0));
        assert_eq!(stats.counters(Side::Away).discipline_points(), 4);
        assert_eq!(stats.counters(Side::Away).shot_accuracy(), None);
    }

    #[test]
    fn test_conversion_rate_never_exceeds_100() {
        let mut stats = StatisticsAggregator::new();
        stats.record(&MatchEvent::goal(10, Side::Home, 1));
        stats.record(&MatchEvent::goal(20, Side::Home, 1));
        stats.record(&MatchEvent::new(30, Side::Home, 2, EventDetail::Shot { on_target: false }));
        stats.record(&MatchEvent::goal(40, Side::Away, 3));

        let home = stats.counters(Side::Home);
        let conversion = home.conversion_rate().unwrap();
        assert!((conversion - 200.0 / 3.0).abs() < 1e-3);
        assert_eq!(stats.counters(Side::Away).conversion_rate(), Some(100.0));
    }

    #[test]
    fn test_possession_always_sums_to_100() {
        let mut stats = StatisticsAggregator::new();
        assert_eq!(stats.possession(), Possession { home: 50, away: 50 });

        for minute in 1..=90u8 {
            stats.sample_minute(minute, minute % 3 != 0);
            let possession = stats.snapshot().possession;
            assert_eq!(possession.home as u16 + possession.away as u16, 100);
            assert!(stats.check_possession().is_ok());
        }

        assert_eq!(stats.possession(), Possession { home: 67, away: 33 });
    }

    #[test]
    fn test_minute_sampled_once() {
        let mut stats = StatisticsAggregator::new();
        stats.sample_minute(1, true);
        stats.sample_minute(1, false);
        stats.sample_minute(2, false);

        assert_eq!(stats.snapshot().minutes_sampled, 2);
        assert_eq!(stats.possession(), Possession { home: 50, away: 50 });
    }

    #[test]
    fn test_rounding_one_third() {
        assert_eq!(Possession::from_minutes(1, 2), Possession { home: 33, away: 67 });
        assert_eq!(Possession::from_minutes(2, 1), Possession { home: 67, away: 33 });
    }

    #[test]
    fn test_final_snapshot_keeps_event_order() {
        let mut stats = StatisticsAggregator::new();
        stats.record(&MatchEvent::goal(5, Side::Away, 7));
        stats.record(&MatchEvent::goal(9, Side::Home, 8));

        let minutes: Vec<u8> = stats.final_snapshot().events.iter().map(|e| e.minute).collect();
        assert_eq!(minutes, vec![5, 9]);
    }
}
