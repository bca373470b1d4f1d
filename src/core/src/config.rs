use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MATCH_MINUTES: u8 = 90;
pub const HALF_TIME_MINUTE: u8 = 45;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for every random draw of the session. `None` draws one at creation.
    pub seed: Option<u64>,
    pub min_players: usize,

    pub batch_minutes: u8,
    pub batch_delay_ms: u64,

    pub frame_interval_ms: u64,
    pub max_frame_dt_ms: u64,
    /// Wall-clock seconds per match minute at speed 1 in visual mode.
    pub seconds_per_minute: f32,
    pub max_speed_multiplier: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            seed: None,
            min_players: 11,
            batch_minutes: 5,
            batch_delay_ms: 200,
            frame_interval_ms: 16,
            max_frame_dt_ms: 100,
            seconds_per_minute: 1.0,
            max_speed_multiplier: 16,
        }
    }
}

impl MatchConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_batch_delay(mut self, delay_ms: u64) -> Self {
        self.batch_delay_ms = delay_ms;
        self
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn max_frame_dt(&self) -> Duration {
        Duration::from_millis(self.max_frame_dt_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.min_players, 11);
        assert_eq!(config.batch_minutes, 5);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_frame_interval_never_zero() {
        let config = MatchConfig {
            frame_interval_ms: 0,
            ..MatchConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }
}
