use crate::config::MatchConfig;
use crate::r#match::ClockMode;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// How far the session should move after one clock wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockStep {
    /// Whole match minutes due now.
    pub minutes: u32,
    /// Render sub-steps to run before drawing; zero for the headless clock.
    pub sub_steps: u32,
}

/// Frame-driven clock for visual mode. Wall time per frame is clamped so a
/// stalled host cannot fast-forward the match, then scaled by the speed.
pub struct FrameClock {
    interval: Interval,
    last_frame: Instant,
    max_frame_dt: Duration,
    seconds_per_minute: f64,
    speed: u32,
    accumulated: f64,
}

impl FrameClock {
    pub fn new(config: &MatchConfig, speed: u32) -> Self {
        let mut interval = tokio::time::interval(config.frame_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        FrameClock {
            interval,
            last_frame: Instant::now(),
            max_frame_dt: config.max_frame_dt(),
            seconds_per_minute: config.seconds_per_minute.max(f32::EPSILON) as f64,
            speed,
            accumulated: 0.0,
        }
    }

    pub async fn next_frame(&mut self) -> ClockStep {
        let now = self.interval.tick().await;

        let elapsed = now.saturating_duration_since(self.last_frame).min(self.max_frame_dt);
        self.last_frame = now;

        self.accumulated += elapsed.as_secs_f64() * self.speed as f64;

        let minutes = (self.accumulated / self.seconds_per_minute).floor();
        self.accumulated -= minutes * self.seconds_per_minute;

        ClockStep {
            minutes: minutes as u32,
            sub_steps: self.speed,
        }
    }
}

/// Timer-driven clock for simulated mode: one batch straight away, then a
/// batch after every delay.
pub struct SimulatedClock {
    batch_minutes: u32,
    delay: Duration,
    started: bool,
}

impl SimulatedClock {
    pub fn new(config: &MatchConfig) -> Self {
        SimulatedClock {
            batch_minutes: config.batch_minutes.max(1) as u32,
            delay: config.batch_delay(),
            started: false,
        }
    }

    pub async fn next_batch(&mut self) -> ClockStep {
        if self.started {
            tokio::time::sleep(self.delay).await;
        }
        self.started = true;

        ClockStep {
            minutes: self.batch_minutes,
            sub_steps: 0,
        }
    }
}

/// Per-session clock. Both disciplines hand out minutes through `next`, and the
/// session applies them through the same entry point.
pub enum Clock {
    Frame(FrameClock),
    Timer(SimulatedClock),
}

impl Clock {
    pub fn for_mode(mode: ClockMode, config: &MatchConfig, speed: u32) -> Self {
        match mode {
            ClockMode::Visual => Clock::Frame(FrameClock::new(config, speed)),
            ClockMode::Simulated => Clock::Timer(SimulatedClock::new(config)),
        }
    }

    pub async fn next(&mut self) -> ClockStep {
        match self {
            Clock::Frame(clock) => clock.next_frame().await,
            Clock::Timer(clock) => clock.next_batch().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_batches() {
        let config = MatchConfig::default().with_batch_delay(200);
        let mut clock = Clock::for_mode(ClockMode::Simulated, &config, 1);

        let started = Instant::now();
        assert_eq!(clock.next().await.minutes, 5);
        assert_eq!(started.elapsed(), Duration::ZERO);

        assert_eq!(clock.next().await.minutes, 5);
        assert_eq!(started.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_clock_accrues_minutes_with_speed() {
        let config = MatchConfig {
            frame_interval_ms: 125,
            max_frame_dt_ms: 200,
            seconds_per_minute: 1.0,
            ..MatchConfig::default()
        };
        let mut clock = FrameClock::new(&config, 4);

        let mut minutes = 0;
        for _ in 0..9 {
            let step = clock.next_frame().await;
            assert_eq!(step.sub_steps, 4);
            minutes += step.minutes;
        }

        // The first frame is immediate, then 8 frames of 125ms at 4x.
        assert_eq!(minutes, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_time_is_clamped() {
        let config = MatchConfig {
            frame_interval_ms: 16,
            max_frame_dt_ms: 100,
            seconds_per_minute: 1.0,
            ..MatchConfig::default()
        };
        let mut clock = FrameClock::new(&config, 1);
        clock.next_frame().await;

        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(clock.next_frame().await.minutes, 0);
    }
}
