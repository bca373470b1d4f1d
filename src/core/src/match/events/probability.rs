use crate::r#match::events::EventKind;

const PER_90: f64 = 1.0 / 90.0;

/// Strength gap (in overall-rating points) above which a mismatch changes the game.
pub const STRENGTH_MISMATCH: f32 = 10.0;

/// Per-minute firing probability of every event kind, indexed by [`EventKind::index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventProbabilities([f64; EventKind::COUNT]);

impl EventProbabilities {
    /// Calibrated against real per-90 frequencies.
    pub fn base() -> Self {
        let mut table = [0.0; EventKind::COUNT];

        table[EventKind::Goal.index()] = 3.0 * PER_90;
        table[EventKind::Shot.index()] = 24.0 * PER_90;
        table[EventKind::Foul.index()] = 21.0 * PER_90;
        table[EventKind::YellowCard.index()] = 3.0 * PER_90;
        table[EventKind::RedCard.index()] = 0.5 * PER_90;
        table[EventKind::Corner.index()] = 10.0 * PER_90;
        table[EventKind::Offside.index()] = 5.0 * PER_90;
        table[EventKind::Substitution.index()] = 6.0 * PER_90;
        table[EventKind::Injury.index()] = 1.5 * PER_90;

        EventProbabilities(table)
    }

    pub fn adjusted(minute: u8, score_difference: i8, strength_difference: f32) -> Self {
        let mut probabilities = Self::base();

        probabilities.apply_time_phase(minute);
        probabilities.apply_match_context(minute, score_difference, strength_difference);

        probabilities
    }

    #[inline]
    pub fn get(&self, kind: EventKind) -> f64 {
        self.0[kind.index()]
    }

    #[inline]
    pub fn scale(&mut self, kind: EventKind, factor: f64) {
        let value = &mut self.0[kind.index()];
        *value = (*value * factor).clamp(0.0, 1.0);
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    fn apply_time_phase(&mut self, minute: u8) {
        if minute <= 15 {
            self.scale(EventKind::Goal, 0.7);
            self.scale(EventKind::YellowCard, 0.5);
            self.scale(EventKind::RedCard, 0.3);
            self.scale(EventKind::Substitution, 0.0);
        }

        if (45..=60).contains(&minute) {
            self.scale(EventKind::Substitution, 3.0);
        }

        if minute >= 75 {
            self.scale(EventKind::Goal, 1.3);
            self.scale(EventKind::YellowCard, 1.3);
            self.scale(EventKind::RedCard, 1.3);
            self.scale(EventKind::Substitution, 1.5);
            self.scale(EventKind::Injury, 1.2);
        }
    }

    fn apply_match_context(&mut self, minute: u8, score_difference: i8, strength_difference: f32) {
        if score_difference.unsigned_abs() >= 2 {
            self.scale(EventKind::Goal, 0.8);
            self.scale(EventKind::Substitution, 1.5);
        }

        if minute >= 80 && score_difference == 0 {
            self.scale(EventKind::Goal, 1.2);
            self.scale(EventKind::Shot, 1.2);
            self.scale(EventKind::Foul, 1.15);
        }

        let gap = strength_difference.abs();
        if gap >= STRENGTH_MISMATCH {
            let gap = gap as f64;
            self.scale(EventKind::Goal, 1.0 + gap / 100.0);
            self.scale(EventKind::Foul, 1.0 + gap / 200.0);
        }
    }

    /// Single multi-outcome draw: walks kinds in [`EventKind::ORDERED`] accumulating
    /// probabilities; the first kind whose running sum exceeds `draw` fires.
    pub fn pick(&self, draw: f64) -> Option<EventKind> {
        let mut cumulative = 0.0;

        for kind in EventKind::ORDERED {
            cumulative += self.get(kind);
            if draw < cumulative {
                return Some(kind);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_rates_are_per_90() {
        let base = EventProbabilities::base();
        assert!((base.get(EventKind::Goal) - 0.0333).abs() < 1e-3);
        assert!((base.get(EventKind::Shot) - 0.2667).abs() < 1e-3);
        assert!((base.get(EventKind::RedCard) - 0.0056).abs() < 1e-3);
        assert!(base.total() < 1.0);
    }

    #[test]
    fn test_early_minutes_have_no_substitutions() {
        let p = EventProbabilities::adjusted(10, 0, 0.0);
        assert_eq!(p.get(EventKind::Substitution), 0.0);
        assert!(p.get(EventKind::Goal) < EventProbabilities::base().get(EventKind::Goal));
    }

    #[test]
    fn test_second_half_opening_triples_substitutions() {
        let base = EventProbabilities::base().get(EventKind::Substitution);
        let p = EventProbabilities::adjusted(50, 1, 0.0);
        assert!((p.get(EventKind::Substitution) - base * 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_late_tight_game_boosts_goals() {
        let base = EventProbabilities::base().get(EventKind::Goal);
        let p = EventProbabilities::adjusted(85, 0, 0.0);
        assert!((p.get(EventKind::Goal) - base * 1.3 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_blowout_dampens_goals() {
        let level = EventProbabilities::adjusted(30, 0, 0.0);
        let blowout = EventProbabilities::adjusted(30, -3, 0.0);
        assert!(blowout.get(EventKind::Goal) < level.get(EventKind::Goal));
        assert!(blowout.get(EventKind::Substitution) > level.get(EventKind::Substitution));
    }

    #[test]
    fn test_strength_gap_boosts_goals_and_fouls() {
        let even = EventProbabilities::adjusted(30, 0, 0.0);
        let mismatch = EventProbabilities::adjusted(30, 0, -20.0);
        assert!(mismatch.get(EventKind::Goal) > even.get(EventKind::Goal));
        assert!(mismatch.get(EventKind::Foul) > even.get(EventKind::Foul));
        assert_eq!(mismatch.get(EventKind::Shot), even.get(EventKind::Shot));
    }

    #[test]
    fn test_pick_walks_fixed_order() {
        let p = EventProbabilities::base();
        let goal = p.get(EventKind::Goal);
        let shot = p.get(EventKind::Shot);

        assert_eq!(p.pick(0.0), Some(EventKind::Goal));
        assert_eq!(p.pick(goal - 1e-9), Some(EventKind::Goal));
        assert_eq!(p.pick(goal + 1e-9), Some(EventKind::Shot));
        assert_eq!(p.pick(goal + shot + 1e-9), Some(EventKind::Foul));
        assert_eq!(p.pick(p.total() - 1e-9), Some(EventKind::Injury));
        assert_eq!(p.pick(p.total() + 1e-9), None);
    }
}
