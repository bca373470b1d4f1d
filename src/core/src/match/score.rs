use crate::r#match::events::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}

impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Score { home, away }
    }

    #[inline]
    pub fn get(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Home => self.home = self.home.saturating_add(1),
            Side::Away => self.away = self.away.saturating_add(1),
        }
    }

    pub fn as_array(&self) -> [u8; 2] {
        [self.home, self.away]
    }

    /// Goals for `side` followed by goals against.
    pub fn for_side(&self, side: Side) -> (u8, u8) {
        (self.get(side), self.get(side.opponent()))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_perspective() {
        let mut score = Score::default();
        score.increment(Side::Home);
        score.increment(Side::Home);
        score.increment(Side::Away);

        assert_eq!(score, Score::new(2, 1));
        assert_eq!(score.for_side(Side::Away), (1, 2));
        assert_eq!(score.to_string(), "2-1");
    }
}
