use crate::r#match::events::Side;
use crate::r#match::Lineup;

/// What the generator may look at when deciding a minute.
pub struct GenerationContext<'a> {
    /// Home goals minus away goals.
    pub score_difference: i8,
    /// Home strength minus away strength, in overall-rating points.
    pub strength_difference: f32,
    pub home_possession: bool,
    pub home: &'a Lineup,
    pub away: &'a Lineup,
}

impl<'a> GenerationContext<'a> {
    pub fn new(home: &'a Lineup, away: &'a Lineup, score: [u8; 2], home_possession: bool) -> Self {
        let score_difference =
            (score[0] as i16 - score[1] as i16).clamp(i8::MIN as i16, i8::MAX as i16);

        GenerationContext {
            score_difference: score_difference as i8,
            strength_difference: home.strength() - away.strength(),
            home_possession,
            home,
            away,
        }
    }

    pub fn possession_side(&self) -> Side {
        if self.home_possession {
            Side::Home
        } else {
            Side::Away
        }
    }

    pub fn lineup(&self, side: Side) -> &'a Lineup {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}
