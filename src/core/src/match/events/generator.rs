use crate::config::HALF_TIME_MINUTE;
use crate::r#match::events::selection::{select_assist, select_player};
use crate::r#match::events::{
    EventDetail, EventKind, EventProbabilities, EventSource, GenerationContext, MatchEvent, Side,
};
use crate::rng::MatchRng;
use log::debug;

const ASSIST_CHANCE: f64 = 0.7;
const SHOT_ON_TARGET_CHANCE: f64 = 0.35;

#[derive(Debug, Default, Clone, Copy)]
pub struct EventGenerator;

impl EventGenerator {
    pub fn new() -> Self {
        EventGenerator
    }

    /// Decides what, if anything, happens in `minute`. Never panics; `None` is the common case.
    pub fn generate(
        &self,
        minute: u8,
        context: &GenerationContext<'_>,
        rng: &mut dyn MatchRng,
    ) -> Option<MatchEvent> {
        let probabilities = EventProbabilities::adjusted(
            minute,
            context.score_difference,
            context.strength_difference,
        );

        let kind = probabilities.pick(rng.next_f64())?;

        if kind == EventKind::Substitution && minute < HALF_TIME_MINUTE {
            debug!("minute {}: early substitution suppressed", minute);
            return None;
        }

        let side = Self::side_for(kind, context, rng);
        let lineup = context.lineup(side);
        let player_id = select_player(kind, lineup, rng)?;

        let detail = match kind {
            EventKind::Goal => {
                let assist = if rng.chance(ASSIST_CHANCE) {
                    select_assist(player_id, lineup, rng)
                } else {
                    None
                };
                EventDetail::Goal { assist }
            }
            EventKind::Shot => EventDetail::Shot {
                on_target: rng.chance(SHOT_ON_TARGET_CHANCE),
            },
            EventKind::Foul => EventDetail::Foul,
            EventKind::YellowCard => EventDetail::YellowCard,
            EventKind::RedCard => EventDetail::RedCard,
            EventKind::Corner => EventDetail::Corner,
            EventKind::Offside => EventDetail::Offside,
            EventKind::Substitution => {
                let player_in = lineup.next_substitute().map(|p| p.id);
                if player_in.is_none() {
                    debug!("minute {}: {} bench is empty, no substitution", minute, side);
                    return None;
                }
                EventDetail::Substitution { player_in }
            }
            EventKind::Injury => EventDetail::Injury,
        };

        Some(MatchEvent::new(minute, side, player_id, detail))
    }

    fn side_for(kind: EventKind, context: &GenerationContext<'_>, rng: &mut dyn MatchRng) -> Side {
        match kind {
            EventKind::Substitution | EventKind::Injury => {
                if rng.chance(0.5) {
                    Side::Home
                } else {
                    Side::Away
                }
            }
            kind if kind.is_defensive() => context.possession_side().opponent(),
            _ => context.possession_side(),
        }
    }
}

impl EventSource for EventGenerator {
    fn next_event(
        &mut self,
        minute: u8,
        context: &GenerationContext<'_>,
        rng: &mut dyn MatchRng,
    ) -> Option<MatchEvent> {
        self.generate(minute, context, rng)
    }
}
