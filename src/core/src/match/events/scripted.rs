use crate::r#match::events::{EventSource, GenerationContext, MatchEvent};
use crate::rng::MatchRng;
use log::warn;
use std::collections::VecDeque;

/// Replays a fixed list of events at their minutes instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    pending: VecDeque<MatchEvent>,
}

impl ScriptedEvents {
    pub fn new(mut events: Vec<MatchEvent>) -> Self {
        events.sort_by_key(|e| e.minute);

        ScriptedEvents {
            pending: events.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(
        &mut self,
        minute: u8,
        _context: &GenerationContext<'_>,
        _rng: &mut dyn MatchRng,
    ) -> Option<MatchEvent> {
        // At most one event per minute; a second event scripted for an already
        // processed minute is stale and dropped.
        while let Some(front) = self.pending.front() {
            if front.minute >= minute {
                break;
            }
            warn!("dropping stale scripted event for minute {}", front.minute);
            self.pending.pop_front();
        }

        match self.pending.front() {
            Some(front) if front.minute == minute => self.pending.pop_front(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::squad::fixtures::team;
    use crate::r#match::{Lineup, Side};
    use crate::rng::SeededRng;

    #[test]
    fn test_replays_in_minute_order() {
        let home = Lineup::from_team(&team(1, 70, 0), 11);
        let away = Lineup::from_team(&team(2, 70, 0), 11);
        let context = GenerationContext::new(&home, &away, [0, 0], true);
        let mut rng = SeededRng::new(1);

        let mut script = ScriptedEvents::new(vec![
            MatchEvent::goal(52, Side::Away, 210),
            MatchEvent::goal(10, Side::Home, 110),
        ]);

        let fired: Vec<_> = (1..=90)
            .filter_map(|minute| script.next_event(minute, &context, &mut rng))
            .map(|e| (e.minute, e.side))
            .collect();

        assert_eq!(fired, vec![(10, Side::Home), (52, Side::Away)]);
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn test_duplicate_minute_keeps_first() {
        let home = Lineup::from_team(&team(1, 70, 0), 11);
        let away = Lineup::from_team(&team(2, 70, 0), 11);
        let context = GenerationContext::new(&home, &away, [0, 0], true);
        let mut rng = SeededRng::new(1);

        let mut script = ScriptedEvents::new(vec![
            MatchEvent::goal(10, Side::Home, 110),
            MatchEvent::goal(10, Side::Away, 210),
        ]);

        assert!(script.next_event(10, &context, &mut rng).is_some());
        assert!(script.next_event(11, &context, &mut rng).is_none());
        assert_eq!(script.remaining(), 0);
    }
}
