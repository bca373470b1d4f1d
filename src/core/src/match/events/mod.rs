pub mod context;
pub mod event;
pub mod generator;
pub mod probability;
pub mod scripted;
pub mod selection;

pub use context::*;
pub use event::*;
pub use generator::*;
pub use probability::*;
pub use scripted::*;

use crate::rng::MatchRng;

/// Anything that can decide the event of a minute.
pub trait EventSource: Send {
    fn next_event(
        &mut self,
        minute: u8,
        context: &GenerationContext<'_>,
        rng: &mut dyn MatchRng,
    ) -> Option<MatchEvent>;
}
