use crate::r#match::events::MatchEvent;
use crate::r#match::{MatchStatus, Score};

/// What a render surface sees on each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub minute: u8,
    pub score: Score,
    pub status: MatchStatus,
    /// Events fired since the previous frame.
    pub new_events: Vec<MatchEvent>,
}

/// Host-side drawing target for visual mode.
///
/// `update` is called once per simulation sub-step (the speed multiplier) and
/// `draw` once per frame after the updates.
pub trait RenderSurface: Send {
    fn update(&mut self, view: &FrameView);

    fn draw(&mut self, view: &FrameView);
}
