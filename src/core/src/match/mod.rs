pub mod engine;
pub mod events;
pub mod result;
pub mod score;
pub mod squad;
pub mod statistics;

pub use engine::*;
pub use events::*;
pub use result::*;
pub use score::*;
pub use squad::*;
pub use statistics::*;
