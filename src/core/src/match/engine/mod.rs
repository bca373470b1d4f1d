pub mod clock;
pub mod controller;
pub mod observer;
pub mod render;
pub mod session;
pub mod state;

pub use clock::*;
pub use controller::*;
pub use observer::*;
pub use render::*;
pub use session::*;
pub use state::*;
