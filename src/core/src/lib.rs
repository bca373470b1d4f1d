pub mod config;
pub mod error;
pub mod league;
pub mod r#match;
pub mod rng;

pub use config::*;
pub use error::*;
pub use rng::*;
