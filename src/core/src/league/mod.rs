pub mod league;
pub mod result;
pub mod store;
pub mod table;

pub use league::*;
pub use result::*;
pub use store::*;
pub use table::*;
