pub mod ids;
pub mod macros;
pub mod schedule;

pub use ids::*;
pub use schedule::*;
