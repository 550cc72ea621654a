pub mod control;
pub mod coord;
pub mod schedule;
pub mod stoch;

pub use control::*;
pub use coord::*;
pub use schedule::*;
pub use stoch::*;
