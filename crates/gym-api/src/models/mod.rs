pub mod session;
pub mod stats;

pub use session::{GymSession, SessionState};
pub use stats::{StatsMode, StatsReport};
