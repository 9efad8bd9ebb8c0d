mod engine;
mod group;
mod phases;

pub use engine::Timer;
pub use group::{GroupState, SharedTimerGroup, TimerGroup, TimerReading};
pub use phases::{Phases, TimerKind};
