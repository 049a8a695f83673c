pub mod controller;
pub mod state;

pub use controller::{Decision, MotionController};
pub use state::{Direction, MotionConfig, MotionState};
