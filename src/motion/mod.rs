//! Motion module for turntable-motion.
//!
//! Step planning, pulse generation, rotor homing and the control loop that
//! composes them. Nothing here needs `std`.

mod axis;
mod control;
mod homing;
pub mod planner;
mod pulse;

pub use axis::AxisTracker;
pub use control::{Iteration, LoopMode, LoopStats, MotionLoop, MotionSource, Targets};
pub use homing::HomingRoutine;
pub use planner::{step_move, Direction};
pub use pulse::PulseGenerator;
