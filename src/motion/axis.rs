//! Per-axis step bookkeeping.
//!
//! The control loop is the only owner of these; nothing outside it ever sees
//! an axis's step count.

use crate::config::units::{Degrees, Steps};
use crate::hw::Axis;

use super::planner::{self, Direction};

/// Tracked position of one axis, in steps.
#[derive(Debug, Clone, Copy)]
pub struct AxisTracker {
    axis: Axis,
    steps_per_rotation: u32,
    invert_direction: bool,
    position: Steps,
}

impl AxisTracker {
    /// Create a tracker at step zero.
    #[inline]
    pub fn new(axis: Axis, steps_per_rotation: u32, invert_direction: bool) -> Self {
        Self {
            axis,
            steps_per_rotation,
            invert_direction,
            position: Steps::default(),
        }
    }

    /// Which axis this tracks.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Current position in steps.
    #[inline]
    pub fn position(&self) -> Steps {
        self.position
    }

    /// Steps per full output rotation.
    #[inline]
    pub fn steps_per_rotation(&self) -> u32 {
        self.steps_per_rotation
    }

    /// Whether DIR logic is inverted.
    #[inline]
    pub fn invert_direction(&self) -> bool {
        self.invert_direction
    }

    /// Pending move toward a live target.
    #[inline]
    pub fn pending(&self, target: Degrees) -> i64 {
        planner::step_move(target, self.steps_per_rotation, self.position)
    }

    /// Record one step taken in `direction`.
    #[inline]
    pub fn record_step(&mut self, direction: Direction) {
        self.position = Steps(self.position.0 + direction.step_delta());
    }

    /// Declare the current physical position to be step zero.
    #[inline]
    pub fn rezero(&mut self) {
        self.position = Steps::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_toward_target() {
        let mut tracker = AxisTracker::new(Axis::Turntable, 3200, false);
        let target = Degrees(1.0); // 8.89 -> 9 steps

        let mut steps = 0;
        while tracker.pending(target) != 0 {
            let m = tracker.pending(target);
            tracker.record_step(Direction::for_move(m));
            steps += 1;
        }

        assert_eq!(steps, 9);
        assert_eq!(tracker.position(), Steps(9));
    }

    #[test]
    fn test_rezero() {
        let mut tracker = AxisTracker::new(Axis::Rotor, 360, false);
        for _ in 0..12 {
            tracker.record_step(Direction::Advance);
        }
        assert_eq!(tracker.position(), Steps(12));

        tracker.rezero();
        assert_eq!(tracker.position(), Steps(0));
        assert_eq!(tracker.pending(Degrees(12.0)), -12);
    }
}
