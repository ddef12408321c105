//! Step planning: how far each axis still has to go.
//!
//! Recomputed from the live target on every iteration, so a target change
//! redirects the axis on the very next cycle.

use embedded_hal::digital::PinState;

use crate::config::units::{Degrees, Steps};

/// Direction of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Toward larger step counts.
    Advance,
    /// Toward smaller step counts; also the homing direction.
    Retreat,
}

impl Direction {
    /// Direction that reduces a pending move.
    ///
    /// A positive move (position past target) retreats. Zero and negative
    /// moves advance, which is also the idle DIR level.
    #[inline]
    pub fn for_move(step_move: i64) -> Self {
        if step_move > 0 {
            Direction::Retreat
        } else {
            Direction::Advance
        }
    }

    /// Change in step count for one step in this direction.
    #[inline]
    pub fn step_delta(self) -> i64 {
        match self {
            Direction::Advance => 1,
            Direction::Retreat => -1,
        }
    }

    /// DIR line level: retreat is high unless the axis is inverted.
    #[inline]
    pub fn level(self, invert: bool) -> PinState {
        PinState::from((self == Direction::Retreat) != invert)
    }
}

/// Pending move of an axis: `actual - round(steps_per_rotation * target / 360)`.
///
/// Positive means retreat, negative means advance, zero means at rest.
#[inline]
pub fn step_move(target: Degrees, steps_per_rotation: u32, actual: Steps) -> i64 {
    let target_steps = Steps::from_degrees(target, steps_per_rotation);
    actual.0.saturating_sub(target_steps.0)
}
