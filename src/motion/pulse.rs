//! Step pulse generation.
//!
//! One iteration of the pulse generator moves every axis with a pending move
//! by exactly one step:
//!
//! 1. both STEP lines low ([`PulseGenerator::release`], done by the loop at
//!    the top of every iteration)
//! 2. both DIR lines written from the sign of the pending move
//! 3. hold for the direction settle delay
//! 4. STEP high on each axis with a pending move (the edge the driver counts)
//! 5. hold for the step delay
//!
//! The two holds are the driver's setup and pulse-width minimums. They are
//! fixed and must not be shortened or interleaved with other work.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use tracing::trace;

use crate::config::PulseTiming;
use crate::error::Result;
use crate::hw::{Axis, OutputPort};

use super::axis::AxisTracker;
use super::planner::Direction;

/// Emits one step per axis per call with fixed timing.
#[derive(Debug, Clone, Copy)]
pub struct PulseGenerator {
    direction_settle_us: u32,
    step_hold_us: u32,
}

impl PulseGenerator {
    /// Create a generator from the loop timing.
    pub fn new(timing: &PulseTiming) -> Self {
        Self {
            direction_settle_us: timing.direction_settle_us,
            step_hold_us: timing.step_hold_us,
        }
    }

    /// Drive both STEP lines low.
    pub fn release<P: OutputPort>(&self, port: &mut P) -> Result<()> {
        for axis in Axis::ALL {
            port.set_output(axis.step_signal(), PinState::Low)?;
        }
        Ok(())
    }

    /// Run steps 2 to 5 of a pulse cycle for both axes.
    ///
    /// Both STEP lines must already be released; the driver only counts a
    /// rising edge from a low line. `moves` holds each tracker's pending move.
    /// Returns the step taken per axis (`-1`, `0` or `1`), which has already
    /// been applied to the tracker.
    pub fn emit<P, D>(
        &self,
        port: &mut P,
        delay: &mut D,
        axes: &mut [AxisTracker; 2],
        moves: [i64; 2],
    ) -> Result<[i64; 2]>
    where
        P: OutputPort,
        D: DelayNs,
    {
        // DIR is written even for an axis at rest
        for (tracker, &step_move) in axes.iter().zip(moves.iter()) {
            let level = Direction::for_move(step_move).level(tracker.invert_direction());
            port.set_output(tracker.axis().dir_signal(), level)?;
        }

        delay.delay_us(self.direction_settle_us);

        let mut taken = [0i64; 2];
        for ((tracker, &step_move), slot) in axes.iter_mut().zip(moves.iter()).zip(taken.iter_mut()) {
            if step_move == 0 {
                continue;
            }
            let direction = Direction::for_move(step_move);
            port.set_output(tracker.axis().step_signal(), PinState::High)?;
            tracker.record_step(direction);
            *slot = direction.step_delta();
            trace!(axis = tracker.axis().name(), remaining = step_move.abs() - 1, "step");
        }

        delay.delay_us(self.step_hold_us);

        Ok(taken)
    }
}
