//! Open-loop rotor homing.
//!
//! There is no limit switch. The rotor is driven in the retreat direction for
//! a full travel's worth of pulses; once the arm reaches its mechanical stop
//! the remaining pulses slip harmlessly. Nothing confirms arrival.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use tracing::debug;

use crate::config::{PulseTiming, RotorConfig};
use crate::error::Result;
use crate::hw::{Axis, OutputPort};

use super::planner::Direction;

/// Fixed pulse train that drives the rotor to its reference stop.
#[derive(Debug, Clone, Copy)]
pub struct HomingRoutine {
    pulses: u32,
    pulse_us: u32,
    invert_direction: bool,
}

impl HomingRoutine {
    /// Create the routine for a rotor.
    pub fn new(rotor: &RotorConfig, timing: &PulseTiming) -> Self {
        Self {
            pulses: rotor.homing_pulses(),
            pulse_us: timing.homing_pulse_us,
            invert_direction: rotor.invert_direction,
        }
    }

    /// Pulses emitted per run.
    #[inline]
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    /// Run to completion. Returns the number of pulses emitted.
    ///
    /// DIR is set once; each pulse is low, hold, high, hold. STEP is left low
    /// so the next tracking pulse starts a fresh edge.
    pub fn run<P, D>(&self, port: &mut P, delay: &mut D) -> Result<u32>
    where
        P: OutputPort,
        D: DelayNs,
    {
        let axis = Axis::Rotor;
        debug!(pulses = self.pulses, "homing rotor");

        port.set_output(axis.dir_signal(), Direction::Retreat.level(self.invert_direction))?;

        for _ in 0..self.pulses {
            port.set_output(axis.step_signal(), PinState::Low)?;
            delay.delay_us(self.pulse_us);
            port.set_output(axis.step_signal(), PinState::High)?;
            delay.delay_us(self.pulse_us);
        }
        port.set_output(axis.step_signal(), PinState::Low)?;

        debug!("rotor homing pulses complete");
        Ok(self.pulses)
    }
}
