//! Pulse timing for the stepper drivers.

use serde::Deserialize;

/// Fixed delays of the control loop, in microseconds.
///
/// None of these adapt at runtime. They exist to meet the setup and pulse
/// width minimums of the stepper driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PulseTiming {
    /// Hold after writing DIR with STEP low, before the rising edge.
    pub direction_settle_us: u32,

    /// Hold after raising STEP, before the next iteration pulls it low.
    pub step_hold_us: u32,

    /// Low and high time of each homing pulse.
    pub homing_pulse_us: u32,

    /// Wait between iterations while both axes are at rest.
    pub idle_us: u32,
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            direction_settle_us: 600,
            step_hold_us: 600,
            homing_pulse_us: 100,
            idle_us: 10_000,
        }
    }
}

impl PulseTiming {
    /// Shortest of the two tracking delays.
    #[inline]
    pub fn shortest_normal_us(&self) -> u32 {
        self.direction_settle_us.min(self.step_hold_us)
    }

    /// Longest of the two tracking delays.
    #[inline]
    pub fn longest_normal_us(&self) -> u32 {
        self.direction_settle_us.max(self.step_hold_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let timing = PulseTiming::default();
        assert_eq!(timing.direction_settle_us + timing.step_hold_us, 1200);
        assert!(timing.homing_pulse_us < timing.shortest_normal_us());
        assert!(timing.idle_us > timing.longest_normal_us());
    }
}
