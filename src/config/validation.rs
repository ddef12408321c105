//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::{PulseTiming, RigConfig, RotorConfig};

/// Validate a rig configuration.
///
/// Checks:
/// - Both axes have a non-zero step resolution
/// - The rotor tolerance leaves a usable target range
/// - Every delay is non-zero
/// - Homing pulses faster than tracking, and idling waits longer
pub fn validate_config(config: &RigConfig) -> Result<()> {
    validate_rotor(&config.rotor)?;

    if config.turntable.steps_per_rotation == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRotation(0)));
    }

    validate_timing(&config.timing)
}

fn validate_rotor(rotor: &RotorConfig) -> Result<()> {
    if rotor.steps_per_rotation == 0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerRotation(0)));
    }

    let angle_max = rotor.angle_max.0;
    let tolerance = rotor.tolerance.0;
    let usable = angle_max.is_finite()
        && tolerance.is_finite()
        && tolerance >= 0.0
        && 2.0 * tolerance < angle_max;
    if !usable {
        return Err(Error::Config(ConfigError::InvalidRotorLimits { angle_max, tolerance }));
    }

    Ok(())
}

fn validate_timing(timing: &PulseTiming) -> Result<()> {
    for (name, value) in [
        ("direction_settle_us", timing.direction_settle_us),
        ("step_hold_us", timing.step_hold_us),
        ("homing_pulse_us", timing.homing_pulse_us),
        ("idle_us", timing.idle_us),
    ] {
        if value == 0 {
            return Err(Error::Config(ConfigError::ZeroDelay(name)));
        }
    }

    if timing.homing_pulse_us >= timing.shortest_normal_us() {
        return Err(Error::Config(ConfigError::HomingNotFaster {
            homing_us: timing.homing_pulse_us,
            normal_us: timing.shortest_normal_us(),
        }));
    }

    if timing.idle_us <= timing.longest_normal_us() {
        return Err(Error::Config(ConfigError::IdleTooShort {
            idle_us: timing.idle_us,
            normal_us: timing.longest_normal_us(),
        }));
    }

    Ok(())
}
