//! Per-axis configuration.

use serde::Deserialize;

use super::units::Degrees;

/// Rotor (tilt arm) configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RotorConfig {
    /// Steps per full output rotation, microstepping and gearing included.
    pub steps_per_rotation: u32,

    /// Invert direction pin logic.
    pub invert_direction: bool,

    /// Mechanical travel from the homing reference, in degrees.
    #[serde(rename = "angle_max_deg")]
    pub angle_max: Degrees,

    /// Keep-out margin at both ends of travel, in degrees.
    #[serde(rename = "tolerance_deg")]
    pub tolerance: Degrees,

    /// Reset the tracked step count to zero once homing finishes.
    pub rezero_after_homing: bool,
}

impl Default for RotorConfig {
    fn default() -> Self {
        Self {
            steps_per_rotation: 48_000,
            invert_direction: false,
            angle_max: Degrees(115.0),
            tolerance: Degrees(5.0),
            rezero_after_homing: true,
        }
    }
}

impl RotorConfig {
    /// Target limits derived from travel and tolerance.
    pub fn limits(&self) -> RotorLimits {
        RotorLimits::new(self.angle_max, self.tolerance)
    }

    /// Number of pulses the homing routine emits.
    ///
    /// `floor(steps_per_rotation * angle_max / 360)`: enough to cross the
    /// whole travel from any position.
    pub fn homing_pulses(&self) -> u32 {
        let pulses = libm::floor(self.steps_per_rotation as f64 * self.angle_max.0 / 360.0);
        if pulses <= 0.0 {
            0
        } else {
            pulses as u32
        }
    }
}

/// Turntable configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TurntableConfig {
    /// Steps per full output rotation, microstepping and gearing included.
    pub steps_per_rotation: u32,

    /// Invert direction pin logic.
    pub invert_direction: bool,
}

impl Default for TurntableConfig {
    fn default() -> Self {
        Self {
            steps_per_rotation: 3_200,
            invert_direction: false,
        }
    }
}

/// Allowed range of rotor targets: `[tolerance, angle_max - tolerance]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotorLimits {
    min: Degrees,
    max: Degrees,
}

impl RotorLimits {
    /// Create limits from mechanical travel and keep-out margin.
    pub fn new(angle_max: Degrees, tolerance: Degrees) -> Self {
        Self {
            min: tolerance,
            max: angle_max - tolerance,
        }
    }

    /// Lowest allowed target.
    #[inline]
    pub fn min(&self) -> Degrees {
        self.min
    }

    /// Highest allowed target.
    #[inline]
    pub fn max(&self) -> Degrees {
        self.max
    }

    /// Clamp a target into range. NaN clamps to the lower bound.
    #[inline]
    pub fn clamp(&self, target: Degrees) -> Degrees {
        Degrees(target.0.max(self.min.0).min(self.max.0))
    }
}

impl Default for RotorLimits {
    fn default() -> Self {
        RotorConfig::default().limits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = RotorLimits::default();
        assert_eq!(limits.min(), Degrees(5.0));
        assert_eq!(limits.max(), Degrees(110.0));
    }

    #[test]
    fn test_clamp() {
        let limits = RotorLimits::default();

        assert_eq!(limits.clamp(Degrees(60.0)), Degrees(60.0));
        assert_eq!(limits.clamp(Degrees(0.0)), Degrees(5.0));
        assert_eq!(limits.clamp(Degrees(-90.0)), Degrees(5.0));
        assert_eq!(limits.clamp(Degrees(115.0)), Degrees(110.0));
        assert_eq!(limits.clamp(Degrees(f64::INFINITY)), Degrees(110.0));
        assert_eq!(limits.clamp(Degrees(f64::NAN)), Degrees(5.0));
    }

    #[test]
    fn test_homing_pulses() {
        // 48000 * 115 / 360 = 15333.33
        assert_eq!(RotorConfig::default().homing_pulses(), 15_333);

        let config = RotorConfig {
            steps_per_rotation: 360,
            angle_max: Degrees(90.0),
            ..RotorConfig::default()
        };
        assert_eq!(config.homing_pulses(), 90);
    }
}
