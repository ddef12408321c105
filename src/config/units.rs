//! Unit types for angles and motor steps.
//!
//! Keeps degrees and steps apart at compile time; the only bridge between
//! them is [`Steps::from_degrees`].

use core::ops::Sub;

use serde::Deserialize;

/// Angular position in degrees.
///
/// Used for configuration and the external API. Internally converted to [`Steps`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether the value is neither NaN nor infinite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Sub for Degrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Motor position in steps (absolute from the power-on or homing origin).
///
/// Uses i64 so the turntable can accumulate full rotations in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Steps(pub i64);

impl Steps {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Convert an angle to the nearest whole step.
    ///
    /// `round(steps_per_rotation * degrees / 360)`, halves rounded away from
    /// zero. Out-of-range results saturate and NaN maps to zero.
    #[inline]
    pub fn from_degrees(degrees: Degrees, steps_per_rotation: u32) -> Self {
        Self(libm::round(steps_per_rotation as f64 * degrees.0 / 360.0) as i64)
    }
}
