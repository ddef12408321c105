//! Request-layer commands.
//!
//! Turns an endpoint name and its JSON body into a [`RigCommand`], rejecting
//! anything malformed before it reaches the motion state.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::units::Degrees;
use crate::error::{truncated, CommandError, Result};
use crate::rig::RigHandle;

/// A validated request for the rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RigCommand {
    /// Switch the ring light.
    RingLight(bool),
    /// Absolute rotor target.
    Rotor(Degrees),
    /// Relative turntable rotation.
    Turntable(Degrees),
    /// Re-home the rotor.
    Home,
}

#[derive(Deserialize)]
struct RingLightBody {
    light_on: bool,
}

#[derive(Deserialize)]
struct RotorBody {
    angle: f64,
}

#[derive(Deserialize)]
struct TurntableBody {
    angle_change: f64,
}

impl RigCommand {
    /// Parse the body posted to `endpoint`.
    ///
    /// `home_rotor` ignores its body; an empty body is accepted there.
    ///
    /// # Errors
    ///
    /// Unknown endpoint, invalid JSON, a missing field, or a non-finite angle.
    pub fn parse(endpoint: &str, body: &str) -> Result<Self> {
        let parsed = match endpoint {
            "ringlight" => from_json::<RingLightBody>(body).map(|b| Self::RingLight(b.light_on)),
            "rotor" => from_json::<RotorBody>(body).map(|b| Self::Rotor(Degrees(b.angle))),
            "turntable" => {
                from_json::<TurntableBody>(body).map(|b| Self::Turntable(Degrees(b.angle_change)))
            }
            "home_rotor" => Ok(Self::Home),
            other => Err(CommandError::UnknownEndpoint(truncated(other))),
        }
        .and_then(Self::validate);

        parsed.map_err(|e| {
            warn!(endpoint, error = %e, "rejected request");
            e.into()
        })
    }

    /// Reject NaN and infinite angles.
    pub fn validate(self) -> core::result::Result<Self, CommandError> {
        match self {
            Self::Rotor(angle) | Self::Turntable(angle) if !angle.is_finite() => {
                Err(CommandError::NonFiniteAngle)
            }
            cmd => Ok(cmd),
        }
    }

    /// Forward to the rig.
    pub fn apply(self, rig: &RigHandle) {
        match self {
            Self::RingLight(on) => rig.set_ringlight(on),
            Self::Rotor(angle) => {
                let stored = rig.set_rotor_target(angle);
                if stored != angle {
                    debug!(requested = angle.value(), stored = stored.value(), "rotor target clamped");
                }
            }
            Self::Turntable(delta) => {
                let target = rig.adjust_turntable_target(delta);
                debug!(delta = delta.value(), target = target.value(), "turntable target");
            }
            Self::Home => rig.request_home(),
        }
    }
}

pub(crate) fn from_json<'a, T: Deserialize<'a>>(
    body: &'a str,
) -> core::result::Result<T, CommandError> {
    serde_json::from_str(body).map_err(|e| CommandError::Malformed(truncated(&e.to_string())))
}
