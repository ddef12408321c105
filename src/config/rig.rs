//! Rig configuration - root configuration structure.

use serde::Deserialize;

use super::axis::{RotorConfig, TurntableConfig};
use super::timing::PulseTiming;

/// Root configuration structure from TOML.
///
/// Every section is optional; a missing section takes the values of the
/// reference rig.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Tilt arm.
    pub rotor: RotorConfig,

    /// Turntable.
    pub turntable: TurntableConfig,

    /// Loop delays.
    pub timing: PulseTiming,

    /// Still camera.
    #[cfg(feature = "std")]
    pub camera: CameraConfig,
}

/// Still camera invocation.
#[cfg(feature = "std")]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture program.
    pub command: std::string::String,

    /// Directory captured images are written to.
    pub output_dir: std::path::PathBuf,
}

#[cfg(feature = "std")]
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            command: "libcamera-still".into(),
            output_dir: "/tmp/turntable-captures".into(),
        }
    }
}
