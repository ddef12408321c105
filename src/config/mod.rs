//! Configuration module for turntable-motion.
//!
//! Provides types for loading and validating the rig configuration from TOML
//! files (with `std` feature) or building it in code.

mod axis;
#[cfg(feature = "std")]
mod loader;
mod rig;
mod timing;
pub mod units;
mod validation;

pub use axis::{RotorConfig, RotorLimits, TurntableConfig};
#[cfg(feature = "std")]
pub use rig::CameraConfig;
pub use rig::RigConfig;
pub use timing::PulseTiming;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Steps};
