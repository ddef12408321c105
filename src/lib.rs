//! # turntable-motion
//!
//! Two-axis stepper control for a photogrammetry turntable rig, with
//! embedded-hal 1.0 support.
//!
//! A tilt arm (the rotor) and a turntable are each driven through a
//! STEP/DIR stepper driver. Request handlers set target angles; a single
//! control loop steps both axes toward them one pulse per iteration and
//! reports when both are at rest so a picture can be taken.
//!
//! ## Features
//!
//! - **Target tracking**: Absolute rotor angle, relative turntable rotation
//! - **embedded-hal 1.0**: Uses `OutputPin` for every signal, `DelayNs` for timing
//! - **no_std compatible**: The motion core works without the standard library
//! - **Open-loop homing**: Drives the rotor against its end stop and re-zeroes
//! - **Settle notification**: Callers block until both axes have arrived
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use turntable_motion::{start_rig, Degrees, PinBank, StdDelay};
//!
//! let config = turntable_motion::load_config("rig.toml")?;
//! let rig = start_rig(&config, PinBank::from_array(pins), StdDelay)?;
//!
//! rig.handle.set_rotor_target(Degrees(45.0));
//! rig.handle.adjust_turntable_target(Degrees(30.0));
//! rig.handle.await_motion_settled();
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): TOML loading, the threaded rig, request parsing and capture
//! - `defmt`: Derives `defmt::Format` on the small enums for embedded logging

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(all(test, not(feature = "std")))]
extern crate std;

// Core modules
pub mod config;
pub mod error;
pub mod hw;
pub mod motion;

// Hosted modules
#[cfg(feature = "std")]
pub mod camera;
#[cfg(feature = "std")]
pub mod command;
#[cfg(feature = "std")]
pub mod rig;

#[cfg(test)]
mod test_support;

// Re-exports for ergonomic API
pub use config::{validate_config, PulseTiming, RigConfig, RotorConfig, TurntableConfig};
pub use error::{Error, Result};
pub use hw::{Axis, OutputPort, PinBank, PinBankBuilder, Signal};
pub use motion::{Direction, LoopMode, LoopStats, MotionLoop, MotionSource, Targets};

#[cfg(feature = "std")]
pub use camera::{Camera, CaptureRequest, CaptureStation, LibcameraStill};
#[cfg(feature = "std")]
pub use command::RigCommand;
#[cfg(feature = "std")]
pub use config::{load_config, parse_config, CameraConfig};
#[cfg(feature = "std")]
pub use hw::StdDelay;
#[cfg(feature = "std")]
pub use rig::{start_rig, MotionState, Rig, RigHandle};

// Unit types
pub use config::units::{Degrees, Steps};
