//! Error types for turntable-motion.
//!
//! The motion core itself has almost nothing that can fail: pin writes are
//! assumed to succeed and homing has no sensor to disagree with. Errors come
//! from the edges: configuration, the output port, request parsing and the
//! camera.

use core::fmt;

use crate::hw::Signal;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all turntable-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Hardware output port error
    Port(PortError),
    /// Rejected request-layer command
    Command(CommandError),
    /// Camera capture error
    Capture(CaptureError),
    /// Control thread could not be started (std only)
    #[cfg(feature = "std")]
    Spawn(heapless::String<128>),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Steps per rotation must be non-zero
    InvalidStepsPerRotation(u32),
    /// Rotor travel leaves no usable range once the tolerance is applied
    InvalidRotorLimits {
        /// Mechanical travel in degrees
        angle_max: f64,
        /// Keep-out margin at each end in degrees
        tolerance: f64,
    },
    /// A pulse or idle delay is zero
    ZeroDelay(&'static str),
    /// Homing must pulse faster than normal tracking
    HomingNotFaster {
        /// Homing half-period in microseconds
        homing_us: u32,
        /// Shortest normal delay in microseconds
        normal_us: u32,
    },
    /// Idle wait must be longer than a normal cycle delay
    IdleTooShort {
        /// Idle delay in microseconds
        idle_us: u32,
        /// Longest normal delay in microseconds
        normal_us: u32,
    },
    /// No pin was supplied for a signal
    MissingPin(Signal),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Hardware output errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// Writing a level to the pin behind this signal failed
    PinWrite(Signal),
}

/// Errors raised while turning a request body into a rig command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Endpoint name is not one the rig understands
    UnknownEndpoint(heapless::String<32>),
    /// Body is not valid JSON or misses a field
    Malformed(heapless::String<128>),
    /// Angle is NaN or infinite
    NonFiniteAngle,
}

/// Camera capture errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// Camera process could not be started
    Spawn(heapless::String<128>),
    /// Camera process exited unsuccessfully
    Failed(Option<i32>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Port(e) => write!(f, "Output port error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
            Error::Capture(e) => write!(f, "Capture error: {}", e),
            #[cfg(feature = "std")]
            Error::Spawn(msg) => write!(f, "Failed to start motion thread: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidStepsPerRotation(v) => {
                write!(f, "Invalid steps per rotation: {}. Must be > 0", v)
            }
            ConfigError::InvalidRotorLimits { angle_max, tolerance } => write!(
                f,
                "Invalid rotor limits: tolerance {} leaves no range within {} degrees",
                tolerance, angle_max
            ),
            ConfigError::ZeroDelay(name) => write!(f, "Delay '{}' must be > 0", name),
            ConfigError::HomingNotFaster { homing_us, normal_us } => write!(
                f,
                "Homing pulse delay {}us must be shorter than normal delay {}us",
                homing_us, normal_us
            ),
            ConfigError::IdleTooShort { idle_us, normal_us } => write!(
                f,
                "Idle delay {}us must be longer than normal delay {}us",
                idle_us, normal_us
            ),
            ConfigError::MissingPin(signal) => write!(f, "No pin supplied for '{}'", signal),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::PinWrite(signal) => write!(f, "Failed to drive '{}'", signal),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownEndpoint(name) => write!(f, "Unknown endpoint '{}'", name),
            CommandError::Malformed(msg) => write!(f, "Malformed request: {}", msg),
            CommandError::NonFiniteAngle => write!(f, "Angle must be a finite number"),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Spawn(msg) => write!(f, "Could not start camera: {}", msg),
            CaptureError::Failed(Some(code)) => write!(f, "Camera exited with status {}", code),
            CaptureError::Failed(None) => write!(f, "Camera terminated by signal"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<PortError> for Error {
    fn from(e: PortError) -> Self {
        Error::Port(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

impl From<CaptureError> for Error {
    fn from(e: CaptureError) -> Self {
        Error::Capture(e)
    }
}

/// Copy a message into a fixed-capacity string, truncating on a char boundary.
pub(crate) fn truncated<const N: usize>(msg: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for PortError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

#[cfg(feature = "std")]
impl std::error::Error for CaptureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_keeps_short_messages() {
        let s: heapless::String<16> = truncated("short");
        assert_eq!(s.as_str(), "short");
    }

    #[test]
    fn test_truncated_cuts_long_messages() {
        let s: heapless::String<4> = truncated("abcdefgh");
        assert_eq!(s.as_str(), "abcd");
    }

    #[test]
    fn test_display_names_signal() {
        let e = Error::from(PortError::PinWrite(Signal::RotorStep));
        let msg = format!("{}", e);
        assert!(msg.contains("rotor_step"));
    }
}
