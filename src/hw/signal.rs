//! Logical output signals of the rig.
//!
//! The rig exposes eight digital outputs. The control loop addresses them by
//! role, never by physical pin number; mapping roles to pins is the job of the
//! [`OutputPort`](super::OutputPort) implementation.

use core::fmt;

/// One of the two independently driven axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Tilting arm carrying the camera.
    Rotor,
    /// Continuous-rotation turntable.
    Turntable,
}

impl Axis {
    /// Both axes, rotor first.
    pub const ALL: [Axis; 2] = [Axis::Rotor, Axis::Turntable];

    /// DIR line of this axis.
    #[inline]
    pub const fn dir_signal(self) -> Signal {
        match self {
            Axis::Rotor => Signal::RotorDir,
            Axis::Turntable => Signal::TurntableDir,
        }
    }

    /// STEP line of this axis.
    #[inline]
    pub const fn step_signal(self) -> Signal {
        match self {
            Axis::Rotor => Signal::RotorStep,
            Axis::Turntable => Signal::TurntableStep,
        }
    }

    /// ENABLE line of this axis.
    #[inline]
    pub const fn enable_signal(self) -> Signal {
        match self {
            Axis::Rotor => Signal::RotorEnable,
            Axis::Turntable => Signal::TurntableEnable,
        }
    }

    /// Axis name for logging.
    pub const fn name(self) -> &'static str {
        match self {
            Axis::Rotor => "rotor",
            Axis::Turntable => "turntable",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical digital output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// Rotor direction.
    RotorDir,
    /// Rotor step pulse.
    RotorStep,
    /// Rotor driver enable.
    RotorEnable,
    /// Turntable direction.
    TurntableDir,
    /// Turntable step pulse.
    TurntableStep,
    /// Turntable driver enable.
    TurntableEnable,
    /// First ring light channel.
    RingLight1,
    /// Second ring light channel.
    RingLight2,
}

impl Signal {
    /// Number of logical signals.
    pub const COUNT: usize = 8;

    /// Every signal, in [`Signal::index`] order.
    pub const ALL: [Signal; Signal::COUNT] = [
        Signal::RotorDir,
        Signal::RotorStep,
        Signal::RotorEnable,
        Signal::TurntableDir,
        Signal::TurntableStep,
        Signal::TurntableEnable,
        Signal::RingLight1,
        Signal::RingLight2,
    ];

    /// Both ring light channels.
    pub const RING_LIGHTS: [Signal; 2] = [Signal::RingLight1, Signal::RingLight2];

    /// Dense index in `0..COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Signal::RotorDir => 0,
            Signal::RotorStep => 1,
            Signal::RotorEnable => 2,
            Signal::TurntableDir => 3,
            Signal::TurntableStep => 4,
            Signal::TurntableEnable => 5,
            Signal::RingLight1 => 6,
            Signal::RingLight2 => 7,
        }
    }

    /// Signal name for logging and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Signal::RotorDir => "rotor_dir",
            Signal::RotorStep => "rotor_step",
            Signal::RotorEnable => "rotor_enable",
            Signal::TurntableDir => "turntable_dir",
            Signal::TurntableStep => "turntable_step",
            Signal::TurntableEnable => "turntable_enable",
            Signal::RingLight1 => "ringlight_1",
            Signal::RingLight2 => "ringlight_2",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
