//! Hardware-facing types: logical signals and the output port.

#[cfg(feature = "std")]
mod delay;
mod port;
mod signal;

#[cfg(feature = "std")]
pub use delay::StdDelay;
pub use port::{OutputPort, PinBank, PinBankBuilder};
pub use signal::{Axis, Signal};

/// Output level of a signal.
pub use embedded_hal::digital::PinState as Level;
