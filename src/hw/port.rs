//! Hardware output port.
//!
//! The control loop only ever needs "set signal S to level L". [`OutputPort`]
//! is that seam; [`PinBank`] implements it over eight embedded-hal pins.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::{ConfigError, Error, PortError, Result};

use super::signal::Signal;

/// Digital output capability for the rig's logical signals.
pub trait OutputPort {
    /// Drive `signal` to `level`.
    fn set_output(&mut self, signal: Signal, level: PinState) -> core::result::Result<(), PortError>;
}

impl<T: OutputPort + ?Sized> OutputPort for &mut T {
    #[inline]
    fn set_output(&mut self, signal: Signal, level: PinState) -> core::result::Result<(), PortError> {
        (**self).set_output(signal, level)
    }
}

/// Eight output pins addressed by [`Signal`].
pub struct PinBank<P: OutputPin> {
    pins: [P; Signal::COUNT],
}

impl<P: OutputPin> PinBank<P> {
    /// Start assembling a bank pin by pin.
    pub fn builder() -> PinBankBuilder<P> {
        PinBankBuilder::new()
    }

    /// Create a bank from pins in [`Signal::ALL`] order.
    pub fn from_array(pins: [P; Signal::COUNT]) -> Self {
        Self { pins }
    }
}

impl<P: OutputPin> OutputPort for PinBank<P> {
    fn set_output(&mut self, signal: Signal, level: PinState) -> core::result::Result<(), PortError> {
        self.pins[signal.index()]
            .set_state(level)
            .map_err(|_| PortError::PinWrite(signal))
    }
}

/// Builder for [`PinBank`].
pub struct PinBankBuilder<P: OutputPin> {
    pins: [Option<P>; Signal::COUNT],
}

impl<P: OutputPin> Default for PinBankBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin> PinBankBuilder<P> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            pins: core::array::from_fn(|_| None),
        }
    }

    /// Assign the pin driving `signal`.
    pub fn pin(mut self, signal: Signal, pin: P) -> Self {
        self.pins[signal.index()] = Some(pin);
        self
    }

    /// Build the bank.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingPin` for the first signal without a pin.
    pub fn build(self) -> Result<PinBank<P>> {
        let take = |pin: Option<P>, signal: Signal| {
            pin.ok_or(Error::Config(ConfigError::MissingPin(signal)))
        };

        let [rotor_dir, rotor_step, rotor_enable, turntable_dir, turntable_step, turntable_enable, light1, light2] =
            self.pins;

        Ok(PinBank {
            pins: [
                take(rotor_dir, Signal::RotorDir)?,
                take(rotor_step, Signal::RotorStep)?,
                take(rotor_enable, Signal::RotorEnable)?,
                take(turntable_dir, Signal::TurntableDir)?,
                take(turntable_step, Signal::TurntableStep)?,
                take(turntable_enable, Signal::TurntableEnable)?,
                take(light1, Signal::RingLight1)?,
                take(light2, Signal::RingLight2)?,
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    fn idle_mocks() -> [PinMock; Signal::COUNT] {
        core::array::from_fn(|_| PinMock::new(&[]))
    }

    #[test]
    fn test_set_output_reaches_mapped_pin() {
        let mut mocks = idle_mocks();
        mocks[Signal::RotorStep.index()].done();
        mocks[Signal::RotorStep.index()] = PinMock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let mut handles = mocks.clone();

        let mut bank = PinBank::from_array(mocks);
        bank.set_output(Signal::RotorStep, PinState::High).unwrap();
        bank.set_output(Signal::RotorStep, PinState::Low).unwrap();

        for pin in handles.iter_mut() {
            pin.done();
        }
    }

    #[test]
    fn test_builder_places_pins_by_signal() {
        let mut mocks = idle_mocks();
        mocks[Signal::RingLight2.index()].done();
        mocks[Signal::RingLight2.index()] = PinMock::new(&[Transaction::set(State::High)]);
        let mut handles = mocks.clone();

        let mut builder = PinBank::builder();
        for (signal, pin) in Signal::ALL.iter().zip(mocks) {
            builder = builder.pin(*signal, pin);
        }
        let mut bank = builder.build().unwrap();
        bank.set_output(Signal::RingLight2, PinState::High).unwrap();

        for pin in handles.iter_mut() {
            pin.done();
        }
    }

    #[test]
    fn test_builder_reports_missing_pin() {
        // No writes are expected; settle the mocks before the builder drops them.
        let mut mocks = idle_mocks();
        for pin in mocks.iter_mut() {
            pin.done();
        }

        let mut builder = PinBank::builder();
        for (signal, pin) in Signal::ALL.iter().zip(mocks) {
            if *signal != Signal::TurntableEnable {
                builder = builder.pin(*signal, pin);
            }
        }

        let result = builder.build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingPin(Signal::TurntableEnable)))
        ));
    }
}
