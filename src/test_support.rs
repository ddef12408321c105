//! Fakes shared by the unit tests.

use core::cell::Cell;
use std::vec::Vec;

use embedded_hal::digital::PinState;

use crate::config::units::Degrees;
use crate::error::PortError;
use crate::hw::{OutputPort, Signal};
use crate::motion::{MotionSource, Targets};

/// Output port that records every write.
///
/// `fail_on` rejects every write of that level to that signal. `fail_at`
/// rejects the write with that index, once.
#[derive(Debug, Default)]
pub(crate) struct RecordingPort {
    pub writes: Vec<(Signal, PinState)>,
    pub fail_on: Option<(Signal, PinState)>,
    pub fail_at: Option<usize>,
    pub attempts: usize,
}

impl RecordingPort {
    /// Number of rising edges written to `signal`.
    pub fn rising_edges(&self, signal: Signal) -> usize {
        let mut level = PinState::Low;
        let mut edges = 0;
        for (s, l) in &self.writes {
            if *s == signal {
                if *l == PinState::High && level == PinState::Low {
                    edges += 1;
                }
                level = *l;
            }
        }
        edges
    }

    /// Levels written to `signal`, in order.
    pub fn levels(&self, signal: Signal) -> Vec<PinState> {
        self.writes
            .iter()
            .filter(|(s, _)| *s == signal)
            .map(|(_, l)| *l)
            .collect()
    }
}

impl OutputPort for RecordingPort {
    fn set_output(&mut self, signal: Signal, level: PinState) -> Result<(), PortError> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_on == Some((signal, level)) {
            return Err(PortError::PinWrite(signal));
        }
        if self.fail_at == Some(attempt) {
            self.fail_at = None;
            return Err(PortError::PinWrite(signal));
        }
        self.writes.push((signal, level));
        Ok(())
    }
}

/// Single-threaded motion source.
#[derive(Debug)]
pub(crate) struct FakeSource {
    pub rotor: Cell<Degrees>,
    pub turntable: Cell<Degrees>,
    pub ringlight: Cell<bool>,
    pub home: Cell<bool>,
    pub settled: Cell<u32>,
    pub generation: Cell<u64>,
    pub reported: Cell<Option<u64>>,
}

impl FakeSource {
    pub fn at_rest() -> Self {
        Self {
            rotor: Cell::new(Degrees(0.0)),
            turntable: Cell::new(Degrees(0.0)),
            ringlight: Cell::new(true),
            home: Cell::new(false),
            settled: Cell::new(0),
            generation: Cell::new(0),
            reported: Cell::new(None),
        }
    }
}

impl MotionSource for FakeSource {
    fn ringlight_on(&self) -> bool {
        self.ringlight.get()
    }

    fn generation(&self) -> u64 {
        self.generation.get()
    }

    fn take_home_request(&self) -> bool {
        self.home.replace(false)
    }

    fn rearm_home(&self) {
        self.home.set(true);
    }

    fn targets(&self) -> Targets {
        Targets {
            rotor: self.rotor.get(),
            turntable: self.turntable.get(),
        }
    }

    fn notify_settled(&self, generation: u64) {
        self.settled.set(self.settled.get() + 1);
        self.reported.set(Some(generation));
    }
}
