//! Shared motion state.
//!
//! Every field is a single scalar written by request handlers and read by
//! the motion loop once per iteration. Atomics are enough: there is no
//! consistency requirement between fields, and next-iteration visibility is
//! all the loop needs.
//!
//! Target and home writes bump a generation counter after storing their value.
//! A waiter captures the generation after its own writes and only accepts a
//! rest report from an iteration that started at that generation or later.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::units::Degrees;
use crate::config::RotorLimits;
use crate::motion::{MotionSource, Targets};

use super::gate::SettleGate;

/// Targets, flags and the settle notification of the one physical rig.
#[derive(Debug)]
pub struct MotionState {
    rotor_target: AtomicU64,
    turntable_target: AtomicU64,
    ringlight_on: AtomicBool,
    home_requested: AtomicBool,
    generation: AtomicU64,
    limits: RotorLimits,
    gate: SettleGate,
}

impl MotionState {
    /// Power-on state: both targets at zero, ring light on, home pending.
    ///
    /// The initial rotor target is not clamped; the pending home establishes
    /// the reference before any target is tracked.
    pub fn new(limits: RotorLimits) -> Self {
        Self {
            rotor_target: AtomicU64::new(0f64.to_bits()),
            turntable_target: AtomicU64::new(0f64.to_bits()),
            ringlight_on: AtomicBool::new(true),
            home_requested: AtomicBool::new(true),
            generation: AtomicU64::new(0),
            limits,
            gate: SettleGate::new(),
        }
    }

    /// Limits applied to rotor targets.
    pub fn limits(&self) -> RotorLimits {
        self.limits
    }

    /// Turn the ring light on or off. Latest write wins.
    pub fn set_ringlight(&self, on: bool) {
        self.ringlight_on.store(on, Ordering::Relaxed);
    }

    /// Set the rotor target, clamped into the allowed range. Returns the stored value.
    pub fn set_rotor_target(&self, angle: Degrees) -> Degrees {
        let clamped = self.limits.clamp(angle);
        self.rotor_target.store(clamped.0.to_bits(), Ordering::Relaxed);
        self.bump();
        clamped
    }

    /// Add `delta` to the turntable target. Returns the new target.
    ///
    /// Concurrent adjustments all land; none is lost to a racing write.
    pub fn adjust_turntable_target(&self, delta: Degrees) -> Degrees {
        let previous = match self.turntable_target.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |bits| Some((f64::from_bits(bits) + delta.0).to_bits()),
        ) {
            Ok(bits) | Err(bits) => f64::from_bits(bits),
        };
        self.bump();
        Degrees(previous + delta.0)
    }

    /// Ask the loop to home the rotor. Coalesces with a pending request.
    pub fn request_home(&self) {
        self.home_requested.store(true, Ordering::Release);
        self.bump();
    }

    /// Whether a home request is waiting to be picked up.
    pub fn home_pending(&self) -> bool {
        self.home_requested.load(Ordering::Acquire)
    }

    /// Current rotor target.
    pub fn rotor_target(&self) -> Degrees {
        Degrees(f64::from_bits(self.rotor_target.load(Ordering::Relaxed)))
    }

    /// Current turntable target.
    pub fn turntable_target(&self) -> Degrees {
        Degrees(f64::from_bits(self.turntable_target.load(Ordering::Relaxed)))
    }

    /// Generation of the latest target or home write.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Clear the settle notification ahead of a [`wait_for_stop`](Self::wait_for_stop).
    pub fn request_stop_wait(&self) {
        self.gate.clear();
    }

    /// Block until the loop reports both axes at rest on the current targets.
    pub fn wait_for_stop(&self) {
        self.gate.wait(self.generation());
    }

    /// Clear the notification and wait until the loop reports rest on every
    /// target written so far.
    pub fn await_motion_settled(&self) {
        let required = self.generation();
        self.gate.clear_and_wait(required);
    }

    /// The settle notification.
    pub fn gate(&self) -> &SettleGate {
        &self.gate
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new(RotorLimits::default())
    }
}

impl MotionSource for MotionState {
    fn ringlight_on(&self) -> bool {
        self.ringlight_on.load(Ordering::Relaxed)
    }

    fn generation(&self) -> u64 {
        MotionState::generation(self)
    }

    fn take_home_request(&self) -> bool {
        self.home_requested.swap(false, Ordering::AcqRel)
    }

    fn rearm_home(&self) {
        self.home_requested.store(true, Ordering::Release);
    }

    fn targets(&self) -> Targets {
        Targets {
            rotor: self.rotor_target(),
            turntable: self.turntable_target(),
        }
    }

    fn notify_settled(&self, generation: u64) {
        self.gate.set(generation);
    }
}
