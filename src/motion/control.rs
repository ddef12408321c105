//! The motion loop.
//!
//! A single owner drives every output pin and keeps every step count. Each
//! iteration:
//!
//! 1. releases both STEP lines
//! 2. mirrors the ring light flag to both light outputs
//! 3. homes the rotor if a home was requested (the flag is consumed first
//!    and put back if a pin write fails mid-run)
//! 4. plans both axes against the live targets
//! 5. at rest: reports settled and waits the idle delay
//! 6. otherwise: pulses one step on each axis that still has to move
//!
//! The loop has no terminal state and cannot be cancelled. An iteration is
//! never interrupted once its pulse sequence has started.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use tracing::{debug, info, warn};

use crate::config::units::{Degrees, Steps};
use crate::config::{PulseTiming, RigConfig};
use crate::error::Result;
use crate::hw::{Axis, OutputPort, Signal};

use super::axis::AxisTracker;
use super::homing::HomingRoutine;
use super::pulse::PulseGenerator;

/// Live target angles, read once per iteration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Targets {
    /// Rotor target (already clamped by the writer).
    pub rotor: Degrees,
    /// Turntable target (unbounded).
    pub turntable: Degrees,
}

impl Targets {
    /// Target for one axis.
    #[inline]
    pub fn get(&self, axis: Axis) -> Degrees {
        match axis {
            Axis::Rotor => self.rotor,
            Axis::Turntable => self.turntable,
        }
    }
}

/// Where the loop reads its inputs from and reports rest to.
///
/// Implementations are shared with other threads; every method takes `&self`.
///
/// Every write that can cause motion (a target or a home request) advances a
/// generation counter. The loop reads the generation before anything else in
/// an iteration and hands it back with the settle report, so a report never
/// covers a write the iteration might have missed.
pub trait MotionSource {
    /// Current ring light request.
    fn ringlight_on(&self) -> bool;

    /// Generation of the latest motion-causing write.
    fn generation(&self) -> u64;

    /// Consume a pending home request. Returns `true` at most once per request.
    fn take_home_request(&self) -> bool;

    /// Put back a home request whose homing run failed.
    fn rearm_home(&self);

    /// Current targets.
    fn targets(&self) -> Targets;

    /// Both axes are at the targets of `generation`.
    fn notify_settled(&self, generation: u64);
}

impl<S: MotionSource + ?Sized> MotionSource for &S {
    fn ringlight_on(&self) -> bool {
        (**self).ringlight_on()
    }

    fn generation(&self) -> u64 {
        (**self).generation()
    }

    fn take_home_request(&self) -> bool {
        (**self).take_home_request()
    }

    fn rearm_home(&self) {
        (**self).rearm_home()
    }

    fn targets(&self) -> Targets {
        (**self).targets()
    }

    fn notify_settled(&self, generation: u64) {
        (**self).notify_settled(generation)
    }
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopMode {
    /// Following targets one step per iteration.
    Tracking,
    /// Running the homing routine.
    Homing,
}

impl LoopMode {
    /// Mode name for logging.
    pub fn name(self) -> &'static str {
        match self {
            LoopMode::Tracking => "Tracking",
            LoopMode::Homing => "Homing",
        }
    }
}

/// Counters kept by the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Iterations started.
    pub iterations: u64,
    /// Iterations that found both axes at rest.
    pub idle_iterations: u64,
    /// Tracking pulses emitted per axis, rotor first.
    pub pulses: [u64; 2],
    /// Completed homing runs.
    pub homing_runs: u64,
}

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iteration {
    /// The homing routine ran.
    pub homed: bool,
    /// Step taken per axis (`-1`, `0`, `1`), rotor first.
    pub steps: [i64; 2],
}

impl Iteration {
    /// Both axes were at rest.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.steps == [0, 0]
    }
}

/// The control loop: sole owner of the output port and the step counts.
pub struct MotionLoop<P, D>
where
    P: OutputPort,
    D: DelayNs,
{
    port: P,
    delay: D,
    axes: [AxisTracker; 2],
    pulse: PulseGenerator,
    homing: HomingRoutine,
    rezero_after_homing: bool,
    idle_us: u32,
    mode: LoopMode,
    ringlight: Option<bool>,
    settled: bool,
    stats: LoopStats,
}

impl<P, D> MotionLoop<P, D>
where
    P: OutputPort,
    D: DelayNs,
{
    /// Create a loop for a rig. Both axes start at step zero.
    pub fn new(config: &RigConfig, port: P, delay: D) -> Self {
        let timing: &PulseTiming = &config.timing;
        Self {
            port,
            delay,
            axes: [
                AxisTracker::new(
                    Axis::Rotor,
                    config.rotor.steps_per_rotation,
                    config.rotor.invert_direction,
                ),
                AxisTracker::new(
                    Axis::Turntable,
                    config.turntable.steps_per_rotation,
                    config.turntable.invert_direction,
                ),
            ],
            pulse: PulseGenerator::new(timing),
            homing: HomingRoutine::new(&config.rotor, timing),
            rezero_after_homing: config.rotor.rezero_after_homing,
            idle_us: timing.idle_us,
            mode: LoopMode::Tracking,
            ringlight: None,
            settled: false,
            stats: LoopStats::default(),
        }
    }

    /// Tracked position of an axis.
    #[inline]
    pub fn position(&self, axis: Axis) -> Steps {
        self.tracker(axis).position()
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    /// Counters so far.
    #[inline]
    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// The output port.
    #[inline]
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Drive both enable lines active.
    pub fn enable_drivers(&mut self) -> Result<()> {
        for axis in Axis::ALL {
            self.port.set_output(axis.enable_signal(), PinState::High)?;
        }
        Ok(())
    }

    /// Run one iteration.
    pub fn iterate<S: MotionSource + ?Sized>(&mut self, source: &S) -> Result<Iteration> {
        self.stats.iterations += 1;

        let generation = source.generation();

        self.pulse.release(&mut self.port)?;
        self.mirror_ringlight(source.ringlight_on())?;

        let homed = if source.take_home_request() {
            if let Err(e) = self.home() {
                warn!(error = %e, "homing interrupted, request kept");
                source.rearm_home();
                return Err(e);
            }
            true
        } else {
            false
        };

        let targets = source.targets();
        let moves = [
            self.axes[0].pending(targets.get(Axis::Rotor)),
            self.axes[1].pending(targets.get(Axis::Turntable)),
        ];

        if moves == [0, 0] {
            if !self.settled {
                debug!("motion settled");
                self.settled = true;
            }
            source.notify_settled(generation);
            self.stats.idle_iterations += 1;
            self.delay.delay_us(self.idle_us);
            return Ok(Iteration {
                homed,
                steps: [0, 0],
            });
        }

        if self.settled {
            debug!(rotor = moves[0], turntable = moves[1], "motion started");
            self.settled = false;
        }

        let steps = self
            .pulse
            .emit(&mut self.port, &mut self.delay, &mut self.axes, moves)?;
        for (count, step) in self.stats.pulses.iter_mut().zip(steps) {
            if step != 0 {
                *count += 1;
            }
        }

        Ok(Iteration { homed, steps })
    }

    /// Enable the drivers, then iterate forever.
    ///
    /// A failed pin write ends only the iteration it happened in; the loop
    /// logs it and waits the idle delay before trying again.
    pub fn run<S: MotionSource + ?Sized>(mut self, source: &S) -> ! {
        if let Err(e) = self.enable_drivers() {
            tracing::error!(error = %e, "failed to enable stepper drivers");
        }
        info!(
            rotor_steps = self.axes[0].steps_per_rotation(),
            turntable_steps = self.axes[1].steps_per_rotation(),
            homing_pulses = self.homing.pulses(),
            "motion loop running"
        );

        loop {
            if let Err(e) = self.iterate(source) {
                tracing::error!(error = %e, "motion loop iteration failed");
                self.delay.delay_us(self.idle_us);
            }
        }
    }

    fn tracker(&self, axis: Axis) -> &AxisTracker {
        match axis {
            Axis::Rotor => &self.axes[0],
            Axis::Turntable => &self.axes[1],
        }
    }

    fn mirror_ringlight(&mut self, on: bool) -> Result<()> {
        if self.ringlight != Some(on) {
            info!(on, "ring light");
            self.ringlight = Some(on);
        }
        let level = PinState::from(on);
        for signal in Signal::RING_LIGHTS {
            self.port.set_output(signal, level)?;
        }
        Ok(())
    }

    fn home(&mut self) -> Result<()> {
        self.mode = LoopMode::Homing;
        debug!(mode = self.mode.name(), "entering mode");

        let result = self.homing.run(&mut self.port, &mut self.delay);

        self.mode = LoopMode::Tracking;
        result?;

        self.stats.homing_runs += 1;
        if self.rezero_after_homing {
            self.axes[0].rezero();
        }
        debug!(
            mode = self.mode.name(),
            rotor_position = self.axes[0].position().value(),
            "homing complete"
        );
        Ok(())
    }
}
