//! The running rig: shared state, the control thread, and the handle
//! request handlers use to talk to it (std only).

mod gate;
mod state;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use embedded_hal::delay::DelayNs;
use tracing::info;

use crate::config::units::Degrees;
use crate::config::{validate_config, RigConfig};
use crate::error::{truncated, Error, Result};
use crate::hw::OutputPort;
use crate::motion::{MotionLoop, MotionSource, Targets};

pub use gate::SettleGate;
pub use state::MotionState;

/// Name of the control thread.
pub const MOTION_THREAD_NAME: &str = "motion-loop";

/// Cloneable handle to the rig's shared state.
///
/// This is the whole surface the request layer gets: it can set targets and
/// flags and wait for rest, but never touches pins or step counts.
#[derive(Debug, Clone)]
pub struct RigHandle {
    state: Arc<MotionState>,
}

impl RigHandle {
    /// Wrap shared state.
    pub fn new(state: Arc<MotionState>) -> Self {
        Self { state }
    }

    /// Turn the ring light on or off.
    pub fn set_ringlight(&self, on: bool) {
        self.state.set_ringlight(on);
    }

    /// Set the rotor target angle. Out-of-range angles are clamped; the stored
    /// target is returned.
    pub fn set_rotor_target(&self, angle: Degrees) -> Degrees {
        self.state.set_rotor_target(angle)
    }

    /// Rotate the turntable target by `delta`. Returns the new target.
    pub fn adjust_turntable_target(&self, delta: Degrees) -> Degrees {
        self.state.adjust_turntable_target(delta)
    }

    /// Request a rotor homing pass.
    pub fn request_home(&self) {
        self.state.request_home();
    }

    /// Block until both axes are at rest on every target written so far.
    ///
    /// Must be called before every camera capture.
    pub fn await_motion_settled(&self) {
        self.state.await_motion_settled();
    }

    /// Clear the settle notification. Call before [`wait_for_stop`](Self::wait_for_stop).
    pub fn request_stop_wait(&self) {
        self.state.request_stop_wait();
    }

    /// Block until the loop next reports rest.
    pub fn wait_for_stop(&self) {
        self.state.wait_for_stop();
    }

    /// Current targets.
    pub fn targets(&self) -> Targets {
        self.state.targets()
    }

    /// Current ring light request.
    pub fn ringlight_on(&self) -> bool {
        self.state.ringlight_on()
    }

    /// Generation of the latest target or home write.
    pub fn generation(&self) -> u64 {
        self.state.generation()
    }

    /// Whether a home request is still waiting for the loop.
    pub fn home_pending(&self) -> bool {
        self.state.home_pending()
    }

    /// The shared state.
    pub fn state(&self) -> &Arc<MotionState> {
        &self.state
    }
}

/// A started rig.
#[derive(Debug)]
pub struct Rig {
    /// Handle for request handlers.
    pub handle: RigHandle,
    /// The control thread. It never finishes.
    pub thread: JoinHandle<()>,
}

/// Validate `config`, create the shared state, and start the control thread.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the thread cannot be
/// spawned.
pub fn start_rig<P, D>(config: &RigConfig, port: P, delay: D) -> Result<Rig>
where
    P: OutputPort + Send + 'static,
    D: DelayNs + Send + 'static,
{
    validate_config(config)?;

    let state = Arc::new(MotionState::new(config.rotor.limits()));
    let motion = MotionLoop::new(config, port, delay);

    let loop_state = Arc::clone(&state);
    let thread = thread::Builder::new()
        .name(MOTION_THREAD_NAME.into())
        .spawn(move || {
            motion.run(&*loop_state);
        })
        .map_err(|e| Error::Spawn(truncated(&e.to_string())))?;

    info!(thread = MOTION_THREAD_NAME, "rig started");

    Ok(Rig {
        handle: RigHandle::new(state),
        thread,
    })
}
