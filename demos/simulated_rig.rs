//! Simulated rig.
//!
//! Runs the full rig against an in-memory pin bank: homes, tracks a few
//! requests, and takes "pictures" with a camera that only logs.
//!
//! ```text
//! RUST_LOG=debug cargo run --example simulated_rig -- rig.toml
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use turntable_motion::camera::CaptureArtifacts;
use turntable_motion::error::PortError;
use turntable_motion::hw::Level;
use turntable_motion::{
    load_config, start_rig, Camera, CaptureRequest, CaptureStation, OutputPort, RigCommand,
    RigConfig, Signal, StdDelay,
};

/// Counts rising edges per signal.
#[derive(Clone, Default)]
struct EdgeCounter(Arc<Mutex<HashMap<Signal, (Level, u64)>>>);

impl OutputPort for EdgeCounter {
    fn set_output(&mut self, signal: Signal, level: Level) -> Result<(), PortError> {
        let mut lines = self.0.lock();
        let (last, edges) = lines.entry(signal).or_insert((Level::Low, 0));
        if *last == Level::Low && level == Level::High {
            *edges += 1;
        }
        *last = level;
        Ok(())
    }
}

impl EdgeCounter {
    fn edges(&self, signal: Signal) -> u64 {
        self.0.lock().get(&signal).map_or(0, |&(_, n)| n)
    }
}

struct LoggingCamera;

impl Camera for LoggingCamera {
    fn capture(&mut self, request: &CaptureRequest) -> turntable_motion::Result<CaptureArtifacts> {
        info!(?request, "click");
        Ok(CaptureArtifacts::default())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_names(true)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => RigConfig::default(),
    };

    let port = EdgeCounter::default();
    let rig = start_rig(&config, port.clone(), StdDelay)?;
    let station = CaptureStation::new(rig.handle.clone(), LoggingCamera);

    let requests = [
        ("rotor", r#"{"angle": 45}"#),
        ("turntable", r#"{"angle_change": 30}"#),
        ("turntable", r#"{"angle_change": 30}"#),
        ("rotor", r#"{"angle": 200}"#),
        ("ringlight", r#"{"light_on": false}"#),
        ("home_rotor", "{}"),
    ];

    for (endpoint, body) in requests {
        RigCommand::parse(endpoint, body)?.apply(&rig.handle);
        station.capture(&CaptureRequest::from_json(r#"{"shutter": 10000}"#)?)?;

        let targets = rig.handle.targets();
        info!(
            endpoint,
            rotor_target = targets.rotor.value(),
            turntable_target = targets.turntable.value(),
            rotor_pulses = port.edges(Signal::RotorStep),
            turntable_pulses = port.edges(Signal::TurntableStep),
            "request done"
        );
    }

    if let Err(e) = RigCommand::parse("laser", "{}") {
        info!(error = %e, "unknown endpoints are rejected");
    }

    Ok(())
}
