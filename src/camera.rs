//! Still capture.
//!
//! A capture holds the camera for its whole run and waits for the rig to come
//! to rest while holding it, so only one capture runs at a time and none
//! starts before the rig has settled on the latest targets.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::CameraConfig;
use crate::error::{truncated, CaptureError, Result};
use crate::rig::RigHandle;

/// Options for one capture.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CaptureRequest {
    /// Also save the raw sensor data as DNG.
    pub capture_dng: bool,

    /// Manual focus position.
    pub lens_position: Option<f64>,

    /// Exposure time in microseconds.
    #[serde(rename = "shutter")]
    pub shutter_us: Option<u64>,
}

impl CaptureRequest {
    /// Parse a `take_picture` request body.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(crate::command::from_json(body)?)
    }
}

/// Files written by a capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureArtifacts {
    /// JPEG first, then the DNG if one was requested.
    pub files: Vec<PathBuf>,
}

/// Something that can take a picture.
pub trait Camera {
    /// Take one picture.
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureArtifacts>;
}

/// Shares one camera between request handlers.
#[derive(Debug)]
pub struct CaptureStation<C> {
    rig: RigHandle,
    camera: Mutex<C>,
}

impl<C: Camera> CaptureStation<C> {
    /// Create a station for `camera` on `rig`.
    pub fn new(rig: RigHandle, camera: C) -> Self {
        Self {
            rig,
            camera: Mutex::new(camera),
        }
    }

    /// Take the camera, wait for the rig to stop, then capture.
    ///
    /// Concurrent callers queue on the camera; each waits for rest only once
    /// it holds it.
    pub fn capture(&self, request: &CaptureRequest) -> Result<CaptureArtifacts> {
        let mut camera = self.camera.lock();
        self.rig.await_motion_settled();
        camera.capture(request)
    }

    /// The rig this station waits on.
    pub fn rig(&self) -> &RigHandle {
        &self.rig
    }
}

/// Captures by running `libcamera-still`.
#[derive(Debug)]
pub struct LibcameraStill {
    command: String,
    output_dir: PathBuf,
    sequence: AtomicU64,
}

impl LibcameraStill {
    /// Create from configuration.
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            command: config.command.clone(),
            output_dir: config.output_dir.clone(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Directory images are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Arguments for one capture writing `<output_dir>/<base>.jpg`.
    pub fn command_args(&self, request: &CaptureRequest, base: &str) -> Vec<String> {
        let jpg = self.output_dir.join(format!("{base}.jpg"));
        let mut args = vec![
            "--immediate".to_string(),
            "--output".to_string(),
            jpg.display().to_string(),
        ];
        if request.capture_dng {
            args.extend(["--rawfull".to_string(), "--raw".to_string()]);
        }
        if let Some(position) = request.lens_position {
            args.extend(["--lens-position".to_string(), position.to_string()]);
        }
        if let Some(shutter) = request.shutter_us {
            args.extend(["--shutter".to_string(), shutter.to_string()]);
        }
        args
    }

    /// Files a capture with `base` produces.
    pub fn artifacts(&self, request: &CaptureRequest, base: &str) -> CaptureArtifacts {
        let mut files = vec![self.output_dir.join(format!("{base}.jpg"))];
        if request.capture_dng {
            files.push(self.output_dir.join(format!("{base}.dng")));
        }
        CaptureArtifacts { files }
    }

    fn next_base_name(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("capture-{millis}-{seq}")
    }
}

impl Camera for LibcameraStill {
    #[tracing::instrument(skip(self), fields(command = %self.command))]
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureArtifacts> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| CaptureError::Spawn(truncated(&e.to_string())))?;

        let base = self.next_base_name();
        let args = self.command_args(request, &base);
        debug!(?args, "starting camera");

        let status = Command::new(&self.command)
            .args(&args)
            .status()
            .map_err(|e| CaptureError::Spawn(truncated(&e.to_string())))?;
        if !status.success() {
            return Err(CaptureError::Failed(status.code()).into());
        }

        let artifacts = self.artifacts(request, &base);
        info!(files = artifacts.files.len(), base = %base, "picture taken");
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::config::units::Degrees;
    use crate::error::Error;
    use crate::motion::MotionSource;
    use crate::rig::MotionState;

    #[derive(Debug, Default)]
    struct FakeCamera {
        taken: Vec<CaptureRequest>,
    }

    impl Camera for FakeCamera {
        fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureArtifacts> {
            self.taken.push(request.clone());
            Ok(CaptureArtifacts {
                files: vec![PathBuf::from(format!("{}.jpg", self.taken.len()))],
            })
        }
    }

    fn still(dir: &str) -> LibcameraStill {
        LibcameraStill::new(&CameraConfig {
            command: "libcamera-still".into(),
            output_dir: dir.into(),
        })
    }

    #[test]
    fn test_request_from_json() {
        let req = CaptureRequest::from_json(
            r#"{"capture_dng": true, "lens_position": 200, "shutter": 10000}"#,
        )
        .unwrap();
        assert!(req.capture_dng);
        assert_eq!(req.lens_position, Some(200.0));
        assert_eq!(req.shutter_us, Some(10_000));

        assert_eq!(CaptureRequest::from_json("{}").unwrap(), CaptureRequest::default());
        assert!(CaptureRequest::from_json(r#"{"shutter": -1}"#).is_err());
    }

    #[test]
    fn test_plain_jpeg_args() {
        let args = still("/tmp/shots").command_args(&CaptureRequest::default(), "a");
        assert_eq!(args, ["--immediate", "--output", "/tmp/shots/a.jpg"]);
    }

    #[test]
    fn test_full_args_and_artifacts() {
        let cam = still("/tmp/shots");
        let req = CaptureRequest {
            capture_dng: true,
            lens_position: Some(2.5),
            shutter_us: Some(10_000),
        };
        assert_eq!(
            cam.command_args(&req, "b"),
            [
                "--immediate",
                "--output",
                "/tmp/shots/b.jpg",
                "--rawfull",
                "--raw",
                "--lens-position",
                "2.5",
                "--shutter",
                "10000",
            ]
        );
        assert_eq!(
            cam.artifacts(&req, "b").files,
            [PathBuf::from("/tmp/shots/b.jpg"), PathBuf::from("/tmp/shots/b.dng")]
        );
    }

    #[test]
    fn test_base_names_are_unique() {
        let cam = still("/tmp/shots");
        assert_ne!(cam.next_base_name(), cam.next_base_name());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut cam = LibcameraStill::new(&CameraConfig {
            command: "definitely-not-a-camera-program".into(),
            output_dir: std::env::temp_dir().join("turntable-motion-test"),
        });
        let err = cam.capture(&CaptureRequest::default()).unwrap_err();
        assert!(matches!(err, Error::Capture(CaptureError::Spawn(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_status() {
        let mut cam = LibcameraStill::new(&CameraConfig {
            command: "false".into(),
            output_dir: std::env::temp_dir().join("turntable-motion-test"),
        });
        let err = cam.capture(&CaptureRequest::default()).unwrap_err();
        assert_eq!(err, Error::Capture(CaptureError::Failed(Some(1))));
    }

    #[test]
    fn test_station_captures_only_after_settle() {
        let state = Arc::new(MotionState::default());
        let station = Arc::new(CaptureStation::new(
            RigHandle::new(Arc::clone(&state)),
            FakeCamera::default(),
        ));

        let worker = {
            let station = Arc::clone(&station);
            thread::spawn(move || station.capture(&CaptureRequest::default()))
        };

        thread::sleep(Duration::from_millis(20));
        assert!(station.camera.lock().taken.is_empty());

        // Report rest the way the motion loop does, once per idle iteration.
        while !worker.is_finished() {
            state.notify_settled(state.generation());
            thread::sleep(Duration::from_millis(1));
        }
        let artifacts = worker.join().unwrap().unwrap();
        assert_eq!(artifacts.files, [PathBuf::from("1.jpg")]);
        assert_eq!(station.camera.lock().taken.len(), 1);
    }

    /// Records whether the rig had settled on the latest targets at the
    /// moment each capture started.
    struct CheckingCamera {
        state: Arc<MotionState>,
        settled_at_start: Arc<Mutex<Vec<bool>>>,
    }

    impl Camera for CheckingCamera {
        fn capture(&mut self, _: &CaptureRequest) -> Result<CaptureArtifacts> {
            let settled = self.state.gate().reached(self.state.generation());
            self.settled_at_start.lock().push(settled);
            thread::sleep(Duration::from_millis(80));
            Ok(CaptureArtifacts::default())
        }
    }

    #[test]
    fn test_queued_capture_waits_for_motion_started_meanwhile() {
        let state = Arc::new(MotionState::default());
        let settled_at_start = Arc::new(Mutex::new(Vec::new()));
        let station = Arc::new(CaptureStation::new(
            RigHandle::new(Arc::clone(&state)),
            CheckingCamera {
                state: Arc::clone(&state),
                settled_at_start: Arc::clone(&settled_at_start),
            },
        ));

        // Stands in for the motion loop: reports rest only while not moving.
        let moving = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));
        let reporter = {
            let state = Arc::clone(&state);
            let moving = Arc::clone(&moving);
            let running = Arc::clone(&running);
            thread::spawn(move || {
                while running.load(Ordering::Relaxed) {
                    if !moving.load(Ordering::Relaxed) {
                        state.notify_settled(state.generation());
                    }
                    thread::sleep(Duration::from_millis(1));
                }
            })
        };

        let spawn_capture = || {
            let station = Arc::clone(&station);
            thread::spawn(move || station.capture(&CaptureRequest::default()))
        };

        let first = spawn_capture();
        while settled_at_start.lock().is_empty() {
            thread::sleep(Duration::from_millis(1));
        }
        let second = spawn_capture();
        thread::sleep(Duration::from_millis(20));

        // A move arrives while the first capture holds the camera.
        moving.store(true, Ordering::Relaxed);
        state.adjust_turntable_target(Degrees(90.0));
        thread::sleep(Duration::from_millis(120));
        assert_eq!(settled_at_start.lock().len(), 1);

        moving.store(false, Ordering::Relaxed);
        first.join().unwrap().unwrap();
        second.join().unwrap().unwrap();
        assert_eq!(*settled_at_start.lock(), [true, true]);

        running.store(false, Ordering::Relaxed);
        reporter.join().unwrap();
    }
}
