//! Simulated collaborators.
//!
//! Stand-ins for the camera hardware, the file system, and the two native
//! blur-module bridges. They back the demo binary and the integration
//! tests: outcomes are configurable up front and every call is recorded
//! for assertions.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio::sync::mpsc;

use crate::analysis::NativeValue;
use crate::capture::CaptureError;
use crate::devices::CameraDevice;
use crate::encode::EncodeError;
use crate::host::{
    AndroidBlurModule, CameraHost, CompletionCallback, ErrorCallback, FileStore, IosBlurModule,
    SuccessCallback,
};
use crate::permissions::PermissionStatus;

fn lock<'a, T>(mutex: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated camera hardware.
///
/// Devices can be attached after startup to exercise the live,
/// re-evaluated device view; captures yield synthetic temp paths.
pub struct SimCameraHost {
    permission: PermissionStatus,
    permission_requests: AtomicUsize,
    devices: Mutex<Vec<CameraDevice>>,
    subscribers: Mutex<Vec<mpsc::Sender<Vec<CameraDevice>>>>,
    capture_count: AtomicUsize,
    capture_failure: Mutex<Option<String>>,
}

impl SimCameraHost {
    pub fn new(permission: PermissionStatus) -> Self {
        Self {
            permission,
            permission_requests: AtomicUsize::new(0),
            devices: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
            capture_count: AtomicUsize::new(0),
            capture_failure: Mutex::new(None),
        }
    }

    /// Number of times permission was requested.
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// Number of captures attempted.
    pub fn capture_count(&self) -> usize {
        self.capture_count.load(Ordering::SeqCst)
    }

    /// Make the next capture fail with a hardware error.
    pub fn fail_next_capture(&self, message: impl Into<String>) {
        *lock(&self.capture_failure) = Some(message.into());
    }

    /// Plug a camera in: extends the device set and pushes a fresh
    /// snapshot to every subscriber.
    pub fn attach_device(&self, device: CameraDevice) {
        let snapshot = {
            let mut devices = lock(&self.devices);
            devices.push(device);
            devices.clone()
        };
        let mut subscribers = lock(&self.subscribers);
        subscribers.retain(|tx| tx.try_send(snapshot.clone()).is_ok());
    }

    /// Current device snapshot.
    pub fn devices(&self) -> Vec<CameraDevice> {
        lock(&self.devices).clone()
    }
}

#[async_trait]
impl CameraHost for SimCameraHost {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.permission
    }

    fn observe_devices(&self) -> mpsc::Receiver<Vec<CameraDevice>> {
        let (tx, rx) = mpsc::channel(8);
        // New subscribers see the current snapshot immediately.
        let _ = tx.try_send(lock(&self.devices).clone());
        lock(&self.subscribers).push(tx);
        rx
    }

    async fn capture(&self, device: &CameraDevice) -> Result<PathBuf, CaptureError> {
        let shot = self.capture_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(message) = lock(&self.capture_failure).take() {
            return Err(CaptureError::Hardware(message));
        }
        Ok(std::env::temp_dir().join(format!("blur-check-{}-{}.jpg", device.id, shot)))
    }
}

/// Simulated file store: serves fabricated image bytes for any path, or
/// fails every read when told to.
#[derive(Default)]
pub struct SimFileStore {
    fail_reads: AtomicBool,
    read_count: AtomicUsize,
}

impl SimFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make all subsequent reads fail, as if the OS removed the temp file
    /// between capture and read.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileStore for SimFileStore {
    async fn read_as_base64(&self, path: &Path) -> Result<String, EncodeError> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(EncodeError::Unreadable {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file removed"),
            });
        }
        Ok(STANDARD.encode(path.to_string_lossy().as_bytes()))
    }
}

/// Outcome configured on a simulated Android blur module.
#[derive(Debug, Clone)]
pub enum AndroidOutcome {
    Succeed(NativeValue),
    Fail(String),
}

/// Simulated Android native bridge: invokes exactly one of the two
/// callbacks, synchronously.
pub struct SimAndroidModule {
    outcome: Mutex<AndroidOutcome>,
    calls: AtomicUsize,
}

impl SimAndroidModule {
    pub fn succeeding(value: NativeValue) -> Self {
        Self {
            outcome: Mutex::new(AndroidOutcome::Succeed(value)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Mutex::new(AndroidOutcome::Fail(message.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AndroidBlurModule for SimAndroidModule {
    fn check_for_blurry_image(
        &self,
        _image: &str,
        on_error: ErrorCallback,
        on_success: SuccessCallback,
    ) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.outcome).clone() {
            AndroidOutcome::Succeed(value) => on_success(value),
            AndroidOutcome::Fail(message) => on_error(message),
        }
    }
}

/// Simulated iOS native bridge: invokes the single completion callback
/// with the configured `(error, results)` pair.
pub struct SimIosModule {
    error: Mutex<Option<String>>,
    results: Mutex<Vec<NativeValue>>,
    calls: AtomicUsize,
}

impl SimIosModule {
    pub fn succeeding(results: Vec<NativeValue>) -> Self {
        Self {
            error: Mutex::new(None),
            results: Mutex::new(results),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Mutex::new(Some(message.into())),
            results: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IosBlurModule for SimIosModule {
    fn check_for_blurry_image(&self, _image: &str, completion: CompletionCallback) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        completion(lock(&self.error).clone(), lock(&self.results).clone());
    }
}
