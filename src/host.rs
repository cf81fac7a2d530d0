//! External collaborator contracts.
//!
//! The camera hardware, the file system, and the native blur module are
//! all outside this crate's control. Each is modeled as a trait with the
//! contract the real collaborator exposes; `sim` provides simulated
//! implementations for the demo binary and the test suites.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::analysis::NativeValue;
use crate::capture::CaptureError;
use crate::devices::CameraDevice;
use crate::encode::EncodeError;
use crate::permissions::PermissionStatus;

/// Camera hardware collaborator.
#[async_trait]
pub trait CameraHost: Send + Sync {
    /// Request camera authorization from the platform.
    ///
    /// One-shot: the session calls this exactly once at startup. May pop a
    /// platform permission dialog outside this crate's control.
    async fn request_permission(&self) -> PermissionStatus;

    /// Subscribe to the live set of available camera devices.
    ///
    /// The set may be empty at first and become non-empty later; every
    /// change is pushed as a fresh snapshot. The current snapshot is
    /// delivered immediately on subscription.
    fn observe_devices(&self) -> tokio::sync::mpsc::Receiver<Vec<CameraDevice>>;

    /// Take a single still photo on the given device.
    ///
    /// Requires the device to be actively previewing. Returns the path of
    /// a temporary file holding the image.
    async fn capture(&self, device: &CameraDevice) -> Result<PathBuf, CaptureError>;
}

/// File-system collaborator used to turn a captured photo into text.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Read the file at `path` and return its contents base64-encoded.
    async fn read_as_base64(&self, path: &Path) -> Result<String, EncodeError>;
}

/// Error-path callback of the Android native bridge.
pub type ErrorCallback = Box<dyn FnOnce(String) + Send>;

/// Success-path callback of the Android native bridge, receiving the
/// verdict value directly.
pub type SuccessCallback = Box<dyn FnOnce(NativeValue) + Send>;

/// Completion callback of the iOS native bridge, receiving
/// `(error, results)`; on success the verdict is `results[0]`.
pub type CompletionCallback = Box<dyn FnOnce(Option<String>, Vec<NativeValue>) + Send>;

/// Native blur module as exposed on Android: two separate callbacks.
pub trait AndroidBlurModule: Send + Sync {
    fn check_for_blurry_image(
        &self,
        image: &str,
        on_error: ErrorCallback,
        on_success: SuccessCallback,
    );
}

/// Native blur module as exposed on iOS: one `(error, results)` callback.
pub trait IosBlurModule: Send + Sync {
    fn check_for_blurry_image(&self, image: &str, completion: CompletionCallback);
}
