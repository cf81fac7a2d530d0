//! One-shot photo capture.

use std::path::PathBuf;
use std::sync::Arc;

use crate::devices::CameraDevice;
use crate::host::CameraHost;

/// A photo taken during the current session, referenced by path only.
///
/// The file lives in temporary storage and is not persisted beyond the
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub path: PathBuf,
}

impl CapturedPhoto {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Errors that can occur while taking a photo.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no camera device is selected")]
    NoDevice,

    #[error("camera preview is not active")]
    PreviewInactive,

    #[error("photo capture failed: {0}")]
    Hardware(String),
}

/// Triggers a single capture on the active device.
///
/// Failures are caught at this boundary and surfaced as [`CaptureError`];
/// the capture is never retried automatically.
pub struct CaptureController {
    host: Arc<dyn CameraHost>,
}

impl CaptureController {
    pub fn new(host: Arc<dyn CameraHost>) -> Self {
        Self { host }
    }

    /// Take one still photo on `device` and return the temp-file reference.
    pub async fn take_photo(&self, device: &CameraDevice) -> Result<CapturedPhoto, CaptureError> {
        log::debug!("capturing photo on {}", device.id);
        let path = self.host.capture(device).await?;
        log::info!("captured photo at {}", path.display());
        Ok(CapturedPhoto::new(path))
    }
}
