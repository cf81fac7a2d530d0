//! Capture pipeline orchestration.
//!
//! Chains permission → device → capture → encode → analyze → verdict and
//! feeds every outcome into the session state machine. The steps are
//! awaited strictly in sequence, so at most one photo is ever in flight
//! and the session needs no locking; suppressing the capture action while
//! the pipeline is busy is the state machine's job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::analysis::{AnalysisError, BlurDetector};
use crate::capture::{CaptureController, CaptureError};
use crate::devices::{CameraDevice, DeviceResolver};
use crate::encode::{EncodeError, ImageEncoder};
use crate::host::{CameraHost, FileStore};
use crate::permissions::{PermissionGate, PermissionStatus};
use crate::session::{PipelineToken, Session};

/// Errors that can occur inside a capture run.
///
/// All three are caught at the orchestration boundary and stored in the
/// session as a single user-visible message; none of them crash the app.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Capture(#[from] CaptureError),

    #[error("{0}")]
    Encode(#[from] EncodeError),

    #[error("{0}")]
    Analysis(#[from] AnalysisError),
}

/// Drives one session through its pipeline steps.
pub struct CapturePipeline {
    host: Arc<dyn CameraHost>,
    capture: CaptureController,
    encoder: ImageEncoder,
    detector: Arc<dyn BlurDetector>,
}

impl CapturePipeline {
    pub fn new(
        host: Arc<dyn CameraHost>,
        store: Arc<dyn FileStore>,
        detector: Arc<dyn BlurDetector>,
    ) -> Self {
        Self {
            capture: CaptureController::new(Arc::clone(&host)),
            encoder: ImageEncoder::new(store),
            host,
            detector,
        }
    }

    /// Resolve camera permission once and record it in the session.
    pub async fn acquire_permission(&self, session: &mut Session) -> PermissionStatus {
        let mut gate = PermissionGate::new();
        let status = gate.resolve(self.host.as_ref()).await;
        session.permission_resolved(status);
        status
    }

    /// Await device enumeration until a rear-facing camera goes live.
    ///
    /// Returns false if the host stops enumerating before one appears.
    pub async fn await_device(&self, session: &mut Session) -> bool {
        let mut resolver = DeviceResolver::new(self.host.observe_devices());
        match resolver.wait_for_back_device().await {
            Some(device) => {
                session.device_ready(device);
                true
            }
            None => false,
        }
    }

    /// The "Take Photo" action: run capture, encode, and analysis in
    /// sequence and commit the verdict.
    ///
    /// Refused unless the session is live. Any step failure lands the
    /// session in `Errored` with the failure text; a session reset during
    /// the run makes every commit a no-op via the token check.
    pub async fn handle_take_photo(&self, session: &mut Session) {
        let Some(token) = session.begin_capture() else {
            return;
        };
        let Some(device) = session.device().cloned() else {
            session.pipeline_failed(token, CaptureError::NoDevice.to_string());
            return;
        };

        if let Err(err) = self.run_capture(session, token, &device).await {
            session.pipeline_failed(token, err.to_string());
        }
    }

    async fn run_capture(
        &self,
        session: &mut Session,
        token: PipelineToken,
        device: &CameraDevice,
    ) -> Result<(), PipelineError> {
        let photo = self.capture.take_photo(device).await?;
        if !session.capture_complete(token) {
            // The session reset mid-capture; abandon the run.
            return Ok(());
        }

        let encoded = self.encoder.encode(&photo).await?;
        let verdict = self.detector.analyze(&encoded).await?;
        session.enter_reviewing(token, photo, verdict);
        Ok(())
    }
}

/// Global flag for handling Ctrl+C across the application.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
pub fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup. Teardown abandons any
/// in-flight pipeline run; the session's token check keeps a late result
/// from resurfacing.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, shutting down...");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_passes_messages_through() {
        let err = PipelineError::from(CaptureError::Hardware("sensor timeout".into()));
        assert_eq!(err.to_string(), "photo capture failed: sensor timeout");

        let err = PipelineError::from(AnalysisError::Native("opencv failed".into()));
        assert_eq!(err.to_string(), "opencv failed");
    }
}
