//! Session state machine.
//!
//! One session covers the lifetime from app start to camera teardown:
//! permission, device, at most one photo under review. Transitions are
//! pure methods on [`Session`]; the async pipeline only calls into them,
//! which keeps the error paths and the stale-result guard testable
//! without any rendering or hardware.
//!
//! There are no timers and no automatic retries; every recovery
//! transition is user-initiated.

use crate::analysis::BlurVerdict;
use crate::capture::CapturedPhoto;
use crate::devices::CameraDevice;
use crate::permissions::PermissionStatus;

/// Phase of the capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Waiting for the platform permission request to resolve.
    #[default]
    AwaitingPermission,
    /// Permission was denied or restricted; camera stays gated for the
    /// rest of the session.
    Blocked,
    /// Authorized, waiting for hardware enumeration to yield a camera.
    AwaitingDevice,
    /// Live preview on the selected device; capture is available.
    Live,
    /// A capture is in flight.
    Capturing,
    /// The captured photo is being encoded and analyzed.
    Analyzing,
    /// A photo and its verdict are on screen.
    Reviewing,
    /// Capture, encode, or analysis failed; error text is on screen.
    Errored,
}

impl SessionPhase {
    /// True while the pipeline owns the camera and a second capture must
    /// be suppressed.
    pub fn is_pipeline_busy(&self) -> bool {
        matches!(self, SessionPhase::Capturing | SessionPhase::Analyzing)
    }
}

/// Proof that a pipeline run was started against a particular session
/// epoch. Commits carrying a stale token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineToken {
    epoch: u64,
}

/// The single owned, mutable aggregate of the capture feature.
///
/// Invariant: `photo` and `verdict` are both present or both absent, and
/// they change together in a single transition.
#[derive(Debug, Default)]
pub struct Session {
    phase: SessionPhase,
    permission: PermissionStatus,
    device: Option<CameraDevice>,
    photo: Option<CapturedPhoto>,
    verdict: Option<BlurVerdict>,
    error: Option<String>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    pub fn device(&self) -> Option<&CameraDevice> {
        self.device.as_ref()
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        self.photo.as_ref()
    }

    pub fn verdict(&self) -> Option<&BlurVerdict> {
        self.verdict.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the UI may offer the "Take Photo" action.
    pub fn can_take_photo(&self) -> bool {
        self.phase == SessionPhase::Live
    }

    /// Record the one-shot permission result.
    ///
    /// Authorized moves on to device resolution; anything else blocks the
    /// camera feature for the rest of the session. Ignored outside
    /// `AwaitingPermission` (the status is read-only once set).
    pub fn permission_resolved(&mut self, status: PermissionStatus) {
        if self.phase != SessionPhase::AwaitingPermission {
            log::warn!("permission result ignored in phase {:?}", self.phase);
            return;
        }
        self.permission = status;
        self.phase = if status.is_authorized() {
            SessionPhase::AwaitingDevice
        } else {
            log::info!("camera gated: permission {}", status.name());
            SessionPhase::Blocked
        };
    }

    /// A rear-facing device became available; go live.
    pub fn device_ready(&mut self, device: CameraDevice) {
        if self.phase != SessionPhase::AwaitingDevice {
            log::warn!("device ignored in phase {:?}", self.phase);
            return;
        }
        self.device = Some(device);
        self.phase = SessionPhase::Live;
    }

    /// Start a capture run. Valid only from `Live`, which guarantees a
    /// selected device, an active preview, and no photo under review.
    ///
    /// Clears any prior error text and hands back the token the pipeline
    /// must present when committing results.
    pub fn begin_capture(&mut self) -> Option<PipelineToken> {
        if self.phase != SessionPhase::Live {
            log::warn!("capture refused in phase {:?}", self.phase);
            return None;
        }
        self.error = None;
        self.phase = SessionPhase::Capturing;
        Some(PipelineToken { epoch: self.epoch })
    }

    /// The native capture finished; encoding and analysis begin.
    ///
    /// Returns false if the session moved on in the meantime, in which
    /// case the pipeline must abandon the run.
    pub fn capture_complete(&mut self, token: PipelineToken) -> bool {
        if token.epoch != self.epoch || self.phase != SessionPhase::Capturing {
            log::debug!("stale capture completion ignored");
            return false;
        }
        self.phase = SessionPhase::Analyzing;
        true
    }

    /// Commit the photo and its verdict in one transition.
    ///
    /// Returns false (and leaves the session untouched) if the token is
    /// stale or the session is no longer analyzing.
    pub fn enter_reviewing(
        &mut self,
        token: PipelineToken,
        photo: CapturedPhoto,
        verdict: BlurVerdict,
    ) -> bool {
        if token.epoch != self.epoch || self.phase != SessionPhase::Analyzing {
            log::debug!("stale analysis result ignored");
            return false;
        }
        log::info!(
            "review ready: {} (blurry: {})",
            photo.path.display(),
            verdict.is_blurry
        );
        self.photo = Some(photo);
        self.verdict = Some(verdict);
        self.phase = SessionPhase::Reviewing;
        true
    }

    /// A pipeline step failed; surface the message without crashing.
    ///
    /// Returns false if the failure arrived for an abandoned run.
    pub fn pipeline_failed(&mut self, token: PipelineToken, message: String) -> bool {
        if token.epoch != self.epoch || !self.phase.is_pipeline_busy() {
            log::debug!("stale pipeline failure ignored: {}", message);
            return false;
        }
        log::warn!("pipeline failed: {}", message);
        self.error = Some(message);
        self.photo = None;
        self.verdict = None;
        self.phase = SessionPhase::Errored;
        true
    }

    /// Discard the current photo, error, or in-flight run and return to
    /// the live preview.
    ///
    /// This is the only reset: it clears `photo` and `verdict` together,
    /// drops any error text, and bumps the epoch so late-arriving pipeline
    /// results are ignored. Idempotent from `Live`; a no-op before a
    /// device is selected or when the session is blocked.
    pub fn discard(&mut self) {
        match self.phase {
            SessionPhase::Live
            | SessionPhase::Capturing
            | SessionPhase::Analyzing
            | SessionPhase::Reviewing
            | SessionPhase::Errored => {
                self.photo = None;
                self.verdict = None;
                self.error = None;
                self.epoch += 1;
                self.phase = SessionPhase::Live;
            }
            SessionPhase::AwaitingPermission
            | SessionPhase::Blocked
            | SessionPhase::AwaitingDevice => {
                log::warn!("discard ignored in phase {:?}", self.phase);
            }
        }
    }
}
