//! Camera permission gating.
//!
//! The platform is asked for camera authorization exactly once per
//! session. Anything other than an explicit grant keeps the camera
//! feature gated; no automatic retry is attempted.

use crate::host::CameraHost;

/// Camera authorization status as reported by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    /// Not yet resolved.
    #[default]
    Unknown,
    /// The user granted camera access.
    Authorized,
    /// The user declined camera access.
    Denied,
    /// Camera access is blocked by device policy.
    Restricted,
}

impl PermissionStatus {
    /// Get the human-readable name of this status.
    pub fn name(&self) -> &'static str {
        match self {
            PermissionStatus::Unknown => "unknown",
            PermissionStatus::Authorized => "authorized",
            PermissionStatus::Denied => "denied",
            PermissionStatus::Restricted => "restricted",
        }
    }

    /// True only for an explicit grant. Every other value, including
    /// `Unknown`, gates the camera feature.
    pub fn is_authorized(&self) -> bool {
        matches!(self, PermissionStatus::Authorized)
    }
}

/// Requests and holds the camera authorization status for one session.
#[derive(Debug, Default)]
pub struct PermissionGate {
    status: PermissionStatus,
    resolved: bool,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the authorization status, asking the platform at most once.
    ///
    /// Subsequent calls return the held status without touching the host;
    /// the status is read-only for the rest of the session.
    pub async fn resolve(&mut self, host: &dyn CameraHost) -> PermissionStatus {
        if !self.resolved {
            self.status = host.request_permission().await;
            self.resolved = true;
            log::info!("camera permission resolved: {}", self.status.name());
        }
        self.status
    }

    /// The last resolved status, `Unknown` until [`resolve`](Self::resolve) completes.
    pub fn status(&self) -> PermissionStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimCameraHost;

    #[test]
    fn test_status_name() {
        assert_eq!(PermissionStatus::Unknown.name(), "unknown");
        assert_eq!(PermissionStatus::Authorized.name(), "authorized");
        assert_eq!(PermissionStatus::Denied.name(), "denied");
        assert_eq!(PermissionStatus::Restricted.name(), "restricted");
    }

    #[test]
    fn test_only_explicit_grant_authorizes() {
        assert!(PermissionStatus::Authorized.is_authorized());
        assert!(!PermissionStatus::Denied.is_authorized());
        assert!(!PermissionStatus::Restricted.is_authorized());
        assert!(!PermissionStatus::Unknown.is_authorized());
    }

    #[tokio::test]
    async fn test_gate_requests_exactly_once() {
        let host = SimCameraHost::new(PermissionStatus::Authorized);
        let mut gate = PermissionGate::new();

        let first = gate.resolve(&host).await;
        let second = gate.resolve(&host).await;

        assert_eq!(first, PermissionStatus::Authorized);
        assert_eq!(second, PermissionStatus::Authorized);
        assert_eq!(host.permission_requests(), 1);
    }

    #[tokio::test]
    async fn test_gate_holds_denied_status() {
        let host = SimCameraHost::new(PermissionStatus::Denied);
        let mut gate = PermissionGate::new();

        assert_eq!(gate.status(), PermissionStatus::Unknown);
        let status = gate.resolve(&host).await;
        assert_eq!(status, PermissionStatus::Denied);
        assert_eq!(gate.status(), PermissionStatus::Denied);
    }
}
