//! Text rendering of the single capture screen.
//!
//! One screen, one state at a time: loading indicator while no device is
//! available, live preview with the capture action, photo review with the
//! verdict line, or inline error text. Rendering is a pure function of
//! the session so every state is directly assertable.

use crate::session::{Session, SessionPhase};

const HEADER: &str = "Blur Check";

/// Render the current screen for `session`.
pub fn render(session: &Session) -> String {
    let mut lines = vec![format!("== {} ==", HEADER)];

    match session.phase() {
        SessionPhase::AwaitingPermission => {
            lines.push("Requesting camera permission...".to_string());
        }
        SessionPhase::Blocked => {
            lines.push(format!(
                "Camera access is not available (permission: {}).",
                session.permission().name()
            ));
        }
        SessionPhase::AwaitingDevice => {
            lines.push("Waiting for a camera device...".to_string());
        }
        SessionPhase::Live => {
            if let Some(device) = session.device() {
                lines.push(format!("[ live preview: {} ]", device.name));
            }
            lines.push("> Take Photo".to_string());
            if let Some(error) = session.error() {
                lines.push(format!("Error: {}", error));
            }
        }
        SessionPhase::Capturing => {
            lines.push("Capturing...".to_string());
        }
        SessionPhase::Analyzing => {
            lines.push("Analyzing photo...".to_string());
        }
        SessionPhase::Reviewing => {
            if let Some(photo) = session.photo() {
                lines.push(format!("[ photo: {} ]", photo.path.display()));
            }
            if let Some(verdict) = session.verdict() {
                lines.push(verdict.display_message());
            }
            lines.push("> Take New Photo".to_string());
        }
        SessionPhase::Errored => {
            if let Some(error) = session.error() {
                lines.push(format!("Error: {}", error));
            }
            lines.push("> Take New Photo".to_string());
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{CameraDevice, DevicePosition};
    use crate::permissions::PermissionStatus;

    #[test]
    fn test_render_awaiting_permission() {
        let session = Session::new();
        assert!(render(&session).contains("Requesting camera permission"));
    }

    #[test]
    fn test_render_blocked_names_permission() {
        let mut session = Session::new();
        session.permission_resolved(PermissionStatus::Denied);
        let screen = render(&session);
        assert!(screen.contains("not available"));
        assert!(screen.contains("denied"));
        // No preview and no capture action while gated.
        assert!(!screen.contains("Take Photo"));
        assert!(!screen.contains("live preview"));
    }

    #[test]
    fn test_render_loading_while_no_device() {
        let mut session = Session::new();
        session.permission_resolved(PermissionStatus::Authorized);
        assert!(render(&session).contains("Waiting for a camera"));
    }

    #[test]
    fn test_render_live_offers_capture() {
        let mut session = Session::new();
        session.permission_resolved(PermissionStatus::Authorized);
        session.device_ready(CameraDevice::new(
            "cam0",
            "Rear Wide Camera",
            DevicePosition::Back,
        ));
        let screen = render(&session);
        assert!(screen.contains("live preview: Rear Wide Camera"));
        assert!(screen.contains("> Take Photo"));
    }
}
