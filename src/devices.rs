//! Camera device discovery and selection.
//!
//! The host pushes snapshots of the available device set as hardware
//! enumeration progresses; the set may start empty. Selection policy is
//! deliberately minimal: prefer the rear-facing device, nothing else.

use tokio::sync::mpsc;

/// Physical placement of a camera device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePosition {
    Back,
    Front,
    External,
}

/// Opaque handle to a physical camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub name: String,
    pub position: DevicePosition,
}

impl CameraDevice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: DevicePosition) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
        }
    }
}

/// Pick the rear-facing device from a snapshot, if one is present.
///
/// Front-facing and external devices are never selected.
pub fn select_back_device(devices: &[CameraDevice]) -> Option<CameraDevice> {
    devices
        .iter()
        .find(|d| d.position == DevicePosition::Back)
        .cloned()
}

/// Observes device-set updates until a usable camera appears.
pub struct DeviceResolver {
    updates: mpsc::Receiver<Vec<CameraDevice>>,
}

impl DeviceResolver {
    pub fn new(updates: mpsc::Receiver<Vec<CameraDevice>>) -> Self {
        Self { updates }
    }

    /// Await snapshots until one contains a rear-facing device.
    ///
    /// Returns `None` if the host closes the update stream before a back
    /// camera ever shows up, which ends device resolution for the session.
    pub async fn wait_for_back_device(&mut self) -> Option<CameraDevice> {
        while let Some(snapshot) = self.updates.recv().await {
            log::debug!("device snapshot: {} device(s)", snapshot.len());
            if let Some(device) = select_back_device(&snapshot) {
                log::info!("selected camera: {} ({})", device.name, device.id);
                return Some(device);
            }
        }
        log::warn!("device stream closed without a rear-facing camera");
        None
    }
}

/// Print a device snapshot to stdout, one line per device.
pub fn print_devices(devices: &[CameraDevice]) {
    println!("Camera Devices:");
    if devices.is_empty() {
        println!("  (none found)");
    } else {
        for device in devices {
            println!("  [{}] {} ({:?})", device.id, device.name, device.position);
        }
    }
}
