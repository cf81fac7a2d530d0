//! Host platform detection.
//!
//! The native blur module exposes a different callback contract depending
//! on the host platform, so the platform is resolved exactly once at
//! startup and used to pick the matching detector variant.

/// Supported host platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    /// Android native bridge: separate error and success callbacks.
    Android,
    /// iOS native bridge: single `(error, results)` completion callback.
    Ios,
}

impl HostPlatform {
    /// Get the human-readable name of this platform.
    pub fn name(&self) -> &'static str {
        match self {
            HostPlatform::Android => "android",
            HostPlatform::Ios => "ios",
        }
    }

    /// Detect the platform from the compilation target.
    ///
    /// Anything that is not Android is treated as iOS, mirroring the
    /// two-way dispatch of the native bridge.
    pub fn detect() -> Self {
        if cfg!(target_os = "android") {
            HostPlatform::Android
        } else {
            HostPlatform::Ios
        }
    }

    /// Parse a platform name, as used in config files.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Some(HostPlatform::Android),
            "ios" => Some(HostPlatform::Ios),
            _ => None,
        }
    }
}
