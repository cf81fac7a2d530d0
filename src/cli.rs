//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::platform::HostPlatform;

/// Host platform selection for the demo session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Android,
    Ios,
}

impl From<Platform> for HostPlatform {
    fn from(p: Platform) -> Self {
        match p {
            Platform::Android => HostPlatform::Android,
            Platform::Ios => HostPlatform::Ios,
        }
    }
}

/// Analysis outcome the simulated native module should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Outcome {
    #[default]
    Blurry,
    Clear,
    Fail,
}

#[derive(Debug, Parser)]
#[command(name = "blur-check", about = "Capture a photo and check it for blur")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one capture session against the simulated camera host
    Run {
        /// Path to a config file (default: platform config dir)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override host platform detection
        #[arg(long, value_enum)]
        platform: Option<Platform>,

        /// What the simulated native analysis should report
        #[arg(long, value_enum, default_value_t = Outcome::Blurry)]
        outcome: Outcome,

        /// Simulate the user denying camera permission
        #[arg(long)]
        deny_permission: bool,
    },
    /// List the camera devices the host reports
    ListDevices,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::parse_from(["blur-check", "run"]);
        match cli.command {
            Some(Commands::Run {
                config,
                platform,
                outcome,
                deny_permission,
            }) => {
                assert!(config.is_none());
                assert!(platform.is_none());
                assert_eq!(outcome, Outcome::Blurry);
                assert!(!deny_permission);
            }
            other => panic!("expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_run_with_flags() {
        let cli = Cli::parse_from([
            "blur-check",
            "run",
            "--platform",
            "ios",
            "--outcome",
            "clear",
            "--deny-permission",
        ]);
        match cli.command {
            Some(Commands::Run {
                platform,
                outcome,
                deny_permission,
                ..
            }) => {
                assert_eq!(platform, Some(Platform::Ios));
                assert_eq!(outcome, Outcome::Clear);
                assert!(deny_permission);
            }
            other => panic!("expected run command, got {:?}", other),
        }
    }

    #[test]
    fn test_platform_maps_to_host_platform() {
        assert_eq!(HostPlatform::from(Platform::Android), HostPlatform::Android);
        assert_eq!(HostPlatform::from(Platform::Ios), HostPlatform::Ios);
    }
}
