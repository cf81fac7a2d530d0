use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use blur_check::analysis::{AndroidBlurDetector, BlurDetector, IosBlurDetector, NativeValue};
use blur_check::cli::{Cli, Commands, Outcome};
use blur_check::config::Config;
use blur_check::devices::{self, CameraDevice, DevicePosition};
use blur_check::permissions::PermissionStatus;
use blur_check::pipeline::{ctrlc_received, setup_ctrlc_handler, CapturePipeline};
use blur_check::platform::HostPlatform;
use blur_check::render::render;
use blur_check::session::Session;
use blur_check::sim::{SimAndroidModule, SimCameraHost, SimFileStore, SimIosModule};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = setup_ctrlc_handler() {
        eprintln!("Warning: failed to install Ctrl+C handler: {}", e);
    }

    match cli.command {
        Some(Commands::ListDevices) => {
            let host = demo_host(PermissionStatus::Authorized);
            devices::print_devices(&host.devices());
        }
        Some(Commands::Run {
            config,
            platform,
            outcome,
            deny_permission,
        }) => {
            if let Err(e) = run_session(config, platform.map(Into::into), outcome, deny_permission)
            {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            // Bare invocation behaves like `run` with defaults.
            if let Err(e) = run_session(None, None, Outcome::default(), false) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Build the simulated camera host the demo session runs against.
fn demo_host(permission: PermissionStatus) -> Arc<SimCameraHost> {
    let host = Arc::new(SimCameraHost::new(permission));
    host.attach_device(CameraDevice::new(
        "cam1",
        "Front Camera",
        DevicePosition::Front,
    ));
    host
}

/// The native value the simulated module reports for a given outcome.
fn native_value(outcome: Outcome) -> NativeValue {
    match outcome {
        Outcome::Blurry => NativeValue::Text("Blurry".to_string()),
        Outcome::Clear => NativeValue::Number(0.0),
        Outcome::Fail => NativeValue::Null, // unused, the module fails instead
    }
}

fn run_session(
    config_path: Option<PathBuf>,
    platform_override: Option<HostPlatform>,
    outcome: Outcome,
    deny_permission: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load config file.
    // If --config is specified, require the file to parse; otherwise fall
    // back to defaults with a warning.
    let cfg = if let Some(ref path) = config_path {
        Config::load(Some(path.as_path()))?
    } else {
        match Config::load(None) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Config::default()
            }
        }
    };

    // Platform: CLI > config > target detection, evaluated exactly once.
    let platform = platform_override
        .or_else(|| cfg.host_platform())
        .unwrap_or_else(HostPlatform::detect);
    let convention = cfg.convention();
    log::info!("host platform: {}", platform.name());

    let permission = if deny_permission {
        PermissionStatus::Denied
    } else {
        PermissionStatus::Authorized
    };
    let host = demo_host(permission);

    let detector: Arc<dyn BlurDetector> = match (platform, outcome) {
        (HostPlatform::Android, Outcome::Fail) => Arc::new(AndroidBlurDetector::new(
            Arc::new(SimAndroidModule::failing("native analysis failed")),
            convention,
        )),
        (HostPlatform::Android, outcome) => Arc::new(AndroidBlurDetector::new(
            Arc::new(SimAndroidModule::succeeding(native_value(outcome))),
            convention,
        )),
        (HostPlatform::Ios, Outcome::Fail) => Arc::new(IosBlurDetector::new(
            Arc::new(SimIosModule::failing("native analysis failed")),
            convention,
        )),
        (HostPlatform::Ios, outcome) => Arc::new(IosBlurDetector::new(
            Arc::new(SimIosModule::succeeding(vec![native_value(outcome)])),
            convention,
        )),
    };

    let pipeline = CapturePipeline::new(host.clone(), Arc::new(SimFileStore::new()), detector);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut session = Session::new();
        println!("{}\n", render(&session));

        let status = pipeline.acquire_permission(&mut session).await;
        println!("{}\n", render(&session));
        if !status.is_authorized() {
            return Ok(());
        }

        // The rear camera enumerates a moment after startup; the session
        // shows the loading state until it does.
        let late_host = host.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            late_host.attach_device(CameraDevice::new(
                "cam0",
                "Rear Wide Camera",
                DevicePosition::Back,
            ));
        });

        if !pipeline.await_device(&mut session).await {
            return Err("camera enumeration ended without a rear-facing device".into());
        }
        println!("{}\n", render(&session));

        if ctrlc_received() {
            return Ok(());
        }

        pipeline.handle_take_photo(&mut session).await;
        println!("{}\n", render(&session));

        session.discard();
        println!("{}", render(&session));
        Ok(())
    })
}
