//! End-to-end pipeline tests against the simulated collaborators.
//!
//! Each test drives a full session: permission, device resolution, then
//! capture → encode → analyze → verdict, asserting the state machine and
//! the user-visible screen along the way.

use std::sync::Arc;
use std::time::Duration;

use blur_check::analysis::{
    AndroidBlurDetector, BlurConvention, BlurDetector, IosBlurDetector, NativeValue,
};
use blur_check::devices::{CameraDevice, DevicePosition};
use blur_check::permissions::PermissionStatus;
use blur_check::pipeline::CapturePipeline;
use blur_check::render::render;
use blur_check::session::{Session, SessionPhase};
use blur_check::sim::{SimAndroidModule, SimCameraHost, SimFileStore, SimIosModule};

fn back_device() -> CameraDevice {
    CameraDevice::new("cam0", "Rear Wide Camera", DevicePosition::Back)
}

fn ios_detector(results: Vec<NativeValue>) -> Arc<dyn BlurDetector> {
    Arc::new(IosBlurDetector::new(
        Arc::new(SimIosModule::succeeding(results)),
        BlurConvention::default(),
    ))
}

fn android_detector(value: NativeValue) -> Arc<dyn BlurDetector> {
    Arc::new(AndroidBlurDetector::new(
        Arc::new(SimAndroidModule::succeeding(value)),
        BlurConvention::default(),
    ))
}

struct Harness {
    host: Arc<SimCameraHost>,
    store: Arc<SimFileStore>,
    pipeline: CapturePipeline,
    session: Session,
}

fn harness(permission: PermissionStatus, detector: Arc<dyn BlurDetector>) -> Harness {
    let host = Arc::new(SimCameraHost::new(permission));
    let store = Arc::new(SimFileStore::new());
    let pipeline = CapturePipeline::new(host.clone(), store.clone(), detector);
    Harness {
        host,
        store,
        pipeline,
        session: Session::new(),
    }
}

/// Run permission and device resolution up to the live preview.
async fn go_live(h: &mut Harness) {
    h.host.attach_device(back_device());
    h.pipeline.acquire_permission(&mut h.session).await;
    assert!(h.pipeline.await_device(&mut h.session).await);
    assert_eq!(h.session.phase(), SessionPhase::Live);
}

#[tokio::test]
async fn test_happy_path_ios_blurry_photo() {
    let mut h = harness(
        PermissionStatus::Authorized,
        ios_detector(vec![NativeValue::Text("Blurry".into())]),
    );
    go_live(&mut h).await;

    h.pipeline.handle_take_photo(&mut h.session).await;

    assert_eq!(h.session.phase(), SessionPhase::Reviewing);
    let verdict = h.session.verdict().unwrap();
    assert!(verdict.is_blurry);
    assert_eq!(verdict.display_message(), "Blurry Photo is blurred!");
    // Photo and verdict became non-empty together.
    assert!(h.session.photo().is_some());

    let screen = render(&h.session);
    assert!(screen.contains("Blurry Photo is blurred!"));
    assert!(screen.contains("> Take New Photo"));
}

#[tokio::test]
async fn test_happy_path_android_clear_photo() {
    let mut h = harness(
        PermissionStatus::Authorized,
        android_detector(NativeValue::Number(0.0)),
    );
    go_live(&mut h).await;

    h.pipeline.handle_take_photo(&mut h.session).await;

    assert_eq!(h.session.phase(), SessionPhase::Reviewing);
    let verdict = h.session.verdict().unwrap();
    assert!(!verdict.is_blurry);
    assert_eq!(verdict.display_message(), "0 Photo is clear!");
}

#[tokio::test]
async fn test_denied_permission_gates_the_session() {
    let mut h = harness(
        PermissionStatus::Denied,
        ios_detector(vec![NativeValue::Text("Blurry".into())]),
    );
    h.host.attach_device(back_device());

    let status = h.pipeline.acquire_permission(&mut h.session).await;
    assert_eq!(status, PermissionStatus::Denied);
    assert_eq!(h.session.phase(), SessionPhase::Blocked);

    // No capture is possible while gated.
    h.pipeline.handle_take_photo(&mut h.session).await;
    assert_eq!(h.session.phase(), SessionPhase::Blocked);
    assert_eq!(h.host.capture_count(), 0);
    assert!(!render(&h.session).contains("live preview"));
}

#[tokio::test]
async fn test_permission_is_requested_exactly_once() {
    let mut h = harness(
        PermissionStatus::Authorized,
        ios_detector(vec![NativeValue::Null]),
    );
    go_live(&mut h).await;
    assert_eq!(h.host.permission_requests(), 1);
}

#[tokio::test]
async fn test_device_appearing_late_resolves_the_loading_state() {
    let mut h = harness(
        PermissionStatus::Authorized,
        ios_detector(vec![NativeValue::Null]),
    );
    h.pipeline.acquire_permission(&mut h.session).await;
    assert_eq!(h.session.phase(), SessionPhase::AwaitingDevice);
    assert!(render(&h.session).contains("Waiting for a camera"));

    let host = h.host.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        host.attach_device(CameraDevice::new(
            "cam1",
            "Front Camera",
            DevicePosition::Front,
        ));
        tokio::time::sleep(Duration::from_millis(20)).await;
        host.attach_device(back_device());
    });

    assert!(h.pipeline.await_device(&mut h.session).await);
    assert_eq!(h.session.phase(), SessionPhase::Live);
    assert_eq!(h.session.device().unwrap().id, "cam0");
}

#[tokio::test]
async fn test_capture_failure_surfaces_as_error_state() {
    let mut h = harness(
        PermissionStatus::Authorized,
        ios_detector(vec![NativeValue::Text("Blurry".into())]),
    );
    go_live(&mut h).await;
    h.host.fail_next_capture("sensor timeout");

    h.pipeline.handle_take_photo(&mut h.session).await;

    assert_eq!(h.session.phase(), SessionPhase::Errored);
    assert!(h.session.error().unwrap().contains("sensor timeout"));
    assert!(h.session.photo().is_none());
    assert!(h.session.verdict().is_none());
}

#[tokio::test]
async fn test_unreadable_file_surfaces_as_encode_error() {
    let mut h = harness(
        PermissionStatus::Authorized,
        ios_detector(vec![NativeValue::Text("Blurry".into())]),
    );
    go_live(&mut h).await;
    h.store.fail_reads();

    h.pipeline.handle_take_photo(&mut h.session).await;

    assert_eq!(h.session.phase(), SessionPhase::Errored);
    assert!(h.session.error().unwrap().contains("failed to read photo file"));
    assert!(h.session.photo().is_none());
    assert!(h.session.verdict().is_none());
    assert!(render(&h.session).contains("Error:"));
}

#[tokio::test]
async fn test_native_error_text_passes_through_to_the_screen() {
    let detector: Arc<dyn BlurDetector> = Arc::new(IosBlurDetector::new(
        Arc::new(SimIosModule::failing("opencv exploded")),
        BlurConvention::default(),
    ));
    let mut h = harness(PermissionStatus::Authorized, detector);
    go_live(&mut h).await;

    h.pipeline.handle_take_photo(&mut h.session).await;

    assert_eq!(h.session.phase(), SessionPhase::Errored);
    assert_eq!(h.session.error(), Some("opencv exploded"));
}

#[tokio::test]
async fn test_discard_and_retake_runs_a_fresh_capture() {
    let mut h = harness(
        PermissionStatus::Authorized,
        android_detector(NativeValue::Text("Blurry".into())),
    );
    go_live(&mut h).await;

    h.pipeline.handle_take_photo(&mut h.session).await;
    assert_eq!(h.session.phase(), SessionPhase::Reviewing);

    h.session.discard();
    assert_eq!(h.session.phase(), SessionPhase::Live);
    assert!(h.session.photo().is_none());
    assert!(h.session.verdict().is_none());

    h.pipeline.handle_take_photo(&mut h.session).await;
    assert_eq!(h.session.phase(), SessionPhase::Reviewing);
    assert_eq!(h.host.capture_count(), 2);
}

#[tokio::test]
async fn test_recovery_after_error_clears_the_message() {
    let mut h = harness(
        PermissionStatus::Authorized,
        android_detector(NativeValue::Text("Blurry".into())),
    );
    go_live(&mut h).await;

    h.host.fail_next_capture("sensor timeout");
    h.pipeline.handle_take_photo(&mut h.session).await;
    assert_eq!(h.session.phase(), SessionPhase::Errored);

    // "Take New Photo" from the error screen: discard, then capture again.
    h.session.discard();
    h.pipeline.handle_take_photo(&mut h.session).await;

    assert_eq!(h.session.phase(), SessionPhase::Reviewing);
    assert!(h.session.error().is_none());
    assert_eq!(h.session.verdict().unwrap().display_message(), "Blurry Photo is blurred!");
}
