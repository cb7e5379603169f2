//! BDD step definitions for the status snapshot

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use cucumber::{given, then, when};
use tower::ServiceExt;

use vigil::dashboard::build_router;
use vigil::failure_log::FailureRecord;
use vigil::monitor::TargetMonitor;
use vigil::registry::Registry;

use crate::world::VigilWorld;

#[given(expr = "a registry with target {string}")]
fn registry_with_target(world: &mut VigilWorld, url: String) {
    let monitor = Arc::new(TargetMonitor::new(
        url,
        vec!["+1555".to_string()],
        Duration::from_secs(60),
    ));
    world.monitor = Some(monitor.clone());
    world.registry = Some(Arc::new(Registry::new(vec![monitor])));
}

#[given(expr = "the target recorded a failure at {int} ms taking {int} ms")]
async fn target_recorded_failure(world: &mut VigilWorld, stamp_ms: i64, took_ms: i64) {
    let monitor = world.monitor.as_ref().expect("no monitor set");
    monitor.status().write().await.record_failure(FailureRecord {
        reason: "i/o timeout".to_string(),
        took_ms,
        stamp_ms,
    });
}

#[given(expr = "the target recorded a success at {int} ms")]
async fn target_recorded_success(world: &mut VigilWorld, stamp_ms: i64) {
    let monitor = world.monitor.as_ref().expect("no monitor set");
    monitor.status().write().await.record_success(stamp_ms);
}

#[when("the snapshot endpoint is queried")]
async fn snapshot_endpoint_queried(world: &mut VigilWorld) {
    let registry = world.registry.as_ref().expect("no registry set").clone();
    let app = build_router(registry);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    world.response_status = Some(response.status().as_u16());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.response_json = Some(serde_json::from_slice(&body).unwrap());
}

#[then(expr = "the response status is {int}")]
fn response_status_is(world: &mut VigilWorld, expected: u16) {
    assert_eq!(world.response_status, Some(expected));
}

#[then(expr = "the snapshot lists {int} target/targets")]
fn snapshot_lists_targets(world: &mut VigilWorld, expected: usize) {
    let json = world.response_json.as_ref().expect("no response captured");
    assert_eq!(json.as_array().expect("not an array").len(), expected);
}

#[then(expr = "the snapshot URL is {string}")]
fn snapshot_url_is(world: &mut VigilWorld, expected: String) {
    let json = world.response_json.as_ref().expect("no response captured");
    assert_eq!(json[0]["URL"], expected.as_str());
}

#[then(expr = "the first failure stamp is {int}")]
fn first_failure_stamp(world: &mut VigilWorld, expected: i64) {
    let json = world.response_json.as_ref().expect("no response captured");
    assert_eq!(json[0]["Failures"][0]["StampMs"], expected);
}

#[then(expr = "the first failure error contains {string}")]
fn first_failure_error_contains(world: &mut VigilWorld, needle: String) {
    let json = world.response_json.as_ref().expect("no response captured");
    let error = json[0]["Failures"][0]["Error"]
        .as_str()
        .expect("Error is not a string");
    assert!(error.contains(&needle), "'{}' not in '{}'", needle, error);
}

#[then("the snapshot shows the target as dead")]
fn snapshot_target_dead(world: &mut VigilWorld) {
    let json = world.response_json.as_ref().expect("no response captured");
    assert_eq!(json[0]["Alive"], false);
}

#[then("the snapshot shows the target as alive")]
fn snapshot_target_alive(world: &mut VigilWorld) {
    let json = world.response_json.as_ref().expect("no response captured");
    assert_eq!(json[0]["Alive"], true);
}

#[then(expr = "the snapshot last success is {int}")]
fn snapshot_last_success(world: &mut VigilWorld, expected: i64) {
    let json = world.response_json.as_ref().expect("no response captured");
    assert_eq!(json[0]["LastSuccessMs"], expected);
}

#[then(expr = "the snapshot last failure is {int}")]
fn snapshot_last_failure(world: &mut VigilWorld, expected: i64) {
    let json = world.response_json.as_ref().expect("no response captured");
    assert_eq!(json[0]["LastFailureMs"], expected);
}
