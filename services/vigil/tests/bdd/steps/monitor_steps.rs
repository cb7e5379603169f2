//! BDD step definitions for the target state machine

use cucumber::{given, then, when};

use vigil::failure_log::FailureRecord;
use vigil::monitor::{Liveness, MonitorStatus, Transition};

use crate::world::VigilWorld;

fn failure_numbered(n: i64) -> FailureRecord {
    FailureRecord {
        reason: format!("failure {}", n),
        took_ms: 5,
        stamp_ms: n * 1000,
    }
}

#[given("a monitor that is alive")]
fn monitor_alive(world: &mut VigilWorld) {
    world.status = Some(MonitorStatus::new());
    world.last_transition = None;
}

#[when(expr = "a probe failure is recorded at {int} ms")]
fn probe_failure_at(world: &mut VigilWorld, stamp_ms: i64) {
    let status = world.status.as_mut().expect("no monitor status set");
    let transition = status.record_failure(FailureRecord {
        reason: "connection refused".to_string(),
        took_ms: 8,
        stamp_ms,
    });
    world.last_transition = Some(transition);
}

#[when(expr = "a probe success is recorded at {int} ms")]
fn probe_success_at(world: &mut VigilWorld, stamp_ms: i64) {
    let status = world.status.as_mut().expect("no monitor status set");
    let transition = status.record_success(stamp_ms);
    world.last_transition = Some(transition);
}

#[when(expr = "{int} probe failures are recorded")]
fn many_probe_failures(world: &mut VigilWorld, count: i64) {
    let status = world.status.as_mut().expect("no monitor status set");
    for n in 1..=count {
        world.last_transition = Some(status.record_failure(failure_numbered(n)));
    }
}

#[then("the monitor is dead")]
async fn monitor_is_dead(world: &mut VigilWorld) {
    assert_eq!(current_liveness(world).await, Liveness::Dead);
}

#[then("the monitor is alive")]
async fn monitor_is_alive(world: &mut VigilWorld) {
    assert_eq!(current_liveness(world).await, Liveness::Alive);
}

async fn current_liveness(world: &VigilWorld) -> Liveness {
    if let Some(monitor) = &world.monitor {
        monitor.status().read().await.liveness
    } else {
        world
            .status
            .as_ref()
            .expect("no monitor status set")
            .liveness
    }
}

#[then("a failed transition is reported")]
fn failed_transition_reported(world: &mut VigilWorld) {
    assert_eq!(
        world.last_transition.flatten(),
        Some(Transition::Failed),
        "expected a Failed transition"
    );
}

#[then("a recovery transition is reported")]
fn recovery_transition_reported(world: &mut VigilWorld) {
    assert_eq!(
        world.last_transition.flatten(),
        Some(Transition::Recovered),
        "expected a Recovered transition"
    );
}

#[then("no transition is reported")]
fn no_transition_reported(world: &mut VigilWorld) {
    assert_eq!(world.last_transition.flatten(), None);
}

#[then(expr = "the failure log has {int} entry/entries")]
async fn failure_log_has_entries(world: &mut VigilWorld, expected: usize) {
    let len = if let Some(monitor) = &world.monitor {
        monitor.status().read().await.failures.len()
    } else {
        world
            .status
            .as_ref()
            .expect("no monitor status set")
            .failures
            .len()
    };
    assert_eq!(len, expected);
}

#[then(expr = "the oldest retained failure is number {int}")]
fn oldest_retained_failure(world: &mut VigilWorld, number: i64) {
    let status = world.status.as_ref().expect("no monitor status set");
    let oldest = status.failures.iter().next().expect("failure log is empty");
    assert_eq!(oldest.reason, format!("failure {}", number));
}

#[then(expr = "the newest retained failure is number {int}")]
fn newest_retained_failure(world: &mut VigilWorld, number: i64) {
    let status = world.status.as_ref().expect("no monitor status set");
    let newest = status.failures.iter().last().expect("failure log is empty");
    assert_eq!(newest.reason, format!("failure {}", number));
}
