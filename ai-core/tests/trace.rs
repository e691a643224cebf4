mod support;

use ai_core::{ActionResult, Behavior};
use ai_tools::tags;
use support::{Bot, CapturedLogs, Scripted, SharedLog};

const DT: f32 = 0.1;

fn idle_then_chase() -> Box<dyn ai_core::Action<Bot>> {
    Scripted::new("Idle")
        .updating(|_| ActionResult::change_to(Scripted::new("Chase").boxed(), "enemy spotted"))
        .boxed()
}

#[test]
fn debug_behavior_reports_transitions_to_the_sink() {
    let mut bot = Bot::new(42);
    let log = SharedLog::default();
    let mut behavior = Behavior::new(idle_then_chase())
        .with_debug(true)
        .with_trace_sink(Box::new(log.clone()));

    behavior.update(&mut bot, DT);
    behavior.update(&mut bot, DT);

    let log = log.0.borrow();
    assert_eq!(
        log.lines(),
        [
            "CHANGE_TO Idle",
            "STARTING Idle",
            "CHANGE_TO Idle",
            "ENDING Idle",
            "STARTING Chase",
        ]
    );

    let change = &log.events[2];
    assert_eq!(change.tick, 2);
    assert_eq!(change.actor, 42);
    assert_eq!(change.other.as_deref(), Some("Chase"));
    assert_eq!(change.reason.as_deref(), Some("enemy spotted"));

    let first = &log.events[0];
    assert_eq!(first.reason.as_deref(), Some("Starting Action"));
    assert_eq!(log.with_tag(tags::STARTING).count(), 2);
}

#[test]
fn suspension_and_resumption_are_traced() {
    let mut bot = Bot::new(1);
    let log = SharedLog::default();
    let patrol = Scripted::new("Patrol").updating(|_| {
        ActionResult::suspend_for(
            Scripted::new("Reload")
                .updating(|_| ActionResult::done("reloaded"))
                .boxed(),
            "clip empty",
        )
    });
    let mut behavior = Behavior::new(patrol.boxed()).with_trace_sink(Box::new(log.clone()));
    behavior.set_debug(true);

    behavior.update(&mut bot, DT);
    log.0.borrow_mut().events.clear();

    behavior.update(&mut bot, DT);
    behavior.update(&mut bot, DT);

    assert_eq!(
        log.0.borrow().lines(),
        [
            "SUSPEND_FOR Patrol",
            "SUSPENDING Patrol",
            "STARTING Reload",
            "DONE Reload",
            "ENDING Reload",
            "RESUMING Patrol",
        ]
    );
}

#[test]
fn nothing_is_traced_unless_debug_is_enabled() {
    let mut bot = Bot::new(1);
    let log = SharedLog::default();
    let mut behavior = Behavior::new(idle_then_chase()).with_trace_sink(Box::new(log.clone()));
    assert!(!behavior.is_debug());

    behavior.update(&mut bot, DT);
    behavior.update(&mut bot, DT);

    assert!(log.0.borrow().events.is_empty());
    assert_eq!(behavior.active_name(), Some("Chase"));
}

#[test]
fn transitions_are_logged_at_debug_level() {
    let logs = CapturedLogs::default();
    let mut bot = Bot::new(1);
    let mut behavior = Behavior::new(idle_then_chase()).with_debug(true);

    logs.during(tracing::Level::DEBUG, || {
        behavior.update(&mut bot, DT);
        behavior.update(&mut bot, DT);
    });

    assert_eq!(behavior.active_name(), Some("Chase"));
    let output = logs.contents();
    assert!(output
        .lines()
        .any(|line| line.contains("DEBUG") && line.contains("STARTING") && line.contains("action=Chase")));
    assert!(output.contains("enemy spotted"));
}

#[test]
fn transitions_are_not_logged_without_debug() {
    let logs = CapturedLogs::default();
    let mut bot = Bot::new(1);
    let mut behavior = Behavior::new(idle_then_chase());

    logs.during(tracing::Level::DEBUG, || {
        behavior.update(&mut bot, DT);
        behavior.update(&mut bot, DT);
    });

    assert_eq!(behavior.active_name(), Some("Chase"));
    assert!(!logs.contents().contains("STARTING"));
}
