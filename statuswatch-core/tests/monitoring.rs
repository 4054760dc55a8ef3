//! End-to-end behaviour of the monitor with scripted providers.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{github_monitor, RecordingNotifier, ScriptedAdapter, Step};
use statuswatch_core::{Scheduler, Severity, TransitionKind};

#[tokio::test]
async fn test_github_outage_and_recovery() {
    let adapter = ScriptedAdapter::new([
        Step::ok(Severity::Operational),
        Step::ok(Severity::MajorOutage),
        Step::ok(Severity::PartialOutage),
        Step::ok(Severity::Operational),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = github_monitor(adapter, notifier.clone(), &["ops"]);

    let mut kinds = Vec::new();
    for _ in 0..4 {
        kinds.push(monitor.poll("github").await.unwrap().event.kind);
    }

    assert_eq!(
        kinds,
        vec![
            TransitionKind::FirstObservation,
            TransitionKind::Degraded,
            TransitionKind::Unchanged,
            TransitionKind::Recovered,
        ]
    );

    let messages = notifier.sent_to("ops");
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("[GitHub] is having problems"));
    assert!(messages[0].contains("operational → major outage"));
    assert!(messages[1].contains("[GitHub] has recovered"));
    assert!(messages[1].contains("partial outage → operational"));

    let entry = monitor.registry().get("github").unwrap();
    assert_eq!(entry.severity(), Severity::Operational);
    assert!(entry.last_notified_at.is_some());
}

#[tokio::test]
async fn test_outage_is_reported_after_clock_steps_back() {
    let adapter = ScriptedAdapter::new([
        Step::ok(Severity::Operational),
        Step::skewed(Severity::MajorOutage, chrono::Duration::minutes(-5)),
        Step::skewed(Severity::MajorOutage, chrono::Duration::minutes(-4)),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = github_monitor(adapter, notifier.clone(), &["ops"]);

    let mut kinds = Vec::new();
    for _ in 0..3 {
        kinds.push(monitor.poll("github").await.unwrap().event.kind);
    }

    assert_eq!(
        kinds,
        vec![
            TransitionKind::FirstObservation,
            TransitionKind::Degraded,
            TransitionKind::Unchanged,
        ]
    );
    assert_eq!(notifier.sent_to("ops").len(), 1);
    assert_eq!(monitor.registry().get("github").unwrap().severity(), Severity::MajorOutage);
}

#[tokio::test]
async fn test_first_observation_never_notifies() {
    for severity in [Severity::Operational, Severity::Degraded, Severity::MajorOutage] {
        let notifier = Arc::new(RecordingNotifier::default());
        let monitor = github_monitor(ScriptedAdapter::new([Step::ok(severity)]), notifier.clone(), &["ops"]);

        let outcome = monitor.poll("github").await.unwrap();
        assert_eq!(outcome.event.kind, TransitionKind::FirstObservation);
        assert!(outcome.dispatch.is_none());
        assert!(notifier.sent().is_empty());
        assert!(monitor.registry().get("github").unwrap().last_notified_at.is_none());
    }
}

#[tokio::test]
async fn test_failures_do_not_touch_the_registry() {
    let adapter = ScriptedAdapter::new([
        Step::ok(Severity::Operational),
        Step::FetchError,
        Step::ParseError,
        Step::FetchError,
        Step::ok(Severity::Operational),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = github_monitor(adapter, notifier.clone(), &["ops"]);

    monitor.poll("github").await.unwrap();
    let recorded = monitor.registry().get("github");

    for _ in 0..3 {
        assert!(monitor.poll("github").await.is_err());
        assert_eq!(monitor.registry().get("github"), recorded);
    }
    assert_eq!(monitor.registry().failures("github"), 3);

    // Recovering from fetch errors is not a status transition.
    let outcome = monitor.poll("github").await.unwrap();
    assert_eq!(outcome.event.kind, TransitionKind::Unchanged);
    assert_eq!(monitor.registry().failures("github"), 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_failing_target_does_not_block_others() {
    let adapter = ScriptedAdapter::new([
        Step::ok(Severity::Operational),
        Step::ok(Severity::Degraded),
        Step::ok(Severity::Degraded),
    ]);
    let notifier = Arc::new(RecordingNotifier::failing_for(&["room-2"]));
    let monitor = github_monitor(adapter, notifier.clone(), &["room-1", "room-2", "room-3"]);

    monitor.poll("github").await.unwrap();
    let report = monitor.poll("github").await.unwrap().dispatch.unwrap();

    assert_eq!(report.attempted(), 3);
    assert_eq!(report.delivered.len(), 2);
    assert_eq!(report.failed[0].0.as_str(), "room-2");
    assert_eq!(notifier.sent_to("room-1").len(), 1);
    assert_eq!(notifier.sent_to("room-3").len(), 1);

    // The failed delivery is not retried by the next poll.
    let again = monitor.poll("github").await.unwrap();
    assert_eq!(again.event.kind, TransitionKind::Unchanged);
    assert!(again.dispatch.is_none());
    assert_eq!(notifier.sent().len(), 2);
}

#[tokio::test]
async fn test_summary_change_alone_is_unchanged() {
    let adapter = ScriptedAdapter::new([
        Step::with_summary(Severity::Degraded, "Elevated error rates"),
        Step::with_summary(Severity::Degraded, "Fix is being rolled out"),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = github_monitor(adapter, notifier.clone(), &["ops"]);

    monitor.poll("github").await.unwrap();
    let outcome = monitor.poll("github").await.unwrap();

    assert_eq!(outcome.event.kind, TransitionKind::Unchanged);
    assert!(notifier.sent().is_empty());
    assert_eq!(
        monitor.registry().get("github").unwrap().summary(),
        Some("Fix is being rolled out")
    );
}

#[tokio::test]
async fn test_forced_check_on_unknown_service() {
    let adapter = ScriptedAdapter::new([]);
    let monitor = github_monitor(adapter.clone(), Arc::new(RecordingNotifier::default()), &["ops"]);

    let err = monitor.force_check("gitlab").await.unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.to_string(), "unknown or disabled service 'gitlab'");
    assert!(monitor.registry().is_empty());
    assert_eq!(adapter.calls(), 0);
}

#[tokio::test]
async fn test_forced_check_dispatches_like_a_poll() {
    let adapter = ScriptedAdapter::new([Step::ok(Severity::Operational), Step::ok(Severity::PartialOutage)]);
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = github_monitor(adapter, notifier.clone(), &["ops"]);

    monitor.poll("github").await.unwrap();
    let view = monitor.force_check("github").await.unwrap();

    assert_eq!(view.severity, Severity::PartialOutage);
    assert_eq!(notifier.sent_to("ops").len(), 1);
    assert_eq!(monitor.snapshot()[0].severity, Severity::PartialOutage);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_checks_notify_once() {
    let adapter = ScriptedAdapter::new([
        Step::ok(Severity::Operational),
        Step::ok(Severity::MajorOutage),
        Step::ok(Severity::MajorOutage),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = Arc::new(github_monitor(adapter, notifier.clone(), &["ops"]));

    monitor.poll("github").await.unwrap();

    let scheduled = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.poll("github").await.map(|o| o.event.kind) })
    };
    let forced = monitor.force_check("github").await.map(|v| v.severity);

    let scheduled = scheduled.await.unwrap().unwrap();
    assert_eq!(forced.unwrap(), Severity::MajorOutage);
    assert!(matches!(scheduled, TransitionKind::Degraded | TransitionKind::Unchanged));
    assert_eq!(notifier.sent_to("ops").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_cycle_survives_failures() {
    let adapter = ScriptedAdapter::new([
        Step::ok(Severity::Operational),
        Step::FetchError,
        Step::ParseError,
        Step::ok(Severity::MajorOutage),
    ]);
    let notifier = Arc::new(RecordingNotifier::default());
    let monitor = Arc::new(github_monitor(adapter.clone(), notifier.clone(), &["ops"]));

    let handle = Scheduler::builder(monitor.clone())
        .interval(Duration::from_secs(60))
        .build()
        .unwrap()
        .start();

    // Ticks at 0s, 60s, 120s, 180s
    tokio::time::sleep(Duration::from_secs(190)).await;
    handle.shutdown().await;

    assert_eq!(adapter.calls(), 4);
    assert_eq!(notifier.sent_to("ops").len(), 1);
    assert_eq!(monitor.snapshot()[0].severity, Severity::MajorOutage);
}
