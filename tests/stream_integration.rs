//! Library-level tests for the step stream watcher and log.

use std::io::Cursor;
use std::sync::Mutex;
use tokio::io::BufReader;
use vectra::stream::{watch, StepLog, WatchEvent, WatchReporter};
use vectra::steps::{build_forest, compute_summary, StepRecord, StepStatus};

/// Records what the watcher reported, as compact strings.
#[derive(Default)]
struct Collect {
    events: Mutex<Vec<String>>,
}

impl WatchReporter for Collect {
    fn report(&self, event: WatchEvent<'_>) {
        let line = match event {
            WatchEvent::MessageStart { generation } => format!("reset:{}", generation),
            WatchEvent::Step {
                generation,
                step,
                roots,
                summary,
            } => {
                let ids: Vec<&str> = roots.iter().map(|r| r.id()).collect();
                format!(
                    "step:{}:{}:{}:[{}]:{}",
                    generation,
                    step.id(),
                    step.status.as_str(),
                    ids.join(","),
                    summary.completed_count
                )
            }
        };
        self.events.lock().unwrap().push(line);
    }
}

#[tokio::test]
async fn test_watch_reports_each_line() {
    let stream = concat!(
        r#"{"step_id": "a", "step_type": "retrieval", "status": "running"}"#,
        "\n",
        r#"{"step_id": "b", "parent_id": "a", "status": "completed", "duration": 0.2}"#,
        "\n",
        r#"{"step_id": "a", "step_type": "retrieval", "status": "completed", "duration": 1.0}"#,
        "\n",
    );

    let log = StepLog::new();
    let reporter = Collect::default();
    let stats = watch(BufReader::new(stream.as_bytes()), log.clone(), &reporter)
        .await
        .unwrap();

    assert_eq!(stats.lines, 3);
    assert_eq!(stats.steps, 3);
    assert_eq!(stats.skipped, 0);

    let events = reporter.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "step:0:a:running:[a]:0",
            "step:0:b:completed:[a]:0",
            "step:0:a:completed:[a]:1",
        ]
    );

    let snapshot = log.snapshot().await;
    assert_eq!(snapshot.steps.len(), 3);
    let roots = build_forest(&snapshot.steps);
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].status, StepStatus::Completed);
    assert_eq!(roots[0].sub_steps.len(), 1);
    assert_eq!(compute_summary(&snapshot.steps).total_duration, 1.0);
}

#[tokio::test]
async fn test_watch_resets_and_skips_bad_lines() {
    let stream = concat!(
        r#"{"step_id": "old", "status": "completed"}"#,
        "\n",
        "{broken\n",
        "\n",
        r#"{"event": "message_start"}"#,
        "\n",
        r#"{"step_id": "new", "status": "failed"}"#,
        "\n",
    );

    let log = StepLog::new();
    let reporter = Collect::default();
    let stats = watch(BufReader::new(stream.as_bytes()), log.clone(), &reporter)
        .await
        .unwrap();

    assert_eq!(stats.lines, 5);
    assert_eq!(stats.steps, 2);
    assert_eq!(stats.resets, 1);
    assert_eq!(stats.skipped, 1);

    let snapshot = log.snapshot().await;
    assert_eq!(snapshot.generation, 1);
    let ids: Vec<&str> = snapshot.steps.iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec!["new"]);
    assert_eq!(compute_summary(&snapshot.steps).failed_count, 1);

    let events = reporter.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec!["step:0:old:completed:[old]:1", "reset:1", "step:1:new:failed:[new]:0"]
    );
}

#[tokio::test]
async fn test_each_event_sees_the_log_as_of_its_line() {
    // The reader runs ahead of the reporter; every event must still carry
    // the state its own line produced.
    let mut stream = String::new();
    stream.push_str(r#"{"step_id": "a", "status": "completed"}"#);
    stream.push('\n');
    stream.push_str(r#"{"event": "message_start"}"#);
    stream.push('\n');
    stream.push_str(r#"{"step_id": "b", "status": "running"}"#);
    stream.push('\n');
    for i in 0..200 {
        stream.push_str(&format!(r#"{{"step_id": "c{}", "parent_id": "b", "status": "completed"}}"#, i));
        stream.push('\n');
    }

    let reporter = Collect::default();
    watch(BufReader::new(Cursor::new(stream.into_bytes())), StepLog::new(), &reporter)
        .await
        .unwrap();

    let events = reporter.events.lock().unwrap().clone();
    assert_eq!(events.len(), 203);
    assert_eq!(events[0], "step:0:a:completed:[a]:1");
    assert_eq!(events[1], "reset:1");
    assert_eq!(events[2], "step:1:b:running:[b]:0");
    assert!(events[3..].iter().all(|e| e.ends_with(":completed:[b]:0")));
}

#[tokio::test]
async fn test_snapshots_are_isolated_from_later_appends() {
    let log = StepLog::new();
    log.push(StepRecord {
        step_id: Some("a".to_string()),
        ..Default::default()
    })
    .await;

    let before = log.snapshot().await;

    let writer = log.clone();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let writer = writer.clone();
            tokio::spawn(async move {
                writer
                    .push(StepRecord {
                        step_id: Some(format!("w{}", i)),
                        ..Default::default()
                    })
                    .await;
            })
        })
        .collect();
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(before.steps.len(), 1);
    assert_eq!(log.len().await, 9);
    assert_eq!(build_forest(&log.snapshot().await.steps).len(), 9);
}
