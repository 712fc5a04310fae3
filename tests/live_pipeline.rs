//! Integration tests for the file-backed live loop

use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use stagegraph::config::Config;
use stagegraph::layout::layout_graph;
use stagegraph::live::{watch, FileSource, LiveRun, TickOutcome};
use stagegraph::models::run::RunSnapshot;
use stagegraph::models::stage::StageState;
use tempfile::TempDir;

const PREVIOUS: &str = r#"{
    "stages": [
        {"id": 1, "name": "Checkout", "state": "success", "totalDurationMillis": 2000},
        {"id": 2, "name": "Build", "state": "success", "totalDurationMillis": 60000},
        {"id": 3, "name": "Publish", "state": "success", "totalDurationMillis": 8000}
    ],
    "complete": true
}"#;

fn write(path: &Path, content: &str) {
    fs::write(path, content).expect("Should write payload");
}

fn previous_stages() -> Vec<stagegraph::models::StageRecord> {
    RunSnapshot::parse(PREVIOUS, "previous").unwrap().stages
}

#[test]
fn test_file_backed_run_progresses_to_completion() {
    let temp_dir = TempDir::new().unwrap();
    let run_file = temp_dir.path().join("run.json");
    let steps_file = temp_dir.path().join("steps.json");
    let source = FileSource::new(&run_file, Some(steps_file.clone()));
    let mut run = LiveRun::new(previous_stages());

    // Checkout done, Build underway for 15s of the previous 60s
    write(
        &run_file,
        r#"{"stages": [
            {"id": 10, "name": "Checkout", "state": "success", "startTimeMillis": 1000, "totalDurationMillis": 1500},
            {"id": 11, "name": "Build", "state": "running", "startTimeMillis": 2500, "totalDurationMillis": 15000}
        ], "complete": false}"#,
    );
    write(&steps_file, "[]");

    assert_eq!(run.tick(&source), TickOutcome::Updated);
    let names: Vec<&str> = run.stages().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Checkout", "Build", "Publish"]);
    assert_eq!(run.stages()[1].complete_percent, 25.0);
    assert!(run.stages()[2].skeleton);
    assert_eq!(run.tick(&source), TickOutcome::Unchanged);

    // A step for the upcoming Publish stage shows up first
    write(
        &steps_file,
        r#"[{"stageId": 3, "name": "upload", "state": "running", "startTimeMillis": 70000}]"#,
    );
    assert_eq!(run.tick(&source), TickOutcome::Updated);
    let publish = &run.stages()[2];
    assert!(publish.skeleton);
    assert_eq!(publish.state, StageState::Running);
    assert_eq!(publish.start_time_millis, 70_000);

    // The file disappearing is a failed poll, not a reset
    fs::remove_file(&run_file).unwrap();
    assert_eq!(run.tick(&source), TickOutcome::Failed);
    assert_eq!(run.stages()[2].state, StageState::Running);

    write(
        &run_file,
        r#"{"stages": [
            {"id": 10, "name": "Checkout", "state": "success", "startTimeMillis": 1000, "totalDurationMillis": 1500},
            {"id": 11, "name": "Build", "state": "success", "startTimeMillis": 2500, "totalDurationMillis": 58000},
            {"id": 12, "name": "Publish", "state": "failure", "startTimeMillis": 70000, "totalDurationMillis": 3000}
        ], "complete": true}"#,
    );
    assert_eq!(run.tick(&source), TickOutcome::Complete);
    assert!(run.is_complete());
    assert!(run.stages().iter().all(|s| !s.skeleton));

    let config = Config::default();
    let graph = layout_graph(run.stages(), &config.layout, false, &config.labels);
    assert_eq!(graph.node_count(), 5);
    assert_eq!(
        StageState::most_severe(run.stages()),
        StageState::Failure
    );
}

#[test]
fn test_watch_reads_files_until_complete() {
    let temp_dir = TempDir::new().unwrap();
    let run_file = temp_dir.path().join("run.json");
    write(
        &run_file,
        r#"[{"id": 10, "name": "Checkout", "state": "success", "totalDurationMillis": 1500}]"#,
    );
    let source = FileSource::new(&run_file, None);
    let mut run = LiveRun::new(previous_stages());
    let stop = AtomicBool::new(false);
    let mut layouts = Vec::new();

    let updates = watch(&mut run, &source, Duration::from_millis(5), &stop, |run, outcome| {
        let config = Config::default();
        let graph = layout_graph(run.stages(), &config.layout, true, &config.labels);
        layouts.push(graph.node_count());
        if outcome == TickOutcome::Updated {
            // Next poll sees the finished run
            write(
                &run_file,
                r#"{"stages": [{"id": 10, "name": "Checkout", "state": "success"}], "complete": true}"#,
            );
        }
    });

    assert_eq!(updates, 2);
    // Start, Checkout, Build, Publish, End both times: unmatched previous
    // stages stay listed after the last matched one
    assert_eq!(layouts, vec![5, 5]);
    assert!(run.is_complete());
}
