//! Integration tests for merge, step projection and layout in sequence

use std::borrow::Cow;

use stagegraph::config::Config;
use stagegraph::layout::{layout_graph, NodeKind};
use stagegraph::merge::merge_stage_infos;
use stagegraph::models::run::{parse_steps, RunSnapshot};
use stagegraph::models::stage::StageState;
use stagegraph::projector::refresh_stages_from_steps;

const PREVIOUS: &str = r#"[
    {"id": "co", "name": "Checkout", "state": "success", "totalDurationMillis": 3000},
    {"id": "t", "name": "Tests", "state": "success", "totalDurationMillis": 90000, "children": [
        {"id": "u", "name": "Unit", "type": "PARALLEL", "state": "success", "totalDurationMillis": 60000},
        {"id": "l", "name": "Lint", "type": "PARALLEL", "state": "success", "totalDurationMillis": 20000}
    ]},
    {"id": "d", "name": "Deploy", "state": "success", "totalDurationMillis": 12000}
]"#;

const CURRENT: &str = r#"{"stages": [
    {"id": "co", "name": "Checkout", "state": "success", "startTimeMillis": 100, "totalDurationMillis": 2500},
    {"id": "t", "name": "Tests", "state": "running", "startTimeMillis": 2600, "totalDurationMillis": 45000, "children": [
        {"id": "u", "name": "Unit", "type": "PARALLEL", "state": "running", "startTimeMillis": 2600, "totalDurationMillis": 30000}
    ]}
], "complete": false}"#;

#[test]
fn test_merge_project_layout() {
    let config = Config::default();
    let previous = RunSnapshot::parse(PREVIOUS, "previous").unwrap().stages;
    let current = RunSnapshot::parse(CURRENT, "current").unwrap().stages;
    let steps = parse_steps(
        r#"[{"stageId": "d", "state": "queued", "startTimeMillis": 50000}]"#,
        "steps",
    )
    .unwrap();

    let merged = merge_stage_infos(&previous, &current);
    let stages = refresh_stages_from_steps(&merged, &steps);
    assert!(matches!(stages, Cow::Owned(_)));

    let tests = &stages[1];
    assert_eq!(tests.complete_percent, 50.0);
    let branches: Vec<(&str, bool)> = tests
        .children
        .iter()
        .map(|c| (c.name.as_str(), c.skeleton))
        .collect();
    assert_eq!(branches, vec![("Unit", false), ("Lint", true)]);
    assert_eq!(stages[2].state, StageState::Queued);

    let graph = layout_graph(&stages, &config.layout, false, &config.labels);

    let keys: Vec<&str> = graph.nodes().map(|n| n.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["start-node", "n_co", "n_u", "n_l", "n_d", "end-node"]
    );
    let lint = graph.node("n_l").unwrap();
    match lint.kind {
        NodeKind::Stage(stage) => assert!(stage.skeleton),
        NodeKind::Placeholder(_) => panic!("Lint should be a stage node"),
    }
    assert_eq!(graph.node("n_u").unwrap().y, config.layout.yp_start);
    assert_eq!(
        graph.node("n_l").unwrap().y,
        config.layout.yp_start + config.layout.node_spacing_v
    );
    assert!(graph.branch_labels.is_empty());
}

#[test]
fn test_unchanged_steps_keep_merged_slice() {
    let previous = RunSnapshot::parse(PREVIOUS, "previous").unwrap().stages;
    let current = RunSnapshot::parse(CURRENT, "current").unwrap().stages;

    let merged = merge_stage_infos(&previous, &current);
    let stages = refresh_stages_from_steps(&merged, &[]);

    assert!(std::ptr::eq(stages.as_ptr(), merged.as_ptr()));
}

#[test]
fn test_graph_serializes_for_renderers() {
    let config = Config::default();
    let stages = RunSnapshot::parse(PREVIOUS, "previous").unwrap().stages;
    let graph = layout_graph(&stages, &config.layout, false, &config.labels);

    let value = serde_json::to_value(&graph).unwrap();

    assert_eq!(value["measuredWidth"], graph.measured_width);
    assert_eq!(value["measuredHeight"], graph.measured_height);
    let start = &value["nodeColumns"][0]["rows"][0][0];
    assert_eq!(start["key"], "start-node");
    assert_eq!(start["kind"]["kind"], "placeholder");
    assert_eq!(start["kind"]["value"]["type"], "start");
    let checkout = &value["nodeColumns"][1]["rows"][0][0];
    assert_eq!(checkout["kind"]["value"]["name"], "Checkout");
    assert!(value["connections"][0]["paths"][0]["segments"].is_array());
}
