use std::fs;
use std::path::PathBuf;

use activation_planner::config::{PlannerConfig, SearchMode};
use activation_planner::error::Error;
use activation_planner::loader::{InputFormat, load_scenario};
use activation_planner::{PlanReport, plan_from_file};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");

fn data(file: &str) -> String {
    format!("{}/{}", DATA_DIR, file)
}

/// Writes `contents` to a per-test scratch file and returns its path.
fn scratch_file(name: &str, contents: &str) -> String {
    let dir: PathBuf = std::env::temp_dir().join(format!("activation_planner_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_plan_reference_records_with_config_file() {
    let config = PlannerConfig::from_file(&data("planner_config.json")).unwrap();
    assert_eq!(config.worker_count, 3);
    assert_eq!(config.mode, SearchMode::Both);

    let report = plan_from_file(&data("reference_scenario.txt"), InputFormat::Records, &config).unwrap();
    assert_eq!(report, PlanReport { single_agent: Some(1651), dual_agent: Some(1707) });
}

#[test]
fn test_plan_reference_json() {
    let config = PlannerConfig { worker_count: 2, ..PlannerConfig::default() };

    let report = plan_from_file(&data("reference_scenario.json"), InputFormat::from_path("reference_scenario.json"), &config).unwrap();
    assert_eq!(report.single_agent, Some(1651));
    assert_eq!(report.dual_agent, Some(1707));
}

#[test]
fn test_plan_runs_only_the_requested_mode() {
    let single_only = PlannerConfig { mode: SearchMode::Single, ..PlannerConfig::default() };
    let report = plan_from_file(&data("reference_scenario.txt"), InputFormat::Records, &single_only).unwrap();
    assert_eq!(report, PlanReport { single_agent: Some(1651), dual_agent: None });

    let dual_only = PlannerConfig { mode: SearchMode::Dual, pruning: false, ..PlannerConfig::default() };
    let report = plan_from_file(&data("reference_scenario.txt"), InputFormat::Records, &dual_only).unwrap();
    assert_eq!(report, PlanReport { single_agent: None, dual_agent: Some(1707) });
}

#[test]
fn test_scenario_entry_overrides_config() {
    let path = scratch_file(
        "entry_override.json",
        r#"{ "entry": "BB", "nodes": [
            { "id": "BB", "rewardRate": 0, "neighbors": ["CC"] },
            { "id": "CC", "rewardRate": 5, "neighbors": ["BB"] }
        ] }"#,
    );
    // "AA" does not exist in this scenario, so the run only succeeds from BB.
    let config = PlannerConfig { mode: SearchMode::Single, single_agent_budget: 4, ..PlannerConfig::default() };

    let report = plan_from_file(&path, InputFormat::Json, &config).unwrap();
    assert_eq!(report.single_agent, Some(10));
}

#[test]
fn test_missing_entry_is_reported() {
    let config = PlannerConfig { entry: "ZZ".to_string(), ..PlannerConfig::default() };

    let err = plan_from_file(&data("reference_scenario.txt"), InputFormat::Records, &config).unwrap_err();
    assert!(matches!(err, Error::UnreachableEntry(ref id) if id == "ZZ"));
}

#[test]
fn test_duplicate_record_is_reported() {
    let path = scratch_file(
        "duplicate.txt",
        "Valve AA has flow rate=0; tunnels lead to valves BB\n\
         Valve BB has flow rate=3; tunnels lead to valves AA\n\
         Valve BB has flow rate=4; tunnels lead to valves AA\n",
    );

    let err = plan_from_file(&path, InputFormat::Records, &PlannerConfig::default()).unwrap_err();
    assert!(matches!(err, Error::DuplicateNode(ref id) if id == "BB"));
}

#[test]
fn test_undefined_neighbor_is_reported() {
    let path = scratch_file(
        "undefined_neighbor.txt",
        "Valve AA has flow rate=0; tunnels lead to valves BB, QQ\n\
         Valve BB has flow rate=3; tunnel leads to valve AA\n",
    );

    let err = plan_from_file(&path, InputFormat::Records, &PlannerConfig::default()).unwrap_err();
    match err {
        Error::MalformedInput { node, neighbor } => {
            assert_eq!(node, "AA");
            assert_eq!(neighbor, "QQ");
        }
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn test_garbled_record_line_is_reported() {
    let path = scratch_file(
        "garbled.txt",
        "Valve AA has flow rate=0; tunnels lead to valves BB\n\
         Valve BB has flow rate=lots; tunnels lead to valves AA\n",
    );

    let err = load_scenario(&path, InputFormat::Records).unwrap_err();
    assert!(matches!(err, Error::RecordParse { line: 2, .. }));
}

#[test]
fn test_missing_file_and_bad_json() {
    let err = load_scenario(&data("does_not_exist.json"), InputFormat::Json).unwrap_err();
    assert!(matches!(err, Error::IoError(_)));

    let path = scratch_file("bad.json", r#"{ "nodes": [ { "id": "AA" } ] }"#);
    let err = load_scenario(&path, InputFormat::Json).unwrap_err();
    assert!(matches!(err, Error::DeserializationError(_)));
}

#[test]
fn test_invalid_config_is_rejected_before_loading() {
    let config = PlannerConfig { worker_count: 0, ..PlannerConfig::default() };

    let err = plan_from_file(&data("does_not_exist.txt"), InputFormat::Records, &config).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}
