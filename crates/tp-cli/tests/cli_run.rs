use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tagprobe"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Photon + gluon dijet: legs 5 and 6 each feed one final-state particle.
const PHOTON_GLUON: &str = r#"{"number": 1, "weight": 2.0, "particles": [
{"id": 2212, "status": -12},
{"id": 2212, "status": -12},
{"id": 21, "status": -21, "mother1": 1},
{"id": 21, "status": -21, "mother1": 2},
{"id": 22, "status": -23, "mother1": 3, "mother2": 4, "daughter1": 7},
{"id": 21, "status": -23, "mother1": 3, "mother2": 4, "daughter1": 8},
{"id": 22, "status": 1, "mother1": 5, "px": 40.0, "e": 40.0},
{"id": 21, "status": 51, "mother1": 6, "px": -30.0, "e": 30.0}
]}"#;

fn write_inputs(dir: &Path, config: &str) -> (PathBuf, PathBuf) {
    let events = dir.join("events.jsonl");
    let record: serde_json::Value = serde_json::from_str(PHOTON_GLUON).unwrap();
    let line = serde_json::to_string(&record).unwrap();
    fs::write(&events, format!("{line}\n\n{{\"particles\": []}}\n")).unwrap();
    let config_path = dir.join("analysis.yaml");
    fs::write(&config_path, config).unwrap();
    (events, config_path)
}

#[test]
fn run_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let (events, config) = write_inputs(dir.path(), "min_leg_pt: 5.0\n");
    let out = dir.path().join("out");

    let output = run(&[
        "run",
        "--config",
        path_str(&config),
        "--in",
        path_str(&events),
        "--out",
        path_str(&out),
        "--threads",
        "2",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(out.join("summary.json")).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(summary["analysis"], "tag-probe");
    assert_eq!(summary["events_read"], 2);
    assert_eq!(summary["events_analyzed"], 1);
    assert_eq!(summary["skipped"]["missing-leg"], 1);
    let tally = &summary["results"]["pairs"]["photon:gluon"];
    assert_eq!(tally["events"], 1);
    assert_eq!(tally["sum_weights"], 2.0);
    assert!((tally["sum_weighted_balance"].as_f64().unwrap() - 1.5).abs() < 1e-12);
    assert_eq!(summary["provenance"]["input_hash"].as_str().unwrap().len(), 64);
}

#[test]
fn invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (events, config) = write_inputs(dir.path(), "hard_legs: [5, 5]\n");
    let out = dir.path().join("out");

    let output = run(&[
        "run",
        "--config",
        path_str(&config),
        "--in",
        path_str(&events),
        "--out",
        path_str(&out),
    ]);
    assert!(!output.status.success());
    assert!(!out.join("summary.json").exists());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, config) = write_inputs(dir.path(), "{}\n");
    let output = run(&[
        "run",
        "--config",
        path_str(&config),
        "--in",
        path_str(&dir.path().join("absent.jsonl")),
        "--out",
        path_str(&dir.path().join("out")),
    ]);
    assert!(!output.status.success());
}

#[test]
fn trace_reports_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let (events, _) = write_inputs(dir.path(), "{}\n");

    let output = run(&[
        "trace", "--in", path_str(&events), "--event", "1", "--particle", "7", "--ancestor", "5",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["is_ancestor"], true);
    assert_eq!(report["event_number"], 1);
    assert_eq!(report["particle_class"], "other");
    assert_eq!(report["outcome"]["outcome"], "found");
    assert_eq!(report["outcome"]["steps"], 1);

    let output = run(&[
        "trace", "--in", path_str(&events), "--event", "1", "--particle", "8", "--ancestor", "1",
    ]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["is_ancestor"], false);
    assert_eq!(report["particle_class"], "final-shower");
    assert_eq!(report["outcome"]["outcome"], "unresolved");
    assert_eq!(report["outcome"]["index"], 6);
    assert_eq!(report["outcome"]["status"], 23);
}

#[test]
fn trace_past_the_end_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (events, _) = write_inputs(dir.path(), "{}\n");
    let output = run(&[
        "trace", "--in", path_str(&events), "--event", "3", "--particle", "1", "--ancestor", "1",
    ]);
    assert!(!output.status.success());
}

#[test]
fn trace_rejects_indices_outside_the_event() {
    let dir = tempfile::tempdir().unwrap();
    let (events, _) = write_inputs(dir.path(), "{}\n");
    let output = run(&[
        "trace", "--in", path_str(&events), "--event", "1", "--particle", "42", "--ancestor", "1",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid-start"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}
