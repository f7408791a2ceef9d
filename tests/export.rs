use std::fs;

use molkky_terminal::export::{
    JSON_EXPORT_FILE, WORKBOOK_EXPORT_FILE, export_json, export_workbook, teams_to_pretty_json,
};
use molkky_terminal::standings::{MatchResult, Team};

fn sample_teams() -> Vec<Team> {
    vec![
        Team::new("1", "Birch", vec![MatchResult::new(1, 0, 0, 3); 6]),
        Team::new("2", "Pine", vec![MatchResult::new(0, 0, 1, 2); 6]),
    ]
}

#[test]
fn pretty_json_uses_two_space_indent() {
    let json = teams_to_pretty_json(&sample_teams()).expect("serialize");
    assert!(json.starts_with("[\n  {\n    \"no\": \"1\""));
}

#[test]
fn json_export_writes_fixed_filename() {
    let dir = tempfile::tempdir().expect("temp dir");
    let teams = sample_teams();
    let report = export_json(dir.path(), &teams).expect("export");

    assert_eq!(report.path, dir.path().join(JSON_EXPORT_FILE));
    assert_eq!(report.teams, 2);
    assert_eq!(report.match_rows, 12);

    let raw = fs::read_to_string(&report.path).expect("read export");
    let back: Vec<Team> = serde_json::from_str(&raw).expect("parse export");
    assert_eq!(back, teams);
}

#[test]
fn empty_collection_exports_empty_array() {
    let dir = tempfile::tempdir().expect("temp dir");
    let report = export_json(dir.path(), &[]).expect("export");
    assert_eq!(fs::read_to_string(report.path).expect("read"), "[]");
}

#[test]
fn workbook_export_creates_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let report = export_workbook(dir.path(), &sample_teams()).expect("workbook");
    assert_eq!(report.path, dir.path().join(WORKBOOK_EXPORT_FILE));
    assert_eq!(report.match_rows, 12);
    let meta = fs::metadata(&report.path).expect("workbook exists");
    assert!(meta.len() > 0);
}
