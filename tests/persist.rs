use std::fs;

use molkky_terminal::form::TeamDraft;
use molkky_terminal::persist::{LoadOutcome, TeamStore};
use molkky_terminal::standings::{MatchResult, Team};
use molkky_terminal::state::AppState;

fn sample_teams() -> Vec<Team> {
    vec![
        Team::new("1", "Birch", vec![MatchResult::new(1, 0, 0, 3); 6]),
        Team::new("2", "Pine", vec![MatchResult::new(0, 1, 0, 1); 6]),
    ]
}

#[test]
fn missing_store_loads_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = TeamStore::new(dir.path().join("teams.json"));
    assert_eq!(store.load().expect("load"), LoadOutcome::Missing);

    let mut state = AppState::new();
    store.load_into_state(&mut state);
    assert!(state.teams.is_empty());
}

#[test]
fn save_then_load_keeps_teams() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = TeamStore::new(dir.path().join("nested").join("teams.json"));
    let teams = sample_teams();
    store.save(&teams).expect("save");

    match store.load().expect("load") {
        LoadOutcome::Loaded(loaded) => assert_eq!(loaded, teams),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!dir.path().join("nested").join("teams.json.tmp").exists());
}

#[test]
fn stored_format_uses_plain_field_names() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("teams.json");
    TeamStore::new(&path).save(&sample_teams()).expect("save");

    let raw = fs::read_to_string(&path).expect("read");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let first = &value[0];
    assert_eq!(first["no"], "1");
    assert_eq!(first["name"], "Birch");
    assert_eq!(first["totals"]["points"], 18);
    assert_eq!(first["matches"][0]["win"], 1);
    assert_eq!(first["matches"][0]["signature"], "");
}

#[test]
fn malformed_store_loads_empty_and_is_left_alone() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("teams.json");
    fs::write(&path, "{not json").expect("write");

    let store = TeamStore::new(&path);
    assert!(matches!(store.load().expect("load"), LoadOutcome::Corrupt(_)));

    let mut state = AppState::new();
    store.load_into_state(&mut state);
    assert!(state.teams.is_empty());
    assert!(state.logs.iter().any(|l| l.contains("[ERROR]")));

    store.sync_from_state(&mut state);
    assert_eq!(fs::read_to_string(&path).expect("read"), "{not json");
}

#[test]
fn string_numbers_from_older_files_are_coerced() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("teams.json");
    fs::write(
        &path,
        r#"[{"no":"3","name":"Elm","matches":[{"win":"1","tie":0,"loss":"","points":"7","signature":"ok"}],"totals":{"win":0,"tie":0,"loss":0,"points":0}}]"#,
    )
    .expect("write");

    let mut state = AppState::new();
    TeamStore::new(&path).load_into_state(&mut state);
    assert_eq!(state.teams.len(), 1);
    assert_eq!(state.teams[0].totals.win, 1);
    assert_eq!(state.teams[0].totals.points, 7);
}

#[test]
fn sync_writes_after_mutation_and_removes_after_clear() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("teams.json");
    let store = TeamStore::new(&path);

    let mut state = AppState::new();
    store.load_into_state(&mut state);
    store.sync_from_state(&mut state);
    assert!(!path.exists());

    state.submit_team(TeamDraft {
        no: "1".to_string(),
        name: "Birch".to_string(),
        matches: vec![MatchResult::new(1, 0, 0, 3)],
    });
    store.sync_from_state(&mut state);
    assert!(path.exists());

    state.clear_all();
    store.sync_from_state(&mut state);
    assert!(!path.exists());
}

#[test]
fn failed_save_stays_queued_until_a_later_sync_succeeds() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "file in the way").expect("write blocker");
    let path = blocker.join("teams.json");
    let store = TeamStore::new(&path);

    let mut state = AppState::new();
    state.submit_team(TeamDraft {
        no: "1".to_string(),
        name: "Birch".to_string(),
        matches: vec![MatchResult::new(1, 0, 0, 3)],
    });
    store.sync_from_state(&mut state);
    assert!(state.logs.iter().any(|l| l.contains("[ERROR]")));
    assert!(state.has_unsaved_changes());

    fs::remove_file(&blocker).expect("remove blocker");
    store.sync_from_state(&mut state);
    assert!(!state.has_unsaved_changes());
    match store.load().expect("load") {
        LoadOutcome::Loaded(teams) => assert_eq!(teams[0].name, "Birch"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}
