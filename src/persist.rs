use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::standings::Team;
use crate::state::{AppState, PersistAction};

pub const STORE_FILE: &str = "molkky_scores.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Missing,
    Loaded(Vec<Team>),
    Corrupt(String),
}

/// The single fixed-key record holding the whole Teams collection.
#[derive(Debug, Clone)]
pub struct TeamStore {
    path: PathBuf,
}

impl TeamStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the store. A value that does not parse is reported, never
    /// rewritten or removed.
    pub fn load(&self) -> Result<LoadOutcome> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LoadOutcome::Missing),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed reading {}", self.path.display()));
            }
        };
        match serde_json::from_str::<Vec<Team>>(&raw) {
            Ok(teams) => Ok(LoadOutcome::Loaded(teams)),
            Err(err) => Ok(LoadOutcome::Corrupt(err.to_string())),
        }
    }

    pub fn load_into_state(&self, state: &mut AppState) {
        match self.load() {
            Ok(LoadOutcome::Loaded(teams)) => {
                let count = teams.len();
                state.load_teams(teams);
                state.push_log(format!(
                    "[INFO] Loaded {count} team(s) from {}",
                    self.path.display()
                ));
            }
            Ok(LoadOutcome::Missing) => {
                state.load_teams(Vec::new());
                state.push_log("[INFO] No saved scores yet");
            }
            Ok(LoadOutcome::Corrupt(reason)) => {
                state.load_teams(Vec::new());
                state.push_log(format!("[ERROR] Failed to parse saved teams: {reason}"));
            }
            Err(err) => {
                state.load_teams(Vec::new());
                state.push_log(format!("[ERROR] {err:#}"));
            }
        }
    }

    pub fn save(&self, teams: &[Team]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed creating {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string(teams).context("serialize teams")?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("swap into {}", self.path.display()))?;
        Ok(())
    }

    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {}", self.path.display())),
        }
    }

    /// Flushes whatever the state has queued. Failures land in the console.
    pub fn sync_from_state(&self, state: &mut AppState) {
        let Some(action) = state.take_persist_action() else {
            return;
        };
        let result = match action {
            PersistAction::Save => self.save(&state.teams),
            PersistAction::Remove => self.remove(),
        };
        if let Err(err) = result {
            state.requeue_persist(action);
            state.push_log(format!("[ERROR] {err:#}"));
        }
    }
}
