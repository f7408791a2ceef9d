use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::persist::STORE_FILE;

const APP_DIR: &str = "molkky_terminal";
const DEFAULT_TICK_MS: u64 = 250;
const MIN_TICK_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub export_dir: PathBuf,
    pub tick_rate: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let data_file = resolve_data_file(None)?;
        let export_dir = resolve_export_dir(None);
        let tick_ms = env::var("MOLKKY_TICK_MS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TICK_MS)
            .max(MIN_TICK_MS);
        Ok(Self {
            data_file,
            export_dir,
            tick_rate: Duration::from_millis(tick_ms),
        })
    }
}

/// An explicit path wins; the environment is only consulted without one.
pub fn resolve_data_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    env_path("MOLKKY_DATA_FILE")
        .or_else(default_data_file)
        .ok_or_else(|| anyhow!("unable to resolve a data file; set MOLKKY_DATA_FILE"))
}

pub fn resolve_export_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env_path("MOLKKY_EXPORT_DIR"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn default_data_file() -> Option<PathBuf> {
    // Prefer XDG data dir.
    if let Some(base) = env_path("XDG_DATA_HOME") {
        return Some(base.join(APP_DIR).join(STORE_FILE));
    }
    let home = env_path("HOME")?;
    Some(
        home.join(".local")
            .join("share")
            .join(APP_DIR)
            .join(STORE_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_skip_the_environment() {
        let data = PathBuf::from("/tmp/scores/teams.json");
        assert_eq!(resolve_data_file(Some(data.clone())).unwrap(), data);
        let out = PathBuf::from("/tmp/out");
        assert_eq!(resolve_export_dir(Some(out.clone())), out);
    }
}
