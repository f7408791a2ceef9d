use std::path::PathBuf;

use anyhow::{Result, anyhow};

use molkky_terminal::config;
use molkky_terminal::export;
use molkky_terminal::persist::{LoadOutcome, TeamStore};
use molkky_terminal::standings::sort_teams;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let data_file = config::resolve_data_file(parse_path_arg("--data"))?;
    let out_dir = config::resolve_export_dir(parse_path_arg("--out"));
    let with_workbook = has_flag("--xlsx");

    let store = TeamStore::new(data_file);
    let mut teams = match store.load()? {
        LoadOutcome::Loaded(teams) => teams,
        LoadOutcome::Missing => {
            return Err(anyhow!("no saved scores at {}", store.path().display()));
        }
        LoadOutcome::Corrupt(reason) => {
            return Err(anyhow!(
                "saved scores at {} are unreadable: {reason}",
                store.path().display()
            ));
        }
    };
    for team in teams.iter_mut() {
        team.recompute_totals();
    }
    let teams = sort_teams(&teams);

    let report = export::export_json(&out_dir, &teams)?;
    println!("Exported {} team(s) to {}", report.teams, report.path.display());

    if with_workbook {
        let report = export::export_workbook(&out_dir, &teams)?;
        println!(
            "Wrote workbook ({} teams, {} rounds) to {}",
            report.teams,
            report.match_rows,
            report.path.display()
        );
    }

    for (idx, team) in teams.iter().enumerate() {
        println!(
            "{:>3}. {:<6} {:<24} W{} T{} L{} P{}",
            idx + 1,
            team.no,
            team.name,
            team.totals.win,
            team.totals.tie,
            team.totals.loss,
            team.totals.points
        );
    }

    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}
