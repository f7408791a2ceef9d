use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::standings::Team;

pub const JSON_EXPORT_FILE: &str = "molkky-scores.json";
pub const WORKBOOK_EXPORT_FILE: &str = "molkky-standings.xlsx";

pub struct ExportReport {
    pub path: PathBuf,
    pub teams: usize,
    pub match_rows: usize,
}

enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Pretty-printed (2-space) JSON of the collection, exactly as stored.
pub fn teams_to_pretty_json(teams: &[Team]) -> Result<String> {
    serde_json::to_string_pretty(teams).context("serialize teams for export")
}

pub fn export_json(dir: &Path, teams: &[Team]) -> Result<ExportReport> {
    let path = dir.join(JSON_EXPORT_FILE);
    let json = teams_to_pretty_json(teams)?;
    fs::create_dir_all(dir).with_context(|| format!("failed creating {}", dir.display()))?;
    fs::write(&path, json).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(ExportReport {
        path,
        teams: teams.len(),
        match_rows: teams.iter().map(|t| t.matches.len()).sum(),
    })
}

/// Standings and per-round rows as a spreadsheet.
pub fn export_workbook(dir: &Path, teams: &[Team]) -> Result<ExportReport> {
    let path = dir.join(WORKBOOK_EXPORT_FILE);
    fs::create_dir_all(dir).with_context(|| format!("failed creating {}", dir.display()))?;

    let mut standings_rows: Vec<Vec<Cell>> = vec![
        ["Rank", "No.", "Team", "Win", "Tie", "Loss", "Points"]
            .into_iter()
            .map(Cell::from)
            .collect(),
    ];
    let mut match_rows: Vec<Vec<Cell>> = vec![
        [
            "Rank",
            "No.",
            "Team",
            "Round",
            "Win",
            "Tie",
            "Loss",
            "Points",
            "Signature",
        ]
        .into_iter()
        .map(Cell::from)
        .collect(),
    ];

    for (idx, team) in teams.iter().enumerate() {
        let rank = (idx + 1) as f64;
        standings_rows.push(vec![
            Cell::Number(rank),
            team.no.clone().into(),
            team.name.clone().into(),
            Cell::Number(team.totals.win as f64),
            Cell::Number(team.totals.tie as f64),
            Cell::Number(team.totals.loss as f64),
            Cell::Number(team.totals.points as f64),
        ]);
        for (round, m) in team.matches.iter().enumerate() {
            match_rows.push(vec![
                Cell::Number(rank),
                team.no.clone().into(),
                team.name.clone().into(),
                Cell::Number((round + 1) as f64),
                Cell::Number(m.win as f64),
                Cell::Number(m.tie as f64),
                Cell::Number(m.loss as f64),
                Cell::Number(m.points as f64),
                m.signature.clone().into(),
            ]);
        }
    }

    let info_rows = vec![
        vec![
            Cell::from("Generated"),
            Cell::from(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        ],
        vec![Cell::from("Teams"), Cell::Number(teams.len() as f64)],
    ];

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Standings")?;
        write_rows(sheet, &standings_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matches")?;
        write_rows(sheet, &match_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Info")?;
        write_rows(sheet, &info_rows)?;
    }
    workbook
        .save(&path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        path,
        teams: teams.len(),
        match_rows: match_rows.len() - 1,
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match value {
                Cell::Text(text) => worksheet.write_string(r, c, text),
                Cell::Number(n) => worksheet.write_number(r, c, *n),
            }
            .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
