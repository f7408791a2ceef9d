use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MATCHES_PER_TEAM: usize = 6;

/// One round's outcome for a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default, deserialize_with = "de_count")]
    pub win: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub tie: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub loss: u32,
    #[serde(default, deserialize_with = "de_points")]
    pub points: i64,
    #[serde(default, deserialize_with = "de_signature")]
    pub signature: String,
}

impl MatchResult {
    pub fn new(win: u32, tie: u32, loss: u32, points: i64) -> Self {
        Self {
            win,
            tie,
            loss,
            points,
            signature: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default, deserialize_with = "de_count")]
    pub win: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub tie: u32,
    #[serde(default, deserialize_with = "de_count")]
    pub loss: u32,
    #[serde(default, deserialize_with = "de_points")]
    pub points: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, deserialize_with = "de_signature")]
    pub no: String,
    #[serde(default, deserialize_with = "de_signature")]
    pub name: String,
    #[serde(default)]
    pub matches: Vec<MatchResult>,
    // Stored for readers of the file; always rebuilt from `matches` on load.
    #[serde(default)]
    pub totals: Totals,
}

impl Team {
    pub fn new(no: impl Into<String>, name: impl Into<String>, matches: Vec<MatchResult>) -> Self {
        let totals = calculate_totals(&matches);
        Self {
            no: no.into(),
            name: name.into(),
            matches,
            totals,
        }
    }

    pub fn recompute_totals(&mut self) {
        self.totals = calculate_totals(&self.matches);
    }

    pub fn totals_are_current(&self) -> bool {
        self.totals == calculate_totals(&self.matches)
    }
}

/// Sums win/tie/loss/points across every match. An empty slice yields zeros.
pub fn calculate_totals(matches: &[MatchResult]) -> Totals {
    matches.iter().fold(Totals::default(), |acc, m| Totals {
        win: acc.win.saturating_add(m.win),
        tie: acc.tie.saturating_add(m.tie),
        loss: acc.loss.saturating_add(m.loss),
        points: acc.points.saturating_add(m.points),
    })
}

/// Standings order: wins desc, then ties desc, then points desc.
pub fn compare_standing(a: &Totals, b: &Totals) -> Ordering {
    b.win
        .cmp(&a.win)
        .then_with(|| b.tie.cmp(&a.tie))
        .then_with(|| b.points.cmp(&a.points))
}

/// Returns a new, stably sorted standings sequence.
pub fn sort_teams(teams: &[Team]) -> Vec<Team> {
    let mut out = teams.to_vec();
    sort_teams_in_place(&mut out);
    out
}

pub fn sort_teams_in_place(teams: &mut [Team]) {
    // `sort_by` is stable, so equal records keep their insertion order.
    teams.sort_by(|a, b| compare_standing(&a.totals, &b.totals));
}

pub fn is_sorted(teams: &[Team]) -> bool {
    teams
        .windows(2)
        .all(|w| compare_standing(&w[0].totals, &w[1].totals) != Ordering::Greater)
}

/// Loose numeric parse used for every numeric input: parse failure is 0.
pub fn coerce_number(raw: &str) -> i64 {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return 0;
    }
    if let Ok(v) = cleaned.parse::<i64>() {
        return v;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    }
}

pub fn coerce_count(raw: &str) -> u32 {
    clamp_count(coerce_number(raw))
}

fn clamp_count(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

fn coerce_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => coerce_number(s),
        Value::Bool(true) => 1,
        _ => 0,
    }
}

fn de_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(clamp_count(coerce_value(&value)))
}

fn de_points<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_value(&value))
}

fn de_signature<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
