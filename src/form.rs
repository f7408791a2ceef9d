use crate::standings::{MATCHES_PER_TEAM, MatchResult, Team, coerce_count, coerce_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchColumn {
    Win,
    Tie,
    Loss,
    Points,
    Signature,
}

impl MatchColumn {
    pub const ALL: [MatchColumn; 5] = [
        MatchColumn::Win,
        MatchColumn::Tie,
        MatchColumn::Loss,
        MatchColumn::Points,
        MatchColumn::Signature,
    ];

    pub fn is_numeric(self) -> bool {
        !matches!(self, MatchColumn::Signature)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    No,
    Name,
    Match { row: usize, column: MatchColumn },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRow {
    pub win: String,
    pub tie: String,
    pub loss: String,
    pub points: String,
    pub signature: String,
}

impl MatchRow {
    fn zeroed() -> Self {
        Self {
            win: "0".to_string(),
            tie: "0".to_string(),
            loss: "0".to_string(),
            points: "0".to_string(),
            signature: String::new(),
        }
    }

    fn from_result(m: &MatchResult) -> Self {
        Self {
            win: m.win.to_string(),
            tie: m.tie.to_string(),
            loss: m.loss.to_string(),
            points: m.points.to_string(),
            signature: m.signature.clone(),
        }
    }

    pub fn cell(&self, column: MatchColumn) -> &str {
        match column {
            MatchColumn::Win => &self.win,
            MatchColumn::Tie => &self.tie,
            MatchColumn::Loss => &self.loss,
            MatchColumn::Points => &self.points,
            MatchColumn::Signature => &self.signature,
        }
    }

    fn cell_mut(&mut self, column: MatchColumn) -> &mut String {
        match column {
            MatchColumn::Win => &mut self.win,
            MatchColumn::Tie => &mut self.tie,
            MatchColumn::Loss => &mut self.loss,
            MatchColumn::Points => &mut self.points,
            MatchColumn::Signature => &mut self.signature,
        }
    }

    fn to_result(&self) -> MatchResult {
        MatchResult {
            win: coerce_count(&self.win),
            tie: coerce_count(&self.tie),
            loss: coerce_count(&self.loss),
            points: coerce_number(&self.points),
            signature: self.signature.clone(),
        }
    }
}

/// Submitted form contents, already coerced to numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    pub no: String,
    pub name: String,
    pub matches: Vec<MatchResult>,
}

impl TeamDraft {
    pub fn into_team(self) -> Team {
        Team::new(self.no, self.name, self.matches)
    }
}

/// Text-entry model behind the team form. Holds raw strings so partially
/// typed numbers survive until submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamForm {
    pub no: String,
    pub name: String,
    pub rows: Vec<MatchRow>,
    pub focus: usize,
}

impl Default for TeamForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamForm {
    pub fn new() -> Self {
        Self {
            no: String::new(),
            name: String::new(),
            rows: vec![MatchRow::zeroed(); MATCHES_PER_TEAM],
            focus: 0,
        }
    }

    pub fn from_team(team: &Team) -> Self {
        let mut rows: Vec<MatchRow> = team.matches.iter().map(MatchRow::from_result).collect();
        while rows.len() < MATCHES_PER_TEAM {
            rows.push(MatchRow::zeroed());
        }
        Self {
            no: team.no.clone(),
            name: team.name.clone(),
            rows,
            focus: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn field_count(&self) -> usize {
        2 + self.rows.len() * MatchColumn::ALL.len()
    }

    pub fn field_at(&self, idx: usize) -> Option<FormField> {
        match idx {
            0 => Some(FormField::No),
            1 => Some(FormField::Name),
            _ => {
                let offset = idx - 2;
                let cols = MatchColumn::ALL.len();
                let row = offset / cols;
                if row >= self.rows.len() {
                    return None;
                }
                Some(FormField::Match {
                    row,
                    column: MatchColumn::ALL[offset % cols],
                })
            }
        }
    }

    pub fn focused_field(&self) -> FormField {
        self.field_at(self.focus).unwrap_or(FormField::No)
    }

    pub fn focus_next(&mut self) {
        let total = self.field_count();
        self.focus = (self.focus + 1) % total;
    }

    pub fn focus_prev(&mut self) {
        let total = self.field_count();
        self.focus = if self.focus == 0 {
            total - 1
        } else {
            self.focus - 1
        };
    }

    /// Moves focus one match row down, keeping the column.
    pub fn focus_down(&mut self) {
        let cols = MatchColumn::ALL.len();
        let next = match self.focused_field() {
            FormField::No | FormField::Name => 2,
            FormField::Match { .. } => self.focus + cols,
        };
        if next < self.field_count() {
            self.focus = next;
        }
    }

    pub fn focus_up(&mut self) {
        let cols = MatchColumn::ALL.len();
        self.focus = match self.focused_field() {
            FormField::No | FormField::Name => self.focus,
            FormField::Match { row: 0, .. } => 1,
            FormField::Match { .. } => self.focus - cols,
        };
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::No => &self.no,
            FormField::Name => &self.name,
            FormField::Match { row, column } => self
                .rows
                .get(row)
                .map(|r| r.cell(column))
                .unwrap_or(""),
        }
    }

    fn focused_value_mut(&mut self) -> Option<(&mut String, bool)> {
        match self.focused_field() {
            FormField::No => Some((&mut self.no, false)),
            FormField::Name => Some((&mut self.name, false)),
            FormField::Match { row, column } => self
                .rows
                .get_mut(row)
                .map(|r| (r.cell_mut(column), column.is_numeric())),
        }
    }

    /// Types a character into the focused field. Numeric cells only take
    /// digits, sign and decimal point, like a number input.
    pub fn input_char(&mut self, c: char) {
        let Some((value, numeric)) = self.focused_value_mut() else {
            return;
        };
        if numeric && !(c.is_ascii_digit() || c == '-' || c == '.') {
            return;
        }
        if numeric && *value == "0" {
            value.clear();
        }
        value.push(c);
    }

    pub fn backspace(&mut self) {
        if let Some((value, _)) = self.focused_value_mut() {
            value.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some((value, _)) = self.focused_value_mut() {
            value.clear();
        }
    }

    pub fn to_draft(&self) -> TeamDraft {
        TeamDraft {
            no: self.no.clone(),
            name: self.name.clone(),
            matches: self.rows.iter().map(MatchRow::to_result).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = TeamForm::new();
        assert_eq!(form.field_count(), 2 + MATCHES_PER_TEAM * 5);
        form.focus_prev();
        assert_eq!(
            form.focused_field(),
            FormField::Match {
                row: MATCHES_PER_TEAM - 1,
                column: MatchColumn::Signature
            }
        );
        form.focus_next();
        assert_eq!(form.focused_field(), FormField::No);
    }

    #[test]
    fn vertical_moves_keep_column() {
        let mut form = TeamForm::new();
        form.focus_down();
        form.focus_next();
        form.focus_next();
        assert_eq!(
            form.focused_field(),
            FormField::Match {
                row: 0,
                column: MatchColumn::Loss
            }
        );
        form.focus_down();
        assert_eq!(
            form.focused_field(),
            FormField::Match {
                row: 1,
                column: MatchColumn::Loss
            }
        );
        form.focus_up();
        form.focus_up();
        assert_eq!(form.focused_field(), FormField::Name);
    }

    #[test]
    fn numeric_cells_reject_letters() {
        let mut form = TeamForm::new();
        form.focus = 2;
        form.input_char('x');
        assert_eq!(form.rows[0].win, "0");
        form.input_char('3');
        assert_eq!(form.rows[0].win, "3");
        form.backspace();
        form.input_char('-');
        assert_eq!(form.rows[0].win, "-");
        assert_eq!(form.to_draft().matches[0].win, 0);
    }
}
