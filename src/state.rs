use std::collections::VecDeque;
use std::time::Instant;

use chrono::Local;

use crate::form::{TeamDraft, TeamForm};
use crate::standings::{Team, compare_standing};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Standings,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Idle,
    Editing(usize),
}

/// A destructive action waiting for the user to say yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirm {
    DeleteTeam { index: usize, label: String },
    ClearAll,
}

/// What the store has to do after the last batch of mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistAction {
    Save,
    Remove,
}

#[derive(Debug, Clone)]
pub struct ExportState {
    pub done: bool,
    pub path: Option<String>,
    pub message: String,
    pub last_updated: Option<Instant>,
}

impl Default for ExportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportState {
    pub fn new() -> Self {
        Self {
            done: false,
            path: None,
            message: String::new(),
            last_updated: None,
        }
    }

    pub fn finish(&mut self, path: Option<String>, message: impl Into<String>) {
        self.done = true;
        self.path = path;
        self.message = message.into();
        self.last_updated = Some(Instant::now());
    }

    pub fn clear_if_done_for(&mut self, now: Instant, keep_secs: u64) {
        if !self.done {
            return;
        }
        let Some(last) = self.last_updated else {
            return;
        };
        if now.duration_since(last).as_secs() >= keep_secs {
            *self = Self::new();
        }
    }
}

/// Owns the Teams collection and everything the UI mutates around it.
#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub teams: Vec<Team>,
    pub edit: EditMode,
    pub form: TeamForm,
    pub selected: usize,
    pub pending: Option<PendingConfirm>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export: ExportState,
    dirty: bool,
    storage_cleared: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Standings,
            teams: Vec::with_capacity(32),
            edit: EditMode::Idle,
            form: TeamForm::new(),
            selected: 0,
            pending: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
            export: ExportState::new(),
            dirty: false,
            storage_cleared: false,
        }
    }

    pub fn maybe_clear_export(&mut self, now: Instant) {
        self.export.clear_if_done_for(now, 8);
    }

    /// Installs a freshly loaded collection. Totals are rebuilt from the
    /// match rows and the result is put in standings order. Nothing is
    /// marked for saving.
    pub fn load_teams(&mut self, mut teams: Vec<Team>) {
        let stale = teams.iter().filter(|t| !t.totals_are_current()).count();
        for team in teams.iter_mut() {
            team.recompute_totals();
        }
        if stale > 0 {
            self.push_log(format!("[WARN] Recomputed stale totals for {stale} team(s)"));
        }
        self.teams = teams;
        self.edit = EditMode::Idle;
        self.form.reset();
        self.selected = 0;
        self.resort();
    }

    pub fn editing_index(&self) -> Option<usize> {
        match self.edit {
            EditMode::Idle => None,
            EditMode::Editing(i) => Some(i),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_index().is_some()
    }

    pub fn open_new_form(&mut self) {
        self.edit = EditMode::Idle;
        self.form.reset();
        self.screen = Screen::Form;
    }

    pub fn start_edit(&mut self, index: usize) {
        let Some(team) = self.teams.get(index) else {
            self.push_log(format!("[WARN] No team at row {}", index + 1));
            return;
        };
        self.form = TeamForm::from_team(team);
        self.edit = EditMode::Editing(index);
        self.selected = index;
        self.screen = Screen::Form;
    }

    pub fn start_edit_selected(&mut self) {
        self.start_edit(self.selected);
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditMode::Idle;
        self.form.reset();
        self.screen = Screen::Standings;
    }

    /// Inserts a team, or replaces the one under edit, then re-ranks.
    pub fn submit_team(&mut self, draft: TeamDraft) {
        let team = draft.into_team();
        let label = team_label(&team);
        let target = match self.edit {
            EditMode::Editing(i) if i < self.teams.len() => {
                self.teams[i] = team;
                self.push_log(format!("[INFO] Updated {label}"));
                i
            }
            _ => {
                self.teams.push(team);
                self.push_log(format!("[INFO] Added {label}"));
                self.teams.len() - 1
            }
        };
        self.edit = EditMode::Idle;
        self.selected = target;
        self.resort();
        self.dirty = true;
    }

    pub fn submit_form(&mut self) {
        let draft = self.form.to_draft();
        self.submit_team(draft);
        self.form.reset();
        self.screen = Screen::Standings;
    }

    pub fn request_delete(&mut self, index: usize) {
        let Some(team) = self.teams.get(index) else {
            return;
        };
        self.pending = Some(PendingConfirm::DeleteTeam {
            index,
            label: team_label(team),
        });
    }

    pub fn request_delete_selected(&mut self) {
        self.request_delete(self.selected);
    }

    pub fn request_clear_all(&mut self) {
        self.pending = Some(PendingConfirm::ClearAll);
    }

    pub fn confirm_pending(&mut self) {
        match self.pending.take() {
            Some(PendingConfirm::DeleteTeam { index, .. }) => {
                self.delete_team(index);
            }
            Some(PendingConfirm::ClearAll) => self.clear_all(),
            None => {}
        }
    }

    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            self.push_log("[INFO] Cancelled");
        }
    }

    /// Removes one team. An edit on that team is cancelled; an edit on a
    /// later row follows its team down one slot.
    pub fn delete_team(&mut self, index: usize) -> bool {
        if index >= self.teams.len() {
            return false;
        }
        let removed = self.teams.remove(index);
        match self.edit {
            EditMode::Editing(j) if j == index => {
                self.edit = EditMode::Idle;
                self.form.reset();
                if self.screen == Screen::Form {
                    self.screen = Screen::Standings;
                }
            }
            EditMode::Editing(j) if j > index => self.edit = EditMode::Editing(j - 1),
            _ => {}
        }
        if self.selected > index {
            self.selected -= 1;
        }
        self.resort();
        self.clamp_selection();
        self.dirty = true;
        self.push_log(format!("[INFO] Deleted {}", team_label(&removed)));
        true
    }

    pub fn clear_all(&mut self) {
        self.teams.clear();
        self.edit = EditMode::Idle;
        self.form.reset();
        self.selected = 0;
        self.screen = Screen::Standings;
        self.dirty = false;
        self.storage_cleared = true;
        self.push_log("[INFO] Cleared all teams");
    }

    pub fn take_persist_action(&mut self) -> Option<PersistAction> {
        if self.dirty {
            self.dirty = false;
            self.storage_cleared = false;
            return Some(PersistAction::Save);
        }
        if self.storage_cleared {
            self.storage_cleared = false;
            return Some(PersistAction::Remove);
        }
        None
    }

    /// Puts back an action whose write failed so the next sync retries it.
    pub fn requeue_persist(&mut self, action: PersistAction) {
        match action {
            PersistAction::Save => self.dirty = true,
            // A newer save supersedes a failed remove.
            PersistAction::Remove if !self.dirty => self.storage_cleared = true,
            PersistAction::Remove => {}
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty || self.storage_cleared
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.teams.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.teams.is_empty() {
            self.selected = 0;
            return;
        }
        if self.selected + 1 < self.teams.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        if self.teams.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.teams.len() {
            self.selected = self.teams.len() - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    // Stable re-rank that carries the selection and edit index along with
    // the teams they point at.
    fn resort(&mut self) {
        let mut order: Vec<usize> = (0..self.teams.len()).collect();
        order.sort_by(|&a, &b| compare_standing(&self.teams[a].totals, &self.teams[b].totals));
        if order.iter().enumerate().all(|(pos, &old)| pos == old) {
            return;
        }

        let mut new_pos = vec![0usize; order.len()];
        for (pos, &old) in order.iter().enumerate() {
            new_pos[old] = pos;
        }

        let mut slots: Vec<Option<Team>> = self.teams.drain(..).map(Some).collect();
        self.teams = order
            .iter()
            .filter_map(|&old| slots.get_mut(old).and_then(Option::take))
            .collect();

        if let Some(&pos) = new_pos.get(self.selected) {
            self.selected = pos;
        }
        if let EditMode::Editing(i) = self.edit {
            if let Some(&pos) = new_pos.get(i) {
                self.edit = EditMode::Editing(pos);
            }
        }
    }
}

pub fn team_label(team: &Team) -> String {
    match (team.no.trim().is_empty(), team.name.trim().is_empty()) {
        (true, true) => "unnamed team".to_string(),
        (true, false) => team.name.clone(),
        (false, true) => format!("#{}", team.no),
        (false, false) => format!("#{} {}", team.no, team.name),
    }
}
