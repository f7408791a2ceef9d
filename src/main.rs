use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use molkky_terminal::config::AppConfig;
use molkky_terminal::export;
use molkky_terminal::form::{FormField, MatchColumn};
use molkky_terminal::persist::TeamStore;
use molkky_terminal::state::{AppState, EditMode, PendingConfirm, Screen};

struct App {
    state: AppState,
    store: TeamStore,
    config: AppConfig,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let store = TeamStore::new(config.data_file.clone());
        let mut state = AppState::new();
        store.load_into_state(&mut state);
        Self {
            state,
            store,
            config,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.pending.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.state.confirm_pending()
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state.cancel_pending()
                }
                _ => {}
            }
        } else if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
        } else {
            match self.state.screen {
                Screen::Standings => self.on_standings_key(key),
                Screen::Form => self.on_form_key(key),
            }
        }
        self.store.sync_from_state(&mut self.state);
    }

    fn on_standings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('a') | KeyCode::Char('n') => self.state.open_new_form(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if !self.state.teams.is_empty() {
                    self.state.start_edit_selected();
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => self.state.request_delete_selected(),
            KeyCode::Char('C') => self.state.request_clear_all(),
            KeyCode::Char('x') => self.export_json(),
            KeyCode::Char('X') => self.export_workbook(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.cancel_edit(),
            KeyCode::Enter => self.state.submit_form(),
            KeyCode::Tab | KeyCode::Right => self.state.form.focus_next(),
            KeyCode::BackTab | KeyCode::Left => self.state.form.focus_prev(),
            KeyCode::Down => self.state.form.focus_down(),
            KeyCode::Up => self.state.form.focus_up(),
            KeyCode::Backspace => self.state.form.backspace(),
            KeyCode::Delete => self.state.form.clear_field(),
            KeyCode::Char(c) => self.state.form.input_char(c),
            _ => {}
        }
    }

    fn export_json(&mut self) {
        match export::export_json(&self.config.export_dir, &self.state.teams) {
            Ok(report) => {
                let path = report.path.display().to_string();
                self.state
                    .push_log(format!("[INFO] Exported {} team(s) to {path}", report.teams));
                self.state.export.finish(Some(path), "JSON export done");
            }
            Err(err) => {
                self.state.push_log(format!("[ERROR] Export failed: {err:#}"));
                self.state.export.finish(None, "Export failed");
            }
        }
    }

    fn export_workbook(&mut self) {
        match export::export_workbook(&self.config.export_dir, &self.state.teams) {
            Ok(report) => {
                let path = report.path.display().to_string();
                self.state.push_log(format!(
                    "[INFO] Wrote workbook ({} teams, {} rounds) to {path}",
                    report.teams, report.match_rows
                ));
                self.state.export.finish(Some(path), "Workbook export done");
            }
            Err(err) => {
                self.state.push_log(format!("[ERROR] Workbook export failed: {err:#}"));
                self.state.export.finish(None, "Export failed");
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    // Flush anything still queued before the terminal goes away.
    app.store.sync_from_state(&mut app.state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    for line in app.state.logs.iter().filter(|l| l.contains("[ERROR]")) {
        eprintln!("{line}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = app.config.tick_rate;
    let mut last_tick = Instant::now();

    loop {
        app.state.maybe_clear_export(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Standings => render_standings(frame, chunks[1], &app.state),
        Screen::Form => render_form(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    let full = frame.size();
    if app.state.help_overlay {
        render_help_overlay(frame, full);
    }
    if let Some(pending) = &app.state.pending {
        render_confirm_overlay(frame, full, pending);
    }
}

fn header_text(state: &AppState) -> String {
    let mode = match (state.screen, state.edit) {
        (Screen::Form, EditMode::Editing(i)) => format!("EDIT row {}", i + 1),
        (Screen::Form, EditMode::Idle) => "NEW TEAM".to_string(),
        (Screen::Standings, _) => "STANDINGS".to_string(),
    };
    let mut line = format!("MÖLKKY SCORES | {mode} | Teams: {}", state.teams.len());
    if state.export.done {
        line.push_str(&format!(" | {}", state.export.message));
        if let Some(path) = &state.export.path {
            line.push_str(&format!(": {path}"));
        }
    }
    line
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Standings => {
            "j/k/↑/↓ Move | a Add | Enter/e Edit | d Delete | C Clear all | x Export JSON | X Export XLSX | ? Help | q Quit".to_string()
        }
        Screen::Form => {
            let submit = if state.is_editing() { "Update" } else { "Add" };
            format!("Tab/←/→ Field | ↑/↓ Round | Del Clear field | Enter {submit} | Esc Cancel")
        }
    }
}

fn standings_columns() -> [Constraint; 7] {
    [
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(8),
    ]
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Teams").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let widths = standings_columns();
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    for (col, title) in ["Rank", "No.", "Team", "Win", "Tie", "Loss", "Points"]
        .iter()
        .enumerate()
    {
        render_cell_text(frame, header_cols[col], title, bold);
    }

    let list_area = sections[1];
    if state.teams.is_empty() {
        let empty = Paragraph::new("No teams yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, state.teams.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let team = &state.teams[idx];
        let cells = [
            (idx + 1).to_string(),
            team.no.clone(),
            team.name.clone(),
            team.totals.win.to_string(),
            team.totals.tie.to_string(),
            team.totals.loss.to_string(),
            team.totals.points.to_string(),
        ];
        for (col, text) in cells.iter().enumerate() {
            render_cell_text(frame, cols[col], text, row_style);
        }
    }
}

fn form_columns() -> [Constraint; 6] {
    [
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Min(12),
    ]
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = if state.is_editing() {
        "Edit Team"
    } else {
        "Add Team"
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let form = &state.form;
    let focused = form.focused_field();
    let focus_style = Style::default().fg(Color::Black).bg(Color::Yellow);
    let label_style = Style::default().add_modifier(Modifier::BOLD);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(sections[0]);
    for (slot, label, field) in [
        (top[0], "Team No.", FormField::No),
        (top[1], "Team Name", FormField::Name),
    ] {
        let style = if focused == field {
            focus_style
        } else {
            Style::default()
        };
        let text = Line::from(vec![
            Span::styled(format!("{label}: "), label_style),
            Span::styled(input_text(form.value(field)), style),
        ]);
        frame.render_widget(Paragraph::new(text), slot);
    }

    let widths = form_columns();
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[1]);
    for (col, title) in ["Round", "Win", "Tie", "Loss", "Points", "Signature"]
        .iter()
        .enumerate()
    {
        render_cell_text(frame, header_cols[col], title, label_style);
    }

    let rows_area = sections[2];
    let visible = rows_area.height as usize;
    let focus_row = match focused {
        FormField::Match { row, .. } => row,
        _ => 0,
    };
    let (start, end) = visible_range(focus_row, form.rows.len(), visible);
    for (i, row) in (start..end).enumerate() {
        let row_area = Rect {
            x: rows_area.x,
            y: rows_area.y + i as u16,
            width: rows_area.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        render_cell_text(frame, cols[0], &(row + 1).to_string(), Style::default());
        for (offset, column) in MatchColumn::ALL.iter().enumerate() {
            let field = FormField::Match {
                row,
                column: *column,
            };
            let style = if focused == field {
                focus_style
            } else {
                Style::default()
            };
            render_cell_text(frame, cols[offset + 1], &input_text(form.value(field)), style);
        }
    }
}

fn input_text(value: &str) -> String {
    if value.is_empty() {
        "_".to_string()
    } else {
        value.to_string()
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_confirm_overlay(frame: &mut Frame, area: Rect, pending: &PendingConfirm) {
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);

    let question = match pending {
        PendingConfirm::DeleteTeam { label, .. } => format!("Delete {label}?"),
        PendingConfirm::ClearAll => "Delete ALL data? This cannot be undone.".to_string(),
    };
    let text = format!("{question}\n\ny / Enter  Confirm\nn / Esc    Cancel");
    let popup = Paragraph::new(text)
        .block(Block::default().title("Confirm").borders(Borders::ALL))
        .style(Style::default().fg(Color::Red));
    frame.render_widget(popup, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Mölkky Scores - Help",
        "",
        "Standings:",
        "  j/k or ↑/↓   Move selection",
        "  a / n        Add team",
        "  Enter / e    Edit selected team",
        "  d / Del      Delete selected team",
        "  C            Clear all data",
        "  x            Export molkky-scores.json",
        "  X            Export standings workbook",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Form:",
        "  Tab / ←/→    Next / previous field",
        "  ↑/↓          Previous / next round",
        "  Enter        Add or update team",
        "  Esc          Cancel",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
