use std::collections::VecDeque;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::TableState;
use sysinfo::Signal;

use crate::action::{Action, Direction};
use crate::config::{ColorsConfig, Config, parse_key};
use crate::system::error::{ActionError, EnumerationError};
use crate::system::kill;
use crate::system::process::{ProcessProperties, TrackedProcess};
use crate::system::reconcile::{TickOutcome, TrackedSet, apply_tick};
use crate::system::snapshot::{ProcessSnapshot, SystemTotals};
use crate::ui::theme::Theme;

const STATUS_TTL_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub filter: KeyCode,
    pub end_task: KeyCode,
    pub force_end_task: KeyCode,
    pub properties: KeyCode,
    pub help: KeyCode,
    pub cycle_sort: KeyCode,
    pub cycle_theme: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            end_task: parse_key(&kb.end_task).unwrap_or(KeyCode::Delete),
            force_end_task: parse_key(&kb.force_end_task).unwrap_or(KeyCode::Char('K')),
            properties: parse_key(&kb.properties).unwrap_or(KeyCode::Char('p')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.filter), "Filter processes"),
            (key_label(self.end_task), "End task"),
            (key_label(self.force_end_task), "Force end task"),
            (key_label(self.properties), "Toggle properties"),
            (key_label(self.cycle_sort), "Cycle sort mode"),
            (key_label(self.cycle_theme), "Cycle theme"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("↑↓".to_string(), "Navigate"));
        entries.push(("PgUp/PgDn".to_string(), "Page"));
        entries.push(("Home/End".to_string(), "First / last"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Insert => "Ins".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Tracked,
    Name,
    Cpu,
    Memory,
    Pid,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Tracked => SortMode::Name,
            SortMode::Name => SortMode::Cpu,
            SortMode::Cpu => SortMode::Memory,
            SortMode::Memory => SortMode::Pid,
            SortMode::Pid => SortMode::Tracked,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Tracked => "Tracked",
            SortMode::Name => "Name",
            SortMode::Cpu => "CPU",
            SortMode::Memory => "Memory",
            SortMode::Pid => "PID",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "name" => SortMode::Name,
            "cpu" => SortMode::Cpu,
            "memory" | "mem" => SortMode::Memory,
            "pid" => SortMode::Pid,
            _ => SortMode::Tracked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    Err,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub created: Instant,
}

pub struct App {
    pub running: bool,
    pub tracked: TrackedSet,
    pub totals: SystemTotals,
    /// Global CPU% samples, scaled by 100 for the header sparkline.
    pub cpu_history: VecDeque<u64>,
    pub ticks: u64,
    pub skipped_ticks: u64,
    pub input_mode: InputMode,
    pub filter_text: String,
    pub sort_mode: SortMode,
    pub show_properties: bool,
    pub theme: Theme,
    pub status_message: Option<StatusMessage>,
    pub keybinds: ResolvedKeybinds,
    pub table_state: TableState,
    pub table_area: Option<Rect>,
    selected_pid: Option<u32>,
    refresh_requested: bool,
    colors: ColorsConfig,
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = Theme::from_config(&config.colors.theme, &config.colors);
        App {
            running: true,
            tracked: TrackedSet::with_history_capacity(config.general.history_length),
            totals: SystemTotals::default(),
            cpu_history: VecDeque::with_capacity(config.general.history_length),
            ticks: 0,
            skipped_ticks: 0,
            input_mode: InputMode::Normal,
            filter_text: String::new(),
            sort_mode: SortMode::from_str_config(&config.general.default_sort),
            show_properties: config.general.show_properties,
            theme,
            status_message: None,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            table_state: TableState::default(),
            table_area: None,
            selected_pid: None,
            refresh_requested: false,
            colors: config.colors,
        }
    }

    /// Folds one scheduler tick into the tracked set. A failed enumeration
    /// only bumps the skipped counter.
    pub fn apply_snapshot(&mut self, result: Result<ProcessSnapshot, EnumerationError>) {
        match apply_tick(&mut self.tracked, result) {
            TickOutcome::Reconciled { totals, .. } => {
                self.totals = totals;
                self.push_cpu_history(totals.cpu_usage_percent);
                self.ticks += 1;
            }
            TickOutcome::Skipped(_) => self.skipped_ticks += 1,
        }
        self.sync_selection();
        self.expire_status();
    }

    fn push_cpu_history(&mut self, percent: f32) {
        let capacity = self.tracked.history_capacity();
        if capacity == 0 {
            return;
        }
        while self.cpu_history.len() >= capacity {
            self.cpu_history.pop_front();
        }
        self.cpu_history.push_back((f64::from(percent) * 100.0).round() as u64);
    }

    /// Rows as presented: filtered, then sorted. Sorting is stable, so ties
    /// keep tracked order.
    pub fn visible_processes(&self) -> Vec<&TrackedProcess> {
        let needle = self.filter_text.to_lowercase();
        let mut rows: Vec<&TrackedProcess> = self
            .tracked
            .iter()
            .filter(|p| p.matches_filter(&needle))
            .collect();

        match self.sort_mode {
            SortMode::Tracked => {}
            SortMode::Name => rows.sort_by_cached_key(|p| p.display_name().to_lowercase()),
            SortMode::Cpu => rows.sort_by(|a, b| b.cpu_percent().total_cmp(&a.cpu_percent())),
            SortMode::Memory => rows.sort_by(|a, b| b.memory_bytes().cmp(&a.memory_bytes())),
            SortMode::Pid => rows.sort_by_key(|p| p.pid()),
        }
        rows
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected_pid
    }

    pub fn selected_process(&self) -> Option<&TrackedProcess> {
        self.selected_pid.and_then(|pid| self.tracked.get(pid))
    }

    pub fn selected_properties(&self) -> Option<ProcessProperties> {
        self.selected_process()
            .map(|p| ProcessProperties::query(p, Instant::now()))
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    /// Returns and clears a pending request for an out-of-band refresh.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Top),
            KeyCode::End => return Action::Navigate(Direction::Bottom),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return Action::EnterFilterMode;
        }
        if code == kb.end_task {
            return self.selected_pid.map_or(Action::None, Action::EndTask);
        }
        if code == kb.force_end_task {
            return self.selected_pid.map_or(Action::None, Action::ForceEndTask);
        }
        if code == kb.properties {
            return Action::ToggleProperties;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.cycle_theme {
            return Action::CycleTheme;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == KeyCode::Esc && !self.filter_text.is_empty() {
            return Action::ClearFilter;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // Only the help key and Esc dismiss; everything else is swallowed
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = self.filter_text.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = self.filter_text.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            KeyCode::Up => Action::Navigate(Direction::Up),
            KeyCode::Down => Action::Navigate(Direction::Down),
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::EndTask(pid) => self.end_task(pid, Signal::Term),
            Action::ForceEndTask(pid) => self.end_task(pid, Signal::Kill),
            Action::EnterFilterMode => self.input_mode = InputMode::Filter,
            Action::ExitFilterMode => self.input_mode = InputMode::Normal,
            Action::ClearFilter => {
                self.filter_text.clear();
                self.input_mode = InputMode::Normal;
                self.sync_selection();
            }
            Action::UpdateFilter(text) => {
                self.filter_text = text;
                self.sync_selection();
            }
            Action::CycleSortMode => {
                self.sort_mode = self.sort_mode.next();
                self.sync_selection();
            }
            Action::CycleTheme => self.theme = self.theme.next(&self.colors),
            Action::ToggleProperties => self.show_properties = !self.show_properties,
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => self.refresh_requested = true,
            Action::SelectAt(col, row) => self.select_at(col, row),
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let rows = self.visible_pids();
        if rows.is_empty() {
            return;
        }
        let last = rows.len() - 1;
        let current = self.table_state.selected().unwrap_or(0).min(last);
        let page = self.page_size();
        let next = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
            Direction::PageUp => current.saturating_sub(page),
            Direction::PageDown => (current + page).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
        self.select_row(&rows, next);
    }

    fn select_at(&mut self, col: u16, row: u16) {
        let Some(area) = self.table_area else {
            return;
        };
        if !area.contains(Position::new(col, row)) {
            return;
        }
        // Skip the top border and the header row
        let first_row = area.y + 2;
        if row < first_row {
            return;
        }
        let index = (row - first_row) as usize + self.table_state.offset();
        let rows = self.visible_pids();
        if index < rows.len() {
            self.select_row(&rows, index);
        }
    }

    fn visible_pids(&self) -> Vec<u32> {
        self.visible_processes().iter().map(|p| p.pid()).collect()
    }

    fn select_row(&mut self, rows: &[u32], index: usize) {
        self.table_state.select(Some(index));
        self.selected_pid = rows.get(index).copied();
    }

    fn page_size(&self) -> usize {
        self.table_area
            .map(|a| a.height.saturating_sub(3) as usize)
            .filter(|h| *h > 0)
            .unwrap_or(10)
    }

    /// Keeps the selection on the same PID across refreshes and re-sorts.
    /// If that PID is gone, the row at the same position takes over.
    fn sync_selection(&mut self) {
        let rows = self.visible_pids();
        if rows.is_empty() {
            self.table_state.select(None);
            self.selected_pid = None;
            return;
        }
        let index = self
            .selected_pid
            .and_then(|pid| rows.iter().position(|&p| p == pid))
            .unwrap_or_else(|| self.table_state.selected().unwrap_or(0).min(rows.len() - 1));
        self.select_row(&rows, index);
    }

    fn end_task(&mut self, pid: u32, signal: Signal) {
        let Some(process) = self.tracked.get(pid) else {
            self.set_status(ActionError::NotFound(pid).to_string(), StatusKind::Err);
            return;
        };
        let name = process.display_name().to_string();

        if process.is_protected() {
            tracing::info!(pid, "end task refused for protected process");
            let err = ActionError::Protected { pid, name };
            self.set_status(err.to_string(), StatusKind::Err);
            return;
        }

        match kill::end_task(pid, signal) {
            Ok(signal_name) => {
                tracing::info!(pid, signal = signal_name, "process ended");
                self.set_status(format!("{name} has been terminated."), StatusKind::Ok);
                self.refresh_requested = true;
            }
            Err(err) => {
                tracing::warn!(pid, %err, "end task failed");
                self.set_status(err.to_string(), StatusKind::Err);
            }
        }
    }

    pub fn set_status(&mut self, text: String, kind: StatusKind) {
        self.status_message = Some(StatusMessage {
            text,
            kind,
            created: Instant::now(),
        });
    }

    fn expire_status(&mut self) {
        if let Some(msg) = &self.status_message
            && msg.created.elapsed().as_secs() >= STATUS_TTL_SECS
        {
            self.status_message = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::system::snapshot::LiveProcess;

    fn make_app(procs: Vec<LiveProcess>, sort_mode: SortMode) -> App {
        let mut app = App::new(Config::default());
        app.sort_mode = sort_mode;
        app.apply_snapshot(Ok(ProcessSnapshot::new(Instant::now(), 1, procs)));
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn names(app: &App) -> Vec<String> {
        app.visible_processes()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    #[test]
    fn sort_mode_cycles_through_all_variants() {
        let mut mode = SortMode::Tracked;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::Tracked);
        assert_eq!(
            seen,
            vec![
                SortMode::Tracked,
                SortMode::Name,
                SortMode::Cpu,
                SortMode::Memory,
                SortMode::Pid
            ]
        );
    }

    #[test]
    fn memory_sort_is_descending() {
        let app = make_app(
            vec![
                LiveProcess::new(1, "small").with_memory(10),
                LiveProcess::new(2, "big").with_memory(1000),
                LiveProcess::new(3, "mid").with_memory(100),
            ],
            SortMode::Memory,
        );
        assert_eq!(names(&app), vec!["big", "mid", "small"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let app = make_app(
            vec![
                LiveProcess::new(1, "Zebra"),
                LiveProcess::new(2, "alpha"),
                LiveProcess::new(3, "Beta"),
            ],
            SortMode::Name,
        );
        assert_eq!(names(&app), vec!["alpha", "Beta", "Zebra"]);
    }

    #[test]
    fn cpu_sort_uses_sampled_utilization() {
        let t = Instant::now();
        let mut app = App::new(Config::default());
        app.sort_mode = SortMode::Cpu;
        let base = vec![
            LiveProcess::new(1, "idle").with_cpu_time(Duration::ZERO),
            LiveProcess::new(2, "busy").with_cpu_time(Duration::ZERO),
        ];
        app.apply_snapshot(Ok(ProcessSnapshot::new(t, 1, base)));
        let next = vec![
            LiveProcess::new(1, "idle").with_cpu_time(Duration::from_millis(10)),
            LiveProcess::new(2, "busy").with_cpu_time(Duration::from_millis(900)),
        ];
        app.apply_snapshot(Ok(ProcessSnapshot::new(t + Duration::from_secs(1), 1, next)));
        assert_eq!(names(&app), vec!["busy", "idle"]);
    }

    #[test]
    fn filter_matches_name_case_insensitively() {
        let mut app = make_app(
            vec![LiveProcess::new(1, "Firefox"), LiveProcess::new(2, "bash")],
            SortMode::Tracked,
        );
        app.dispatch(Action::UpdateFilter("FIRE".to_string()));
        assert_eq!(names(&app), vec!["Firefox"]);
        assert_eq!(app.selected_pid(), Some(1));
        app.dispatch(Action::ClearFilter);
        assert_eq!(names(&app).len(), 2);
    }

    #[test]
    fn selection_follows_pid_across_resort() {
        let mut app = make_app(
            vec![
                LiveProcess::new(1, "b").with_memory(1),
                LiveProcess::new(2, "a").with_memory(2),
            ],
            SortMode::Tracked,
        );
        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.selected_pid(), Some(2));

        app.dispatch(Action::CycleSortMode); // Name
        assert_eq!(app.selected_pid(), Some(2));
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn selection_moves_to_neighbour_when_process_exits() {
        let t = Instant::now();
        let mut app = make_app(
            vec![
                LiveProcess::new(1, "a"),
                LiveProcess::new(2, "b"),
                LiveProcess::new(3, "c"),
            ],
            SortMode::Tracked,
        );
        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.selected_pid(), Some(2));

        app.apply_snapshot(Ok(ProcessSnapshot::new(
            t + Duration::from_secs(1),
            1,
            vec![LiveProcess::new(1, "a"), LiveProcess::new(3, "c")],
        )));
        assert_eq!(app.selected_pid(), Some(3));
    }

    #[test]
    fn navigation_clamps_at_edges() {
        let mut app = make_app(
            vec![LiveProcess::new(1, "a"), LiveProcess::new(2, "b")],
            SortMode::Tracked,
        );
        app.dispatch(Action::Navigate(Direction::Up));
        assert_eq!(app.selected_pid(), Some(1));
        app.dispatch(Action::Navigate(Direction::Bottom));
        assert_eq!(app.selected_pid(), Some(2));
        app.dispatch(Action::Navigate(Direction::PageDown));
        assert_eq!(app.selected_pid(), Some(2));
        app.dispatch(Action::Navigate(Direction::Top));
        assert_eq!(app.selected_pid(), Some(1));
    }

    #[test]
    fn skipped_tick_keeps_rows() {
        let mut app = make_app(vec![LiveProcess::new(1, "a")], SortMode::Tracked);
        app.apply_snapshot(Err(EnumerationError::Empty));
        assert_eq!(app.skipped_ticks, 1);
        assert_eq!(app.ticks, 1);
        assert_eq!(names(&app), vec!["a"]);
    }

    #[test]
    fn end_task_on_process_without_executable_is_refused() {
        let mut app = make_app(vec![LiveProcess::new(77, "kthread")], SortMode::Tracked);
        app.dispatch(Action::EndTask(77));
        let msg = app.status_message.as_ref().expect("status expected");
        assert_eq!(msg.kind, StatusKind::Err);
        assert!(msg.text.contains("system process"));
        assert!(!app.take_refresh_request());
    }

    #[test]
    fn end_task_on_untracked_pid_reports_not_found() {
        let mut app = make_app(vec![], SortMode::Tracked);
        app.dispatch(Action::EndTask(12345));
        let msg = app.status_message.as_ref().unwrap();
        assert_eq!(msg.text, "PID 12345 not found");
    }

    #[test]
    fn refresh_request_is_taken_once() {
        let mut app = make_app(vec![], SortMode::Tracked);
        app.dispatch(Action::Refresh);
        assert!(app.take_refresh_request());
        assert!(!app.take_refresh_request());
    }

    #[test]
    fn default_keybinds() {
        let app = make_app(vec![LiveProcess::new(1, "a")], SortMode::Tracked);
        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.map_key(key(KeyCode::Char('/'))), Action::EnterFilterMode);
        assert_eq!(app.map_key(key(KeyCode::Delete)), Action::EndTask(1));
        assert_eq!(app.map_key(key(KeyCode::Char('K'))), Action::ForceEndTask(1));
        assert_eq!(app.map_key(key(KeyCode::Char('p'))), Action::ToggleProperties);
        assert_eq!(app.map_key(key(KeyCode::Char('s'))), Action::CycleSortMode);
        assert_eq!(app.map_key(key(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(
            app.map_key(key(KeyCode::PageDown)),
            Action::Navigate(Direction::PageDown)
        );
    }

    #[test]
    fn end_task_key_without_selection_does_nothing() {
        let app = make_app(vec![], SortMode::Tracked);
        assert_eq!(app.map_key(key(KeyCode::Delete)), Action::None);
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let mut app = make_app(vec![LiveProcess::new(1, "a")], SortMode::Tracked);
        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help());

        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.map_key(key(KeyCode::Delete)), Action::None);
        assert_eq!(app.map_key(key(KeyCode::Esc)), Action::ToggleHelp);
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );

        app.dispatch(Action::ToggleHelp);
        assert!(!app.show_help());
    }

    #[test]
    fn filter_mode_edits_text() {
        let mut app = make_app(vec![], SortMode::Tracked);
        app.dispatch(Action::EnterFilterMode);
        let action = app.map_key(key(KeyCode::Char('x')));
        assert_eq!(action, Action::UpdateFilter("x".to_string()));
        app.dispatch(action);
        assert_eq!(
            app.map_key(key(KeyCode::Backspace)),
            Action::UpdateFilter(String::new())
        );
        assert_eq!(app.map_key(key(KeyCode::Esc)), Action::ClearFilter);
    }

    #[test]
    fn click_selects_row_under_cursor() {
        let mut app = make_app(
            vec![
                LiveProcess::new(1, "a"),
                LiveProcess::new(2, "b"),
                LiveProcess::new(3, "c"),
            ],
            SortMode::Tracked,
        );
        app.table_area = Some(Rect::new(0, 4, 80, 20));
        // border at y=4, header at y=5, first row at y=6
        app.dispatch(Action::SelectAt(10, 8));
        assert_eq!(app.selected_pid(), Some(3));
        app.dispatch(Action::SelectAt(10, 5));
        assert_eq!(app.selected_pid(), Some(3));
    }
}
