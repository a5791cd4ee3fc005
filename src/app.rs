use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};
use notify_rust::{Notification, Urgency};

use crate::aggregate;
use crate::badges::{self, Badge};
use crate::chart::{self, DateRange, Projection};
use crate::config::{self, Config, RANGE_PRESETS, Theme};
use crate::curriculum;
use crate::exams::{self, TrendLine};
use crate::level::{self, LevelState};
use crate::model::{Snapshot, Task, TaskStatus, TestKind, TestResult};
use crate::stopwatch::Stopwatch;
use crate::store::Store;
use crate::subject::{ALL_SUBJECTS, Subject};

// ============================================================================
// Constants & Types
// ============================================================================

pub const TICK_RATE: Duration = Duration::from_millis(50);
pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(5);
const MILESTONE_CHECK_INTERVAL: Duration = Duration::from_secs(1);
const CUSTOM_CATEGORY: &str = "Custom";
const MAX_MANUAL_MINUTES: u64 = 24 * 60;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum View {
    Daily,
    Achievements,
    Tests,
    Help,
}

impl View {
    fn next(self) -> Self {
        match self {
            Self::Daily => Self::Achievements,
            Self::Achievements => Self::Tests,
            Self::Tests | Self::Help => Self::Daily,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Daily | Self::Help => Self::Tests,
            Self::Achievements => Self::Daily,
            Self::Tests => Self::Achievements,
        }
    }
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum DeleteTarget {
    Task,
    Unit,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputMode {
    Normal,
    AddingUnit,
    AddingTask,
    AddingTest,
    EditingMinutes,
    EditingMemo,
    ConfirmingDelete(DeleteTarget),
}

pub struct ActiveTimer {
    pub task_id: String,
    pub stopwatch: Stopwatch,
}

/// Level and badge set last announced, so only changes are notified.
struct Milestones {
    level: u32,
    badges: Vec<&'static Badge>,
}

#[derive(Debug, PartialEq)]
pub struct MilestoneChange {
    pub new_level: Option<u32>,
    pub new_badges: Vec<&'static str>,
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub tasks: Vec<Task>,
    pub tests: Vec<TestResult>,
    pub config: Config,
    pub theme: Theme,
    pub view: View,
    pub input_mode: InputMode,
    pub input: String,
    pub selected_unit: Option<String>,
    pub unit_cursor: usize,
    pub task_cursor: usize,
    pub status_filter: Option<TaskStatus>,
    pub active: Option<ActiveTimer>,
    pub subject_cursor: usize,
    pub test_filter: Option<TestKind>,
    pub trend_lines: Vec<TrendLine>,
    pub trend_cursor: usize,
    pub read_only: bool,
    pub status_message: Option<String>,
    pub needs_save: bool,
    store: Option<Store>,
    milestones: Milestones,
    last_save: Instant,
    last_milestone_check: Instant,
}

impl App {
    pub fn new(tasks: Vec<Task>, tests: Vec<TestResult>, config: Config, store: Option<Store>) -> Self {
        let config = config.sanitized();
        let milestones = Milestones {
            level: level::calculate_level(aggregate::total_minutes(&tasks)).level,
            badges: badges::unlocked_for(&tasks),
        };

        Self {
            theme: config::get_theme(&config.theme),
            tasks,
            tests,
            config,
            view: View::Daily,
            input_mode: InputMode::Normal,
            input: String::new(),
            selected_unit: None,
            unit_cursor: 0,
            task_cursor: 0,
            status_filter: None,
            active: None,
            subject_cursor: 0,
            test_filter: None,
            trend_lines: vec![TrendLine::Total4],
            trend_cursor: 0,
            read_only: false,
            status_message: None,
            needs_save: false,
            store,
            milestones,
            last_save: Instant::now(),
            last_milestone_check: Instant::now(),
        }
    }

    // ------------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------------

    pub fn level_state(&self) -> LevelState {
        level::calculate_level(aggregate::total_minutes(&self.tasks))
    }

    pub fn badges(&self) -> Vec<&'static Badge> {
        badges::unlocked_for(&self.tasks)
    }

    pub fn units(&self) -> Vec<String> {
        curriculum::sorted_units(&self.tasks)
    }

    pub fn projection(&self, today: NaiveDate) -> Projection {
        let range = DateRange::last_days(today, self.config.range_days);
        chart::project(&self.tasks, range, &self.config.selected_subjects, today)
    }

    pub fn is_subject_selected(&self, subject: Subject) -> bool {
        self.config.selected_subjects.contains(&subject)
    }

    /// Indices into `tasks` for the open unit, grouped by subject.
    pub fn visible_tasks(&self) -> Vec<usize> {
        let Some(unit) = &self.selected_unit else {
            return Vec::new();
        };
        let mut indices: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| &t.unit == unit && self.status_filter.is_none_or(|s| t.status == s))
            .map(|(i, _)| i)
            .collect();
        indices.sort_by_key(|&i| self.tasks[i].subject.index());
        indices
    }

    pub fn selected_task_index(&self) -> Option<usize> {
        self.visible_tasks().get(self.task_cursor).copied()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task_index().map(|i| &self.tasks[i])
    }

    pub fn is_running(&self, task_id: &str) -> bool {
        self.active.as_ref().is_some_and(|a| a.task_id == task_id && a.stopwatch.is_running())
    }

    fn task_index(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn touch(&mut self) {
        self.needs_save = true;
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    // ------------------------------------------------------------------------
    // Task mutations
    // ------------------------------------------------------------------------

    pub fn cycle_selected_status(&mut self) {
        if self.read_only {
            return;
        }
        if let Some(i) = self.selected_task_index() {
            self.tasks[i].cycle_status();
            self.touch();
            self.check_milestones();
        }
    }

    pub fn toggle_timer(&mut self) {
        if self.read_only {
            return;
        }
        let Some(i) = self.selected_task_index() else {
            return;
        };
        let id = self.tasks[i].id.clone();
        let was_running = self.is_running(&id);
        self.stop_timer();
        if was_running {
            return;
        }

        let mut stopwatch = Stopwatch::new(self.tasks[i].current_duration);
        stopwatch.start();
        if self.tasks[i].status == TaskStatus::NotStarted {
            self.tasks[i].status = TaskStatus::InProgress;
        }
        info!("event=timer_start task={} from_secs={}", id, self.tasks[i].current_duration);
        self.active = Some(ActiveTimer { task_id: id, stopwatch });
        self.touch();
    }

    pub fn stop_timer(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let secs = active.stopwatch.stop();
        if let Some(i) = self.task_index(&active.task_id) {
            self.tasks[i].current_duration = secs;
            info!("event=timer_stop task={} secs={}", active.task_id, secs);
            self.touch();
        }
    }

    /// Mirrors the running stopwatch into the task's uncommitted duration.
    pub fn sync_timer(&mut self) {
        let (id, secs) = match &self.active {
            Some(a) => (a.task_id.clone(), a.stopwatch.elapsed_secs()),
            None => return,
        };
        match self.task_index(&id) {
            Some(i) => self.tasks[i].current_duration = secs,
            None => self.active = None,
        }
    }

    pub fn commit_selected(&mut self, today: NaiveDate) -> Option<u64> {
        if self.read_only {
            return None;
        }
        let i = self.selected_task_index()?;
        if self.active.as_ref().is_some_and(|a| a.task_id == self.tasks[i].id) {
            self.stop_timer();
        }

        let task = &mut self.tasks[i];
        let secs = task.commit_session(today)?.duration;
        info!("event=session_commit status=ok task={} secs={}", task.id, secs);
        self.touch();
        self.set_status(format!("Saved {}", aggregate::format_clock(secs)));
        self.check_milestones();
        Some(secs)
    }

    pub fn set_selected_minutes(&mut self, minutes: u64) {
        if self.read_only {
            return;
        }
        let Some(i) = self.selected_task_index() else {
            return;
        };
        let mut stopwatch = match self.active.take() {
            Some(active) if active.task_id == self.tasks[i].id => active.stopwatch,
            other => {
                self.active = other;
                Stopwatch::default()
            }
        };
        self.tasks[i].current_duration = stopwatch.set_minutes(minutes);
        self.touch();
    }

    pub fn set_selected_memo(&mut self, memo: &str) {
        if self.read_only {
            return;
        }
        if let Some(i) = self.selected_task_index() {
            self.tasks[i].current_memo = memo.trim().to_string();
            self.touch();
        }
    }

    pub fn delete_selected_task(&mut self) {
        if self.read_only {
            return;
        }
        let Some(i) = self.selected_task_index() else {
            return;
        };
        let removed = self.tasks.remove(i);
        if self.active.as_ref().is_some_and(|a| a.task_id == removed.id) {
            self.active = None;
        }
        info!("event=task_delete task={} unit={}", removed.id, removed.unit);
        let visible = self.visible_tasks().len();
        self.task_cursor = self.task_cursor.min(visible.saturating_sub(1));
        self.touch();
    }

    pub fn delete_unit(&mut self, unit: &str) {
        if self.read_only {
            return;
        }
        let before = self.tasks.len();
        self.tasks.retain(|t| t.unit != unit);
        let orphaned = self.active.as_ref().is_some_and(|a| !self.tasks.iter().any(|t| t.id == a.task_id));
        if orphaned {
            self.active = None;
        }
        if self.selected_unit.as_deref() == Some(unit) {
            self.selected_unit = None;
        }
        self.unit_cursor = self.unit_cursor.min(self.units().len().saturating_sub(1));
        info!("event=unit_delete unit={} tasks={}", unit, before - self.tasks.len());
        self.touch();
    }

    pub fn add_unit(&mut self, number: u32, today: NaiveDate) {
        if self.read_only {
            return;
        }
        let mut generated = curriculum::generate_unit(number, today);
        info!("event=unit_create unit={} tasks={}", curriculum::unit_name(number), generated.len());
        generated.append(&mut self.tasks);
        self.tasks = generated;
        self.open_unit(curriculum::unit_name(number));
        self.touch();
    }

    pub fn add_task(&mut self, subject: Subject, category: &str, title: &str, today: NaiveDate) {
        if self.read_only {
            return;
        }
        let Some(unit) = self.selected_unit.clone() else {
            return;
        };
        let category = if category.trim().is_empty() { CUSTOM_CATEGORY } else { category.trim() };
        self.tasks.push(Task::new(&unit, subject, category, title.trim(), today));
        self.touch();
    }

    pub fn add_test(&mut self, test: TestResult) {
        if self.read_only {
            return;
        }
        info!("event=test_add test={} kind={} date={}", test.id, test.kind.to_str(), test.date);
        self.tests.push(test);
        self.touch();
    }

    /// Bulk overwrite from a snapshot blob.
    pub fn import_snapshot(&mut self, snapshot: Snapshot) {
        self.active = None;
        self.tasks = snapshot.tasks;
        self.tests = snapshot.tests;
        self.selected_unit = None;
        self.unit_cursor = 0;
        self.task_cursor = 0;
        self.milestones = Milestones { level: self.level_state().level, badges: self.badges() };
        self.touch();
    }

    pub fn open_unit(&mut self, unit: String) {
        self.unit_cursor = self.units().iter().position(|u| *u == unit).unwrap_or(0);
        self.selected_unit = Some(unit);
        self.task_cursor = 0;
    }

    // ------------------------------------------------------------------------
    // View settings
    // ------------------------------------------------------------------------

    pub fn toggle_subject(&mut self, subject: Subject) {
        let selected = &mut self.config.selected_subjects;
        if let Some(pos) = selected.iter().position(|&s| s == subject) {
            selected.remove(pos);
        } else {
            selected.push(subject);
            selected.sort();
        }
        self.save_config();
    }

    pub fn set_range(&mut self, days: u64) {
        self.config.range_days = days;
        self.save_config();
    }

    pub fn cycle_range(&mut self) {
        let idx = RANGE_PRESETS.iter().position(|&d| d == self.config.range_days);
        let next = idx.map_or(RANGE_PRESETS[0], |i| RANGE_PRESETS[(i + 1) % RANGE_PRESETS.len()]);
        self.set_range(next);
    }

    pub fn cycle_test_filter(&mut self) {
        self.test_filter = match &self.test_filter {
            None => Some(TestKind::Curriculum),
            Some(TestKind::Curriculum) => Some(TestKind::Kumiwake),
            Some(TestKind::Kumiwake) => Some(TestKind::Hantei),
            Some(_) => None,
        };
    }

    pub fn trend_choices() -> Vec<TrendLine> {
        std::iter::once(TrendLine::Total4).chain(ALL_SUBJECTS.iter().map(|&s| TrendLine::Subject(s))).collect()
    }

    pub fn toggle_trend_line(&mut self, line: TrendLine) {
        if let Some(pos) = self.trend_lines.iter().position(|&l| l == line) {
            self.trend_lines.remove(pos);
        } else {
            self.trend_lines.push(line);
        }
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(TaskStatus::NotStarted),
            Some(TaskStatus::NotStarted) => Some(TaskStatus::InProgress),
            Some(TaskStatus::InProgress) => Some(TaskStatus::Completed),
            Some(TaskStatus::Completed) => None,
        };
        self.task_cursor = 0;
    }

    pub fn cycle_theme(&mut self, forward: bool) {
        self.config.theme = config::next_theme(&self.config.theme, forward).into();
        self.theme = config::get_theme(&self.config.theme);
        self.save_config();
    }

    // ------------------------------------------------------------------------
    // Milestones, ticking & persistence
    // ------------------------------------------------------------------------

    /// Compares level and badges with what was last announced.
    pub fn check_milestones(&mut self) -> MilestoneChange {
        let level = self.level_state().level;
        let unlocked = self.badges();
        let fresh = badges::newly_unlocked(&self.milestones.badges, &unlocked);
        let new_level = (level > self.milestones.level).then_some(level);

        if let Some(level) = new_level {
            info!("event=level_up level={}", level);
            self.notify("Level Up! ⭐", &format!("You reached level {}. Keep going!", level));
        }
        for badge in &fresh {
            info!("event=badge_unlock badge={}", badge.id);
            self.notify(&format!("Badge unlocked {}", badge.icon), &format!("{}: {}", badge.label, badge.description));
        }

        self.milestones = Milestones { level, badges: unlocked };
        MilestoneChange { new_level, new_badges: fresh.iter().map(|b| b.id).collect() }
    }

    pub fn update(&mut self) {
        self.sync_timer();

        if self.last_milestone_check.elapsed() >= MILESTONE_CHECK_INTERVAL {
            self.last_milestone_check = Instant::now();
            if self.active.is_some() {
                self.check_milestones();
            }
        }

        if self.needs_save && self.last_save.elapsed() >= AUTO_SAVE_INTERVAL {
            self.save();
            self.last_save = Instant::now();
        }
    }

    pub fn save(&mut self) {
        if self.read_only {
            self.needs_save = false;
            return;
        }
        let Some(store) = &self.store else {
            return;
        };
        match store.save(&self.tasks, &self.tests) {
            Ok(()) => self.needs_save = false,
            Err(err) => warn!("event=store_save status=error reason={}", err),
        }
    }

    pub fn save_config(&self) {
        if self.read_only {
            return;
        }
        if let Some(store) = &self.store {
            if let Err(err) = store.save_config(&self.config) {
                warn!("event=config_save status=error reason={}", err);
            }
        }
    }

    pub fn save_on_quit(&mut self) {
        self.stop_timer();
        self.save();
    }

    pub fn export_csv(&mut self, today: NaiveDate) {
        let Some(store) = &self.store else {
            return;
        };
        let msg = match store.export_csv(&self.tasks, today) {
            Ok(path) => format!("Exported {}", path.display()),
            Err(err) => {
                warn!("event=csv_export status=error reason={}", err);
                format!("Export failed: {}", err)
            }
        };
        self.set_status(msg);
    }

    fn notify(&self, title: &str, body: &str) {
        if self.config.notifications_enabled {
            notify(title, body, self.config.sound_enabled);
        }
    }
}

// ============================================================================
// Event Handlers
// ============================================================================

/// Returns `true` when the app should quit.
pub fn handle_input(key: KeyEvent, app: &mut App, today: NaiveDate) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.input_mode {
        InputMode::Normal => {}
        InputMode::ConfirmingDelete(target) => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => match target {
                    DeleteTarget::Task => app.delete_selected_task(),
                    DeleteTarget::Unit => {
                        if let Some(unit) = app.units().get(app.unit_cursor).cloned() {
                            app.delete_unit(&unit);
                        }
                    }
                },
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                _ => return false,
            }
            app.input_mode = InputMode::Normal;
            return false;
        }
        mode => {
            match key.code {
                KeyCode::Char(c) => app.input.push(c),
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Enter => {
                    apply_input(app, mode, today);
                    app.input_mode = InputMode::Normal;
                    app.input.clear();
                }
                KeyCode::Esc => {
                    app.input_mode = InputMode::Normal;
                    app.input.clear();
                }
                _ => {}
            }
            return false;
        }
    }

    match key.code {
        KeyCode::Tab => {
            app.view = app.view.next();
            return false;
        }
        KeyCode::BackTab => {
            app.view = app.view.prev();
            return false;
        }
        KeyCode::Char('?') => {
            app.view = if app.view == View::Help { View::Daily } else { View::Help };
            return false;
        }
        KeyCode::Char('E') => {
            app.export_csv(today);
            return false;
        }
        KeyCode::Char('T') => {
            app.cycle_theme(true);
            return false;
        }
        _ => {}
    }

    match app.view {
        View::Daily if app.selected_unit.is_some() => handle_unit_view(key, app, today),
        View::Daily => handle_summary_view(key, app),
        View::Achievements => handle_achievements_view(key, app),
        View::Tests => handle_tests_view(key, app),
        View::Help => match key.code {
            KeyCode::Char('q') => true,
            KeyCode::Esc => {
                app.view = View::Daily;
                false
            }
            _ => false,
        },
    }
}

fn apply_input(app: &mut App, mode: InputMode, today: NaiveDate) {
    let text = app.input.trim().to_string();
    match mode {
        InputMode::AddingUnit => match text.parse::<u32>() {
            Ok(n) if n > 0 => app.add_unit(n, today),
            _ => app.set_status("Unit number must be a positive integer"),
        },
        InputMode::AddingTask => match parse_task_input(&text) {
            Some((subject, category, title)) => app.add_task(subject, &category, &title, today),
            None => app.set_status("Use `subject: [category /] title`"),
        },
        InputMode::AddingTest => match exams::parse_test_entry(&text) {
            Ok(test) => app.add_test(test),
            Err(err) => app.set_status(err),
        },
        InputMode::EditingMinutes => match text.parse::<u64>() {
            Ok(m) if m <= MAX_MANUAL_MINUTES => app.set_selected_minutes(m),
            Ok(_) => app.set_status(format!("Minutes must be at most {}", MAX_MANUAL_MINUTES)),
            Err(_) => app.set_status("Minutes must be a whole number"),
        },
        InputMode::EditingMemo => app.set_selected_memo(&text),
        InputMode::Normal | InputMode::ConfirmingDelete(_) => {}
    }
}

/// `math: Workbook / Practice 3` or `math: Practice 3`.
pub fn parse_task_input(text: &str) -> Option<(Subject, String, String)> {
    let (subject, rest) = text.split_once(':')?;
    let subject = Subject::from_str(subject)?;
    let (category, title) = match rest.split_once('/') {
        Some((c, t)) => (c.trim().to_string(), t.trim().to_string()),
        None => (String::new(), rest.trim().to_string()),
    };
    if title.is_empty() {
        return None;
    }
    Some((subject, category, title))
}

fn start_input(app: &mut App, mode: InputMode) {
    if app.read_only {
        app.set_status("Read-only mode");
        return;
    }
    app.input.clear();
    app.input_mode = mode;
}

fn handle_summary_view(key: KeyEvent, app: &mut App) -> bool {
    let unit_count = app.units().len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Down | KeyCode::Char('j') => {
            if unit_count > 0 {
                app.unit_cursor = (app.unit_cursor + 1).min(unit_count - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.unit_cursor = app.unit_cursor.saturating_sub(1),
        KeyCode::Enter | KeyCode::Char('l') => {
            if let Some(unit) = app.units().get(app.unit_cursor).cloned() {
                app.open_unit(unit);
            }
        }
        KeyCode::Char('n') => start_input(app, InputMode::AddingUnit),
        KeyCode::Char('D') => {
            if unit_count > 0 && !app.read_only {
                app.input_mode = InputMode::ConfirmingDelete(DeleteTarget::Unit);
            }
        }
        _ => {}
    }
    false
}

fn handle_unit_view(key: KeyEvent, app: &mut App, today: NaiveDate) -> bool {
    let count = app.visible_tasks().len();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc | KeyCode::Char('h') => {
            app.selected_unit = None;
            app.status_filter = None;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if count > 0 {
                app.task_cursor = (app.task_cursor + 1).min(count - 1);
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.task_cursor = app.task_cursor.saturating_sub(1),
        KeyCode::Char(' ') => app.toggle_timer(),
        KeyCode::Char('c') => app.cycle_selected_status(),
        KeyCode::Char('s') => {
            app.commit_selected(today);
        }
        KeyCode::Char('f') => app.cycle_status_filter(),
        KeyCode::Char('e') => {
            if app.selected_task().is_some() {
                start_input(app, InputMode::EditingMinutes);
            }
        }
        KeyCode::Char('m') => {
            if let Some(memo) = app.selected_task().map(|t| t.current_memo.clone()) {
                start_input(app, InputMode::EditingMemo);
                app.input = memo;
            }
        }
        KeyCode::Char('a') => start_input(app, InputMode::AddingTask),
        KeyCode::Char('d') => {
            if app.selected_task().is_some() && !app.read_only {
                app.input_mode = InputMode::ConfirmingDelete(DeleteTarget::Task);
            }
        }
        _ => {}
    }
    false
}

fn handle_achievements_view(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('1') => app.set_range(RANGE_PRESETS[0]),
        KeyCode::Char('2') => app.set_range(RANGE_PRESETS[1]),
        KeyCode::Char('3') => app.set_range(RANGE_PRESETS[2]),
        KeyCode::Char('r') => app.cycle_range(),
        KeyCode::Left | KeyCode::Char('h') => app.subject_cursor = app.subject_cursor.saturating_sub(1),
        KeyCode::Right | KeyCode::Char('l') => {
            app.subject_cursor = (app.subject_cursor + 1).min(ALL_SUBJECTS.len() - 1);
        }
        KeyCode::Char(' ') => app.toggle_subject(ALL_SUBJECTS[app.subject_cursor]),
        _ => {}
    }
    false
}

fn handle_tests_view(key: KeyEvent, app: &mut App) -> bool {
    let choices = App::trend_choices();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('f') => app.cycle_test_filter(),
        KeyCode::Char('a') => start_input(app, InputMode::AddingTest),
        KeyCode::Left | KeyCode::Char('h') => app.trend_cursor = app.trend_cursor.saturating_sub(1),
        KeyCode::Right | KeyCode::Char('l') => app.trend_cursor = (app.trend_cursor + 1).min(choices.len() - 1),
        KeyCode::Char(' ') => app.toggle_trend_line(choices[app.trend_cursor]),
        _ => {}
    }
    false
}

// ============================================================================
// Utilities
// ============================================================================

pub fn notify(title: &str, body: &str, sound: bool) {
    if let Err(err) = Notification::new()
        .summary(title)
        .body(body)
        .appname("levelup")
        .icon("starred")
        .urgency(Urgency::Normal)
        .show()
    {
        warn!("event=notify status=error reason={}", err);
    }

    if sound {
        std::thread::spawn(|| play_sound(&SOUND_PLAYERS));
    }
}

const SOUND_PLAYERS: [(&str, &str); 3] = [
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/generic.wav"),
];

/// Plays the first sound file that exists. Returns whether a player started.
fn play_sound(players: &[(&str, &str)]) -> bool {
    let Some((cmd, file)) = players.iter().find(|(_, file)| std::path::Path::new(file).exists()) else {
        return false;
    };
    match std::process::Command::new(cmd)
        .arg(file)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
    {
        Ok(_) => true,
        Err(err) => {
            warn!("event=sound status=error player={} reason={}", cmd, err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HistoryEntry;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()
    }

    fn quiet_config() -> Config {
        Config { notifications_enabled: false, ..Config::default() }
    }

    fn app_with_unit() -> App {
        let mut app = App::new(Vec::new(), Vec::new(), quiet_config(), None);
        app.add_unit(3, today());
        app
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn adding_a_unit_opens_it() {
        let app = app_with_unit();
        assert_eq!(app.selected_unit.as_deref(), Some("Unit 3"));
        assert_eq!(app.units(), vec!["Unit 3"]);
        assert!(!app.visible_tasks().is_empty());
        assert!(app.needs_save);
    }

    #[test]
    fn visible_tasks_are_grouped_by_subject() {
        let app = app_with_unit();
        let subjects: Vec<usize> = app.visible_tasks().iter().map(|&i| app.tasks[i].subject.index()).collect();
        let mut sorted = subjects.clone();
        sorted.sort();
        assert_eq!(subjects, sorted);
    }

    #[test]
    fn commit_folds_duration_and_reports_it() {
        let mut app = app_with_unit();
        app.set_selected_minutes(25);
        app.set_selected_memo("  ratios  ");

        assert_eq!(app.commit_selected(today()), Some(1500));
        let task = app.selected_task().unwrap();
        assert_eq!(task.current_duration, 0);
        assert_eq!(task.history.len(), 1);
        assert_eq!(task.history[0].date, "2/14");
        assert_eq!(task.history[0].memo, "ratios");
        assert_eq!(app.commit_selected(today()), None);
    }

    #[test]
    fn starting_timer_marks_task_in_progress() {
        let mut app = app_with_unit();
        app.toggle_timer();
        let id = app.selected_task().unwrap().id.clone();
        assert!(app.is_running(&id));
        assert_eq!(app.selected_task().unwrap().status, TaskStatus::InProgress);

        app.toggle_timer();
        assert!(!app.is_running(&id));
        assert!(app.active.is_none());
    }

    #[test]
    fn read_only_blocks_mutations() {
        let mut app = app_with_unit();
        app.read_only = true;
        let before = app.tasks.clone();
        app.cycle_selected_status();
        app.set_selected_minutes(10);
        app.delete_selected_task();
        app.add_unit(4, today());
        assert_eq!(app.tasks, before);
    }

    #[test]
    fn deleting_unit_closes_it() {
        let mut app = app_with_unit();
        app.delete_unit("Unit 3");
        assert!(app.tasks.is_empty());
        assert!(app.selected_unit.is_none());
    }

    #[test]
    fn milestones_report_only_new_unlocks() {
        let mut app = app_with_unit();
        assert_eq!(app.check_milestones(), MilestoneChange { new_level: None, new_badges: vec![] });

        let i = app.selected_task_index().unwrap();
        app.tasks[i].status = TaskStatus::Completed;
        app.tasks[i].history = (1..=3)
            .map(|d| HistoryEntry { id: d.to_string(), date: format!("2/{}", d), duration: 3600, memo: String::new() })
            .collect();

        let change = app.check_milestones();
        assert_eq!(change.new_level, Some(2));
        assert_eq!(change.new_badges, vec!["first_step", "three_days"]);
        assert_eq!(app.check_milestones().new_badges, Vec::<&str>::new());
    }

    #[test]
    fn subject_toggle_keeps_table_order() {
        let mut app = app_with_unit();
        app.toggle_subject(Subject::Math);
        assert!(!app.is_subject_selected(Subject::Math));
        app.toggle_subject(Subject::Math);
        assert_eq!(app.config.selected_subjects, ALL_SUBJECTS.to_vec());
    }

    #[test]
    fn range_cycles_through_presets() {
        let mut app = app_with_unit();
        assert_eq!(app.config.range_days, 14);
        app.cycle_range();
        assert_eq!(app.config.range_days, 30);
        app.cycle_range();
        assert_eq!(app.config.range_days, 7);
    }

    #[test]
    fn task_input_parses_subject_and_category() {
        assert_eq!(
            parse_task_input("science: Workbook / Page 12"),
            Some((Subject::Science, "Workbook".into(), "Page 12".into()))
        );
        assert_eq!(parse_task_input("math: Extra sums"), Some((Subject::Math, String::new(), "Extra sums".into())));
        assert_eq!(parse_task_input("art: Drawing"), None);
        assert_eq!(parse_task_input("math:   "), None);
    }

    #[test]
    fn typed_task_lands_in_open_unit() {
        let mut app = app_with_unit();
        let before = app.tasks.len();
        handle_input(key('a'), &mut app, today());
        for c in "social: Map quiz".chars() {
            handle_input(key(c), &mut app, today());
        }
        handle_input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut app, today());

        assert_eq!(app.tasks.len(), before + 1);
        let added = app.tasks.last().unwrap();
        assert_eq!((added.unit.as_str(), added.subject, added.category.as_str()), ("Unit 3", Subject::Social, "Custom"));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app_with_unit();
        let before = app.tasks.len();
        handle_input(key('d'), &mut app, today());
        assert_eq!(app.input_mode, InputMode::ConfirmingDelete(DeleteTarget::Task));
        handle_input(key('n'), &mut app, today());
        assert_eq!(app.tasks.len(), before);

        handle_input(key('d'), &mut app, today());
        handle_input(key('y'), &mut app, today());
        assert_eq!(app.tasks.len(), before - 1);
    }

    #[test]
    fn quit_from_summary() {
        let mut app = App::new(Vec::new(), Vec::new(), quiet_config(), None);
        assert!(handle_input(key('q'), &mut app, today()));
    }

    #[test]
    fn typed_test_result_is_recorded() {
        let mut app = App::new(Vec::new(), Vec::new(), quiet_config(), None);
        app.view = View::Tests;
        handle_input(key('a'), &mut app, today());
        app.input = "2026/02/01 | Round 6 | curriculum | 52 | 61 | 48 | 50 | 49".into();
        handle_input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut app, today());

        assert_eq!(app.tests.len(), 1);
        assert_eq!(app.tests[0].name, "Round 6");
        assert!(app.needs_save);
    }

    #[test]
    fn manual_minutes_never_overflow() {
        let mut app = app_with_unit();
        app.set_selected_minutes(u64::MAX / 60 + 1);
        assert_eq!(app.selected_task().unwrap().current_duration, u64::MAX);
    }

    #[test]
    fn manual_minutes_stop_a_running_timer() {
        let mut app = app_with_unit();
        app.toggle_timer();
        app.set_selected_minutes(40);
        assert!(app.active.is_none());
        assert_eq!(app.selected_task().unwrap().current_duration, 2400);
    }

    #[test]
    fn typed_minutes_above_a_day_are_rejected() {
        let mut app = app_with_unit();
        handle_input(key('e'), &mut app, today());
        app.input = "18446744073709551615".into();
        handle_input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut app, today());
        assert_eq!(app.selected_task().unwrap().current_duration, 0);
        assert_eq!(app.status_message.as_deref(), Some("Minutes must be at most 1440"));
    }

    #[test]
    fn missing_sound_player_is_reported_not_fatal() {
        let existing = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        assert!(!play_sound(&[("levelup-no-such-player", existing)]));
        assert!(!play_sound(&[("paplay", "/nonexistent/levelup.oga")]));
    }
}
