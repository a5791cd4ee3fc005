//! Time totals over the task log.
//!
//! Totals include the uncommitted `current_duration` of each task unless the
//! function name says `committed`.

use crate::model::{Task, TaskStatus};
use crate::subject::Subject;

pub fn task_seconds(task: &Task) -> u64 {
    task.history_seconds() + task.current_duration
}

pub fn total_seconds<'a, I>(tasks: I) -> u64
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().map(task_seconds).sum()
}

/// History only; excludes time still sitting on a running or paused timer.
pub fn committed_seconds<'a, I>(tasks: I) -> u64
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().map(Task::history_seconds).sum()
}

/// Fractional minutes, the XP unit of the level curve.
pub fn total_minutes(tasks: &[Task]) -> f64 {
    total_seconds(tasks) as f64 / 60.0
}

pub fn subject_seconds(tasks: &[Task], subject: Subject) -> u64 {
    total_seconds(tasks.iter().filter(|t| t.subject == subject))
}

pub fn unit_seconds(tasks: &[Task], unit: &str) -> u64 {
    total_seconds(tasks.iter().filter(|t| t.unit == unit))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressStats {
    /// Completed tasks as a rounded percentage of all tasks.
    pub progress: u16,
    pub total_seconds: u64,
}

pub fn progress_stats<'a, I>(tasks: I) -> ProgressStats
where
    I: IntoIterator<Item = &'a Task>,
{
    let (mut count, mut completed, mut seconds) = (0usize, 0usize, 0u64);
    for task in tasks {
        count += 1;
        if task.status == TaskStatus::Completed {
            completed += 1;
        }
        seconds += task_seconds(task);
    }

    if count == 0 {
        return ProgressStats::default();
    }

    ProgressStats {
        progress: (completed as f64 / count as f64 * 100.0).round() as u16,
        total_seconds: seconds,
    }
}

pub fn subject_progress(tasks: &[Task], subject: Subject) -> ProgressStats {
    progress_stats(tasks.iter().filter(|t| t.subject == subject))
}

pub fn unit_progress(tasks: &[Task], unit: &str) -> ProgressStats {
    progress_stats(tasks.iter().filter(|t| t.unit == unit))
}

// ============================================================================
// Formatting
// ============================================================================

/// Stopwatch style: `1h5m` once past an hour, `12m30s` below.
pub fn format_clock(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 { format!("{}h{}m", h, m) } else { format!("{}m{}s", m, s) }
}

pub fn format_hours_minutes(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}
