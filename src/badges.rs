use std::collections::HashSet;

use crate::aggregate;
use crate::level::calculate_level;
use crate::model::{Task, TaskStatus};
use crate::subject::Subject;

pub struct Badge {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub condition: fn(&[Task], f64) -> bool,
}

const MATH_MASTER_MINUTES: f64 = 300.0;
const THREE_DAYS: usize = 3;
const LEVEL_BADGE: u32 = 10;

pub static BADGES: &[Badge] = &[
    Badge {
        id: "first_step",
        label: "First Step",
        icon: "🐣",
        description: "Completed a task for the first time",
        condition: first_step,
    },
    Badge {
        id: "three_days",
        label: "Three-Day Graduate",
        icon: "🔥",
        description: "Studied on three different days",
        condition: three_days,
    },
    Badge {
        id: "math_master",
        label: "Math Master",
        icon: "📐",
        description: "Studied math for five hours or more",
        condition: math_master,
    },
    Badge {
        id: "level_10",
        label: "Level 10",
        icon: "⭐",
        description: "Reached level 10",
        condition: level_ten,
    },
];

fn first_step(tasks: &[Task], _: f64) -> bool {
    tasks.iter().any(|t| t.status == TaskStatus::Completed)
}

// Counts distinct date strings, not a consecutive-day streak.
fn three_days(tasks: &[Task], _: f64) -> bool {
    let dates: HashSet<&str> = tasks
        .iter()
        .flat_map(|t| t.history.iter().map(|h| h.date.as_str()))
        .collect();
    dates.len() >= THREE_DAYS
}

fn math_master(tasks: &[Task], _: f64) -> bool {
    let seconds = aggregate::committed_seconds(tasks.iter().filter(|t| t.subject == Subject::Math));
    seconds as f64 / 60.0 >= MATH_MASTER_MINUTES
}

fn level_ten(_: &[Task], total_minutes: f64) -> bool {
    calculate_level(total_minutes).level >= LEVEL_BADGE
}

pub fn unlocked_badges(tasks: &[Task], total_minutes: f64) -> Vec<&'static Badge> {
    BADGES.iter().filter(|b| (b.condition)(tasks, total_minutes)).collect()
}

/// Evaluates against the minutes of the task set itself, running timers included.
pub fn unlocked_for(tasks: &[Task]) -> Vec<&'static Badge> {
    unlocked_badges(tasks, aggregate::total_minutes(tasks))
}

pub fn newly_unlocked(before: &[&'static Badge], after: &[&'static Badge]) -> Vec<&'static Badge> {
    after
        .iter()
        .filter(|b| !before.iter().any(|p| p.id == b.id))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HistoryEntry;
    use chrono::NaiveDate;

    fn task(subject: Subject) -> Task {
        Task::new("Unit 1", subject, "Drill", "Item", NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
    }

    fn entry(date: &str, duration: u64) -> HistoryEntry {
        HistoryEntry { id: date.into(), date: date.into(), duration, memo: String::new() }
    }

    fn ids(badges: &[&Badge]) -> Vec<&'static str> {
        badges.iter().map(|b| b.id).collect()
    }

    #[test]
    fn empty_log_unlocks_nothing() {
        assert!(unlocked_for(&[]).is_empty());
    }

    #[test]
    fn single_completed_task_earns_first_step_only() {
        let mut t = task(Subject::Japanese);
        t.status = TaskStatus::Completed;
        assert_eq!(ids(&unlocked_for(&[t])), vec!["first_step"]);
    }

    #[test]
    fn three_distinct_dates_on_one_task_unlock_streak_badge() {
        let mut t = task(Subject::Science);
        t.history = vec![entry("6/1", 60), entry("6/2", 60), entry("6/1", 60)];
        assert!(!ids(&unlocked_for(std::slice::from_ref(&t))).contains(&"three_days"));

        t.history.push(entry("6/9", 60));
        assert!(ids(&unlocked_for(&[t])).contains(&"three_days"));
    }

    #[test]
    fn math_master_ignores_running_timer() {
        let mut t = task(Subject::Math);
        t.history = vec![entry("6/1", 299 * 60)];
        t.current_duration = 3600;
        assert!(!ids(&unlocked_for(std::slice::from_ref(&t))).contains(&"math_master"));

        t.history.push(entry("6/2", 60));
        assert!(ids(&unlocked_for(&[t])).contains(&"math_master"));
    }

    #[test]
    fn math_master_ignores_other_subjects() {
        let mut t = task(Subject::Social);
        t.history = vec![entry("6/1", 400 * 60)];
        assert!(!ids(&unlocked_for(&[t])).contains(&"math_master"));
    }

    #[test]
    fn level_badge_follows_supplied_minutes() {
        assert!(ids(&unlocked_badges(&[], 100_000.0)).contains(&"level_10"));
        assert!(!ids(&unlocked_badges(&[], 500.0)).contains(&"level_10"));
    }

    #[test]
    fn newly_unlocked_reports_only_additions() {
        let before = vec![&BADGES[0]];
        let after = vec![&BADGES[0], &BADGES[3]];
        assert_eq!(ids(&newly_unlocked(&before, &after)), vec!["level_10"]);
        assert!(newly_unlocked(&after, &before).is_empty());
    }
}
