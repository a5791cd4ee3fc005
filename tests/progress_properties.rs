use chrono::NaiveDate;
use levelup_study::aggregate;
use levelup_study::badges::unlocked_badges;
use levelup_study::chart::{self, DateRange, resolve_entry_date};
use levelup_study::level::calculate_level;
use levelup_study::model::{HistoryEntry, Snapshot, Task, TaskStatus};
use levelup_study::subject::{ALL_SUBJECTS, Subject};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Small LCG so generated logs are the same on every run.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn entry(date: &str, duration: u64) -> HistoryEntry {
    HistoryEntry { id: format!("{}-{}", date, duration), date: date.into(), duration, memo: String::new() }
}

fn generated_log(seed: u64, reference: NaiveDate) -> Vec<Task> {
    let mut rng = Lcg(seed);
    (0..12)
        .map(|i| {
            let subject = ALL_SUBJECTS[i % ALL_SUBJECTS.len()];
            let mut task = Task::new("Unit 1", subject, "Drill", &format!("Task {}", i), reference);
            task.current_duration = rng.next(900);
            if rng.next(3) == 0 {
                task.status = TaskStatus::Completed;
            }
            for _ in 0..rng.next(6) {
                let day = reference - chrono::Days::new(rng.next(40));
                let date = format!("{}/{}", chrono::Datelike::month(&day), chrono::Datelike::day(&day));
                task.history.push(entry(&date, rng.next(5400)));
            }
            task
        })
        .collect()
}

#[test]
fn totals_are_bounded_by_supersets() {
    let reference = ymd(2026, 2, 14);
    for seed in 1..20 {
        let tasks = generated_log(seed, reference);
        let all = aggregate::total_seconds(&tasks);
        for subject in ALL_SUBJECTS {
            let subset = aggregate::total_seconds(tasks.iter().filter(|t| t.subject == subject));
            assert!(subset <= all, "seed {} subject {:?}", seed, subject);
        }
        assert!(aggregate::total_minutes(&tasks) >= 0.0);
        assert_eq!(aggregate::total_seconds(std::iter::empty::<&Task>()), 0);
    }
}

#[test]
fn level_boundaries() {
    let zero = calculate_level(0.0);
    assert_eq!((zero.level, zero.current_xp), (1, 0.0));

    let below = calculate_level(99.0);
    assert_eq!((below.level, below.current_xp), (1, 99.0));

    let first = calculate_level(100.0);
    assert_eq!((first.level, first.current_xp), (2, 0.0));

    let mut last = 1;
    for minutes in (0..20_000).step_by(37) {
        let level = calculate_level(minutes as f64).level;
        assert!(level >= last);
        last = level;
    }
}

#[test]
fn badge_examples() {
    let reference = ymd(2026, 2, 14);
    let mut done = Task::new("Unit 1", Subject::Science, "Notes", "Plants", reference);
    done.status = TaskStatus::Completed;

    let ids = |tasks: &[Task], minutes: f64| -> Vec<&'static str> {
        unlocked_badges(tasks, minutes).iter().map(|b| b.id).collect()
    };

    let only_done = ids(std::slice::from_ref(&done), 0.0);
    assert!(only_done.contains(&"first_step"));
    assert!(!only_done.contains(&"level_10"));

    done.history = vec![entry("2/1", 60), entry("2/2", 60)];
    assert!(!ids(std::slice::from_ref(&done), 2.0).contains(&"three_days"));

    done.history.push(entry("2/9", 60));
    assert!(ids(std::slice::from_ref(&done), 3.0).contains(&"three_days"));
}

#[test]
fn chart_totals_match_in_range_history() {
    let reference = ymd(2026, 2, 14);
    let range = DateRange::last_days(reference, 14);
    for seed in 1..20 {
        let tasks = generated_log(seed, reference);
        let projection = chart::project(&tasks, range, &ALL_SUBJECTS, reference);

        let expected: u64 = tasks
            .iter()
            .flat_map(|t| t.history.iter())
            .filter(|h| resolve_entry_date(&h.date, reference).is_some_and(|d| range.contains(d)))
            .map(|h| h.duration / 60)
            .sum();
        assert_eq!(projection.total_minutes(), expected, "seed {}", seed);
        assert_eq!(projection.rows.len(), 15);
    }
}

#[test]
fn december_entries_belong_to_last_year_in_february() {
    let reference = ymd(2026, 2, 3);
    assert_eq!(resolve_entry_date("12/25", reference), Some(ymd(2025, 12, 25)));
    assert_eq!(resolve_entry_date("1/25", reference), Some(ymd(2026, 1, 25)));
}

#[test]
fn single_day_range_has_one_row() {
    let day = ymd(2026, 2, 14);
    let mut task = Task::new("Unit 1", Subject::Math, "Drill", "Fractions", day);
    task.history.push(entry("2/14", 600));
    let projection = chart::project(&[task], DateRange::single(day), &ALL_SUBJECTS, day);
    assert_eq!(projection.rows.len(), 1);
    assert_eq!(projection.rows[0].total, 10);
}

#[test]
fn ratio_percentages_sum_to_about_100() {
    let reference = ymd(2026, 2, 14);
    let range = DateRange::last_days(reference, 30);
    for seed in 1..40 {
        let tasks = generated_log(seed, reference);
        let projection = chart::project(&tasks, range, &ALL_SUBJECTS, reference);
        if projection.ratios.is_empty() {
            continue;
        }
        let sum: u64 = projection.ratios.iter().map(|r| r.percent).sum();
        let slack = projection.ratios.len() as u64 - 1;
        assert!(sum + slack >= 100 && sum <= 100 + slack, "seed {} sum {}", seed, sum);
    }
}

#[test]
fn commit_moves_time_into_history_without_changing_totals() {
    let reference = ymd(2026, 2, 14);
    let mut task = Task::new("Unit 2", Subject::Japanese, "Kanji", "Set 4", reference);
    task.current_duration = 1234;
    task.current_memo = "tricky".into();
    task.history.push(entry("2/10", 600));
    let before = aggregate::task_seconds(&task);

    task.commit_session(reference);
    assert_eq!(aggregate::task_seconds(&task), before);
    assert_eq!(task.current_duration, 0);
    assert!(task.current_memo.is_empty());
    let last = task.history.last().unwrap();
    assert_eq!((last.date.as_str(), last.duration, last.memo.as_str()), ("2/14", 1234, "tricky"));
}

#[test]
fn sparse_snapshot_coerces_to_defaults() {
    let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
    assert!(snapshot.tasks.is_empty() && snapshot.tests.is_empty());
    assert_eq!(snapshot.updated_at, 0);

    let snapshot: Snapshot = serde_json::from_str(r#"{"tasks": null, "tests": "oops", "updatedAt": null}"#).unwrap();
    assert!(snapshot.tasks.is_empty() && snapshot.tests.is_empty());
    assert_eq!(snapshot.updated_at, 0);
}

#[test]
fn mixed_snapshot_keeps_every_readable_record() {
    let raw = r#"{
        "tasks": [
            {"id": "t1", "subject": "math", "history": [{"id": "h1", "date": "2/1", "duration": 600}, {"id": "h2", "date": 6}]},
            {"id": "t2", "subject": "english"}
        ],
        "tests": [
            {"id": "a", "date": "2025/11/09", "name": "Round 1", "type": "curriculum"},
            {"id": "b", "date": "2025/11/22", "name": "Round 2"},
            {"id": "c", "date": "2025/12/06", "name": "Round 3", "total4": "oops"}
        ],
        "updatedAt": 1700000000000
    }"#;
    let snapshot: Snapshot = serde_json::from_str(raw).unwrap();
    assert_eq!(snapshot.tasks.len(), 1);
    assert_eq!(snapshot.tasks[0].history.len(), 1);
    assert_eq!(aggregate::total_seconds(&snapshot.tasks), 600);
    assert_eq!(snapshot.tests.len(), 2);
    assert_eq!(snapshot.updated_at, 1700000000000);
}
