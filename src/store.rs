//! On-disk state: one data directory holding `tasks.json`, `tests.json` and
//! `config.json`, plus the `{tasks, tests, updatedAt}` snapshot blob used to
//! move a whole log between machines.
//!
//! Loading the working set never fails. A missing file yields defaults; a
//! malformed one is set aside as `<name>.corrupt` and replaced by defaults so
//! the next save cannot silently overwrite it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::chart::resolve_entry_date;
use crate::config::Config;
use crate::model::{Snapshot, Task, TestResult};

pub const TASKS_FILE: &str = "tasks.json";
pub const TESTS_FILE: &str = "tests.json";
pub const CONFIG_FILE: &str = "config.json";
pub const CSV_FILE: &str = "history_export.csv";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in `{}`: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io { path: path.to_path_buf(), source }
}

fn json_err(path: &Path) -> impl FnOnce(serde_json::Error) -> StoreError + '_ {
    move |source| StoreError::Json { path: path.to_path_buf(), source }
}

// ============================================================================
// JSON helpers
// ============================================================================

pub fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let raw = fs::read_to_string(path).map_err(io_err(path))?;
    serde_json::from_str(&raw).map_err(json_err(path))
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> StoreResult<()> {
    let raw = serde_json::to_string_pretty(data).map_err(json_err(path))?;
    fs::write(path, raw).map_err(io_err(path))
}

/// Forgiving read for the working set; see the module docs.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json(path) {
        Ok(value) => value,
        Err(StoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            warn!("event=load status=fallback path={} reason={}", path.display(), err);
            let mut aside = path.as_os_str().to_owned();
            aside.push(".corrupt");
            if let Err(e) = fs::rename(path, &aside) {
                warn!("event=load status=set_aside_failed path={} reason={}", path.display(), e);
            }
            T::default()
        }
    }
}

// ============================================================================
// Data directory
// ============================================================================

pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(io_err(&dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    pub fn load_config(&self) -> Config {
        load_json::<Config>(&self.path(CONFIG_FILE)).sanitized()
    }

    pub fn save_config(&self, config: &Config) -> StoreResult<()> {
        save_json(&self.path(CONFIG_FILE), config)
    }

    pub fn load(&self) -> (Vec<Task>, Vec<TestResult>) {
        let tasks: Vec<Task> = load_json(&self.path(TASKS_FILE));
        let tests: Vec<TestResult> = load_json(&self.path(TESTS_FILE));
        info!("event=store_load status=ok tasks={} tests={}", tasks.len(), tests.len());
        (tasks, tests)
    }

    pub fn save(&self, tasks: &[Task], tests: &[TestResult]) -> StoreResult<()> {
        save_json(&self.path(TASKS_FILE), &tasks)?;
        save_json(&self.path(TESTS_FILE), &tests)
    }

    pub fn export_csv(&self, tasks: &[Task], reference: NaiveDate) -> StoreResult<PathBuf> {
        let path = self.path(CSV_FILE);
        fs::write(&path, history_csv(tasks, reference)).map_err(io_err(&path))?;
        info!("event=csv_export status=ok path={}", path.display());
        Ok(path)
    }
}

// ============================================================================
// Snapshot blob
// ============================================================================

pub fn read_snapshot(path: &Path) -> StoreResult<Snapshot> {
    let snapshot: Snapshot = read_json(path)?;
    info!(
        "event=snapshot_import status=ok tasks={} tests={} updated_at={}",
        snapshot.tasks.len(),
        snapshot.tests.len(),
        snapshot.updated_at
    );
    Ok(snapshot)
}

pub fn write_snapshot(path: &Path, tasks: &[Task], tests: &[TestResult], updated_at: i64) -> StoreResult<()> {
    let snapshot = Snapshot { tasks: tasks.to_vec(), tests: tests.to_vec(), updated_at };
    save_json(path, &snapshot)?;
    info!("event=snapshot_export status=ok path={}", path.display());
    Ok(())
}

// ============================================================================
// CSV
// ============================================================================

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One row per history entry; dates resolved against `reference` when readable.
pub fn history_csv(tasks: &[Task], reference: NaiveDate) -> String {
    let mut csv = String::from("Date,Unit,Subject,Category,Title,Minutes,Memo\n");
    for task in tasks {
        for h in &task.history {
            let date = resolve_entry_date(&h.date, reference)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| h.date.clone());
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                date,
                csv_field(&task.unit),
                task.subject.to_str(),
                csv_field(&task.category),
                csv_field(&task.title),
                h.duration / 60,
                csv_field(&h.memo)
            ));
        }
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HistoryEntry;
    use crate::subject::Subject;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
    }

    fn sample_task() -> Task {
        let mut t = Task::new("Unit 3", Subject::Math, "Workbook", "Drill, part 2", reference());
        t.history.push(HistoryEntry { id: "h1".into(), date: "12/30".into(), duration: 1500, memo: "said \"hard\"".into() });
        t
    }

    #[test]
    fn save_then_load_working_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data")).unwrap();
        let task = sample_task();
        store.save(std::slice::from_ref(&task), &[]).unwrap();

        let (tasks, tests) = store.load();
        assert_eq!(tasks, vec![task]);
        assert!(tests.is_empty());
    }

    #[test]
    fn missing_files_load_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let (tasks, tests) = store.load();
        assert!(tasks.is_empty() && tests.is_empty());
        assert_eq!(store.load_config(), Config::default());
    }

    #[test]
    fn malformed_file_is_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        fs::write(store.path(TASKS_FILE), "{not json").unwrap();

        let (tasks, _) = store.load();
        assert!(tasks.is_empty());
        assert!(!store.path(TASKS_FILE).exists());
        assert!(store.path("tasks.json.corrupt").exists());
    }

    #[test]
    fn snapshot_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.json");
        write_snapshot(&path, &[sample_task()], &[], 1_700_000_000_000).unwrap();

        let snap = read_snapshot(&path).unwrap();
        assert_eq!(snap.tasks.len(), 1);
        assert_eq!(snap.updated_at, 1_700_000_000_000);
    }

    #[test]
    fn reading_missing_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_snapshot(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn csv_quotes_and_resolves_dates() {
        let csv = history_csv(&[sample_task()], reference());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2025-12-30,Unit 3,math,Workbook,\"Drill, part 2\",25,\"said \"\"hard\"\"\"");
    }

    #[test]
    fn hand_edited_range_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        fs::write(store.path(CONFIG_FILE), r#"{"range_days": 65536}"#).unwrap();
        assert_eq!(store.load_config().range_days, crate::config::MAX_RANGE_DAYS);
    }
}
