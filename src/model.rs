//! Task log and test-result records, plus the snapshot blob they travel in.
//!
//! Every collection field deserializes leniently: a missing or non-array
//! `history`/`tasks`/`tests` becomes empty, an element that cannot be decoded
//! is skipped on its own with a warning, and a missing or non-numeric
//! timestamp becomes 0, so the aggregation code never sees partial records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::subject::Subject;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// "M/D" label used by history entries and chart rows.
pub fn month_day(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::NotStarted,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::NotStarted => "○",
            Self::InProgress => "◐",
            Self::Completed => "●",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: u64,
    #[serde(default)]
    pub memo: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub unit: String,
    pub subject: Subject,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub material_name: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub current_duration: u64,
    #[serde(default)]
    pub current_memo: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub created_at: String,
}

impl Task {
    pub fn new(unit: &str, subject: Subject, category: &str, title: &str, created_at: NaiveDate) -> Self {
        Self {
            id: new_id(),
            unit: unit.into(),
            subject,
            category: category.into(),
            title: title.into(),
            material_name: format!("{} - {}", category, title),
            status: TaskStatus::NotStarted,
            current_duration: 0,
            current_memo: String::new(),
            history: Vec::new(),
            created_at: month_day(created_at),
        }
    }

    pub fn history_seconds(&self) -> u64 {
        self.history.iter().map(|h| h.duration).sum()
    }

    pub fn cycle_status(&mut self) {
        self.status = self.status.next();
    }

    /// Folds the uncommitted timer value into a new history entry dated `today`.
    ///
    /// Returns `None` and leaves the task untouched when there is nothing to commit.
    pub fn commit_session(&mut self, today: NaiveDate) -> Option<&HistoryEntry> {
        if self.current_duration == 0 {
            return None;
        }

        self.history.push(HistoryEntry {
            id: new_id(),
            date: month_day(today),
            duration: self.current_duration,
            memo: std::mem::take(&mut self.current_memo),
        });
        self.current_duration = 0;
        self.history.last()
    }
}

// ============================================================================
// Test results
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum TestKind {
    Curriculum,
    Kumiwake,
    Hantei,
    Other(String),
}

impl TestKind {
    pub const KNOWN: [TestKind; 3] = [TestKind::Curriculum, TestKind::Kumiwake, TestKind::Hantei];

    pub fn label(&self) -> &str {
        match self {
            Self::Curriculum => "Curriculum",
            Self::Kumiwake => "Placement",
            Self::Hantei => "Mock Judge",
            Self::Other(s) => s,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Self::Curriculum => "curriculum",
            Self::Kumiwake => "kumiwake",
            Self::Hantei => "hantei",
            Self::Other(s) => s,
        }
    }
}

/// A record without a type keeps an empty one rather than guessing.
impl Default for TestKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for TestKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "curriculum" => Self::Curriculum,
            "kumiwake" => Self::Kumiwake,
            "hantei" => Self::Hantei,
            _ => Self::Other(s),
        }
    }
}

impl From<TestKind> for String {
    fn from(kind: TestKind) -> Self {
        kind.to_str().to_string()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ScoreLine {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub avg: f64,
    #[serde(default)]
    pub dev: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct SubjectScores {
    #[serde(default)]
    pub math: ScoreLine,
    #[serde(default)]
    pub japanese: ScoreLine,
    #[serde(default)]
    pub science: ScoreLine,
    #[serde(default)]
    pub social: ScoreLine,
}

impl SubjectScores {
    pub fn get(&self, subject: Subject) -> &ScoreLine {
        match subject {
            Subject::Math => &self.math,
            Subject::Japanese => &self.japanese,
            Subject::Science => &self.science,
            Subject::Social => &self.social,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TestResult {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: TestKind,
    #[serde(default)]
    pub subjects: SubjectScores,
    #[serde(default)]
    pub total4: ScoreLine,
}

// ============================================================================
// Snapshot blob
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tests: Vec<TestResult>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub updated_at: i64,
}

// ============================================================================
// Lenient field decoders
// ============================================================================

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match T::deserialize(item) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("event=coerce field=array_item index={} status=dropped reason={}", idx, err);
                None
            }
        })
        .collect())
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        _ => 0,
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    })
}
