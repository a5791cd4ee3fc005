//! Study progress tracking: tasks and sessions per curriculum unit, turned into
//! levels, badges, daily charts and test trends.
//!
//! The engine modules (`aggregate`, `level`, `badges`, `chart`, `exams`) are
//! pure functions over the task and test logs. Persistence lives in `store`,
//! the terminal front end in `app` and `ui`.

pub mod aggregate;
pub mod app;
pub mod badges;
pub mod chart;
pub mod config;
pub mod curriculum;
pub mod exams;
pub mod level;
pub mod logging;
pub mod model;
pub mod stopwatch;
pub mod store;
pub mod subject;
pub mod ui;

pub use badges::{BADGES, Badge, unlocked_badges};
pub use chart::{DateRange, Projection, project};
pub use config::Config;
pub use level::{LevelState, calculate_level};
pub use model::{HistoryEntry, Snapshot, Task, TaskStatus, TestKind, TestResult};
pub use store::{Store, StoreError};
pub use subject::{ALL_SUBJECTS, Subject};
