//! Date-bucketed projections of the history log for the achievements view.
//!
//! History dates are stored as "M/D" with no year. They are resolved against
//! an explicit reference date: the reference year, or the year before when the
//! reference falls in January to March and the entry month is October or
//! later. Nothing here reads the wall clock.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use log::debug;

use crate::model::{Task, month_day};
use crate::subject::{ALL_SUBJECTS, Subject};

// ============================================================================
// Dates
// ============================================================================

pub fn resolve_entry_date(raw: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let (m, d) = raw.trim().split_once('/')?;
    let month: u32 = m.trim().parse().ok()?;
    let day: u32 = d.trim().parse().ok()?;

    let mut year = reference.year();
    if reference.month() <= 3 && month > 9 {
        year -= 1;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Inclusive calendar window; the whole of `end` is covered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// `reference - days ..= reference`, the shape of the 1w/2w/1m presets.
    pub fn last_days(reference: NaiveDate, days: u64) -> Self {
        let start = reference.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
        Self { start, end: reference }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    pub fn len_days(&self) -> usize {
        if self.start > self.end { 0 } else { (self.end - self.start).num_days() as usize + 1 }
    }
}

// ============================================================================
// Projection
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayRow {
    pub date: NaiveDate,
    pub label: String,
    /// Indexed by `Subject::index`; unselected subjects stay zero.
    pub minutes: [u64; 4],
    pub total: u64,
}

impl DayRow {
    pub fn subject_minutes(&self, subject: Subject) -> u64 {
        self.minutes[subject.index()]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectRatio {
    pub subject: Subject,
    pub label: &'static str,
    pub minutes: u64,
    pub percent: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestDay {
    pub minutes: u64,
    pub date: NaiveDate,
    pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Projection {
    pub rows: Vec<DayRow>,
    pub ratios: Vec<SubjectRatio>,
    pub best_day: Option<BestDay>,
    pub best_by_subject: Vec<(Subject, BestDay)>,
}

impl Projection {
    pub fn total_minutes(&self) -> u64 {
        self.rows.iter().map(|r| r.total).sum()
    }

    pub fn best_for(&self, subject: Subject) -> Option<&BestDay> {
        self.best_by_subject.iter().find(|(s, _)| *s == subject).map(|(_, b)| b)
    }
}

pub fn project(tasks: &[Task], range: DateRange, selected: &[Subject], reference: NaiveDate) -> Projection {
    let mut buckets: BTreeMap<NaiveDate, [u64; 4]> = BTreeMap::new();
    let mut unreadable = 0usize;

    for task in tasks.iter().filter(|t| selected.contains(&t.subject)) {
        for entry in &task.history {
            let Some(date) = resolve_entry_date(&entry.date, reference) else {
                unreadable += 1;
                continue;
            };
            if range.contains(date) {
                buckets.entry(date).or_default()[task.subject.index()] += entry.duration / 60;
            }
        }
    }

    if unreadable > 0 {
        debug!("event=chart_project status=skipped unreadable_dates={}", unreadable);
    }

    let rows: Vec<DayRow> = range
        .days()
        .map(|date| {
            let minutes = buckets.get(&date).copied().unwrap_or_default();
            DayRow { date, label: month_day(date), minutes, total: minutes.iter().sum() }
        })
        .collect();

    let ratios = subject_ratios(&rows, selected);
    let best_day = best_by(&rows, |r| r.total);
    let best_by_subject = ALL_SUBJECTS
        .iter()
        .filter(|s| selected.contains(s))
        .filter_map(|&s| best_by(&rows, |r| r.subject_minutes(s)).map(|b| (s, b)))
        .collect();

    Projection { rows, ratios, best_day, best_by_subject }
}

fn subject_ratios(rows: &[DayRow], selected: &[Subject]) -> Vec<SubjectRatio> {
    let mut totals = [0u64; 4];
    for row in rows {
        for (acc, m) in totals.iter_mut().zip(row.minutes) {
            *acc += m;
        }
    }

    let grand: u64 = ALL_SUBJECTS.iter().filter(|s| selected.contains(s)).map(|s| totals[s.index()]).sum();

    ALL_SUBJECTS
        .iter()
        .filter(|s| selected.contains(s) && totals[s.index()] > 0)
        .map(|&s| {
            let minutes = totals[s.index()];
            SubjectRatio {
                subject: s,
                label: s.label(),
                minutes,
                percent: (minutes as f64 / grand as f64 * 100.0).round() as u64,
            }
        })
        .collect()
}

// Strictly greater, so the earliest day keeps a tie.
fn best_by(rows: &[DayRow], value: impl Fn(&DayRow) -> u64) -> Option<BestDay> {
    let mut best: Option<BestDay> = None;
    for row in rows {
        let minutes = value(row);
        if minutes > best.as_ref().map_or(0, |b| b.minutes) {
            best = Some(BestDay { minutes, date: row.date, label: row.label.clone() });
        }
    }
    best
}
