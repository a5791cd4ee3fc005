use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::{ScoreLine, SubjectScores, TestKind, TestResult, new_id};
use crate::subject::Subject;

pub const STRONG_DEVIATION: f64 = 60.0;
pub const MEAN_DEVIATION: f64 = 50.0;

/// Which score line a trend series follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendLine {
    Total4,
    Subject(Subject),
}

impl TrendLine {
    pub fn label(self) -> &'static str {
        match self {
            Self::Total4 => "4 Subjects",
            Self::Subject(s) => s.label(),
        }
    }

    pub fn line(self, test: &TestResult) -> &ScoreLine {
        match self {
            Self::Total4 => &test.total4,
            Self::Subject(s) => test.subjects.get(s),
        }
    }
}

pub fn parse_test_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y/%m/%d")
        .or_else(|_| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d"))
        .ok()
}

fn by_date(a: &TestResult, b: &TestResult) -> Ordering {
    match (parse_test_date(&a.date), parse_test_date(&b.date)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.date.cmp(&b.date),
    }
}

pub fn matches_filter(test: &TestResult, filter: Option<&TestKind>) -> bool {
    filter.is_none_or(|k| &test.kind == k)
}

/// Chart order: oldest first, restricted to `filter` when given.
pub fn sorted_oldest_first<'a>(tests: &'a [TestResult], filter: Option<&TestKind>) -> Vec<&'a TestResult> {
    let mut out: Vec<&TestResult> = tests.iter().filter(|t| matches_filter(t, filter)).collect();
    out.sort_by(|a, b| by_date(a, b));
    out
}

/// Table order: newest first, every kind.
pub fn sorted_newest_first(tests: &[TestResult]) -> Vec<&TestResult> {
    let mut out: Vec<&TestResult> = tests.iter().collect();
    out.sort_by(|a, b| by_date(b, a));
    out
}

/// `(position, deviation)` points in chart order.
pub fn deviation_series(tests: &[TestResult], filter: Option<&TestKind>, line: TrendLine) -> Vec<(f64, f64)> {
    sorted_oldest_first(tests, filter)
        .into_iter()
        .enumerate()
        .map(|(i, t)| (i as f64, line.line(t).dev))
        .collect()
}

pub fn is_strong(dev: f64) -> bool {
    dev >= STRONG_DEVIATION
}

fn parse_score(raw: &str) -> Result<ScoreLine, String> {
    let nums = raw
        .split('/')
        .map(|p| p.trim().parse::<f64>().map_err(|_| format!("`{}` is not a number", p.trim())))
        .collect::<Result<Vec<f64>, String>>()?;
    match nums[..] {
        [dev] => Ok(ScoreLine { dev, ..ScoreLine::default() }),
        [score, avg, dev] => Ok(ScoreLine { score, avg, dev, rank: None }),
        _ => Err(format!("score `{}` must be `dev` or `score/avg/dev`", raw.trim())),
    }
}

/// Parses `date | name | kind | 4-subject | math | japanese | science | social`,
/// where each score is `dev` or `score/avg/dev`.
pub fn parse_test_entry(input: &str) -> Result<TestResult, String> {
    let fields: Vec<&str> = input.split('|').map(str::trim).collect();
    let [date, name, kind, total4, math, japanese, science, social] = fields[..] else {
        return Err(format!("expected 8 `|`-separated fields, got {}", fields.len()));
    };
    let date = parse_test_date(date).ok_or_else(|| format!("invalid date `{}`", date))?;
    if name.is_empty() {
        return Err("test name is empty".into());
    }

    Ok(TestResult {
        id: new_id(),
        date: date.format("%Y/%m/%d").to_string(),
        name: name.to_string(),
        kind: TestKind::from(kind.to_lowercase()),
        subjects: SubjectScores {
            math: parse_score(math)?,
            japanese: parse_score(japanese)?,
            science: parse_score(science)?,
            social: parse_score(social)?,
        },
        total4: parse_score(total4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(id: &str, date: &str, kind: TestKind, total_dev: f64, math_dev: f64) -> TestResult {
        TestResult {
            id: id.into(),
            date: date.into(),
            name: id.into(),
            kind,
            subjects: SubjectScores {
                math: ScoreLine { dev: math_dev, ..Default::default() },
                ..Default::default()
            },
            total4: ScoreLine { dev: total_dev, rank: Some("1/10".into()), ..Default::default() },
        }
    }

    fn sample() -> Vec<TestResult> {
        vec![
            test("b", "2025/11/22", TestKind::Curriculum, 50.6, 44.8),
            test("c", "2025/11/09", TestKind::Kumiwake, 53.4, 48.1),
            test("a", "2025/12/06", TestKind::Curriculum, 44.2, 42.2),
        ]
    }

    #[test]
    fn table_order_is_newest_first() {
        let tests = sample();
        let ids: Vec<&str> = sorted_newest_first(&tests).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn filtered_series_is_oldest_first() {
        let tests = sample();
        let series = deviation_series(&tests, Some(&TestKind::Curriculum), TrendLine::Total4);
        assert_eq!(series, vec![(0.0, 50.6), (1.0, 44.2)]);

        let math = deviation_series(&tests, None, TrendLine::Subject(Subject::Math));
        assert_eq!(math, vec![(0.0, 48.1), (1.0, 44.8), (2.0, 42.2)]);
    }

    #[test]
    fn dates_parse_with_either_separator() {
        assert_eq!(parse_test_date("2025/02/15"), NaiveDate::from_ymd_opt(2025, 2, 15));
        assert_eq!(parse_test_date("2025-02-15"), NaiveDate::from_ymd_opt(2025, 2, 15));
        assert_eq!(parse_test_date("Feb 15"), None);
    }

    #[test]
    fn strong_threshold_is_inclusive() {
        assert!(is_strong(60.0));
        assert!(!is_strong(59.9));
    }

    #[test]
    fn entry_accepts_dev_or_full_scores() {
        let t = parse_test_entry("2026-01-10 | Round 5 | kumiwake | 120/100/55.5 | 58 | 47.2 | 61 | 50").unwrap();
        assert_eq!(t.date, "2026/01/10");
        assert_eq!(t.kind, TestKind::Kumiwake);
        assert_eq!(t.total4, ScoreLine { score: 120.0, avg: 100.0, dev: 55.5, rank: None });
        assert_eq!(t.subjects.science.dev, 61.0);
        assert_eq!(t.subjects.math.score, 0.0);
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert!(parse_test_entry("2026/01/10 | Round 5 | curriculum").is_err());
        assert!(parse_test_entry("someday | Round 5 | curriculum | 50 | 50 | 50 | 50 | 50").is_err());
        assert!(parse_test_entry("2026/01/10 | Round 5 | curriculum | 50 | x | 50 | 50 | 50").is_err());
        assert!(parse_test_entry("2026/01/10 | Round 5 | curriculum | 1/2 | 50 | 50 | 50 | 50").is_err());
    }
}
