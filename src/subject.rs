use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Japanese,
    Science,
    Social,
}

/// Display metadata for one subject.
pub struct SubjectInfo {
    pub label: &'static str,
    pub short: &'static str,
    pub hex: &'static str,
    pub color: Color,
}

pub const ALL_SUBJECTS: [Subject; 4] = [Subject::Math, Subject::Japanese, Subject::Science, Subject::Social];

const MATH: SubjectInfo = SubjectInfo { label: "Math", short: "Ma", hex: "#2563eb", color: Color::Rgb(37, 99, 235) };
const JAPANESE: SubjectInfo = SubjectInfo { label: "Japanese", short: "Ja", hex: "#e11d48", color: Color::Rgb(225, 29, 72) };
const SCIENCE: SubjectInfo = SubjectInfo { label: "Science", short: "Sc", hex: "#d97706", color: Color::Rgb(217, 119, 6) };
const SOCIAL: SubjectInfo = SubjectInfo { label: "Social", short: "So", hex: "#059669", color: Color::Rgb(5, 150, 105) };

impl Subject {
    pub fn info(self) -> &'static SubjectInfo {
        match self {
            Self::Math => &MATH,
            Self::Japanese => &JAPANESE,
            Self::Science => &SCIENCE,
            Self::Social => &SOCIAL,
        }
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn short(self) -> &'static str {
        self.info().short
    }

    pub fn color(self) -> Color {
        self.info().color
    }

    /// Position in `ALL_SUBJECTS`, used to index per-subject arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Math => 0,
            Self::Japanese => 1,
            Self::Science => 2,
            Self::Social => 3,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Japanese => "japanese",
            Self::Science => "science",
            Self::Social => "social",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "math" => Some(Self::Math),
            "japanese" => Some(Self::Japanese),
            "science" => Some(Self::Science),
            "social" => Some(Self::Social),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_table_order() {
        for (i, s) in ALL_SUBJECTS.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn string_names_round_trip_through_parser() {
        for s in ALL_SUBJECTS {
            assert_eq!(Subject::from_str(s.to_str()), Some(s));
        }
        assert_eq!(Subject::from_str(" Math "), Some(Subject::Math));
        assert_eq!(Subject::from_str("music"), None);
    }

    #[test]
    fn serializes_as_lowercase() {
        assert_eq!(serde_json::to_string(&Subject::Japanese).unwrap(), "\"japanese\"");
    }
}
