use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::model::Task;
use crate::subject::{ALL_SUBJECTS, Subject};

pub struct Preset {
    pub category: &'static str,
    pub items: &'static [&'static str],
}

const MATH_PRESETS: &[Preset] = &[
    Preset { category: "Course Book", items: &["Examples", "Basic Problems", "Practice Problems"] },
    Preset { category: "Workbook", items: &["Basic Problems", "Practice Problems", "Training", "Applied Drills"] },
    Preset { category: "Arithmetic", items: &["No.1", "No.2", "No.3", "No.4", "No.5", "No.6", "No.7"] },
    Preset { category: "Handouts", items: &["Mini Test Standard", "Mini Test Advance", "Foundations Sheet"] },
];

const JAPANESE_PRESETS: &[Preset] = &[
    Preset { category: "Course Book", items: &["Basic Problems", "Advanced Problems", "Language Skills"] },
    Preset { category: "Kanji & Words", items: &["Kanji Practice", "Kanji Check", "Vocabulary"] },
    Preset { category: "Workbook", items: &["Workbook"] },
    Preset { category: "Handouts", items: &["Kanji", "Vocabulary"] },
];

const SCIENCE_PRESETS: &[Preset] = &[
    Preset { category: "Course Book", items: &["Key Points"] },
    Preset { category: "Workbook", items: &["Summary", "Practice Problems", "Advanced Problems"] },
    Preset { category: "Drill Book", items: &["Training", "Basic Problems", "Practice Problems"] },
    Preset { category: "Handouts", items: &["Check Test", "Fill-in Summary", "Summary Sheet"] },
];

const SOCIAL_PRESETS: &[Preset] = &[
    Preset { category: "Course Book", items: &["Key Points"] },
    Preset { category: "Workbook", items: &["Summary", "Practice Problems", "Advanced Problems"] },
    Preset { category: "Drill Book", items: &["Training", "Basic Problems", "Practice Problems"] },
    Preset { category: "Handouts", items: &["Check Test", "Jump-up Problems"] },
];

pub fn presets(subject: Subject) -> &'static [Preset] {
    match subject {
        Subject::Math => MATH_PRESETS,
        Subject::Japanese => JAPANESE_PRESETS,
        Subject::Science => SCIENCE_PRESETS,
        Subject::Social => SOCIAL_PRESETS,
    }
}

pub fn unit_name(number: u32) -> String {
    format!("Unit {}", number)
}

/// Leading digits found in a unit name, or 0.
pub fn unit_number(unit: &str) -> u32 {
    unit.chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// A fresh not-started task for every preset item of every subject.
pub fn generate_unit(number: u32, today: NaiveDate) -> Vec<Task> {
    let unit = unit_name(number);
    ALL_SUBJECTS
        .iter()
        .flat_map(|&subject| {
            presets(subject).iter().flat_map(move |p| p.items.iter().map(move |item| (subject, p.category, *item)))
        })
        .map(|(subject, category, title)| Task::new(&unit, subject, category, title, today))
        .collect()
}

/// Distinct units, highest number first.
pub fn sorted_units(tasks: &[Task]) -> Vec<String> {
    let unique: BTreeSet<&str> = tasks.iter().map(|t| t.unit.as_str()).collect();
    let mut units: Vec<String> = unique.into_iter().map(String::from).collect();
    units.sort_by_key(|u| std::cmp::Reverse(unit_number(u)));
    units
}
