use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::subject::{ALL_SUBJECTS, Subject};

pub const DEFAULT_RANGE_DAYS: u64 = 14;
pub const RANGE_PRESETS: [u64; 3] = [7, 14, 30];
pub const MAX_RANGE_DAYS: u64 = 365;
pub const THEMES: &[&str] = &["default", "nord", "dracula", "gruvbox", "solarized"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub range_days: u64,
    pub selected_subjects: Vec<Subject>,
    pub notifications_enabled: bool,
    pub sound_enabled: bool,
    pub theme: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            range_days: DEFAULT_RANGE_DAYS,
            selected_subjects: ALL_SUBJECTS.to_vec(),
            notifications_enabled: true,
            sound_enabled: false,
            theme: "default".into(),
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Pulls hand-edited values back into the supported range.
    pub fn sanitized(mut self) -> Self {
        self.range_days = self.range_days.clamp(1, MAX_RANGE_DAYS);
        self
    }
}

#[derive(Clone, Copy)]
pub struct Theme {
    pub level_color: Color,
    pub xp_color: Color,
    pub border_color: Color,
    pub accent_color: Color,
}

pub fn get_theme(name: &str) -> Theme {
    match name {
        "nord" => Theme {
            level_color: Color::Rgb(136, 192, 208),
            xp_color: Color::Rgb(235, 203, 139),
            border_color: Color::Rgb(129, 161, 193),
            accent_color: Color::Rgb(180, 142, 173),
        },
        "dracula" => Theme {
            level_color: Color::Rgb(189, 147, 249),
            xp_color: Color::Rgb(241, 250, 140),
            border_color: Color::Rgb(98, 114, 164),
            accent_color: Color::Rgb(255, 121, 198),
        },
        "gruvbox" => Theme {
            level_color: Color::Rgb(254, 128, 25),
            xp_color: Color::Rgb(250, 189, 47),
            border_color: Color::Rgb(213, 196, 161),
            accent_color: Color::Rgb(184, 187, 38),
        },
        "solarized" => Theme {
            level_color: Color::Rgb(42, 161, 152),
            xp_color: Color::Rgb(181, 137, 0),
            border_color: Color::Rgb(38, 139, 210),
            accent_color: Color::Rgb(211, 54, 130),
        },
        _ => Theme {
            level_color: Color::Rgb(129, 140, 248),
            xp_color: Color::Rgb(250, 204, 21),
            border_color: Color::Rgb(100, 116, 139),
            accent_color: Color::Rgb(37, 99, 235),
        },
    }
}

pub fn next_theme(current: &str, forward: bool) -> &'static str {
    let idx = THEMES.iter().position(|&t| t == current).unwrap_or(0);
    let new_idx = if forward {
        (idx + 1) % THEMES.len()
    } else if idx == 0 {
        THEMES.len() - 1
    } else {
        idx - 1
    };
    THEMES[new_idx]
}
