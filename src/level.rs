use once_cell::sync::Lazy;

pub const LEVEL_COUNT: usize = 100;
const BASE_THRESHOLD: f64 = 100.0;
const GROWTH: f64 = 1.2;
const FALLBACK_NEXT_XP: u64 = 100;

/// Minutes needed to clear each level, `floor(100 * 1.2^i)`.
pub static LEVEL_THRESHOLDS: Lazy<Vec<u64>> = Lazy::new(|| {
    (0..LEVEL_COUNT)
        .map(|i| (BASE_THRESHOLD * GROWTH.powi(i as i32)).floor() as u64)
        .collect()
});

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelState {
    pub level: u32,
    /// XP carried into the current level; fractional because minutes are.
    pub current_xp: f64,
    pub next_level_xp: u64,
}

impl LevelState {
    pub fn progress_percent(&self) -> f64 {
        (self.current_xp / self.next_level_xp as f64 * 100.0).min(100.0)
    }

    pub fn display_xp(&self) -> u64 {
        self.current_xp.floor() as u64
    }
}

/// One minute of study is one XP point.
pub fn calculate_level(total_minutes: f64) -> LevelState {
    let mut level: u32 = 1;
    let mut xp = total_minutes.max(0.0);

    for (i, &threshold) in LEVEL_THRESHOLDS.iter().enumerate() {
        if xp >= threshold as f64 {
            level = i as u32 + 2;
            xp -= threshold as f64;
        } else {
            break;
        }
    }

    // Index `level - 2` is the threshold just consumed; level 1 has none.
    let next_level_xp = (level as usize)
        .checked_sub(2)
        .and_then(|i| LEVEL_THRESHOLDS.get(i).copied())
        .unwrap_or(FALLBACK_NEXT_XP);

    LevelState { level, current_xp: xp, next_level_xp }
}
