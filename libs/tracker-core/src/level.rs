//! XP and level curve.

/// XP required to advance from `level` to `level + 1`.
///
/// The curve is `round(100 * level^1.5)`, cumulative across levels.
pub fn xp_for_level(level: u32) -> u32 {
    (100.0 * (level as f64).powf(1.5)).round() as u32
}

/// Level derived from a total-XP value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelInfo {
    pub level: u32,
    /// XP accumulated inside the current level.
    pub current_level_xp: u32,
    /// XP required to finish the current level.
    pub xp_for_next_level: u32,
    /// `current_level_xp / xp_for_next_level`, in `[0, 1)`.
    pub progress: f64,
}

/// Walk levels from 1 upward, accumulating each level's requirement until
/// the next one would exceed `total_xp`.
pub fn level_from_total_xp(total_xp: u32) -> LevelInfo {
    let mut level = 1;
    let mut cumulative = 0u32;
    loop {
        let needed = xp_for_level(level);
        if cumulative + needed > total_xp {
            break;
        }
        cumulative += needed;
        level += 1;
    }
    let current_level_xp = total_xp - cumulative;
    let xp_for_next_level = xp_for_level(level);
    LevelInfo {
        level,
        current_level_xp,
        xp_for_next_level,
        progress: f64::from(current_level_xp) / f64::from(xp_for_next_level),
    }
}
