//! Point values and scoring rules.
//!
//! Line-clear, combo, and T-spin points all scale with the current level;
//! drop points are flat per cell.

/// Points per cell of player-initiated soft drop.
pub const SOFT_DROP: u32 = 1;
/// Points per cell of hard drop.
pub const HARD_DROP: u32 = 2;

/// Points for clearing 1 line, × level.
pub const SINGLE: u32 = 100;
/// Points for clearing 2 lines, × level.
pub const DOUBLE: u32 = 300;
/// Points for clearing 3 lines, × level.
pub const TRIPLE: u32 = 500;
/// Points for clearing 4 lines, × level.
pub const TETRIS: u32 = 800;

/// Points per combo step beyond the first clearing lock, × level.
pub const COMBO: u32 = 50;

/// T-spin bonus by simultaneous lines cleared (0-3), × level. Replaces the
/// plain line-clear value when the lock qualifies as a T-spin.
pub const TSPIN: [u32; 4] = [400, 800, 1200, 1600];

/// Line-clear points for `lines` simultaneous rows at `level`.
#[must_use]
pub fn clear_lines_points(lines: usize, level: u32) -> u32 {
    let base = match lines {
        1 => SINGLE,
        2 => DOUBLE,
        3 => TRIPLE,
        4 => TETRIS,
        _ => 0,
    };
    base * level
}

/// T-spin points for `lines` simultaneous rows at `level`.
#[must_use]
pub fn tspin_points(lines: usize, level: u32) -> u32 {
    TSPIN.get(lines).copied().unwrap_or(0) * level
}

/// Combo bonus: the first clearing lock of a chain earns nothing extra.
#[must_use]
pub fn combo_points(combo: u32, level: u32) -> u32 {
    COMBO * combo.saturating_sub(1) * level
}

/// Back-to-back bonus multiplies the clear value by 1.5.
#[must_use]
pub fn back_to_back(points: u32) -> u32 {
    points * 3 / 2
}

/// A lock is "difficult" when it clears four rows or clears rows with a
/// T-spin; two difficult clears in a row enable the back-to-back bonus.
#[must_use]
pub fn is_difficult(lines: usize, tspin: bool) -> bool {
    lines == 4 || (tspin && lines > 0)
}
