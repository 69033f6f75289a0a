//! Scoring module - line-clear points, levels and gravity speed
//!
//! - A clear of 1-4 lines scores 100/300/500/800 times the level that was in
//!   effect before the clear.
//! - Level starts at 1 and rises by one every 10 cumulative lines.
//! - Gravity starts at 1000ms per row and speeds up by 50ms per level, never
//!   dropping below 100ms.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, LINES_PER_LEVEL, LINE_SCORES,
};

/// Points for clearing `lines` rows at once while at `level`.
///
/// Returns 0 for a count outside 1..=4.
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Level reached after `total_lines` cumulative cleared lines
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity interval (milliseconds per row) at `level`
pub fn drop_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(speedup)
        .max(DROP_INTERVAL_MIN_MS)
}
