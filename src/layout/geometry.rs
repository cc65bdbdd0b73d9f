//! Pixel geometry helpers for the layout reassembler.

use crate::config::LayoutConfig;
use crate::model::{BBox, Line};

/// Mean line height of a page, recomputed per page so scan-resolution
/// drift across a book does not skew gap thresholds.
pub fn mean_line_height(lines: &[&Line]) -> f32 {
    if lines.is_empty() {
        return 0.0;
    }
    let total: i32 = lines.iter().map(|l| l.bbox.height()).sum();
    total as f32 / lines.len() as f32
}

/// Vertical gap from the bottom edge of `prev` to the top edge of `next`.
pub fn vertical_gap(prev: &BBox, next: &BBox) -> i32 {
    next.y1 - prev.y2
}

/// Whether a box sits in the definition column window, optionally widened
/// by `tolerance` pixels on each boundary (used for the one-line lookahead).
pub fn in_definition_window(config: &LayoutConfig, bbox: &BBox, tolerance: i32) -> bool {
    let left_ok = bbox.x1 >= config.definition_left_min - tolerance
        && bbox.x1 <= config.definition_left_max + tolerance;
    let right_ok = bbox.x2 >= config.definition_right_min - tolerance
        && bbox.x2 <= config.definition_right_max + tolerance;
    left_ok && right_ok
}

/// Whether a left edge falls in the paragraph-indent range.
pub fn in_indent_range(config: &LayoutConfig, x1: i32) -> bool {
    x1 >= config.paragraph_indent_min && x1 <= config.paragraph_indent_max
}

/// Gap above which a spacer is emitted around a definition block:
/// the configured absolute floor or the mean-height multiple, whichever
/// is larger.
pub fn definition_gap_limit(config: &LayoutConfig, avg_line_height: f32) -> f32 {
    (config.definition_gap_min as f32).max(config.definition_gap_threshold * avg_line_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_line_height() {
        let a = Line::new(1, 0, "a", BBox::new(0, 0, 10, 40));
        let b = Line::new(1, 1, "b", BBox::new(0, 50, 10, 110));
        let lines = vec![&a, &b];
        assert_eq!(mean_line_height(&lines), 50.0);
        assert_eq!(mean_line_height(&[]), 0.0);
    }

    #[test]
    fn test_definition_window() {
        let config = LayoutConfig::default();
        // Defaults: left [500, 600], right [3900, 3960].
        assert!(in_definition_window(&config, &BBox::new(550, 0, 3930, 40), 0));
        assert!(!in_definition_window(&config, &BBox::new(700, 0, 3930, 40), 0));
        assert!(!in_definition_window(&config, &BBox::new(550, 0, 3500, 40), 0));
    }

    #[test]
    fn test_definition_window_widened() {
        let config = LayoutConfig::default();
        let bbox = BBox::new(460, 0, 3990, 40);
        assert!(!in_definition_window(&config, &bbox, 0));
        assert!(in_definition_window(&config, &bbox, 50));
    }

    #[test]
    fn test_gap_limit_uses_floor() {
        let config = LayoutConfig::default();
        // 1.2 * 10 = 12 is below the 24px floor.
        assert_eq!(definition_gap_limit(&config, 10.0), 24.0);
        // 1.2 * 60 = 72 exceeds the floor.
        assert_eq!(definition_gap_limit(&config, 60.0), 72.0);
    }

    #[test]
    fn test_vertical_gap() {
        let prev = BBox::new(0, 100, 10, 160);
        let next = BBox::new(0, 220, 10, 280);
        assert_eq!(vertical_gap(&prev, &next), 60);
    }
}
