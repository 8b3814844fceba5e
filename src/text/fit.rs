//! Shrink-to-fit: choose a font size and wrapping that fit a box.
//!
//! ## Policy
//!
//! ```text
//! size = start
//! loop:
//!     wrap at box width
//!     if line_height * lines <= box height  → done
//!     size -= step   (stop below min)
//! fallback at min:
//!     keep max(1, box_height / line_height) lines
//!     trim last line until "line…" fits the width
//! ```
//!
//! A smaller but complete block is always preferred over truncation, and
//! truncation never goes below the minimum size.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::font::FontHandle;
use super::wrap::wrap;
use crate::resolve::FontResolver;

/// Tuning for the size search and truncation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitParams {
    /// Font size decrement per search step (pixels). Zero is treated as 1.
    pub step: u32,
    /// Smallest size tried; truncation happens at this size.
    pub min_size: u32,
    /// Marker appended to a truncated last line.
    pub ellipsis: String,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            step: 2,
            min_size: 12,
            ellipsis: "\u{2026}".to_string(),
        }
    }
}

/// Lines resolved for one field, ready for the box renderer.
#[derive(Debug, Clone)]
pub struct WrappedBlock {
    pub lines: Vec<String>,
    pub font: FontHandle,
    /// Height of each line (measured on the line sample).
    pub line_height: u32,
    /// True when lines were dropped and the last one ellipsized.
    pub truncated: bool,
}

impl WrappedBlock {
    /// Font size the block was laid out at.
    pub fn size(&self) -> u32 {
        self.font.size()
    }

    pub fn total_height(&self) -> u32 {
        self.line_height.saturating_mul(self.lines.len() as u32)
    }
}

/// Fit `text` into a `box_width` x `box_height` region.
///
/// Sizes are tried from `start_size` downwards in `params.step` decrements,
/// never below `params.min_size`. A `start_size` below the minimum is raised
/// to it.
pub fn fit(
    text: &str,
    box_width: u32,
    box_height: u32,
    family: &str,
    start_size: u32,
    params: &FitParams,
    fonts: &dyn FontResolver,
) -> WrappedBlock {
    let min_size = params.min_size.max(1);
    let step = params.step.max(1);
    let mut size = start_size.max(min_size);

    loop {
        let font = fonts.resolve(family, size);
        let lines = wrap(text, &font, box_width);
        let line_height = font.line_height();

        if line_height.saturating_mul(lines.len() as u32) <= box_height {
            debug!(size, lines = lines.len(), "fit");
            return WrappedBlock {
                lines,
                font,
                line_height,
                truncated: false,
            };
        }

        match size.checked_sub(step) {
            Some(next) if next >= min_size => size = next,
            _ => break,
        }
    }

    truncate_at(text, box_width, box_height, family, min_size, &params.ellipsis, fonts)
}

/// Last resort: lay out at `min_size` and cut the block to the box height.
fn truncate_at(
    text: &str,
    box_width: u32,
    box_height: u32,
    family: &str,
    min_size: u32,
    ellipsis: &str,
    fonts: &dyn FontResolver,
) -> WrappedBlock {
    let font = fonts.resolve(family, min_size);
    let mut lines = wrap(text, &font, box_width);
    let line_height = font.line_height();
    let max_lines = (box_height / line_height).max(1) as usize;

    // The step grid may skip min_size itself, which can still fit.
    if lines.len() <= max_lines {
        debug!(size = min_size, lines = lines.len(), "fit at minimum");
        return WrappedBlock {
            lines,
            font,
            line_height,
            truncated: false,
        };
    }

    lines.truncate(max_lines);
    let mut kept = lines.pop().unwrap_or_default();
    let last = loop {
        let candidate = format!("{}{}", kept, ellipsis);
        if kept.is_empty() || font.measure(&candidate).0 <= box_width {
            break candidate;
        }
        kept.pop();
        let trimmed = kept.trim_end().len();
        kept.truncate(trimmed);
    };
    lines.push(last);

    debug!(size = min_size, lines = lines.len(), "fit truncated");
    WrappedBlock {
        lines,
        font,
        line_height,
        truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::BuiltinFonts;
    use pretty_assertions::assert_eq;

    fn params(min_size: u32) -> FitParams {
        FitParams {
            min_size,
            ..FitParams::default()
        }
    }

    #[test]
    fn test_fits_at_start_size() {
        let block = fit("Name - Asha Rao", 1120, 140, "any", 60, &params(12), &BuiltinFonts);
        assert_eq!(block.size(), 60);
        assert_eq!(block.lines, vec!["Name - Asha Rao"]);
        assert!(!block.truncated);
    }

    #[test]
    fn test_shrinks_until_fit() {
        // At 36 the text needs two 36px lines (72 > 60); at 34 it is one line of 289px.
        let block = fit("Hello World Again", 300, 60, "any", 60, &params(12), &BuiltinFonts);
        assert_eq!(block.size(), 34);
        assert_eq!(block.lines, vec!["Hello World Again"]);
        assert!(block.total_height() <= 60);
    }

    #[test]
    fn test_prefers_smaller_complete_block_over_truncation() {
        let block = fit("aaaa bbbb cccc dddd", 100, 40, "any", 40, &params(12), &BuiltinFonts);
        assert!(!block.truncated);
        assert_eq!(block.lines.join(" "), "aaaa bbbb cccc dddd");
        assert!(block.total_height() <= 40);
    }

    #[test]
    fn test_truncates_at_minimum() {
        // Size 20: 10px cells, 20px lines, one line fits.
        let block = fit("aaaa bbbb cccc dddd", 100, 20, "any", 20, &params(20), &BuiltinFonts);
        assert!(block.truncated);
        assert_eq!(block.size(), 20);
        assert_eq!(block.lines, vec!["aaaa bbbb\u{2026}"]);
        assert!(block.font.measure(&block.lines[0]).0 <= 100);
    }

    #[test]
    fn test_truncation_trims_characters() {
        let block = fit("aaaa bbbb cccc dddd", 45, 20, "any", 20, &params(20), &BuiltinFonts);
        assert!(block.truncated);
        assert_eq!(block.lines, vec!["aaa\u{2026}"]);
    }

    #[test]
    fn test_truncation_keeps_max_lines() {
        let block = fit("aaaa bbbb cccc dddd eeee", 50, 45, "any", 20, &params(20), &BuiltinFonts);
        assert!(block.truncated);
        assert_eq!(block.lines.len(), 2);
        assert_eq!(block.lines[0], "aaaa");
        assert!(block.lines[1].ends_with('\u{2026}'));
        assert!(block.total_height() <= 45);
    }

    #[test]
    fn test_ellipsis_only_when_nothing_fits() {
        let block = fit("abcdef ghijkl", 5, 20, "any", 20, &params(20), &BuiltinFonts);
        assert!(block.truncated);
        assert_eq!(block.lines, vec!["\u{2026}"]);
    }

    #[test]
    fn test_box_shorter_than_one_line_keeps_one_line() {
        let block = fit("one two three", 1000, 5, "any", 20, &params(20), &BuiltinFonts);
        assert_eq!(block.lines, vec!["one two three"]);
        assert!(!block.truncated);
    }

    #[test]
    fn test_minimum_off_step_grid_still_fits() {
        // 21, 19, 17, 15, 13 are tried, then 12 at the fallback.
        let text = "aaaa aaaa";
        let block = fit(text, 54, 12, "any", 21, &params(12), &BuiltinFonts);
        assert_eq!(block.size(), 12);
        assert!(!block.truncated);
        assert_eq!(block.lines, vec!["aaaa aaaa"]);
    }

    #[test]
    fn test_start_below_minimum_is_raised() {
        let block = fit("x", 100, 100, "any", 4, &params(12), &BuiltinFonts);
        assert_eq!(block.size(), 12);
    }

    #[test]
    fn test_zero_step_does_not_hang() {
        let p = FitParams {
            step: 0,
            min_size: 10,
            ..FitParams::default()
        };
        let block = fit("some words here", 40, 10, "any", 14, &p, &BuiltinFonts);
        assert!(block.size() >= 10);
    }

    #[test]
    fn test_empty_text() {
        let block = fit("", 100, 50, "any", 30, &params(12), &BuiltinFonts);
        assert_eq!(block.lines, vec![String::new()]);
        assert_eq!(block.size(), 30);
    }

    #[test]
    fn test_height_never_exceeds_box() {
        let text = "Punjab National Bank Connaught Place New Delhi Main Branch";
        let p = params(12);
        let min_line = BuiltinFonts.resolve("any", 12).line_height();
        for width in [40, 90, 200, 480, 960] {
            for height in [min_line, 30, 55, 80, 140] {
                let block = fit(text, width, height, "any", 60, &p, &BuiltinFonts);
                assert!(
                    block.total_height() <= height,
                    "{}x{} gave height {}",
                    width,
                    height,
                    block.total_height()
                );
            }
        }
    }

    #[test]
    fn test_monotonic_in_box_size() {
        let text = "Amount - \u{20b9}12,34,56,789 outstanding";
        let p = params(12);
        let sizes = [20u32, 45, 70, 110, 180, 300, 640, 1120];
        for (i, &w) in sizes.iter().enumerate() {
            for &h in &sizes[..=i.min(5)] {
                let base = fit(text, w, h, "any", 60, &p, &BuiltinFonts).size();
                let wider = fit(text, w * 2, h, "any", 60, &p, &BuiltinFonts).size();
                let taller = fit(text, w, h * 2, "any", 60, &p, &BuiltinFonts).size();
                assert!(wider >= base, "wider {}x{}: {} < {}", w, h, wider, base);
                assert!(taller >= base, "taller {}x{}: {} < {}", w, h, taller, base);
            }
        }
    }

    #[test]
    fn test_truncation_only_when_minimum_overflows() {
        let text = "Indian Overseas Bank Anna Salai Chennai";
        let p = params(12);
        for width in [30, 60, 120, 400] {
            for height in [12, 24, 48, 96] {
                let block = fit(text, width, height, "any", 40, &p, &BuiltinFonts);
                let at_min = BuiltinFonts.resolve("any", 12);
                let needed = at_min.line_height() * wrap(text, &at_min, width).len() as u32;
                assert_eq!(block.truncated, needed > height, "{}x{}", width, height);
            }
        }
    }

    // ========================================================================
    // Outline faces
    // ========================================================================

    use crate::text::test_fonts::DejaVuFonts;

    #[test]
    fn test_outline_height_never_exceeds_box() {
        let fonts = DejaVuFonts::new();
        let text = "Name - Venkatanarasimharajuvaripeta Subramanyam";
        let p = params(12);
        let min_line = fonts.resolve("any", 12).line_height();
        for width in [60, 140, 320, 700, 1120] {
            for height in [min_line, 30, 64, 100, 140] {
                let block = fit(text, width, height, "any", 60, &p, &fonts);
                assert!(!block.font.is_builtin());
                assert!(
                    block.total_height() <= height,
                    "{}x{} gave height {}",
                    width,
                    height,
                    block.total_height()
                );
            }
        }
    }

    #[test]
    fn test_outline_truncated_line_fits_width() {
        let fonts = DejaVuFonts::new();
        let text = "Krishnamurthy ".repeat(60);
        for width in [20, 75, 180, 400] {
            let block = fit(text.trim(), width, 30, "any", 40, &params(12), &fonts);
            assert!(block.truncated);
            assert_eq!(block.size(), 12);
            let last = block.lines.last().unwrap();
            assert!(last.ends_with('\u{2026}'));
            if last != "\u{2026}" {
                assert!(block.font.measure(last).0 <= width, "{:?} wider than {}", last, width);
            }
        }
    }

    #[test]
    fn test_outline_monotonic_in_box_size() {
        let fonts = DejaVuFonts::new();
        let text = "Amount - \u{20b9}12,34,56,789 outstanding";
        let p = params(12);
        for w in [40u32, 120, 300, 640] {
            for h in [16u32, 40, 90] {
                let base = fit(text, w, h, "any", 60, &p, &fonts).size();
                let wider = fit(text, w * 2, h, "any", 60, &p, &fonts).size();
                let taller = fit(text, w, h * 2, "any", 60, &p, &fonts).size();
                assert!(wider >= base, "wider {}x{}: {} < {}", w, h, wider, base);
                assert!(taller >= base, "taller {}x{}: {} < {}", w, h, taller, base);
            }
        }
    }
}
