//! Text shaping seam.
//!
//! The core treats glyph measurement as an external service: paragraph
//! variants call into a [`TextShaper`] during layout and never measure text
//! themselves. [`CellShaper`] is a fixed-metrics implementation (UAX #11 cell
//! widths) suitable for tests and headless terminal-style hosts.

use crate::style::StyleId;
use unicode_width::UnicodeWidthChar;

/// Glyph/line metrics provider. Must behave as a pure function of its inputs:
/// layout idempotence depends on identical answers for identical queries.
pub trait TextShaper {
    /// Horizontal advance of a single code point under `style`.
    fn advance(&self, ch: char, style: StyleId) -> f32;

    /// Line height under `style`.
    fn line_height(&self, style: StyleId) -> f32;

    /// Total advance of a run of code points under `style`.
    fn run_advance(&self, run: &[char], style: StyleId) -> f32 {
        run.iter().map(|&ch| self.advance(ch, style)).sum()
    }
}

/// Fixed-metrics shaper: every narrow code point advances by `cell_width`,
/// wide (CJK, emoji) code points by twice that, zero-width code points by
/// nothing.
#[derive(Debug, Clone, Copy)]
pub struct CellShaper {
    /// Advance of one narrow cell.
    pub cell_width: f32,
    /// Height of every line.
    pub cell_height: f32,
}

impl CellShaper {
    /// Create a shaper with the given cell metrics.
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }
}

impl Default for CellShaper {
    fn default() -> Self {
        // 1x1 cells keep advances equal to UAX #11 column counts, which makes
        // layout arithmetic transparent in tests.
        Self::new(1.0, 1.0)
    }
}

impl TextShaper for CellShaper {
    fn advance(&self, ch: char, _style: StyleId) -> f32 {
        // Controls and line/paragraph separators occupy no space.
        if ch.is_control() || matches!(ch, '\u{2028}' | '\u{2029}') {
            return 0.0;
        }
        let cells = UnicodeWidthChar::width(ch).unwrap_or(0);
        self.cell_width * cells as f32
    }

    fn line_height(&self, _style: StyleId) -> f32 {
        self.cell_height
    }
}
