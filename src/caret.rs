//! Resolved caret, line and hit-test value types.
//!
//! These are the answers paragraph queries produce, always in the queried
//! paragraph's local space; callers compose [`crate::LayoutInfo`] offsets to
//! lift them into parent or document space. Query misses are `Option`s (the
//! Rust rendition of a "none" sentinel), never errors.

use crate::geometry::Rect;
use crate::types::CaretPosition;

/// A resolved visual caret.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretInfo {
    /// Code point index the caret sits at.
    pub code_point_index: usize,
    /// X coordinate of the caret.
    pub caret_x: f32,
    /// Bounding rectangle of the caret (zero width, one line tall).
    pub caret_rect: Rect,
    /// Index of the visual line the caret is on.
    pub line_index: usize,
}

/// A visual line's extent plus optional neighbor line numbers.
///
/// The neighbor fields are `None` at paragraph boundaries; containers stitch
/// them up when adjacent siblings supply the missing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// Visual line number.
    pub line: usize,
    /// Caret position at the start of the line.
    pub start: CaretPosition,
    /// Caret position at the end of the line (alt affinity, so a caret placed
    /// there renders on this line rather than the next).
    pub end: CaretPosition,
    /// Previous visual line number, if any.
    pub prev_line: Option<usize>,
    /// Next visual line number, if any.
    pub next_line: Option<usize>,
}

/// Result of hit-testing a point or an x coordinate on a line.
///
/// The `over_*` fields are populated only when the point lies directly over a
/// line / code point; the `closest_*` fields are best-effort and populated
/// whenever the paragraph has any content. `None` fields pass through
/// coordinate translation untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitTestResult {
    /// Visual line closest to the point.
    pub closest_line: Option<usize>,
    /// Visual line directly under the point, if any.
    pub over_line: Option<usize>,
    /// Code point boundary closest to the point.
    pub closest_code_point_index: Option<usize>,
    /// Code point directly under the point, if any.
    pub over_code_point_index: Option<usize>,
}

impl HitTestResult {
    /// A miss: nothing over, nothing close.
    pub fn none() -> Self {
        Self::default()
    }
}
