//! Core position and range value types.
//!
//! Everything here is an immutable value: transform operations return new
//! values rather than mutating shared state. Offsets count Unicode code points
//! (the document's fundamental addressing unit).

/// A code point interval, not required to be ordered.
///
/// `start` is the selection anchor and `end` the active end, so `start > end`
/// describes a backwards selection. Use [`minimum`](Self::minimum) /
/// [`maximum`](Self::maximum) / [`length`](Self::length) for order-independent
/// views.
///
/// The `alt_position` flag carries caret affinity for the range's active end
/// (end-of-wrapped-line vs start-of-next-line). When a caret's own flag and a
/// range's flag disagree, the caret's flag wins; the range flag only feeds the
/// carets produced by [`start_caret_position`](Self::start_caret_position) and
/// [`end_caret_position`](Self::end_caret_position).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    /// Anchor code point index.
    pub start: usize,
    /// Active-end code point index.
    pub end: usize,
    /// Caret affinity of the active end.
    pub alt_position: bool,
}

impl TextRange {
    /// Create a new range.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            alt_position: false,
        }
    }

    /// Create a new range with an explicit affinity flag.
    pub fn with_alt_position(start: usize, end: usize, alt_position: bool) -> Self {
        Self {
            start,
            end,
            alt_position,
        }
    }

    /// A zero-length (caret) range.
    pub fn caret(position: usize) -> Self {
        Self::new(position, position)
    }

    /// A zero-length (caret) range with the affinity flag set.
    pub fn caret_alt(position: usize) -> Self {
        Self::with_alt_position(position, position, true)
    }

    /// The smaller of `start` and `end`.
    pub fn minimum(&self) -> usize {
        self.start.min(self.end)
    }

    /// The larger of `start` and `end`.
    pub fn maximum(&self) -> usize {
        self.start.max(self.end)
    }

    /// Absolute length of the range.
    pub fn length(&self) -> usize {
        self.maximum() - self.minimum()
    }

    /// Whether the range is zero-length.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the active end precedes the anchor.
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// This range with `start <= end`.
    pub fn normalized(&self) -> Self {
        Self {
            start: self.minimum(),
            end: self.maximum(),
            alt_position: self.alt_position,
        }
    }

    /// This range with anchor and active end swapped.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            alt_position: self.alt_position,
        }
    }

    /// The overlap of this range and `other`, or `None` when they are disjoint.
    ///
    /// The result is normalized; a shared boundary point yields an empty range
    /// only when one of the inputs is itself empty at that point.
    pub fn intersection(&self, other: &TextRange) -> Option<TextRange> {
        let start = self.minimum().max(other.minimum());
        let end = self.maximum().min(other.maximum());
        if start > end || (start == end && !self.is_empty() && !other.is_empty()) {
            None
        } else {
            Some(TextRange::with_alt_position(start, end, self.alt_position))
        }
    }

    /// The smallest range covering both `a` and `b`.
    pub fn union_of(a: &TextRange, b: &TextRange) -> TextRange {
        TextRange::new(a.minimum().min(b.minimum()), a.maximum().max(b.maximum()))
    }

    /// Caret position at the anchor end.
    pub fn start_caret_position(&self) -> CaretPosition {
        CaretPosition::new(self.start)
    }

    /// Caret position at the active end, carrying the range's affinity flag.
    pub fn end_caret_position(&self) -> CaretPosition {
        CaretPosition::with_alt_position(self.end, self.alt_position)
    }
}

/// A logical caret location.
///
/// `alt_position` disambiguates the two visual carets a wrapped line boundary
/// admits: `false` places the caret at the start of the following line, `true`
/// at the end of the preceding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretPosition {
    /// Code point index of the caret.
    pub code_point_index: usize,
    /// Caret affinity at wrap boundaries.
    pub alt_position: bool,
}

impl CaretPosition {
    /// Create a caret position with default affinity.
    pub fn new(code_point_index: usize) -> Self {
        Self {
            code_point_index,
            alt_position: false,
        }
    }

    /// Create a caret position with an explicit affinity flag.
    pub fn with_alt_position(code_point_index: usize, alt_position: bool) -> Self {
        Self {
            code_point_index,
            alt_position,
        }
    }
}

/// How a deletion was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Delete the selected range.
    #[default]
    Selection,
    /// Delete the code point after the caret.
    Forward,
    /// Delete the code point before the caret.
    Backward,
}

/// A deletion request: the affected range plus the requesting gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteInfo {
    /// The selection the deletion applies to. For [`DeleteMode::Forward`] and
    /// [`DeleteMode::Backward`] this is the caret the gesture started from.
    pub range: TextRange,
    /// The requesting gesture.
    pub mode: DeleteMode,
}

impl DeleteInfo {
    /// Deletion of an explicit selection range.
    pub fn selection(range: TextRange) -> Self {
        Self {
            range,
            mode: DeleteMode::Selection,
        }
    }

    /// Forward deletion (Delete key) from a caret.
    pub fn forward(position: usize) -> Self {
        Self {
            range: TextRange::caret(position),
            mode: DeleteMode::Forward,
        }
    }

    /// Backward deletion (Backspace) from a caret.
    pub fn backward(position: usize) -> Self {
        Self {
            range: TextRange::caret(position),
            mode: DeleteMode::Backward,
        }
    }

    /// This request with its range replaced.
    pub fn with_range(self, range: TextRange) -> Self {
        Self { range, ..self }
    }
}

/// A path address: child indices from the document root down to a paragraph.
///
/// Recomputed on demand by the document; never cached on nodes, since the tree
/// structure can change under it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParagraphIndex(pub Vec<usize>);

impl ParagraphIndex {
    /// The root itself (empty path).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this path addresses the root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// This path extended by one more child index.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_min_max_length() {
        let fwd = TextRange::new(3, 7);
        let rev = TextRange::new(7, 3);
        assert_eq!(fwd.minimum(), 3);
        assert_eq!(fwd.maximum(), 7);
        assert_eq!(fwd.length(), 4);
        assert_eq!(rev.minimum(), 3);
        assert_eq!(rev.maximum(), 7);
        assert_eq!(rev.length(), 4);
        assert!(rev.is_reversed());
        assert_eq!(rev.normalized(), TextRange::new(3, 7));
    }

    #[test]
    fn test_range_intersection() {
        let a = TextRange::new(2, 8);
        assert_eq!(
            a.intersection(&TextRange::new(5, 12)),
            Some(TextRange::new(5, 8))
        );
        assert_eq!(a.intersection(&TextRange::new(9, 12)), None);
        // Touching non-empty ranges do not intersect.
        assert_eq!(a.intersection(&TextRange::new(8, 12)), None);
        // An empty range on the boundary does.
        assert_eq!(
            a.intersection(&TextRange::caret(8)),
            Some(TextRange::new(8, 8))
        );
        // Reversed input intersects the same way.
        assert_eq!(
            TextRange::new(8, 2).intersection(&TextRange::new(5, 12)),
            Some(TextRange::new(5, 8))
        );
    }

    #[test]
    fn test_end_caret_carries_range_affinity() {
        let sel = TextRange::with_alt_position(0, 10, true);
        assert!(sel.end_caret_position().alt_position);
        assert!(!sel.start_caret_position().alt_position);
    }

    #[test]
    fn test_paragraph_index_child() {
        let root = ParagraphIndex::root();
        assert!(root.is_root());
        assert_eq!(root.child(2).child(0), ParagraphIndex(vec![2, 0]));
    }
}
