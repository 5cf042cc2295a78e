//! Selection decomposition result types.
//!
//! A selection range decomposes into the concrete sub-runs of content it
//! touches. Every sub-run borrows the paragraph tree, which ties it (and any
//! lazily produced children) to one immutable snapshot of tree and offsets:
//! the tree cannot be mutated while a decomposition is alive.

use crate::caret::CaretInfo;
use crate::paragraph::Paragraph;
use crate::types::TextRange;
use std::fmt;

/// One run of content a selection overlaps.
///
/// `offset` and `length` are local to `paragraph`. `partial` means the run
/// covers only part of the paragraph's content range.
#[derive(Clone, Copy)]
pub struct SubRunInfo<'a> {
    /// The paragraph the run targets.
    pub paragraph: &'a dyn Paragraph,
    /// Start of the run, in the target's local code point space.
    pub offset: usize,
    /// Length of the run in code points.
    pub length: usize,
    /// Whether the run covers the target only partially.
    pub partial: bool,
}

impl<'a> SubRunInfo<'a> {
    /// The run's extent in the target's local space.
    pub fn local_range(&self) -> TextRange {
        TextRange::new(self.offset, self.offset + self.length)
    }

    /// The run's extent in document space. Only valid after a layout pass
    /// (relies on the target's global info).
    pub fn global_range(&self) -> TextRange {
        let base = self.paragraph.state().global_info.code_point_index;
        TextRange::new(base + self.offset, base + self.offset + self.length)
    }
}

impl fmt::Debug for SubRunInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubRunInfo")
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("partial", &self.partial)
            .finish()
    }
}

/// A node of the breadth-first decomposition.
///
/// A fully covered composite run stays grouped: its children are not computed
/// until [`children`](Self::children) is called, and each call recomputes them
/// from the borrowed snapshot (the sequence is restartable).
#[derive(Clone, Copy, Debug)]
pub struct SubRunBFSInfo<'a> {
    /// The run this node describes.
    pub sub_run: SubRunInfo<'a>,
}

impl<'a> SubRunBFSInfo<'a> {
    /// Wrap a run as a BFS node.
    pub fn new(sub_run: SubRunInfo<'a>) -> Self {
        Self { sub_run }
    }

    /// The nested decomposition of this run's target, produced on demand.
    /// Empty for leaf targets.
    pub fn children(&self) -> Vec<SubRunBFSInfo<'a>> {
        if !self.sub_run.paragraph.is_container() {
            return Vec::new();
        }
        self.sub_run
            .paragraph
            .bfs_interacting_runs(self.sub_run.local_range())
    }
}

/// Everything a caller needs to render or export one selection: resolved
/// endpoint carets plus all three decomposition views.
pub struct SelectionInfo<'a> {
    /// The queried selection, in the queried paragraph's local space.
    pub selection: TextRange,
    /// Visual caret at the selection's anchor end, if it maps to one.
    pub start_caret: Option<CaretInfo>,
    /// Visual caret at the selection's active end, if it maps to one.
    pub end_caret: Option<CaretInfo>,
    /// Immediate sub-runs.
    pub interacting_runs: Vec<SubRunInfo<'a>>,
    /// Fully flattened leaf-level sub-runs.
    pub recursive_interacting_runs: Vec<SubRunInfo<'a>>,
    /// Breadth-first decomposition (grouped where fully covered).
    pub bfs_interacting_runs: Vec<SubRunBFSInfo<'a>>,
}
