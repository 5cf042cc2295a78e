//! Undo recording seam.
//!
//! The document-wide undo/redo engine lives outside this core. Every
//! structural or content mutation here emits a description of what changed
//! through an abstract [`UndoRecorder`]; the core never undoes or redoes
//! anything itself.

use crate::style::StyleRun;
use crate::types::ParagraphIndex;

/// Description of one undoable mutation, carrying enough before/after state
/// for an external engine to reverse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Text inserted into a paragraph.
    InsertText {
        /// Paragraph the insertion happened in.
        paragraph: ParagraphIndex,
        /// Local code point offset of the insertion.
        offset: usize,
        /// The inserted text.
        text: String,
    },
    /// Text deleted from a paragraph.
    DeleteText {
        /// Paragraph the deletion happened in.
        paragraph: ParagraphIndex,
        /// Local code point offset of the deletion.
        offset: usize,
        /// The exact deleted text.
        deleted: String,
        /// The style runs the deleted range carried.
        deleted_styles: Vec<StyleRun>,
    },
    /// A paragraph split into two.
    SplitParagraph {
        /// The paragraph that was split.
        paragraph: ParagraphIndex,
        /// Local code point index of the split.
        split_index: usize,
    },
    /// Two adjacent paragraphs joined into one.
    JoinParagraphs {
        /// The surviving (left) paragraph.
        paragraph: ParagraphIndex,
        /// Code point length of the left paragraph before the join (the
        /// position to re-split at when undoing).
        join_index: usize,
    },
    /// A whole paragraph removed from its container.
    RemoveParagraph {
        /// Path of the removed paragraph.
        paragraph: ParagraphIndex,
    },
    /// A style applied over a range.
    ApplyStyle {
        /// Paragraph the style was applied in.
        paragraph: ParagraphIndex,
        /// Local start of the restyled range.
        offset: usize,
        /// Length of the restyled range.
        length: usize,
        /// The style runs previously in effect over that range.
        previous: Vec<StyleRun>,
    },
}

impl EditOp {
    /// The path of the paragraph this operation touched.
    pub fn paragraph(&self) -> &ParagraphIndex {
        match self {
            EditOp::InsertText { paragraph, .. }
            | EditOp::DeleteText { paragraph, .. }
            | EditOp::SplitParagraph { paragraph, .. }
            | EditOp::JoinParagraphs { paragraph, .. }
            | EditOp::RemoveParagraph { paragraph }
            | EditOp::ApplyStyle { paragraph, .. } => paragraph,
        }
    }

    fn paragraph_mut(&mut self) -> &mut ParagraphIndex {
        match self {
            EditOp::InsertText { paragraph, .. }
            | EditOp::DeleteText { paragraph, .. }
            | EditOp::SplitParagraph { paragraph, .. }
            | EditOp::JoinParagraphs { paragraph, .. }
            | EditOp::RemoveParagraph { paragraph }
            | EditOp::ApplyStyle { paragraph, .. } => paragraph,
        }
    }
}

/// Abstract command recorder. Mutating paragraph operations push one
/// description per logical change; the external engine groups and replays
/// them.
pub trait UndoRecorder {
    /// Record one mutation description.
    fn record(&mut self, op: EditOp);
}

/// Recorder that keeps every description in memory. Used by tests and by
/// hosts that batch descriptions into their own history model.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    /// Recorded operations, oldest first.
    pub ops: Vec<EditOp>,
}

impl MemoryRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UndoRecorder for MemoryRecorder {
    fn record(&mut self, op: EditOp) {
        self.ops.push(op);
    }
}

/// Recorder adapter that prefixes one child index onto the paragraph path of
/// every recorded operation.
///
/// Paragraphs record their mutations with paths local to themselves (the
/// empty path for "this paragraph"); each container wraps the recorder in one
/// of these before delegating down, so descriptions arrive at the outer
/// recorder with full root-relative paths.
pub struct PathPrefixRecorder<'a> {
    inner: &'a mut dyn UndoRecorder,
    index: usize,
}

impl<'a> PathPrefixRecorder<'a> {
    /// Wrap `inner`, prefixing `index` onto recorded paths.
    pub fn new(inner: &'a mut dyn UndoRecorder, index: usize) -> Self {
        Self { inner, index }
    }
}

impl UndoRecorder for PathPrefixRecorder<'_> {
    fn record(&mut self, mut op: EditOp) {
        op.paragraph_mut().0.insert(0, self.index);
        self.inner.record(op);
    }
}

/// Recorder that drops everything. For hosts without undo.
#[derive(Debug, Default)]
pub struct NullRecorder;

impl UndoRecorder for NullRecorder {
    fn record(&mut self, _op: EditOp) {}
}
