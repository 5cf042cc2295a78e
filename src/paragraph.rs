//! The paragraph abstraction: the polymorphic unit of document content.
//!
//! A paragraph may be a leaf (text) or a container of child paragraphs,
//! forming a tree. Every query is answered in the paragraph's own local frame;
//! the caller composes [`LayoutInfo`] offsets to cross a boundary, which keeps
//! each variant ignorant of its position in the tree and concentrates all
//! coordinate math in one place.

use crate::caret::{CaretInfo, HitTestResult, LineInfo};
use crate::document::DocumentId;
use crate::geometry::{Point, Rect, Thickness};
use crate::layout_info::LayoutInfo;
use crate::selection::{SelectionInfo, SubRunBFSInfo, SubRunInfo};
use crate::shaping::TextShaper;
use crate::style::{StyleId, StyleRun};
use crate::types::{CaretPosition, DeleteInfo, TextRange};
use crate::undo::UndoRecorder;

/// Per-node state shared by every paragraph variant: margin, coordinate-space
/// bookkeeping and the non-owning owner handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParaState {
    /// Four-sided spacing around this paragraph's content.
    pub margin: Thickness,
    /// Position within the parent, assigned by the parent's layout pass.
    pub local_info: LayoutInfo,
    /// Position within the document. Only valid after the enclosing tree has
    /// completed a layout pass; recomputed entirely on each pass, never
    /// partially updated.
    pub global_info: LayoutInfo,
    /// The owning document, set on attach and cleared on detach. Never used
    /// to extend a lifetime.
    pub owner: Option<DocumentId>,
}

/// Layout input handed down by the owning container (or the document, for the
/// root): the width available to this paragraph and the external shaping
/// service to measure with.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    /// Width available to the paragraph, margins included.
    pub available_width: f32,
    /// The text shaping/metrics service.
    pub shaper: &'a dyn TextShaper,
}

impl<'a> LayoutContext<'a> {
    /// Create a layout context.
    pub fn new(available_width: f32, shaper: &'a dyn TextShaper) -> Self {
        Self {
            available_width,
            shaper,
        }
    }

    /// This context with a different available width.
    pub fn with_available_width(&self, available_width: f32) -> Self {
        Self {
            available_width,
            ..*self
        }
    }
}

/// Paint parameters.
#[derive(Debug, Clone, Copy)]
pub struct PaintOptions {
    /// Visible region in document space; content outside it may be skipped.
    pub view_bounds: Rect,
    /// Selection to highlight, in document space.
    pub selection: Option<TextRange>,
}

/// Rendering backend seam. Calls are one-way; nothing is read back.
pub trait RenderSurface {
    /// Draw a run of text with its top-left corner at `origin` (document
    /// space).
    fn draw_text_run(&mut self, origin: Point, text: &str, style: StyleId);

    /// Fill a rectangle (document space), used for selection highlights.
    fn fill_rect(&mut self, rect: Rect);
}

/// The capability set every paragraph variant implements.
///
/// Invariants all variants uphold: `code_point_length() >= 1` and
/// `line_count() >= 1` (even an empty paragraph occupies its terminator and
/// one line), and content width/height include margin while the `_override`
/// variants exclude it.
pub trait Paragraph {
    /// Shared node state.
    fn state(&self) -> &ParaState;
    /// Shared node state, mutable.
    fn state_mut(&mut self) -> &mut ParaState;
    /// Upcast, so provided methods can hand out `&dyn Paragraph`.
    fn as_paragraph(&self) -> &dyn Paragraph;

    /// Variant identification for capability checks such as
    /// [`can_join_with`](Self::can_join_with).
    fn as_any(&self) -> &dyn std::any::Any;

    /// Variant-specific layout. `ctx.available_width` has already been
    /// reduced by this paragraph's own margins.
    fn layout_override(&mut self, ctx: &LayoutContext<'_>);

    /// Layout the content of this paragraph. Idempotent: re-invoking with the
    /// same context reproduces the same layout.
    fn layout(&mut self, ctx: &LayoutContext<'_>) {
        let margin = self.state().margin;
        self.layout_override(&ctx.with_available_width(ctx.available_width - margin.horizontal()));
    }

    /// Paint this paragraph. Pure side effect; must not mutate layout state.
    fn paint(&self, surface: &mut dyn RenderSurface, options: &PaintOptions);

    /// Caret information for `position`, in this paragraph's local space, or
    /// `None` when the position does not map to a visible caret here.
    fn caret_info(&self, position: CaretPosition) -> Option<CaretInfo>;

    /// Line extent information for visual line `line`, in local space.
    ///
    /// `line` must be in `[0, line_count())`; out-of-range is a caller
    /// contract violation and panics.
    fn line_info(&self, line: usize) -> LineInfo;

    /// From-end line indexing: `index = 1` is the last line. Normalized
    /// against `line_count()`.
    fn line_info_from_end(&self, index: usize) -> LineInfo {
        let count = self.line_count();
        assert!(
            index >= 1 && index <= count,
            "from-end line index {index} out of range for {count} lines"
        );
        self.line_info(count - index)
    }

    /// Hit test a point relative to this paragraph's content origin.
    fn hit_test(&self, pt: Point) -> HitTestResult;

    /// Hit test an x coordinate on visual line `line_index`.
    fn hit_test_line(&self, line_index: usize, x: f32) -> HitTestResult;

    /// Ordered, ascending list of valid caret code point offsets.
    fn caret_indices(&self) -> Vec<usize>;

    /// Ordered, ascending list of word-boundary caret offsets, used for
    /// word-level navigation.
    fn word_boundary_indices(&self) -> Vec<usize>;

    /// Length of this paragraph in code points. Always at least 1.
    fn code_point_length(&self) -> usize;

    /// Number of visual lines. Always at least 1.
    fn line_count(&self) -> usize;

    /// Number of display lines.
    fn display_line_count(&self) -> usize {
        self.line_count()
    }

    /// Width of the content, excluding margins.
    fn content_width_override(&self) -> f32;

    /// Height of the content, excluding margins.
    fn content_height_override(&self) -> f32;

    /// Width of this paragraph, margins included.
    fn content_width(&self) -> f32 {
        self.content_width_override() + self.state().margin.horizontal()
    }

    /// Height of this paragraph, margins included.
    fn content_height(&self) -> f32 {
        self.content_height_override() + self.state().margin.vertical()
    }

    /// Whether this paragraph alone can satisfy `delete_info` without
    /// restructuring the tree. Returns the selection the caller would land on.
    fn can_delete_partial(&self, delete_info: DeleteInfo) -> Option<TextRange>;

    /// Perform a deletion local to this paragraph, recording it through
    /// `recorder`. Returns the selection the caller should land on, or `None`
    /// when the deletion requires paragraph-level restructuring (join/split)
    /// the caller must handle. `None` is expected control flow, not an error.
    fn delete_partial(
        &mut self,
        delete_info: DeleteInfo,
        recorder: &mut dyn UndoRecorder,
    ) -> Option<TextRange>;

    /// Whether this paragraph can absorb `other` in a join. Default: never.
    fn can_join_with(&self, _other: &dyn Paragraph) -> bool {
        false
    }

    /// Absorb `next` (the immediately following sibling, already removed from
    /// the container) into this paragraph. On refusal the box is handed back
    /// unchanged so the caller can reinsert it.
    fn try_join(
        &mut self,
        next: Box<dyn Paragraph>,
        _recorder: &mut dyn UndoRecorder,
    ) -> Result<(), Box<dyn Paragraph>> {
        Err(next)
    }

    /// Split this paragraph at `split_index`, returning the newly created
    /// successor. The original retains the prefix.
    fn split(&mut self, recorder: &mut dyn UndoRecorder, split_index: usize) -> Box<dyn Paragraph>;

    /// Insert `text` at a local code point offset. Returns false for variants
    /// without direct text content.
    fn insert_text(
        &mut self,
        _position: usize,
        _text: &str,
        _recorder: &mut dyn UndoRecorder,
    ) -> bool {
        false
    }

    /// Style in effect at a caret position.
    fn style_at_position(&self, position: CaretPosition) -> StyleId;

    /// Style runs overlapping the half-open range `[position, position + length)`.
    fn styles_in_range(&self, position: usize, length: usize) -> Vec<StyleRun>;

    /// Apply `style` over `[position, position + length)`, recording the
    /// change.
    fn apply_style(
        &mut self,
        style: StyleId,
        position: usize,
        length: usize,
        recorder: &mut dyn UndoRecorder,
    );

    /// Stream `[position, position + length)` of this paragraph's text into a
    /// caller-supplied buffer. Lets composite paragraphs gather text from
    /// children without an intermediate allocation per child.
    fn append_text_to_buffer(&self, buffer: &mut String, position: usize, length: usize);

    /// Collect `[position, position + length)` of this paragraph's text.
    fn text(&self, position: usize, length: usize) -> String {
        let mut buffer = String::new();
        self.append_text_to_buffer(&mut buffer, position, length);
        buffer
    }

    /// Notification: this paragraph (and its subtree) now belongs to `owner`.
    fn on_attached(&mut self, owner: DocumentId) {
        self.state_mut().owner = Some(owner);
        if let Some(children) = self.children_mut() {
            for child in children {
                child.on_attached(owner);
            }
        }
    }

    /// Notification: this paragraph (and its subtree) left its document.
    fn on_detached(&mut self) {
        self.state_mut().owner = None;
        if let Some(children) = self.children_mut() {
            for child in children {
                child.on_detached();
            }
        }
    }

    /// Whether this variant is a container of child paragraphs.
    fn is_container(&self) -> bool {
        false
    }

    /// Child paragraphs, in order. Empty for leaves.
    fn children(&self) -> &[Box<dyn Paragraph>] {
        &[]
    }

    /// Child paragraphs, mutable. `None` for leaves.
    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Paragraph>>> {
        None
    }

    /// Immediate sub-runs the selection overlaps.
    ///
    /// Base (leaf) behavior: one run covering the selection, `partial` unless
    /// the selection covers the whole content range.
    fn interacting_runs(&self, selection: TextRange) -> Vec<SubRunInfo<'_>> {
        let length = self.code_point_length();
        vec![SubRunInfo {
            paragraph: self.as_paragraph(),
            offset: selection.minimum(),
            length: selection.length(),
            partial: !(selection.minimum() == 0 && selection.maximum() >= length),
        }]
    }

    /// Flat, fully resolved leaf-level sub-runs. Base behavior: same as the
    /// direct decomposition.
    fn interacting_runs_recursive(&self, selection: TextRange) -> Vec<SubRunInfo<'_>> {
        self.interacting_runs(selection)
    }

    /// Breadth-first decomposition.
    ///
    /// The tie-break rule: a partially covered composite run is flattened
    /// inline at this level (a partial run cannot be grouped); a fully
    /// covered run stays one grouped node that carries its children lazily.
    fn bfs_interacting_runs(&self, selection: TextRange) -> Vec<SubRunBFSInfo<'_>> {
        let mut out = Vec::new();
        for sub_run in self.interacting_runs(selection) {
            let is_self = std::ptr::addr_eq(
                sub_run.paragraph as *const dyn Paragraph,
                self.as_paragraph() as *const dyn Paragraph,
            );
            if sub_run.partial && !is_self && sub_run.paragraph.is_container() {
                out.extend(sub_run.paragraph.bfs_interacting_runs(sub_run.local_range()));
            } else {
                out.push(SubRunBFSInfo::new(sub_run));
            }
        }
        out
    }

    /// Resolve a selection's endpoint carets and all three decomposition
    /// views at once.
    fn selection_info(&self, selection: TextRange) -> SelectionInfo<'_> {
        SelectionInfo {
            selection,
            start_caret: self.caret_info(selection.start_caret_position()),
            end_caret: self.caret_info(selection.end_caret_position()),
            interacting_runs: self.interacting_runs(selection),
            recursive_interacting_runs: self.interacting_runs_recursive(selection),
            bfs_interacting_runs: self.bfs_interacting_runs(selection),
        }
    }
}
