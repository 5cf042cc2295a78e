//! The document: owner of the paragraph tree and the entry point for layout,
//! global-space queries and the edit surface.
//!
//! A document owns a root panel and the shaping service, runs the two-phase
//! layout (local layout bottom-up, then the top-down global-offset pass) and
//! answers every query in document space by lifting the root's local answers.
//! Edits that a single paragraph cannot absorb are restructured here: removing
//! fully covered paragraphs, joining across deleted terminators, splitting.

use crate::caret::{CaretInfo, HitTestResult, LineInfo};
use crate::geometry::Point;
use crate::layout_info::LayoutInfo;
use crate::panel::PanelParagraph;
use crate::paragraph::{LayoutContext, PaintOptions, Paragraph, RenderSurface};
use crate::selection::SelectionInfo;
use crate::shaping::TextShaper;
use crate::style::{StyleId, StyleRun};
use crate::text_paragraph::TextParagraph;
use crate::types::{CaretPosition, DeleteInfo, DeleteMode, ParagraphIndex, TextRange};
use crate::undo::{EditOp, PathPrefixRecorder, UndoRecorder};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique, non-owning handle to a document. Paragraphs carry it to
/// know which document they belong to without holding a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Failure of a document-level edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A paragraph path did not resolve to a paragraph.
    InvalidPath(ParagraphIndex),
    /// A code point position or range fell outside the document.
    PositionOutOfRange {
        /// The offending position.
        position: usize,
        /// The document length at the time.
        length: usize,
    },
    /// The paragraphs at and after `index` cannot be joined.
    CannotJoin {
        /// Root child index of the would-be surviving paragraph.
        index: usize,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::InvalidPath(path) => write!(f, "no paragraph at path {:?}", path.0),
            EditError::PositionOutOfRange { position, length } => {
                write!(f, "position {position} out of range (document length {length})")
            }
            EditError::CannotJoin { index } => {
                write!(f, "paragraphs {index} and {} cannot be joined", index + 1)
            }
        }
    }
}

impl std::error::Error for EditError {}

/// A document: the root paragraph tree plus the services it is laid out with.
pub struct Document {
    id: DocumentId,
    root: PanelParagraph,
    shaper: Box<dyn TextShaper>,
    available_width: f32,
    layout_valid: bool,
}

impl Document {
    /// Create a document containing a single empty paragraph.
    pub fn new(shaper: Box<dyn TextShaper>) -> Self {
        let id = DocumentId::next();
        let mut root = PanelParagraph::new();
        root.on_attached(id);
        root.add_child(Box::new(TextParagraph::empty()));
        Self {
            id,
            root,
            shaper,
            available_width: f32::MAX,
            layout_valid: false,
        }
    }

    /// This document's identity handle.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// The root paragraph.
    pub fn root(&self) -> &PanelParagraph {
        &self.root
    }

    /// Width the document lays out against.
    pub fn available_width(&self) -> f32 {
        self.available_width
    }

    /// Change the layout width. Invalidates the current layout.
    pub fn set_available_width(&mut self, width: f32) {
        self.available_width = width;
        self.layout_valid = false;
    }

    /// Whether the current layout reflects the current content.
    pub fn is_layout_valid(&self) -> bool {
        self.layout_valid
    }

    /// Append a paragraph after the existing ones. Host-level structural
    /// change; not recorded.
    pub fn append_paragraph(&mut self, paragraph: Box<dyn Paragraph>) {
        self.root.add_child(paragraph);
        self.layout_valid = false;
    }

    /// Insert a paragraph at a root child index. Not recorded.
    pub fn insert_paragraph(&mut self, index: usize, paragraph: Box<dyn Paragraph>) {
        self.root.insert_child(index, paragraph);
        self.layout_valid = false;
    }

    /// Remove and return the root child at `index`. Not recorded.
    pub fn remove_paragraph(&mut self, index: usize) -> Box<dyn Paragraph> {
        let removed = self.root.remove_child(index);
        self.layout_valid = false;
        removed
    }

    /// Lay the whole tree out: local layout first, then the top-down pass
    /// resolving every paragraph's global offsets. Must run after any mutation
    /// before query results are trusted.
    pub fn layout(&mut self) {
        let margin = self.root.state().margin;
        self.root.state_mut().local_info =
            LayoutInfo::new(Point::new(margin.left, margin.top), 0, 0, 0);
        let ctx = LayoutContext::new(self.available_width, &*self.shaper);
        self.root.layout(&ctx);
        self.root.state_mut().global_info = self.root.state().local_info;
        propagate_global(&mut self.root);
        self.layout_valid = true;
        debug!(
            id = self.id.0,
            width = self.available_width,
            length = self.root.code_point_length(),
            lines = self.root.line_count(),
            "document laid out"
        );
    }

    /// Paint the document through `surface`.
    pub fn paint(&self, surface: &mut dyn RenderSurface, options: &PaintOptions) {
        debug_assert!(self.layout_valid, "paint on a stale layout");
        self.root.paint(surface, options);
    }

    /// Document length in code points (terminators included). At least 1.
    pub fn code_point_length(&self) -> usize {
        self.root.code_point_length()
    }

    /// Total visual line count.
    pub fn line_count(&self) -> usize {
        self.root.line_count()
    }

    /// Caret information in document space.
    pub fn caret_info(&self, position: CaretPosition) -> Option<CaretInfo> {
        debug_assert!(self.layout_valid, "query on a stale layout");
        let global = self.root.state().global_info;
        self.root
            .caret_info(global.offset_to_this(position))
            .map(|c| global.offset_from_this(c))
    }

    /// Line information in document space.
    pub fn line_info(&self, line: usize) -> LineInfo {
        debug_assert!(self.layout_valid, "query on a stale layout");
        let global = self.root.state().global_info;
        global.offset_from_this(self.root.line_info(line - global.line_index))
    }

    /// From-end line information (`index = 1` is the last line).
    pub fn line_info_from_end(&self, index: usize) -> LineInfo {
        debug_assert!(self.layout_valid, "query on a stale layout");
        let global = self.root.state().global_info;
        global.offset_from_this(self.root.line_info_from_end(index))
    }

    /// Hit test a document-space point.
    pub fn hit_test(&self, pt: Point) -> HitTestResult {
        debug_assert!(self.layout_valid, "query on a stale layout");
        let global = self.root.state().global_info;
        global.offset_from_this(self.root.hit_test(global.offset_to_this(pt)))
    }

    /// Hit test an x coordinate on a document line.
    pub fn hit_test_line(&self, line_index: usize, x: f32) -> HitTestResult {
        debug_assert!(self.layout_valid, "query on a stale layout");
        let global = self.root.state().global_info;
        global.offset_from_this(
            self.root
                .hit_test_line(line_index - global.line_index, global.x_to_this(x)),
        )
    }

    /// Resolve a document-space selection into carets and all three
    /// decomposition views.
    pub fn selection_info(&self, selection: TextRange) -> SelectionInfo<'_> {
        debug_assert!(self.layout_valid, "query on a stale layout");
        let global = self.root.state().global_info;
        let info = self.root.selection_info(global.offset_to_this(selection));
        SelectionInfo {
            selection,
            start_caret: info.start_caret.map(|c| global.offset_from_this(c)),
            end_caret: info.end_caret.map(|c| global.offset_from_this(c)),
            interacting_runs: info.interacting_runs,
            recursive_interacting_runs: info.recursive_interacting_runs,
            bfs_interacting_runs: info.bfs_interacting_runs,
        }
    }

    /// The text of `[position, position + length)`.
    pub fn text(&self, position: usize, length: usize) -> Result<String, EditError> {
        let total = self.code_point_length();
        if position + length > total {
            return Err(EditError::PositionOutOfRange {
                position: position + length,
                length: total,
            });
        }
        Ok(self.root.text(position, length))
    }

    /// The full document text, terminators included.
    pub fn full_text(&self) -> String {
        self.root.text(0, self.code_point_length())
    }

    /// Style in effect at a document caret position.
    pub fn style_at(&self, position: CaretPosition) -> StyleId {
        self.root.style_at_position(position)
    }

    /// Style runs over a document range.
    pub fn styles_in_range(&self, position: usize, length: usize) -> Vec<StyleRun> {
        self.root.styles_in_range(position, length)
    }

    /// Resolve a root-relative path to a paragraph.
    pub fn paragraph_at(&self, index: &ParagraphIndex) -> Option<&dyn Paragraph> {
        let mut current: &dyn Paragraph = &self.root;
        for &i in &index.0 {
            current = &**current.children().get(i)?;
        }
        Some(current)
    }

    /// Compute the root-relative path of a paragraph in this tree, by
    /// identity. Recomputed on demand; paths are never cached on nodes.
    pub fn paragraph_index_of(&self, target: &dyn Paragraph) -> Option<ParagraphIndex> {
        let mut path = Vec::new();
        find_path(&self.root, target, &mut path).then_some(ParagraphIndex(path))
    }

    /// Insert `text` at a document code point position. Returns the caret to
    /// land on.
    pub fn insert_text(
        &mut self,
        position: usize,
        text: &str,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<TextRange, EditError> {
        if !insert_at(&mut self.root, position, text, recorder) {
            return Err(EditError::PositionOutOfRange {
                position,
                length: self.code_point_length(),
            });
        }
        self.layout_valid = false;
        debug!(id = self.id.0, position, count = text.chars().count(), "inserted text");
        Ok(TextRange::caret(position + text.chars().count()))
    }

    /// Perform a deletion, restructuring the tree where a paragraph cannot
    /// absorb it (removing fully covered paragraphs, joining across a deleted
    /// terminator). Returns the caret/selection to land on.
    pub fn delete(
        &mut self,
        delete_info: DeleteInfo,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<TextRange, EditError> {
        self.ensure_layout();
        let length = self.code_point_length();
        let out_of_range = |position| EditError::PositionOutOfRange { position, length };
        let (start, end) = match delete_info.mode {
            DeleteMode::Selection => {
                let (s, e) = (delete_info.range.minimum(), delete_info.range.maximum());
                if e > length {
                    return Err(out_of_range(e));
                }
                (s, e)
            }
            DeleteMode::Forward => {
                let pos = delete_info.range.minimum();
                if pos >= length {
                    return Err(out_of_range(pos));
                }
                (pos, pos + 1)
            }
            DeleteMode::Backward => {
                let pos = delete_info.range.minimum();
                if pos > length {
                    return Err(out_of_range(pos));
                }
                if pos == 0 {
                    return Ok(TextRange::caret(0));
                }
                (pos - 1, pos)
            }
        };

        // The final terminator of the last paragraph is never deletable;
        // requests that reach it are clamped to the content before it.
        let end = end.min(length - 1);
        if start >= end {
            return Ok(TextRange::caret(start.min(end)));
        }

        if let Some(landing) = self.root.delete_partial(delete_info, recorder) {
            self.layout_valid = false;
            debug!(id = self.id.0, start, end, "deleted within one paragraph");
            return Ok(landing);
        }

        let landing = restructure_delete(&mut self.root, start, end, recorder)
            .ok_or(out_of_range(end))?;
        if self.root.children().is_empty() {
            self.root.add_child(Box::new(TextParagraph::empty()));
        }
        self.layout_valid = false;
        debug!(id = self.id.0, start, end, "deleted with restructuring");
        Ok(landing)
    }

    /// Split the paragraph containing `position` into two at that position.
    /// Returns a caret at the start of the successor.
    pub fn split_paragraph(
        &mut self,
        position: usize,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<TextRange, EditError> {
        if !split_at(&mut self.root, position, recorder) {
            return Err(EditError::PositionOutOfRange {
                position,
                length: self.code_point_length(),
            });
        }
        self.layout_valid = false;
        debug!(id = self.id.0, position, "split paragraph");
        Ok(TextRange::caret(position + 1))
    }

    /// Join root child `index` with its following sibling. Returns a caret at
    /// the join point.
    pub fn join_paragraphs(
        &mut self,
        index: usize,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<TextRange, EditError> {
        let children = self.root.children_mut().expect("root is a container");
        if index + 1 >= children.len() {
            return Err(EditError::CannotJoin { index });
        }
        if !children[index].can_join_with(children[index + 1].as_paragraph()) {
            return Err(EditError::CannotJoin { index });
        }
        let join_point: usize = children[..index]
            .iter()
            .map(|c| c.code_point_length())
            .sum::<usize>()
            + children[index].code_point_length()
            - 1;
        let next = children.remove(index + 1);
        let mut prefixed = PathPrefixRecorder::new(recorder, index);
        if let Err(next) = children[index].try_join(next, &mut prefixed) {
            children.insert(index + 1, next);
            return Err(EditError::CannotJoin { index });
        }
        self.layout_valid = false;
        debug!(id = self.id.0, index, join_point, "joined paragraphs");
        Ok(TextRange::caret(join_point))
    }

    /// Apply a style over a document range.
    pub fn apply_style(
        &mut self,
        style: StyleId,
        range: TextRange,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<(), EditError> {
        self.ensure_layout();
        let length = self.code_point_length();
        if range.maximum() > length {
            return Err(EditError::PositionOutOfRange {
                position: range.maximum(),
                length,
            });
        }
        self.root
            .apply_style(style, range.minimum(), range.length(), recorder);
        debug!(id = self.id.0, start = range.minimum(), len = range.length(), "applied style");
        Ok(())
    }

    fn ensure_layout(&mut self) {
        if !self.layout_valid {
            self.layout();
        }
    }
}

fn propagate_global(para: &mut dyn Paragraph) {
    let global = para.state().global_info;
    if let Some(children) = para.children_mut() {
        for child in children {
            let local = child.state().local_info;
            child.state_mut().global_info = local.offset_to_global(&global);
            propagate_global(&mut **child);
        }
    }
}

fn find_path(current: &dyn Paragraph, target: &dyn Paragraph, path: &mut Vec<usize>) -> bool {
    if std::ptr::addr_eq(
        current as *const dyn Paragraph,
        target as *const dyn Paragraph,
    ) {
        return true;
    }
    for (i, child) in current.children().iter().enumerate() {
        path.push(i);
        if find_path(&**child, target, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Index of the child whose span contains `position`, by live lengths (does
/// not rely on a fresh layout). Falls back to the last child.
fn owning_child(children: &[Box<dyn Paragraph>], position: usize) -> (usize, usize) {
    debug_assert!(!children.is_empty());
    let mut base = 0usize;
    for (i, child) in children.iter().enumerate() {
        let len = child.code_point_length();
        if position < base + len {
            return (i, base);
        }
        base += len;
    }
    (
        children.len() - 1,
        base - children.last().map(|c| c.code_point_length()).unwrap_or(0),
    )
}

fn insert_at(
    para: &mut dyn Paragraph,
    position: usize,
    text: &str,
    recorder: &mut dyn UndoRecorder,
) -> bool {
    if !para.is_container() {
        // Insertion may sit anywhere in the content, up to (not past) the
        // terminator.
        if position >= para.code_point_length() {
            return false;
        }
        return para.insert_text(position, text, recorder);
    }
    if para.children().is_empty() {
        return false;
    }
    let (idx, base) = owning_child(para.children(), position);
    if position < base {
        return false;
    }
    let children = para.children_mut().expect("container");
    let mut prefixed = PathPrefixRecorder::new(recorder, idx);
    insert_at(&mut *children[idx], position - base, text, &mut prefixed)
}

fn split_at(para: &mut dyn Paragraph, position: usize, recorder: &mut dyn UndoRecorder) -> bool {
    if para.children().is_empty() {
        return false;
    }
    let (idx, base) = owning_child(para.children(), position);
    if position < base {
        return false;
    }
    let local = position - base;
    let owner = para.state().owner;
    let children = para.children_mut().expect("container");
    if children[idx].is_container() {
        let mut prefixed = PathPrefixRecorder::new(recorder, idx);
        return split_at(&mut *children[idx], local, &mut prefixed);
    }
    if local >= children[idx].code_point_length() {
        return false;
    }
    let mut prefixed = PathPrefixRecorder::new(recorder, idx);
    let mut successor = children[idx].split(&mut prefixed, local);
    if let Some(owner) = owner {
        successor.on_attached(owner);
    }
    children.insert(idx + 1, successor);
    true
}

/// Delete `[start, end)` of `para`'s content when no single child can absorb
/// it: partial-delete the edge children, remove fully covered ones, and join
/// across the first child's deleted terminator.
fn restructure_delete(
    para: &mut dyn Paragraph,
    start: usize,
    end: usize,
    recorder: &mut dyn UndoRecorder,
) -> Option<TextRange> {
    debug_assert!(start < end);
    let spans: Vec<(usize, usize)> = {
        let mut base = 0usize;
        para.children()
            .iter()
            .map(|c| {
                let span = (base, c.code_point_length());
                base += span.1;
                span
            })
            .collect()
    };
    if spans.is_empty() {
        return None;
    }
    let owning = |pos: usize| {
        spans
            .iter()
            .position(|&(b, l)| pos >= b && pos < b + l)
            .unwrap_or(spans.len() - 1)
    };
    let first = owning(start);
    let last = owning(end - 1);
    let (first_base, first_len) = spans[first];

    // The whole extent strictly inside one container child: restructure there.
    if first == last
        && end < first_base + first_len
        && para.children()[first].is_container()
    {
        let children = para.children_mut()?;
        let mut prefixed = PathPrefixRecorder::new(recorder, first);
        restructure_delete(
            &mut *children[first],
            start - first_base,
            end - first_base,
            &mut prefixed,
        )?;
        return Some(TextRange::caret(start));
    }

    let crossed_terminator = end >= first_base + first_len;
    let first_survives = start > first_base;
    let children = para.children_mut()?;

    let mut removed: Vec<usize> = Vec::new();
    for i in first..=last {
        let (base, len) = spans[i];
        let f = start.max(base) - base;
        let t = end.min(base + len) - base;
        if f == 0 && t == len {
            removed.push(i);
        } else {
            delete_child_span(&mut *children[i], i, f, t, recorder)?;
        }
    }
    for &i in &removed {
        recorder.record(EditOp::RemoveParagraph {
            paragraph: ParagraphIndex(vec![i]),
        });
    }
    for &i in removed.iter().rev() {
        let mut gone = children.remove(i);
        gone.on_detached();
    }

    // The deletion consumed the first child's terminator: merge it with
    // whatever now follows, when the variants allow it.
    if crossed_terminator && first_survives {
        let right = first + 1;
        if right < children.len()
            && children[first].can_join_with(children[right].as_paragraph())
        {
            let next = children.remove(right);
            let mut prefixed = PathPrefixRecorder::new(recorder, first);
            if let Err(next) = children[first].try_join(next, &mut prefixed) {
                children.insert(right, next);
            }
        }
    }
    Some(TextRange::caret(start))
}

/// Delete the local span `[f, t)` of one child, where `t` may reach through
/// the child's terminator.
fn delete_child_span(
    child: &mut dyn Paragraph,
    index: usize,
    f: usize,
    t: usize,
    recorder: &mut dyn UndoRecorder,
) -> Option<()> {
    if f >= t {
        return Some(());
    }
    let mut prefixed = PathPrefixRecorder::new(recorder, index);
    let request = DeleteInfo::selection(TextRange::new(f, t));
    if child.delete_partial(request, &mut prefixed).is_some() {
        return Some(());
    }
    if child.is_container() {
        let limit = t.min(child.code_point_length());
        restructure_delete(child, f, limit, &mut prefixed)?;
        return Some(());
    }
    // Leaf that refused: the span reaches its terminator. Clamp to content;
    // the caller handles the terminator by removal or join.
    let content_len = child.code_point_length() - 1;
    let t = t.min(content_len);
    if f < t {
        child.delete_partial(
            DeleteInfo::selection(TextRange::new(f, t)),
            &mut prefixed,
        )?;
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaping::CellShaper;
    use crate::undo::MemoryRecorder;

    fn doc_with(texts: &[&str]) -> Document {
        let mut doc = Document::new(Box::new(CellShaper::default()));
        doc.set_available_width(80.0);
        doc.remove_paragraph(0);
        for text in texts {
            doc.append_paragraph(Box::new(TextParagraph::new(text)));
        }
        doc.layout();
        doc
    }

    #[test]
    fn test_new_document_has_one_empty_paragraph() {
        let mut doc = Document::new(Box::new(CellShaper::default()));
        doc.layout();
        assert_eq!(doc.code_point_length(), 1);
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.root().child_count(), 1);
    }

    #[test]
    fn test_insert_and_query() {
        let mut doc = doc_with(&["hello"]);
        let mut rec = MemoryRecorder::new();
        let landing = doc.insert_text(5, " world", &mut rec).expect("in range");
        assert_eq!(landing, TextRange::caret(11));
        doc.layout();
        assert_eq!(doc.text(0, 11).unwrap(), "hello world");
        let caret = doc.caret_info(CaretPosition::new(6)).expect("caret");
        assert_eq!(caret.caret_x, 6.0);
        assert!(matches!(rec.ops[0], EditOp::InsertText { .. }));
        assert!(rec.ops[0].paragraph().0 == vec![0]);
    }

    #[test]
    fn test_insert_past_end_is_an_error() {
        let mut doc = doc_with(&["ab"]);
        let mut rec = MemoryRecorder::new();
        assert!(matches!(
            doc.insert_text(3, "x", &mut rec),
            Err(EditError::PositionOutOfRange { .. })
        ));
        assert!(rec.ops.is_empty());
    }

    #[test]
    fn test_split_then_join_round_trip() {
        let mut doc = doc_with(&["hello world"]);
        let before = doc.full_text();
        let mut rec = MemoryRecorder::new();

        let landing = doc.split_paragraph(5, &mut rec).expect("in range");
        assert_eq!(landing, TextRange::caret(6));
        doc.layout();
        assert_eq!(doc.root().child_count(), 2);
        assert_eq!(doc.text(0, 5).unwrap(), "hello");
        assert_eq!(doc.code_point_length(), 13);

        let landing = doc.join_paragraphs(0, &mut rec).expect("joinable");
        assert_eq!(landing, TextRange::caret(5));
        doc.layout();
        assert_eq!(doc.full_text(), before);
        assert_eq!(doc.root().child_count(), 1);
    }

    #[test]
    fn test_backward_delete_at_paragraph_start_joins() {
        let mut doc = doc_with(&["ab", "cd"]);
        let mut rec = MemoryRecorder::new();
        // Position 3 is the start of "cd"; backspace eats the terminator.
        let landing = doc.delete(DeleteInfo::backward(3), &mut rec).expect("ok");
        assert_eq!(landing, TextRange::caret(2));
        doc.layout();
        assert_eq!(doc.root().child_count(), 1);
        assert_eq!(doc.full_text(), "abcd\u{2029}");
        assert!(rec.ops.iter().any(|op| matches!(op, EditOp::JoinParagraphs { .. })));
    }

    #[test]
    fn test_forward_delete_at_paragraph_end_joins() {
        let mut doc = doc_with(&["ab", "cd"]);
        let mut rec = MemoryRecorder::new();
        // Position 2 is "ab"'s terminator.
        let landing = doc.delete(DeleteInfo::forward(2), &mut rec).expect("ok");
        assert_eq!(landing, TextRange::caret(2));
        doc.layout();
        assert_eq!(doc.full_text(), "abcd\u{2029}");
    }

    #[test]
    fn test_delete_selection_across_paragraphs() {
        let mut doc = doc_with(&["hello", "midway", "world"]);
        // Spans: [0,6) [6,13) [13,19). Select "llo¶midway¶wo".
        let mut rec = MemoryRecorder::new();
        let landing = doc
            .delete(DeleteInfo::selection(TextRange::new(2, 15)), &mut rec)
            .expect("ok");
        assert_eq!(landing, TextRange::caret(2));
        doc.layout();
        assert_eq!(doc.root().child_count(), 1);
        assert_eq!(doc.full_text(), "herld\u{2029}");
        assert!(rec.ops.iter().any(|op| matches!(op, EditOp::RemoveParagraph { .. })));
        assert!(rec.ops.iter().any(|op| matches!(op, EditOp::JoinParagraphs { .. })));
    }

    #[test]
    fn test_delete_everything_leaves_one_empty_paragraph() {
        let mut doc = doc_with(&["ab", "cd"]);
        let mut rec = MemoryRecorder::new();
        let landing = doc
            .delete(DeleteInfo::selection(TextRange::new(0, 6)), &mut rec)
            .expect("ok");
        assert_eq!(landing, TextRange::caret(0));
        doc.layout();
        assert_eq!(doc.code_point_length(), 1);
        assert_eq!(doc.root().child_count(), 1);
    }

    #[test]
    fn test_backward_delete_at_document_start_is_a_no_op() {
        let mut doc = doc_with(&["ab"]);
        let mut rec = MemoryRecorder::new();
        let landing = doc.delete(DeleteInfo::backward(0), &mut rec).expect("ok");
        assert_eq!(landing, TextRange::caret(0));
        assert!(rec.ops.is_empty());
    }

    #[test]
    fn test_every_mutation_records_an_op() {
        let mut doc = doc_with(&["hello world"]);
        let mut rec = MemoryRecorder::new();
        doc.insert_text(0, "x", &mut rec).unwrap();
        doc.delete(DeleteInfo::forward(0), &mut rec).unwrap();
        doc.split_paragraph(5, &mut rec).unwrap();
        doc.join_paragraphs(0, &mut rec).unwrap();
        doc.apply_style(StyleId(1), TextRange::new(0, 4), &mut rec)
            .unwrap();
        assert_eq!(rec.ops.len(), 5);
    }

    #[test]
    fn test_paragraph_path_round_trip() {
        let doc = doc_with(&["ab", "cd"]);
        let second = doc
            .paragraph_at(&ParagraphIndex(vec![1]))
            .expect("resolves");
        assert_eq!(second.text(0, 2), "cd");
        let path = doc.paragraph_index_of(second).expect("found");
        assert_eq!(path, ParagraphIndex(vec![1]));
        assert!(doc.paragraph_at(&ParagraphIndex(vec![5])).is_none());
        assert_eq!(
            doc.paragraph_index_of(doc.root()),
            Some(ParagraphIndex::root())
        );
    }

    #[test]
    fn test_join_incompatible_reports_error() {
        let mut doc = doc_with(&["ab"]);
        doc.append_paragraph(Box::new(PanelParagraph::with_children(vec![Box::new(
            TextParagraph::new("cd"),
        )])));
        doc.layout();
        let mut rec = MemoryRecorder::new();
        assert_eq!(
            doc.join_paragraphs(0, &mut rec),
            Err(EditError::CannotJoin { index: 0 })
        );
        assert_eq!(
            doc.join_paragraphs(1, &mut rec),
            Err(EditError::CannotJoin { index: 1 })
        );
    }

    #[test]
    fn test_global_offsets_compose_through_nesting() {
        let mut doc = Document::new(Box::new(CellShaper::default()));
        doc.remove_paragraph(0);
        doc.append_paragraph(Box::new(TextParagraph::new("ab")));
        doc.append_paragraph(Box::new(PanelParagraph::with_children(vec![
            Box::new(TextParagraph::new("cd")),
            Box::new(TextParagraph::new("ef")),
        ])));
        doc.set_available_width(80.0);
        doc.layout();

        // The nested "ef" leaf starts at code point 6, line 2, y 2.
        let leaf = doc
            .paragraph_at(&ParagraphIndex(vec![1, 1]))
            .expect("resolves");
        let global = leaf.state().global_info;
        assert_eq!(global.code_point_index, 6);
        assert_eq!(global.line_index, 2);
        assert_eq!(global.content_position.y, 2.0);

        // Decomposed leaf runs stay inside the query selection (global).
        let info = doc.selection_info(TextRange::new(1, 8));
        for run in &info.recursive_interacting_runs {
            let range = run.global_range();
            assert!(range.minimum() >= 1 && range.maximum() <= 8);
        }
    }

    #[test]
    fn test_delete_inside_nested_panel_restructures_locally() {
        let mut doc = Document::new(Box::new(CellShaper::default()));
        doc.remove_paragraph(0);
        doc.append_paragraph(Box::new(PanelParagraph::with_children(vec![
            Box::new(TextParagraph::new("ab")),
            Box::new(TextParagraph::new("cd")),
        ])));
        doc.set_available_width(80.0);
        doc.layout();

        // Backspace at the nested "cd" start joins the inner siblings.
        let mut rec = MemoryRecorder::new();
        let landing = doc.delete(DeleteInfo::backward(3), &mut rec).expect("ok");
        assert_eq!(landing, TextRange::caret(2));
        doc.layout();
        assert_eq!(doc.full_text(), "abcd\u{2029}");
        let join = rec
            .ops
            .iter()
            .find(|op| matches!(op, EditOp::JoinParagraphs { .. }))
            .expect("join recorded");
        assert_eq!(join.paragraph().0, vec![0, 0]);
    }
}
