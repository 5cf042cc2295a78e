//! The vertical stack container variant.
//!
//! A panel owns an ordered list of child paragraphs, stacks them top to bottom
//! with their margins, and answers every query by routing it to the child that
//! owns the position, translating into the child's local space on the way down
//! and lifting the answer back through the child's [`LayoutInfo`] on the way
//! up.

use crate::caret::{CaretInfo, HitTestResult, LineInfo};
use crate::geometry::{Point, Rect};
use crate::layout_info::LayoutInfo;
use crate::paragraph::{LayoutContext, PaintOptions, ParaState, Paragraph, RenderSurface};
use crate::selection::SubRunInfo;
use crate::style::{StyleId, StyleRun};
use crate::types::{CaretPosition, DeleteInfo, DeleteMode, TextRange};
use crate::undo::{PathPrefixRecorder, UndoRecorder};

/// A container paragraph stacking its children vertically.
#[derive(Default)]
pub struct PanelParagraph {
    state: ParaState,
    children: Vec<Box<dyn Paragraph>>,
    content_width: f32,
    content_height: f32,
}

impl PanelParagraph {
    /// An empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// A panel over an initial child list.
    pub fn with_children(children: Vec<Box<dyn Paragraph>>) -> Self {
        let mut panel = Self::new();
        for child in children {
            panel.add_child(child);
        }
        panel
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Append a child.
    pub fn add_child(&mut self, child: Box<dyn Paragraph>) {
        self.insert_child(self.children.len(), child);
    }

    /// Insert a child at `index`.
    pub fn insert_child(&mut self, index: usize, mut child: Box<dyn Paragraph>) {
        if let Some(owner) = self.state.owner {
            child.on_attached(owner);
        }
        self.children.insert(index, child);
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Box<dyn Paragraph> {
        let mut child = self.children.remove(index);
        child.on_detached();
        child
    }

    /// The index of the child owning code point `position`. The terminal
    /// position belongs to the last child.
    fn child_index_for_code_point(&self, position: usize) -> usize {
        assert!(!self.children.is_empty(), "empty panel queried");
        self.children
            .iter()
            .position(|c| {
                let base = c.state().local_info.code_point_index;
                position >= base && position < base + c.code_point_length()
            })
            .unwrap_or(self.children.len() - 1)
    }

    fn child_index_for_line(&self, line: usize) -> usize {
        assert!(!self.children.is_empty(), "empty panel queried");
        self.children
            .iter()
            .position(|c| {
                let base = c.state().local_info.line_index;
                line >= base && line < base + c.line_count()
            })
            .unwrap_or(self.children.len() - 1)
    }

    /// The index of the child whose vertical band (margins included) contains
    /// `y`, clamped to the first/last child outside the stack.
    fn child_index_for_y(&self, y: f32) -> usize {
        assert!(!self.children.is_empty(), "empty panel queried");
        let mut top = 0.0f32;
        for (i, child) in self.children.iter().enumerate() {
            let bottom = top + child.content_height();
            if y < bottom {
                return i;
            }
            top = bottom;
        }
        self.children.len() - 1
    }

    /// Resolve a delete request down to the single child it lands in, or
    /// `None` when it spans a child boundary or touches a terminator.
    fn locate_delete(&self, delete_info: DeleteInfo) -> Option<(usize, DeleteInfo)> {
        if self.children.is_empty() {
            return None;
        }
        // The full extent the request may touch, in this panel's space.
        let (start, end) = match delete_info.mode {
            DeleteMode::Selection => (delete_info.range.minimum(), delete_info.range.maximum()),
            DeleteMode::Forward => {
                let pos = delete_info.range.minimum();
                (pos, pos + 1)
            }
            DeleteMode::Backward => {
                let pos = delete_info.range.minimum();
                (pos.checked_sub(1)?, pos)
            }
        };
        let child_index = self.child_index_for_code_point(start);
        let child = &self.children[child_index];
        let info = child.state().local_info;
        if end > info.code_point_index + child.code_point_length() {
            return None;
        }
        Some((child_index, info.offset_to_this(delete_info)))
    }
}

impl Paragraph for PanelParagraph {
    fn state(&self) -> &ParaState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ParaState {
        &mut self.state
    }

    fn as_paragraph(&self) -> &dyn Paragraph {
        self
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn layout_override(&mut self, ctx: &LayoutContext<'_>) {
        let mut y = 0.0f32;
        let mut code_point_index = 0usize;
        let mut line_index = 0usize;
        let mut display_line_index = 0usize;
        let mut width = 0.0f32;

        for child in &mut self.children {
            child.layout(ctx);
            let margin = child.state().margin;
            child.state_mut().local_info = LayoutInfo::new(
                Point::new(margin.left, y + margin.top),
                code_point_index,
                line_index,
                display_line_index,
            );
            y += child.content_height();
            code_point_index += child.code_point_length();
            line_index += child.line_count();
            display_line_index += child.display_line_count();
            width = width.max(child.content_width());
        }

        self.content_width = width;
        self.content_height = y;
    }

    fn paint(&self, surface: &mut dyn RenderSurface, options: &PaintOptions) {
        for child in &self.children {
            let global = child.state().global_info;
            let bounds = Rect::new(
                global.content_position.x,
                global.content_position.y,
                child.content_width_override(),
                child.content_height_override(),
            );
            if bounds.intersects(&options.view_bounds) {
                child.paint(surface, options);
            }
        }
    }

    fn caret_info(&self, position: CaretPosition) -> Option<CaretInfo> {
        if self.children.is_empty() {
            return None;
        }
        let child = &self.children[self.child_index_for_code_point(position.code_point_index)];
        let info = child.state().local_info;
        if position.code_point_index < info.code_point_index {
            return None;
        }
        child
            .caret_info(info.offset_to_this(position))
            .map(|c| info.offset_from_this(c))
    }

    fn line_info(&self, line: usize) -> LineInfo {
        assert!(
            line < self.line_count(),
            "line {line} out of range for {} lines",
            self.line_count()
        );
        let child_index = self.child_index_for_line(line);
        let child = &self.children[child_index];
        let info = child.state().local_info;
        let mut result = info.offset_from_this(child.line_info(line - info.line_index));
        // Stitch neighbor lines across child boundaries.
        if result.prev_line.is_none() && child_index > 0 {
            result.prev_line = Some(info.line_index - 1);
        }
        if result.next_line.is_none() && child_index + 1 < self.children.len() {
            result.next_line = Some(info.line_index + child.line_count());
        }
        result
    }

    fn hit_test(&self, pt: Point) -> HitTestResult {
        if self.children.is_empty() {
            return HitTestResult::none();
        }
        let child = &self.children[self.child_index_for_y(pt.y)];
        let info = child.state().local_info;
        info.offset_from_this(child.hit_test(info.offset_to_this(pt)))
    }

    fn hit_test_line(&self, line_index: usize, x: f32) -> HitTestResult {
        assert!(
            line_index < self.line_count(),
            "line {line_index} out of range for {} lines",
            self.line_count()
        );
        let child = &self.children[self.child_index_for_line(line_index)];
        let info = child.state().local_info;
        info.offset_from_this(child.hit_test_line(line_index - info.line_index, info.x_to_this(x)))
    }

    fn caret_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for child in &self.children {
            let base = child.state().local_info.code_point_index;
            out.extend(child.caret_indices().into_iter().map(|i| base + i));
        }
        out
    }

    fn word_boundary_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for child in &self.children {
            let base = child.state().local_info.code_point_index;
            out.extend(child.word_boundary_indices().into_iter().map(|i| base + i));
        }
        out
    }

    fn code_point_length(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.code_point_length())
            .sum::<usize>()
            .max(1)
    }

    fn line_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.line_count())
            .sum::<usize>()
            .max(1)
    }

    fn display_line_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.display_line_count())
            .sum::<usize>()
            .max(1)
    }

    fn content_width_override(&self) -> f32 {
        self.content_width
    }

    fn content_height_override(&self) -> f32 {
        self.content_height
    }

    fn can_delete_partial(&self, delete_info: DeleteInfo) -> Option<TextRange> {
        let (child_index, local) = self.locate_delete(delete_info)?;
        let child = &self.children[child_index];
        child
            .can_delete_partial(local)
            .map(|r| child.state().local_info.offset_from_this(r))
    }

    fn delete_partial(
        &mut self,
        delete_info: DeleteInfo,
        recorder: &mut dyn UndoRecorder,
    ) -> Option<TextRange> {
        let (child_index, local) = self.locate_delete(delete_info)?;
        let child = &mut self.children[child_index];
        let mut prefixed = PathPrefixRecorder::new(recorder, child_index);
        let landing = child.delete_partial(local, &mut prefixed)?;
        Some(child.state().local_info.offset_from_this(landing))
    }

    fn split(
        &mut self,
        recorder: &mut dyn UndoRecorder,
        split_index: usize,
    ) -> Box<dyn Paragraph> {
        let mut tail = PanelParagraph::new();
        tail.state.margin = self.state.margin;
        if self.children.is_empty() {
            return Box::new(tail);
        }
        // Owning child by live lengths; the split may run mid-edit, before
        // local offsets are refreshed.
        let mut idx = 0usize;
        let mut base = 0usize;
        while idx + 1 < self.children.len() {
            let len = self.children[idx].code_point_length();
            if split_index < base + len {
                break;
            }
            base += len;
            idx += 1;
        }
        let local = split_index - base;
        if local == 0 {
            tail.children.extend(self.children.drain(idx..));
        } else if local < self.children[idx].code_point_length() {
            let mut prefixed = PathPrefixRecorder::new(recorder, idx);
            let successor = self.children[idx].split(&mut prefixed, local);
            tail.children.push(successor);
            tail.children.extend(self.children.drain(idx + 1..));
        }
        if let Some(owner) = self.state.owner {
            tail.on_attached(owner);
        }
        Box::new(tail)
    }

    fn style_at_position(&self, position: CaretPosition) -> StyleId {
        if self.children.is_empty() {
            return StyleId::DEFAULT;
        }
        let child = &self.children[self.child_index_for_code_point(position.code_point_index)];
        child.style_at_position(child.state().local_info.offset_to_this(position))
    }

    fn styles_in_range(&self, position: usize, length: usize) -> Vec<StyleRun> {
        let end = position + length;
        let mut out = Vec::new();
        for child in &self.children {
            let base = child.state().local_info.code_point_index;
            let child_end = base + child.code_point_length();
            if child_end <= position || base >= end {
                continue;
            }
            let from = position.max(base) - base;
            let to = end.min(child_end) - base;
            for run in child.styles_in_range(from, to - from) {
                out.push(StyleRun::new(base + run.start, run.length, run.style));
            }
        }
        out
    }

    fn apply_style(
        &mut self,
        style: StyleId,
        position: usize,
        length: usize,
        recorder: &mut dyn UndoRecorder,
    ) {
        let end = position + length;
        for (child_index, child) in self.children.iter_mut().enumerate() {
            let base = child.state().local_info.code_point_index;
            let child_end = base + child.code_point_length();
            if child_end <= position || base >= end {
                continue;
            }
            let from = position.max(base) - base;
            let to = end.min(child_end) - base;
            let mut prefixed = PathPrefixRecorder::new(recorder, child_index);
            child.apply_style(style, from, to - from, &mut prefixed);
        }
    }

    fn append_text_to_buffer(&self, buffer: &mut String, position: usize, length: usize) {
        let end = position + length;
        for child in &self.children {
            let base = child.state().local_info.code_point_index;
            let child_end = base + child.code_point_length();
            if child_end <= position || base >= end {
                continue;
            }
            let from = position.max(base) - base;
            let to = end.min(child_end) - base;
            child.append_text_to_buffer(buffer, from, to - from);
        }
    }

    fn is_container(&self) -> bool {
        true
    }

    fn children(&self) -> &[Box<dyn Paragraph>] {
        &self.children
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Box<dyn Paragraph>>> {
        Some(&mut self.children)
    }

    fn interacting_runs(&self, selection: TextRange) -> Vec<SubRunInfo<'_>> {
        let sel_start = selection.minimum();
        let sel_end = selection.maximum();
        let mut out = Vec::new();
        for child in &self.children {
            let base = child.state().local_info.code_point_index;
            let length = child.code_point_length();
            let child_end = base + length;
            let overlaps = if sel_start == sel_end {
                // A caret interacts with the child that owns its position.
                sel_start >= base && sel_start < child_end
            } else {
                sel_start < child_end && sel_end > base
            };
            if !overlaps {
                continue;
            }
            let from = sel_start.max(base) - base;
            let to = sel_end.min(child_end) - base;
            out.push(SubRunInfo {
                paragraph: child.as_paragraph(),
                offset: from,
                length: to - from,
                partial: !(from == 0 && to >= length),
            });
        }
        out
    }

    fn interacting_runs_recursive(&self, selection: TextRange) -> Vec<SubRunInfo<'_>> {
        let mut out = Vec::new();
        for run in self.interacting_runs(selection) {
            if run.paragraph.is_container() {
                out.extend(run.paragraph.interacting_runs_recursive(run.local_range()));
            } else {
                out.push(run);
            }
        }
        out
    }
}
