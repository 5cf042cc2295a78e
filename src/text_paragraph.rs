//! The leaf text paragraph variant.
//!
//! Stores its code points in a rope, always terminated by a single paragraph
//! terminator (U+2029) which counts toward `code_point_length`, so an empty
//! paragraph still occupies one code point and one visual line. Layout runs
//! the line breaker over the code points and greedily fills lines against the
//! available width using the external shaper's advances.

use crate::caret::{CaretInfo, HitTestResult, LineInfo};
use crate::geometry::{Point, Rect, Thickness};
use crate::linebreak::LineBreaker;
use crate::paragraph::{LayoutContext, PaintOptions, ParaState, Paragraph, RenderSurface};
use crate::style::{StyleId, StyleRun, StyleRunList};
use crate::types::{CaretPosition, DeleteInfo, DeleteMode, ParagraphIndex, TextRange};
use crate::undo::{EditOp, UndoRecorder};
use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;

/// The paragraph terminator code point every text paragraph ends with.
pub const PARAGRAPH_TERMINATOR: char = '\u{2029}';

/// One laid-out visual line.
#[derive(Debug, Clone, Copy)]
struct LayoutLine {
    /// Code point index of the line start.
    start: usize,
    /// Code point index of the next line start (wrap position).
    end: usize,
    /// End of the measured extent (excludes trailing whitespace and break
    /// characters).
    measure_end: usize,
    /// Measured width.
    width: f32,
    /// Top edge, relative to the content origin.
    top: f32,
    /// Line height.
    height: f32,
}

/// A leaf paragraph holding styled text.
pub struct TextParagraph {
    state: ParaState,
    rope: Rope,
    styles: StyleRunList,
    lines: Vec<LayoutLine>,
    /// Per-code-point advances from the last layout pass.
    advances: Vec<f32>,
    content_width: f32,
    content_height: f32,
}

impl TextParagraph {
    /// Create a paragraph over `text` (which should not itself contain a
    /// paragraph terminator; one is appended).
    pub fn new(text: &str) -> Self {
        let mut rope = Rope::from_str(text);
        rope.insert_char(rope.len_chars(), PARAGRAPH_TERMINATOR);
        let length = rope.len_chars();
        Self {
            state: ParaState::default(),
            rope,
            styles: StyleRunList::new(length),
            lines: Vec::new(),
            advances: Vec::new(),
            content_width: 0.0,
            content_height: 0.0,
        }
    }

    /// An empty paragraph (terminator only).
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Create a paragraph with an explicit margin.
    pub fn with_margin(text: &str, margin: Thickness) -> Self {
        let mut para = Self::new(text);
        para.state.margin = margin;
        para
    }

    fn from_parts(rope: Rope, styles: StyleRunList, margin: Thickness) -> Self {
        debug_assert_eq!(styles.total_length(), rope.len_chars());
        Self {
            state: ParaState {
                margin,
                ..ParaState::default()
            },
            rope,
            styles,
            lines: Vec::new(),
            advances: Vec::new(),
            content_width: 0.0,
            content_height: 0.0,
        }
    }

    /// Content length in code points, excluding the terminator.
    pub fn content_length(&self) -> usize {
        self.rope.len_chars() - 1
    }

    /// The paragraph's text without the terminator.
    pub fn content_text(&self) -> String {
        self.text(0, self.content_length())
    }

    /// Resolve a delete request to a concrete local code point range, or
    /// `None` when the request cannot be satisfied without restructuring
    /// (deleting the terminator, or stepping outside this paragraph).
    fn resolve_delete_range(&self, delete_info: DeleteInfo) -> Option<(usize, usize)> {
        let content_len = self.content_length();
        match delete_info.mode {
            DeleteMode::Selection => {
                let start = delete_info.range.minimum();
                let end = delete_info.range.maximum();
                (end <= content_len).then_some((start, end))
            }
            DeleteMode::Forward => {
                let pos = delete_info.range.minimum();
                (pos < content_len).then_some((pos, pos + 1))
            }
            DeleteMode::Backward => {
                let pos = delete_info.range.minimum();
                (pos >= 1 && pos <= content_len).then(|| (pos - 1, pos))
            }
        }
    }

    fn line_index_for_position(&self, position: CaretPosition) -> Option<usize> {
        let cp = position.code_point_index;
        if cp >= self.rope.len_chars() {
            return None;
        }
        let mut line_index = self
            .lines
            .iter()
            .position(|l| cp >= l.start && cp < l.end)?;
        // Alt affinity: a caret exactly on a wrap boundary renders at the end
        // of the previous line.
        if position.alt_position && line_index > 0 && cp == self.lines[line_index].start {
            line_index -= 1;
        }
        Some(line_index)
    }

    fn x_for_code_point(&self, line: &LayoutLine, cp: usize) -> f32 {
        self.advances[line.start..cp].iter().sum()
    }

    fn assert_layout_valid(&self) {
        assert!(
            !self.lines.is_empty(),
            "text paragraph queried before layout"
        );
    }
}

impl Paragraph for TextParagraph {
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
        let chars: Vec<char> = self.rope.chars().collect();
        let shaper = ctx.shaper;
        let max_width = ctx.available_width.max(0.0);

        let advances: Vec<f32> = chars
            .iter()
            .enumerate()
            .map(|(i, &ch)| shaper.advance(ch, self.styles.style_at(i)))
            .collect();
        let measure = |from: usize, to: usize| -> f32 { advances[from..to].iter().sum() };

        let mut lines: Vec<LayoutLine> = Vec::new();
        let mut line_start = 0usize;
        let mut last_fit: Option<crate::linebreak::LineBreak> = None;

        let mut push_line = |start: usize, brk: crate::linebreak::LineBreak| {
            let measure_end = brk.position_measure.max(start);
            lines.push(LayoutLine {
                start,
                end: brk.position_wrap,
                measure_end,
                width: measure(start, measure_end),
                top: 0.0,
                height: 0.0,
            });
            brk.position_wrap
        };

        for brk in LineBreaker::new(&chars) {
            loop {
                let measure_end = brk.position_measure.max(line_start);
                if measure(line_start, measure_end) <= max_width {
                    if brk.required {
                        line_start = push_line(line_start, brk);
                        last_fit = None;
                    } else {
                        last_fit = Some(brk);
                    }
                    break;
                }
                if let Some(fit) = last_fit.take() {
                    // Break at the last candidate that fit, then retry this
                    // candidate on the new line.
                    line_start = push_line(line_start, fit);
                    continue;
                }
                // Nothing fits: overflow the whole run onto one line.
                line_start = push_line(line_start, brk);
                break;
            }
        }
        if let Some(fit) = last_fit {
            // A trailing soft candidate without a following required break
            // cannot happen (the scanner always terminates with one), but do
            // not lose text if it ever does.
            push_line(line_start, fit);
        }

        // Second pass: vertical placement.
        let mut top = 0.0f32;
        let mut width = 0.0f32;
        for line in &mut lines {
            line.top = top;
            line.height = shaper.line_height(self.styles.style_at(line.start));
            top += line.height;
            width = width.max(line.width);
        }

        self.lines = lines;
        self.advances = advances;
        self.content_width = width;
        self.content_height = top;
    }

    fn paint(&self, surface: &mut dyn RenderSurface, options: &PaintOptions) {
        self.assert_layout_valid();
        let origin = self.state.global_info.content_position;

        // Selection highlight, clipped to this paragraph's span.
        if let Some(selection) = options.selection {
            let span = TextRange::new(
                self.state.global_info.code_point_index,
                self.state.global_info.code_point_index + self.code_point_length(),
            );
            if let Some(overlap) = selection.intersection(&span) {
                let local = self.state.global_info.offset_to_this(overlap);
                for line in &self.lines {
                    let from = local.minimum().max(line.start);
                    let to = local.maximum().min(line.measure_end);
                    if from < to {
                        let x = self.x_for_code_point(line, from);
                        let w = self.advances[from..to].iter().sum::<f32>();
                        surface.fill_rect(Rect::new(
                            origin.x + x,
                            origin.y + line.top,
                            w,
                            line.height,
                        ));
                    }
                }
            }
        }

        for line in &self.lines {
            let line_top = origin.y + line.top;
            if line_top + line.height < options.view_bounds.y
                || line_top >= options.view_bounds.bottom()
            {
                continue;
            }
            for run in self
                .styles
                .runs_in_range(line.start, line.measure_end - line.start)
            {
                let x = self.x_for_code_point(line, run.start);
                let text = self.text(run.start, run.length);
                surface.draw_text_run(Point::new(origin.x + x, line_top), &text, run.style);
            }
        }
    }

    fn caret_info(&self, position: CaretPosition) -> Option<CaretInfo> {
        self.assert_layout_valid();
        let line_index = self.line_index_for_position(position)?;
        let line = &self.lines[line_index];
        let cp = position.code_point_index;
        // An alt caret resolved to the previous line sits at its measured end.
        let x = if cp >= line.end {
            line.width
        } else {
            self.x_for_code_point(line, cp)
        };
        Some(CaretInfo {
            code_point_index: cp,
            caret_x: x,
            caret_rect: Rect::new(x, line.top, 0.0, line.height),
            line_index,
        })
    }

    fn line_info(&self, line: usize) -> LineInfo {
        self.assert_layout_valid();
        assert!(
            line < self.lines.len(),
            "line {line} out of range for {} lines",
            self.lines.len()
        );
        let l = &self.lines[line];
        LineInfo {
            line,
            start: CaretPosition::new(l.start),
            end: CaretPosition::with_alt_position(l.measure_end, true),
            prev_line: line.checked_sub(1),
            next_line: (line + 1 < self.lines.len()).then_some(line + 1),
        }
    }

    fn hit_test(&self, pt: Point) -> HitTestResult {
        self.assert_layout_valid();
        let over = self
            .lines
            .iter()
            .position(|l| pt.y >= l.top && pt.y < l.top + l.height);
        let closest = over.unwrap_or(if pt.y < 0.0 { 0 } else { self.lines.len() - 1 });
        let mut result = self.hit_test_line(closest, pt.x);
        if over.is_none() {
            result.over_line = None;
            result.over_code_point_index = None;
        }
        result
    }

    fn hit_test_line(&self, line_index: usize, x: f32) -> HitTestResult {
        self.assert_layout_valid();
        assert!(
            line_index < self.lines.len(),
            "line {line_index} out of range for {} lines",
            self.lines.len()
        );
        let line = &self.lines[line_index];
        let over_line = (x >= 0.0 && x < line.width.max(f32::MIN_POSITIVE)).then_some(line_index);

        let mut acc = 0.0f32;
        let mut closest = line.measure_end;
        let mut over = None;
        for cp in line.start..line.measure_end {
            let advance = self.advances[cp];
            if x < acc + advance {
                over = (x >= 0.0).then_some(cp);
                closest = if x < acc + advance / 2.0 { cp } else { cp + 1 };
                break;
            }
            acc += advance;
        }
        if x < 0.0 {
            closest = line.start;
        }
        HitTestResult {
            closest_line: Some(line_index),
            over_line,
            closest_code_point_index: Some(closest),
            over_code_point_index: over,
        }
    }

    fn caret_indices(&self) -> Vec<usize> {
        let content = self.content_text();
        let mut indices = Vec::new();
        let mut char_index = 0usize;
        for (_, grapheme) in content.grapheme_indices(true) {
            indices.push(char_index);
            char_index += grapheme.chars().count();
        }
        indices.push(char_index);
        indices
    }

    fn word_boundary_indices(&self) -> Vec<usize> {
        let content = self.content_text();
        let mut indices = Vec::new();
        let mut char_index = 0usize;
        for (_, word) in content.split_word_bound_indices() {
            indices.push(char_index);
            char_index += word.chars().count();
        }
        indices.push(char_index);
        indices
    }

    fn code_point_length(&self) -> usize {
        self.rope.len_chars()
    }

    fn line_count(&self) -> usize {
        self.lines.len().max(1)
    }

    fn content_width_override(&self) -> f32 {
        self.content_width
    }

    fn content_height_override(&self) -> f32 {
        self.content_height
    }

    fn can_delete_partial(&self, delete_info: DeleteInfo) -> Option<TextRange> {
        self.resolve_delete_range(delete_info)
            .map(|(start, _)| TextRange::caret(start))
    }

    fn delete_partial(
        &mut self,
        delete_info: DeleteInfo,
        recorder: &mut dyn UndoRecorder,
    ) -> Option<TextRange> {
        let (start, end) = self.resolve_delete_range(delete_info)?;
        if start < end {
            recorder.record(EditOp::DeleteText {
                paragraph: ParagraphIndex::root(),
                offset: start,
                deleted: self.text(start, end - start),
                deleted_styles: self.styles.runs_in_range(start, end - start),
            });
            self.rope.remove(start..end);
            self.styles.delete(start, end - start);
        }
        Some(TextRange::caret(start))
    }

    fn can_join_with(&self, other: &dyn Paragraph) -> bool {
        other.as_any().is::<TextParagraph>()
    }

    fn try_join(
        &mut self,
        next: Box<dyn Paragraph>,
        recorder: &mut dyn UndoRecorder,
    ) -> Result<(), Box<dyn Paragraph>> {
        if !self.can_join_with(next.as_paragraph()) {
            return Err(next);
        }
        let join_index = self.content_length();
        let next_text = next.text(0, next.code_point_length() - 1);
        let next_styles = StyleRunList::from_runs(
            next.styles_in_range(0, next.code_point_length()),
        );

        recorder.record(EditOp::JoinParagraphs {
            paragraph: ParagraphIndex::root(),
            join_index,
        });

        // Drop our terminator, then take the successor's content and its
        // terminator (and the styles covering both).
        self.rope.remove(join_index..join_index + 1);
        self.rope.insert(join_index, &next_text);
        self.rope
            .insert_char(self.rope.len_chars(), PARAGRAPH_TERMINATOR);
        self.styles.delete(join_index, 1);
        self.styles.append(&next_styles);
        debug_assert_eq!(self.styles.total_length(), self.rope.len_chars());
        Ok(())
    }

    fn split(&mut self, recorder: &mut dyn UndoRecorder, split_index: usize) -> Box<dyn Paragraph> {
        let content_len = self.content_length();
        assert!(
            split_index <= content_len,
            "split index {split_index} out of range for content length {content_len}"
        );

        recorder.record(EditOp::SplitParagraph {
            paragraph: ParagraphIndex::root(),
            split_index,
        });

        // Successor takes the suffix plus the original terminator; the
        // original keeps the prefix and regains a terminator of its own.
        let tail_rope = Rope::from_str(&self.text(split_index, self.rope.len_chars() - split_index));
        let tail_styles = self.styles.split_off(split_index);
        self.rope.remove(split_index..content_len);
        self.styles.extend_last(1);
        debug_assert_eq!(self.styles.total_length(), self.rope.len_chars());
        Box::new(TextParagraph::from_parts(
            tail_rope,
            tail_styles,
            self.state.margin,
        ))
    }

    fn insert_text(
        &mut self,
        position: usize,
        text: &str,
        recorder: &mut dyn UndoRecorder,
    ) -> bool {
        assert!(
            position <= self.content_length(),
            "insert position {position} out of range"
        );
        if text.is_empty() {
            return true;
        }
        recorder.record(EditOp::InsertText {
            paragraph: ParagraphIndex::root(),
            offset: position,
            text: text.to_string(),
        });
        self.rope.insert(position, text);
        self.styles.insert(position, text.chars().count());
        true
    }

    fn style_at_position(&self, position: CaretPosition) -> StyleId {
        let cp = position
            .code_point_index
            .min(self.rope.len_chars().saturating_sub(1));
        self.styles.style_at(cp)
    }

    fn styles_in_range(&self, position: usize, length: usize) -> Vec<StyleRun> {
        self.styles.runs_in_range(position, length)
    }

    fn apply_style(
        &mut self,
        style: StyleId,
        position: usize,
        length: usize,
        recorder: &mut dyn UndoRecorder,
    ) {
        assert!(
            position + length <= self.rope.len_chars(),
            "style range out of bounds"
        );
        recorder.record(EditOp::ApplyStyle {
            paragraph: ParagraphIndex::root(),
            offset: position,
            length,
            previous: self.styles.runs_in_range(position, length),
        });
        self.styles.apply(style, position, length);
    }

    fn append_text_to_buffer(&self, buffer: &mut String, position: usize, length: usize) {
        assert!(
            position + length <= self.rope.len_chars(),
            "text range out of bounds"
        );
        for chunk in self.rope.slice(position..position + length).chunks() {
            buffer.push_str(chunk);
        }
    }
}
