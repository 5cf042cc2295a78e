//! The local/global offset record attached to every paragraph after layout,
//! and the space-conversion operators built on it.
//!
//! This is the single place coordinate math happens: every paragraph answers
//! queries in its own local frame, and the caller composes these offsets to
//! cross a paragraph boundary. The operators must compose associatively across
//! arbitrary nesting depth, and for every supported value `v` the round trip
//! `offset_to_this(offset_from_this(v)) == v` holds.

use crate::caret::{CaretInfo, HitTestResult, LineInfo};
use crate::geometry::Point;
use crate::types::{CaretPosition, DeleteInfo, TextRange};

/// A paragraph's position within its parent (or the document, for the global
/// variant): content origin, starting code point index, starting visual line
/// index and starting display line index.
///
/// `local` is relative to the parent's content origin; `global` is only valid
/// after the enclosing tree has completed a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutInfo {
    /// Coordinate of this paragraph's content origin (after applying margin).
    pub content_position: Point,
    /// Code point index of this paragraph relative to the enclosing start.
    pub code_point_index: usize,
    /// Visual line index of this paragraph relative to the enclosing start.
    pub line_index: usize,
    /// Display line index of this paragraph relative to the enclosing start.
    pub display_line_index: usize,
}

impl LayoutInfo {
    /// Create a new offset record.
    pub fn new(
        content_position: Point,
        code_point_index: usize,
        line_index: usize,
        display_line_index: usize,
    ) -> Self {
        Self {
            content_position,
            code_point_index,
            line_index,
            display_line_index,
        }
    }

    /// Combine this (local) offset with the parent's already-resolved global
    /// offset to produce this paragraph's global offset. Pure addition; applied
    /// once per paragraph per layout pass, top-down.
    pub fn offset_to_global(&self, parent_global_info: &LayoutInfo) -> LayoutInfo {
        LayoutInfo {
            content_position: self
                .content_position
                .offset(parent_global_info.content_position),
            code_point_index: self.code_point_index + parent_global_info.code_point_index,
            line_index: self.line_index + parent_global_info.line_index,
            display_line_index: self.display_line_index + parent_global_info.display_line_index,
        }
    }

    /// Inject this paragraph's offsets into a value expressed in this
    /// paragraph's local space, producing the parent-space equivalent.
    pub fn offset_from_this<T: Offsetable>(&self, value: T) -> T {
        value.offset_by(self)
    }

    /// Strip this paragraph's offsets from a value expressed in the parent's
    /// space, producing the local-space equivalent.
    ///
    /// The value must lie within this paragraph's span; translating a value
    /// that starts before it is a caller contract violation (panics in debug
    /// builds via unsigned underflow).
    pub fn offset_to_this<T: Offsetable>(&self, value: T) -> T {
        value.unoffset_by(self)
    }

    /// Strip this paragraph's horizontal offset from a bare x coordinate.
    pub fn x_to_this(&self, x: f32) -> f32 {
        x - self.content_position.x
    }

    /// Strip this paragraph's vertical offset from a bare y coordinate.
    pub fn y_to_this(&self, y: f32) -> f32 {
        y - self.content_position.y
    }
}

/// Values that can cross a paragraph boundary by injecting or stripping a
/// [`LayoutInfo`]'s components. Only valid (non-`None`) fields are adjusted.
pub trait Offsetable {
    /// Local space to parent space.
    fn offset_by(self, info: &LayoutInfo) -> Self;
    /// Parent space to local space.
    fn unoffset_by(self, info: &LayoutInfo) -> Self;
}

impl Offsetable for CaretInfo {
    fn offset_by(mut self, info: &LayoutInfo) -> Self {
        self.code_point_index += info.code_point_index;
        self.caret_x += info.content_position.x;
        self.caret_rect = self.caret_rect.offset(info.content_position);
        self.line_index += info.line_index;
        self
    }

    fn unoffset_by(mut self, info: &LayoutInfo) -> Self {
        self.code_point_index -= info.code_point_index;
        self.caret_x -= info.content_position.x;
        self.caret_rect = self.caret_rect.offset(Point::new(
            -info.content_position.x,
            -info.content_position.y,
        ));
        self.line_index -= info.line_index;
        self
    }
}

impl Offsetable for HitTestResult {
    fn offset_by(mut self, info: &LayoutInfo) -> Self {
        self.closest_line = self.closest_line.map(|l| l + info.line_index);
        self.over_line = self.over_line.map(|l| l + info.line_index);
        self.closest_code_point_index = self
            .closest_code_point_index
            .map(|i| i + info.code_point_index);
        self.over_code_point_index = self
            .over_code_point_index
            .map(|i| i + info.code_point_index);
        self
    }

    fn unoffset_by(mut self, info: &LayoutInfo) -> Self {
        self.closest_line = self.closest_line.map(|l| l - info.line_index);
        self.over_line = self.over_line.map(|l| l - info.line_index);
        self.closest_code_point_index = self
            .closest_code_point_index
            .map(|i| i - info.code_point_index);
        self.over_code_point_index = self
            .over_code_point_index
            .map(|i| i - info.code_point_index);
        self
    }
}

impl Offsetable for LineInfo {
    fn offset_by(mut self, info: &LayoutInfo) -> Self {
        self.line += info.line_index;
        self.start = self.start.offset_by(info);
        self.end = self.end.offset_by(info);
        self.prev_line = self.prev_line.map(|l| l + info.line_index);
        self.next_line = self.next_line.map(|l| l + info.line_index);
        self
    }

    fn unoffset_by(mut self, info: &LayoutInfo) -> Self {
        self.line -= info.line_index;
        self.start = self.start.unoffset_by(info);
        self.end = self.end.unoffset_by(info);
        self.prev_line = self.prev_line.map(|l| l - info.line_index);
        self.next_line = self.next_line.map(|l| l - info.line_index);
        self
    }
}

impl Offsetable for CaretPosition {
    fn offset_by(self, info: &LayoutInfo) -> Self {
        CaretPosition::with_alt_position(
            self.code_point_index + info.code_point_index,
            self.alt_position,
        )
    }

    fn unoffset_by(self, info: &LayoutInfo) -> Self {
        CaretPosition::with_alt_position(
            self.code_point_index - info.code_point_index,
            self.alt_position,
        )
    }
}

impl Offsetable for TextRange {
    fn offset_by(self, info: &LayoutInfo) -> Self {
        TextRange::with_alt_position(
            self.start + info.code_point_index,
            self.end + info.code_point_index,
            self.alt_position,
        )
    }

    fn unoffset_by(self, info: &LayoutInfo) -> Self {
        TextRange::with_alt_position(
            self.start - info.code_point_index,
            self.end - info.code_point_index,
            self.alt_position,
        )
    }
}

impl Offsetable for DeleteInfo {
    fn offset_by(self, info: &LayoutInfo) -> Self {
        self.with_range(self.range.offset_by(info))
    }

    fn unoffset_by(self, info: &LayoutInfo) -> Self {
        self.with_range(self.range.unoffset_by(info))
    }
}

impl Offsetable for Point {
    fn offset_by(self, info: &LayoutInfo) -> Self {
        self.offset(info.content_position)
    }

    fn unoffset_by(self, info: &LayoutInfo) -> Self {
        Point::new(
            self.x - info.content_position.x,
            self.y - info.content_position.y,
        )
    }
}
