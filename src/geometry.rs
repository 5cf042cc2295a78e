//! Small geometry value types used by layout, hit-testing and painting.
//!
//! Coordinates are `f32` and expressed either in a paragraph's local content
//! space or in document space, depending on context. Conversion between the two
//! happens exclusively through [`crate::LayoutInfo`].

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Return this point translated by `other`.
    pub fn offset(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// An axis-aligned rectangle (origin + size).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width (non-negative).
    pub width: f32,
    /// Height (non-negative).
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Return this rectangle translated by `delta`.
    pub fn offset(self, delta: Point) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }

    /// Whether `pt` lies inside this rectangle (half-open on right/bottom).
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x < self.right() && pt.y >= self.y && pt.y < self.bottom()
    }

    /// Whether this rectangle and `other` overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Four-sided spacing around a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thickness {
    /// Left spacing.
    pub left: f32,
    /// Top spacing.
    pub top: f32,
    /// Right spacing.
    pub right: f32,
    /// Bottom spacing.
    pub bottom: f32,
}

impl Thickness {
    /// Create a new thickness.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Uniform thickness on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Total horizontal spacing (`left + right`).
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical spacing (`top + bottom`).
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(2.0, 2.0, 10.0, 5.0);
        assert!(r.contains(Point::new(2.0, 2.0)));
        assert!(r.contains(Point::new(11.9, 6.9)));
        assert!(!r.contains(Point::new(12.0, 3.0)));
        assert!(!r.contains(Point::new(3.0, 7.0)));
    }

    #[test]
    fn test_rect_offset() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).offset(Point::new(10.0, 20.0));
        assert_eq!(r, Rect::new(11.0, 22.0, 3.0, 4.0));
    }

    #[test]
    fn test_thickness_totals() {
        let t = Thickness::new(2.0, 1.0, 3.0, 4.0);
        assert_eq!(t.horizontal(), 5.0);
        assert_eq!(t.vertical(), 5.0);
    }
}
