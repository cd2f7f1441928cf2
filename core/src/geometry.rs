//! Planar geometry shared by the world, the systems and every adapter.

use serde::{Deserialize, Serialize};

/// Point on the campus map measured in world units, origin at the top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset from the left map edge.
    pub x: f32,
    /// Vertical offset from the top map edge.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Clamps a box of `size` anchored at this position so it stays inside `area`.
    ///
    /// When the box is larger than the area along an axis the position collapses
    /// to zero on that axis.
    #[must_use]
    pub fn clamp_within(self, area: Size, size: Size) -> Self {
        let max_x = (area.width - size.width).max(0.0);
        let max_y = (area.height - size.height).max(0.0);
        Self::new(clamp_axis(self.x, max_x), clamp_axis(self.y, max_y))
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

/// Width and height of an axis-aligned region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns `true` when either extent is zero or negative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    origin: Position,
    size: Size,
}

impl BoundingBox {
    /// Creates a bounding box from an origin and a size.
    #[must_use]
    pub const fn new(origin: Position, size: Size) -> Self {
        Self { origin, size }
    }

    /// Convenience constructor mirroring `x, y, width, height` layout tables.
    #[must_use]
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Position::new(x, y), Size::new(width, height))
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Extent of the box.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Centre point of the box.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(
            self.origin.x + self.size.width * 0.5,
            self.origin.y + self.size.height * 0.5,
        )
    }

    /// Reports whether two boxes overlap. Touching edges count as overlapping.
    #[must_use]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// Reports whether the point lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Reports whether the whole box lies inside `area` anchored at the origin.
    #[must_use]
    pub fn fits_within(&self, area: Size) -> bool {
        self.left() >= 0.0
            && self.top() >= 0.0
            && self.right() <= area.width
            && self.bottom() <= area.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_intersect() {
        let a = BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::from_xywh(10.0, 0.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn separated_boxes_do_not_intersect() {
        let a = BoundingBox::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::from_xywh(10.5, 0.0, 5.0, 5.0);
        let c = BoundingBox::from_xywh(0.0, 10.5, 5.0, 5.0);
        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn clamp_within_keeps_box_inside_area() {
        let area = Size::new(100.0, 50.0);
        let avatar = Size::new(10.0, 10.0);

        assert_eq!(
            Position::new(-5.0, 70.0).clamp_within(area, avatar),
            Position::new(0.0, 40.0)
        );
        assert_eq!(
            Position::new(95.0, 20.0).clamp_within(area, avatar),
            Position::new(90.0, 20.0)
        );
    }

    #[test]
    fn clamp_within_collapses_oversized_boxes() {
        let clamped = Position::new(3.0, 3.0).clamp_within(Size::new(5.0, 5.0), Size::new(8.0, 2.0));
        assert_eq!(clamped, Position::new(0.0, 3.0));
    }

    #[test]
    fn clamp_within_rejects_nan() {
        let clamped =
            Position::new(f32::NAN, 4.0).clamp_within(Size::new(10.0, 10.0), Size::new(1.0, 1.0));
        assert_eq!(clamped, Position::new(0.0, 4.0));
    }
}
