//! Geometric primitives for the rendered surface.
//!
//! This module provides the fundamental geometric types used throughout
//! scrawl for positioning primitives, computing intrinsic surface bounds,
//! and synthesizing sketch strokes.
//!
//! # Coordinate System
//!
//! Scrawl uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

/// A 2D point representing a position in surface coordinate space.
///
/// Points use `f32` coordinates and provide operations for basic vector
/// math. The coordinate system has origin at top-left with Y increasing
/// downward (see [module documentation](self) for details).
///
/// # Examples
///
/// ```
/// # use scrawl_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit-length perpendicular of this point treated as a
    /// vector, or the zero vector when the length is degenerate.
    ///
    /// Used when bowing a sketch stroke away from its chord.
    pub fn perpendicular_unit(self) -> Self {
        let length = self.hypot();
        if length < 0.001 {
            return Self::default();
        }
        Self {
            x: -self.y / length,
            y: self.x / length,
        }
    }
}

/// Width and height dimensions.
///
/// # Examples
///
/// ```
/// # use scrawl_core::geometry::Size;
/// let size = Size::new(120.0, 40.0);
/// assert_eq!(size.width(), 120.0);
/// assert_eq!(size.height(), 40.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    /// Creates a new size with the specified dimensions
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true when either dimension is zero or negative
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A rectangular bounding box defined by minimum and maximum coordinates.
///
/// Bounds grow by merging; the intrinsic size of a rendered surface is the
/// merge of every element's bounds plus a margin.
///
/// # Examples
///
/// ```
/// # use scrawl_core::geometry::{Bounds, Point};
/// let a = Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
/// let b = Bounds::new(Point::new(5.0, -5.0), Point::new(20.0, 8.0));
///
/// let merged = a.merge(&b);
/// assert_eq!(merged.min().y(), -5.0);
/// assert_eq!(merged.max().x(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    /// Creates bounds from minimum and maximum corner points
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Creates bounds from a top-left origin and a size
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            min: origin,
            max: Point::new(origin.x() + size.width(), origin.y() + size.height()),
        }
    }

    /// Creates bounds from a center point and a size
    pub fn from_center_size(center: Point, size: Size) -> Self {
        let half = Point::new(size.width() / 2.0, size.height() / 2.0);
        Self {
            min: center.sub_point(half),
            max: center.add_point(half),
        }
    }

    /// Returns the minimum (top-left) corner
    pub fn min(self) -> Point {
        self.min
    }

    /// Returns the maximum (bottom-right) corner
    pub fn max(self) -> Point {
        self.max
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Returns the size of the bounds
    pub fn size(self) -> Size {
        Size::new(self.max.x() - self.min.x(), self.max.y() - self.min.y())
    }

    /// Returns the smallest bounds containing both this and `other`
    pub fn merge(self, other: &Bounds) -> Self {
        Self {
            min: Point::new(self.min.x().min(other.min.x()), self.min.y().min(other.min.y())),
            max: Point::new(self.max.x().max(other.max.x()), self.max.y().max(other.max.y())),
        }
    }

    /// Returns bounds grown by `margin` on every side
    pub fn expand(self, margin: f32) -> Self {
        Self {
            min: Point::new(self.min.x() - margin, self.min.y() - margin),
            max: Point::new(self.max.x() + margin, self.max.y() + margin),
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_midpoint() {
        let mid = Point::new(0.0, 0.0).midpoint(Point::new(10.0, 20.0));
        assert_approx_eq!(f32, mid.x(), 5.0);
        assert_approx_eq!(f32, mid.y(), 10.0);
    }

    #[test]
    fn test_point_perpendicular_unit() {
        let perp = Point::new(10.0, 0.0).perpendicular_unit();
        assert_approx_eq!(f32, perp.x(), 0.0);
        assert_approx_eq!(f32, perp.y(), 1.0);
    }

    #[test]
    fn test_point_perpendicular_unit_degenerate() {
        let perp = Point::new(0.0, 0.0).perpendicular_unit();
        assert_eq!(perp, Point::default());
    }

    #[test]
    fn test_bounds_from_center_size() {
        let bounds = Bounds::from_center_size(Point::new(50.0, 50.0), Size::new(20.0, 10.0));
        assert_approx_eq!(f32, bounds.min().x(), 40.0);
        assert_approx_eq!(f32, bounds.min().y(), 45.0);
        assert_approx_eq!(f32, bounds.max().x(), 60.0);
        assert_approx_eq!(f32, bounds.max().y(), 55.0);
    }

    #[test]
    fn test_bounds_merge_contains_both() {
        let a = Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = Bounds::new(Point::new(-5.0, 5.0), Point::new(8.0, 30.0));
        let merged = a.merge(&b);
        assert_approx_eq!(f32, merged.min().x(), -5.0);
        assert_approx_eq!(f32, merged.min().y(), 0.0);
        assert_approx_eq!(f32, merged.max().x(), 10.0);
        assert_approx_eq!(f32, merged.max().y(), 30.0);
    }

    #[test]
    fn test_bounds_expand() {
        let bounds = Bounds::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)).expand(5.0);
        assert_approx_eq!(f32, bounds.min().x(), -5.0);
        assert_approx_eq!(f32, bounds.size().width(), 20.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), point_strategy()).prop_map(|(a, b)| {
            Bounds::new(
                Point::new(a.x().min(b.x()), a.y().min(b.y())),
                Point::new(a.x().max(b.x()), a.y().max(b.y())),
            )
        })
    }

    /// Merging is commutative: merge(a, b) == merge(b, a).
    fn check_merge_commutative(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.merge(&b), b.merge(&a));
        Ok(())
    }

    /// A merged bounds contains the corners of both inputs.
    fn check_merge_contains_inputs(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        let merged = a.merge(&b);
        for bounds in [a, b] {
            prop_assert!(merged.min().x() <= bounds.min().x());
            prop_assert!(merged.min().y() <= bounds.min().y());
            prop_assert!(merged.max().x() >= bounds.max().x());
            prop_assert!(merged.max().y() >= bounds.max().y());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn merge_commutative(a in bounds_strategy(), b in bounds_strategy()) {
            check_merge_commutative(a, b)?;
        }

        #[test]
        fn merge_contains_inputs(a in bounds_strategy(), b in bounds_strategy()) {
            check_merge_contains_inputs(a, b)?;
        }
    }
}
