#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are `f32` in a top-left-origin space (screen pixels, or
//! terminal cells for the demo). Tiles are measured, eased, and hit-tested in
//! this space, so sub-unit positions are meaningful.

use std::ops::{Add, Sub};

/// A point (or a vector between two points).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Used for ranking candidates; avoids the square root.
    #[inline]
    pub fn distance_squared(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Move a fraction `t` of the way toward `target`.
    ///
    /// `t = 1.0` lands exactly on `target`; `t = 0.0` stays put.
    #[inline]
    pub fn approach(self, target: Point, t: f32) -> Point {
        Point::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
        )
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero (or negative).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle used for tile bounds and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Left edge. Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge. Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Geometric center.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Check if a point is inside the rectangle. All four edges are inclusive.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// The rectangle concentric with this one whose sides are scaled by `factor`.
    ///
    /// With `factor < 1` the outer margin of the tile becomes a dead zone.
    pub fn scaled_about_center(&self, factor: f32) -> Rect {
        let center = self.center();
        let width = self.width * factor;
        let height = self.height * factor;
        Rect::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    /// Whether `point` lies in the inner hit region shrunk by `factor`.
    ///
    /// Computed from the center and half-extents so the test does not drift
    /// through an intermediate rectangle.
    #[inline]
    pub fn inner_contains(&self, point: Point, factor: f32) -> bool {
        let center = self.center();
        let half_w = self.width * factor / 2.0;
        let half_h = self.height * factor / 2.0;
        point.x >= center.x - half_w
            && point.x <= center.x + half_w
            && point.y >= center.y - half_h
            && point.y <= center.y + half_h
    }

    /// Shift the rectangle by a vector.
    #[inline]
    pub fn translate(&self, delta: Point) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Linear interpolation between two rectangles (`t` is not clamped).
    pub fn lerp(&self, other: &Rect, t: f32) -> Rect {
        Rect::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.width + (other.width - self.width) * t,
            self.height + (other.height - self.height) * t,
        )
    }

    /// Compute the intersection with another rectangle, returning `None` if
    /// they do not overlap with positive area.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Rect, Size};

    #[test]
    fn contains_is_inclusive_on_all_edges() {
        let r = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(r.contains(Point::new(2.0, 3.0)));
        assert!(r.contains(Point::new(6.0, 8.0)));
        assert!(!r.contains(Point::new(6.01, 3.0)));
        assert!(!r.contains(Point::new(2.0, 8.01)));
    }

    #[test]
    fn center_and_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.center(), Point::new(25.0, 40.0));
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.origin(), Point::new(10.0, 20.0));
        assert_eq!(r.size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn scaled_about_center_keeps_center() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let inner = r.scaled_about_center(0.5);
        assert_eq!(inner, Rect::new(25.0, 12.5, 50.0, 25.0));
        assert_eq!(inner.center(), r.center());
    }

    #[test]
    fn inner_contains_matches_scaled_rect() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Region is [25, 75] on both axes at factor 0.5.
        assert!(r.inner_contains(Point::new(25.0, 50.0), 0.5));
        assert!(r.inner_contains(Point::new(75.0, 75.0), 0.5));
        assert!(!r.inner_contains(Point::new(24.9, 50.0), 0.5));
        assert!(!r.inner_contains(Point::new(50.0, 75.1), 0.5));
    }

    #[test]
    fn distance_squared_is_symmetric() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a.distance_squared(b), 25.0);
        assert_eq!(b.distance_squared(a), 25.0);
    }

    #[test]
    fn approach_fraction() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, -20.0);
        assert_eq!(a.approach(b, 1.0), b);
        assert_eq!(a.approach(b, 0.0), a);
        assert_eq!(a.approach(b, 0.5), Point::new(5.0, -10.0));
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 1.0);
        assert_eq!(a - b, Point::new(2.0, 3.0));
        assert_eq!(a + b, Point::new(4.0, 5.0));
        assert_eq!(Point::from((1.5, 2.5)), Point::new(1.5, 2.5));
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 10.0, 10.0, 10.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Rect::new(10.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn intersection_and_union() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(2.0, 2.0, 4.0, 4.0);
        assert_eq!(a.intersection_opt(&b), Some(Rect::new(2.0, 2.0, 2.0, 2.0)));
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 6.0, 6.0));

        let far = Rect::new(10.0, 10.0, 1.0, 1.0);
        assert_eq!(a.intersection_opt(&far), None);
    }

    #[test]
    fn empty_sizes() {
        assert!(Size::new(0.0, 5.0).is_empty());
        assert!(Rect::new(1.0, 1.0, 3.0, 0.0).is_empty());
        assert!(!Rect::new(1.0, 1.0, 3.0, 2.0).is_empty());
    }

    #[test]
    fn translate_moves_origin_only() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).translate(Point::new(10.0, -2.0));
        assert_eq!(r, Rect::new(11.0, 0.0, 3.0, 4.0));
    }
}
