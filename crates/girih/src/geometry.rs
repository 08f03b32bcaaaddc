//! Core geometry types and the shared intersection/rotation kernel.
//!
//! Every generator in [`crate::patterns`] builds on these few functions, so
//! they stay pure and deterministic: the same f64 inputs always give the
//! same bits back.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! `#[derive(Debug, Clone, Copy, PartialEq)]` gives a small value type the
//! usual printing, copying and comparison behavior for free. `Copy` is what
//! lets us pass `Point` around by value without thinking about ownership.

use std::f64::consts::PI;

/// Determinant magnitude below which two lines count as parallel.
pub const INTERSECT_EPSILON: f64 = 1e-9;

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A line segment defined by two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` in direction `angle` (radians).
    #[inline]
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle of this point as seen from `origin`, in (-π, π].
    #[inline]
    pub fn angle_from(&self, origin: Point) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x)
    }

    #[inline]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Line {
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a line from two points.
    #[inline]
    pub fn between(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    #[inline]
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    #[inline]
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Parameter of `p` projected onto this segment (0 = start, 1 = end).
    #[inline]
    pub fn project(&self, p: Point) -> f64 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let len_sq = dx * dx + dy * dy;
        if len_sq < INTERSECT_EPSILON {
            return 0.0;
        }
        ((p.x - self.x1) * dx + (p.y - self.y1) * dy) / len_sq
    }
}

// ============================================================================
// KERNEL
// ============================================================================

/// Intersect the infinite lines through two segments.
///
/// The result is NOT clamped to either segment: rosette extensions rely on
/// this to reach a far boundary. Returns `None` for parallel or
/// near-parallel lines (`|det| < INTERSECT_EPSILON`).
#[inline]
pub fn line_intersect(a: Line, b: Line) -> Option<Point> {
    let det = (a.x1 - a.x2) * (b.y1 - b.y2) - (a.y1 - a.y2) * (b.x1 - b.x2);
    if det.abs() < INTERSECT_EPSILON {
        return None;
    }

    let t = ((a.x1 - b.x1) * (b.y1 - b.y2) - (a.y1 - b.y1) * (b.x1 - b.x2)) / det;
    Some(Point::new(a.x1 + t * (a.x2 - a.x1), a.y1 + t * (a.y2 - a.y1)))
}

/// Rotate a point about the origin.
#[inline]
pub fn rotate_point(p: Point, angle: f64) -> Point {
    let (sin_a, cos_a) = angle.sin_cos();
    Point::new(p.x * cos_a - p.y * sin_a, p.x * sin_a + p.y * cos_a)
}

/// Wrap an angle difference into (-π, π].
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Vertex-mean centroid of a point list.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::new(0.0, 0.0);
    }
    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p.x).sum();
    let sum_y: f64 = points.iter().map(|p| p.y).sum();
    Point::new(sum_x / n, sum_y / n)
}

/// Bounding box as (min_x, min_y, max_x, max_y).
pub fn bounding_box(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Some((min_x, min_y, max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0);
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let a = Line::new(0.0, 0.0, 10.0, 10.0);
        let b = Line::new(0.0, 10.0, 10.0, 0.0);
        let p = line_intersect(a, b).unwrap();
        assert!(close(p, Point::new(5.0, 5.0)), "got {:?}", p);
    }

    #[test]
    fn intersection_is_not_clamped_to_segments() {
        // Segments stop well short of each other; the lines still meet at (20, 0).
        let a = Line::new(0.0, 0.0, 1.0, 0.0);
        let b = Line::new(20.0, 5.0, 20.0, 4.0);
        let p = line_intersect(a, b).unwrap();
        assert!(close(p, Point::new(20.0, 0.0)), "got {:?}", p);
    }

    #[test]
    fn parallel_lines_have_no_intersection() {
        let a = Line::new(0.0, 0.0, 10.0, 0.0);
        let b = Line::new(0.0, 5.0, 10.0, 5.0);
        assert_eq!(line_intersect(a, b), None);

        // Collinear counts as parallel too
        let c = Line::new(2.0, 0.0, 7.0, 0.0);
        assert_eq!(line_intersect(a, c), None);
    }

    #[test]
    fn rotate_quarter_turn() {
        let p = rotate_point(Point::new(1.0, 0.0), PI / 2.0);
        assert!(close(p, Point::new(0.0, 1.0)), "got {:?}", p);
    }

    #[test]
    fn normalize_wraps_into_half_open_range() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-PI / 2.0 - 2.0 * PI) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn projection_parameter() {
        let line = Line::new(0.0, 0.0, 10.0, 0.0);
        assert!((line.project(Point::new(5.0, 3.0)) - 0.5).abs() < 1e-12);
        assert!(line.project(Point::new(-5.0, 0.0)) < 0.0);
    }

    #[test]
    fn centroid_and_bbox() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(close(centroid(&square), Point::new(5.0, 5.0)));
        assert_eq!(bounding_box(&square), Some((0.0, 0.0, 10.0, 10.0)));
        assert_eq!(bounding_box(&[]), None);
    }
}
