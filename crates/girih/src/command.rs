//! Draw commands produced by the rosette and truchet generators.
//!
//! ## Rust Lesson #10: Enums (Sum Types)
//!
//! Each command kind carries only the fields it needs. The renderer matches
//! on the enum, and the compiler refuses to build if a new kind is added
//! without a drawing branch for it.

use crate::geometry::{Line, Point, bounding_box, centroid};

/// A circle outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// A circular arc from `start` to `end` (radians, clockwise in screen space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
}

impl Arc {
    /// Point on the arc at the start angle.
    pub fn start_point(&self) -> Point {
        Point::polar(self.center, self.radius, self.start)
    }

    /// Point on the arc at the end angle.
    pub fn end_point(&self) -> Point {
        Point::polar(self.center, self.radius, self.end)
    }
}

/// One drawable primitive with its base opacity in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line { line: Line, opacity: f64 },
    Circle { circle: Circle, opacity: f64 },
    /// Closed petal outline: inner vertex, left shoulder, optional tip, right shoulder.
    Petal { points: Vec<Point>, opacity: f64 },
    /// Closed four-point diamond.
    Diamond { points: Vec<Point>, opacity: f64 },
    Arc { arc: Arc, opacity: f64 },
}

impl DrawCommand {
    pub fn line(a: Point, b: Point, opacity: f64) -> Self {
        DrawCommand::Line { line: Line::between(a, b), opacity }
    }

    pub fn circle(center: Point, radius: f64, opacity: f64) -> Self {
        DrawCommand::Circle { circle: Circle { center, radius }, opacity }
    }

    pub fn arc(center: Point, radius: f64, start: f64, end: f64, opacity: f64) -> Self {
        DrawCommand::Arc { arc: Arc { center, radius, start, end }, opacity }
    }

    /// Short name of the variant, used in JSON output and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::Line { .. } => "line",
            DrawCommand::Circle { .. } => "circle",
            DrawCommand::Petal { .. } => "petal",
            DrawCommand::Diamond { .. } => "diamond",
            DrawCommand::Arc { .. } => "arc",
        }
    }

    pub fn opacity(&self) -> f64 {
        match self {
            DrawCommand::Line { opacity, .. }
            | DrawCommand::Circle { opacity, .. }
            | DrawCommand::Petal { opacity, .. }
            | DrawCommand::Diamond { opacity, .. }
            | DrawCommand::Arc { opacity, .. } => *opacity,
        }
    }

    /// Representative position: used for style hashing and spawn ordering.
    pub fn anchor(&self) -> Point {
        match self {
            DrawCommand::Line { line, .. } => line.midpoint(),
            DrawCommand::Circle { circle, .. } => circle.center,
            DrawCommand::Petal { points, .. } | DrawCommand::Diamond { points, .. } => centroid(points),
            DrawCommand::Arc { arc, .. } => arc.center,
        }
    }

    /// Axis-aligned bounds of the drawn geometry.
    ///
    /// Arcs report the bounds of their full circle; that is loose but never
    /// too small.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            DrawCommand::Line { line, .. } => bounding_box(&[line.start(), line.end()]),
            DrawCommand::Circle { circle: Circle { center, radius }, .. }
            | DrawCommand::Arc { arc: Arc { center, radius, .. }, .. } => Some((
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            )),
            DrawCommand::Petal { points, .. } | DrawCommand::Diamond { points, .. } => bounding_box(points),
        }
    }
}
