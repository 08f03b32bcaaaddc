//! Immediate-mode drawing surfaces.
//!
//! The animation never buffers pixels. Every frame it clears the surface
//! and re-issues the paths of all born units, so a surface only has to
//! understand path construction plus stroke and fill.
//!
//! [`SvgSurface`] records a frame as an SVG document. The CLI adds a raster
//! surface on top of tiny-skia for the live preview.

use std::f64::consts::TAU;
use std::fmt::Write;

use lyon_geom::{Angle, CubicBezierSegment};

use crate::geometry::Point;

/// An 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form for SVG attributes.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// How the current path is stroked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb,
    pub opacity: f64,
    pub width: f64,
    /// `[on, off]` lengths; `None` is solid.
    pub dash: Option<[f64; 2]>,
}

/// How the current path is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: Rgb,
    pub opacity: f64,
}

/// A 2-D immediate-mode drawing context.
///
/// Angles are in radians and increase clockwise in screen space (y down),
/// matching the geometry module.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    /// Wipe the surface to a solid background.
    fn clear(&mut self, background: Rgb);

    /// Start a new path, discarding any unfinished one.
    fn begin_path(&mut self);

    fn move_to(&mut self, p: Point);

    fn line_to(&mut self, p: Point);

    fn quad_to(&mut self, ctrl: Point, to: Point);

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point);

    fn close_path(&mut self);

    /// Append a circular arc from `start` to `end`.
    ///
    /// Like a canvas arc, this connects from the current point with a line
    /// when a subpath is open and starts a new subpath otherwise. The
    /// default implementation approximates the arc with cubic Béziers.
    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        let arc = lyon_geom::Arc {
            center: lyon_geom::point(center.x, center.y),
            radii: lyon_geom::vector(radius, radius),
            start_angle: Angle::radians(start),
            sweep_angle: Angle::radians(end - start),
            x_rotation: Angle::radians(0.0),
        };

        let from = Point::polar(center, radius, start);
        if self.has_current_point() {
            self.line_to(from);
        } else {
            self.move_to(from);
        }

        arc.for_each_cubic_bezier(&mut |seg: &CubicBezierSegment<f64>| {
            self.cubic_to(
                Point::new(seg.ctrl1.x, seg.ctrl1.y),
                Point::new(seg.ctrl2.x, seg.ctrl2.y),
                Point::new(seg.to.x, seg.to.y),
            );
        });
    }

    /// Whether a subpath is open. Used by [`Surface::arc`].
    fn has_current_point(&self) -> bool;

    fn stroke(&mut self, style: &StrokeStyle);

    fn fill(&mut self, style: &FillStyle);
}

// ============================================================================
// SVG surface
// ============================================================================

/// Records one frame as SVG path elements.
///
/// `clear` starts a new frame; [`SvgSurface::to_svg`] serialises whatever
/// has been stroked or filled since.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    background: Option<Rgb>,
    path: String,
    current: Option<Point>,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            path: String::new(),
            current: None,
            elements: Vec::new(),
        }
    }

    /// Number of stroke/fill elements recorded this frame.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Serialise the current frame as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, bg.hex());
        }
        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element);
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn push_point(&mut self, cmd: char, points: &[Point]) {
        self.path.push(cmd);
        for p in points {
            let _ = write!(self.path, " {:.2} {:.2}", p.x, p.y);
        }
        self.path.push(' ');
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self, background: Rgb) {
        self.background = Some(background);
        self.elements.clear();
        self.begin_path();
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.current = None;
    }

    fn move_to(&mut self, p: Point) {
        self.push_point('M', &[p]);
        self.current = Some(p);
    }

    fn line_to(&mut self, p: Point) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.push_point('L', &[p]);
        self.current = Some(p);
    }

    fn quad_to(&mut self, ctrl: Point, to: Point) {
        if self.current.is_none() {
            self.move_to(ctrl);
        }
        self.push_point('Q', &[ctrl, to]);
        self.current = Some(to);
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        if self.current.is_none() {
            self.move_to(ctrl1);
        }
        self.push_point('C', &[ctrl1, ctrl2, to]);
        self.current = Some(to);
    }

    fn close_path(&mut self) {
        self.path.push_str("Z ");
    }

    /// Native SVG elliptical arcs. A sweep of a full turn or more is split
    /// in two, since an `A` command cannot end where it starts.
    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        let from = Point::polar(center, radius, start);
        if self.current.is_some() {
            self.line_to(from);
        } else {
            self.move_to(from);
        }

        let sweep = end - start;
        if sweep.abs() >= TAU {
            let mid = start + sweep.signum() * std::f64::consts::PI;
            self.arc_segment(center, radius, mid, sweep.signum() * std::f64::consts::PI);
            self.arc_segment(center, radius, end, sweep.signum() * std::f64::consts::PI);
        } else if sweep != 0.0 {
            self.arc_segment(center, radius, end, sweep);
        }
    }

    fn has_current_point(&self) -> bool {
        self.current.is_some()
    }

    fn stroke(&mut self, style: &StrokeStyle) {
        if self.path.is_empty() {
            return;
        }
        let mut element = format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-opacity="{:.3}" stroke-width="{:.2}""#,
            self.path.trim_end(),
            style.color.hex(),
            style.opacity.clamp(0.0, 1.0),
            style.width
        );
        if let Some([on, off]) = style.dash {
            let _ = write!(element, r#" stroke-dasharray="{} {}""#, on, off);
        }
        element.push_str("/>");
        self.elements.push(element);
    }

    fn fill(&mut self, style: &FillStyle) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            r#"<path d="{}" fill="{}" fill-opacity="{:.3}" stroke="none"/>"#,
            self.path.trim_end(),
            style.color.hex(),
            style.opacity.clamp(0.0, 1.0)
        ));
    }
}

impl SvgSurface {
    /// One `A` command ending at angle `end` after sweeping `sweep` radians.
    fn arc_segment(&mut self, center: Point, radius: f64, end: f64, sweep: f64) {
        let to = Point::polar(center, radius, end);
        let large = if sweep.abs() > std::f64::consts::PI { 1 } else { 0 };
        let positive = if sweep > 0.0 { 1 } else { 0 };
        let _ = write!(
            self.path,
            "A {r:.2} {r:.2} 0 {large} {positive} {x:.2} {y:.2} ",
            r = radius,
            x = to.x,
            y = to.y
        );
        self.current = Some(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const INK: StrokeStyle = StrokeStyle { color: Rgb::new(20, 20, 20), opacity: 0.5, width: 1.0, dash: None };

    /// Collects commands instead of drawing, to observe the default arc.
    #[derive(Default)]
    struct Recorder {
        ops: Vec<(char, Point)>,
        open: bool,
    }

    impl Surface for Recorder {
        fn size(&self) -> (u32, u32) {
            (100, 100)
        }
        fn resize(&mut self, _: u32, _: u32) {}
        fn clear(&mut self, _: Rgb) {}
        fn begin_path(&mut self) {
            self.ops.clear();
            self.open = false;
        }
        fn move_to(&mut self, p: Point) {
            self.ops.push(('M', p));
            self.open = true;
        }
        fn line_to(&mut self, p: Point) {
            self.ops.push(('L', p));
        }
        fn quad_to(&mut self, _: Point, to: Point) {
            self.ops.push(('Q', to));
        }
        fn cubic_to(&mut self, _: Point, _: Point, to: Point) {
            self.ops.push(('C', to));
        }
        fn close_path(&mut self) {}
        fn has_current_point(&self) -> bool {
            self.open
        }
        fn stroke(&mut self, _: &StrokeStyle) {}
        fn fill(&mut self, _: &FillStyle) {}
    }

    #[test]
    fn default_arc_ends_on_the_circle() {
        let mut rec = Recorder::default();
        let center = Point::new(50.0, 50.0);
        rec.arc(center, 20.0, 0.0, FRAC_PI_2);

        assert_eq!(rec.ops[0].0, 'M');
        assert!(rec.ops[0].1.distance(Point::new(70.0, 50.0)) < 1e-9);
        let (kind, end) = *rec.ops.last().unwrap();
        assert_eq!(kind, 'C');
        assert!(end.distance(Point::new(50.0, 70.0)) < 1e-6);
    }

    #[test]
    fn default_arc_connects_open_subpath() {
        let mut rec = Recorder::default();
        rec.move_to(Point::new(0.0, 0.0));
        rec.arc(Point::new(50.0, 50.0), 10.0, PI, 1.5 * PI);
        assert_eq!(rec.ops[1].0, 'L');
    }

    #[test]
    fn svg_records_stroke_and_fill() {
        let mut svg = SvgSurface::new(200, 100);
        svg.clear(Rgb::new(255, 255, 255));
        svg.begin_path();
        svg.move_to(Point::new(10.0, 10.0));
        svg.line_to(Point::new(90.0, 40.0));
        svg.close_path();
        svg.fill(&FillStyle { color: Rgb::new(0, 0, 0), opacity: 0.2 });
        svg.stroke(&StrokeStyle { dash: Some([2.0, 3.0]), ..INK });

        assert_eq!(svg.element_count(), 2);
        let doc = svg.to_svg();
        assert!(doc.contains(r#"viewBox="0 0 200 100""#));
        assert!(doc.contains("M 10.00 10.00 L 90.00 40.00 Z"));
        assert!(doc.contains(r#"stroke-dasharray="2 3""#));
        assert!(doc.contains("#ffffff"));
    }

    #[test]
    fn clear_starts_a_new_frame() {
        let mut svg = SvgSurface::new(10, 10);
        svg.begin_path();
        svg.move_to(Point::new(1.0, 1.0));
        svg.line_to(Point::new(2.0, 2.0));
        svg.stroke(&INK);
        svg.clear(Rgb::new(0, 0, 0));
        assert_eq!(svg.element_count(), 0);
    }

    #[test]
    fn empty_path_draws_nothing() {
        let mut svg = SvgSurface::new(10, 10);
        svg.begin_path();
        svg.stroke(&INK);
        assert_eq!(svg.element_count(), 0);
    }

    #[test]
    fn full_circle_uses_two_arcs() {
        let mut svg = SvgSurface::new(100, 100);
        svg.begin_path();
        svg.arc(Point::new(50.0, 50.0), 10.0, 0.0, TAU);
        svg.stroke(&INK);
        assert_eq!(svg.to_svg().matches("A 10.00").count(), 2);
    }

    #[test]
    fn svg_output_parses() {
        let mut svg = SvgSurface::new(120, 80);
        svg.clear(Rgb::new(250, 248, 240));
        svg.begin_path();
        svg.arc(Point::new(60.0, 40.0), 30.0, 0.0, PI);
        svg.quad_to(Point::new(60.0, 0.0), Point::new(90.0, 40.0));
        svg.stroke(&INK);

        let tree = usvg::Tree::from_str(&svg.to_svg(), &usvg::Options::default());
        assert!(tree.is_ok());
    }
}
