//! Turning shapes into surface paths.
//!
//! Exhaustive matches over [`Shape`] and [`DrawCommand`] keep every kind
//! drawable: adding a variant without a branch here will not compile.

use std::f64::consts::TAU;

use crate::command::DrawCommand;
use crate::geometry::Point;
use crate::patterns::Shape;
use crate::scene::Scene;
use crate::surface::{FillStyle, Rgb, StrokeStyle, Surface};

/// Build the path for one shape. Does not stroke or fill.
pub fn trace_shape<S: Surface + ?Sized>(surface: &mut S, shape: &Shape) {
    surface.begin_path();
    match shape {
        Shape::Tile(tile) => polygon(surface, &tile.points),
        Shape::Command(cmd) => match cmd {
            DrawCommand::Line { line, .. } => {
                surface.move_to(line.start());
                surface.line_to(line.end());
            }
            DrawCommand::Circle { circle, .. } => {
                surface.arc(circle.center, circle.radius, 0.0, TAU);
                surface.close_path();
            }
            DrawCommand::Petal { points, .. } => petal(surface, points),
            DrawCommand::Diamond { points, .. } => polygon(surface, points),
            DrawCommand::Arc { arc, .. } => surface.arc(arc.center, arc.radius, arc.start, arc.end),
        },
    }
}

/// Whether a shape encloses area and can take a fill.
pub fn is_closed(shape: &Shape) -> bool {
    match shape {
        Shape::Tile(_) => true,
        Shape::Command(cmd) => matches!(
            cmd,
            DrawCommand::Circle { .. } | DrawCommand::Petal { .. } | DrawCommand::Diamond { .. }
        ),
    }
}

fn polygon<S: Surface + ?Sized>(surface: &mut S, points: &[Point]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    surface.move_to(*first);
    for &p in rest {
        surface.line_to(p);
    }
    surface.close_path();
}

/// A petal with a tip bulges through its shoulders as two quadratic
/// curves; without a tip it is the plain triangle.
fn petal<S: Surface + ?Sized>(surface: &mut S, points: &[Point]) {
    match points {
        [inner, left, tip, right] => {
            surface.move_to(*inner);
            surface.quad_to(*left, *tip);
            surface.quad_to(*right, *inner);
            surface.close_path();
        }
        _ => polygon(surface, points),
    }
}

/// Draw every born unit of a scene as of `frame`.
///
/// Opacity is the product of the unit's style, its base opacity, its
/// fade-in ramp, its breathing and the scene's cross-fade alpha.
pub fn draw_scene<S: Surface + ?Sized>(
    surface: &mut S,
    scene: &Scene,
    frame: u64,
    fade_in_frames: u32,
    ink: Rgb,
) -> usize {
    let mut drawn = 0;
    for unit in &scene.units {
        let Some(born) = unit.born else {
            continue;
        };
        let fade = if fade_in_frames == 0 {
            1.0
        } else {
            (frame.saturating_sub(born) as f64 / fade_in_frames as f64).min(1.0)
        };
        if fade <= 0.0 || scene.alpha <= 0.0 {
            continue;
        }

        let visibility = fade * scene.alpha;
        let breath = unit.style.breath(frame as f64, scene.breathe_speed);
        let stroke_opacity = (unit.style.stroke_opacity * unit.shape.base_opacity() * breath * visibility).clamp(0.0, 1.0);

        trace_shape(surface, &unit.shape);
        if unit.style.fill_opacity > 0.0 && is_closed(&unit.shape) {
            surface.fill(&FillStyle { color: ink, opacity: unit.style.fill_opacity * visibility });
        }
        surface.stroke(&StrokeStyle {
            color: ink,
            opacity: stroke_opacity,
            width: unit.style.line_width,
            dash: unit.style.dash,
        });
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DrawCommand;
    use crate::patterns::{HatTiling, PatternSpec};
    use crate::scene::DrawableUnit;
    use crate::style::UnitStyle;
    use crate::surface::SvgSurface;

    /// Keeps the stroke opacities handed to the surface.
    #[derive(Default)]
    struct OpacityLog {
        strokes: Vec<f64>,
    }

    impl Surface for OpacityLog {
        fn size(&self) -> (u32, u32) {
            (100, 100)
        }
        fn resize(&mut self, _: u32, _: u32) {}
        fn clear(&mut self, _: Rgb) {}
        fn begin_path(&mut self) {}
        fn move_to(&mut self, _: Point) {}
        fn line_to(&mut self, _: Point) {}
        fn quad_to(&mut self, _: Point, _: Point) {}
        fn cubic_to(&mut self, _: Point, _: Point, _: Point) {}
        fn close_path(&mut self) {}
        fn has_current_point(&self) -> bool {
            false
        }
        fn stroke(&mut self, style: &StrokeStyle) {
            self.strokes.push(style.opacity);
        }
        fn fill(&mut self, _: &FillStyle) {}
    }

    fn one_line_scene(born: u64, stroke_opacity: f64, breathe_amplitude: f64) -> Scene {
        let style = UnitStyle {
            stroke_opacity,
            fill_opacity: 0.0,
            line_width: 1.0,
            dash: None,
            breathe_phase: 0.0,
            breathe_amplitude,
        };
        let unit = DrawableUnit {
            shape: Shape::Command(DrawCommand::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 1.0)),
            style,
            sort_key: 0.0,
            phase: 0,
            born: Some(born),
        };
        Scene {
            spec: PatternSpec::Hat(HatTiling::new(20.0, 0)),
            units: vec![unit],
            spawn_idx: 1,
            tiles_per_tick: 1,
            done: true,
            age: 0,
            hold_limit: 100,
            alpha: 1.0,
            fading_out: false,
            breathe_speed: 0.1,
        }
    }

    fn stroke_at(scene: &Scene, frame: u64) -> Option<f64> {
        let mut log = OpacityLog::default();
        draw_scene(&mut log, scene, frame, 30, Rgb::new(0, 0, 0));
        log.strokes.first().copied()
    }

    fn traced(shape: &Shape) -> String {
        let mut svg = SvgSurface::new(100, 100);
        svg.clear(Rgb::new(255, 255, 255));
        trace_shape(&mut svg, shape);
        svg.stroke(&StrokeStyle { color: Rgb::new(0, 0, 0), opacity: 1.0, width: 1.0, dash: None });
        svg.to_svg()
    }

    #[test]
    fn line_is_move_then_line() {
        let shape = Shape::Command(DrawCommand::line(Point::new(0.0, 0.0), Point::new(10.0, 5.0), 1.0));
        assert!(traced(&shape).contains("M 0.00 0.00 L 10.00 5.00"));
    }

    #[test]
    fn petal_with_tip_uses_curves() {
        let points = vec![
            Point::new(50.0, 50.0),
            Point::new(40.0, 30.0),
            Point::new(50.0, 10.0),
            Point::new(60.0, 30.0),
        ];
        let doc = traced(&Shape::Command(DrawCommand::Petal { points, opacity: 0.6 }));
        assert_eq!(doc.matches('Q').count(), 2);
    }

    #[test]
    fn petal_without_tip_is_a_triangle() {
        let points = vec![Point::new(50.0, 50.0), Point::new(40.0, 30.0), Point::new(60.0, 30.0)];
        let doc = traced(&Shape::Command(DrawCommand::Petal { points, opacity: 0.6 }));
        assert!(!doc.contains('Q'));
        assert_eq!(doc.matches('L').count(), 2);
    }

    #[test]
    fn arcs_and_circles_are_traced() {
        let arc = traced(&Shape::Command(DrawCommand::arc(Point::new(0.0, 0.0), 20.0, 0.0, 1.0, 0.6)));
        assert!(arc.contains("A 20.00"));
        let circle = traced(&Shape::Command(DrawCommand::circle(Point::new(50.0, 50.0), 20.0, 0.2)));
        assert_eq!(circle.matches("A 20.00").count(), 2);
    }

    #[test]
    fn only_closed_shapes_fill() {
        assert!(is_closed(&Shape::Command(DrawCommand::circle(Point::default(), 1.0, 1.0))));
        assert!(!is_closed(&Shape::Command(DrawCommand::line(Point::default(), Point::new(1.0, 1.0), 1.0))));
        assert!(!is_closed(&Shape::Command(DrawCommand::arc(Point::default(), 1.0, 0.0, 1.0, 1.0))));
    }

    #[test]
    fn fade_in_ramps_linearly() {
        let scene = one_line_scene(10, 1.0, 0.0);
        assert_eq!(stroke_at(&scene, 10), None);
        assert!((stroke_at(&scene, 25).unwrap() - 0.5).abs() < 1e-12);
        assert!((stroke_at(&scene, 40).unwrap() - 1.0).abs() < 1e-12);
        assert!((stroke_at(&scene, 400).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scene_alpha_scales_opacity() {
        let mut scene = one_line_scene(0, 1.0, 0.0);
        scene.alpha = 0.25;
        assert!((stroke_at(&scene, 60).unwrap() - 0.25).abs() < 1e-12);
        scene.alpha = 0.0;
        assert_eq!(stroke_at(&scene, 60), None);
    }

    #[test]
    fn breathing_modulates_stroke_opacity() {
        let scene = one_line_scene(0, 0.5, 0.3);
        let a = stroke_at(&scene, 100).unwrap();
        let b = stroke_at(&scene, 116).unwrap();
        assert!((a - 0.5 * (1.0 + (10.0f64).sin() * 0.3)).abs() < 1e-12);
        assert!((b - 0.5 * (1.0 + (11.6f64).sin() * 0.3)).abs() < 1e-12);
        assert!((a - b).abs() > 0.01);
    }

    #[test]
    fn unborn_units_are_skipped() {
        let mut scene = one_line_scene(0, 1.0, 0.0);
        scene.units[0].born = None;
        assert_eq!(stroke_at(&scene, 50), None);
    }
}
