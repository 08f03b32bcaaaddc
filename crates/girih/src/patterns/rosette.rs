//! Islamic star rosettes.
//!
//! A rosette is derived from three concentric circles: points on each
//! circle give a star polygon, radial spokes and two crossing families of
//! diagonals. The diagonals are then extended out to the star, and the
//! resulting intersections define petals and inner diamonds.
//!
//! Commands are grouped into [`PHASE_COUNT`] phases in reveal order, so the
//! animation can draw construction lines before the finished ornament.
//!
//! ```text
//! 0 guides  1 spokes  2 star edges  3 diagonals
//! 4 extensions  5 petals  6 diamonds
//! ```

use std::f64::consts::PI;

use crate::command::DrawCommand;
use crate::geometry::{INTERSECT_EPSILON, Line, Point, line_intersect, normalize_angle};

/// Number of phases in every build, whatever the parameters.
pub const PHASE_COUNT: usize = 7;

pub const PHASE_GUIDES: usize = 0;
pub const PHASE_SPOKES: usize = 1;
pub const PHASE_STAR: usize = 2;
pub const PHASE_DIAGONALS: usize = 3;
pub const PHASE_EXTENSIONS: usize = 4;
pub const PHASE_PETALS: usize = 5;
pub const PHASE_DIAMONDS: usize = 6;

/// Base opacity of each phase.
pub const PHASE_OPACITY: [f64; PHASE_COUNT] = [0.18, 0.28, 0.55, 0.42, 0.36, 0.65, 0.5];

const MIDDLE_RATIO: f64 = 0.5;
const INNER_RATIO: f64 = 0.21;
const DIAMOND_RATIO: f64 = 0.55;
/// Fraction of the sector half-angle a petal tip may deviate from the sector centre.
const TIP_TOLERANCE: f64 = 0.6;
/// Centre spacing of the hex grid, in outer radii.
const GRID_SPACING: f64 = 2.08;

/// Phase-ordered draw commands for one or more rosettes.
#[derive(Debug, Clone, PartialEq)]
pub struct RosetteBuild {
    pub phases: [Vec<DrawCommand>; PHASE_COUNT],
}

impl RosetteBuild {
    pub fn empty() -> Self {
        Self { phases: Default::default() }
    }

    /// Append another build's phases onto ours, index by index.
    pub fn merge(&mut self, other: RosetteBuild) {
        for (mine, theirs) in self.phases.iter_mut().zip(other.phases) {
            mine.extend(theirs);
        }
    }

    pub fn phase_lengths(&self) -> [usize; PHASE_COUNT] {
        let mut lengths = [0; PHASE_COUNT];
        for (len, phase) in lengths.iter_mut().zip(&self.phases) {
            *len = phase.len();
        }
        lengths
    }

    /// Commands with their phase index, in reveal order.
    pub fn iter_phased(&self) -> impl Iterator<Item = (usize, &DrawCommand)> {
        self.phases
            .iter()
            .enumerate()
            .flat_map(|(phase, cmds)| cmds.iter().map(move |c| (phase, c)))
    }
}

/// Rosette generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rosette {
    /// Points per circle (n ≥ 3).
    pub num_petals: usize,
    /// Star skip factor: outer point i joins point i+k (k ≥ 1).
    pub connect_every_n: usize,
    pub outer_radius: f64,
}

impl Rosette {
    pub fn new(num_petals: usize, connect_every_n: usize, outer_radius: f64) -> Self {
        Self {
            num_petals: num_petals.max(3),
            connect_every_n: connect_every_n.max(1),
            outer_radius,
        }
    }

    fn angle(&self, i: usize) -> f64 {
        i as f64 * 2.0 * PI / self.num_petals as f64 - PI / 2.0
    }

    /// Build one rosette centred on (cx, cy).
    pub fn build(&self, cx: f64, cy: f64) -> RosetteBuild {
        let n = self.num_petals;
        let k = self.connect_every_n;
        let center = Point::new(cx, cy);
        let r_outer = self.outer_radius;
        let r_middle = r_outer * MIDDLE_RATIO;
        let r_inner = r_outer * INNER_RATIO;
        let half_sector = PI / n as f64;

        let ring = |r: f64| -> Vec<Point> { (0..n).map(|i| Point::polar(center, r, self.angle(i))).collect() };
        let outer = ring(r_outer);
        let middle = ring(r_middle);
        let inner = ring(r_inner);

        let mut build = RosetteBuild::empty();
        let op = PHASE_OPACITY;

        build.phases[PHASE_GUIDES] = vec![
            DrawCommand::circle(center, r_outer, op[PHASE_GUIDES]),
            DrawCommand::circle(center, r_middle, op[PHASE_GUIDES]),
            DrawCommand::circle(center, r_inner, op[PHASE_GUIDES]),
        ];

        build.phases[PHASE_SPOKES] = outer
            .iter()
            .map(|&p| DrawCommand::line(center, p, op[PHASE_SPOKES]))
            .collect();

        let star_edges: Vec<Line> = (0..n)
            .map(|i| Line::between(outer[i], outer[(i + k) % n]))
            .collect();
        build.phases[PHASE_STAR] = star_edges
            .iter()
            .map(|e| DrawCommand::line(e.start(), e.end(), op[PHASE_STAR]))
            .collect();

        // Two interleaved families; the end point is always the outward one.
        let mut diagonals = Vec::with_capacity(2 * n);
        for i in 0..n {
            let j = (i + 1) % n;
            diagonals.push(Line::between(inner[j], middle[i]));
            diagonals.push(Line::between(inner[i], middle[j]));
        }
        build.phases[PHASE_DIAGONALS] = diagonals
            .iter()
            .map(|d| DrawCommand::line(d.start(), d.end(), op[PHASE_DIAGONALS]))
            .collect();

        let mut tips = Vec::with_capacity(diagonals.len());
        for diagonal in &diagonals {
            if let Some(tip) = extend_to_star(*diagonal, &star_edges) {
                build.phases[PHASE_EXTENSIONS].push(DrawCommand::line(diagonal.end(), tip, op[PHASE_EXTENSIONS]));
                tips.push(tip);
            }
        }

        for i in 0..n {
            let j = (i + 1) % n;
            let Some(inner_vertex) = line_intersect(diagonals[2 * i], diagonals[2 * i + 1]) else {
                continue;
            };

            let sector_mid = self.angle(i) + half_sector;
            let tip = tips
                .iter()
                .filter(|t| normalize_angle(t.angle_from(center) - sector_mid).abs() <= TIP_TOLERANCE * half_sector)
                .fold(None::<Point>, |best, &t| match best {
                    Some(b) if b.distance(center) >= t.distance(center) => Some(b),
                    _ => Some(t),
                });

            let mut points = vec![inner_vertex, middle[i]];
            points.extend(tip);
            points.push(middle[j]);
            build.phases[PHASE_PETALS].push(DrawCommand::Petal { points, opacity: op[PHASE_PETALS] });
        }

        build.phases[PHASE_DIAMONDS] = (0..n)
            .map(|i| {
                let a = self.angle(i);
                let points = vec![
                    center,
                    Point::polar(center, r_inner * DIAMOND_RATIO, a - half_sector),
                    inner[i],
                    Point::polar(center, r_inner * DIAMOND_RATIO, a + half_sector),
                ];
                DrawCommand::Diamond { points, opacity: op[PHASE_DIAMONDS] }
            })
            .collect();

        build
    }

    /// Hex-grid centres covering the viewport plus one cell of overscan.
    pub fn centers(&self, width: f64, height: f64) -> Vec<Point> {
        let spacing = self.outer_radius * GRID_SPACING;
        if !(spacing > 0.0 && spacing.is_finite() && width.is_finite() && height.is_finite()) {
            return Vec::new();
        }
        let row_height = spacing * 3f64.sqrt() / 2.0;
        let cols = (width / spacing).ceil().max(0.0) as i64;
        let rows = (height / row_height).ceil().max(0.0) as i64;

        let mut centers = Vec::new();
        for row in -1..=rows + 1 {
            let offset = if row.rem_euclid(2) == 1 { spacing / 2.0 } else { 0.0 };
            for col in -1..=cols + 1 {
                centers.push(Point::new(col as f64 * spacing + offset, row as f64 * row_height));
            }
        }
        centers
    }

    /// Tile the viewport with rosettes, concatenating same-index phases.
    pub fn tile(&self, width: f64, height: f64) -> RosetteBuild {
        let mut merged = RosetteBuild::empty();
        for c in self.centers(width, height) {
            merged.merge(self.build(c.x, c.y));
        }
        merged
    }
}

/// Extend a diagonal past its end point to the nearest star edge.
fn extend_to_star(diagonal: Line, star_edges: &[Line]) -> Option<Point> {
    let from = diagonal.end();
    let dx = diagonal.x2 - diagonal.x1;
    let dy = diagonal.y2 - diagonal.y1;

    star_edges
        .iter()
        .filter_map(|&edge| {
            let p = line_intersect(diagonal, edge)?;
            let ahead = (p.x - from.x) * dx + (p.y - from.y) * dy;
            let u = edge.project(p);
            if ahead > INTERSECT_EPSILON && (-INTERSECT_EPSILON..=1.0 + INTERSECT_EPSILON).contains(&u) {
                Some(p)
            } else {
                None
            }
        })
        .fold(None::<Point>, |best, p| match best {
            Some(b) if b.distance(from) <= p.distance(from) => Some(b),
            _ => Some(p),
        })
}
