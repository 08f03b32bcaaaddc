//! Hat monotile placement.
//!
//! The Hat is the 13-vertex polykite that tiles the plane only
//! aperiodically. Here it is laid out on a brick grid with a deterministic
//! per-cell orientation: a visual approximation of the real tiling, not
//! the metatile substitution system. It looks right at a glance, which is
//! all the animation needs.
//!
//! ## Lattice coordinates
//!
//! Vertices are stored in the triangular lattice `(u, v)` and converted to
//! pixels with
//!
//! ```text
//! px = u·s + v·s/2
//! py = v·s·√3/2
//! ```

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::geometry::{Point, centroid, rotate_point};

/// The Hat outline in lattice coordinates.
const HAT_LATTICE: [(f64, f64); 13] = [
    (0.0, 0.0),
    (-1.0, -1.0),
    (0.0, -2.0),
    (2.0, -2.0),
    (2.0, -1.0),
    (4.0, -2.0),
    (5.0, -1.0),
    (4.0, 0.0),
    (3.0, 0.0),
    (2.0, 2.0),
    (0.0, 3.0),
    (0.0, 2.0),
    (-1.0, 2.0),
];

/// Number of orientation variants (6 rotations, of which the first two also
/// appear mirrored).
pub const ORIENTATIONS: i64 = 8;

/// Base opacity of a Hat outline.
pub const TILE_OPACITY: f64 = 0.7;

/// Rows/columns of padding generated beyond each viewport edge.
const OVERSCAN: i64 = 2;

/// One placed Hat.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Closed outline (closure implied; first point is not repeated).
    pub points: Vec<Point>,
    pub centroid: Point,
}

/// Hat tiling generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HatTiling {
    /// Lattice unit length in pixels.
    pub edge_len: f64,
    /// Perturbs the per-cell orientation choice.
    pub orient_seed: i64,
}

impl HatTiling {
    pub fn new(edge_len: f64, orient_seed: i64) -> Self {
        Self { edge_len, orient_seed }
    }

    /// Horizontal distance between neighbouring tiles in a row.
    pub fn col_stride(&self) -> f64 {
        4.5 * self.edge_len
    }

    /// Vertical distance between rows.
    pub fn row_stride(&self) -> f64 {
        3.0 * self.edge_len * 3f64.sqrt() / 2.0
    }

    /// Orientation variant for a grid cell: a pure function of the cell and seed.
    pub fn orientation(&self, col: i64, row: i64) -> i64 {
        let mixed = col
            .wrapping_mul(3)
            .wrapping_add(row.wrapping_mul(5))
            .wrapping_add(self.orient_seed);
        (mixed & 0xFF) % ORIENTATIONS
    }

    /// The Hat in pixel space, centred on its own centroid.
    fn base_outline(&self) -> Vec<Point> {
        let s = self.edge_len;
        let h = s * 3f64.sqrt() / 2.0;
        let raw: Vec<Point> = HAT_LATTICE
            .iter()
            .map(|&(u, v)| Point::new(u * s + v * s / 2.0, v * h))
            .collect();
        let c = centroid(&raw);
        raw.into_iter().map(|p| p.translate(-c.x, -c.y)).collect()
    }

    /// Tile a `width` × `height` viewport, nearest-to-centre first.
    ///
    /// A non-positive or non-finite edge length yields no tiles.
    pub fn generate_tiles(&self, width: f64, height: f64) -> Vec<Tile> {
        let col_stride = self.col_stride();
        let row_stride = self.row_stride();
        if !(self.edge_len > 0.0 && col_stride.is_finite() && width.is_finite() && height.is_finite()) {
            return Vec::new();
        }
        let base = self.base_outline();

        let cols = (width / col_stride).ceil().max(0.0) as i64;
        let rows = (height / row_stride).ceil().max(0.0) as i64;

        let mut tiles = Vec::with_capacity(((cols + 2 * OVERSCAN + 1) * (rows + 2 * OVERSCAN + 1)) as usize);

        for row in -OVERSCAN..=rows + OVERSCAN {
            let offset = if row.rem_euclid(2) == 1 { col_stride / 2.0 } else { 0.0 };
            for col in -OVERSCAN..=cols + OVERSCAN {
                let variant = self.orientation(col, row);
                let rotation = (variant % 6) as f64 * PI / 3.0;
                let mirrored = variant >= 6;

                let cx = col as f64 * col_stride + offset;
                let cy = row as f64 * row_stride;

                let points: Vec<Point> = base
                    .iter()
                    .map(|&p| {
                        let p = if mirrored { Point::new(-p.x, p.y) } else { p };
                        rotate_point(p, rotation).translate(cx, cy)
                    })
                    .collect();
                let centroid = centroid(&points);
                tiles.push(Tile { points, centroid });
            }
        }

        let center = Point::new(width / 2.0, height / 2.0);
        tiles.sort_by(|a, b| {
            let da = a.centroid.distance(center);
            let db = b.centroid.distance(center);
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        });

        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounding_box;

    #[test]
    fn hat_has_thirteen_vertices() {
        let tiles = HatTiling::new(20.0, 0).generate_tiles(100.0, 100.0);
        assert!(tiles.iter().all(|t| t.points.len() == 13));
    }

    #[test]
    fn generation_is_deterministic() {
        let hat = HatTiling::new(24.0, 5);
        let a = hat.generate_tiles(640.0, 480.0);
        let b = hat.generate_tiles(640.0, 480.0);
        assert_eq!(a, b);
    }

    #[test]
    fn seed_changes_orientations() {
        let a = HatTiling::new(24.0, 0).generate_tiles(300.0, 300.0);
        let b = HatTiling::new(24.0, 1).generate_tiles(300.0, 300.0);
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    #[test]
    fn orientation_uses_all_eight_variants() {
        let hat = HatTiling::new(10.0, 0);
        let mut seen = [false; 8];
        for row in 0..4 {
            for col in 0..8 {
                seen[hat.orientation(col, row) as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn negative_cells_stay_in_range() {
        let hat = HatTiling::new(10.0, -3);
        for row in -2..3 {
            for col in -2..3 {
                let v = hat.orientation(col, row);
                assert!((0..ORIENTATIONS).contains(&v));
            }
        }
    }

    #[test]
    fn sorted_nearest_first() {
        let (w, h) = (500.0, 400.0);
        let tiles = HatTiling::new(22.0, 3).generate_tiles(w, h);
        let center = Point::new(w / 2.0, h / 2.0);
        for pair in tiles.windows(2) {
            assert!(pair[0].centroid.distance(center) <= pair[1].centroid.distance(center));
        }
    }

    #[test]
    fn empty_viewport_still_gets_overscan_tiles() {
        // Rows and columns both run -2..=2
        let tiles = HatTiling::new(28.0, 0).generate_tiles(0.0, 0.0);
        assert_eq!(tiles.len(), 25);
    }

    #[test]
    fn degenerate_edge_yields_no_tiles() {
        for edge in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            assert!(HatTiling::new(edge, 0).generate_tiles(800.0, 600.0).is_empty(), "edge {}", edge);
        }
    }

    #[test]
    fn tiles_cover_viewport() {
        for &(w, h, s, seed) in &[(1.0, 1.0, 28.0, 0), (400.0, 300.0, 28.0, 0), (800.0, 600.0, 20.0, 7), (123.0, 457.0, 40.0, 3)] {
            let tiles = HatTiling::new(s, seed).generate_tiles(w, h);
            let boxes: Vec<_> = tiles.iter().filter_map(|t| bounding_box(&t.points)).collect();

            for i in 0..=20 {
                for j in 0..=20 {
                    let x = w * i as f64 / 20.0;
                    let y = h * j as f64 / 20.0;
                    let covered = boxes
                        .iter()
                        .any(|&(x0, y0, x1, y1)| x >= x0 && x <= x1 && y >= y0 && y <= y1);
                    assert!(covered, "({}, {}) uncovered in {}x{}", x, y, w, h);
                }
            }
        }
    }
}
