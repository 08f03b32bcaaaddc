//! Multi-scale Truchet tiles.
//!
//! Truchet tiles are square tiles with a quarter-circle arc in two opposite
//! corners. Each base cell is recursively split into quadrants (a quad-tree)
//! while it is larger than `min_size` and a random draw falls under
//! `split_prob`. Leaf cells pick one of two mirror layouts at random.
//!
//! The random stream is a 32-bit xorshift and draws happen in a fixed
//! pre-order, so `(base_size, min_size, split_prob, seed)` and the viewport
//! fully determine the output.

use std::cmp::Ordering;
use std::f64::consts::PI;

use crate::command::DrawCommand;
use crate::geometry::Point;
use crate::rng::XorShift32;

/// Base opacity of truchet arcs.
pub const ARC_OPACITY: f64 = 0.6;

/// Corner layout of a leaf cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruchetLayout {
    /// Arcs around the top-left and bottom-right corners.
    A,
    /// Arcs around the top-right and bottom-left corners.
    B,
}

/// A leaf cell and the two arcs it draws.
#[derive(Debug, Clone, PartialEq)]
pub struct TruchetTile {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub layout: TruchetLayout,
    pub arcs: [DrawCommand; 2],
}

impl TruchetTile {
    /// Centre of the cell, which is also the midpoint shared by its two arcs.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

/// Truchet generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Truchet {
    pub base_size: f64,
    pub min_size: f64,
    pub split_prob: f64,
    pub seed: u32,
}

impl Truchet {
    pub fn new(base_size: f64, min_size: f64, split_prob: f64, seed: u32) -> Self {
        Self { base_size, min_size, split_prob, seed }
    }

    /// Leaf cells overlapping the viewport, nearest-to-centre first.
    ///
    /// Non-positive or non-finite sizes yield no cells.
    pub fn cells(&self, width: f64, height: f64) -> Vec<TruchetTile> {
        let base = self.base_size;
        let sizes_ok = base > 0.0 && base.is_finite() && self.min_size > 0.0 && self.min_size.is_finite();
        if !sizes_ok || !width.is_finite() || !height.is_finite() {
            return Vec::new();
        }

        // Centred grid with one overscan cell on each side
        let cols = (width / base).ceil().max(0.0) as i64 + 2;
        let rows = (height / base).ceil().max(0.0) as i64 + 2;
        let x0 = width / 2.0 - cols as f64 * base / 2.0;
        let y0 = height / 2.0 - rows as f64 * base / 2.0;

        let mut rng = XorShift32::new(self.seed);
        let mut tiles = Vec::new();
        let viewport = (width, height);

        for row in 0..rows {
            for col in 0..cols {
                let x = x0 + col as f64 * base;
                let y = y0 + row as f64 * base;
                self.subdivide(x, y, base, &mut rng, viewport, &mut tiles);
            }
        }

        let center = Point::new(width / 2.0, height / 2.0);
        tiles.sort_by(|a, b| {
            let da = a.center().distance(center);
            let db = b.center().distance(center);
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        });
        tiles
    }

    /// Arc commands for the viewport, two per leaf cell.
    pub fn generate(&self, width: f64, height: f64) -> Vec<DrawCommand> {
        self.cells(width, height)
            .into_iter()
            .flat_map(|tile| tile.arcs)
            .collect()
    }

    /// Pre-order quad-tree walk: one draw decides split vs. leaf, a leaf
    /// takes a second draw for its layout.
    fn subdivide(
        &self,
        x: f64,
        y: f64,
        size: f64,
        rng: &mut XorShift32,
        viewport: (f64, f64),
        out: &mut Vec<TruchetTile>,
    ) {
        let r = rng.next_f64();
        if size > self.min_size && r < self.split_prob {
            let half = size / 2.0;
            self.subdivide(x, y, half, rng, viewport, out);
            self.subdivide(x + half, y, half, rng, viewport, out);
            self.subdivide(x, y + half, half, rng, viewport, out);
            self.subdivide(x + half, y + half, half, rng, viewport, out);
            return;
        }

        let layout = if rng.next_f64() < 0.5 { TruchetLayout::A } else { TruchetLayout::B };

        let (width, height) = viewport;
        let overlaps = x < width && x + size > 0.0 && y < height && y + size > 0.0;
        if !overlaps {
            return;
        }

        let r = size / 2.0;
        let arcs = match layout {
            TruchetLayout::A => [
                DrawCommand::arc(Point::new(x, y), r, 0.0, PI / 2.0, ARC_OPACITY),
                DrawCommand::arc(Point::new(x + size, y + size), r, PI, PI * 1.5, ARC_OPACITY),
            ],
            TruchetLayout::B => [
                DrawCommand::arc(Point::new(x + size, y), r, PI / 2.0, PI, ARC_OPACITY),
                DrawCommand::arc(Point::new(x, y + size), r, PI * 1.5, PI * 2.0, ARC_OPACITY),
            ],
        };

        out.push(TruchetTile { x, y, size, layout, arcs });
    }
}
