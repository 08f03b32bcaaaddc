//! Pattern generators.
//!
//! Each generator turns a viewport size into a flat list of shapes. The
//! animation does not care which generator produced a shape, only what it
//! looks like and which reveal phase it belongs to.

pub mod hat;
pub mod rosette;
pub mod truchet;

pub use hat::{HatTiling, Tile};
pub use rosette::{PHASE_COUNT, Rosette, RosetteBuild};
pub use truchet::{Truchet, TruchetLayout, TruchetTile};

use crate::command::DrawCommand;
use crate::geometry::{Point, bounding_box};

/// Metadata describing a pattern for UI display.
#[derive(Debug, Clone, Copy)]
pub struct PatternMetadata {
    /// Label for the size parameter
    pub size_label: &'static str,
    /// Brief description of the pattern
    pub description: &'static str,
}

impl PatternMetadata {
    pub const fn new(size_label: &'static str, description: &'static str) -> Self {
        Self { size_label, description }
    }
}

/// Available pattern types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Hat,
    Rosette,
    Truchet,
}

impl Pattern {
    /// Get all available patterns.
    pub fn all() -> &'static [Pattern] {
        &[Pattern::Hat, Pattern::Rosette, Pattern::Truchet]
    }

    /// Get pattern name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Hat => "hat",
            Pattern::Rosette => "rosette",
            Pattern::Truchet => "truchet",
        }
    }

    /// Get UI metadata for this pattern.
    pub fn metadata(&self) -> PatternMetadata {
        match self {
            Pattern::Hat => PatternMetadata::new("Edge Length", "Hat monotile on a brick grid"),
            Pattern::Rosette => PatternMetadata::new("Outer Radius", "Star rosettes on a hex grid"),
            Pattern::Truchet => PatternMetadata::new("Base Size", "Quad-tree Truchet arcs"),
        }
    }

    /// Parse pattern from string.
    pub fn from_name(name: &str) -> Option<Pattern> {
        match name.to_lowercase().as_str() {
            "hat" | "monotile" | "einstein" => Some(Pattern::Hat),
            "rosette" | "star" | "girih" => Some(Pattern::Rosette),
            "truchet" | "arcs" => Some(Pattern::Truchet),
            _ => None,
        }
    }
}

/// Anything a generator can hand to the animation.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Tile(Tile),
    Command(DrawCommand),
}

impl Shape {
    /// Representative position for style hashing and ordering.
    pub fn anchor(&self) -> Point {
        match self {
            Shape::Tile(tile) => tile.centroid,
            Shape::Command(cmd) => cmd.anchor(),
        }
    }

    /// Generator-assigned base opacity.
    pub fn base_opacity(&self) -> f64 {
        match self {
            Shape::Tile(_) => hat::TILE_OPACITY,
            Shape::Command(cmd) => cmd.opacity(),
        }
    }

    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        match self {
            Shape::Tile(tile) => bounding_box(&tile.points),
            Shape::Command(cmd) => cmd.bounds(),
        }
    }
}

/// A shape plus the reveal phase it belongs to (always 0 outside rosettes).
#[derive(Debug, Clone, PartialEq)]
pub struct PatternItem {
    pub phase: usize,
    pub shape: Shape,
}

/// A fully parameterised generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternSpec {
    Hat(HatTiling),
    Rosette(Rosette),
    Truchet(Truchet),
}

impl PatternSpec {
    pub fn pattern(&self) -> Pattern {
        match self {
            PatternSpec::Hat(_) => Pattern::Hat,
            PatternSpec::Rosette(_) => Pattern::Rosette,
            PatternSpec::Truchet(_) => Pattern::Truchet,
        }
    }

    /// Generate every shape for a viewport, in generator order.
    pub fn generate(&self, width: f64, height: f64) -> Vec<PatternItem> {
        match self {
            PatternSpec::Hat(hat) => hat
                .generate_tiles(width, height)
                .into_iter()
                .map(|tile| PatternItem { phase: 0, shape: Shape::Tile(tile) })
                .collect(),
            PatternSpec::Rosette(rosette) => {
                let build = rosette.tile(width, height);
                build
                    .phases
                    .into_iter()
                    .enumerate()
                    .flat_map(|(phase, cmds)| {
                        cmds.into_iter().map(move |cmd| PatternItem { phase, shape: Shape::Command(cmd) })
                    })
                    .collect()
            }
            PatternSpec::Truchet(truchet) => truchet
                .generate(width, height)
                .into_iter()
                .map(|cmd| PatternItem { phase: 0, shape: Shape::Command(cmd) })
                .collect(),
        }
    }
}
