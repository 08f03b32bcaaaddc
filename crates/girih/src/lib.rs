//! # girih
//!
//! Generative pattern library: aperiodic Hat tiles, Islamic star rosettes
//! and multi-scale Truchet arcs, plus an animation session that grows,
//! breathes and cross-fades scenes built from them on any 2-D surface.
//!
//! ```text
//! geometry ─▶ patterns::{hat, rosette, truchet} ─▶ scene ─▶ session ─▶ Surface
//!                                  rng, style ───────┘        render ──┘
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! Every module is declared explicitly below; `pub use` lifts the types a
//! host usually needs to the crate root so `use girih::AnimationSession`
//! works without knowing where it lives.

pub mod command;
pub mod geometry;
pub mod patterns;
pub mod render;
pub mod rng;
pub mod scene;
pub mod session;
pub mod style;
pub mod surface;

// Re-export common types at crate root for convenience.
pub use command::DrawCommand;
pub use geometry::{Line, Point, line_intersect, rotate_point};
pub use patterns::{HatTiling, Pattern, PatternSpec, Rosette, RosetteBuild, Shape, Tile, Truchet};
pub use scene::{DrawableUnit, PatternRanges, Scene};
pub use session::{AnimationSession, SessionConfig, Theme};
pub use style::UnitStyle;
pub use surface::{FillStyle, Rgb, StrokeStyle, Surface, SvgSurface};
