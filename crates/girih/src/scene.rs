//! Scenes: one generator's output, styled and ordered for the animation.
//!
//! A scene is built once, then only its spawn cursor, timers and the `born`
//! markers of its units change until the session throws it away.
//!
//! ## Spawn order
//!
//! Units are sorted by a key made of three parts:
//!
//! ```text
//! key = phase · weight + distance_from_centre + jitter
//! ```
//!
//! `weight` exceeds every `distance + jitter` in the scene, so rosette
//! phases never interleave (guides first, diamonds last) while within a
//! phase the pattern still grows roughly outward from the centre.

use std::cmp::Ordering;

use tracing::debug;

use crate::geometry::Point;
use crate::patterns::{HatTiling, Pattern, PatternSpec, Rosette, Shape, Truchet};
use crate::rng::Rng;
use crate::session::SessionConfig;
use crate::style::UnitStyle;

/// Parameter ranges the scene builder samples generators from.
///
/// All ranges are inclusive of `min` and exclusive of `max` for floats,
/// inclusive on both ends for counts.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRanges {
    pub hat_edge: (f64, f64),
    pub rosette_petals: (u32, u32),
    pub rosette_radius: (f64, f64),
    pub truchet_base: (f64, f64),
    pub truchet_min: (f64, f64),
    pub truchet_split: (f64, f64),
}

impl Default for PatternRanges {
    fn default() -> Self {
        Self {
            hat_edge: (14.0, 30.0),
            rosette_petals: (6, 16),
            rosette_radius: (50.0, 110.0),
            truchet_base: (48.0, 120.0),
            truchet_min: (8.0, 24.0),
            truchet_split: (0.25, 0.6),
        }
    }
}

impl PatternRanges {
    /// Draw a fully parameterised generator for `pattern`.
    pub fn sample(&self, pattern: Pattern, rng: &mut Rng) -> PatternSpec {
        match pattern {
            Pattern::Hat => {
                let edge = rng.next_range(self.hat_edge.0, self.hat_edge.1);
                PatternSpec::Hat(HatTiling::new(edge, rng.next_int(0, 0xFFFF) as i64))
            }
            Pattern::Rosette => {
                let n = rng.next_int(self.rosette_petals.0.max(3), self.rosette_petals.1.max(3));
                // Skip 1 (a plain polygon); stay below n/2 so the star keeps points
                let k_max = ((n - 1) / 2).max(2);
                let k = rng.next_int(2, k_max);
                let radius = rng.next_range(self.rosette_radius.0, self.rosette_radius.1);
                PatternSpec::Rosette(Rosette::new(n as usize, k as usize, radius))
            }
            Pattern::Truchet => {
                let base = rng.next_range(self.truchet_base.0, self.truchet_base.1);
                let min = rng.next_range(self.truchet_min.0, self.truchet_min.1);
                let split = rng.next_range(self.truchet_split.0, self.truchet_split.1);
                PatternSpec::Truchet(Truchet::new(base, min, split, rng.next_u32()))
            }
        }
    }
}

/// One shape in a scene, with its style and spawn marker.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableUnit {
    pub shape: Shape,
    pub style: UnitStyle,
    pub sort_key: f64,
    /// Reveal phase rank (rosette phase index, 0 elsewhere).
    pub phase: usize,
    /// Frame the unit was spawned on; `None` until then.
    pub born: Option<u64>,
}

/// An ordered set of units plus the scene's animation state.
#[derive(Debug, Clone)]
pub struct Scene {
    pub spec: PatternSpec,
    pub units: Vec<DrawableUnit>,
    /// Next unit to spawn. Never decreases.
    pub spawn_idx: usize,
    pub tiles_per_tick: usize,
    /// Set once every unit is born; never cleared.
    pub done: bool,
    /// Frames held since `done`.
    pub age: u64,
    pub hold_limit: u64,
    /// Cross-fade alpha in [0, 1].
    pub alpha: f64,
    pub fading_out: bool,
    pub breathe_speed: f64,
}

impl Scene {
    /// Build a scene from a specific generator.
    pub fn build(spec: PatternSpec, width: f64, height: f64, config: &SessionConfig, rng: &mut Rng) -> Self {
        let items = spec.generate(width, height);
        let style_a = rng.next_u32();
        let style_b = rng.next_u32();
        let center = Point::new(width / 2.0, height / 2.0);

        let mut keyed: Vec<(f64, DrawableUnit)> = items
            .into_iter()
            .map(|item| {
                let anchor = item.shape.anchor();
                let raw = anchor.distance(center) + rng.next_f64() * config.sort_jitter;
                let unit = DrawableUnit {
                    style: UnitStyle::derive(anchor, style_a, style_b),
                    shape: item.shape,
                    sort_key: 0.0,
                    phase: item.phase,
                    born: None,
                };
                (raw, unit)
            })
            .collect();

        let weight = keyed.iter().map(|(raw, _)| *raw).fold(0.0, f64::max) + 1.0;
        for (raw, unit) in &mut keyed {
            unit.sort_key = unit.phase as f64 * weight + *raw;
        }

        let mut units: Vec<DrawableUnit> = keyed.into_iter().map(|(_, unit)| unit).collect();
        units.sort_by(|a, b| a.sort_key.partial_cmp(&b.sort_key).unwrap_or(Ordering::Equal));

        let (tpt_min, tpt_max) = config.tiles_per_tick;
        let (hold_min, hold_max) = config.hold_frames;
        let (breathe_min, breathe_max) = config.breathe_speed;

        let scene = Self {
            spec,
            units,
            spawn_idx: 0,
            tiles_per_tick: rng.next_int(tpt_min, tpt_max) as usize,
            done: false,
            age: 0,
            hold_limit: rng.next_int(hold_min, hold_max) as u64,
            alpha: 0.0,
            fading_out: false,
            breathe_speed: rng.next_range(breathe_min, breathe_max),
        };

        debug!(
            pattern = scene.spec.pattern().name(),
            units = scene.units.len(),
            tiles_per_tick = scene.tiles_per_tick,
            hold_limit = scene.hold_limit,
            "built scene"
        );
        scene
    }

    /// Build a scene from a randomly chosen generator among `config.patterns`.
    pub fn random(width: f64, height: f64, config: &SessionConfig, rng: &mut Rng) -> Self {
        let choices: &[Pattern] = if config.patterns.is_empty() { Pattern::all() } else { &config.patterns };
        let pattern = choices[rng.next_index(choices.len()).min(choices.len() - 1)];
        let spec = config.ranges.sample(pattern, rng);
        Self::build(spec, width, height, config, rng)
    }

    /// Stamp up to `tiles_per_tick` units as born on `frame`.
    ///
    /// Returns how many were spawned.
    pub fn spawn(&mut self, frame: u64) -> usize {
        self.spawn_up_to(frame, self.tiles_per_tick)
    }

    /// Spawn everything at once, for static exports.
    pub fn spawn_all(&mut self, frame: u64) {
        self.spawn_up_to(frame, self.units.len());
        self.alpha = 1.0;
    }

    fn spawn_up_to(&mut self, frame: u64, count: usize) -> usize {
        let end = (self.spawn_idx + count).min(self.units.len());
        let spawned = end - self.spawn_idx;
        for unit in &mut self.units[self.spawn_idx..end] {
            unit.born = Some(frame);
        }
        self.spawn_idx = end;
        if self.spawn_idx == self.units.len() && !self.done {
            self.done = true;
            tracing::trace!(frame, units = self.units.len(), "scene fully spawned");
        }
        spawned
    }

    pub fn born_count(&self) -> usize {
        self.spawn_idx
    }

    /// Whether the hold period has run out.
    pub fn hold_expired(&self) -> bool {
        self.done && self.age > self.hold_limit
    }
}
