//! Per-unit visual style.
//!
//! Every drawable unit gets its own stroke/fill opacity, line width, dash
//! pattern and breathing parameters. They all come from [`hash3`] keyed by
//! the unit's rounded position and the scene's two style seeds, so the same
//! position in the same scene always looks the same while a new scene gets
//! a new look.

use std::f64::consts::TAU;

use crate::geometry::Point;
use crate::rng::hash3;

/// Dash patterns a unit may use; `None` is a solid stroke.
const DASHES: [Option<[f64; 2]>; 4] = [None, Some([2.0, 3.0]), Some([6.0, 4.0]), Some([1.0, 5.0])];

/// Fraction of units that are dashed at all.
const DASH_CHANCE: f64 = 0.22;
/// Fraction of units that get a tinted fill.
const FILL_CHANCE: f64 = 0.3;

// Salts separating the style channels drawn from the same position.
const SALT_WIDTH: u32 = 0x51ED_270B;
const SALT_DASH: u32 = 0x2C1B_3C6D;
const SALT_PHASE: u32 = 0x7FEB_352D;
const SALT_AMPLITUDE: u32 = 0x846C_A68B;

/// Derived look of one drawable unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitStyle {
    pub stroke_opacity: f64,
    /// Zero means the unit is not filled.
    pub fill_opacity: f64,
    pub line_width: f64,
    pub dash: Option<[f64; 2]>,
    /// Breathing phase offset in radians.
    pub breathe_phase: f64,
    /// Breathing amplitude as a fraction of the stroke opacity.
    pub breathe_amplitude: f64,
}

impl UnitStyle {
    /// Derive a style from a position and the scene's style seeds.
    pub fn derive(anchor: Point, seed_a: u32, seed_b: u32) -> Self {
        let x = anchor.x.round() as i32;
        let y = anchor.y.round() as i32;

        let stroke_opacity = 0.35 + 0.65 * hash3(x, y, seed_a);

        let fill_roll = hash3(y, x, seed_b);
        let fill_opacity = if fill_roll < FILL_CHANCE { 0.04 + 0.4 * fill_roll } else { 0.0 };

        let line_width = 0.5 + 1.5 * hash3(x, y, seed_a ^ SALT_WIDTH);

        let dash_roll = hash3(x, y, seed_b ^ SALT_DASH);
        let dash = if dash_roll < DASH_CHANCE {
            // Reuse the roll so the choice stays a pure function of position
            let idx = 1 + ((dash_roll / DASH_CHANCE) * (DASHES.len() - 1) as f64) as usize;
            DASHES[idx.min(DASHES.len() - 1)]
        } else {
            None
        };

        Self {
            stroke_opacity,
            fill_opacity,
            line_width,
            dash,
            breathe_phase: hash3(x, y, seed_a ^ SALT_PHASE) * TAU,
            breathe_amplitude: 0.08 + 0.27 * hash3(y, x, seed_b ^ SALT_AMPLITUDE),
        }
    }

    /// Stroke opacity multiplier at time `t` (frames) for a given speed.
    #[inline]
    pub fn breath(&self, t: f64, speed: f64) -> f64 {
        1.0 + (t * speed + self.breathe_phase).sin() * self.breathe_amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_position_same_style() {
        let a = UnitStyle::derive(Point::new(120.2, 80.4), 11, 22);
        let b = UnitStyle::derive(Point::new(119.8, 79.6), 11, 22);
        assert_eq!(a, b, "positions rounding to the same pixel share a style");
    }

    #[test]
    fn seeds_change_style() {
        let a = UnitStyle::derive(Point::new(120.0, 80.0), 11, 22);
        let b = UnitStyle::derive(Point::new(120.0, 80.0), 12, 23);
        assert_ne!(a, b);
    }

    #[test]
    fn channels_stay_in_range() {
        for i in 0..500 {
            let s = UnitStyle::derive(Point::new(i as f64 * 3.7, i as f64 * 1.3), 5, 9);
            assert!((0.35..=1.0).contains(&s.stroke_opacity));
            assert!(s.fill_opacity == 0.0 || (0.04..0.2).contains(&s.fill_opacity));
            assert!((0.5..=2.0).contains(&s.line_width));
            assert!((0.0..TAU).contains(&s.breathe_phase));
            assert!((0.08..=0.35).contains(&s.breathe_amplitude));
            assert!(s.dash.is_none() || DASHES[1..].contains(&s.dash));
        }
    }

    #[test]
    fn breath_oscillates_around_one() {
        let s = UnitStyle::derive(Point::new(10.0, 10.0), 1, 2);
        let samples: Vec<f64> = (0..400).map(|t| s.breath(t as f64, 0.05)).collect();
        let lo = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert!(lo < 1.0 && hi > 1.0);
        assert!(lo >= 1.0 - s.breathe_amplitude - 1e-12);
        assert!(hi <= 1.0 + s.breathe_amplitude + 1e-12);
    }
}
