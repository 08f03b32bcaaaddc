//! Show files: YAML descriptions of an animation run.
//!
//! A show fixes the canvas, pacing and which generators may appear, plus
//! the parameter ranges each generator is sampled from. Anything left out
//! falls back to the library defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use girih::{Pattern, PatternRanges, SessionConfig, Theme};

/// Sample show printed by `girih show --example`.
pub const EXAMPLE_SHOW: &str = r#"# girih show file
name: Courtyard
description: Slow rosettes and truchet arcs on a dark ground

canvas:
  width: 960
  height: 540
  theme: dark

seed: 1204

timing:
  fade_in_frames: 30
  tiles_per_tick: [2, 9]
  hold_frames: [480, 1920]
  crossfade_frames: 60
  resize_debounce_frames: 12

patterns: [rosette, truchet]

rosette:
  petals: [8, 14]
  radius: [60, 100]

truchet:
  base: [64, 128]
  min: [12, 24]
  split: [0.3, 0.55]
"#;

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur while loading a show file.
#[derive(Debug)]
pub enum ShowError {
    /// The file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// The YAML did not match the show schema.
    Parse(serde_yaml::Error),
    UnknownPattern(String),
    UnknownTheme(String),
    /// A `[min, max]` pair with `min > max` or a non-positive size.
    InvalidRange { field: &'static str, min: f64, max: f64 },
    EmptyCanvas,
}

impl fmt::Display for ShowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowError::Io { path, source } => write!(f, "Failed to read {}: {}", path.display(), source),
            ShowError::Parse(e) => write!(f, "Failed to parse show YAML: {}", e),
            ShowError::UnknownPattern(name) => write!(f, "Unknown pattern: {}", name),
            ShowError::UnknownTheme(name) => write!(f, "Unknown theme: {} (use light or dark)", name),
            ShowError::InvalidRange { field, min, max } => {
                write!(f, "Invalid range for {}: [{}, {}]", field, min, max)
            }
            ShowError::EmptyCanvas => write!(f, "Canvas width and height must be positive"),
        }
    }
}

impl std::error::Error for ShowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShowError::Io { source, .. } => Some(source),
            ShowError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ShowError {
    fn from(e: serde_yaml::Error) -> Self {
        ShowError::Parse(e)
    }
}

// ============================================================================
// Schema
// ============================================================================

/// A complete show file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Show {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub canvas: Canvas,

    /// Session seed; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub timing: Timing,

    /// Generator names; empty means all.
    #[serde(default)]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub hat: HatRanges,

    #[serde(default)]
    pub rosette: RosetteRanges,

    #[serde(default)]
    pub truchet: TruchetRanges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { width: default_width(), height: default_height(), theme: default_theme() }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_theme() -> String {
    "light".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timing {
    #[serde(default)]
    pub fade_in_frames: Option<u32>,
    #[serde(default)]
    pub tiles_per_tick: Option<[u32; 2]>,
    #[serde(default)]
    pub hold_frames: Option<[u32; 2]>,
    /// Frames a full cross-fade (out or in) takes.
    #[serde(default)]
    pub crossfade_frames: Option<u32>,
    #[serde(default)]
    pub resize_debounce_frames: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HatRanges {
    #[serde(default)]
    pub edge: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosetteRanges {
    #[serde(default)]
    pub petals: Option<[u32; 2]>,
    #[serde(default)]
    pub radius: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TruchetRanges {
    #[serde(default)]
    pub base: Option<[f64; 2]>,
    #[serde(default)]
    pub min: Option<[f64; 2]>,
    #[serde(default)]
    pub split: Option<[f64; 2]>,
}

/// A pixel-size range: finite, ordered and strictly positive.
fn checked_size(field: &'static str, range: Option<[f64; 2]>, fallback: (f64, f64)) -> Result<(f64, f64), ShowError> {
    match range {
        None => Ok(fallback),
        Some([min, max]) if min > 0.0 && min <= max && max.is_finite() => Ok((min, max)),
        Some([min, max]) => Err(ShowError::InvalidRange { field, min, max }),
    }
}

/// A probability range inside [0, 1].
fn checked_fraction(field: &'static str, range: Option<[f64; 2]>, fallback: (f64, f64)) -> Result<(f64, f64), ShowError> {
    match range {
        None => Ok(fallback),
        Some([min, max]) if (0.0..=1.0).contains(&min) && (0.0..=1.0).contains(&max) && min <= max => Ok((min, max)),
        Some([min, max]) => Err(ShowError::InvalidRange { field, min, max }),
    }
}

fn checked_count(field: &'static str, range: Option<[u32; 2]>, fallback: (u32, u32)) -> Result<(u32, u32), ShowError> {
    match range {
        None => Ok(fallback),
        Some([min, max]) if min <= max => Ok((min, max)),
        Some([min, max]) => Err(ShowError::InvalidRange { field, min: min as f64, max: max as f64 }),
    }
}

impl Show {
    /// Load and validate a show from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ShowError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ShowError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a show from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ShowError> {
        let show: Show = serde_yaml::from_str(content)?;
        show.session_config()?;
        Ok(show)
    }

    pub fn theme(&self) -> Result<Theme, ShowError> {
        Theme::from_name(&self.canvas.theme).ok_or_else(|| ShowError::UnknownTheme(self.canvas.theme.clone()))
    }

    pub fn pattern_list(&self) -> Result<Vec<Pattern>, ShowError> {
        self.patterns
            .iter()
            .map(|name| Pattern::from_name(name).ok_or_else(|| ShowError::UnknownPattern(name.clone())))
            .collect()
    }

    /// Canvas size, rejecting an empty canvas.
    pub fn canvas_size(&self) -> Result<(u32, u32), ShowError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ShowError::EmptyCanvas);
        }
        Ok((self.canvas.width, self.canvas.height))
    }

    /// Resolve the show into a session configuration.
    pub fn session_config(&self) -> Result<SessionConfig, ShowError> {
        self.canvas_size()?;
        let defaults = SessionConfig::default();
        let d = &defaults.ranges;

        let ranges = PatternRanges {
            hat_edge: checked_size("hat.edge", self.hat.edge, d.hat_edge)?,
            rosette_petals: checked_count("rosette.petals", self.rosette.petals, d.rosette_petals)?,
            rosette_radius: checked_size("rosette.radius", self.rosette.radius, d.rosette_radius)?,
            truchet_base: checked_size("truchet.base", self.truchet.base, d.truchet_base)?,
            truchet_min: checked_size("truchet.min", self.truchet.min, d.truchet_min)?,
            truchet_split: checked_fraction("truchet.split", self.truchet.split, d.truchet_split)?,
        };

        let t = &self.timing;
        let (tpt_min, tpt_max) = checked_count("timing.tiles_per_tick", t.tiles_per_tick, defaults.tiles_per_tick)?;
        let (hold_min, hold_max) = checked_count("timing.hold_frames", t.hold_frames, defaults.hold_frames)?;

        let mut config = SessionConfig::default()
            .with_ranges(ranges)
            .with_patterns(self.pattern_list()?)
            .with_theme(self.theme()?)
            .with_tiles_per_tick(tpt_min, tpt_max)
            .with_hold_frames(hold_min, hold_max);

        if let Some(frames) = t.fade_in_frames {
            config = config.with_fade_in_frames(frames);
        }
        if let Some(frames) = t.crossfade_frames {
            config = config.with_crossfade_step(1.0 / frames.max(1) as f64);
        }
        if let Some(frames) = t.resize_debounce_frames {
            config = config.with_resize_debounce(frames);
        }
        Ok(config)
    }
}

/// Execute the show command.
pub fn cmd_show(args: &[String]) {
    let mut path: Option<&str> = None;

    for arg in args {
        match arg.as_str() {
            "--example" => {
                print!("{}", EXAMPLE_SHOW);
                return;
            }
            "-h" | "--help" => {
                print_usage();
                return;
            }
            other => path = Some(other),
        }
    }

    let Some(path) = path else {
        print_usage();
        std::process::exit(1);
    };

    let show = match Show::load(path) {
        Ok(show) => show,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Already validated by load
    let config = show.session_config().unwrap_or_default();
    println!("Show: {}", show.name);
    if let Some(ref desc) = show.description {
        println!("  {}", desc);
    }
    println!("Canvas: {} x {} ({})", show.canvas.width, show.canvas.height, config.theme.name());
    let names: Vec<&str> = if config.patterns.is_empty() {
        Pattern::all().iter().map(|p| p.name()).collect()
    } else {
        config.patterns.iter().map(|p| p.name()).collect()
    };
    println!("Patterns: {}", names.join(", "));
    println!(
        "Timing: fade-in {} frames, {}-{} units/frame, hold {}-{} frames, crossfade {:.0} frames",
        config.fade_in_frames,
        config.tiles_per_tick.0,
        config.tiles_per_tick.1,
        config.hold_frames.0,
        config.hold_frames.1,
        1.0 / config.crossfade_step
    );
    match show.seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: random"),
    }
}

fn print_usage() {
    eprintln!("girih show - Validate and summarise a show file");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    girih show <show.yaml>");
    eprintln!("    girih show --example     Print a sample show file");
    eprintln!();
    eprintln!("Use a show with: girih render --config <show.yaml>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_show_parses() {
        let show = Show::from_yaml(EXAMPLE_SHOW).expect("example must be valid");
        assert_eq!(show.name, "Courtyard");
        assert_eq!(show.seed, Some(1204));
        assert_eq!(show.canvas_size().unwrap(), (960, 540));

        let config = show.session_config().unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.patterns, vec![Pattern::Rosette, Pattern::Truchet]);
        assert_eq!(config.ranges.rosette_petals, (8, 14));
        assert!((config.crossfade_step - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn minimal_show_uses_defaults() {
        let show = Show::from_yaml("name: Bare\n").unwrap();
        let config = show.session_config().unwrap();
        let defaults = SessionConfig::default();
        assert_eq!(show.canvas_size().unwrap(), (800, 600));
        assert_eq!(config.ranges, defaults.ranges);
        assert_eq!(config.hold_frames, defaults.hold_frames);
        assert!(config.patterns.is_empty());
    }

    #[test]
    fn unknown_pattern_is_rejected() {
        let err = Show::from_yaml("name: X\npatterns: [hat, spirograph]\n").unwrap_err();
        assert!(matches!(err, ShowError::UnknownPattern(ref name) if name == "spirograph"));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let err = Show::from_yaml("name: X\ncanvas: {theme: sepia}\n").unwrap_err();
        assert!(matches!(err, ShowError::UnknownTheme(_)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = Show::from_yaml("name: X\nhat: {edge: [30, 10]}\n").unwrap_err();
        assert!(matches!(err, ShowError::InvalidRange { field: "hat.edge", .. }));
        assert!(err.to_string().contains("hat.edge"));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        for (yaml, field) in [
            ("hat: {edge: [0, 0]}", "hat.edge"),
            ("rosette: {radius: [0, 40]}", "rosette.radius"),
            ("truchet: {base: [0, 60]}", "truchet.base"),
            ("truchet: {min: [0, 0]}", "truchet.min"),
            ("truchet: {min: [-4, 8]}", "truchet.min"),
        ] {
            let err = Show::from_yaml(&format!("name: X\n{}\n", yaml)).unwrap_err();
            assert!(
                matches!(err, ShowError::InvalidRange { field: f, .. } if f == field),
                "{} should be rejected, got {}",
                yaml,
                err
            );
        }
    }

    #[test]
    fn split_outside_unit_interval_is_rejected() {
        for yaml in ["truchet: {split: [0.5, 1.5]}", "truchet: {split: [-0.1, 0.5]}", "truchet: {split: [0.8, 0.2]}"] {
            let err = Show::from_yaml(&format!("name: X\n{}\n", yaml)).unwrap_err();
            assert!(matches!(err, ShowError::InvalidRange { field: "truchet.split", .. }), "{}", yaml);
        }
        assert!(Show::from_yaml("name: X\ntruchet: {split: [0, 1]}\n").is_ok());
    }

    #[test]
    fn empty_canvas_is_rejected() {
        let err = Show::from_yaml("name: X\ncanvas: {width: 0}\n").unwrap_err();
        assert!(matches!(err, ShowError::EmptyCanvas));
    }

    #[test]
    fn bad_yaml_is_a_parse_error() {
        let err = Show::from_yaml("name: [unclosed").unwrap_err();
        assert!(matches!(err, ShowError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Show::load("/nonexistent/girih/show.yaml").unwrap_err();
        assert!(matches!(err, ShowError::Io { .. }));
    }
}
