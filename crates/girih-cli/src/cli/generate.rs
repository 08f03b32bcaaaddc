//! Static export of one fully grown pattern.

use std::fs;
use std::time::Instant;

use serde::Serialize;

use girih::command::DrawCommand;
use girih::render::draw_scene;
use girih::rng::Rng;
use girih::{Pattern, Scene, SessionConfig, Shape, Surface, SvgSurface, Theme};

use super::common::{OutputFormat, init_logging, parse_value, resolve_seed};

/// A unit in JSON output.
#[derive(Serialize)]
struct JsonUnit {
    kind: &'static str,
    phase: usize,
    opacity: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    points: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    center: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    angles: Option<[f64; 2]>,
}

/// JSON output for a generated pattern.
#[derive(Serialize)]
struct JsonPattern {
    pattern: &'static str,
    seed: u64,
    width: u32,
    height: u32,
    units: Vec<JsonUnit>,
}

fn json_unit(shape: &Shape, phase: usize) -> JsonUnit {
    let mut unit = JsonUnit {
        kind: "tile",
        phase,
        opacity: shape.base_opacity(),
        points: Vec::new(),
        center: None,
        radius: None,
        angles: None,
    };
    match shape {
        Shape::Tile(tile) => unit.points = tile.points.iter().map(|p| [p.x, p.y]).collect(),
        Shape::Command(cmd) => {
            unit.kind = cmd.kind();
            match cmd {
                DrawCommand::Line { line, .. } => unit.points = vec![[line.x1, line.y1], [line.x2, line.y2]],
                DrawCommand::Circle { circle, .. } => {
                    unit.center = Some([circle.center.x, circle.center.y]);
                    unit.radius = Some(circle.radius);
                }
                DrawCommand::Petal { points, .. } | DrawCommand::Diamond { points, .. } => {
                    unit.points = points.iter().map(|p| [p.x, p.y]).collect();
                }
                DrawCommand::Arc { arc, .. } => {
                    unit.center = Some([arc.center.x, arc.center.y]);
                    unit.radius = Some(arc.radius);
                    unit.angles = Some([arc.start, arc.end]);
                }
            }
        }
    }
    unit
}

/// Build and fully spawn one scene of `pattern`.
pub fn build_static(pattern: Pattern, width: u32, height: u32, seed: u64) -> Scene {
    let config = SessionConfig::default();
    let mut rng = Rng::new(seed);
    let spec = config.ranges.sample(pattern, &mut rng);
    let mut scene = Scene::build(spec, width as f64, height as f64, &config, &mut rng);
    scene.spawn_all(0);
    scene
}

/// Render a fully spawned scene to an SVG document.
pub fn scene_to_svg(scene: &Scene, width: u32, height: u32, theme: Theme) -> String {
    let fade_in = SessionConfig::default().fade_in_frames;
    let mut surface = SvgSurface::new(width, height);
    surface.clear(theme.background());
    draw_scene(&mut surface, scene, fade_in as u64, fade_in, theme.foreground());
    surface.to_svg()
}

/// Execute the generate command.
pub fn cmd_generate(args: &[String]) {
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let mut pattern_name: Option<&str> = None;
    let mut width = 800u32;
    let mut height = 600u32;
    let mut seed: Option<u64> = None;
    let mut format = OutputFormat::Svg;
    let mut output_path: Option<&str> = None;
    let mut theme = Theme::Light;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-w" | "--width" => {
                i += 1;
                width = parse_value("--width", args.get(i))?;
            }
            "--height" => {
                i += 1;
                height = parse_value("--height", args.get(i))?;
            }
            "--seed" => {
                i += 1;
                seed = Some(parse_value("--seed", args.get(i))?);
            }
            "-f" | "--format" => {
                i += 1;
                let name = args.get(i).ok_or("--format requires a value")?;
                format = OutputFormat::from_name(name)
                    .ok_or_else(|| format!("Unknown format: {}. Use 'svg' or 'json'.", name))?;
            }
            "-o" | "--output" => {
                i += 1;
                output_path = Some(args.get(i).ok_or("--output requires a value")?.as_str());
            }
            "--theme" => {
                i += 1;
                let name = args.get(i).ok_or("--theme requires a value")?;
                theme = Theme::from_name(name).ok_or_else(|| format!("Unknown theme: {}", name))?;
            }
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other if other.starts_with('-') => return Err(format!("Unknown option: {}", other)),
            name if pattern_name.is_none() => pattern_name = Some(name),
            extra => return Err(format!("Unexpected argument: {}", extra)),
        }
        i += 1;
    }

    init_logging(verbose);

    let pattern_name = pattern_name.ok_or("Pattern name required (see 'girih patterns')")?;
    let pattern = Pattern::from_name(pattern_name).ok_or_else(|| {
        format!("Unknown pattern: {}. Use 'patterns' command to list available patterns.", pattern_name)
    })?;
    if width == 0 || height == 0 {
        return Err("Width and height must be positive".to_string());
    }

    let seed = resolve_seed(seed);
    let start = Instant::now();
    let scene = build_static(pattern, width, height, seed);
    eprintln!(
        "Generated {} {} units (seed {}) in {:?}",
        scene.units.len(),
        pattern.name(),
        seed,
        start.elapsed()
    );

    let output = match format {
        OutputFormat::Svg => scene_to_svg(&scene, width, height, theme),
        OutputFormat::Json => {
            let json = JsonPattern {
                pattern: pattern.name(),
                seed,
                width,
                height,
                units: scene.units.iter().map(|u| json_unit(&u.shape, u.phase)).collect(),
            };
            serde_json::to_string(&json).map_err(|e| format!("Failed to serialize JSON: {}", e))?
        }
    };

    match output_path {
        Some("-") | None => println!("{}", output),
        Some(path) => {
            fs::write(path, &output).map_err(|e| format!("Failed to write {}: {}", path, e))?;
            eprintln!("Wrote: {}", path);
        }
    }
    Ok(())
}

fn print_usage() {
    eprintln!("girih generate - Export one fully grown pattern");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    girih generate <pattern> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -w, --width <px>       Canvas width (default: 800)");
    eprintln!("    --height <px>          Canvas height (default: 600)");
    eprintln!("    --seed <n>             Random seed for reproducibility");
    eprintln!("    -f, --format <fmt>     Output format: svg, json (default: svg)");
    eprintln!("    -o, --output <file>    Output file (- for stdout, default: stdout)");
    eprintln!("    --theme <name>         light or dark (default: light)");
    eprintln!("    -v, --verbose          Log generator details to stderr");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_scene_is_fully_spawned() {
        let scene = build_static(Pattern::Hat, 300, 200, 9);
        assert!(scene.done);
        assert!(scene.units.iter().all(|u| u.born == Some(0)));
    }

    #[test]
    fn same_seed_same_svg() {
        let a = scene_to_svg(&build_static(Pattern::Truchet, 240, 160, 3), 240, 160, Theme::Light);
        let b = scene_to_svg(&build_static(Pattern::Truchet, 240, 160, 3), 240, 160, Theme::Light);
        assert_eq!(a, b);
        assert!(a.contains("<path"));
    }

    #[test]
    fn json_units_carry_geometry() {
        let scene = build_static(Pattern::Rosette, 300, 300, 5);
        let units: Vec<JsonUnit> = scene.units.iter().map(|u| json_unit(&u.shape, u.phase)).collect();
        assert!(units.iter().any(|u| u.kind == "circle" && u.radius.is_some()));
        assert!(units.iter().any(|u| u.kind == "line" && u.points.len() == 2));
        assert!(units.iter().any(|u| u.kind == "diamond" && u.points.len() == 4));
    }

    #[test]
    fn rejects_unknown_options_and_extra_arguments() {
        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let err = run(&args(&["hat", "--colour", "red"])).unwrap_err();
        assert_eq!(err, "Unknown option: --colour");
        let err = run(&args(&["hat", "truchet"])).unwrap_err();
        assert_eq!(err, "Unexpected argument: truchet");
        assert!(run(&args(&["hat", "-o"])).is_err());
    }
}
