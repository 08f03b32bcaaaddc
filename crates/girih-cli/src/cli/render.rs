//! Headless frame-sequence export.
//!
//! Runs an animation session on an SVG surface and writes every Nth frame
//! as SVG, or as PNG through resvg.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;

use girih::{AnimationSession, SessionConfig, SvgSurface, Theme};

use super::common::{init_logging, parse_value, resolve_seed, svg_to_png};
use super::show::Show;

/// Options for a render run.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub frames: u64,
    pub every: u64,
    pub png: bool,
    pub scale: f64,
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub show: Option<String>,
    pub theme: Option<Theme>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub verbose: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            frames: 240,
            every: 10,
            png: false,
            scale: 1.0,
            output_dir: None,
            seed: None,
            show: None,
            theme: None,
            width: None,
            height: None,
            verbose: false,
        }
    }
}

/// Summary of a finished render.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub dir: PathBuf,
    pub written: Vec<PathBuf>,
    pub seed: u64,
}

/// Default output directory, stamped with the local time.
pub fn timestamped_dir() -> PathBuf {
    PathBuf::from(format!("girih-frames-{}", Local::now().format("%Y%m%d-%H%M%S")))
}

/// Run a session headlessly and write the sampled frames.
pub fn render_frames(opts: &RenderOptions) -> Result<RenderSummary, String> {
    let (mut config, mut width, mut height, mut seed) = (SessionConfig::default(), 800u32, 600u32, opts.seed);
    if let Some(ref path) = opts.show {
        let show = Show::load(path).map_err(|e| e.to_string())?;
        config = show.session_config().map_err(|e| e.to_string())?;
        (width, height) = show.canvas_size().map_err(|e| e.to_string())?;
        seed = seed.or(show.seed);
        eprintln!("Loaded show: {}", show.name);
    }
    if let Some(theme) = opts.theme {
        config = config.with_theme(theme);
    }
    width = opts.width.unwrap_or(width);
    height = opts.height.unwrap_or(height);

    let seed = resolve_seed(seed);
    let every = opts.every.max(1);
    let dir = opts.output_dir.clone().unwrap_or_else(timestamped_dir);
    fs::create_dir_all(&dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

    let mut session = AnimationSession::attach(Some(SvgSurface::new(width, height)), config, seed)
        .ok_or_else(|| format!("Cannot animate on a {}x{} canvas", width, height))?;

    let mut written = Vec::new();
    for _ in 0..opts.frames {
        session.tick();
        let frame = session.frame();
        if frame % every != 0 {
            continue;
        }

        let svg = session.surface().to_svg();
        let path = if opts.png {
            let path = dir.join(format!("frame_{:05}.png", frame));
            svg_to_png(&svg, &path.to_string_lossy(), opts.scale)?;
            path
        } else {
            let path = dir.join(format!("frame_{:05}.svg", frame));
            fs::write(&path, &svg).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            path
        };
        tracing::debug!(frame, path = %path.display(), "wrote frame");
        written.push(path);
    }

    Ok(RenderSummary { dir, written, seed })
}

/// Execute the render command.
pub fn cmd_render(args: &[String]) {
    let opts = match parse_args(args) {
        Ok(Some(opts)) => opts,
        Ok(None) => return,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(opts.verbose);

    let start = Instant::now();
    match render_frames(&opts) {
        Ok(summary) => {
            eprintln!(
                "Wrote {} frames to {} (seed {}) in {:?}",
                summary.written.len(),
                summary.dir.display(),
                summary.seed,
                start.elapsed()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse render arguments; `Ok(None)` means help was printed.
fn parse_args(args: &[String]) -> Result<Option<RenderOptions>, String> {
    let mut opts = RenderOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--frames" => {
                i += 1;
                opts.frames = parse_value("--frames", args.get(i))?;
            }
            "--every" => {
                i += 1;
                opts.every = parse_value("--every", args.get(i))?;
            }
            "--png" => opts.png = true,
            "--scale" => {
                i += 1;
                opts.scale = parse_value("--scale", args.get(i))?;
            }
            "-o" | "--output" => {
                i += 1;
                opts.output_dir = Some(PathBuf::from(args.get(i).ok_or("--output requires a value")?));
            }
            "--seed" => {
                i += 1;
                opts.seed = Some(parse_value("--seed", args.get(i))?);
            }
            "-c" | "--config" => {
                i += 1;
                opts.show = Some(args.get(i).ok_or("--config requires a value")?.clone());
            }
            "--theme" => {
                i += 1;
                let name = args.get(i).ok_or("--theme requires a value")?;
                opts.theme = Some(Theme::from_name(name).ok_or_else(|| format!("Unknown theme: {}", name))?);
            }
            "-w" | "--width" => {
                i += 1;
                opts.width = Some(parse_value("--width", args.get(i))?);
            }
            "--height" => {
                i += 1;
                opts.height = Some(parse_value("--height", args.get(i))?);
            }
            "-v" | "--verbose" => opts.verbose = true,
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    if opts.scale <= 0.0 {
        return Err("--scale must be positive".to_string());
    }
    Ok(Some(opts))
}

fn print_usage() {
    eprintln!("girih render - Export animation frames");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    girih render [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -n, --frames <n>       Frames to simulate (default: 240)");
    eprintln!("    --every <n>            Write every Nth frame (default: 10)");
    eprintln!("    --png                  Write PNG instead of SVG");
    eprintln!("    --scale <n>            PNG scale factor (default: 1.0)");
    eprintln!("    -o, --output <dir>     Output directory (default: girih-frames-<timestamp>)");
    eprintln!("    --seed <n>             Random seed for reproducibility");
    eprintln!("    -c, --config <file>    Show file (see 'girih show --example')");
    eprintln!("    --theme <name>         light or dark (overrides the show)");
    eprintln!("    -w, --width <px>       Canvas width (overrides the show, default: 800)");
    eprintln!("    --height <px>          Canvas height (overrides the show, default: 600)");
    eprintln!("    -v, --verbose          Log session events to stderr");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_options() {
        let opts = parse_args(&args(&["-n", "30", "--every", "5", "--png", "--seed", "7", "--theme", "dark"]))
            .unwrap()
            .unwrap();
        assert_eq!(opts.frames, 30);
        assert_eq!(opts.every, 5);
        assert!(opts.png);
        assert_eq!(opts.seed, Some(7));
        assert_eq!(opts.theme, Some(Theme::Dark));
    }

    #[test]
    fn rejects_unknown_option() {
        assert!(parse_args(&args(&["--fps", "60"])).is_err());
        assert!(parse_args(&args(&["--scale", "0"])).is_err());
    }

    #[test]
    fn timestamped_dir_has_prefix() {
        let dir = timestamped_dir();
        assert!(dir.to_string_lossy().starts_with("girih-frames-"));
    }

    #[test]
    fn renders_sampled_frames() {
        let dir = std::env::temp_dir().join(format!("girih-render-test-{}", std::process::id()));
        let opts = RenderOptions {
            frames: 20,
            every: 10,
            output_dir: Some(dir.clone()),
            seed: Some(3),
            width: Some(160),
            height: Some(120),
            ..RenderOptions::default()
        };
        let summary = render_frames(&opts).unwrap();
        assert_eq!(summary.written.len(), 2);
        assert!(summary.written.iter().all(|p| p.exists()));
        let last = fs::read_to_string(&summary.written[1]).unwrap();
        assert!(last.contains("<svg"));
        let _ = fs::remove_dir_all(dir);
    }
}
