//! Common utilities shared across CLI commands.

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};
use tracing::Level;

/// Output format for static exports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name.to_lowercase().as_str() {
            "svg" => Some(OutputFormat::Svg),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Use the given seed, or draw one from the OS.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| StdRng::from_os_rng().random())
}

/// Send library logs to stderr when `-v/--verbose` was given.
pub fn init_logging(verbose: bool) {
    if !verbose {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Parse the value following a flag, reporting a readable error.
pub fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} requires a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

/// Rasterise an SVG document to a PNG file using resvg.
///
/// Returns the pixel size written.
pub fn svg_to_png(svg_content: &str, png_path: &str, scale: f64) -> Result<(u32, u32), String> {
    use resvg::usvg;
    use tiny_skia::Pixmap;

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| format!("Failed to parse SVG: {}", e))?;

    let size = tree.size();
    let pixmap_width = (size.width() as f64 * scale).round() as u32;
    let pixmap_height = (size.height() as f64 * scale).round() as u32;

    let mut pixmap = Pixmap::new(pixmap_width, pixmap_height)
        .ok_or_else(|| format!("Could not create {}x{} pixmap", pixmap_width, pixmap_height))?;

    let transform = tiny_skia::Transform::from_scale(scale as f32, scale as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .save_png(png_path)
        .map_err(|e| format!("Failed to write {}: {}", png_path, e))?;
    Ok((pixmap_width, pixmap_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_parse_case_insensitively() {
        assert_eq!(OutputFormat::from_name("SVG"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_name("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_name("png"), None);
    }

    #[test]
    fn explicit_seed_wins() {
        assert_eq!(resolve_seed(Some(42)), 42);
    }

    #[test]
    fn parse_value_reports_flag() {
        let good = "12".to_string();
        assert_eq!(parse_value::<u32>("-n", Some(&good)), Ok(12));

        let bad = "twelve".to_string();
        let err = parse_value::<u32>("-n", Some(&bad)).unwrap_err();
        assert!(err.contains("-n") && err.contains("twelve"));
        assert!(parse_value::<u32>("-n", None).is_err());
    }
}
