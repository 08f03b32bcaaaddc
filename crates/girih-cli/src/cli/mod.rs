//! CLI command implementations.
//!
//! This module contains the implementations for the CLI subcommands:
//! - `generate` - Export one fully grown pattern as SVG or JSON
//! - `render` - Export animation frames as SVG or PNG
//! - `show` - Validate show files or print an example
//!
//! `raster` holds the tiny-skia surface the live preview draws on.

pub mod common;
pub mod generate;
pub mod raster;
pub mod render;
pub mod show;

pub use generate::cmd_generate;
pub use raster::RasterSurface;
pub use render::cmd_render;
pub use show::{Show, cmd_show};
