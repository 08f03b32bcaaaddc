//! Raster drawing surface for the live preview.
//!
//! Paths are collected with a tiny-skia `PathBuilder` and painted straight
//! into a `Pixmap`. Arcs fall back to the library's cubic approximation.

use image::{DynamicImage, RgbaImage};
use tiny_skia::{Color, FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use girih::{FillStyle, Point, Rgb, StrokeStyle, Surface};

/// A `Surface` backed by a tiny-skia pixmap.
///
/// Logical coordinates are multiplied by `scale` when painting, so a
/// session can run at a fixed logical size on a denser pixmap.
pub struct RasterSurface {
    width: u32,
    height: u32,
    scale: f32,
    /// `None` while the size is zero.
    pixmap: Option<Pixmap>,
    builder: PathBuilder,
    open: bool,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        let scale = scale.max(0.1);
        Self {
            width,
            height,
            scale,
            pixmap: Self::allocate(width, height, scale),
            builder: PathBuilder::new(),
            open: false,
        }
    }

    fn allocate(width: u32, height: u32, scale: f32) -> Option<Pixmap> {
        let w = (width as f32 * scale).round() as u32;
        let h = (height as f32 * scale).round() as u32;
        Pixmap::new(w, h)
    }

    /// Pixel dimensions of the backing pixmap.
    pub fn pixel_size(&self) -> (u32, u32) {
        self.pixmap.as_ref().map(|p| (p.width(), p.height())).unwrap_or((0, 0))
    }

    /// RGBA of one pixel, mostly for tests.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixmap = self.pixmap.as_ref()?;
        let c = pixmap.pixel(x, y)?;
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Copy the current frame into an `image` buffer for ratatui-image.
    pub fn to_image(&self) -> Option<DynamicImage> {
        let pixmap = self.pixmap.as_ref()?;
        let rgba = RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.data().to_vec())?;
        Some(DynamicImage::ImageRgba8(rgba))
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale)
    }

    fn paint(color: Rgb, opacity: f64) -> Paint<'static> {
        let mut paint = Paint::default();
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        paint.set_color_rgba8(color.r, color.g, color.b, alpha);
        paint.anti_alias = true;
        paint
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixmap = Self::allocate(width, height, self.scale);
        self.begin_path();
    }

    fn clear(&mut self, background: Rgb) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(Color::from_rgba8(background.r, background.g, background.b, 255));
        }
        self.begin_path();
    }

    fn begin_path(&mut self) {
        self.builder = PathBuilder::new();
        self.open = false;
    }

    fn move_to(&mut self, p: Point) {
        self.builder.move_to(p.x as f32, p.y as f32);
        self.open = true;
    }

    fn line_to(&mut self, p: Point) {
        if !self.open {
            self.move_to(p);
            return;
        }
        self.builder.line_to(p.x as f32, p.y as f32);
    }

    fn quad_to(&mut self, ctrl: Point, to: Point) {
        if !self.open {
            self.move_to(ctrl);
        }
        self.builder.quad_to(ctrl.x as f32, ctrl.y as f32, to.x as f32, to.y as f32);
    }

    fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        if !self.open {
            self.move_to(ctrl1);
        }
        self.builder.cubic_to(
            ctrl1.x as f32,
            ctrl1.y as f32,
            ctrl2.x as f32,
            ctrl2.y as f32,
            to.x as f32,
            to.y as f32,
        );
    }

    fn close_path(&mut self) {
        self.builder.close();
    }

    fn has_current_point(&self) -> bool {
        self.open
    }

    fn stroke(&mut self, style: &StrokeStyle) {
        let transform = self.transform();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(path) = self.builder.clone().finish() else {
            return;
        };

        let paint = Self::paint(style.color, style.opacity);
        let stroke = Stroke {
            width: style.width as f32,
            line_cap: LineCap::Round,
            dash: style.dash.and_then(|[on, off]| StrokeDash::new(vec![on as f32, off as f32], 0.0)),
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }

    fn fill(&mut self, style: &FillStyle) {
        let transform = self.transform();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let Some(path) = self.builder.clone().finish() else {
            return;
        };

        let paint = Self::paint(style.color, style.opacity);
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
}
