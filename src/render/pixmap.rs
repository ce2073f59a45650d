//! Offscreen [`Painter`] backed by a tiny-skia pixmap.

use std::path::Path;

use tiny_skia::{
    ColorU8, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, Transform,
};

use super::{Painter, Pen, RenderError};
use crate::model::Point;
use crate::palette::Color;

/// Renders into an in-memory RGBA pixmap.
pub struct PixmapPainter {
    pixmap: Pixmap,
}

impl PixmapPainter {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// Create a surface showing `image` as background.
    pub fn from_image(image: &image::RgbaImage) -> Result<Self, RenderError> {
        let (width, height) = image.dimensions();
        let mut painter = Self::new(width, height)?;

        // tiny-skia stores premultiplied alpha
        for (dst, src) in painter.pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }

        Ok(painter)
    }

    /// Load an image file and use it as background.
    pub fn open(path: &Path) -> Result<Self, RenderError> {
        log::debug!("Loading background image {:?}", path);
        let image = image::open(path)?.to_rgba8();
        Self::from_image(&image)
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }

    /// Fill the whole surface with one color.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    /// Encode the surface as PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        self.pixmap
            .save_png(path)
            .map_err(|e| RenderError::Png(e.to_string()))?;
        log::info!(
            "Wrote {}x{} preview to {:?}",
            self.width(),
            self.height(),
            path
        );
        Ok(())
    }
}

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

impl Painter for PixmapPainter {
    fn draw_line(&mut self, from: Point, to: Point, pen: &Pen) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0 as f32, from.1 as f32);
        pb.line_to(to.0 as f32, to.1 as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = Stroke {
            width: pen.width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint_for(pen.color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    fn draw_circle(&mut self, center: Point, radius: f32, pen: &Pen, fill: Color) {
        let Some(path) = PathBuilder::from_circle(center.0 as f32, center.1 as f32, radius) else {
            return;
        };

        self.pixmap.fill_path(
            &path,
            &paint_for(fill),
            FillRule::Winding,
            Transform::identity(),
            None,
        );

        let stroke = Stroke {
            width: pen.width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint_for(pen.color),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}
