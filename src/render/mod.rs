//! Drawing poses and shapes onto a caller-supplied surface.
//!
//! The annotation canvas hands in something implementing [`Painter`]; the
//! functions here decide what to draw and with which pen. Marker size and
//! line width shrink as the canvas zooms in so they keep a constant size on
//! screen.

mod pixmap;

use serde::{Deserialize, Serialize};

use crate::model::{KeyPoints, Point, SKELETON, Shape};
use crate::palette::{Color, DEFAULT_VERTEX_FILL, SKELETON_COLORS, keypoint_color};

pub use pixmap::PixmapPainter;

/// Stroke settings for a single draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in surface pixels.
    pub width: f32,
}

impl Pen {
    /// Create a pen with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// A drawing surface.
pub trait Painter {
    /// Stroke a straight line segment.
    fn draw_line(&mut self, from: Point, to: Point, pen: &Pen);

    /// Fill a circle with `fill` and stroke its outline with `pen`.
    fn draw_circle(&mut self, center: Point, radius: f32, pen: &Pen, fill: Color);
}

/// Sizes and colors used when painting keypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Marker diameter at zoom 1.0.
    #[serde(default = "default_point_size")]
    pub point_size: f32,

    /// Pen width at zoom 1.0.
    #[serde(default = "default_line_width")]
    pub base_line_width: f32,

    /// Fill color of keypoint markers.
    #[serde(default = "default_vertex_fill")]
    pub vertex_fill: Color,
}

fn default_point_size() -> f32 {
    8.0
}

fn default_line_width() -> f32 {
    2.0
}

fn default_vertex_fill() -> Color {
    DEFAULT_VERTEX_FILL
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            point_size: default_point_size(),
            base_line_width: default_line_width(),
            vertex_fill: default_vertex_fill(),
        }
    }
}

impl RenderStyle {
    /// Whole-pixel pen width at the given zoom, never below 1.
    ///
    /// Halves round to the nearest even width.
    pub fn pen_width(&self, scale: f32) -> f32 {
        (self.base_line_width / sanitize_scale(scale))
            .round_ties_even()
            .max(1.0)
    }

    /// Marker radius at the given zoom.
    pub fn vertex_radius(&self, scale: f32) -> f32 {
        self.point_size / sanitize_scale(scale) / 2.0
    }
}

/// Zoom factors must be positive and finite; anything else draws at 1.0.
fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Errors from offscreen rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Surface dimensions are zero or too large.
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Loading a background image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Encoding the output PNG failed.
    #[error("PNG encoding error: {0}")]
    Png(String),
}

/// Paint one pose.
///
/// A bone is drawn only when both of its endpoints are present. Markers are
/// drawn after the bones so they stay on top.
pub fn paint_keypoints(
    keypoints: &KeyPoints,
    painter: &mut dyn Painter,
    scale: f32,
    style: &RenderStyle,
) {
    let width = style.pen_width(scale);

    for ((from, to), color) in SKELETON.iter().zip(SKELETON_COLORS) {
        if let (Some(a), Some(b)) = (keypoints.get(*from), keypoints.get(*to)) {
            painter.draw_line(a, b, &Pen::new(color, width));
        }
    }

    let radius = style.vertex_radius(scale);
    for (name, point) in keypoints.labeled() {
        let pen = Pen::new(keypoint_color(name), width);
        painter.draw_circle(point, radius, &pen, style.vertex_fill);
    }
}

/// Paint a shape's closed outline.
pub fn paint_shape(
    shape: &Shape,
    painter: &mut dyn Painter,
    scale: f32,
    style: &RenderStyle,
    color: Color,
) {
    let pen = Pen::new(color, style.pen_width(scale));
    let n = shape.points.len();
    if n < 2 {
        return;
    }

    for i in 0..n {
        let j = (i + 1) % n;
        painter.draw_line(shape.points[i], shape.points[j], &pen);
    }
}
