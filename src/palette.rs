//! Colors used when drawing poses.
//!
//! Every named keypoint and every skeleton bone has its own fixed color so
//! left and right limbs stay distinguishable at a glance.

use serde::{Deserialize, Serialize};

use crate::model::{KEYPOINT_COUNT, KeypointName, SKELETON};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Fill color for keypoint markers.
pub const DEFAULT_VERTEX_FILL: Color = Color::GREEN;

/// Outline color used for bounding boxes in previews.
pub const DEFAULT_BOX_LINE: Color = Color::rgba(0, 255, 0, 128);

/// Per-keypoint marker colors, indexed like [`KeypointName::ALL`].
pub const KEYPOINT_COLORS: [Color; KEYPOINT_COUNT] = [
    Color::rgb(255, 0, 85),
    Color::rgb(255, 0, 0),
    Color::rgb(255, 85, 0),
    Color::rgb(255, 170, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(170, 255, 0),
    Color::rgb(85, 255, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 255, 85),
    Color::rgb(0, 255, 170),
    Color::rgb(0, 255, 255),
    Color::rgb(0, 170, 255),
    Color::rgb(0, 85, 255),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 0, 170),
    Color::rgb(170, 0, 255),
    Color::rgb(255, 0, 255),
    Color::rgb(85, 0, 255),
];

/// Per-bone line colors, indexed like [`SKELETON`].
pub const SKELETON_COLORS: [Color; SKELETON.len()] = [
    Color::rgb(255, 0, 85),
    Color::rgb(255, 0, 0),
    Color::rgb(255, 85, 0),
    Color::rgb(255, 170, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(170, 255, 0),
    Color::rgb(85, 255, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(255, 0, 0),
    Color::rgb(0, 255, 85),
    Color::rgb(0, 255, 170),
    Color::rgb(0, 255, 255),
    Color::rgb(0, 170, 255),
    Color::rgb(0, 85, 255),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 0, 170),
    Color::rgb(170, 0, 255),
    Color::rgb(255, 0, 255),
    Color::rgb(85, 0, 255),
    Color::rgb(85, 85, 255),
];

/// Marker color for a named keypoint.
pub fn keypoint_color(name: KeypointName) -> Color {
    KEYPOINT_COLORS[name.index()]
}
