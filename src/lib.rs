//! KPAT - Keypoint Annotation Toolkit
//!
//! Pose and bounding-box persistence for an image annotation tool: an
//! 18-point human skeleton model, rendering onto a drawing surface, and
//! readers/writers for CreateML and COCO keypoint JSON files.

pub mod config;
pub mod format;
pub mod model;
pub mod palette;
pub mod render;

pub use format::{AnnotationFormat, FormatError, FormatRegistry, ImageAnnotations};
pub use model::{KeyPoints, KeypointName, Shape};
