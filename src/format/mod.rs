//! Annotation file reading and writing.
//!
//! Each format implements the [`AnnotationFormat`] trait and persists the
//! annotations of one image at a time into a shared JSON file.
//!
//! ## Supported Formats
//!
//! - **CreateML JSON**: Native format; labeled boxes in center form plus poses
//! - **COCO Keypoints JSON**: Poses as COCO person annotations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kpat::format::{FormatRegistry, ImageAnnotations};
//!
//! let registry = FormatRegistry::new();
//! let format = registry.get("createml").unwrap();
//!
//! let mut image = ImageAnnotations::new("frame_0001.jpg");
//! image.add_shape(Shape::rectangle("person", 10.0, 20.0, 50.0, 80.0));
//! format.write(&image, Path::new("annotations.json"))?;
//! ```

mod annotations;
mod error;
pub mod formats;
mod json;
mod registry;
mod traits;

pub use annotations::ImageAnnotations;
pub use error::FormatError;
pub use formats::{CocoKeypointFormat, CreateMlFormat};
pub use json::DEFAULT_INDENT;
pub use registry::{FormatRegistry, NATIVE_FORMAT_ID};
pub use traits::{AnnotationFormat, FormatWarning, WarningSeverity, WriteResult};
