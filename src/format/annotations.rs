//! Per-image annotation data exchanged with the format implementations.

use std::path::Path;

use crate::model::{KeyPoints, Shape};

/// Everything annotated on a single image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageAnnotations {
    /// Image file name used as the lookup key inside annotation files.
    pub filename: String,

    /// Image dimensions (width, height) if known.
    pub dimensions: Option<(u32, u32)>,

    /// Labeled boxes on this image.
    pub shapes: Vec<Shape>,

    /// Poses on this image.
    pub keypoints: Vec<KeyPoints>,

    /// Whether these annotations were loaded from an existing file.
    pub verified: bool,
}

impl ImageAnnotations {
    /// Create an empty entry for the image at `path`.
    ///
    /// Only the file name is kept; directories never take part in lookups.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            filename: file_name_of(path.as_ref()),
            ..Self::default()
        }
    }

    /// Set the image dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// Add a shape.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Add a pose.
    pub fn add_keypoints(&mut self, keypoints: KeyPoints) {
        self.keypoints.push(keypoints);
    }

    /// Whether nothing is annotated.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.keypoints.is_empty()
    }
}

/// File name component of `path`, or the whole path when it has none.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
