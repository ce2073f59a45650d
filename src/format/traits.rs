//! Trait definitions for annotation format implementations.

use std::path::Path;

use crate::format::annotations::ImageAnnotations;
use crate::format::error::FormatError;

/// Trait for annotation format read/write implementations.
///
/// Formats persist the annotations of one image at a time into a shared
/// file that may already hold entries for other images.
pub trait AnnotationFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "createml", "coco-keypoints").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extensions this format uses.
    fn extensions(&self) -> &[&'static str];

    /// Whether labeled bounding boxes are stored.
    fn supports_shapes(&self) -> bool;

    /// Whether pose keypoints are stored.
    fn supports_keypoints(&self) -> bool;

    /// Write one image's annotations to `path`.
    fn write(&self, image: &ImageAnnotations, path: &Path) -> Result<WriteResult, FormatError>;

    /// Read the annotations stored for `image_name` in `path`.
    ///
    /// Only the file name component of `image_name` is matched.
    fn read(&self, path: &Path, image_name: &str) -> Result<ImageAnnotations, FormatError>;
}

/// Result of a write operation.
#[derive(Debug, Default)]
pub struct WriteResult {
    /// Number of shapes written.
    pub shapes_written: usize,

    /// Number of poses written.
    pub keypoints_written: usize,

    /// Whether an entry for the same image was replaced.
    pub replaced_existing: bool,

    /// Warnings generated during the write (e.g., skipped shapes).
    pub warnings: Vec<FormatWarning>,
}

impl WriteResult {
    /// Create a new write result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the result.
    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if there were any errors (severe warnings).
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w.severity, WarningSeverity::Error))
    }
}

/// Warning generated during format conversion.
#[derive(Debug, Clone)]
pub struct FormatWarning {
    /// Image this warning relates to (if applicable).
    pub image: Option<String>,

    /// Human-readable warning message.
    pub message: String,

    /// Severity level of the warning.
    pub severity: WarningSeverity,
}

impl FormatWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            image: None,
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Info)
    }

    /// Create a warning-level warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Warning)
    }

    /// Create an error-level warning.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Error)
    }

    /// Set the image this warning relates to.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Severity level for format warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// Informational message, not a problem.
    Info,
    /// Warning that something was skipped or modified.
    Warning,
    /// Error that may affect data integrity.
    Error,
}
