//! Error types for annotation format operations.

use thiserror::Error;

use crate::model::KeypointError;

/// Errors that can occur during annotation format operations.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid format structure or content
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// Required field is missing
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Invalid coordinate values
    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates {
        /// Description of the coordinate error
        message: String,
    },

    /// A stored pose does not have one entry per skeleton point
    #[error("Image '{image}' has a pose with {found} keypoints, expected {expected}")]
    InvalidKeypointCount {
        /// Image the pose belongs to
        image: String,
        /// Required number of keypoints
        expected: usize,
        /// Number found in the file
        found: usize,
    },

    /// Keypoint record could not be built or edited
    #[error("Keypoint error: {0}")]
    Keypoint(#[from] KeypointError),
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid coordinates error.
    pub fn invalid_coordinates(message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }

    /// Attach the image name to a keypoint unpacking failure.
    pub fn for_image(image: &str, err: KeypointError) -> Self {
        match err {
            KeypointError::Count { expected, found } => Self::InvalidKeypointCount {
                image: image.to_string(),
                expected,
                found,
            },
            other => Self::Keypoint(other),
        }
    }

    /// Whether this is a malformed-document failure (bad syntax or truncated file).
    ///
    /// Structural mismatches in well-formed JSON are not decode failures.
    pub fn is_decode_failure(&self) -> bool {
        match self {
            Self::Json(e) => e.is_syntax() || e.is_eof(),
            _ => false,
        }
    }
}
