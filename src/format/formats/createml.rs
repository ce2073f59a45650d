//! CreateML-style JSON format with pose keypoints.
//!
//! One file holds an array with an entry per image:
//!
//! ```json
//! [
//!     {
//!         "annotations": [
//!             {"coordinates": {"height": 60.0, "width": 40.0, "x": 30.0, "y": 50.0}, "label": "person"}
//!         ],
//!         "image": "frame_0001.jpg",
//!         "keypoints": [[[12.0, 34.0, 2], [0.0, 0.0, 0], ...]]
//!     }
//! ]
//! ```
//!
//! Boxes are stored by center and size. Each pose is an array of exactly
//! [`KEYPOINT_COUNT`](crate::model::KEYPOINT_COUNT) `[x, y, visibility]` triples. Saving an image merges
//! its entry into the existing file, replacing any previous entry for the
//! same image name and leaving other images untouched.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::annotations::{ImageAnnotations, file_name_of};
use crate::format::error::FormatError;
use crate::format::json::{DEFAULT_INDENT, read_if_exists, to_pretty_bytes};
use crate::format::traits::{AnnotationFormat, WriteResult};
use crate::model::{CenterBox, KeyPoints, KeypointTriple, Shape};

/// CreateML bounding-box format extended with keypoints.
///
/// This is the tool's native format: it stores both shapes and poses.
#[derive(Debug, Clone)]
pub struct CreateMlFormat {
    indent: usize,
}

impl Default for CreateMlFormat {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

impl AnnotationFormat for CreateMlFormat {
    fn id(&self) -> &'static str {
        "createml"
    }

    fn display_name(&self) -> &'static str {
        "CreateML (JSON)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn supports_shapes(&self) -> bool {
        true
    }

    fn supports_keypoints(&self) -> bool {
        true
    }

    fn write(&self, image: &ImageAnnotations, path: &Path) -> Result<WriteResult, FormatError> {
        log::info!("Writing CreateML annotations for '{}' to {:?}", image.filename, path);

        let entry = Self::build_entry(image)?;
        let filename = entry.image.clone();
        let entry = serde_json::to_value(entry)?;
        let mut document: Vec<Value> = read_if_exists(path)?.unwrap_or_default();

        let existing = document
            .iter()
            .position(|e| entry_image(e) == Some(filename.as_str()));
        let replaced_existing = match existing {
            Some(idx) => {
                log::debug!("Replacing existing entry {} for '{}'", idx, filename);
                document[idx] = entry;
                true
            }
            None => {
                log::debug!("Appending new entry for '{}'", filename);
                document.push(entry);
                false
            }
        };

        std::fs::write(path, to_pretty_bytes(&document, self.indent)?)?;

        log::info!(
            "Wrote {} shapes and {} poses ({} images in file)",
            image.shapes.len(),
            image.keypoints.len(),
            document.len()
        );

        Ok(WriteResult {
            shapes_written: image.shapes.len(),
            keypoints_written: image.keypoints.len(),
            replaced_existing,
            warnings: Vec::new(),
        })
    }

    fn read(&self, path: &Path, image_name: &str) -> Result<ImageAnnotations, FormatError> {
        log::info!("Reading CreateML annotations from {:?}", path);

        let json = std::fs::read_to_string(path)?;
        let document: Vec<Value> = serde_json::from_str(&json)?;

        let mut result = ImageAnnotations::new(image_name);
        for value in &document {
            let name = entry_image(value).ok_or_else(|| FormatError::missing_field("image"))?;
            if name != result.filename {
                continue;
            }

            let entry: CreateMlEntry = serde_json::from_value(value.clone())?;
            Self::read_entry(&entry, &mut result)?;
        }
        result.verified = true;

        log::info!(
            "Read {} shapes and {} poses for '{}'",
            result.shapes.len(),
            result.keypoints.len(),
            result.filename
        );

        Ok(result)
    }
}

impl CreateMlFormat {
    /// Create the format with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of spaces per indentation level.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Read like [`AnnotationFormat::read`], but treat a malformed document as empty.
    ///
    /// Syntax errors and truncated files are logged and yield an unverified,
    /// empty result. I/O errors and well-formed files with the wrong
    /// structure, including poses with the wrong keypoint count, are still
    /// returned as errors.
    pub fn read_or_empty(
        &self,
        path: &Path,
        image_name: &str,
    ) -> Result<ImageAnnotations, FormatError> {
        match self.read(path, image_name) {
            Err(e) if e.is_decode_failure() => {
                log::warn!("JSON decoding failed for {:?}: {}", path, e);
                Ok(ImageAnnotations::new(image_name))
            }
            other => other,
        }
    }

    fn build_entry(image: &ImageAnnotations) -> Result<CreateMlEntry, FormatError> {
        let annotations = image
            .shapes
            .iter()
            .map(|shape| {
                let bbox = shape.bounding_box().ok_or_else(|| {
                    FormatError::invalid_coordinates(format!(
                        "shape '{}' on '{}' has {} points, need at least 2",
                        shape.label,
                        image.filename,
                        shape.points.len()
                    ))
                })?;
                Ok(CreateMlAnnotation {
                    label: shape.label.clone(),
                    coordinates: bbox.into(),
                })
            })
            .collect::<Result<Vec<_>, FormatError>>()?;

        let keypoints = image
            .keypoints
            .iter()
            .map(|kp| kp.to_triples().to_vec())
            .collect();

        Ok(CreateMlEntry {
            image: file_name_of(Path::new(&image.filename)),
            annotations,
            keypoints,
        })
    }

    fn read_entry(entry: &CreateMlEntry, out: &mut ImageAnnotations) -> Result<(), FormatError> {
        for ann in &entry.annotations {
            let bbox = CenterBox::from(ann.coordinates);
            out.shapes
                .push(Shape::new(ann.label.clone(), bbox.corners().to_vec()));
        }

        for triples in &entry.keypoints {
            let record = KeyPoints::from_triples(triples)
                .map_err(|e| FormatError::for_image(&entry.image, e))?;
            out.keypoints.push(record);
        }

        Ok(())
    }
}

/// The `image` name of a raw document entry.
fn entry_image(entry: &Value) -> Option<&str> {
    entry.get("image").and_then(Value::as_str)
}

// CreateML format structures

#[derive(Debug, Serialize, Deserialize)]
struct CreateMlEntry {
    image: String,
    #[serde(default)]
    annotations: Vec<CreateMlAnnotation>,
    /// Plain CreateML files carry no poses.
    #[serde(default)]
    keypoints: Vec<Vec<KeypointTriple>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateMlAnnotation {
    label: String,
    coordinates: CreateMlCoordinates,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CreateMlCoordinates {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<CenterBox> for CreateMlCoordinates {
    fn from(bbox: CenterBox) -> Self {
        Self {
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
        }
    }
}

impl From<CreateMlCoordinates> for CenterBox {
    fn from(c: CreateMlCoordinates) -> Self {
        CenterBox {
            x: c.x,
            y: c.y,
            width: c.width,
            height: c.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metadata() {
        let format = CreateMlFormat::new();
        assert_eq!(format.id(), "createml");
        assert!(format.supports_shapes());
        assert!(format.supports_keypoints());
        assert!(format.extensions().contains(&"json"));
    }

    #[test]
    fn test_build_entry_center_form() {
        let mut image = ImageAnnotations::new("a.jpg");
        // Corners given bottom-right first
        image.add_shape(Shape::new("dog", vec![(50.0, 80.0), (10.0, 80.0), (10.0, 20.0), (50.0, 20.0)]));

        let entry = CreateMlFormat::build_entry(&image).unwrap();
        let c = entry.annotations[0].coordinates;
        assert_eq!((c.x, c.y, c.width, c.height), (30.0, 50.0, 40.0, 60.0));
    }

    #[test]
    fn test_build_entry_rejects_degenerate_shape() {
        let mut image = ImageAnnotations::new("a.jpg");
        image.add_shape(Shape::new("dot", vec![(1.0, 1.0)]));

        assert!(matches!(
            CreateMlFormat::build_entry(&image),
            Err(FormatError::InvalidCoordinates { .. })
        ));
    }
}
