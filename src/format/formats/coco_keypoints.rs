//! COCO keypoint JSON format.
//!
//! Poses are stored as COCO person annotations whose `keypoints` field is a
//! flat `[x1, y1, v1, x2, y2, v2, ...]` list in [`KeypointName::ALL`] order.
//! Visibility is 2 for labeled points and 0 (with zero coordinates) for
//! points that were never placed.
//!
//! Besides the [`AnnotationFormat`] implementation, [`KeyPoints::save`]
//! writes a single pose as a standalone document with fixed placeholder
//! ids, which is what the capture tool emits when one pose is saved on
//! its own.

use std::path::Path;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::format::annotations::{ImageAnnotations, file_name_of};
use crate::format::error::FormatError;
use crate::format::json::{DEFAULT_INDENT, read_if_exists, to_pretty_bytes};
use crate::format::traits::{AnnotationFormat, FormatWarning, WriteResult};
use crate::model::{CenterBox, KeyPoints, KeypointName, SKELETON};

/// COCO category id used for poses.
pub const PERSON_CATEGORY_ID: u32 = 1;

// Fixed values of the standalone single-pose document.
const STANDALONE_LICENSE: u32 = 4;
const STANDALONE_IMAGE_ID: u64 = 0;
const STANDALONE_AREA: f64 = 5463.6864;
const STANDALONE_ANNOTATION_IMAGE_ID: u64 = 289343;
const STANDALONE_ANNOTATION_ID: u64 = 201376;

/// COCO keypoint format.
///
/// Supports:
/// - Poses (one annotation per pose)
/// - Image dimensions
///
/// Does not support:
/// - Labeled boxes (skipped with a warning)
pub struct CocoKeypointFormat;

impl AnnotationFormat for CocoKeypointFormat {
    fn id(&self) -> &'static str {
        "coco-keypoints"
    }

    fn display_name(&self) -> &'static str {
        "COCO Keypoints (JSON)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn supports_shapes(&self) -> bool {
        false
    }

    fn supports_keypoints(&self) -> bool {
        true
    }

    fn write(&self, image: &ImageAnnotations, path: &Path) -> Result<WriteResult, FormatError> {
        log::info!("Writing COCO keypoints for '{}' to {:?}", image.filename, path);

        let mut result = WriteResult::new();
        for shape in &image.shapes {
            log::warn!(
                "Skipping shape '{}': COCO keypoint files only hold poses",
                shape.label
            );
            result.add_warning(
                FormatWarning::warning(format!(
                    "Shape '{}' skipped, format stores poses only",
                    shape.label
                ))
                .with_image(&image.filename),
            );
        }

        let mut dataset: CocoKeypointDataset = read_if_exists(path)?.unwrap_or_default();
        let filename = file_name_of(Path::new(&image.filename));

        // Drop the previous version of this image along with its poses
        let stale: Vec<u64> = dataset
            .images
            .iter()
            .filter(|img| file_name_of(Path::new(&img.file_name)) == filename)
            .map(|img| img.id)
            .collect();
        result.replaced_existing = !stale.is_empty();
        dataset.images.retain(|img| !stale.contains(&img.id));
        dataset
            .annotations
            .retain(|ann| !stale.contains(&ann.image_id));

        let image_id = dataset.images.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let mut annotation_id = dataset.annotations.iter().map(|a| a.id).max().unwrap_or(0) + 1;

        let (width, height) = image.dimensions.unwrap_or((0, 0));
        dataset.images.push(CocoImage {
            id: image_id,
            file_name: filename,
            width,
            height,
            license: None,
            extra: Map::new(),
        });

        for record in &image.keypoints {
            dataset
                .annotations
                .push(CocoKeypointAnnotation::from_record(record, image_id, annotation_id));
            annotation_id += 1;
        }

        if !dataset
            .categories
            .iter()
            .any(|c| c.id == PERSON_CATEGORY_ID)
        {
            dataset.categories.push(CocoCategory::person());
        }

        std::fs::write(path, to_pretty_bytes(&dataset, DEFAULT_INDENT)?)?;

        result.keypoints_written = image.keypoints.len();
        log::info!(
            "Wrote {} poses ({} warnings)",
            result.keypoints_written,
            result.warnings.len()
        );

        Ok(result)
    }

    fn read(&self, path: &Path, image_name: &str) -> Result<ImageAnnotations, FormatError> {
        log::info!("Reading COCO keypoints from {:?}", path);

        let json = std::fs::read_to_string(path)?;
        let dataset: CocoKeypointDataset = serde_json::from_str(&json)?;

        let mut result = ImageAnnotations::new(image_name);
        for img in &dataset.images {
            if file_name_of(Path::new(&img.file_name)) != result.filename {
                continue;
            }
            if img.width > 0 && img.height > 0 {
                result.dimensions = Some((img.width, img.height));
            }

            for ann in dataset
                .annotations
                .iter()
                .filter(|a| a.image_id == img.id && a.is_pose())
            {
                let mut record = KeyPoints::from_flat(&ann.keypoints)
                    .map_err(|e| FormatError::for_image(&result.filename, e))?;
                if let Some((w, h)) = result.dimensions {
                    record.set_image_size(w, h);
                }
                result.keypoints.push(record);
            }
        }
        result.verified = true;

        log::info!(
            "Read {} poses for '{}'",
            result.keypoints.len(),
            result.filename
        );

        Ok(result)
    }
}

impl KeyPoints {
    /// Save this pose alone as a COCO keypoint document at `path`.
    ///
    /// The image entry names `path` itself and takes its size from
    /// [`KeyPoints::image_size`] (0 when unknown). Ids, license and area are
    /// fixed placeholders. Clears the unsaved-changes flag on success.
    pub fn save(&mut self, path: &Path) -> Result<(), FormatError> {
        let (width, height) = self.image_size().unwrap_or((0, 0));

        let dataset = CocoKeypointDataset {
            info: Map::new(),
            licenses: Vec::new(),
            images: vec![CocoImage {
                id: STANDALONE_IMAGE_ID,
                file_name: path.to_string_lossy().to_string(),
                width,
                height,
                license: Some(STANDALONE_LICENSE),
                extra: Map::new(),
            }],
            annotations: vec![CocoKeypointAnnotation {
                segmentation: Value::Array(Vec::new()),
                num_keypoints: Some(self.num_labeled()),
                area: STANDALONE_AREA,
                iscrowd: 0,
                keypoints: self.to_flat(),
                image_id: STANDALONE_ANNOTATION_IMAGE_ID,
                bbox: Value::Array(Vec::new()),
                category_id: PERSON_CATEGORY_ID,
                id: STANDALONE_ANNOTATION_ID,
                extra: Map::new(),
            }],
            categories: Vec::new(),
            extra: Map::new(),
        };

        std::fs::write(path, serde_json::to_vec(&dataset)?)?;
        self.mark_saved();

        log::info!(
            "Saved pose with {} keypoints to {:?}",
            self.num_labeled(),
            path
        );
        Ok(())
    }

    /// Load the first pose of a COCO keypoint document.
    ///
    /// Annotations of other categories and ones without keypoints are skipped.
    pub fn load(path: &Path) -> Result<KeyPoints, FormatError> {
        let json = std::fs::read_to_string(path)?;
        let dataset: CocoKeypointDataset = serde_json::from_str(&json)?;

        let ann = dataset
            .annotations
            .iter()
            .find(|a| a.is_pose())
            .ok_or_else(|| FormatError::invalid_format("document has no pose annotations"))?;
        let mut record = KeyPoints::from_flat(&ann.keypoints)
            .map_err(|e| FormatError::for_image(&file_name_of(path), e))?;

        if let Some(img) = dataset.images.iter().find(|i| i.width > 0 && i.height > 0) {
            record.set_image_size(img.width, img.height);
        }
        Ok(record)
    }
}

/// Write flat keypoints with integer visibility flags.
fn serialize_flat<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for triple in values.chunks(3) {
        for (i, v) in triple.iter().enumerate() {
            if i == 2 {
                seq.serialize_element(&(*v as u8))?;
            } else {
                seq.serialize_element(v)?;
            }
        }
    }
    seq.end()
}

// COCO format structures
//
// Fields this format does not model are kept in `extra` so merging into an
// existing dataset leaves them intact.

#[derive(Debug, Default, Serialize, Deserialize)]
struct CocoKeypointDataset {
    #[serde(default)]
    info: Map<String, Value>,
    #[serde(default)]
    licenses: Vec<Value>,
    #[serde(default)]
    images: Vec<CocoImage>,
    #[serde(default)]
    annotations: Vec<CocoKeypointAnnotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    categories: Vec<CocoCategory>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    license: Option<u32>,
    file_name: String,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    width: u32,
    id: u64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoKeypointAnnotation {
    /// Polygon list or RLE object.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    segmentation: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    num_keypoints: Option<usize>,
    #[serde(default)]
    area: f64,
    #[serde(default)]
    iscrowd: u8,
    /// Empty for detection-only annotations.
    #[serde(
        default,
        serialize_with = "serialize_flat",
        skip_serializing_if = "Vec::is_empty"
    )]
    keypoints: Vec<f64>,
    image_id: u64,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    bbox: Value,
    #[serde(default)]
    category_id: u32,
    id: u64,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl CocoKeypointAnnotation {
    fn from_record(record: &KeyPoints, image_id: u64, id: u64) -> Self {
        let points: Vec<_> = record.labeled().map(|(_, p)| p).collect();
        let (bbox, area) = match CenterBox::from_points(&points) {
            Some(b) => {
                let ((x_min, y_min), _) = b.min_max();
                (vec![x_min, y_min, b.width, b.height], b.width * b.height)
            }
            None => (Vec::new(), 0.0),
        };

        Self {
            segmentation: Value::Array(Vec::new()),
            num_keypoints: Some(record.num_labeled()),
            area,
            iscrowd: 0,
            keypoints: record.to_flat(),
            image_id,
            bbox: bbox.into(),
            category_id: PERSON_CATEGORY_ID,
            id,
            extra: Map::new(),
        }
    }

    /// Person annotation that carries keypoints.
    fn is_pose(&self) -> bool {
        self.category_id == PERSON_CATEGORY_ID && !self.keypoints.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CocoCategory {
    id: u32,
    name: String,
    #[serde(default)]
    supercategory: String,
    #[serde(default)]
    keypoints: Vec<String>,
    /// 1-based index pairs into `keypoints`.
    #[serde(default)]
    skeleton: Vec<[usize; 2]>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl CocoCategory {
    fn person() -> Self {
        Self {
            id: PERSON_CATEGORY_ID,
            name: "person".into(),
            supercategory: "person".into(),
            keypoints: KeypointName::ALL
                .iter()
                .map(|n| n.as_str().to_string())
                .collect(),
            skeleton: SKELETON
                .iter()
                .map(|(a, b)| [a.index() + 1, b.index() + 1])
                .collect(),
            extra: Map::new(),
        }
    }
}
