//! Tests for the COCO keypoint format and the standalone pose save.

use std::path::Path;

use serde_json::{Value, json};

use crate::format::error::FormatError;
use crate::format::formats::{CocoKeypointFormat, PERSON_CATEGORY_ID};
use crate::format::{AnnotationFormat, ImageAnnotations, WarningSeverity};
use crate::model::{KEYPOINT_COUNT, KeyPoints, KeypointName, Shape};

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_save_empty_pose() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pose.json");

    let mut kp = KeyPoints::new();
    kp.save(&path).unwrap();

    let doc = read_json(&path);
    let ann = &doc["annotations"][0];
    assert_eq!(ann["num_keypoints"], 0);

    let flat = ann["keypoints"].as_array().unwrap();
    assert_eq!(flat.len(), KEYPOINT_COUNT * 3);
    assert!(flat.iter().all(|v| v.as_f64() == Some(0.0)));
}

#[test]
fn test_save_single_point() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pose.json");

    let mut kp = KeyPoints::new();
    kp.set_keypoint((11.0, 22.0)).unwrap();
    kp.save(&path).unwrap();

    let doc = read_json(&path);
    let ann = &doc["annotations"][0];
    assert_eq!(ann["num_keypoints"], 1);

    let flat: Vec<f64> = ann["keypoints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(&flat[0..3], &[11.0, 22.0, 2.0]);
    assert!(flat[3..].iter().all(|v| *v == 0.0));
}

#[test]
fn test_save_document_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pose.json");

    let mut kp = KeyPoints::new();
    kp.set_image_size(640, 480);
    kp.set(KeypointName::Neck, Some((5.0, 6.0)));
    assert!(kp.is_changed());
    kp.save(&path).unwrap();
    assert!(!kp.is_changed());

    let doc = read_json(&path);
    assert_eq!(doc["info"], json!({}));
    assert_eq!(doc["licenses"], json!([]));
    assert!(doc.get("categories").is_none());

    let image = &doc["images"][0];
    assert_eq!(image["license"], 4);
    assert_eq!(image["file_name"].as_str().unwrap(), path.to_string_lossy());
    assert_eq!(image["width"], 640);
    assert_eq!(image["height"], 480);
    assert_eq!(image["id"], 0);

    let ann = &doc["annotations"][0];
    assert_eq!(ann["segmentation"], json!([]));
    assert_eq!(ann["bbox"], json!([]));
    assert_eq!(ann["iscrowd"], 0);
    assert_eq!(ann["category_id"], 1);
    assert_eq!(ann["image_id"], 289343);
    assert_eq!(ann["id"], 201376);
    assert_eq!(ann["area"], 5463.6864);
}

#[test]
fn test_save_without_size_writes_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pose.json");

    KeyPoints::new().save(&path).unwrap();

    let image = &read_json(&path)["images"][0];
    assert_eq!(image["width"], 0);
    assert_eq!(image["height"], 0);
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pose.json");

    let mut kp = KeyPoints::new();
    kp.set_image_size(100, 200);
    kp.set(KeypointName::LeftAnkle, Some((7.0, 190.0)));
    kp.set(KeypointName::Nose, Some((50.0, 10.0)));
    kp.save(&path).unwrap();

    let loaded = KeyPoints::load(&path).unwrap();
    assert_eq!(loaded.get(KeypointName::LeftAnkle), Some((7.0, 190.0)));
    assert_eq!(loaded.get(KeypointName::Nose), Some((50.0, 10.0)));
    assert_eq!(loaded.num_labeled(), 2);
    assert_eq!(loaded.image_size(), Some((100, 200)));
}

#[test]
fn test_load_rejects_short_keypoint_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pose.json");
    let doc = json!({
        "images": [],
        "annotations": [{
            "num_keypoints": 0,
            "keypoints": [0, 0, 0, 0, 0, 0],
            "image_id": 1,
            "category_id": 1,
            "id": 1
        }]
    });
    std::fs::write(&path, doc.to_string()).unwrap();

    let err = KeyPoints::load(&path).unwrap_err();
    assert!(matches!(
        err,
        FormatError::InvalidKeypointCount { found: 2, .. }
    ));
}

#[test]
fn test_load_without_annotations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pose.json");
    std::fs::write(&path, r#"{"images": [], "annotations": []}"#).unwrap();

    assert!(matches!(
        KeyPoints::load(&path),
        Err(FormatError::InvalidFormat { .. })
    ));
}

#[test]
fn test_write_skips_shapes_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coco.json");

    let mut image = ImageAnnotations::new("a.jpg").with_dimensions(320, 240);
    image.add_shape(Shape::rectangle("person", 0.0, 0.0, 10.0, 10.0));
    image.add_keypoints(KeyPoints::new());

    let result = CocoKeypointFormat.write(&image, &path).unwrap();
    assert_eq!(result.keypoints_written, 1);
    assert_eq!(result.shapes_written, 0);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].severity, WarningSeverity::Warning);
    assert_eq!(result.warnings[0].image.as_deref(), Some("a.jpg"));
    assert!(!result.has_errors());

    let doc = read_json(&path);
    assert_eq!(doc["images"][0]["width"], 320);
    assert_eq!(doc["categories"][0]["id"], PERSON_CATEGORY_ID);
    assert_eq!(doc["categories"][0]["keypoints"][0], "nose");
}

#[test]
fn test_write_merges_images() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coco.json");

    let mut a = ImageAnnotations::new("a.jpg");
    a.add_keypoints(KeyPoints::new());
    a.add_keypoints(KeyPoints::new());
    let mut b = ImageAnnotations::new("b.jpg");
    b.add_keypoints(KeyPoints::new());

    CocoKeypointFormat.write(&a, &path).unwrap();
    CocoKeypointFormat.write(&b, &path).unwrap();

    // Rewriting a.jpg with a single pose drops its two old annotations
    let mut a2 = ImageAnnotations::new("a.jpg");
    a2.add_keypoints(KeyPoints::new());
    let result = CocoKeypointFormat.write(&a2, &path).unwrap();
    assert!(result.replaced_existing);

    let doc = read_json(&path);
    assert_eq!(doc["images"].as_array().unwrap().len(), 2);
    assert_eq!(doc["annotations"].as_array().unwrap().len(), 2);
    assert_eq!(doc["categories"].as_array().unwrap().len(), 1);

    let ids: Vec<u64> = doc["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_read_by_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coco.json");

    let mut kp = KeyPoints::new();
    kp.set(KeypointName::RightWrist, Some((3.0, 4.0)));
    let mut image = ImageAnnotations::new("a.jpg").with_dimensions(64, 48);
    image.add_keypoints(kp);
    CocoKeypointFormat.write(&image, &path).unwrap();

    let read = CocoKeypointFormat.read(&path, "dir/a.jpg").unwrap();
    assert!(read.verified);
    assert_eq!(read.dimensions, Some((64, 48)));
    assert_eq!(read.keypoints.len(), 1);
    assert_eq!(
        read.keypoints[0].get(KeypointName::RightWrist),
        Some((3.0, 4.0))
    );
    assert_eq!(read.keypoints[0].image_size(), Some((64, 48)));

    let other = CocoKeypointFormat.read(&path, "b.jpg").unwrap();
    assert!(other.is_empty());
}

/// A dataset produced by another tool: extra image and annotation fields, a
/// crowd annotation with an RLE mask and a detection-only annotation.
fn foreign_dataset() -> Value {
    json!({
        "type": "instances",
        "info": {"year": 2017},
        "licenses": [],
        "images": [
            {"id": 7, "file_name": "other.jpg", "width": 64, "height": 48,
             "coco_url": "http://u", "date_captured": "2013-11-14"}
        ],
        "annotations": [
            {"id": 1, "image_id": 7, "category_id": 1, "iscrowd": 1,
             "segmentation": {"counts": [1, 2], "size": [10, 10]},
             "area": 12.0, "bbox": [0, 0, 4, 3], "num_keypoints": 0,
             "keypoints": []},
            {"id": 2, "image_id": 7, "category_id": 3, "iscrowd": 0,
             "segmentation": [[0, 0, 4, 0, 4, 3]], "area": 6.0,
             "bbox": [0, 0, 4, 3], "score": 0.9}
        ],
        "categories": [
            {"id": 1, "name": "person", "supercategory": "person"},
            {"id": 3, "name": "car", "supercategory": "vehicle"}
        ]
    })
}

#[test]
fn test_write_keeps_foreign_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coco.json");
    std::fs::write(&path, foreign_dataset().to_string()).unwrap();

    let mut image = ImageAnnotations::new("a.jpg");
    image.add_keypoints(KeyPoints::new());
    CocoKeypointFormat.write(&image, &path).unwrap();

    let doc = read_json(&path);
    assert_eq!(doc["type"], "instances");
    assert_eq!(doc["info"]["year"], 2017);

    let other = &doc["images"][0];
    assert_eq!(other["coco_url"], "http://u");
    assert_eq!(other["date_captured"], "2013-11-14");

    let crowd = &doc["annotations"][0];
    assert_eq!(crowd["segmentation"]["counts"], json!([1, 2]));
    let detection = &doc["annotations"][1];
    assert_eq!(detection["score"], 0.9);
    assert!(detection.get("keypoints").is_none());
    assert!(detection.get("num_keypoints").is_none());

    // New image and pose get ids past the existing ones
    assert_eq!(doc["images"][1]["id"], 8);
    assert_eq!(doc["annotations"][2]["id"], 3);
    assert_eq!(doc["categories"].as_array().unwrap().len(), 2);
}

#[test]
fn test_read_skips_non_pose_annotations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coco.json");

    let mut doc = foreign_dataset();
    let mut flat = vec![json!(0); KEYPOINT_COUNT * 3];
    flat[0] = json!(3.0);
    flat[1] = json!(4.0);
    flat[2] = json!(2);
    doc["annotations"].as_array_mut().unwrap().push(json!({
        "id": 9, "image_id": 7, "category_id": 1, "iscrowd": 0,
        "segmentation": [], "area": 0.0, "bbox": [],
        "num_keypoints": 1, "keypoints": flat
    }));
    std::fs::write(&path, doc.to_string()).unwrap();

    let result = CocoKeypointFormat.read(&path, "other.jpg").unwrap();
    assert_eq!(result.keypoints.len(), 1);
    assert_eq!(result.keypoints[0].get(KeypointName::Nose), Some((3.0, 4.0)));
    assert_eq!(result.dimensions, Some((64, 48)));

    let loaded = KeyPoints::load(&path).unwrap();
    assert_eq!(loaded.num_labeled(), 1);
}
