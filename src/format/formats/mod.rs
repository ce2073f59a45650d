//! Annotation format implementations.

mod coco_keypoints;
mod createml;

#[cfg(test)]
mod tests;

pub use coco_keypoints::{CocoKeypointFormat, PERSON_CATEGORY_ID};
pub use createml::CreateMlFormat;
