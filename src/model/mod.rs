//! Data models for shapes and pose keypoints.

mod keypoint;
mod shape;

pub use keypoint::{
    KEYPOINT_COUNT, KeyPoints, KeypointError, KeypointName, KeypointTriple, SKELETON,
    VISIBILITY_LABELED, VISIBILITY_UNLABELED,
};
pub use shape::{CenterBox, MIN_SHAPE_POINTS, Point, Shape};
