//! Fixed-topology 18-point human pose skeleton.
//!
//! A [`KeyPoints`] record maps each [`KeypointName`] to an optional point.
//! Points are normally captured one at a time in [`KeypointName::ALL`]
//! order while the user clicks on the image; [`SKELETON`] lists which
//! named points are joined when the pose is drawn.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::shape::Point;

/// Number of named points in the skeleton.
pub const KEYPOINT_COUNT: usize = 18;

/// Visibility flag for a point that was never labeled.
pub const VISIBILITY_UNLABELED: u8 = 0;

/// Visibility flag for a labeled, visible point.
pub const VISIBILITY_LABELED: u8 = 2;

/// Named anatomical locations, in capture order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeypointName {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    Neck,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl KeypointName {
    /// All names in capture and serialization order.
    pub const ALL: [KeypointName; KEYPOINT_COUNT] = [
        KeypointName::Nose,
        KeypointName::LeftEye,
        KeypointName::RightEye,
        KeypointName::LeftEar,
        KeypointName::RightEar,
        KeypointName::Neck,
        KeypointName::LeftShoulder,
        KeypointName::RightShoulder,
        KeypointName::LeftElbow,
        KeypointName::RightElbow,
        KeypointName::LeftWrist,
        KeypointName::RightWrist,
        KeypointName::LeftHip,
        KeypointName::RightHip,
        KeypointName::LeftKnee,
        KeypointName::RightKnee,
        KeypointName::LeftAnkle,
        KeypointName::RightAnkle,
    ];

    /// Position of this name in [`KeypointName::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name as written to disk.
    pub fn as_str(self) -> &'static str {
        match self {
            KeypointName::Nose => "nose",
            KeypointName::LeftEye => "left_eye",
            KeypointName::RightEye => "right_eye",
            KeypointName::LeftEar => "left_ear",
            KeypointName::RightEar => "right_ear",
            KeypointName::Neck => "neck",
            KeypointName::LeftShoulder => "left_shoulder",
            KeypointName::RightShoulder => "right_shoulder",
            KeypointName::LeftElbow => "left_elbow",
            KeypointName::RightElbow => "right_elbow",
            KeypointName::LeftWrist => "left_wrist",
            KeypointName::RightWrist => "right_wrist",
            KeypointName::LeftHip => "left_hip",
            KeypointName::RightHip => "right_hip",
            KeypointName::LeftKnee => "left_knee",
            KeypointName::RightKnee => "right_knee",
            KeypointName::LeftAnkle => "left_ankle",
            KeypointName::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for KeypointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connections drawn between named points.
pub const SKELETON: [(KeypointName, KeypointName); 20] = {
    use KeypointName::*;
    [
        // Face
        (Nose, LeftEye),
        (Nose, RightEye),
        (LeftEye, LeftEar),
        (RightEye, RightEar),
        // Neck
        (Neck, Nose),
        (Neck, RightShoulder),
        (Neck, LeftShoulder),
        // Arms
        (LeftEar, LeftShoulder),
        (RightEar, RightShoulder),
        (LeftShoulder, LeftElbow),
        (RightShoulder, RightElbow),
        (LeftElbow, LeftWrist),
        (RightElbow, RightWrist),
        // Torso
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        // Legs
        (LeftHip, LeftKnee),
        (RightHip, RightKnee),
        (LeftKnee, LeftAnkle),
        (RightKnee, RightAnkle),
    ]
};

/// One stored keypoint: `[x, y, visibility]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointTriple(pub f64, pub f64, pub u8);

impl KeypointTriple {
    /// The all-zero triple written for an unlabeled point.
    pub const UNLABELED: KeypointTriple = KeypointTriple(0.0, 0.0, VISIBILITY_UNLABELED);

    /// Triple for an optional point.
    pub fn from_point(point: Option<Point>) -> Self {
        match point {
            Some((x, y)) => KeypointTriple(x, y, VISIBILITY_LABELED),
            None => Self::UNLABELED,
        }
    }

    /// The point this triple describes, if it was labeled.
    pub fn point(&self) -> Option<Point> {
        (self.2 != VISIBILITY_UNLABELED).then_some((self.0, self.1))
    }
}

/// Errors raised while editing or unpacking a keypoint record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeypointError {
    /// Stored data does not hold exactly one entry per named point.
    #[error("Expected {expected} keypoints, found {found}")]
    Count {
        /// Required number of keypoints
        expected: usize,
        /// Number actually present
        found: usize,
    },

    /// Every named point has already been assigned.
    #[error("All keypoints are already set")]
    Complete,
}

/// A single pose: one optional point per [`KeypointName`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyPoints {
    points: [Option<Point>; KEYPOINT_COUNT],
    /// Number of points assigned through [`KeyPoints::set_keypoint`].
    index: usize,
    /// Whether the record changed since it was created, loaded or saved.
    changed: bool,
    /// Size of the annotated image, used by the COCO save path.
    image_size: Option<(u32, u32)>,
}

impl KeyPoints {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a record from exactly [`KEYPOINT_COUNT`] stored triples.
    pub fn from_triples(triples: &[KeypointTriple]) -> Result<Self, KeypointError> {
        if triples.len() != KEYPOINT_COUNT {
            return Err(KeypointError::Count {
                expected: KEYPOINT_COUNT,
                found: triples.len(),
            });
        }

        let mut record = Self::new();
        for (slot, triple) in record.points.iter_mut().zip(triples) {
            *slot = triple.point();
        }
        Ok(record)
    }

    /// Rebuild a record from a flat `[x, y, v, x, y, v, ...]` list.
    pub fn from_flat(values: &[f64]) -> Result<Self, KeypointError> {
        if values.len() != KEYPOINT_COUNT * 3 {
            return Err(KeypointError::Count {
                expected: KEYPOINT_COUNT,
                found: values.len() / 3,
            });
        }

        let triples: Vec<KeypointTriple> = values
            .chunks_exact(3)
            .map(|c| {
                let visibility = if c[2] != 0.0 {
                    VISIBILITY_LABELED
                } else {
                    VISIBILITY_UNLABELED
                };
                KeypointTriple(c[0], c[1], visibility)
            })
            .collect();
        Self::from_triples(&triples)
    }

    /// Set the size of the image this pose belongs to.
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_size = Some((width, height));
    }

    /// Size of the annotated image, if known.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    /// Assign `point` to the next unassigned name in capture order.
    ///
    /// Returns the name that received the point.
    pub fn set_keypoint(&mut self, point: Point) -> Result<KeypointName, KeypointError> {
        let name = self.next_name().ok_or(KeypointError::Complete)?;
        self.points[name.index()] = Some(point);
        self.index += 1;
        self.changed = true;
        log::trace!("Set keypoint {} at ({}, {})", name, point.0, point.1);
        Ok(name)
    }

    /// The name the next [`KeyPoints::set_keypoint`] call will assign.
    pub fn next_name(&self) -> Option<KeypointName> {
        KeypointName::ALL.get(self.index).copied()
    }

    /// Whether every name has been assigned in capture order.
    pub fn is_complete(&self) -> bool {
        self.index == KEYPOINT_COUNT
    }

    /// Number of points assigned in capture order so far.
    pub fn fill_index(&self) -> usize {
        self.index
    }

    /// Point stored for `name`.
    pub fn get(&self, name: KeypointName) -> Option<Point> {
        self.points[name.index()]
    }

    /// Overwrite or clear the point for `name` without moving the capture index.
    pub fn set(&mut self, name: KeypointName, point: Option<Point>) {
        self.points[name.index()] = point;
        self.changed = true;
    }

    /// Present points with their names, in capture order.
    pub fn labeled(&self) -> impl Iterator<Item = (KeypointName, Point)> + '_ {
        KeypointName::ALL
            .iter()
            .zip(self.points.iter())
            .filter_map(|(name, point)| point.map(|p| (*name, p)))
    }

    /// Number of present points.
    pub fn num_labeled(&self) -> usize {
        self.points.iter().filter(|p| p.is_some()).count()
    }

    /// Whether the record has unsaved changes.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Mark the record as saved.
    pub fn mark_saved(&mut self) {
        self.changed = false;
    }

    /// Clear every point and restart capture from the first name.
    pub fn reset(&mut self) {
        self.points = [None; KEYPOINT_COUNT];
        self.index = 0;
    }

    /// Pack into stored triples in [`KeypointName::ALL`] order.
    pub fn to_triples(&self) -> [KeypointTriple; KEYPOINT_COUNT] {
        self.points.map(KeypointTriple::from_point)
    }

    /// Pack into the flat COCO layout.
    pub fn to_flat(&self) -> Vec<f64> {
        self.to_triples()
            .iter()
            .flat_map(|t| [t.0, t.1, f64::from(t.2)])
            .collect()
    }
}
