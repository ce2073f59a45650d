//! Labeled shapes and their center-form bounding boxes.

/// A 2D point in image coordinates.
pub type Point = (f64, f64);

/// Minimum number of points a shape needs to span a bounding box.
pub const MIN_SHAPE_POINTS: usize = 2;

/// A labeled shape drawn on an image.
///
/// Rectangles are usually stored as four corners, but any point set is
/// accepted; its axis-aligned extent is what gets persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Label text shown next to the shape.
    pub label: String,
    /// Boundary points in image coordinates.
    pub points: Vec<Point>,
}

impl Shape {
    /// Create a new shape with the given label and points.
    pub fn new(label: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Create a rectangle from two opposite corners.
    ///
    /// Corners are emitted clockwise starting at the top-left.
    pub fn rectangle(label: impl Into<String>, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let bbox = CenterBox::from_corners(x1, y1, x2, y2);
        Self::new(label, bbox.corners().to_vec())
    }

    /// Axis-aligned bounding box of this shape, or `None` if it has too few points.
    pub fn bounding_box(&self) -> Option<CenterBox> {
        CenterBox::from_points(&self.points)
    }
}

/// Bounding box stored by its center and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterBox {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Width, never negative.
    pub width: f64,
    /// Height, never negative.
    pub height: f64,
}

impl CenterBox {
    /// Build a box from two opposite corners given in any order.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let x_min = x1.min(x2);
        let y_min = y1.min(y2);
        let width = (x2 - x1).abs();
        let height = (y2 - y1).abs();

        Self {
            x: x_min + width / 2.0,
            y: y_min + height / 2.0,
            width,
            height,
        }
    }

    /// Build the tightest box around a point set.
    ///
    /// Returns `None` for fewer than [`MIN_SHAPE_POINTS`] points.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.len() < MIN_SHAPE_POINTS {
            return None;
        }

        let min_x = points.iter().map(|(x, _)| *x).fold(f64::MAX, f64::min);
        let max_x = points.iter().map(|(x, _)| *x).fold(f64::MIN, f64::max);
        let min_y = points.iter().map(|(_, y)| *y).fold(f64::MAX, f64::min);
        let max_y = points.iter().map(|(_, y)| *y).fold(f64::MIN, f64::max);

        Some(Self::from_corners(min_x, min_y, max_x, max_y))
    }

    /// Top-left and bottom-right corners.
    pub fn min_max(&self) -> (Point, Point) {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        (
            (self.x - half_w, self.y - half_h),
            (self.x + half_w, self.y + half_h),
        )
    }

    /// The four corners, clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        let ((x_min, y_min), (x_max, y_max)) = self.min_max();
        [(x_min, y_min), (x_max, y_min), (x_max, y_max), (x_min, y_max)]
    }
}
