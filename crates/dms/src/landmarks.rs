//! Facial landmark geometry in the 68-point canonical layout

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::DmsError;

/// Number of points in the canonical layout
pub const LANDMARK_COUNT: usize = 68;

pub const LEFT_EYEBROW: Range<usize> = 17..22;
pub const RIGHT_EYEBROW: Range<usize> = 22..27;
pub const LEFT_EYE: Range<usize> = 36..42;
pub const RIGHT_EYE: Range<usize> = 42..48;
pub const OUTER_MOUTH: Range<usize> = 48..60;
pub const INNER_MOUTH: Range<usize> = 60..68;

/// Eyebrow point paired with the eyelid point below it
pub const EYEBROW_EYELID_PAIRS: [(usize, usize); 4] = [(19, 37), (17, 38), (24, 43), (26, 44)];

/// 2-D pixel coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Arithmetic mean of a set of points
    pub fn centroid(points: &[Point]) -> Option<Point> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Validated landmark set of one detected face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<Point>,
}

impl FaceLandmarks {
    /// Wrap a landmark list, rejecting lists shorter than the canonical layout
    pub fn new(points: Vec<Point>) -> Result<Self, DmsError> {
        if points.len() < LANDMARK_COUNT {
            return Err(DmsError::KeypointsMissing {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Left eye in EAR order: outer corner, upper lid x2, inner corner, lower lid x2
    pub fn left_eye(&self) -> &[Point] {
        &self.points[LEFT_EYE]
    }

    pub fn right_eye(&self) -> &[Point] {
        &self.points[RIGHT_EYE]
    }

    /// Outer lip contour, corners at 0 and 6
    pub fn outer_mouth(&self) -> &[Point] {
        &self.points[OUTER_MOUTH]
    }

    pub fn inner_mouth(&self) -> &[Point] {
        &self.points[INNER_MOUTH]
    }

    pub fn left_eyebrow(&self) -> &[Point] {
        &self.points[LEFT_EYEBROW]
    }

    pub fn right_eyebrow(&self) -> &[Point] {
        &self.points[RIGHT_EYEBROW]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_landmark_list() {
        let err = FaceLandmarks::new(vec![Point::default(); 5]).unwrap_err();
        assert!(matches!(err, DmsError::KeypointsMissing { expected: 68, actual: 5 }));
    }

    #[test]
    fn test_region_slices() {
        let points = (0..68).map(|i| Point::new(i as f64, 0.0)).collect();
        let face = FaceLandmarks::new(points).unwrap();

        assert_eq!(face.left_eye().len(), 6);
        assert_eq!(face.left_eye()[0].x, 36.0);
        assert_eq!(face.right_eye()[5].x, 47.0);
        assert_eq!(face.outer_mouth().len(), 12);
        assert_eq!(face.inner_mouth()[0].x, 60.0);
        assert_eq!(face.left_eyebrow().len(), 5);
        assert_eq!(face.right_eyebrow()[4].x, 26.0);
    }

    #[test]
    fn test_centroid() {
        let c = Point::centroid(&[Point::new(0.0, 0.0), Point::new(4.0, 2.0)]).unwrap();
        assert_eq!(c, Point::new(2.0, 1.0));
        assert!(Point::centroid(&[]).is_none());
    }

    #[test]
    fn test_point_deserializes_from_pair() {
        let p: Point = serde_json::from_str("[3.0, 4.0]").unwrap();
        assert_eq!(p.distance(&Point::default()), 5.0);
    }
}
