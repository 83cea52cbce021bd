//! Scalar signals derived from one face's landmarks

use serde::{Deserialize, Serialize};

use crate::landmarks::{FaceLandmarks, Point, EYEBROW_EYELID_PAIRS};

/// MAR reported when the mouth corners coincide
pub const DEGENERATE_MAR: f64 = 0.001;

/// Per-frame facial measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    /// Left eye aspect ratio, `None` when the eye width is zero
    pub left_ear: Option<f64>,
    pub right_ear: Option<f64>,
    /// Mean of both eyes, `None` if either eye is degenerate
    pub avg_ear: Option<f64>,
    /// Mouth aspect ratio
    pub mar: f64,
    /// Mean eyebrow-to-eyelid distance (pixels)
    pub eyebrow_eye_dist: f64,
    pub left_eye_center: Point,
    pub right_eye_center: Point,
    /// Monotonic frame time (seconds)
    pub timestamp_s: f64,
}

/// Eye aspect ratio: (|p1-p5| + |p2-p4|) / (2 |p0-p3|)
pub fn eye_aspect_ratio(eye: &[Point]) -> Option<f64> {
    let [p0, p1, p2, p3, p4, p5] = <[Point; 6]>::try_from(eye).ok()?;
    let width = p0.distance(&p3);
    if width == 0.0 {
        return None;
    }
    Some((p1.distance(&p5) + p2.distance(&p4)) / (2.0 * width))
}

/// Mouth aspect ratio over the 12-point outer lip contour
pub fn mouth_aspect_ratio(mouth: &[Point]) -> f64 {
    if mouth.len() < 12 {
        return DEGENERATE_MAR;
    }
    let width = mouth[0].distance(&mouth[6]);
    if width == 0.0 {
        return DEGENERATE_MAR;
    }
    let a = mouth[3].distance(&mouth[9]);
    let b = mouth[2].distance(&mouth[10]);
    let c = mouth[4].distance(&mouth[8]);
    (a + b + c) / (3.0 * width)
}

/// Mean distance between paired eyebrow and upper-eyelid points
pub fn eyebrow_eye_distance(face: &FaceLandmarks) -> f64 {
    let total: f64 = EYEBROW_EYELID_PAIRS
        .iter()
        .map(|&(brow, lid)| face.point(brow).distance(&face.point(lid)))
        .sum();
    total / EYEBROW_EYELID_PAIRS.len() as f64
}

/// Converts a landmark set into frame metrics
pub struct MetricExtractor;

impl MetricExtractor {
    pub fn extract(face: &FaceLandmarks, timestamp_s: f64) -> FrameMetrics {
        let left_ear = eye_aspect_ratio(face.left_eye());
        let right_ear = eye_aspect_ratio(face.right_eye());
        let avg_ear = left_ear.zip(right_ear).map(|(l, r)| (l + r) / 2.0);

        FrameMetrics {
            left_ear,
            right_ear,
            avg_ear,
            mar: mouth_aspect_ratio(face.outer_mouth()),
            eyebrow_eye_dist: eyebrow_eye_distance(face),
            left_eye_center: Point::centroid(face.left_eye()).unwrap_or_default(),
            right_eye_center: Point::centroid(face.right_eye()).unwrap_or_default(),
            timestamp_s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eye(width: f64, height: f64) -> [Point; 6] {
        [
            Point::new(0.0, 0.0),
            Point::new(width / 3.0, -height / 2.0),
            Point::new(2.0 * width / 3.0, -height / 2.0),
            Point::new(width, 0.0),
            Point::new(2.0 * width / 3.0, height / 2.0),
            Point::new(width / 3.0, height / 2.0),
        ]
    }

    #[test]
    fn test_ear_open_eye() {
        let ear = eye_aspect_ratio(&eye(30.0, 9.0)).unwrap();
        assert!((ear - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_ear_zero_width_is_skipped() {
        let degenerate = [Point::new(5.0, 5.0); 6];
        assert_eq!(eye_aspect_ratio(&degenerate), None);
    }

    #[test]
    fn test_mar_degenerate_width() {
        let mouth = [Point::new(1.0, 1.0); 12];
        assert_eq!(mouth_aspect_ratio(&mouth), DEGENERATE_MAR);
    }

    #[test]
    fn test_mar_open_mouth() {
        let mut mouth = [Point::default(); 12];
        mouth[0] = Point::new(0.0, 0.0);
        mouth[6] = Point::new(40.0, 0.0);
        for (top, bottom) in [(2, 10), (3, 9), (4, 8)] {
            mouth[top] = Point::new(20.0, -16.0);
            mouth[bottom] = Point::new(20.0, 16.0);
        }
        assert!((mouth_aspect_ratio(&mouth) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_extract_eyebrow_distance_and_centers() {
        let mut points = vec![Point::default(); 68];
        for (i, p) in eye(30.0, 9.0).into_iter().enumerate() {
            points[36 + i] = Point::new(p.x + 100.0, p.y + 50.0);
            points[42 + i] = Point::new(p.x + 200.0, p.y + 50.0);
        }
        // Raise the upper lids to y=20, eyebrows sit at y=0
        points[37] = Point::new(110.0, 20.0);
        points[38] = Point::new(120.0, 20.0);
        points[43] = Point::new(210.0, 20.0);
        points[44] = Point::new(220.0, 20.0);
        for (brow, lid) in EYEBROW_EYELID_PAIRS {
            points[brow] = Point::new(points[lid].x, 0.0);
        }

        let face = FaceLandmarks::new(points).unwrap();
        let metrics = MetricExtractor::extract(&face, 12.5);

        assert!((metrics.eyebrow_eye_dist - 20.0).abs() < 1e-9);
        assert_eq!(metrics.timestamp_s, 12.5);
        assert!(metrics.left_eye_center.x > 100.0 && metrics.left_eye_center.x < 130.0);
        assert!(metrics.right_eye_center.x > 200.0);
    }

    #[test]
    fn test_avg_ear_requires_both_eyes() {
        let mut points = vec![Point::default(); 68];
        for (i, p) in eye(30.0, 9.0).into_iter().enumerate() {
            points[36 + i] = p;
        }
        // Right eye left degenerate at the origin
        let face = FaceLandmarks::new(points).unwrap();
        let metrics = MetricExtractor::extract(&face, 0.0);

        assert!(metrics.left_ear.is_some());
        assert_eq!(metrics.right_ear, None);
        assert_eq!(metrics.avg_ear, None);
    }
}
