//! Per-frame input from the face/landmark detection stage

use camera_capture::{FrameStats, VideoFrame};
use serde::{Deserialize, Serialize};

use crate::landmarks::Point;
use crate::DmsError;

/// One detected face
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    /// Landmarks in the 68-point canonical layout
    pub landmarks: Vec<Point>,
}

/// Everything the engine consumes for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionFrame {
    /// Monotonic capture time (seconds)
    pub timestamp: f64,

    /// Whole-frame brightness and contrast
    #[serde(flatten)]
    pub stats: FrameStats,

    /// Faces found in this frame, most prominent first
    #[serde(default)]
    pub faces: Vec<DetectedFace>,
}

impl DetectionFrame {
    pub fn new(timestamp: f64, stats: FrameStats, faces: Vec<DetectedFace>) -> Self {
        Self {
            timestamp,
            stats,
            faces,
        }
    }

    /// Build from a captured frame, computing its luminance statistics
    pub fn from_video(frame: &VideoFrame, faces: Vec<DetectedFace>) -> Result<Self, DmsError> {
        Ok(Self {
            timestamp: frame.timestamp_secs(),
            stats: FrameStats::from_frame(frame)?,
            faces,
        })
    }

    pub fn face_detected(&self) -> bool {
        !self.faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_capture::PixelFormat;

    #[test]
    fn test_parse_json_line() {
        let line = r#"{"timestamp": 1.5, "brightness": 90.0, "contrast": 35.5, "faces": [{"landmarks": [[1.0, 2.0], [3.0, 4.0]]}]}"#;
        let frame: DetectionFrame = serde_json::from_str(line).unwrap();

        assert_eq!(frame.timestamp, 1.5);
        assert_eq!(frame.stats.contrast, 35.5);
        assert_eq!(frame.faces[0].landmarks[1], Point::new(3.0, 4.0));
    }

    #[test]
    fn test_faces_optional() {
        let frame: DetectionFrame =
            serde_json::from_str(r#"{"timestamp": 0.0, "brightness": 5.0, "contrast": 1.0}"#).unwrap();
        assert!(!frame.face_detected());
    }

    #[test]
    fn test_from_video() {
        let video = VideoFrame::new(vec![0; 16], 4, 4, PixelFormat::Gray8, 2_000_000_000, 1).unwrap();
        let frame = DetectionFrame::from_video(&video, vec![]).unwrap();
        assert_eq!(frame.timestamp, 2.0);
        assert_eq!(frame.stats.brightness, 0.0);
    }
}
