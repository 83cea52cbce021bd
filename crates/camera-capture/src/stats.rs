//! Whole-frame luminance statistics

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::{CameraError, VideoFrame};

/// Brightness and contrast of a grayscale frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Mean intensity (0-255)
    pub brightness: f64,
    /// Population standard deviation of intensity
    pub contrast: f64,
}

impl FrameStats {
    /// Compute statistics from a grayscale image
    pub fn from_gray(image: &GrayImage) -> Self {
        let pixels = image.as_raw();
        if pixels.is_empty() {
            return Self::default();
        }

        let n = pixels.len() as f64;
        let mean = pixels.iter().map(|&p| p as f64).sum::<f64>() / n;
        let variance = pixels
            .iter()
            .map(|&p| {
                let d = p as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Self {
            brightness: mean,
            contrast: variance.sqrt(),
        }
    }

    /// Compute statistics from a captured frame
    pub fn from_frame(frame: &VideoFrame) -> Result<Self, CameraError> {
        Ok(Self::from_gray(&frame.to_gray_image()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelFormat;
    use proptest::prelude::*;

    #[test]
    fn test_uniform_frame_has_zero_contrast() {
        let image = GrayImage::from_pixel(8, 8, image::Luma([30]));
        let stats = FrameStats::from_gray(&image);
        assert!((stats.brightness - 30.0).abs() < 1e-9);
        assert_eq!(stats.contrast, 0.0);
    }

    #[test]
    fn test_checkerboard_contrast() {
        let image = GrayImage::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                image::Luma([0])
            } else {
                image::Luma([200])
            }
        });
        let stats = FrameStats::from_gray(&image);
        assert!((stats.brightness - 100.0).abs() < 1e-9);
        assert!((stats.contrast - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_image() {
        let image = GrayImage::new(0, 0);
        assert_eq!(FrameStats::from_gray(&image), FrameStats::default());
    }

    #[test]
    fn test_from_frame() {
        let frame = VideoFrame::new(vec![10, 10, 50, 50], 2, 2, PixelFormat::Gray8, 0, 0).unwrap();
        let stats = FrameStats::from_frame(&frame).unwrap();
        assert!((stats.brightness - 30.0).abs() < 1e-9);
        assert!((stats.contrast - 20.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_stats_stay_in_pixel_range(pixels in proptest::collection::vec(0u8..=255, 1..256)) {
            let width = pixels.len() as u32;
            let image = GrayImage::from_raw(width, 1, pixels).unwrap();
            let stats = FrameStats::from_gray(&image);
            prop_assert!((0.0..=255.0).contains(&stats.brightness));
            prop_assert!((0.0..=127.5 + 1e-9).contains(&stats.contrast));
        }
    }
}
