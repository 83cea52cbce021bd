//! Video frame types and processing

use image::GrayImage;

use crate::CameraError;

/// Pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb24,
    Gray8,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Rgb24 => 3,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Decoded video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Pixel data (width * height * channels)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Pixel layout of `data`
    pub format: PixelFormat,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame, checking the buffer matches the dimensions
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        timestamp_ns: u64,
        sequence: u32,
    ) -> Result<Self, CameraError> {
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(CameraError::BufferSize {
                format,
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            format,
            timestamp_ns,
            sequence,
        })
    }

    /// Get pixel at (x, y) as RGB
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * self.format.channels();
        match self.format {
            PixelFormat::Rgb24 => Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]]),
            PixelFormat::Gray8 => Some([self.data[idx]; 3]),
        }
    }

    /// Convert to grayscale
    pub fn to_grayscale(&self) -> Vec<u8> {
        match self.format {
            PixelFormat::Gray8 => self.data.clone(),
            PixelFormat::Rgb24 => self
                .data
                .chunks_exact(3)
                .map(|pixel| {
                    // Luminance formula: 0.299*R + 0.587*G + 0.114*B
                    (pixel[0] as f32 * 0.299 + pixel[1] as f32 * 0.587 + pixel[2] as f32 * 0.114)
                        as u8
                })
                .collect(),
        }
    }

    /// Convert to a grayscale image buffer
    pub fn to_gray_image(&self) -> Result<GrayImage, CameraError> {
        GrayImage::from_raw(self.width, self.height, self.to_grayscale())
            .ok_or_else(|| CameraError::Format("Failed to create grayscale buffer".into()))
    }

    /// Frame timestamp in seconds
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1e9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_checked() {
        let err = VideoFrame::new(vec![0; 10], 2, 2, PixelFormat::Rgb24, 0, 0).unwrap_err();
        assert!(matches!(err, CameraError::BufferSize { expected: 12, actual: 10, .. }));
    }

    #[test]
    fn test_buffer_size_error_names_format() {
        let err = VideoFrame::new(vec![0; 3], 2, 2, PixelFormat::Gray8, 0, 0).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Gray8"), "{message}");
        assert!(!message.contains("RGB"), "{message}");
        assert!(message.contains("(4 bytes)"), "{message}");
    }

    #[test]
    fn test_grayscale_luminance() {
        let frame = VideoFrame::new(
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
            2,
            2,
            PixelFormat::Rgb24,
            0,
            0,
        )
        .unwrap();

        let gray = frame.to_grayscale();
        assert_eq!(gray.len(), 4);
        assert_eq!(gray[0], 76); // 0.299 * 255
        assert_eq!(gray[1], 149); // 0.587 * 255
        assert_eq!(gray[2], 29); // 0.114 * 255
        assert!(gray[3] >= 254);
    }

    #[test]
    fn test_gray_passthrough() {
        let frame = VideoFrame::new(vec![1, 2, 3, 4], 2, 2, PixelFormat::Gray8, 1_500_000_000, 7).unwrap();
        assert_eq!(frame.to_grayscale(), vec![1, 2, 3, 4]);
        assert_eq!(frame.get_pixel(1, 1), Some([4, 4, 4]));
        assert_eq!(frame.get_pixel(2, 0), None);
        assert!((frame.timestamp_secs() - 1.5).abs() < 1e-9);
    }
}
