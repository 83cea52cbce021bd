//! Camera Capture Library for Driver Monitoring
//!
//! Provides the cabin camera frame type and the whole-frame
//! luminance statistics (brightness, contrast) used to detect a
//! blocked or covered lens.

pub mod frame;
pub mod stats;

pub use frame::{PixelFormat, VideoFrame};
pub use stats::FrameStats;

use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Frame buffer size {actual} does not match {width}x{height} {format:?} ({expected} bytes)")]
    BufferSize {
        format: PixelFormat,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
