// Data structures for camera streams and video frames

use serde::{Deserialize, Serialize};

/// Preferred camera orientation when opening a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Front-facing (selfie) camera
    User,
    /// Rear-facing camera
    #[default]
    Environment,
}

impl FacingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
        }
    }
}

/// Description of an opened camera stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamInfo {
    pub device_name: String,
    pub width: u32,
    pub height: u32,
    /// Facing of the device actually opened, when the source knows it
    pub facing: Option<FacingMode>,
}

/// A single frame pulled from a camera stream
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub timestamp: i64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

/// Pixel format of captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGBA8,
    RGB8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::RGBA8 => 4,
            PixelFormat::RGB8 => 3,
        }
    }
}

/// Error types for camera operations
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("No camera device found: {0}")]
    DeviceNotFound(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Camera stream is not open")]
    NotOpen,
}

pub type CaptureResult<T> = Result<T, CaptureError>;
