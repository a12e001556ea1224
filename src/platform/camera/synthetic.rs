// Blank-frame camera for headless runs and tests

use super::CameraSource;
use crate::models::camera::{CaptureError, CaptureResult, FacingMode, PixelFormat, StreamInfo, VideoFrame};
use async_trait::async_trait;

/// Produces black RGBA frames of a fixed size
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    deny_access: bool,
    is_open: bool,
    frames_served: u64,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            deny_access: false,
            is_open: false,
            frames_served: 0,
        }
    }

    /// A camera whose `open` fails as if the user refused permission
    pub fn denied() -> Self {
        Self {
            deny_access: true,
            ..Self::new(640, 480)
        }
    }

    pub fn frames_served(&self) -> u64 {
        self.frames_served
    }
}

#[async_trait]
impl CameraSource for SyntheticCamera {
    async fn open(&mut self, facing: FacingMode) -> CaptureResult<StreamInfo> {
        if self.deny_access {
            return Err(CaptureError::PermissionDenied(
                "camera access was refused".to_string(),
            ));
        }

        self.is_open = true;
        Ok(StreamInfo {
            device_name: "synthetic".to_string(),
            width: self.width,
            height: self.height,
            facing: Some(facing),
        })
    }

    async fn next_frame(&mut self) -> CaptureResult<VideoFrame> {
        if !self.is_open {
            return Err(CaptureError::NotOpen);
        }

        self.frames_served += 1;
        let len = self.width as usize * self.height as usize * PixelFormat::RGBA8.bytes_per_pixel();
        Ok(VideoFrame {
            timestamp: chrono::Utc::now().timestamp_millis(),
            width: self.width,
            height: self.height,
            data: vec![0; len],
            format: PixelFormat::RGBA8,
        })
    }

    async fn close(&mut self) -> CaptureResult<()> {
        self.is_open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.is_open
    }
}
