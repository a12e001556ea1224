// Camera stream sources
// Each source provides the same interface; the frame loop only sees `CameraSource`

pub mod image_sequence;
pub mod synthetic;

pub use image_sequence::ImageSequenceCamera;
pub use synthetic::SyntheticCamera;

use crate::models::camera::{CaptureResult, FacingMode, StreamInfo, VideoFrame};
use async_trait::async_trait;

/// A live (or replayed) video stream
#[async_trait]
pub trait CameraSource: Send {
    /// Acquire the stream. `facing` is a preference, not a hard requirement.
    async fn open(&mut self, facing: FacingMode) -> CaptureResult<StreamInfo>;

    /// Pull the current frame
    async fn next_frame(&mut self) -> CaptureResult<VideoFrame>;

    /// Release the stream
    async fn close(&mut self) -> CaptureResult<()>;

    fn is_open(&self) -> bool;
}
