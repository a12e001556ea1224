// Hand landmark detection bridge
// The frame loop talks to any backend through `HandDetector`

pub mod mediapipe_bridge;
pub mod replay;

pub use mediapipe_bridge::NoHandsDetector;
#[cfg(feature = "ml-pyo3")]
pub use mediapipe_bridge::pyo3_backend::MediaPipeDetector;
pub use replay::{LandmarkScript, ReplayDetector};

use crate::models::camera::VideoFrame;
use crate::models::hand::{HandPrediction, HandResult};
use async_trait::async_trait;

/// A pretrained hand-landmark model
#[async_trait]
pub trait HandDetector: Send + Sync {
    /// Run inference on a frame. Zero or more hands, most confident first.
    async fn estimate_hands(&self, frame: &VideoFrame) -> HandResult<Vec<HandPrediction>>;

    /// Check if the model is loaded
    fn is_initialized(&self) -> bool;

    fn get_model_info(&self) -> String;
}
