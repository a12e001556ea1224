// MediaPipe hand landmark integration
// The Python backend is compiled only with the `ml-pyo3` feature

use super::HandDetector;
use crate::models::camera::VideoFrame;
use crate::models::hand::{HandPrediction, HandResult};
use async_trait::async_trait;

// ==============================================================================
// PyO3 Implementation (Python MediaPipe)
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub mod pyo3_backend {
    use super::*;
    use crate::models::hand::{CoordinateSpace, HandError, Handedness, Landmark, LandmarkSet};
    use pyo3::prelude::*;
    use pyo3::types::{PyBytes, PyDict};
    use serde_json::Value;
    use tracing::info;

    /// Directory holding `mediapipe_hands.py`, overridable with `GESTURE_AR_PYTHON_DIR`
    fn python_dir() -> std::path::PathBuf {
        std::env::var("GESTURE_AR_PYTHON_DIR")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| std::env::current_dir().unwrap_or_default().join("python"))
    }

    pub struct MediaPipeDetector {
        inference_module: Py<PyModule>,
        max_num_hands: u32,
    }

    impl MediaPipeDetector {
        pub fn load(max_num_hands: u32) -> HandResult<Self> {
            Python::with_gil(|py| {
                let sys = py
                    .import_bound("sys")
                    .map_err(|e| HandError::ModelLoadFailed(format!("Failed to import sys: {}", e)))?;
                let path_list = sys
                    .getattr("path")
                    .map_err(|e| HandError::ModelLoadFailed(format!("Failed to get sys.path: {}", e)))?;

                let dir = python_dir();
                path_list
                    .call_method1("insert", (0, dir.to_string_lossy().to_string()))
                    .map_err(|e| HandError::ModelLoadFailed(format!("Failed to extend sys.path: {}", e)))?;

                let module = py.import_bound("mediapipe_hands").map_err(|e| {
                    HandError::ModelLoadFailed(format!(
                        "Failed to import mediapipe_hands from {}: {}",
                        dir.display(),
                        e
                    ))
                })?;

                info!("MediaPipe hand landmarker loaded (max_num_hands={})", max_num_hands);

                Ok(Self {
                    inference_module: module.unbind(),
                    max_num_hands,
                })
            })
        }

        fn parse_hands(json: &str) -> HandResult<Vec<HandPrediction>> {
            let result: Value = serde_json::from_str(json)
                .map_err(|e| HandError::InferenceFailed(format!("Failed to parse JSON: {}", e)))?;

            let hands = match result.get("hands").and_then(|h| h.as_array()) {
                Some(hands) => hands,
                None => return Ok(vec![]),
            };

            hands.iter().map(Self::parse_hand).collect()
        }

        fn parse_hand(data: &Value) -> HandResult<HandPrediction> {
            let keypoints = data
                .get("keypoints")
                .and_then(|k| k.as_array())
                .ok_or_else(|| HandError::InferenceFailed("Missing hand keypoints".to_string()))?;

            let points: Vec<Landmark> = keypoints
                .iter()
                .map(|kp| {
                    let coord = |name: &str| kp.get(name).and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
                    Landmark::new(coord("x"), coord("y"), coord("z"))
                })
                .collect();

            let handedness = match data.get("hand_type").and_then(|t| t.as_str()) {
                Some("Left") => Some(Handedness::Left),
                Some("Right") => Some(Handedness::Right),
                _ => None,
            };

            let confidence = data
                .get("confidence")
                .and_then(|c| c.as_f64())
                .unwrap_or(0.0) as f32;

            Ok(HandPrediction {
                landmarks: LandmarkSet::from_slice(&points)?,
                space: CoordinateSpace::Normalized,
                handedness,
                confidence,
            })
        }
    }

    #[async_trait]
    impl HandDetector for MediaPipeDetector {
        async fn estimate_hands(&self, frame: &VideoFrame) -> HandResult<Vec<HandPrediction>> {
            let json = Python::with_gil(|py| -> PyResult<String> {
                let module = self.inference_module.bind(py);
                let estimate = module.getattr("estimate_hands")?;

                let kwargs = PyDict::new_bound(py);
                kwargs.set_item("image_bytes", PyBytes::new_bound(py, &frame.data))?;
                kwargs.set_item("width", frame.width)?;
                kwargs.set_item("height", frame.height)?;
                kwargs.set_item("channels", frame.format.bytes_per_pixel())?;
                kwargs.set_item("max_num_hands", self.max_num_hands)?;

                estimate.call((), Some(&kwargs))?.extract::<String>()
            })
            .map_err(|e| HandError::InferenceFailed(format!("MediaPipe inference failed: {}", e)))?;

            Self::parse_hands(&json)
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn get_model_info(&self) -> String {
            format!(
                "PyO3 MediaPipe hand landmarker (max {} hands)",
                self.max_num_hands
            )
        }
    }
}

// ==============================================================================
// No-op Implementation
// ==============================================================================

/// Detector that never sees a hand
#[derive(Debug, Default)]
pub struct NoHandsDetector;

#[async_trait]
impl HandDetector for NoHandsDetector {
    async fn estimate_hands(&self, _frame: &VideoFrame) -> HandResult<Vec<HandPrediction>> {
        Ok(vec![])
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn get_model_info(&self) -> String {
        "No-op hand detector (always reports zero hands)".to_string()
    }
}
