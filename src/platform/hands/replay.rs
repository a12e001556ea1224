// Replays recorded hand landmarks, one scripted frame per inference call

use super::HandDetector;
use crate::models::camera::VideoFrame;
use crate::models::hand::{
    CoordinateSpace, HandError, HandPrediction, HandResult, Handedness, LandmarkSet,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One recorded hand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptHand {
    pub landmarks: LandmarkSet,
    #[serde(default)]
    pub handedness: Option<Handedness>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptFrame {
    #[serde(default)]
    pub hands: Vec<ScriptHand>,
}

/// A recorded landmark sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkScript {
    #[serde(default)]
    pub coordinate_space: CoordinateSpace,
    pub frames: Vec<ScriptFrame>,
}

impl LandmarkScript {
    pub fn load(path: &Path) -> HandResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HandError::ModelLoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            HandError::ModelLoadFailed(format!("Invalid landmark script {}: {}", path.display(), e))
        })
    }
}

pub struct ReplayDetector {
    script: LandmarkScript,
    cursor: AtomicUsize,
    repeat: bool,
}

impl ReplayDetector {
    pub fn new(script: LandmarkScript, repeat: bool) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
            repeat,
        }
    }

    pub fn load(path: &Path, repeat: bool) -> HandResult<Self> {
        Ok(Self::new(LandmarkScript::load(path)?, repeat))
    }

    /// Frames handed out so far
    pub fn frames_replayed(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    fn frame_at(&self, call: usize) -> Option<&ScriptFrame> {
        let len = self.script.frames.len();
        if len == 0 {
            return None;
        }
        if self.repeat {
            self.script.frames.get(call % len)
        } else {
            self.script.frames.get(call)
        }
    }
}

#[async_trait]
impl HandDetector for ReplayDetector {
    async fn estimate_hands(&self, _frame: &VideoFrame) -> HandResult<Vec<HandPrediction>> {
        let call = self.cursor.fetch_add(1, Ordering::SeqCst);
        let hands = match self.frame_at(call) {
            Some(frame) => frame
                .hands
                .iter()
                .map(|hand| HandPrediction {
                    landmarks: hand.landmarks,
                    space: self.script.coordinate_space,
                    handedness: hand.handedness,
                    confidence: hand.confidence,
                })
                .collect(),
            None => vec![],
        };
        Ok(hands)
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn get_model_info(&self) -> String {
        format!(
            "Landmark replay ({} frames, {:?} coordinates{})",
            self.script.frames.len(),
            self.script.coordinate_space,
            if self.repeat { ", repeating" } else { "" }
        )
    }
}
