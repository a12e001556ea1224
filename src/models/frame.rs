// Per-frame results handed from the frame loop to presenters

use crate::models::hand::{Gesture, Handedness, LandmarkSet};
use serde::{Deserialize, Serialize};

/// Radius of a landmark dot on the overlay canvas
pub const OVERLAY_DOT_RADIUS: f32 = 5.0;

/// One landmark drawn on the overlay canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayDot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// The first detected hand, in video-frame pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedHand {
    pub landmarks: LandmarkSet,
    pub handedness: Option<Handedness>,
    pub confidence: f32,
}

/// Everything a presenter needs to reflect one processed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOutcome {
    pub frame_index: u64,
    pub timestamp: i64,
    pub frame_width: u32,
    pub frame_height: u32,
    pub gesture: Gesture,
    pub hand: Option<TrackedHand>,
    /// Landmark dots in canvas space; empty when no hand was detected
    pub overlay: Vec<OverlayDot>,
}

impl FrameOutcome {
    /// Index fingertip position in normalized device coordinates of the viewport
    pub fn index_tip_ndc(&self) -> Option<(f32, f32)> {
        let hand = self.hand.as_ref()?;
        if self.frame_width == 0 || self.frame_height == 0 {
            return None;
        }
        let tip = hand.landmarks.index_tip();
        let x = tip.x / self.frame_width as f32 * 2.0 - 1.0;
        let y = -(tip.y / self.frame_height as f32) * 2.0 + 1.0;
        Some((x, y))
    }
}

/// Project pixel-space landmarks from a video frame onto a canvas of another size
pub fn project_overlay(
    landmarks: &LandmarkSet,
    frame_size: (u32, u32),
    canvas_size: (u32, u32),
) -> Vec<OverlayDot> {
    let (fw, fh) = (frame_size.0.max(1) as f32, frame_size.1.max(1) as f32);
    let (cw, ch) = (canvas_size.0 as f32, canvas_size.1 as f32);
    landmarks
        .points()
        .iter()
        .map(|p| OverlayDot {
            x: p.x / fw * cw,
            y: p.y / fh * ch,
            radius: OVERLAY_DOT_RADIUS,
        })
        .collect()
}
