// Data models for hand landmarks, detector output and gesture labels

use serde::{Deserialize, Serialize};

/// Number of landmarks in one detected hand
pub const LANDMARK_COUNT: usize = 21;

// ==============================================================================
// Landmarks
// ==============================================================================

/// Hand landmark indices (21 total, standard hand topology)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A single tracked point. `y` grows downward (screen convention).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// The ordered 21-point landmark set of one hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a slice; anything other than exactly 21 points is rejected
    pub fn from_slice(points: &[Landmark]) -> HandResult<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| HandError::InvalidLandmarkCount(points.len()))?;
        Ok(Self { points })
    }

    /// Build from `[x, y]` or `[x, y, z]` tuples as emitted by landmark detectors
    pub fn from_coords(coords: &[Vec<f32>]) -> HandResult<Self> {
        let mut points = Vec::with_capacity(coords.len());
        for (i, c) in coords.iter().enumerate() {
            match c.as_slice() {
                [x, y] => points.push(Landmark::new(*x, *y, 0.0)),
                [x, y, z] => points.push(Landmark::new(*x, *y, *z)),
                _ => return Err(HandError::InvalidCoordinate(i, c.len())),
            }
        }
        Self::from_slice(&points)
    }

    pub fn get(&self, landmark: HandLandmark) -> Landmark {
        self.points[landmark.index()]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn thumb_tip(&self) -> Landmark {
        self.get(HandLandmark::ThumbTip)
    }

    pub fn index_tip(&self) -> Landmark {
        self.get(HandLandmark::IndexFingerTip)
    }

    pub fn middle_tip(&self) -> Landmark {
        self.get(HandLandmark::MiddleFingerTip)
    }

    pub fn ring_tip(&self) -> Landmark {
        self.get(HandLandmark::RingFingerTip)
    }

    pub fn pinky_tip(&self) -> Landmark {
        self.get(HandLandmark::PinkyTip)
    }

    /// Scale normalized [0, 1] coordinates to the pixel space of a frame.
    /// `z` is left untouched.
    pub fn denormalize(&self, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let mut points = self.points;
        for p in points.iter_mut() {
            p.x *= w;
            p.y *= h;
        }
        Self { points }
    }
}

impl Serialize for LandmarkSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let coords: Vec<[f32; 3]> = self.points.iter().map(|p| [p.x, p.y, p.z]).collect();
        coords.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LandmarkSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coords = Vec::<Vec<f32>>::deserialize(deserializer)?;
        LandmarkSet::from_coords(&coords).map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// Detector Output
// ==============================================================================

/// Coordinate space of landmarks reported by a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// [0, 1] relative to frame width/height
    Normalized,
    /// Raw pixels of the source video frame
    #[default]
    Pixel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

/// One hand reported by a landmark detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandPrediction {
    pub landmarks: LandmarkSet,
    #[serde(default)]
    pub space: CoordinateSpace,
    #[serde(default)]
    pub handedness: Option<Handedness>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl HandPrediction {
    pub fn new(landmarks: LandmarkSet, space: CoordinateSpace) -> Self {
        Self {
            landmarks,
            space,
            handedness: None,
            confidence: 1.0,
        }
    }

    /// Landmarks expressed in the pixel space of a `width` x `height` frame
    pub fn pixel_landmarks(&self, width: u32, height: u32) -> LandmarkSet {
        match self.space {
            CoordinateSpace::Pixel => self.landmarks,
            CoordinateSpace::Normalized => self.landmarks.denormalize(width, height),
        }
    }
}

// ==============================================================================
// Gesture Labels
// ==============================================================================

/// Discrete classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    OpenHand,
    ClosedFist,
    ThumbsUp,
    ThumbsDown,
    Peace,
    Pointing,
    Ok,
    RockOn,
    SpreadFingers,
    /// A hand was detected but no predicate matched
    Unknown,
    /// No hand detected this frame
    None,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::OpenHand => "open_hand",
            Gesture::ClosedFist => "closed_fist",
            Gesture::ThumbsUp => "thumbs_up",
            Gesture::ThumbsDown => "thumbs_down",
            Gesture::Peace => "peace",
            Gesture::Pointing => "pointing",
            Gesture::Ok => "ok",
            Gesture::RockOn => "rock_on",
            Gesture::SpreadFingers => "spread_fingers",
            Gesture::Unknown => "unknown",
            Gesture::None => "none",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gesture::OpenHand => "Open Hand",
            Gesture::ClosedFist => "Closed Fist",
            Gesture::ThumbsUp => "Thumbs Up",
            Gesture::ThumbsDown => "Thumbs Down",
            Gesture::Peace => "Peace",
            Gesture::Pointing => "Pointing",
            Gesture::Ok => "OK",
            Gesture::RockOn => "Rock On",
            Gesture::SpreadFingers => "Spread Fingers",
            Gesture::Unknown => "Unknown Gesture",
            Gesture::None => "None",
        }
    }

    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            Gesture::OpenHand => Some("🖐️"),
            Gesture::ClosedFist => Some("✊"),
            Gesture::ThumbsUp => Some("👍"),
            Gesture::ThumbsDown => Some("👎"),
            Gesture::Peace => Some("✌️"),
            Gesture::Pointing => Some("☝️"),
            Gesture::Ok => Some("👌"),
            Gesture::RockOn => Some("🤘"),
            Gesture::SpreadFingers => Some("🖖"),
            Gesture::Unknown | Gesture::None => None,
        }
    }

    /// Text shown by label presenters, e.g. `"OK 👌"`
    pub fn display_text(&self) -> String {
        match self.glyph() {
            Some(glyph) => format!("{} {}", self.label(), glyph),
            None => self.label().to_string(),
        }
    }

    pub fn is_hand_present(&self) -> bool {
        !matches!(self, Gesture::None)
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Which predicate table the classifier evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierProfile {
    /// The full nine-predicate table
    #[default]
    Full,
    /// Index above middle fingertip means Pointing; anything else is Unknown
    PointingOnly,
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HandError {
    #[error("Expected 21 landmarks, got {0}")]
    InvalidLandmarkCount(usize),

    #[error("Landmark {0} has {1} coordinates, expected 2 or 3")]
    InvalidCoordinate(usize, usize),

    #[error("Hand detector not initialized")]
    NotInitialized,

    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}

pub type HandResult<T> = Result<T, HandError>;
