pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::app::{build_presenter, load_scene, App, AppError, AppResult};
pub use crate::core::config::Settings;
pub use crate::core::frame_loop::{FrameLoop, LoopHandle, LoopStats, Schedule};
pub use crate::core::gesture_classifier::{classify, ClassifierConfig, GestureClassifier};
pub use crate::models::hand::{Gesture, LandmarkSet};
