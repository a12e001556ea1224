// Data models for camera frames, hand landmarks, gestures and the 3D scene

pub mod camera;
pub mod frame;
pub mod hand;
pub mod scene;
