pub mod app;
pub mod asset_loader;
pub mod config;
pub mod frame_loop;
pub mod gesture_classifier;
pub mod presenter;
pub mod scene;
