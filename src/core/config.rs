use crate::core::gesture_classifier::{ClassifierConfig, OK_THRESHOLD_PX, SPREAD_THRESHOLD_PX};
use crate::models::camera::FacingMode;
use crate::models::hand::ClassifierProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default scene assets, fetched opaquely at startup
pub const DEFAULT_ASSET_SOURCES: [&str; 3] = [
    "https://github.com/unstopablethinkerr/ar3/raw/refs/heads/main/shape1.glb",
    "https://github.com/unstopablethinkerr/ar3/raw/refs/heads/main/shape2.glb",
    "https://github.com/unstopablethinkerr/ar3/raw/refs/heads/main/shape3.glb",
];

/// How the frame loop is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// One cycle per display refresh
    PerFrame,
    /// Fixed wall-clock timer
    Polling,
}

/// Where gesture results are published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationKind {
    /// A text label with the gesture name and glyph
    Text,
    /// Hand/gesture indicators toggled visible with a description
    Indicators,
    /// 3D scene with pointing selection
    Scene,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub schedule: ScheduleKind,
    /// Display refresh rate used by the per-frame schedule
    pub refresh_hz: u32,
    /// Timer period used by the polling schedule
    pub poll_interval_ms: u64,
    pub profile: ClassifierProfile,
    /// Max thumb/index tip gap for the OK sign, in frame pixels
    pub ok_threshold_px: f32,
    /// Min gap between neighbouring tips for Spread Fingers, in frame pixels
    pub spread_threshold_px: f32,
    pub facing_mode: FacingMode,
    pub presentation: PresentationKind,
    /// Overlay canvas / viewport size
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// URLs or file paths of the scene's 3D assets
    pub asset_sources: Vec<String>,
    /// Vertical oscillation of the selected object
    pub bounce: bool,
    /// Stop after this many frames (runs until stopped when unset)
    pub max_frames: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schedule: ScheduleKind::PerFrame,
            refresh_hz: 60,
            poll_interval_ms: 100,
            profile: ClassifierProfile::Full,
            ok_threshold_px: OK_THRESHOLD_PX,
            spread_threshold_px: SPREAD_THRESHOLD_PX,
            facing_mode: FacingMode::Environment,
            presentation: PresentationKind::Text,
            canvas_width: 1280,
            canvas_height: 720,
            asset_sources: DEFAULT_ASSET_SOURCES.iter().map(|s| s.to_string()).collect(),
            bounce: true,
            max_frames: None,
        }
    }
}

impl Settings {
    /// Load configuration from the default location, creating it with defaults if missing
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let settings: Settings = serde_json::from_str(&contents)?;
            settings.validate()?;
            Ok(settings)
        } else {
            let settings = Self::default();
            settings.save_to(path)?;
            Ok(settings)
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.refresh_hz == 0 || self.refresh_hz > 240 {
            return Err(format!(
                "Invalid refresh rate: {}. Must be between 1 and 240 Hz",
                self.refresh_hz
            )
            .into());
        }

        if self.poll_interval_ms == 0 || self.poll_interval_ms > 10_000 {
            return Err(format!(
                "Invalid poll interval: {}. Must be between 1 and 10000 ms",
                self.poll_interval_ms
            )
            .into());
        }

        if !(self.ok_threshold_px > 0.0) {
            return Err(format!(
                "Invalid OK threshold: {}. Must be greater than 0",
                self.ok_threshold_px
            )
            .into());
        }

        if !(self.spread_threshold_px > 0.0) {
            return Err(format!(
                "Invalid spread threshold: {}. Must be greater than 0",
                self.spread_threshold_px
            )
            .into());
        }

        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(format!(
                "Invalid canvas size: {}x{}",
                self.canvas_width, self.canvas_height
            )
            .into());
        }

        if self.max_frames == Some(0) {
            return Err("max_frames must be at least 1 when set".into());
        }

        Ok(())
    }

    /// Reset to default configuration
    pub fn reset() -> Result<Self, Box<dyn std::error::Error>> {
        let settings = Self::default();
        settings.save()?;
        Ok(settings)
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            profile: self.profile,
            ok_threshold_px: self.ok_threshold_px,
            spread_threshold_px: self.spread_threshold_px,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get the configuration file path
    pub fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| "Could not determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".gesture_ar");
        path.push("settings.json");

        Ok(path)
    }
}
