// Camera source backed by a directory of still images
// Frames are decoded with the `image` crate and served in file-name order, cycling.

use super::CameraSource;
use crate::models::camera::{CaptureError, CaptureResult, FacingMode, PixelFormat, StreamInfo, VideoFrame};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub struct ImageSequenceCamera {
    dir: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
    dimensions: Option<(u32, u32)>,
}

impl ImageSequenceCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            cursor: 0,
            dimensions: None,
        }
    }

    fn list_images(dir: &Path) -> CaptureResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                CaptureError::PermissionDenied(format!("{}: {}", dir.display(), e))
            }
            _ => CaptureError::DeviceNotFound(format!("{}: {}", dir.display(), e)),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    async fn decode(path: PathBuf) -> CaptureResult<image::RgbaImage> {
        tokio::task::spawn_blocking(move || {
            image::open(&path)
                .map(|img| img.to_rgba8())
                .map_err(|e| CaptureError::CaptureFailed(format!("{}: {}", path.display(), e)))
        })
        .await
        .map_err(|e| CaptureError::CaptureFailed(format!("decoder task failed: {}", e)))?
    }
}

#[async_trait]
impl CameraSource for ImageSequenceCamera {
    async fn open(&mut self, facing: FacingMode) -> CaptureResult<StreamInfo> {
        let files = Self::list_images(&self.dir)?;
        let first = files.first().cloned().ok_or_else(|| {
            CaptureError::DeviceNotFound(format!("no images in {}", self.dir.display()))
        })?;

        let image = Self::decode(first).await?;
        let (width, height) = image.dimensions();

        debug!(
            "facing preference '{}' ignored by image sequence source",
            facing.as_str()
        );
        info!(
            "Opened image sequence {} ({} frames, {}x{})",
            self.dir.display(),
            files.len(),
            width,
            height
        );

        self.files = files;
        self.cursor = 0;
        self.dimensions = Some((width, height));

        Ok(StreamInfo {
            device_name: self.dir.display().to_string(),
            width,
            height,
            facing: None,
        })
    }

    async fn next_frame(&mut self) -> CaptureResult<VideoFrame> {
        if self.dimensions.is_none() || self.files.is_empty() {
            return Err(CaptureError::NotOpen);
        }

        let path = self.files[self.cursor % self.files.len()].clone();
        self.cursor = (self.cursor + 1) % self.files.len();

        let image = Self::decode(path).await?;
        let (width, height) = image.dimensions();

        Ok(VideoFrame {
            timestamp: chrono::Utc::now().timestamp_millis(),
            width,
            height,
            data: image.into_raw(),
            format: PixelFormat::RGBA8,
        })
    }

    async fn close(&mut self) -> CaptureResult<()> {
        self.dimensions = None;
        self.files.clear();
        self.cursor = 0;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.dimensions.is_some()
    }
}
