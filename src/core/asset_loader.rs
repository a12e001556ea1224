// Scene asset fetching
// Assets are opaque payloads: fetched over HTTP or read from disk, never parsed here

use crate::core::scene::Scene;
use crate::models::scene::{SceneError, SceneResult};
use std::path::PathBuf;
use tracing::{error, info};

/// Where an asset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Local file path
    LocalFile(PathBuf),
    /// Direct URL
    Url(String),
}

impl AssetSource {
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            AssetSource::Url(source.to_string())
        } else {
            AssetSource::LocalFile(PathBuf::from(source))
        }
    }
}

impl std::fmt::Display for AssetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetSource::LocalFile(path) => write!(f, "{}", path.display()),
            AssetSource::Url(url) => f.write_str(url),
        }
    }
}

pub struct AssetLoader {
    client: reqwest::Client,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetch an asset's bytes
    pub async fn fetch(&self, source: &AssetSource) -> SceneResult<Vec<u8>> {
        let bytes = match source {
            AssetSource::LocalFile(path) => tokio::fs::read(path)
                .await
                .map_err(|e| SceneError::ReadFailed(source.to_string(), e.to_string()))?,
            AssetSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| SceneError::FetchFailed(url.clone(), e.to_string()))?;
                response
                    .bytes()
                    .await
                    .map_err(|e| SceneError::FetchFailed(url.clone(), e.to_string()))?
                    .to_vec()
            }
        };

        if bytes.is_empty() {
            return Err(SceneError::EmptyAsset(source.to_string()));
        }
        Ok(bytes)
    }

    /// Load every source into `scene`. A failed asset is logged and skipped;
    /// the others keep their list positions. Returns how many were added.
    pub async fn populate(&self, scene: &mut Scene, sources: &[String]) -> usize {
        let mut loaded = 0;
        for (slot, raw) in sources.iter().enumerate() {
            let source = AssetSource::parse(raw);
            match self.fetch(&source).await {
                Ok(bytes) => {
                    scene.add_object(slot, raw, bytes.len());
                    loaded += 1;
                }
                Err(e) => {
                    error!("Error loading 3D shape: {}", e);
                }
            }
        }

        info!("Loaded {}/{} scene assets", loaded, sources.len());
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            AssetSource::parse("https://example.com/a.glb"),
            AssetSource::Url("https://example.com/a.glb".to_string())
        );
        assert_eq!(
            AssetSource::parse("assets/a.glb"),
            AssetSource::LocalFile(PathBuf::from("assets/a.glb"))
        );
    }

    #[tokio::test]
    async fn test_failed_asset_keeps_other_slots() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("shape1.glb");
        let third = dir.path().join("shape3.glb");
        let empty = dir.path().join("empty.glb");
        std::fs::write(&first, b"glTF-one").unwrap();
        std::fs::write(&third, b"glTF-three").unwrap();
        std::fs::write(&empty, b"").unwrap();

        let sources = vec![
            first.display().to_string(),
            dir.path().join("missing.glb").display().to_string(),
            third.display().to_string(),
            empty.display().to_string(),
        ];

        let mut scene = Scene::new(1280, 720);
        let loaded = AssetLoader::new().populate(&mut scene, &sources).await;

        assert_eq!(loaded, 2);
        let objects = scene.objects();
        assert_eq!(objects[0].position.x, -2.0);
        assert_eq!(objects[0].asset_bytes, 8);
        assert_eq!(objects[1].position.x, 2.0);
        assert_eq!(objects[1].name, "shape3.glb");
    }

    #[tokio::test]
    async fn test_empty_asset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.glb");
        std::fs::write(&empty, b"").unwrap();

        let result = AssetLoader::new().fetch(&AssetSource::LocalFile(empty)).await;
        assert!(matches!(result, Err(SceneError::EmptyAsset(_))));
    }
}
