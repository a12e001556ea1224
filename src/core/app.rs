// Application context - sequential startup (camera, then model, then loop)

use crate::core::asset_loader::AssetLoader;
use crate::core::config::{PresentationKind, Settings};
use crate::core::frame_loop::{FrameLoop, LoopHandle, LoopStats, Schedule};
use crate::core::gesture_classifier::GestureClassifier;
use crate::core::presenter::{IndicatorPanel, Presenter, SceneView, TextLabel};
use crate::core::scene::Scene;
use crate::models::camera::{CaptureError, StreamInfo};
use crate::models::hand::{HandError, HandResult};
use crate::platform::camera::CameraSource;
use crate::platform::hands::HandDetector;
use std::io::Write;
use std::sync::Arc;
use tracing::{error, info};

/// Shown when the camera stream cannot be acquired
pub const CAMERA_ALERT: &str = "Unable to access the camera.";
/// Shown when the hand landmark model is not available
pub const MODEL_ALERT: &str = "Unable to load the hand landmark model.";

/// Error types for application startup
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Camera unavailable: {0}")]
    Camera(#[from] CaptureError),

    #[error("Hand landmark model unavailable: {0}")]
    Model(#[from] HandError),

    #[error("Invalid settings: {0}")]
    Settings(String),
}

pub type AppResult<T> = Result<T, AppError>;

pub struct App {
    frame_loop: FrameLoop,
    stream: StreamInfo,
}

impl App {
    /// Open the camera, load the detector, then build the frame loop.
    /// `load_detector` only runs once the camera is open. Any failure is
    /// alerted through `presenter` and the loop is never built.
    pub async fn initialize<F>(
        settings: &Settings,
        mut camera: Box<dyn CameraSource>,
        load_detector: F,
        mut presenter: Box<dyn Presenter>,
    ) -> AppResult<Self>
    where
        F: FnOnce() -> HandResult<Arc<dyn HandDetector>> + Send,
    {
        settings
            .validate()
            .map_err(|e| AppError::Settings(e.to_string()))?;

        let stream = match camera.open(settings.facing_mode).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Error accessing the camera: {}", e);
                presenter.alert(CAMERA_ALERT);
                return Err(AppError::Camera(e));
            }
        };
        info!(
            "Camera '{}' opened at {}x{} (requested {} facing)",
            stream.device_name,
            stream.width,
            stream.height,
            settings.facing_mode.as_str()
        );

        let loaded = load_detector().and_then(|detector| {
            if detector.is_initialized() {
                Ok(detector)
            } else {
                Err(HandError::NotInitialized)
            }
        });
        let detector = match loaded {
            Ok(detector) => detector,
            Err(e) => {
                error!("Error loading the hand landmark model: {}", e);
                presenter.alert(MODEL_ALERT);
                if let Err(e) = camera.close().await {
                    error!("Failed to close camera: {}", e);
                }
                return Err(AppError::Model(e));
            }
        };
        info!("Hand detector ready: {}", detector.get_model_info());

        let frame_loop = FrameLoop::new(
            camera,
            detector,
            presenter,
            GestureClassifier::new(settings.classifier_config()),
            Schedule::from_settings(settings),
        )
        .with_canvas(settings.canvas_width, settings.canvas_height)
        .with_max_frames(settings.max_frames);

        Ok(Self { frame_loop, stream })
    }

    pub fn stream(&self) -> &StreamInfo {
        &self.stream
    }

    pub fn handle(&self) -> LoopHandle {
        self.frame_loop.handle()
    }

    pub async fn run(self) -> LoopStats {
        self.frame_loop.run().await
    }
}

/// Build the presenter selected in `settings`. The scene view loads its assets
/// first; assets that fail to load are skipped.
pub async fn build_presenter(
    settings: &Settings,
    sink: Option<Box<dyn Write + Send>>,
) -> Box<dyn Presenter> {
    match settings.presentation {
        PresentationKind::Text => match sink {
            Some(sink) => Box::new(TextLabel::with_sink(sink)),
            None => Box::new(TextLabel::new()),
        },
        PresentationKind::Indicators => Box::new(IndicatorPanel::new()),
        PresentationKind::Scene => Box::new(SceneView::new(load_scene(settings).await, settings.bounce)),
    }
}

/// Scene sized to the canvas, populated from the configured asset sources
pub async fn load_scene(settings: &Settings) -> Scene {
    let mut scene = Scene::new(settings.canvas_width, settings.canvas_height);
    AssetLoader::new()
        .populate(&mut scene, &settings.asset_sources)
        .await;
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::camera::VideoFrame;
    use crate::models::hand::{Gesture, HandPrediction};
    use crate::platform::camera::SyntheticCamera;
    use crate::platform::hands::{NoHandsDetector, ReplayDetector};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct UnloadedDetector;

    #[async_trait]
    impl HandDetector for UnloadedDetector {
        async fn estimate_hands(&self, _frame: &VideoFrame) -> HandResult<Vec<HandPrediction>> {
            Err(HandError::NotInitialized)
        }

        fn is_initialized(&self) -> bool {
            false
        }

        fn get_model_info(&self) -> String {
            "unloaded".to_string()
        }
    }

    fn quick_settings() -> Settings {
        Settings {
            refresh_hz: 240,
            max_frames: Some(2),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_camera_failure_alerts_and_stops() {
        let label = Arc::new(Mutex::new(TextLabel::new()));
        let loader_called = Arc::new(AtomicBool::new(false));

        let flag = loader_called.clone();
        let result = App::initialize(
            &quick_settings(),
            Box::new(SyntheticCamera::denied()),
            move || -> HandResult<Arc<dyn HandDetector>> {
                flag.store(true, Ordering::SeqCst);
                Ok(Arc::new(NoHandsDetector))
            },
            Box::new(label.clone()),
        )
        .await;

        assert!(matches!(result, Err(AppError::Camera(CaptureError::PermissionDenied(_)))));
        assert_eq!(label.lock().unwrap().alerts(), [CAMERA_ALERT.to_string()]);
        assert!(!loader_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_unloaded_model_alerts_and_stops() {
        let panel = Arc::new(Mutex::new(IndicatorPanel::new()));

        let result = App::initialize(
            &quick_settings(),
            Box::new(SyntheticCamera::new(640, 480)),
            || -> HandResult<Arc<dyn HandDetector>> { Ok(Arc::new(UnloadedDetector)) },
            Box::new(panel.clone()),
        )
        .await;

        assert!(matches!(result, Err(AppError::Model(HandError::NotInitialized))));
        assert_eq!(panel.lock().unwrap().alerts(), [MODEL_ALERT.to_string()]);
    }

    #[tokio::test]
    async fn test_missing_landmark_script_alerts() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("missing.json");
        let label = Arc::new(Mutex::new(TextLabel::new()));

        let result = App::initialize(
            &quick_settings(),
            Box::new(SyntheticCamera::new(640, 480)),
            move || -> HandResult<Arc<dyn HandDetector>> {
                Ok(Arc::new(ReplayDetector::load(&script, false)?))
            },
            Box::new(label.clone()),
        )
        .await;

        assert!(matches!(result, Err(AppError::Model(HandError::ModelLoadFailed(_)))));
        assert_eq!(label.lock().unwrap().alerts(), [MODEL_ALERT.to_string()]);
        assert_eq!(label.lock().unwrap().text(), "None");
    }

    #[tokio::test]
    async fn test_invalid_settings_rejected() {
        let settings = Settings {
            refresh_hz: 0,
            ..Settings::default()
        };
        let result = App::initialize(
            &settings,
            Box::new(SyntheticCamera::new(640, 480)),
            || -> HandResult<Arc<dyn HandDetector>> { Ok(Arc::new(NoHandsDetector)) },
            Box::new(TextLabel::new()),
        )
        .await;
        assert!(matches!(result, Err(AppError::Settings(_))));
    }

    #[tokio::test]
    async fn test_initialize_then_run() {
        let label = Arc::new(Mutex::new(TextLabel::new()));
        let app = App::initialize(
            &quick_settings(),
            Box::new(SyntheticCamera::new(320, 240)),
            || -> HandResult<Arc<dyn HandDetector>> { Ok(Arc::new(NoHandsDetector)) },
            Box::new(label.clone()),
        )
        .await
        .unwrap();

        assert_eq!((app.stream().width, app.stream().height), (320, 240));
        let stats = app.run().await;
        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.last_gesture, Gesture::None);
        assert_eq!(label.lock().unwrap().text(), "None");
        assert!(label.lock().unwrap().alerts().is_empty());
    }

    #[tokio::test]
    async fn test_scene_loads_local_assets() {
        let dir = tempfile::tempdir().unwrap();
        let shape = dir.path().join("shape1.glb");
        std::fs::write(&shape, b"glTF").unwrap();

        let settings = Settings {
            presentation: PresentationKind::Scene,
            canvas_width: 800,
            canvas_height: 600,
            asset_sources: vec![
                dir.path().join("missing.glb").display().to_string(),
                shape.display().to_string(),
            ],
            ..Settings::default()
        };

        let scene = load_scene(&settings).await;
        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.objects()[0].name, "shape1.glb");
        assert_eq!(scene.objects()[0].position.x, 0.0);
        assert!((scene.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}
