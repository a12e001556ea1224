// End-to-end runs: recorded landmark script -> app -> presenter

use gesture_ar::core::app::MODEL_ALERT;
use gesture_ar::core::config::PresentationKind;
use gesture_ar::core::presenter::{IndicatorPanel, TextLabel};
use gesture_ar::models::camera::FacingMode;
use gesture_ar::platform::camera::{CameraSource, ImageSequenceCamera, SyntheticCamera};
use gesture_ar::models::hand::{HandError, HandResult};
use gesture_ar::platform::hands::{HandDetector, ReplayDetector};
use gesture_ar::{App, AppError, Gesture, Settings};
use serde_json::json;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// 21 points with the five fingertips set; every other joint sits at the origin
fn hand(tips: [(f32, f32); 5]) -> serde_json::Value {
    let mut points = vec![json!([0.0, 0.0]); 21];
    for (slot, (x, y)) in [4, 8, 12, 16, 20].into_iter().zip(tips) {
        points[slot] = json!([x, y]);
    }
    json!({ "landmarks": points, "handedness": "right", "confidence": 0.95 })
}

fn write_script(dir: &Path, frames: Vec<Option<serde_json::Value>>) -> std::path::PathBuf {
    let frames: Vec<_> = frames
        .into_iter()
        .map(|h| json!({ "hands": h.into_iter().collect::<Vec<_>>() }))
        .collect();
    let path = dir.join("script.json");
    std::fs::write(&path, json!({ "coordinate_space": "pixel", "frames": frames }).to_string()).unwrap();
    path
}

fn settings(frames: u64) -> Settings {
    Settings {
        refresh_hz: 240,
        max_frames: Some(frames),
        presentation: PresentationKind::Text,
        ..Settings::default()
    }
}

async fn label_after(frames: Vec<Option<serde_json::Value>>) -> String {
    let count = frames.len() as u64;
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), frames);

    let label = Arc::new(Mutex::new(TextLabel::new()));
    let app = App::initialize(
        &settings(count),
        Box::new(SyntheticCamera::new(640, 480)),
        move || -> HandResult<Arc<dyn HandDetector>> { Ok(Arc::new(ReplayDetector::load(&script, false)?)) },
        Box::new(label.clone()),
    )
    .await
    .unwrap();
    app.run().await;

    let text = label.lock().unwrap().text().to_string();
    text
}

#[tokio::test]
async fn open_hand_when_tips_descend_the_frame() {
    let open = hand([(100.0, 100.0), (200.0, 150.0), (300.0, 200.0), (400.0, 250.0), (500.0, 300.0)]);
    assert_eq!(label_after(vec![Some(open)]).await, "Open Hand 🖐️");
}

#[tokio::test]
async fn closed_fist_wins_over_thumbs_down() {
    let fist = hand([(100.0, 300.0), (200.0, 250.0), (300.0, 200.0), (400.0, 150.0), (500.0, 100.0)]);
    assert_eq!(label_after(vec![Some(fist)]).await, "Closed Fist ✊");
}

#[tokio::test]
async fn ok_sign_when_thumb_meets_index() {
    let ok = hand([(100.0, 200.0), (110.0, 200.0), (200.0, 180.0), (250.0, 150.0), (300.0, 120.0)]);
    assert_eq!(label_after(vec![Some(ok)]).await, "OK 👌");
}

#[tokio::test]
async fn no_hand_hides_indicators() {
    let dir = tempfile::tempdir().unwrap();
    let open = hand([(100.0, 100.0), (200.0, 150.0), (300.0, 200.0), (400.0, 250.0), (500.0, 300.0)]);
    let script = write_script(dir.path(), vec![Some(open), None]);

    let panel = Arc::new(Mutex::new(IndicatorPanel::new()));
    let mut settings = settings(2);
    settings.presentation = PresentationKind::Indicators;

    let app = App::initialize(
        &settings,
        Box::new(SyntheticCamera::new(640, 480)),
        move || -> HandResult<Arc<dyn HandDetector>> { Ok(Arc::new(ReplayDetector::load(&script, false)?)) },
        Box::new(panel.clone()),
    )
    .await
    .unwrap();
    let stats = app.run().await;

    assert_eq!(stats.frames_processed, 2);
    assert_eq!(stats.frames_with_hand, 1);
    assert_eq!(stats.last_gesture, Gesture::None);

    let panel = panel.lock().unwrap();
    assert!(!panel.hand.visible);
    assert!(!panel.gesture.visible);
    assert_eq!(panel.gesture.description, "None");
    assert_eq!(panel.label(), "None");
}

#[tokio::test]
async fn image_sequence_camera_drives_the_loop() {
    let frames_dir = tempfile::tempdir().unwrap();
    for name in ["a.png", "b.png"] {
        image::RgbaImage::new(320, 240)
            .save(frames_dir.path().join(name))
            .unwrap();
    }

    // Normalized landmarks are scaled by the decoded frame size before classification
    let script_dir = tempfile::tempdir().unwrap();
    let script = script_dir.path().join("script.json");
    let mut points = vec![json!([0.0, 0.0]); 21];
    for (slot, (x, y)) in [4, 8, 12, 16, 20]
        .into_iter()
        .zip([(0.25, 0.125), (0.5, 0.25), (0.5, 0.75), (0.5, 0.5), (0.5, 0.375)])
    {
        points[slot] = json!([x, y]);
    }
    let body = json!({
        "coordinate_space": "normalized",
        "frames": [{ "hands": [{ "landmarks": points }] }]
    });
    std::fs::write(&script, body.to_string()).unwrap();

    let mut camera = ImageSequenceCamera::new(frames_dir.path());
    let info = camera.open(FacingMode::User).await.unwrap();
    assert_eq!((info.width, info.height), (320, 240));
    camera.close().await.unwrap();

    let label = Arc::new(Mutex::new(TextLabel::new()));
    let app = App::initialize(
        &settings(3),
        Box::new(camera),
        move || -> HandResult<Arc<dyn HandDetector>> { Ok(Arc::new(ReplayDetector::load(&script, true)?)) },
        Box::new(label.clone()),
    )
    .await
    .unwrap();
    let stats = app.run().await;

    assert_eq!(stats.frames_processed, 3);
    assert_eq!(stats.frames_with_hand, 3);
    assert_eq!(stats.last_gesture, Gesture::Pointing);
    assert_eq!(label.lock().unwrap().text(), "Pointing ☝️");
}

#[tokio::test]
async fn missing_landmark_script_alerts_before_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("absent.json");

    let label = Arc::new(Mutex::new(TextLabel::new()));
    let result = App::initialize(
        &settings(1),
        Box::new(SyntheticCamera::new(640, 480)),
        move || -> HandResult<Arc<dyn HandDetector>> { Ok(Arc::new(ReplayDetector::load(&script, false)?)) },
        Box::new(label.clone()),
    )
    .await;

    assert!(matches!(result, Err(AppError::Model(HandError::ModelLoadFailed(_)))));
    assert_eq!(label.lock().unwrap().alerts(), [MODEL_ALERT.to_string()]);
}
