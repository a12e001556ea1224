//! gesture-ar - hand gesture recognition from a camera stream
//!
//! `run` drives the frame loop against a camera source and landmark detector;
//! `classify` labels a single recorded 21-point hand.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use gesture_ar::core::config::{PresentationKind, ScheduleKind};
use gesture_ar::models::hand::{ClassifierProfile, CoordinateSpace, HandPrediction, HandResult};
use gesture_ar::platform::camera::{CameraSource, ImageSequenceCamera, SyntheticCamera};
use gesture_ar::platform::hands::{HandDetector, ReplayDetector};
use gesture_ar::{build_presenter, App, GestureClassifier, LandmarkSet, Settings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "gesture-ar", version, about = "Camera-driven hand gesture recognition")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the frame loop
    Run {
        /// Recorded landmark script to replay as the detector
        #[arg(long)]
        landmarks: Option<PathBuf>,

        /// Replay the landmark script forever instead of once
        #[arg(long)]
        repeat: bool,

        /// Directory of images to use as the camera (default: blank frames)
        #[arg(long)]
        frames: Option<PathBuf>,

        /// Settings file (default: ~/.gesture_ar/settings.json)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum)]
        presentation: Option<Presentation>,

        #[arg(long, value_enum)]
        schedule: Option<ScheduleArg>,

        /// Stop after N frames
        #[arg(long)]
        max_frames: Option<u64>,
    },

    /// Classify one hand given as a JSON array of 21 [x, y] or [x, y, z] points
    Classify {
        path: PathBuf,

        /// Points are fractions of a WIDTHxHEIGHT frame, e.g. 640x480
        #[arg(long, value_parser = parse_frame_size)]
        normalized: Option<(u32, u32)>,

        #[arg(long, value_enum, default_value = "full")]
        profile: Profile,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Presentation {
    Text,
    Indicators,
    Scene,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScheduleArg {
    PerFrame,
    Polling,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Profile {
    Full,
    PointingOnly,
}

fn parse_frame_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w = w.parse::<u32>().map_err(|e| e.to_string())?;
    let h = h.parse::<u32>().map_err(|e| e.to_string())?;
    if w == 0 || h == 0 {
        return Err("frame size must be non-zero".to_string());
    }
    Ok((w, h))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_ar=info".into()),
        )
        .init();

    match cli.command {
        Command::Run {
            landmarks,
            repeat,
            frames,
            config,
            presentation,
            schedule,
            max_frames,
        } => {
            let mut settings = match config {
                Some(path) => Settings::load_from(&path),
                None => Settings::load(),
            }
            .map_err(|e| anyhow::anyhow!("Failed to load settings: {}", e))?;

            if let Some(presentation) = presentation {
                settings.presentation = match presentation {
                    Presentation::Text => PresentationKind::Text,
                    Presentation::Indicators => PresentationKind::Indicators,
                    Presentation::Scene => PresentationKind::Scene,
                };
            }
            if let Some(schedule) = schedule {
                settings.schedule = match schedule {
                    ScheduleArg::PerFrame => ScheduleKind::PerFrame,
                    ScheduleArg::Polling => ScheduleKind::Polling,
                };
            }
            if max_frames.is_some() {
                settings.max_frames = max_frames;
            }

            run(settings, landmarks, repeat, frames).await
        }
        Command::Classify {
            path,
            normalized,
            profile,
        } => classify(path, normalized, profile),
    }
}

async fn run(
    settings: Settings,
    landmarks: Option<PathBuf>,
    repeat: bool,
    frames: Option<PathBuf>,
) -> anyhow::Result<()> {
    info!("gesture-ar v{} starting", env!("CARGO_PKG_VERSION"));

    let camera: Box<dyn CameraSource> = match frames {
        Some(dir) => Box::new(ImageSequenceCamera::new(dir)),
        None => Box::new(SyntheticCamera::new(settings.canvas_width, settings.canvas_height)),
    };

    let presenter = build_presenter(&settings, Some(Box::new(std::io::stdout()))).await;

    let load_detector = move || -> HandResult<Arc<dyn HandDetector>> {
        match landmarks {
            Some(path) => Ok(Arc::new(ReplayDetector::load(&path, repeat)?)),
            None => default_detector(),
        }
    };

    let app = App::initialize(&settings, camera, load_detector, presenter).await?;
    let handle = app.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping after the current frame");
            handle.stop().await;
        }
    });

    let stats = app.run().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

#[cfg(feature = "ml-pyo3")]
fn default_detector() -> HandResult<Arc<dyn HandDetector>> {
    use gesture_ar::platform::hands::MediaPipeDetector;
    Ok(Arc::new(MediaPipeDetector::load(2)?))
}

#[cfg(not(feature = "ml-pyo3"))]
fn default_detector() -> HandResult<Arc<dyn HandDetector>> {
    use gesture_ar::platform::hands::NoHandsDetector;
    warn!("No --landmarks script given and built without ml-pyo3; no hands will be detected");
    Ok(Arc::new(NoHandsDetector))
}

fn classify(path: PathBuf, normalized: Option<(u32, u32)>, profile: Profile) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let landmarks: LandmarkSet = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid landmark set in {}", path.display()))?;

    let landmarks = match normalized {
        Some((width, height)) => {
            HandPrediction::new(landmarks, CoordinateSpace::Normalized).pixel_landmarks(width, height)
        }
        None => landmarks,
    };

    let mut config = Settings::default().classifier_config();
    config.profile = match profile {
        Profile::Full => ClassifierProfile::Full,
        Profile::PointingOnly => ClassifierProfile::PointingOnly,
    };
    let classifier = GestureClassifier::new(config);

    let matches = classifier.matching_gestures(&landmarks);
    if matches.len() > 1 {
        warn!(
            "Several poses match, first wins: {}",
            matches.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(", ")
        );
    }

    println!("{}", classifier.classify(&landmarks).display_text());
    Ok(())
}
