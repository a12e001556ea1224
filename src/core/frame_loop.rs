// Frame loop - camera -> hand detector -> classifier -> presenter, one frame at a time

use crate::core::config::{ScheduleKind, Settings};
use crate::core::gesture_classifier::GestureClassifier;
use crate::core::presenter::Presenter;
use crate::models::camera::CaptureError;
use crate::models::frame::{project_overlay, FrameOutcome, TrackedHand};
use crate::models::hand::{Gesture, HandError};
use crate::platform::camera::CameraSource;
use crate::platform::hands::HandDetector;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// How cycles are paced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Schedule {
    /// One cycle per display refresh; overrun ticks are dropped
    PerFrame { refresh_hz: u32 },
    /// Fixed wall-clock timer; a late tick is delayed, never bursted
    Polling { interval: Duration },
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::PerFrame { refresh_hz: 60 }
    }
}

impl Schedule {
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.schedule {
            ScheduleKind::PerFrame => Schedule::PerFrame {
                refresh_hz: settings.refresh_hz,
            },
            ScheduleKind::Polling => Schedule::Polling {
                interval: settings.poll_interval(),
            },
        }
    }

    pub fn period(&self) -> Duration {
        match self {
            Schedule::PerFrame { refresh_hz } => {
                Duration::from_nanos(1_000_000_000 / (*refresh_hz).max(1) as u64)
                    .max(Duration::from_nanos(1))
            }
            Schedule::Polling { interval } => (*interval).max(Duration::from_millis(1)),
        }
    }

    fn ticker(&self) -> tokio::time::Interval {
        let mut interval = tokio::time::interval(self.period());
        interval.set_missed_tick_behavior(match self {
            Schedule::PerFrame { .. } => MissedTickBehavior::Skip,
            Schedule::Polling { .. } => MissedTickBehavior::Delay,
        });
        interval
    }
}

/// Why a single cycle produced no outcome
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Camera frame unavailable: {0}")]
    Capture(#[from] CaptureError),

    #[error("Hand detection failed: {0}")]
    Detection(#[from] HandError),
}

/// Counters reported when the loop ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStats {
    pub run_id: String,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    pub frames_with_hand: u64,
    pub last_gesture: Gesture,
}

/// Stops a running loop from another task
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Arc<RwLock<bool>>,
    stop_signal: Arc<Notify>,
}

impl LoopHandle {
    /// The loop exits after finishing its current cycle, or at once if it is
    /// waiting for the next tick
    pub async fn stop(&self) {
        *self.running.write().await = false;
        self.stop_signal.notify_one();
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

pub struct FrameLoop {
    camera: Box<dyn CameraSource>,
    detector: Arc<dyn HandDetector>,
    presenter: Box<dyn Presenter>,
    classifier: GestureClassifier,
    schedule: Schedule,
    canvas: (u32, u32),
    max_frames: Option<u64>,
    running: Arc<RwLock<bool>>,
    stop_signal: Arc<Notify>,
}

impl FrameLoop {
    /// `camera` must already be open
    pub fn new(
        camera: Box<dyn CameraSource>,
        detector: Arc<dyn HandDetector>,
        presenter: Box<dyn Presenter>,
        classifier: GestureClassifier,
        schedule: Schedule,
    ) -> Self {
        Self {
            camera,
            detector,
            presenter,
            classifier,
            schedule,
            canvas: (1280, 720),
            max_frames: None,
            running: Arc::new(RwLock::new(true)),
            stop_signal: Arc::new(Notify::new()),
        }
    }

    /// Size of the overlay canvas landmark dots are projected onto
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.canvas = (width, height);
        self
    }

    /// Stop after this many cycles, successful or not
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            running: self.running.clone(),
            stop_signal: self.stop_signal.clone(),
        }
    }

    /// Run one cycle: grab, detect, classify, publish
    pub async fn process_frame(&mut self, frame_index: u64) -> Result<FrameOutcome, FrameError> {
        let frame = self.camera.next_frame().await?;
        let predictions = self.detector.estimate_hands(&frame).await?;

        let hand = predictions.first().map(|prediction| TrackedHand {
            landmarks: prediction.pixel_landmarks(frame.width, frame.height),
            handedness: prediction.handedness,
            confidence: prediction.confidence,
        });

        let (gesture, overlay) = match hand.as_ref() {
            Some(tracked) => (
                self.classifier.classify(&tracked.landmarks),
                project_overlay(&tracked.landmarks, (frame.width, frame.height), self.canvas),
            ),
            None => (Gesture::None, Vec::new()),
        };

        let outcome = FrameOutcome {
            frame_index,
            timestamp: frame.timestamp,
            frame_width: frame.width,
            frame_height: frame.height,
            gesture,
            hand,
            overlay,
        };

        self.presenter.publish(&outcome);
        Ok(outcome)
    }

    /// Drive cycles until stopped or `max_frames` is reached
    pub async fn run(mut self) -> LoopStats {
        let mut stats = LoopStats {
            run_id: Uuid::new_v4().to_string(),
            frames_processed: 0,
            frames_skipped: 0,
            frames_with_hand: 0,
            last_gesture: Gesture::None,
        };

        info!(
            "Frame loop {} starting ({:?}, detector: {})",
            stats.run_id,
            self.schedule,
            self.detector.get_model_info()
        );

        let mut ticker = self.schedule.ticker();
        let mut frame_index: u64 = 0;

        loop {
            if !*self.running.read().await {
                debug!("Frame loop stop requested");
                break;
            }
            if let Some(max) = self.max_frames {
                if frame_index >= max {
                    break;
                }
            }

            tokio::select! {
                biased;
                _ = self.stop_signal.notified() => {
                    debug!("Frame loop stopped while waiting for the next tick");
                    break;
                }
                _ = ticker.tick() => {}
            }

            match self.process_frame(frame_index).await {
                Ok(outcome) => {
                    stats.frames_processed += 1;
                    if outcome.hand.is_some() {
                        stats.frames_with_hand += 1;
                    }
                    if outcome.gesture != stats.last_gesture {
                        debug!("Frame {}: {}", frame_index, outcome.gesture.display_text());
                    }
                    stats.last_gesture = outcome.gesture;
                }
                Err(e) => {
                    warn!("Skipping frame {}: {}", frame_index, e);
                    stats.frames_skipped += 1;
                }
            }

            self.presenter.render(chrono::Utc::now().timestamp_millis());
            frame_index += 1;
        }

        *self.running.write().await = false;
        if let Err(e) = self.camera.close().await {
            warn!("Failed to close camera: {}", e);
        }

        info!(
            "Frame loop {} finished: {} processed, {} skipped, {} with a hand",
            stats.run_id, stats.frames_processed, stats.frames_skipped, stats.frames_with_hand
        );
        stats
    }
}
