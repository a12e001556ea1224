// Presentation targets - text label, indicator pair, and 3D selection scene

use crate::core::scene::Scene;
use crate::models::frame::FrameOutcome;
use crate::models::hand::Gesture;
use crate::models::scene::NdcPoint;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

/// Reflects frame results to the user
pub trait Presenter: Send {
    /// Show the result of one processed frame
    fn publish(&mut self, outcome: &FrameOutcome);

    /// Advance presentational animation; called once per loop cycle
    fn render(&mut self, _now_ms: i64) {}

    /// Surface a user-facing failure message
    fn alert(&mut self, message: &str);
}

/// Shared presenters, so callers can inspect state while the loop owns a handle
impl<P: Presenter> Presenter for Arc<Mutex<P>> {
    fn publish(&mut self, outcome: &FrameOutcome) {
        match self.lock() {
            Ok(mut inner) => inner.publish(outcome),
            Err(e) => error!("Presenter lock poisoned: {}", e),
        }
    }

    fn render(&mut self, now_ms: i64) {
        match self.lock() {
            Ok(mut inner) => inner.render(now_ms),
            Err(e) => error!("Presenter lock poisoned: {}", e),
        }
    }

    fn alert(&mut self, message: &str) {
        match self.lock() {
            Ok(mut inner) => inner.alert(message),
            Err(e) => error!("Presenter lock poisoned: {}", e),
        }
    }
}

// ==============================================================================
// Text Label
// ==============================================================================

/// A single text element carrying the gesture name and glyph
pub struct TextLabel {
    text: String,
    alerts: Vec<String>,
    sink: Option<Box<dyn Write + Send>>,
}

impl Default for TextLabel {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLabel {
    pub fn new() -> Self {
        Self {
            text: Gesture::None.display_text(),
            alerts: Vec::new(),
            sink: None,
        }
    }

    /// Echo every label change (and alerts) to `sink`
    pub fn with_sink(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Some(sink),
            ..Self::new()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    fn echo(&mut self, line: &str) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = writeln!(sink, "{}", line) {
                warn!("Failed to write label: {}", e);
            }
        }
    }
}

impl Presenter for TextLabel {
    fn publish(&mut self, outcome: &FrameOutcome) {
        let text = outcome.gesture.display_text();
        if text != self.text {
            self.text = text;
            let line = self.text.clone();
            self.echo(&line);
        }
    }

    fn alert(&mut self, message: &str) {
        error!("{}", message);
        self.alerts.push(message.to_string());
        self.echo(&format!("ALERT: {}", message));
    }
}

// ==============================================================================
// Indicator Panel
// ==============================================================================

/// A toggleable indicator with a description attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub visible: bool,
    pub description: String,
}

impl Indicator {
    fn hidden() -> Self {
        Self {
            visible: false,
            description: Gesture::None.label().to_string(),
        }
    }
}

/// Hand-presence and gesture indicators plus the label text
pub struct IndicatorPanel {
    pub hand: Indicator,
    pub gesture: Indicator,
    label: String,
    alerts: Vec<String>,
}

impl Default for IndicatorPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPanel {
    pub fn new() -> Self {
        Self {
            hand: Indicator::hidden(),
            gesture: Indicator::hidden(),
            label: Gesture::None.display_text(),
            alerts: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn any_visible(&self) -> bool {
        self.hand.visible || self.gesture.visible
    }
}

impl Presenter for IndicatorPanel {
    fn publish(&mut self, outcome: &FrameOutcome) {
        self.label = outcome.gesture.display_text();

        let Some(hand) = outcome.hand.as_ref() else {
            self.hand = Indicator::hidden();
            self.gesture = Indicator::hidden();
            return;
        };

        self.hand = Indicator {
            visible: true,
            description: match hand.handedness {
                Some(side) => format!("{} hand", side.as_str()),
                None => "hand".to_string(),
            },
        };

        self.gesture = match outcome.gesture {
            Gesture::Unknown | Gesture::None => Indicator {
                visible: false,
                description: outcome.gesture.label().to_string(),
            },
            recognized => Indicator {
                visible: true,
                description: recognized.label().to_string(),
            },
        };
    }

    fn alert(&mut self, message: &str) {
        error!("{}", message);
        self.alerts.push(message.to_string());
    }
}

// ==============================================================================
// Scene View
// ==============================================================================

/// 3D scene whose objects are picked by pointing at them
pub struct SceneView {
    scene: Scene,
    bounce: bool,
    label: String,
    alerts: Vec<String>,
}

impl SceneView {
    pub fn new(scene: Scene, bounce: bool) -> Self {
        Self {
            scene,
            bounce,
            label: Gesture::None.display_text(),
            alerts: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }
}

impl Presenter for SceneView {
    fn publish(&mut self, outcome: &FrameOutcome) {
        self.label = outcome.gesture.display_text();

        if outcome.gesture == Gesture::Pointing {
            if let Some((x, y)) = outcome.index_tip_ndc() {
                self.scene.pick(NdcPoint { x, y });
            }
        }
    }

    fn render(&mut self, now_ms: i64) {
        self.scene.animate(now_ms, self.bounce);
    }

    fn alert(&mut self, message: &str) {
        error!("{}", message);
        self.alerts.push(message.to_string());
    }
}
