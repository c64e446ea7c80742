//! Pointer event types fed to the capture manager.
//!
//! A physical gesture arrives as two low-level events: a press (`down`)
//! followed by a release (`up`, the click-style event). Platforms that
//! abort a gesture deliver `cancel` instead of the release.
//!
//! Gesture streams are stored as JSONL, one event per line, with `#`
//! comment lines allowed.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Event timestamp in milliseconds on the platform's monotonic clock.
pub type TimestampMs = u64;

/// Which half of a gesture an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    /// Press; the first-phase event.
    Down,
    /// Release or click; the second-phase event.
    Up,
    /// The platform aborted the gesture.
    Cancel,
}

/// Kind of pointing device that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
    Unknown,
}

impl PointerKind {
    /// Touch and pen contacts are imprecise and get a wider tolerance.
    pub fn is_coarse(&self) -> bool {
        matches!(self, PointerKind::Touch | PointerKind::Pen)
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

/// A single pointer event as seen by a capture-phase listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Milliseconds on the platform clock.
    #[serde(rename = "t")]
    pub timestamp_ms: TimestampMs,

    pub phase: PointerPhase,

    #[serde(default)]
    pub pointer: PointerKind,

    /// Button that changed state; `None` when the platform does not say.
    #[serde(default)]
    pub button: Option<MouseButton>,

    /// Viewport X in CSS pixels.
    pub x: f64,
    /// Viewport Y in CSS pixels.
    pub y: f64,

    /// Immediate hit target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeId>,

    /// Hit-test path, innermost node first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<NodeId>>,
}

impl PointerEvent {
    /// A primary-button mouse event with no target information.
    pub fn new(timestamp_ms: TimestampMs, phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            timestamp_ms,
            phase,
            pointer: PointerKind::Mouse,
            button: Some(MouseButton::Left),
            x,
            y,
            target: None,
            path: None,
        }
    }

    /// Create a press event.
    pub fn down(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::new(timestamp_ms, PointerPhase::Down, x, y)
    }

    /// Create a release event.
    pub fn up(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::new(timestamp_ms, PointerPhase::Up, x, y)
    }

    /// Create a cancel event.
    pub fn cancel(timestamp_ms: TimestampMs, x: f64, y: f64) -> Self {
        Self::new(timestamp_ms, PointerPhase::Cancel, x, y)
    }

    pub fn with_pointer(mut self, pointer: PointerKind) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_button(mut self, button: Option<MouseButton>) -> Self {
        self.button = button;
        self
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_path(mut self, path: Vec<NodeId>) -> Self {
        self.path = Some(path);
        self
    }

    /// Whether the event came from the primary button.
    ///
    /// Events that do not report a button count as primary, which covers
    /// touch contacts and synthetic clicks.
    pub fn is_primary(&self) -> bool {
        matches!(self.button, None | Some(MouseButton::Left))
    }

    /// Squared distance to another viewport point.
    pub fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<PointerEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}
