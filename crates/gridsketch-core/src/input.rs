//! Input routing: raw per-frame input to editor intents.

use crate::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Mouse wheel axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollAxis {
    Vertical,
    Horizontal,
}

/// Keys the editor reacts to. Backends map their own key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Select the line tool.
    LineTool,
    /// Abandon the shape under construction.
    Cancel,
    /// Switch grid snapping on or off.
    ToggleSnap,
}

/// A raw input event, in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    WindowClosed,
    ButtonPressed {
        button: MouseButton,
        position: Point,
    },
    ButtonReleased {
        button: MouseButton,
        position: Point,
    },
    CursorMoved {
        position: Point,
    },
    WheelScrolled {
        axis: ScrollAxis,
        delta: f64,
        position: Point,
    },
}

/// Everything polled from the window for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Events in arrival order.
    pub events: Vec<InputEvent>,
    /// Keys held down at the time of polling.
    pub held_keys: HashSet<Key>,
}

impl FrameInput {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self {
            events,
            held_keys: HashSet::new(),
        }
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.held_keys.extend(keys);
        self
    }
}

/// Pan gesture transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanIntent {
    /// Start panning; the screen position where the button went down.
    Start(Point),
    Stop,
}

/// Intents derived from one frame of input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameIntents {
    /// The window was closed; finish this frame and stop.
    pub terminate: bool,
    /// Last pan transition seen this frame.
    pub pan: Option<PanIntent>,
    /// Zoom change for this frame only (zero if no scroll).
    pub zoom_delta: f64,
    /// Tool selected this frame.
    pub select_tool: Option<ToolKind>,
    /// Number of commit-node triggers (left button releases).
    pub commit_triggers: usize,
    pub cancel: bool,
    pub toggle_snap: bool,
}

/// Turns polled input into intents, one frame at a time.
///
/// Tracks the pointer position across frames and the previously held keys,
/// so key-driven intents fire once per key press rather than every frame
/// the key is held.
#[derive(Debug, Clone)]
pub struct InputRouter {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Zoom factor change per wheel notch.
    pub zoom_speed: f64,
    previous_keys: HashSet<Key>,
}

impl InputRouter {
    pub fn new(zoom_speed: f64) -> Self {
        Self {
            pointer_position: Point::ZERO,
            zoom_speed,
            previous_keys: HashSet::new(),
        }
    }

    /// Process one frame's input in arrival order.
    pub fn route(&mut self, input: &FrameInput) -> FrameIntents {
        let mut intents = FrameIntents::default();

        for event in &input.events {
            match *event {
                InputEvent::WindowClosed => intents.terminate = true,
                InputEvent::ButtonPressed { button, position } => {
                    self.pointer_position = position;
                    if button == MouseButton::Middle {
                        intents.pan = Some(PanIntent::Start(position));
                    }
                }
                InputEvent::ButtonReleased { button, position } => {
                    self.pointer_position = position;
                    match button {
                        MouseButton::Middle => intents.pan = Some(PanIntent::Stop),
                        MouseButton::Left => intents.commit_triggers += 1,
                        MouseButton::Right | MouseButton::Other => {}
                    }
                }
                InputEvent::CursorMoved { position } => self.pointer_position = position,
                InputEvent::WheelScrolled {
                    axis,
                    delta,
                    position,
                } => {
                    self.pointer_position = position;
                    if axis == ScrollAxis::Vertical && delta != 0.0 {
                        intents.zoom_delta = self.zoom_speed.copysign(delta);
                    }
                }
            }
        }

        for key in input.held_keys.difference(&self.previous_keys) {
            match key {
                Key::LineTool => intents.select_tool = Some(ToolKind::Line),
                Key::Cancel => intents.cancel = true,
                Key::ToggleSnap => intents.toggle_snap = true,
            }
        }
        self.previous_keys.clone_from(&input.held_keys);

        intents
    }
}
