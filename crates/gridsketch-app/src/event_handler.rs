//! Translation of winit window events into per-frame editor input.

use gridsketch_core::input::{FrameInput, InputEvent, Key, MouseButton, ScrollAxis};
use kurbo::Point;
use std::collections::HashSet;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Map a winit mouse button.
pub fn map_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

/// Map a physical key to an editor key.
pub fn map_key(key: PhysicalKey) -> Option<Key> {
    match key {
        PhysicalKey::Code(KeyCode::KeyL) => Some(Key::LineTool),
        PhysicalKey::Code(KeyCode::KeyG) => Some(Key::ToggleSnap),
        PhysicalKey::Code(KeyCode::Escape) => Some(Key::Cancel),
        _ => None,
    }
}

/// Split a wheel delta into one event per non-zero axis.
pub fn scroll_events(delta: MouseScrollDelta, position: Point) -> Vec<InputEvent> {
    let (dx, dy) = match delta {
        MouseScrollDelta::LineDelta(x, y) => (x as f64, y as f64),
        MouseScrollDelta::PixelDelta(pos) => (pos.x, pos.y),
    };
    [(ScrollAxis::Vertical, dy), (ScrollAxis::Horizontal, dx)]
        .into_iter()
        .filter(|(_, delta)| *delta != 0.0)
        .map(|(axis, delta)| InputEvent::WheelScrolled {
            axis,
            delta,
            position,
        })
        .collect()
}

/// Collects window events between frames.
///
/// Events are queued in arrival order and drained once per frame together
/// with the set of currently held keys.
#[derive(Debug, Default)]
pub struct EventHandler {
    pending: Vec<InputEvent>,
    held_keys: HashSet<Key>,
    pointer: Point,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position in physical pixels.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Queue a window event. Returns whether it was relevant to the editor.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => self.push(InputEvent::WindowClosed),
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = Point::new(position.x, position.y);
                self.push(InputEvent::CursorMoved {
                    position: self.pointer,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_button(*button);
                let position = self.pointer;
                self.push(match state {
                    ElementState::Pressed => InputEvent::ButtonPressed { button, position },
                    ElementState::Released => InputEvent::ButtonReleased { button, position },
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.pending.extend(scroll_events(*delta, self.pointer));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let Some(key) = map_key(event.physical_key) else {
                    return false;
                };
                match event.state {
                    ElementState::Pressed => self.held_keys.insert(key),
                    ElementState::Released => self.held_keys.remove(&key),
                };
            }
            WindowEvent::Focused(false) => {
                // Key releases are not delivered to unfocused windows.
                self.held_keys.clear();
            }
            _ => return false,
        }
        true
    }

    fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Drain queued events for the next frame.
    pub fn take_frame(&mut self) -> FrameInput {
        FrameInput {
            events: std::mem::take(&mut self.pending),
            held_keys: self.held_keys.clone(),
        }
    }
}
