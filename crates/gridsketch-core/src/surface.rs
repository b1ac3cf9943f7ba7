//! Drawing contract between the core and rendering backends.

use crate::shapes::SerializableColor;
use kurbo::Point;

/// Primitive drawing operations provided by a rendering backend.
///
/// All coordinates are in world space; the backend maps them to the screen
/// with the camera transform it was configured with for the current frame.
pub trait DrawTarget {
    /// Draw a filled circle.
    fn draw_filled_circle(&mut self, center: Point, radius: f64, color: SerializableColor);

    /// Draw a straight line segment.
    fn draw_line_segment(&mut self, from: Point, to: Point, color: SerializableColor);
}

/// A recorded drawing operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Point,
        radius: f64,
        color: SerializableColor,
    },
    Segment {
        from: Point,
        to: Point,
        color: SerializableColor,
    },
}

/// Draw target that records commands instead of rasterizing them.
///
/// Useful for headless runs and for checking draw order.
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded segments, in draw order.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point, SerializableColor)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::Segment { from, to, color } => Some((from, to, color)),
            DrawCommand::Circle { .. } => None,
        })
    }

    /// Recorded circles, in draw order.
    pub fn circles(&self) -> impl Iterator<Item = (Point, f64, SerializableColor)> + '_ {
        self.commands.iter().filter_map(|command| match *command {
            DrawCommand::Circle { center, radius, color } => Some((center, radius, color)),
            DrawCommand::Segment { .. } => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl DrawTarget for CommandRecorder {
    fn draw_filled_circle(&mut self, center: Point, radius: f64, color: SerializableColor) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn draw_line_segment(&mut self, from: Point, to: Point, color: SerializableColor) {
        self.commands.push(DrawCommand::Segment { from, to, color });
    }
}
