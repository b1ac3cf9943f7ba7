//! Renderer trait abstraction.

use gridsketch_core::canvas::Canvas;
use gridsketch_core::config::EditorConfig;
use gridsketch_core::shapes::SerializableColor;
use gridsketch_core::snap::GridRange;
use gridsketch_core::surface::DrawTarget;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Background color.
    pub background_color: SerializableColor,
    /// Color of the grid dots.
    pub grid_color: SerializableColor,
    /// Color of the snapped cursor dot.
    pub cursor_color: SerializableColor,
    /// Radius of grid and cursor dots, in world units.
    pub point_radius: f64,
    /// Whether to draw the grid.
    pub show_grid: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with the default look.
    pub fn new(canvas: &'a Canvas) -> Self {
        let defaults = EditorConfig::default();
        Self {
            canvas,
            background_color: defaults.background_color,
            grid_color: defaults.grid_color,
            cursor_color: defaults.cursor_color,
            point_radius: defaults.point_radius,
            show_grid: true,
        }
    }

    /// Take colors and sizes from a configuration.
    pub fn with_config(mut self, config: &EditorConfig) -> Self {
        self.background_color = config.background_color;
        self.grid_color = config.grid_color;
        self.cursor_color = config.cursor_color;
        self.point_radius = config.point_radius;
        self
    }

    /// Set whether the grid is drawn.
    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> SerializableColor {
        ctx.background_color
    }
}

/// Draw one frame in world space: grid dots, committed shapes, the shape
/// under construction and finally the snapped cursor.
pub fn draw_frame(ctx: &RenderContext, target: &mut dyn DrawTarget) {
    let canvas = ctx.canvas;

    if ctx.show_grid {
        let grid = GridRange::visible(&canvas.camera, canvas.grid_spacing);
        for point in grid.points() {
            target.draw_filled_circle(point, ctx.point_radius, ctx.grid_color);
        }
    }

    canvas.draw_shapes(target);

    target.draw_filled_circle(canvas.cursor().snapped, ctx.point_radius, ctx.cursor_color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsketch_core::input::{FrameInput, InputEvent, Key, MouseButton};
    use gridsketch_core::surface::{CommandRecorder, DrawCommand};
    use kurbo::Point;

    fn small_canvas() -> Canvas {
        let config = EditorConfig {
            window_width: 140,
            window_height: 70,
            ..EditorConfig::default()
        };
        Canvas::new(&config)
    }

    #[test]
    fn test_empty_canvas_draws_grid_then_cursor() {
        let canvas = small_canvas();
        let ctx = RenderContext::new(&canvas);
        let mut recorder = CommandRecorder::new();
        draw_frame(&ctx, &mut recorder);

        let circles: Vec<_> = recorder.circles().collect();
        // 3 columns x 2 rows of grid points, then the cursor.
        assert_eq!(circles.len(), 7);
        assert!(circles[..6].iter().all(|&(_, r, c)| r == 3.0 && c == ctx.grid_color));
        assert_eq!(circles[6], (Point::ZERO, 3.0, ctx.cursor_color));
        assert_eq!(recorder.segments().count(), 0);
    }

    #[test]
    fn test_grid_can_be_hidden() {
        let canvas = small_canvas();
        let ctx = RenderContext::new(&canvas).with_grid(false);
        let mut recorder = CommandRecorder::new();
        draw_frame(&ctx, &mut recorder);
        assert_eq!(recorder.commands.len(), 1);
    }

    #[test]
    fn test_shapes_drawn_between_grid_and_cursor() {
        let mut canvas = small_canvas();
        let config = EditorConfig::default();

        // One committed line and one under construction.
        canvas.process_frame(
            &FrameInput::new(vec![InputEvent::CursorMoved { position: Point::ZERO }])
                .with_keys([Key::LineTool]),
        );
        canvas.process_frame(&FrameInput::new(vec![InputEvent::ButtonReleased {
            button: MouseButton::Left,
            position: Point::new(70.0, 0.0),
        }]));
        canvas.process_frame(&FrameInput::default().with_keys([Key::LineTool]));
        canvas.process_frame(&FrameInput::new(vec![InputEvent::CursorMoved {
            position: Point::new(70.0, 70.0),
        }]));

        let ctx = RenderContext::new(&canvas).with_config(&config);
        let mut recorder = CommandRecorder::new();
        draw_frame(&ctx, &mut recorder);

        let segments: Vec<_> = recorder.segments().collect();
        assert_eq!(
            segments,
            vec![
                (Point::ZERO, Point::new(70.0, 0.0), config.committed_color),
                (Point::new(70.0, 0.0), Point::new(70.0, 70.0), config.in_progress_color),
            ]
        );
        assert!(matches!(recorder.commands.last(), Some(DrawCommand::Circle { .. })));
        assert!(matches!(recorder.commands.first(), Some(DrawCommand::Circle { .. })));
    }
}
