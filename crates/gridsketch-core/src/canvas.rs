//! Canvas state and per-frame processing.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::input::{FrameInput, FrameIntents, InputRouter, PanIntent};
use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId};
use crate::snap::SnapMode;
use crate::surface::DrawTarget;
use crate::tools::{CommitOutcome, ShapeBuilder};
use kurbo::{Point, Size};

/// Cursor position for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    /// Raw pointer position in screen coordinates.
    pub screen: Point,
    /// Pointer position in world coordinates.
    pub world: Point,
    /// World position after snapping; this is where nodes are placed.
    pub snapped: Point,
}

/// What a processed frame asks of the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    /// False once the window has been closed.
    pub keep_running: bool,
    /// Shape committed during this frame.
    pub committed: Option<ShapeId>,
}

/// All interaction state of the editor, advanced one frame at a time by
/// [`Canvas::process_frame`].
#[derive(Debug, Clone)]
pub struct Canvas {
    pub camera: Camera,
    pub scene: Scene,
    pub builder: ShapeBuilder,
    pub router: InputRouter,
    pub snap_mode: SnapMode,
    pub grid_spacing: f64,
    /// Screen position the view was last panned from, while panning.
    pan_anchor: Option<Point>,
    cursor: Cursor,
}

impl Canvas {
    /// Create a canvas from a configuration.
    ///
    /// An invalid configuration is used as far as it is usable: the camera
    /// repairs bad zoom bounds and ignores non-finite zoom steps.
    pub fn new(config: &EditorConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("{e}");
        }
        let viewport = Size::new(config.window_width as f64, config.window_height as f64);
        Self {
            camera: Camera::new(viewport, config.min_zoom, config.max_zoom),
            scene: Scene::new(),
            builder: ShapeBuilder::new(config.in_progress_color, config.committed_color),
            router: InputRouter::new(config.zoom_speed),
            snap_mode: SnapMode::default(),
            grid_spacing: config.grid_spacing,
            pan_anchor: None,
            cursor: Cursor::default(),
        }
    }

    /// Cursor as of the last processed frame.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Check if a pan gesture is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Update the viewport size (e.g. after a window resize).
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(Size::new(width, height));
        self.cursor = self.compute_cursor(self.cursor.screen);
    }

    /// The shape under construction, if any.
    pub fn in_progress(&self) -> Option<&Shape> {
        self.builder.in_progress()
    }

    /// Advance the editor by one frame of input.
    ///
    /// Order: route events, zoom around the pointer, pan, recompute the
    /// snapped cursor, then feed tool selection, cursor tracking and commit
    /// triggers to the builder.
    pub fn process_frame(&mut self, input: &FrameInput) -> FrameOutcome {
        let intents = self.router.route(input);
        let pointer = self.router.pointer_position;

        self.camera.zoom_by(intents.zoom_delta, pointer);
        self.apply_pan(&intents, pointer);

        if intents.toggle_snap {
            self.snap_mode = self.snap_mode.next();
            log::info!("snap mode: {:?}", self.snap_mode);
        }
        self.cursor = self.compute_cursor(pointer);

        let committed = self.apply_tools(&intents);

        FrameOutcome {
            keep_running: !intents.terminate,
            committed,
        }
    }

    fn apply_pan(&mut self, intents: &FrameIntents, pointer: Point) {
        match intents.pan {
            Some(PanIntent::Start(position)) => {
                log::debug!("pan start at {position:?}");
                self.pan_anchor = Some(position);
            }
            Some(PanIntent::Stop) => {
                log::debug!("pan stop");
                self.pan_anchor = None;
            }
            None => {}
        }

        if let Some(anchor) = self.pan_anchor {
            self.camera.pan_by(anchor, pointer);
            self.pan_anchor = Some(pointer);
        }
    }

    fn compute_cursor(&self, screen: Point) -> Cursor {
        let world = self.camera.screen_to_world(screen);
        Cursor {
            screen,
            world,
            snapped: self.snap_mode.apply(world, self.grid_spacing),
        }
    }

    fn apply_tools(&mut self, intents: &FrameIntents) -> Option<ShapeId> {
        let cursor = self.cursor.snapped;

        if intents.cancel {
            self.builder.cancel();
        }
        if let Some(tool) = intents.select_tool {
            self.builder.begin(tool, cursor, self.scene.next_id());
        }
        self.builder.track(cursor);

        let mut committed = None;
        for _ in 0..intents.commit_triggers {
            if let CommitOutcome::Committed(id) = self.builder.commit_node(cursor, &mut self.scene) {
                committed = Some(id);
            }
        }
        committed
    }

    /// Draw committed shapes, then the shape under construction on top.
    pub fn draw_shapes(&self, target: &mut dyn DrawTarget) {
        self.scene.draw(target, self.builder.in_progress());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, Key, MouseButton, ScrollAxis};

    fn canvas() -> Canvas {
        Canvas::new(&EditorConfig::default())
    }

    fn moved(x: f64, y: f64) -> InputEvent {
        InputEvent::CursorMoved {
            position: Point::new(x, y),
        }
    }

    fn button(pressed: bool, button: MouseButton, x: f64, y: f64) -> InputEvent {
        let position = Point::new(x, y);
        if pressed {
            InputEvent::ButtonPressed { button, position }
        } else {
            InputEvent::ButtonReleased { button, position }
        }
    }

    fn frame(events: Vec<InputEvent>) -> FrameInput {
        FrameInput::new(events)
    }

    fn points(shape: &Shape) -> Vec<Point> {
        shape.points().collect()
    }

    #[test]
    fn test_cursor_is_snapped() {
        let mut canvas = canvas();
        canvas.process_frame(&frame(vec![moved(34.0, 104.0)]));
        let cursor = canvas.cursor();
        assert_eq!(cursor.world, Point::new(34.0, 104.0));
        assert_eq!(cursor.snapped, Point::new(0.0, 70.0));
    }

    #[test]
    fn test_builder_lifecycle() {
        let mut canvas = canvas();

        // Select the line tool with the cursor on (70, 70).
        let outcome = canvas.process_frame(&frame(vec![moved(72.0, 66.0)]).with_keys([Key::LineTool]));
        assert!(outcome.keep_running);
        let shape = canvas.in_progress().unwrap();
        assert_eq!(points(shape), vec![Point::new(70.0, 70.0); 2]);

        // Move; the active node follows the snapped cursor.
        canvas.process_frame(&frame(vec![moved(150.0, 80.0)]).with_keys([Key::LineTool]));
        assert_eq!(
            points(canvas.in_progress().unwrap()),
            vec![Point::new(70.0, 70.0), Point::new(140.0, 70.0)]
        );

        // Release commits the line.
        let outcome = canvas.process_frame(&frame(vec![
            button(true, MouseButton::Left, 150.0, 80.0),
            button(false, MouseButton::Left, 150.0, 80.0),
        ]));
        assert_eq!(outcome.committed, Some(ShapeId(0)));
        assert!(canvas.in_progress().is_none());
        assert_eq!(canvas.scene.len(), 1);
        assert_eq!(
            points(canvas.scene.get(ShapeId(0)).unwrap()),
            vec![Point::new(70.0, 70.0), Point::new(140.0, 70.0)]
        );
    }

    #[test]
    fn test_holding_tool_key_does_not_restart_shape() {
        let mut canvas = canvas();
        canvas.process_frame(&frame(vec![moved(70.0, 70.0)]).with_keys([Key::LineTool]));
        canvas.process_frame(&frame(vec![moved(210.0, 70.0)]).with_keys([Key::LineTool]));
        canvas.process_frame(&frame(vec![moved(280.0, 70.0)]).with_keys([Key::LineTool]));

        assert_eq!(
            points(canvas.in_progress().unwrap()),
            vec![Point::new(70.0, 70.0), Point::new(280.0, 70.0)]
        );
    }

    #[test]
    fn test_pan_during_construction() {
        let mut canvas = canvas();
        canvas.process_frame(&frame(vec![moved(70.0, 70.0)]).with_keys([Key::LineTool]));

        // Drag with the middle button from (400, 400) to (330, 260).
        canvas.process_frame(&frame(vec![button(true, MouseButton::Middle, 400.0, 400.0)]));
        canvas.process_frame(&frame(vec![moved(330.0, 260.0)]));
        canvas.process_frame(&frame(vec![button(false, MouseButton::Middle, 330.0, 260.0)]));
        assert!(!canvas.is_panning());
        assert_eq!(canvas.camera.offset, kurbo::Vec2::new(70.0, 140.0));

        // The fixed node stays put in world space while the view moved.
        let shape = canvas.in_progress().unwrap();
        assert_eq!(shape.nodes()[0].position, Point::new(70.0, 70.0));
        assert_eq!(shape.nodes()[1].position, Point::new(420.0, 420.0));

        let outcome = canvas.process_frame(&frame(vec![button(false, MouseButton::Left, 330.0, 260.0)]));
        let id = outcome.committed.unwrap();
        let committed = points(canvas.scene.get(id).unwrap());
        assert_eq!(committed, vec![Point::new(70.0, 70.0), Point::new(420.0, 420.0)]);

        // Later view changes do not touch committed data.
        canvas.process_frame(&frame(vec![
            button(true, MouseButton::Middle, 0.0, 0.0),
            moved(500.0, 500.0),
        ]));
        canvas.process_frame(&frame(vec![InputEvent::WheelScrolled {
            axis: ScrollAxis::Vertical,
            delta: 1.0,
            position: Point::new(500.0, 500.0),
        }]));
        assert_eq!(points(canvas.scene.get(id).unwrap()), committed);
    }

    #[test]
    fn test_zoom_during_construction_tracks_cursor() {
        let mut canvas = canvas();
        canvas.process_frame(&frame(vec![moved(70.0, 70.0)]).with_keys([Key::LineTool]));

        for _ in 0..5 {
            canvas.process_frame(&frame(vec![InputEvent::WheelScrolled {
                axis: ScrollAxis::Vertical,
                delta: -1.0,
                position: Point::new(900.0, 500.0),
            }]));
        }
        canvas.process_frame(&frame(vec![moved(1200.0, 100.0)]));

        let cursor = canvas.cursor();
        let shape = canvas.in_progress().unwrap();
        assert_eq!(shape.nodes()[0].position, Point::new(70.0, 70.0));
        assert_eq!(shape.nodes()[1].position, cursor.snapped);
        assert!((canvas.camera.zoom() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_pivots_on_pointer() {
        let mut canvas = canvas();
        let pointer = Point::new(1000.0, 200.0);
        canvas.process_frame(&frame(vec![moved(pointer.x, pointer.y)]));
        let before = canvas.cursor().world;

        canvas.process_frame(&frame(vec![InputEvent::WheelScrolled {
            axis: ScrollAxis::Vertical,
            delta: 1.0,
            position: pointer,
        }]));
        let after = canvas.cursor().world;
        assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
        assert!((canvas.camera.zoom() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_commit_while_idle_is_noop() {
        let mut canvas = canvas();
        let outcome = canvas.process_frame(&frame(vec![button(false, MouseButton::Left, 70.0, 70.0)]));
        assert_eq!(outcome.committed, None);
        assert!(canvas.scene.is_empty());
        assert!(!canvas.builder.is_building());
    }

    #[test]
    fn test_cancel_drops_in_progress_shape() {
        let mut canvas = canvas();
        canvas.process_frame(&frame(vec![moved(70.0, 70.0)]).with_keys([Key::LineTool]));
        canvas.process_frame(&frame(vec![]).with_keys([Key::Cancel]));
        assert!(canvas.in_progress().is_none());

        let outcome = canvas.process_frame(&frame(vec![button(false, MouseButton::Left, 70.0, 70.0)]));
        assert_eq!(outcome.committed, None);
        assert!(canvas.scene.is_empty());
    }

    #[test]
    fn test_toggle_snap() {
        let mut canvas = canvas();
        canvas.process_frame(&frame(vec![moved(33.0, 41.0)]).with_keys([Key::ToggleSnap]));
        assert_eq!(canvas.snap_mode, SnapMode::None);
        assert_eq!(canvas.cursor().snapped, Point::new(33.0, 41.0));

        canvas.process_frame(&frame(vec![]));
        canvas.process_frame(&frame(vec![]).with_keys([Key::ToggleSnap]));
        assert_eq!(canvas.snap_mode, SnapMode::Grid);
        assert_eq!(canvas.cursor().snapped, Point::new(0.0, 70.0));
    }

    #[test]
    fn test_window_close_finishes_frame() {
        let mut canvas = canvas();
        canvas.process_frame(&frame(vec![moved(70.0, 70.0)]).with_keys([Key::LineTool]));
        let outcome = canvas.process_frame(&frame(vec![
            InputEvent::WindowClosed,
            button(false, MouseButton::Left, 140.0, 70.0),
        ]));
        assert!(!outcome.keep_running);
        // The rest of the batch is still processed.
        assert_eq!(outcome.committed, Some(ShapeId(0)));
    }

    fn scroll_up() -> FrameInput {
        frame(vec![InputEvent::WheelScrolled {
            axis: ScrollAxis::Vertical,
            delta: 1.0,
            position: Point::new(800.0, 480.0),
        }])
    }

    #[test]
    fn test_inverted_zoom_bounds_in_config() {
        let config = EditorConfig {
            min_zoom: 1.7,
            max_zoom: 0.3,
            ..EditorConfig::default()
        };
        let mut canvas = Canvas::new(&config);
        for _ in 0..20 {
            canvas.process_frame(&scroll_up());
        }
        assert!((canvas.camera.zoom() - 1.7).abs() < 1e-12);
    }

    #[test]
    fn test_nan_zoom_speed_keeps_zoom_in_bounds() {
        let config = EditorConfig {
            zoom_speed: f64::NAN,
            ..EditorConfig::default()
        };
        let mut canvas = Canvas::new(&config);
        canvas.process_frame(&scroll_up());

        let zoom = canvas.camera.zoom();
        assert!(zoom.is_finite());
        assert!((zoom - 1.0).abs() < f64::EPSILON);
        assert!(canvas.cursor().world.x.is_finite());
    }

    #[test]
    fn test_two_lines_in_a_row() {
        let mut canvas = canvas();
        canvas.process_frame(&frame(vec![moved(0.0, 0.0)]).with_keys([Key::LineTool]));
        canvas.process_frame(&frame(vec![button(false, MouseButton::Left, 70.0, 0.0)]));
        canvas.process_frame(&frame(vec![]).with_keys([Key::LineTool]));
        canvas.process_frame(&frame(vec![button(false, MouseButton::Left, 70.0, 70.0)]));

        assert_eq!(canvas.scene.len(), 2);
        assert_eq!(
            points(canvas.scene.get(ShapeId(1)).unwrap()),
            vec![Point::new(70.0, 0.0), Point::new(70.0, 70.0)]
        );
    }
}
