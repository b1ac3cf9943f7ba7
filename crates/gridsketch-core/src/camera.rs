//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Size, Vec2};

/// Zoom factor of a freshly created view (one world unit per pixel).
pub const DEFAULT_ZOOM: f64 = 1.0;
/// Default lower zoom bound.
pub const MIN_ZOOM: f64 = 0.3;
/// Default upper zoom bound.
pub const MAX_ZOOM: f64 = 1.7;

/// Camera manages the view transform for the canvas.
///
/// The view is centred on the viewport the same way a window's default view
/// is: with zero offset and a zoom factor of 1, screen and world coordinates
/// coincide. `zoom` is the number of world units covered by one screen pixel,
/// so a larger factor shows more of the world.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Current translation of the view (pan), in world units.
    pub offset: Vec2,
    /// Current zoom factor, always within `[min_zoom, max_zoom]`.
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    /// Size of the rendering surface in screen pixels.
    pub viewport: Size,
}

impl Camera {
    /// Create a camera for a viewport of the given size.
    ///
    /// Inverted bounds are swapped; non-finite or non-positive bounds fall
    /// back to [`MIN_ZOOM`] and [`MAX_ZOOM`].
    pub fn new(viewport: Size, min_zoom: f64, max_zoom: f64) -> Self {
        let (min_zoom, max_zoom) = normalize_bounds(min_zoom, max_zoom);
        let mut camera = Self {
            offset: Vec2::ZERO,
            zoom: DEFAULT_ZOOM,
            min_zoom,
            max_zoom,
            viewport,
        };
        camera.zoom = camera.clamp_zoom(DEFAULT_ZOOM);
        camera
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Minimum allowed zoom factor.
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    /// Maximum allowed zoom factor.
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Set the zoom factor directly, clamped to the allowed range.
    /// Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = self.clamp_zoom(zoom);
        }
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Update the viewport size (e.g. after a window resize).
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Centre of the viewport in screen coordinates.
    fn screen_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    /// World point shown at the centre of the viewport.
    pub fn view_center(&self) -> Point {
        self.screen_center() + self.offset
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.screen_center().to_vec2())
            * Affine::scale(1.0 / self.zoom)
            * Affine::translate(-self.view_center().to_vec2())
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::translate(self.view_center().to_vec2())
            * Affine::scale(self.zoom)
            * Affine::translate(-self.screen_center().to_vec2())
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.view_center() + (screen_point - self.screen_center()) * self.zoom
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.screen_center() + (world_point - self.view_center()) / self.zoom
    }

    /// Size of the visible area in world units.
    pub fn view_size(&self) -> Size {
        Size::new(
            self.viewport.width * self.zoom,
            self.viewport.height * self.zoom,
        )
    }

    /// World point under the top-left corner of the viewport.
    pub fn top_left_world(&self) -> Point {
        self.screen_to_world(Point::ZERO)
    }

    /// Translate the view by a world-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Pan so the world point under `screen_start` ends up under `screen_end`.
    ///
    /// Both points are mapped with the current transform, so this must be
    /// called with fresh positions every frame.
    pub fn pan_by(&mut self, screen_start: Point, screen_end: Point) {
        let world_start = self.screen_to_world(screen_start);
        let world_end = self.screen_to_world(screen_end);
        self.translate(world_start - world_end);
    }

    /// Change the zoom factor by `delta`, keeping the world point under
    /// `pivot` fixed on screen.
    ///
    /// The clamp applies to the accumulated factor, so repeated increments
    /// saturate at the bounds. Returns whether the factor changed.
    pub fn zoom_by(&mut self, delta: f64, pivot: Point) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }

        let before = self.screen_to_world(pivot);
        let previous = self.zoom;
        self.zoom = self.clamp_zoom(self.zoom + delta);

        let after = self.screen_to_world(pivot);
        self.translate(before - after);

        (self.zoom - previous).abs() > f64::EPSILON
    }

    /// Reset camera to the initial position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = self.clamp_zoom(DEFAULT_ZOOM);
    }
}

fn normalize_bounds(min_zoom: f64, max_zoom: f64) -> (f64, f64) {
    let usable = |zoom: f64| zoom.is_finite() && zoom > 0.0;
    if !usable(min_zoom) || !usable(max_zoom) {
        log::warn!(
            "unusable zoom bounds [{min_zoom}, {max_zoom}], using [{MIN_ZOOM}, {MAX_ZOOM}]"
        );
        return (MIN_ZOOM, MAX_ZOOM);
    }
    if min_zoom > max_zoom {
        log::warn!("inverted zoom bounds [{min_zoom}, {max_zoom}], swapping");
        return (max_zoom, min_zoom);
    }
    (min_zoom, max_zoom)
}
