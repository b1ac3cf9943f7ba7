//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer, draw_frame};
use gridsketch_core::shapes::SerializableColor;
use gridsketch_core::surface::DrawTarget;
use kurbo::{Affine, Circle, Line, Point, Stroke};
use peniko::{Color, Fill};
use vello::Scene;

/// Default stroke width of shapes, in world units.
const STROKE_WIDTH: f64 = 2.0;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// World-to-screen transform for the current frame.
    transform: Affine,
    /// Stroke used for line segments.
    stroke: Stroke,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            transform: Affine::IDENTITY,
            stroke: Stroke::new(STROKE_WIDTH),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Set the world-to-screen transform applied to subsequent primitives.
    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }
}

impl DrawTarget for VelloRenderer {
    fn draw_filled_circle(&mut self, center: Point, radius: f64, color: SerializableColor) {
        self.scene.fill(
            Fill::NonZero,
            self.transform,
            Color::from(color),
            None,
            &Circle::new(center, radius),
        );
    }

    fn draw_line_segment(&mut self, from: Point, to: Point, color: SerializableColor) {
        self.scene.stroke(
            &self.stroke,
            self.transform,
            Color::from(color),
            None,
            &Line::new(from, to),
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        // Clear the scene
        self.scene.reset();
        self.set_transform(ctx.canvas.camera.transform());
        draw_frame(ctx, self);
        log::trace!(
            "Built scene: {} shapes, zoom {:.2}",
            ctx.canvas.scene.len(),
            ctx.canvas.camera.zoom()
        );
    }
}
