//! Committed shapes, stored in commit order.

use crate::shapes::{Shape, ShapeId};
use crate::surface::DrawTarget;

/// Arena of committed shapes.
///
/// Shapes are never removed, so a [`ShapeId`] is simply the index of the
/// shape in commit order and stays valid for the whole session.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next committed shape will be stored under.
    pub fn next_id(&self) -> ShapeId {
        ShapeId(self.shapes.len())
    }

    /// Append a finished shape.
    ///
    /// The shape keeps the id it was created with when that id was reserved
    /// through [`Scene::next_id`]. Otherwise it is re-keyed to the next free
    /// slot, which breaks any node references still held for it.
    pub fn commit(&mut self, shape: Shape) -> ShapeId {
        let id = self.next_id();
        if shape.id() != id {
            log::warn!(
                "shape {:?} committed out of order, storing as {:?}",
                shape.id(),
                id
            );
        }
        self.shapes.push(shape.with_id(id));
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Committed shapes in commit order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Draw committed shapes in commit order, then `in_progress` on top.
    pub fn draw(&self, target: &mut dyn DrawTarget, in_progress: Option<&Shape>) {
        for shape in &self.shapes {
            shape.draw(target);
        }
        if let Some(shape) = in_progress {
            shape.draw(target);
        }
    }
}
