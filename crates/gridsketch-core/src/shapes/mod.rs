//! Shape definitions for the canvas.
//!
//! A shape owns an append-only list of nodes. How many nodes it accepts and
//! how it is drawn depend on its [`ShapeKind`].

mod line;

use crate::surface::DrawTarget;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Handle of a shape in the scene arena.
///
/// A shape under construction already carries the handle it will be stored
/// under once committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub usize);

/// Back reference to a node: owning shape plus position in its node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub shape: ShapeId,
    pub index: usize,
}

/// A world-space point belonging to exactly one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub position: Point,
    owner: ShapeId,
}

impl Node {
    /// The shape this node belongs to.
    pub fn owner(&self) -> ShapeId {
        self.owner
    }
}

/// Maximum number of nodes a shape kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Fixed(usize),
    /// No upper bound (e.g. polylines).
    Unbounded,
}

impl Capacity {
    /// Check whether a shape holding `len` nodes can take one more.
    pub fn admits(self, len: usize) -> bool {
        match self {
            Capacity::Fixed(max) => len < max,
            Capacity::Unbounded => true,
        }
    }
}

/// Available shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
}

impl ShapeKind {
    /// Node capacity of this kind.
    pub fn capacity(self) -> Capacity {
        match self {
            ShapeKind::Line => Capacity::Fixed(line::NODE_COUNT),
        }
    }

    /// Number of nodes required before the shape can be drawn.
    pub fn drawable_nodes(self) -> usize {
        match self {
            ShapeKind::Line => line::NODE_COUNT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
        }
    }
}

/// Returned by [`Shape::try_add_node`] when the shape is already full.
///
/// This is the normal signal that a shape under construction is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{} already holds its maximum of {capacity} nodes", .kind.name())]
pub struct CapacityExceeded {
    pub kind: ShapeKind,
    pub capacity: usize,
}

/// A node-bearing, drawable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    nodes: Vec<Node>,
    color: SerializableColor,
}

impl Shape {
    /// Create an empty shape.
    pub fn new(id: ShapeId, kind: ShapeKind, color: SerializableColor) -> Self {
        let nodes = match kind.capacity() {
            Capacity::Fixed(max) => Vec::with_capacity(max),
            Capacity::Unbounded => Vec::new(),
        };
        Self {
            id,
            kind,
            nodes,
            color,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Move the shape to another id, updating node back references.
    pub(crate) fn with_id(mut self, id: ShapeId) -> Self {
        self.id = id;
        for node in &mut self.nodes {
            node.owner = id;
        }
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.color = color;
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node positions in insertion order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.nodes.iter().map(|node| node.position)
    }

    /// Look up a node by reference. Returns `None` for references to other
    /// shapes or out-of-range indices.
    pub fn node(&self, node: NodeRef) -> Option<&Node> {
        if node.shape != self.id {
            return None;
        }
        self.nodes.get(node.index)
    }

    /// Check if no further node can be added.
    pub fn is_full(&self) -> bool {
        !self.kind.capacity().admits(self.nodes.len())
    }

    /// Check if every node the kind needs for drawing is present.
    pub fn is_complete(&self) -> bool {
        self.nodes.len() >= self.kind.drawable_nodes()
    }

    /// Append a node at `position` if capacity allows.
    ///
    /// On `CapacityExceeded` the shape is left untouched.
    pub fn try_add_node(&mut self, position: Point) -> Result<NodeRef, CapacityExceeded> {
        match self.kind.capacity() {
            Capacity::Fixed(capacity) if self.nodes.len() >= capacity => Err(CapacityExceeded {
                kind: self.kind,
                capacity,
            }),
            _ => {
                self.nodes.push(Node {
                    position,
                    owner: self.id,
                });
                Ok(NodeRef {
                    shape: self.id,
                    index: self.nodes.len() - 1,
                })
            }
        }
    }

    /// Move a node. Returns false if `node` does not refer to this shape.
    pub fn reposition(&mut self, node: NodeRef, position: Point) -> bool {
        if node.shape != self.id {
            return false;
        }
        match self.nodes.get_mut(node.index) {
            Some(target) => {
                target.position = position;
                true
            }
            None => false,
        }
    }

    /// Draw the shape. Incomplete shapes draw nothing.
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        if !self.is_complete() {
            return;
        }
        match self.kind {
            ShapeKind::Line => line::draw(self, target),
        }
    }
}
