//! Tool system: incremental shape construction.
//!
//! A shape is built node by node. Selecting a tool seeds a new shape with two
//! nodes at the cursor so it is drawable straight away; the last node then
//! follows the cursor every frame. Each commit trigger tries to append
//! another node, and once the shape refuses one it is finished and moved
//! into the [`Scene`].

use crate::scene::Scene;
use crate::shapes::{NodeRef, SerializableColor, Shape, ShapeId, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Nodes placed at the cursor when a shape is started.
const SEED_NODES: usize = 2;

/// Available drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Line,
}

impl ToolKind {
    /// Shape variant created by this tool.
    pub fn shape_kind(self) -> ShapeKind {
        match self {
            ToolKind::Line => ShapeKind::Line,
        }
    }
}

/// State of the shape builder.
#[derive(Debug, Clone, Default)]
pub enum BuilderState {
    /// No shape under construction.
    #[default]
    Idle,
    /// A shape is being built.
    Building {
        /// The shape under construction.
        shape: Shape,
        /// Node that follows the cursor.
        active: NodeRef,
    },
}

/// Result of a commit trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing was being built.
    Ignored,
    /// A node was appended and is now the active node.
    NodeAdded(NodeRef),
    /// The shape was full and has been moved into the scene.
    Committed(ShapeId),
}

/// Drives construction of new shapes.
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    state: BuilderState,
    /// Color of the shape while it is being built.
    pub in_progress_color: SerializableColor,
    /// Color given to the shape when it is committed.
    pub committed_color: SerializableColor,
}

impl ShapeBuilder {
    pub fn new(in_progress_color: SerializableColor, committed_color: SerializableColor) -> Self {
        Self {
            state: BuilderState::Idle,
            in_progress_color,
            committed_color,
        }
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Check if a shape is under construction.
    pub fn is_building(&self) -> bool {
        matches!(self.state, BuilderState::Building { .. })
    }

    /// The shape under construction, if any.
    pub fn in_progress(&self) -> Option<&Shape> {
        match &self.state {
            BuilderState::Building { shape, .. } => Some(shape),
            BuilderState::Idle => None,
        }
    }

    /// The node currently following the cursor.
    pub fn active_node(&self) -> Option<NodeRef> {
        match &self.state {
            BuilderState::Building { active, .. } => Some(*active),
            BuilderState::Idle => None,
        }
    }

    /// Start a new shape at `cursor`, to be stored under `id` once committed.
    ///
    /// Ignored while another shape is being built. Returns whether a shape
    /// was started.
    pub fn begin(&mut self, tool: ToolKind, cursor: Point, id: ShapeId) -> bool {
        if self.is_building() {
            log::debug!("ignoring {tool:?} selection, a shape is already being built");
            return false;
        }

        let mut shape = Shape::new(id, tool.shape_kind(), self.in_progress_color);
        let mut active = None;
        for _ in 0..SEED_NODES {
            match shape.try_add_node(cursor) {
                Ok(node) => active = Some(node),
                Err(_) => break,
            }
        }
        let Some(active) = active else {
            return false;
        };

        log::debug!("started {} {:?} at {:?}", shape.kind().name(), id, cursor);
        self.state = BuilderState::Building { shape, active };
        true
    }

    /// Move the active node to `cursor`.
    pub fn track(&mut self, cursor: Point) {
        if let BuilderState::Building { shape, active } = &mut self.state {
            shape.reposition(*active, cursor);
        }
    }

    /// Fix the active node at `cursor` and try to append the next one.
    ///
    /// When the shape refuses the new node it is finished: it takes the
    /// committed color and is moved into `scene`.
    pub fn commit_node(&mut self, cursor: Point, scene: &mut Scene) -> CommitOutcome {
        let BuilderState::Building { mut shape, active } = std::mem::take(&mut self.state) else {
            return CommitOutcome::Ignored;
        };

        match shape.try_add_node(cursor) {
            Ok(node) => {
                self.state = BuilderState::Building {
                    shape,
                    active: node,
                };
                CommitOutcome::NodeAdded(node)
            }
            Err(full) => {
                log::debug!("{full}, committing");
                shape.reposition(active, cursor);
                shape.set_color(self.committed_color);
                let id = scene.commit(shape);
                log::info!("committed shape {:?} ({} total)", id, scene.len());
                CommitOutcome::Committed(id)
            }
        }
    }

    /// Drop the shape under construction. Returns whether one was dropped.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            BuilderState::Building { shape, .. } => {
                log::debug!("cancelled {:?}", shape.id());
                true
            }
            BuilderState::Idle => false,
        }
    }
}
