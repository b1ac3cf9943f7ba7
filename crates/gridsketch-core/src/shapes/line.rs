//! Line shape: a single segment between two nodes.

use super::Shape;
use crate::surface::DrawTarget;

/// Nodes in a line: start and end.
pub(super) const NODE_COUNT: usize = 2;

/// Draw the segment from the first to the second node.
pub(super) fn draw(shape: &Shape, target: &mut dyn DrawTarget) {
    if let [start, end, ..] = shape.nodes() {
        target.draw_line_segment(start.position, end.position, shape.color());
    }
}
