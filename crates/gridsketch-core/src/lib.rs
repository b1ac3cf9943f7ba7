//! GridSketch Core Library
//!
//! Platform-agnostic viewport, grid snapping and shape construction logic
//! for the GridSketch canvas editor.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod input;
pub mod scene;
pub mod shapes;
pub mod snap;
pub mod surface;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, Cursor, FrameOutcome};
pub use config::{ConfigError, EditorConfig};
pub use input::{FrameInput, InputEvent, InputRouter, Key, MouseButton, ScrollAxis};
pub use scene::Scene;
pub use shapes::{CapacityExceeded, NodeRef, SerializableColor, Shape, ShapeId, ShapeKind};
pub use snap::{GridRange, SnapMode, GRID_SIZE, snap_to_grid, visible_cell_origin};
pub use surface::{CommandRecorder, DrawCommand, DrawTarget};
pub use tools::{BuilderState, CommitOutcome, ShapeBuilder, ToolKind};
