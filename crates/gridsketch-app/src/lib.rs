//! GridSketch Application
//!
//! The application shell providing windowing, input collection
//! and presentation of the canvas.

mod app;
mod event_handler;
mod shortcuts;

pub use app::{App, AppError, CONFIG_ENV, load_config};
pub use event_handler::EventHandler;
pub use shortcuts::{Shortcut, ShortcutRegistry};
