//! Input binding registry and documentation.

/// An input binding definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub input: &'static str,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(input: &'static str, description: &'static str) -> Self {
        Self { input, description }
    }
}

/// Registry of all input bindings.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered bindings.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("L", "Start a line at the cursor"),
            Shortcut::new("Left click", "Place the next node / finish the shape"),
            Shortcut::new("Escape", "Cancel the shape under construction"),
            Shortcut::new("G", "Toggle grid snapping"),
            Shortcut::new("Middle drag", "Pan the view"),
            Shortcut::new("Mouse wheel", "Zoom around the cursor"),
        ]
    }

    /// Log all bindings.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::info!("  {:12} {}", shortcut.input, shortcut.description);
        }
    }
}
