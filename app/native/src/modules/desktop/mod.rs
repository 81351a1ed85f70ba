//! Desktop collaborator.
//!
//! The autopilot core never renders anything itself. It reads window
//! geometry and viewport size from a [`Desktop`] and writes cursor position,
//! status text, log lines and whiteboard strokes back to it.
//!
//! [`VirtualDesktop`] is the in-memory implementation used by the CLI and
//! the tests.

mod types;
mod virtual_desktop;

use tokio::sync::watch;
pub use types::{
    LineStyle, Position, Stroke, StrokeOp, StrokeStyle, Viewport, Window, default_windows,
};
pub use virtual_desktop::{DesktopSnapshot, LOG_CAPACITY, VirtualDesktop};

/// Presentation collaborator consumed by the autopilot.
///
/// All methods take `&self`; implementations are expected to use interior
/// mutability because the wander, tick and refill loops share one instance.
pub trait Desktop: Send + Sync {
    /// Current viewport dimensions.
    fn viewport(&self) -> Viewport;

    /// All known windows, open or closed.
    fn windows(&self) -> Vec<Window>;

    /// Looks a window up by id or title.
    ///
    /// Closed windows are still returned so that queued actions keep
    /// resolving against their last known geometry.
    fn find_window(&self, reference: &str) -> Option<Window> {
        self.windows().into_iter().find(|w| w.matches(reference))
    }

    /// Titles of the windows that are currently open.
    fn open_window_titles(&self) -> Vec<String> {
        self.windows().into_iter().filter(|w| w.is_open).map(|w| w.title).collect()
    }

    /// The window hosting the drawing canvas `surface`, if that canvas exists.
    fn drawing_surface(&self, surface: &str) -> Option<Window>;

    /// Publishes the cursor position for the current frame.
    fn set_cursor(&self, position: Position);

    /// Publishes the transient "clicking" flag.
    fn set_clicking(&self, clicking: bool);

    /// Publishes the human-readable status line.
    fn set_status(&self, status: &str);

    /// Appends a message to the log stream.
    fn append_log(&self, message: String);

    /// Applies one drawing instruction to the canvas `surface`.
    fn stroke(&self, surface: &str, op: StrokeOp);

    /// Receiver that changes whenever the window layout changes.
    ///
    /// Desktops that cannot report layout changes return `None`; the
    /// autopilot then relies on polling alone.
    fn layout_changes(&self) -> Option<watch::Receiver<u64>> { None }
}
