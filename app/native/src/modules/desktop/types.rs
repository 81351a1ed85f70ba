//! Geometry and window types shared between the core and the presentation layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Geometry
// ============================================================================

/// A floating-point screen coordinate.
///
/// Values may transiently leave the viewport while a motion heads toward an
/// off-screen target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// Visible desktop dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self { Self { width: 1280.0, height: 800.0 } }
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }

    /// Centre of the viewport.
    #[must_use]
    pub fn center(&self) -> Position { Position::new(self.width / 2.0, self.height / 2.0) }
}

// ============================================================================
// Windows
// ============================================================================

/// A desktop window as seen by the core.
///
/// The presentation layer owns windows; the core only reads geometry and
/// identity to resolve action targets, and `is_open`/`title` to describe the
/// desktop to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    /// Stable identifier (e.g. `whiteboard`).
    pub id: String,
    /// Human-readable title (e.g. `Whiteboard`).
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Stacking order. Higher values are drawn on top.
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    /// Whether the window is currently shown.
    #[serde(default = "default_is_open")]
    pub is_open: bool,
}

const fn default_z_index() -> i32 { 1 }

const fn default_is_open() -> bool { true }

impl Window {
    /// Creates an open window.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        z_index: i32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            x,
            y,
            width,
            height,
            z_index,
            is_open: true,
        }
    }

    /// Centre of the window frame.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether `reference` names this window, either by id or by title.
    #[must_use]
    pub fn matches(&self, reference: &str) -> bool { self.id == reference || self.title == reference }
}

/// Default desktop layout used when the configuration names no windows.
#[must_use]
pub fn default_windows() -> Vec<Window> {
    vec![
        Window::new("notepad", "Notepad", 50.0, 50.0, 300.0, 200.0, 1),
        Window::new("whiteboard", "Whiteboard", 400.0, 100.0, 400.0, 400.0, 2),
        Window::new("files", "File Explorer", 100.0, 350.0, 250.0, 180.0, 3),
    ]
}

// ============================================================================
// Strokes
// ============================================================================

/// Line cap / join style for strokes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Round,
    Square,
}

/// Visual properties of a whiteboard stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
    pub cap: LineStyle,
    pub join: LineStyle,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "#8b5cf6".to_string(),
            width: 4.0,
            cap: LineStyle::Round,
            join: LineStyle::Round,
        }
    }
}

/// One drawing instruction in surface-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeOp {
    /// Start a new path at the given point.
    Begin { at: Position, style: StrokeStyle },
    /// Extend the current path with a straight segment and render it.
    LineTo(Position),
}

/// A persisted stroke on a drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub style: StrokeStyle,
    pub points: Vec<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_center() {
        let win = Window::new("a", "A", 100.0, 50.0, 200.0, 100.0, 1);
        assert_eq!(win.center(), Position::new(200.0, 100.0));
    }

    #[test]
    fn test_window_matches_id_or_title() {
        let win = Window::new("files", "File Explorer", 0.0, 0.0, 1.0, 1.0, 1);
        assert!(win.matches("files"));
        assert!(win.matches("File Explorer"));
        assert!(!win.matches("file explorer"));
    }

    #[test]
    fn test_window_deserializes_with_defaults() {
        let win: Window = serde_json::from_str(
            r#"{"id": "x", "title": "X", "x": 1, "y": 2, "width": 3, "height": 4}"#,
        )
        .unwrap();
        assert!(win.is_open);
        assert_eq!(win.z_index, 1);
    }

    #[test]
    fn test_default_windows_layout() {
        let windows = default_windows();
        assert_eq!(windows.len(), 3);
        assert!(windows.iter().all(|w| w.is_open));
        assert_eq!(windows[1].id, "whiteboard");
    }

    #[test]
    fn test_viewport_center() {
        assert_eq!(Viewport::new(1000.0, 600.0).center(), Position::new(500.0, 300.0));
    }
}
