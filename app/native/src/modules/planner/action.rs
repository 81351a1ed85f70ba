//! Planner-issued cursor actions.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::modules::desktop::Position;

/// Kind of cursor action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    /// Glide to a window or coordinate.
    Move,
    /// Glide, then press.
    Click,
    /// Trace a normalized path on the whiteboard.
    Draw,
    /// Do nothing for one execution slot.
    Idle,
}

impl ActionKind {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Move => "MOVE",
            Self::Click => "CLICK",
            Self::Draw => "DRAW",
            Self::Idle => "IDLE",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// One planner instruction.
///
/// Actions are immutable once created: they are queued, dequeued exactly
/// once, executed and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CursorAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,

    /// Window id or title, resolved when the action runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Absolute screen coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Points in `0..1` relative to the whiteboard interior (DRAW only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Position>>,

    /// Free-text annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CursorAction {
    const fn bare(kind: ActionKind) -> Self {
        Self { kind, target: None, position: None, path: None, label: None }
    }

    /// MOVE to an absolute coordinate.
    #[must_use]
    pub const fn move_to(position: Position) -> Self {
        let mut action = Self::bare(ActionKind::Move);
        action.position = Some(position);
        action
    }

    /// MOVE to a window.
    #[must_use]
    pub fn move_to_window(target: impl Into<String>) -> Self {
        let mut action = Self::bare(ActionKind::Move);
        action.target = Some(target.into());
        action
    }

    /// CLICK on a window.
    #[must_use]
    pub fn click_window(target: impl Into<String>) -> Self {
        let mut action = Self::bare(ActionKind::Click);
        action.target = Some(target.into());
        action
    }

    /// CLICK at an absolute coordinate.
    #[must_use]
    pub const fn click_at(position: Position) -> Self {
        let mut action = Self::bare(ActionKind::Click);
        action.position = Some(position);
        action
    }

    /// CLICK with no target and no position.
    #[must_use]
    pub const fn click() -> Self { Self::bare(ActionKind::Click) }

    /// DRAW along a normalized path.
    #[must_use]
    pub fn draw(path: Vec<Position>) -> Self {
        let mut action = Self::bare(ActionKind::Draw);
        action.path = Some(path);
        action
    }

    /// IDLE for one slot.
    #[must_use]
    pub const fn idle() -> Self { Self::bare(ActionKind::Idle) }

    /// Attaches a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Status line shown while the action runs, e.g. `CLICK: Notepad`.
    #[must_use]
    pub fn status_line(&self) -> String {
        self.target.as_deref().map_or_else(
            || self.kind.to_string(),
            |target| format!("{}: {target}", self.kind),
        )
    }
}

/// Planner response envelope: `{"actions": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionPlan {
    pub actions: Vec<CursorAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_planner_json() {
        let json = r#"{
            "actions": [
                {"type": "MOVE", "target": "Notepad", "label": "peek"},
                {"type": "CLICK", "position": {"x": 10, "y": 20}},
                {"type": "DRAW", "path": [{"x": 0, "y": 0}, {"x": 1, "y": 1}]},
                {"type": "IDLE"}
            ]
        }"#;
        let plan: ActionPlan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.actions.len(), 4);
        assert_eq!(plan.actions[0], CursorAction::move_to_window("Notepad").with_label("peek"));
        assert_eq!(plan.actions[1], CursorAction::click_at(Position::new(10.0, 20.0)));
        assert_eq!(plan.actions[2].path.as_ref().map(Vec::len), Some(2));
        assert_eq!(plan.actions[3].kind, ActionKind::Idle);
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let result: Result<CursorAction, _> = serde_json::from_str(r#"{"type": "SCROLL"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_without_empty_fields() {
        let json = serde_json::to_value(CursorAction::click()).unwrap();
        assert_eq!(json, serde_json::json!({"type": "CLICK"}));
    }

    #[test]
    fn test_status_line() {
        assert_eq!(CursorAction::click_window("Whiteboard").status_line(), "CLICK: Whiteboard");
        assert_eq!(CursorAction::move_to(Position::new(1.0, 1.0)).status_line(), "MOVE");
    }
}
