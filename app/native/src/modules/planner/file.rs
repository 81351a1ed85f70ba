//! Planner that replays a fixed plan loaded from disk.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::{ActionPlan, CursorAction, PlanRequest, Planner, PlannerError};

/// Accepts both `{"actions": [...]}` and a bare `[...]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlanFile {
    Envelope(ActionPlan),
    Bare(Vec<CursorAction>),
}

/// Returns the same action list for every request.
#[derive(Debug, Clone)]
pub struct FilePlanner {
    actions: Vec<CursorAction>,
}

impl FilePlanner {
    /// Creates a planner that always returns `actions`.
    #[must_use]
    pub const fn new(actions: Vec<CursorAction>) -> Self { Self { actions } }

    /// Loads a plan from a JSON (or JSONC) file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid plan.
    pub fn load(path: &Path) -> Result<Self, PlannerError> {
        let file = fs::File::open(path)?;
        let reader = json_comments::StripComments::new(file);
        let actions = match serde_json::from_reader(reader)? {
            PlanFile::Envelope(plan) => plan.actions,
            PlanFile::Bare(actions) => actions,
        };
        Ok(Self::new(actions))
    }

    /// The replayed actions.
    #[must_use]
    pub fn actions(&self) -> &[CursorAction] { &self.actions }
}

#[async_trait]
impl Planner for FilePlanner {
    fn name(&self) -> &'static str { "file" }

    async fn request_plan(&self, _request: &PlanRequest) -> Result<Vec<CursorAction>, PlannerError> {
        Ok(self.actions.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_envelope() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                // greet the notepad
                "actions": [{{"type": "CLICK", "target": "Notepad"}}]
            }}"#
        )
        .unwrap();

        let planner = FilePlanner::load(file.path()).unwrap();
        assert_eq!(planner.actions(), &[CursorAction::click_window("Notepad")]);
    }

    #[test]
    fn test_load_bare_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"[{{"type": "IDLE"}}, {{"type": "MOVE", "target": "Whiteboard"}}]"#).unwrap();

        let planner = FilePlanner::load(file.path()).unwrap();
        assert_eq!(planner.actions().len(), 2);
    }

    #[test]
    fn test_load_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"nope": true}}"#).unwrap();
        assert!(matches!(FilePlanner::load(file.path()), Err(PlannerError::InvalidResponse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = FilePlanner::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(PlannerError::Io(_))));
    }
}
