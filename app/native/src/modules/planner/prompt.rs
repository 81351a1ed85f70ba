//! Prompt text and response schema sent to hosted planners.

use serde_json::{Value, json};

use super::PlanRequest;

/// Builds the natural-language instruction for one plan request.
#[must_use]
pub fn build_prompt(request: &PlanRequest, min_actions: usize, max_actions: usize) -> String {
    let elements = if request.open_windows.is_empty() {
        "no open windows".to_string()
    } else {
        request.open_windows.join(", ")
    };

    format!(
        "You are an autonomous cursor agent controlling a virtual desktop.\n\
         The desktop has these elements: {elements}.\n\
         The screen resolution is {width}x{height}.\n\
         \n\
         Generate a sequence of {min_actions}-{max_actions} actions for the cursor to perform.\n\
         Actions can be:\n\
         - MOVE: Move to a specific (x, y) or window target.\n\
         - CLICK: Click the current position or a target.\n\
         - DRAW: A series of points representing a shape on the 'Whiteboard'.\n\
         \n\
         Make the behavior look curious and purposeful. For MOVE, provide specific x,y \
         coordinates or a window target name.\n\
         For DRAW, provide a path of relative 0-1 coordinates for the whiteboard.",
        width = request.viewport.width.round(),
        height = request.viewport.height.round(),
    )
}

/// Structured-output schema for `{"actions": [...]}` in the OpenAPI subset
/// hosted models accept.
#[must_use]
pub fn response_schema() -> Value {
    let point = json!({
        "type": "OBJECT",
        "properties": {
            "x": { "type": "NUMBER" },
            "y": { "type": "NUMBER" }
        },
        "required": ["x", "y"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "actions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "enum": ["MOVE", "CLICK", "DRAW"] },
                        "target": { "type": "STRING" },
                        "position": point,
                        "path": { "type": "ARRAY", "items": point },
                        "label": { "type": "STRING" }
                    },
                    "required": ["type"]
                }
            }
        },
        "required": ["actions"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::desktop::Viewport;

    #[test]
    fn test_prompt_mentions_windows_and_resolution() {
        let request = PlanRequest {
            open_windows: vec!["Notepad".to_string(), "Whiteboard".to_string()],
            viewport: Viewport::new(1440.0, 900.0),
        };
        let prompt = build_prompt(&request, 3, 5);

        assert!(prompt.contains("Notepad, Whiteboard"));
        assert!(prompt.contains("1440x900"));
        assert!(prompt.contains("3-5 actions"));
    }

    #[test]
    fn test_prompt_with_no_windows() {
        let request = PlanRequest { open_windows: Vec::new(), viewport: Viewport::default() };
        assert!(build_prompt(&request, 1, 2).contains("no open windows"));
    }

    #[test]
    fn test_schema_requires_actions() {
        let schema = response_schema();
        assert_eq!(schema["required"][0], "actions");
        assert_eq!(schema["properties"]["actions"]["items"]["properties"]["type"]["enum"][2], "DRAW");
        assert_eq!(schema["properties"]["actions"]["items"]["properties"]["path"]["items"]["required"][1], "y");
    }
}
