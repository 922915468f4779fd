//! Output format tests.
//!
//! For any successful tool execution, the result must be returned as MCP
//! text content holding a JSON document with the documented fields.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Validates that a CallToolResult has valid content format.
pub fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.is_empty() && !result.is_error.unwrap_or(false) {
        return Err("Successful result should have content".to_string());
    }

    for content in &result.content {
        validate_content(content)?;
    }

    Ok(())
}

/// Validates that a Content item has valid structure.
pub fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) => {
            if text_content.text.is_empty() {
                return Err("Text content should not be empty".to_string());
            }
            Ok(())
        }
        _ => Err("This server only returns text content".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use video_edit_mcp::EditOutcome;

    #[test]
    fn test_validate_tool_result_accepts_text() {
        let result = CallToolResult::success(vec![Content::text("{\"output_path\": \"x\"}")]);
        assert!(validate_tool_result(&result).is_ok());
    }

    #[test]
    fn test_validate_tool_result_rejects_empty() {
        let result = CallToolResult::success(vec![]);
        assert!(validate_tool_result(&result).is_err());
    }

    #[test]
    fn test_validate_content_rejects_empty_text() {
        let content = Content::text("");
        assert!(validate_content(&content).is_err());
    }

    /// A saved outcome serializes to an output_path field only.
    #[test]
    fn test_saved_outcome_shape() {
        let outcome = EditOutcome::Saved {
            output_path: "/out/final.mp4".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["output_path"], "/out/final.mp4");
    }

    /// A stored outcome serializes to a clip_ref field only.
    #[test]
    fn test_stored_outcome_shape() {
        let outcome = EditOutcome::Stored {
            clip_ref: "clip://1234".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["clip_ref"], "clip://1234");
    }

    /// Multi-segment outcomes keep segment order.
    #[test]
    fn test_many_outcome_shape() {
        let outcome = EditOutcome::SavedMany {
            output_paths: vec!["/out/p_1.mp4".to_string(), "/out/p_2.mp4".to_string()],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        let paths = json["output_paths"].as_array().unwrap();
        assert_eq!(paths[0], "/out/p_1.mp4");
        assert_eq!(paths[1], "/out/p_2.mp4");
    }

    /// Outcome JSON round-trips through the wire format.
    #[test]
    fn test_outcome_round_trip() {
        let outcome = EditOutcome::StoredMany {
            clip_refs: vec!["clip://a".to_string(), "clip://b".to_string()],
        };
        let text = serde_json::to_string(&outcome).unwrap();
        let parsed: EditOutcome = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, outcome);
    }
}
