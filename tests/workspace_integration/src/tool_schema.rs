//! Tool schema validity tests.
//!
//! For any registered tool, the tool's JSON schema must be a valid object
//! schema and include the tool's parameters with their types.

use serde_json::Value;

/// Validates that a JSON schema has the required structure.
pub fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

/// Validates that a tool has required fields.
pub fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    if tool.description.is_none() || tool.description.as_ref().unwrap().is_empty() {
        return Err(format!("Tool '{}' must have a description", tool.name));
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use video_edit_mcp::server::tool_definitions;

    /// Test that JSON schema validation works correctly.
    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {
                "video_path": { "type": "string" }
            },
            "required": ["video_path"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({ "type": "string" });
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    /// Every registered tool passes schema validation.
    #[test]
    fn test_all_tools_have_valid_schemas() {
        let tools = tool_definitions();
        assert!(!tools.is_empty());

        for tool in &tools {
            validate_tool(tool).unwrap_or_else(|e| panic!("Tool '{}' invalid: {e}", tool.name));
        }
    }

    /// Tool schemas expose the parameters callers must send.
    #[test]
    fn test_schemas_contain_expected_parameters() {
        let tools = tool_definitions();

        let trim = tools.iter().find(|t| t.name == "trim_video").expect("trim_video");
        let schema = serde_json::to_value(&*trim.input_schema).unwrap();
        let properties = schema["properties"].as_object().expect("properties");
        assert!(properties.contains_key("video_path"));
        assert!(properties.contains_key("start_time"));
        assert!(properties.contains_key("end_time"));
        assert!(properties.contains_key("output_name"));
        assert!(properties.contains_key("return_path"));

        let download = tools
            .iter()
            .find(|t| t.name == "download_video")
            .expect("download_video");
        let schema = serde_json::to_value(&*download.input_schema).unwrap();
        let properties = schema["properties"].as_object().expect("properties");
        assert!(properties.contains_key("url"));
        assert!(properties.contains_key("max_height"));
    }

    /// The editing inventory and the retrieval inventory are both present.
    #[test]
    fn test_full_tool_inventory() {
        let tools = tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();

        for expected in [
            "get_video_info",
            "trim_video",
            "merge_video",
            "resize_video",
            "crop_video",
            "rotate_video",
            "speed_up_video",
            "add_audio",
            "fadein_video",
            "fadeout_video",
            "add_text_overlay",
            "add_image_overlay",
            "add_video_overlay",
            "grayscale_video",
            "mirror_video",
            "images_to_video",
            "extract_frames",
            "split_video_at_times",
            "convert_video_format",
            "burn_subtitles",
            "download_video",
            "download_audio",
            "get_download_info",
        ] {
            assert!(names.contains(&expected), "missing tool: {expected}");
        }
    }
}
