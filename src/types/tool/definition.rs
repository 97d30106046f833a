//! Tool definition types.

use serde::{Deserialize, Serialize};

/// Name, description and input schema of a tool, as advertised to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Names of the required input fields, if the schema lists any.
    pub fn required_fields(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|v| v.as_array())
            .map(|fields| fields.iter().filter_map(|f| f.as_str()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_fields() {
        let def = ToolDefinition::new(
            "write_file",
            "Write a file",
            json!({"type": "object", "required": ["path", "content"]}),
        );
        assert_eq!(def.required_fields(), vec!["path", "content"]);

        let bare = ToolDefinition::new("noop", "", json!({"type": "object"}));
        assert!(bare.required_fields().is_empty());
    }
}
