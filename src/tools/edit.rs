//! edit_file - replaces literal text in a file.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{SchemaTool, resolve_path};
use crate::types::{ToolError, ToolResult};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EditFileInput {
    /// Path of the file to modify.
    pub path: String,
    /// Literal text to replace. Every occurrence is replaced.
    pub old: String,
    /// Replacement text.
    pub new: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EditFileTool;

#[async_trait]
impl SchemaTool for EditFileTool {
    type Input = EditFileInput;

    const NAME: &'static str = "edit_file";
    const DESCRIPTION: &'static str = "Replace every occurrence of the literal text `old` with `new` in a file. \
        Fails without touching the file when `old` does not occur.";

    async fn handle(&self, input: EditFileInput) -> ToolResult {
        if input.old.is_empty() {
            return ToolError::invalid_input("old must not be empty").into();
        }

        let path = match resolve_path(&input.path) {
            Ok(p) => p,
            Err(e) => return e.into(),
        };
        let display = path.display().to_string();

        let original = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => return ToolError::from_io(display, &e).into(),
        };

        let count = original.matches(input.old.as_str()).count();
        if count == 0 {
            return ToolError::execution_failed(format!("Text to replace not found in {}", display))
                .into();
        }

        if input.old != input.new {
            let updated = original.replace(input.old.as_str(), &input.new);
            if let Err(e) = tokio::fs::write(&path, updated.as_bytes()).await {
                return ToolError::execution_failed(format!("Failed to write {}: {}", display, e))
                    .into();
            }
        }

        let noun = if count == 1 {
            "occurrence"
        } else {
            "occurrences"
        };
        ToolResult::success(format!("Replaced {} {} in {}", count, noun, display))
    }
}
