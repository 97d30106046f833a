//! write_file - creates or overwrites a file.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{SchemaTool, resolve_path};
use crate::types::{ToolError, ToolResult};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteFileInput {
    /// Path of the file to write.
    pub path: String,
    /// Exact content to write.
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteFileTool;

#[async_trait]
impl SchemaTool for WriteFileTool {
    type Input = WriteFileInput;

    const NAME: &'static str = "write_file";
    const DESCRIPTION: &'static str = "Create a file or overwrite it with exactly the given content. \
        The parent directory must already exist.";

    async fn handle(&self, input: WriteFileInput) -> ToolResult {
        let path = match resolve_path(&input.path) {
            Ok(p) => p,
            Err(e) => return e.into(),
        };
        let display = path.display().to_string();

        // Parent directories are never created implicitly.
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && !tokio::fs::try_exists(parent).await.unwrap_or(false)
        {
            return ToolError::execution_failed(format!(
                "Parent directory does not exist: {}",
                parent.display()
            ))
            .into();
        }

        tokio::fs::write(&path, input.content.as_bytes())
            .await
            .map(|()| {
                format!(
                    "Successfully wrote {} bytes to {}",
                    input.content.len(),
                    display
                )
            })
            .map_err(|e| ToolError::execution_failed(format!("Failed to write {}: {}", display, e)))
            .into()
    }
}
