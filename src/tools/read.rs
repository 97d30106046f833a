//! read_file - returns file contents.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{SchemaTool, resolve_path};
use crate::types::{ToolError, ToolResult};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileInput {
    /// Path of the file to read. Relative paths resolve against the current directory.
    pub path: String,
    /// First line to return (0-indexed).
    #[serde(default)]
    pub offset: Option<usize>,
    /// Maximum number of lines to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadFileTool;

#[async_trait]
impl SchemaTool for ReadFileTool {
    type Input = ReadFileInput;

    const NAME: &'static str = "read_file";
    const DESCRIPTION: &'static str = "Read a file and return its contents. \
        Optionally pass offset (0-indexed line) and limit (line count) to read a window of lines.";

    async fn handle(&self, input: ReadFileInput) -> ToolResult {
        let path = match resolve_path(&input.path) {
            Ok(p) => p,
            Err(e) => return e.into(),
        };
        let display = path.display().to_string();

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => {
                return ToolError::execution_failed(format!("{} is a directory", display)).into();
            }
            Ok(_) => {}
            Err(e) => return ToolError::from_io(display, &e).into(),
        }

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => return ToolError::from_io(display, &e).into(),
        };

        if input.offset.is_none() && input.limit.is_none() {
            return ToolResult::success(content);
        }

        let offset = input.offset.unwrap_or(0);
        let window: Vec<&str> = content
            .lines()
            .skip(offset)
            .take(input.limit.unwrap_or(usize::MAX))
            .collect();
        ToolResult::success(window.join("\n"))
    }
}
