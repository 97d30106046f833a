//! Tool execution results.

use serde::{Deserialize, Serialize};

use super::error::ToolError;

/// Outcome of a tool invocation.
///
/// `output` carries the payload on success and a human-readable diagnostic on
/// failure. There is no partial-success state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
}

impl ToolResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        !self.success
    }

    pub fn text(&self) -> &str {
        &self.output
    }
}

impl From<ToolError> for ToolResult {
    fn from(error: ToolError) -> Self {
        Self::error(error.to_string())
    }
}

impl<T, E> From<Result<T, E>> for ToolResult
where
    T: Into<String>,
    E: Into<ToolError>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(output) => Self::success(output),
            Err(e) => Self::from(e.into()),
        }
    }
}
