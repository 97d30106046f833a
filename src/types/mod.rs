//! Core types shared by the tool layer.

mod tool;

pub use tool::{ToolDefinition, ToolError, ToolResult};
