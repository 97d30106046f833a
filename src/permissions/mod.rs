//! Permission system for controlling tool execution.

mod dangerous;
mod manager;
mod modes;
mod prompt;
mod request;
mod rules;

use serde_json::Value;

pub use dangerous::{detect_dangerous, is_dangerous};
pub use manager::PermissionManager;
pub use modes::PermissionMode;
pub use prompt::format_permission_prompt;
pub use request::{ApprovalResponse, PermissionLevel, PermissionRequest};
pub use rules::{ArgPattern, PermissionRule, RuleError, matches_rule};

pub const READ_ONLY_TOOLS: &[&str] = &["read_file", "glob", "grep"];
pub const MUTATING_FILE_TOOLS: &[&str] = &["write_file", "edit_file"];
pub const SHELL_TOOLS: &[&str] = &["bash"];

pub fn is_read_only_tool(tool_name: &str) -> bool {
    READ_ONLY_TOOLS.contains(&tool_name)
}

pub fn is_mutating_file_tool(tool_name: &str) -> bool {
    MUTATING_FILE_TOOLS.contains(&tool_name)
}

pub fn is_shell_tool(tool_name: &str) -> bool {
    SHELL_TOOLS.contains(&tool_name)
}

/// The input field rules are matched against: `command` for shell tools,
/// `path` for everything else. Missing or non-string fields yield `None`.
pub fn primary_argument<'a>(tool_name: &str, input: &'a Value) -> Option<&'a str> {
    let field = if is_shell_tool(tool_name) {
        "command"
    } else {
        "path"
    };
    input.get(field).and_then(Value::as_str)
}
