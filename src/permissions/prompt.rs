//! Confirmation prompt rendering.

use serde_json::Value;

use super::{PermissionRequest, is_read_only_tool, is_shell_tool};

const PREVIEW_LIMIT: usize = 400;

/// Render a request for a human or agent confirmation step.
///
/// The command of a shell tool and the path of a file tool are embedded
/// verbatim. Input missing the expected field falls back to a generic
/// description instead of failing.
pub fn format_permission_prompt(request: &PermissionRequest) -> String {
    let tool = request.tool_name();

    let body = if is_shell_tool(tool) {
        request
            .input_str("command")
            .map(|command| format!("Run shell command?\n\n  $ {}", command))
    } else {
        match (tool, request.input_str("path")) {
            ("write_file", Some(path)) => Some(write_prompt(request, path)),
            ("edit_file", Some(path)) => Some(edit_prompt(request, path)),
            (_, Some(path)) if is_read_only_tool(tool) => {
                Some(format!("Allow {} on:\n\n  {}", tool, path))
            }
            (_, Some(path)) => Some(format!("Allow {} on path:\n\n  {}", tool, path)),
            (_, None) => None,
        }
    };

    let body = body.unwrap_or_else(|| generic_prompt(tool, request.tool_input()));
    if request.reason().is_empty() {
        body
    } else {
        format!("{}\n\n({})", body, request.reason())
    }
}

fn write_prompt(request: &PermissionRequest, path: &str) -> String {
    match request.input_str("content") {
        Some(content) => format!(
            "Write file?\n\n  {}\n\n{} bytes:\n{}",
            path,
            content.len(),
            preview(content)
        ),
        None => format!("Write file?\n\n  {}", path),
    }
}

fn edit_prompt(request: &PermissionRequest, path: &str) -> String {
    match (request.input_str("old"), request.input_str("new")) {
        (Some(old), Some(new)) => format!(
            "Edit file?\n\n  {}\n\n- {}\n+ {}",
            path,
            preview(old),
            preview(new)
        ),
        _ => format!("Edit file?\n\n  {}", path),
    }
}

fn generic_prompt(tool: &str, input: &Value) -> String {
    match input {
        Value::Object(map) if !map.is_empty() => {
            let mut fields: Vec<String> = map
                .iter()
                .map(|(key, value)| match value {
                    Value::String(s) => format!("  {}: {}", key, preview(s)),
                    other => format!("  {}: {}", key, other),
                })
                .collect();
            fields.sort();
            format!("Allow tool '{}'?\n\n{}", tool, fields.join("\n"))
        }
        _ => format!("Allow tool '{}'?", tool),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_LIMIT {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_LIMIT).collect();
    format!("{}... [truncated]", cut)
}
