//! glob - file name pattern matching.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::{SchemaTool, resolve_path};
use crate::types::{ToolError, ToolResult};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GlobInput {
    /// Glob pattern, e.g. "*.py" or "**/*.rs". `**` spans any number of directories.
    pub pattern: String,
    /// Directory to search in. Defaults to the current directory.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlobTool;

#[async_trait]
impl SchemaTool for GlobTool {
    type Input = GlobInput;

    const NAME: &'static str = "glob";
    const DESCRIPTION: &'static str = "Find paths under a directory whose names match a glob pattern. \
        Supports `*` within one path component and `**` for any directory depth. \
        Matches are listed one per line in sorted order.";

    async fn handle(&self, input: GlobInput) -> ToolResult {
        if let Err(e) = check_scope(&input.pattern) {
            return e.into();
        }

        let base = match resolve_path(input.path.as_deref().unwrap_or(".")) {
            Ok(p) => p,
            Err(e) => return e.into(),
        };

        match tokio::fs::metadata(&base).await {
            Ok(meta) if !meta.is_dir() => {
                return ToolError::execution_failed(format!(
                    "{} is not a directory",
                    base.display()
                ))
                .into();
            }
            Ok(_) => {}
            Err(e) => return ToolError::from_io(base.display().to_string(), &e).into(),
        }

        let full_pattern = full_pattern(&base, &input.pattern);
        let glob_result = tokio::task::spawn_blocking(move || {
            glob::glob(&full_pattern).map(|paths| {
                let mut matches: Vec<PathBuf> = paths.filter_map(|r| r.ok()).collect();
                matches.sort();
                matches
            })
        })
        .await;

        let matches = match glob_result {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => return ToolError::invalid_pattern(e.to_string()).into(),
            Err(e) => return ToolError::execution_failed(format!("Glob task failed: {}", e)).into(),
        };

        if matches.is_empty() {
            return ToolResult::success("No files matched the pattern");
        }

        let output: Vec<String> = matches.iter().map(|p| p.display().to_string()).collect();
        ToolResult::success(output.join("\n"))
    }
}

// Matches must stay under the search directory.
fn check_scope(pattern: &str) -> Result<(), ToolError> {
    let path = Path::new(pattern);
    if path.has_root() {
        return Err(ToolError::invalid_pattern(format!(
            "pattern must be relative to the search directory: {}",
            pattern
        )));
    }
    if path.components().any(|c| c == Component::ParentDir) {
        return Err(ToolError::invalid_pattern(format!(
            "pattern must not leave the search directory: {}",
            pattern
        )));
    }
    Ok(())
}

// Metacharacters in the base directory must match literally.
fn full_pattern(base: &Path, pattern: &str) -> String {
    let escaped = glob::Pattern::escape(&base.to_string_lossy());
    let pattern = pattern.trim_start_matches("./");
    if escaped.ends_with(std::path::MAIN_SEPARATOR) {
        format!("{}{}", escaped, pattern)
    } else {
        format!("{}{}{}", escaped, std::path::MAIN_SEPARATOR, pattern)
    }
}
