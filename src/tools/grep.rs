//! grep - regex content search over a directory tree.

use std::path::Path;

use async_trait::async_trait;
use ignore::WalkBuilder;
use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{SchemaTool, resolve_path};
use crate::types::{ToolError, ToolResult};

const MAX_RESULTS: usize = 500;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GrepInput {
    /// Regular expression to search for.
    pub pattern: String,
    /// File or directory to search. Defaults to the current directory.
    #[serde(default)]
    pub path: Option<String>,
    /// Only search files whose name matches this glob, e.g. "*.py".
    #[serde(default)]
    pub glob: Option<String>,
    /// Match case-insensitively.
    #[serde(default)]
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GrepTool;

#[async_trait]
impl SchemaTool for GrepTool {
    type Input = GrepInput;

    const NAME: &'static str = "grep";
    const DESCRIPTION: &'static str = "Search file contents for a regular expression. \
        Returns matching lines as `file:line: text`. Hidden, ignored and binary files are skipped.";

    async fn handle(&self, input: GrepInput) -> ToolResult {
        let regex = match RegexBuilder::new(&input.pattern)
            .case_insensitive(input.case_insensitive)
            .build()
        {
            Ok(r) => r,
            Err(e) => return ToolError::invalid_pattern(e.to_string()).into(),
        };

        let file_glob = match input.glob.as_deref().map(glob::Pattern::new).transpose() {
            Ok(g) => g,
            Err(e) => {
                return ToolError::invalid_pattern(format!("file glob: {}", e)).into();
            }
        };

        let root = match resolve_path(input.path.as_deref().unwrap_or(".")) {
            Ok(p) => p,
            Err(e) => return e.into(),
        };
        if let Err(e) = tokio::fs::metadata(&root).await {
            return ToolError::from_io(root.display().to_string(), &e).into();
        }

        let outcome =
            tokio::task::spawn_blocking(move || search(&root, &regex, file_glob.as_ref())).await;

        let (lines, truncated) = match outcome {
            Ok(found) => found,
            Err(e) => return ToolError::execution_failed(format!("Search task failed: {}", e)).into(),
        };

        if lines.is_empty() {
            return ToolResult::success(format!("No matches found for pattern '{}'", input.pattern));
        }

        let mut output = lines.join("\n");
        if truncated {
            output.push_str(&format!(
                "\n\n[Results truncated at {} matches]",
                MAX_RESULTS
            ));
        }
        ToolResult::success(output)
    }
}

fn search(root: &Path, regex: &Regex, file_glob: Option<&glob::Pattern>) -> (Vec<String>, bool) {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut lines = Vec::new();
    for entry in walker {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if let Some(pattern) = file_glob
            && !entry
                .file_name()
                .to_str()
                .is_some_and(|name| pattern.matches(name))
        {
            continue;
        }

        let path = entry.path();
        let Some(content) = read_text(path) else {
            continue;
        };

        for (idx, line) in content.lines().enumerate() {
            if !regex.is_match(line) {
                continue;
            }
            if lines.len() >= MAX_RESULTS {
                return (lines, true);
            }
            lines.push(format!("{}:{}: {}", path.display(), idx + 1, line));
        }
    }
    (lines, false)
}

// Unreadable and binary files yield None and are skipped.
fn read_text(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable file");
            return None;
        }
    };
    if bytes.contains(&0) {
        return None;
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
