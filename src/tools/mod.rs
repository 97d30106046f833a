//! Built-in tools and the registry that serves them.

mod edit;
mod executor;
mod glob;
mod grep;
mod read;
mod registry;
mod traits;
mod write;

use std::path::{Path, PathBuf};

pub use edit::{EditFileInput, EditFileTool};
pub use executor::{Approver, AutoApprove, AutoDeny, ToolExecutor};
pub use glob::{GlobInput, GlobTool};
pub use grep::{GrepInput, GrepTool};
pub use read::{ReadFileInput, ReadFileTool};
pub use registry::ToolRegistry;
pub use traits::{SchemaTool, Tool};
pub use write::{WriteFileInput, WriteFileTool};

use crate::types::ToolError;

/// Resolve a tool path: `~/` expands to the home directory and relative paths
/// join the process working directory.
pub(crate) fn resolve_path(raw: &str) -> Result<PathBuf, ToolError> {
    if raw.trim().is_empty() {
        return Err(ToolError::invalid_input("path must not be empty"));
    }

    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(dirs) = directories::BaseDirs::new()
    {
        return Ok(dirs.home_dir().join(rest));
    }

    let path = Path::new(raw);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|e| ToolError::execution_failed(format!("Cannot resolve {}: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute() {
        let abs = std::env::temp_dir().join("x.txt");
        assert_eq!(resolve_path(abs.to_str().unwrap()).unwrap(), abs);
    }

    #[test]
    fn test_resolve_relative() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_path("src/lib.rs").unwrap(), cwd.join("src/lib.rs"));
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(
            resolve_path("  "),
            Err(ToolError::InvalidInput { .. })
        ));
    }
}
