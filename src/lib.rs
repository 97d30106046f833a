//! # deepseek-code
//!
//! Authorization and tool mediation for a coding agent.
//!
//! Every side-effecting tool call goes through a [`PermissionManager`], which
//! decides whether it runs automatically, needs confirmation, or is refused.
//! Permitted calls are served by the built-in tools of a [`ToolRegistry`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepseek_code::{PermissionManager, PermissionMode, ToolRegistry};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), deepseek_code::Error> {
//!     let permissions = PermissionManager::new(PermissionMode::Default);
//!     permissions.add_to_allowlist("bash(git:*)")?;
//!
//!     let input = json!({"path": "src/main.rs"});
//!     let request = permissions.check_permission("read_file", &input);
//!     assert!(request.is_auto());
//!
//!     let registry = ToolRegistry::new();
//!     let result = registry.execute("read_file", input).await;
//!     println!("{}", result.output);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod permissions;
pub mod prelude;
pub mod tools;
pub mod types;

pub use config::{ConfigError, PermissionSettings, Settings, SettingsLoader};
pub use permissions::{
    ApprovalResponse, PermissionLevel, PermissionManager, PermissionMode, PermissionRequest,
    PermissionRule, RuleError,
};
pub use tools::{
    Approver, AutoApprove, AutoDeny, SchemaTool, Tool, ToolExecutor, ToolRegistry,
};
pub use types::{ToolDefinition, ToolError, ToolResult};

/// Error type for deepseek-code operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A permission rule failed to parse.
    #[error("Invalid permission rule: {0}")]
    Rule(#[from] RuleError),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tool execution failed.
    #[error("Tool execution failed: {0}")]
    Tool(#[from] ToolError),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Operation blocked by permission policy.
    #[error("Permission denied: {0}")]
    Permission(String),
}

impl Error {
    /// Build a denial error from a decided request.
    pub fn permission_denied(request: &PermissionRequest) -> Self {
        Error::Permission(format!("{}: {}", request.tool_name(), request.reason()))
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Error::Permission(_))
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Rule(_))
    }
}

/// Result type for deepseek-code operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: Error = RuleError::Empty.into();
        assert!(err.is_configuration_error());
        assert_eq!(err.to_string(), "Invalid permission rule: empty permission rule");

        let err: Error = ToolError::unknown_tool("deploy").into();
        assert!(err.to_string().contains("Unknown tool: deploy"));
    }

    #[test]
    fn test_permission_denied() {
        let manager = PermissionManager::default();
        let request = manager.check_permission("bash", &serde_json::json!({"command": "rm -rf /"}));
        let err = Error::permission_denied(&request);
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("bash: Dangerous command blocked"));
    }
}
