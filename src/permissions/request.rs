//! Authorization decision records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome tier of a permission check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Execute without confirmation.
    Auto,
    /// Confirm out of band before executing.
    Ask,
    /// Never execute.
    Deny,
}

impl PermissionLevel {
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    pub fn is_ask(&self) -> bool {
        matches!(self, Self::Ask)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Ask => write!(f, "ask"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

/// A resolved permission check for one tool invocation.
///
/// Produced fresh by [`PermissionManager::check_permission`] and never
/// mutated afterwards.
///
/// [`PermissionManager::check_permission`]: super::PermissionManager::check_permission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PermissionRequest {
    tool_name: String,
    tool_input: Value,
    level: PermissionLevel,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    reason: String,
}

impl PermissionRequest {
    pub fn new(tool_name: impl Into<String>, tool_input: Value, level: PermissionLevel) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_input,
            level,
            reason: String::new(),
        }
    }

    pub(crate) fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_input(&self) -> &Value {
        &self.tool_input
    }

    pub fn level(&self) -> PermissionLevel {
        self.level
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_auto(&self) -> bool {
        self.level.is_auto()
    }

    pub fn is_ask(&self) -> bool {
        self.level.is_ask()
    }

    pub fn is_denied(&self) -> bool {
        self.level.is_deny()
    }

    /// Read a string field of the tool input.
    pub fn input_str(&self, field: &str) -> Option<&str> {
        self.tool_input.get(field).and_then(Value::as_str)
    }
}

/// Answer to an [`PermissionLevel::Ask`] prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalResponse {
    /// Run this invocation only.
    AllowOnce,
    /// Run it and allowlist matching invocations for the rest of the session.
    AllowAlways,
    /// Refuse this invocation only.
    DenyOnce,
    /// Refuse it and denylist matching invocations for the rest of the session.
    DenyAlways,
}

impl ApprovalResponse {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::AllowOnce | Self::AllowAlways)
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::AllowAlways | Self::DenyAlways)
    }
}
