//! Permission-gated tool execution.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::ToolRegistry;
use crate::permissions::{ApprovalResponse, PermissionLevel, PermissionManager, PermissionRequest};
use crate::types::{ToolError, ToolResult};

/// Resolves [`PermissionLevel::Ask`] decisions out of band.
#[async_trait]
pub trait Approver: Send + Sync {
    /// `prompt` is the rendered confirmation text for `request`.
    async fn approve(&self, request: &PermissionRequest, prompt: &str) -> ApprovalResponse;
}

/// Approves every request once.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl Approver for AutoApprove {
    async fn approve(&self, _request: &PermissionRequest, _prompt: &str) -> ApprovalResponse {
        ApprovalResponse::AllowOnce
    }
}

/// Refuses every request once.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDeny;

#[async_trait]
impl Approver for AutoDeny {
    async fn approve(&self, _request: &PermissionRequest, _prompt: &str) -> ApprovalResponse {
        ApprovalResponse::DenyOnce
    }
}

/// Runs tools only after the permission manager allows them.
///
/// A denied call never reaches the tool.
pub struct ToolExecutor {
    registry: ToolRegistry,
    permissions: Arc<PermissionManager>,
    approver: Arc<dyn Approver>,
}

impl ToolExecutor {
    pub fn new(
        registry: ToolRegistry,
        permissions: Arc<PermissionManager>,
        approver: Arc<dyn Approver>,
    ) -> Self {
        Self {
            registry,
            permissions,
            approver,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn permissions(&self) -> &Arc<PermissionManager> {
        &self.permissions
    }

    pub async fn execute(&self, tool_name: &str, input: Value) -> ToolResult {
        let Some(tool) = self.registry.get(tool_name) else {
            return ToolError::unknown_tool(tool_name).into();
        };

        let request = self.permissions.check_permission(tool_name, &input);
        match request.level() {
            PermissionLevel::Deny => {
                return ToolResult::error(format!(
                    "Permission denied for {}: {}",
                    tool_name,
                    request.reason()
                ));
            }
            PermissionLevel::Ask => {
                let prompt = self.permissions.format_permission_prompt(&request);
                let response = self.approver.approve(&request, &prompt).await;
                if !self.permissions.apply_response(&request, response) {
                    tracing::debug!(tool = tool_name, ?response, "Tool call declined");
                    return ToolResult::error(format!("User declined {}", tool_name));
                }
            }
            PermissionLevel::Auto => {}
        }

        tool.execute(input).await
    }
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("registry", &self.registry)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}
