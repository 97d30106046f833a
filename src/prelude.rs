//! Prelude module for convenient imports.
//!
//! ```rust
//! use deepseek_code::prelude::*;
//! ```

pub use crate::Error;
pub use crate::Result;

pub use crate::permissions::{
    ApprovalResponse, PermissionLevel, PermissionManager, PermissionMode, PermissionRequest,
    PermissionRule,
};
pub use crate::tools::{Approver, SchemaTool, Tool, ToolExecutor, ToolRegistry};
pub use crate::types::{ToolError, ToolResult};
