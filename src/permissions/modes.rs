//! Session permission modes.

use serde::{Deserialize, Serialize};

/// Permission mode that determines the fallback behavior for tool execution.
///
/// The mode is fixed when a session starts. It only matters for invocations
/// that no session rule, dangerous-command heuristic or read-only
/// classification has already decided.
///
/// # Modes
///
/// - **Default**: mutating file tools and every shell command need confirmation.
///
/// - **Trust**: mutating file tools and non-dangerous shell commands run
///   without confirmation.
///
/// - **Yolo**: everything that survives the deny stages runs without
///   confirmation. Dangerous shell commands are still denied.
///
/// # Example
///
/// ```rust
/// use deepseek_code::permissions::PermissionMode;
///
/// let mode = PermissionMode::from_flags(true, false);
/// assert_eq!(mode, PermissionMode::Trust);
/// assert!(mode.auto_approves_edits());
/// assert!(!mode.allows_all());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionMode {
    /// Ask before mutating files or running shell commands.
    #[default]
    Default,

    /// Auto-approve file mutations and shell commands that pass the
    /// dangerous-command floor.
    Trust,

    /// Auto-approve every remaining invocation.
    ///
    /// ⚠️ Only the denylist and the dangerous-command floor still apply.
    Yolo,
}

impl PermissionMode {
    /// Resolve the legacy `trust` / `yolo` flag pair. Yolo wins when both are set.
    pub fn from_flags(trust: bool, yolo: bool) -> Self {
        match (trust, yolo) {
            (_, true) => PermissionMode::Yolo,
            (true, false) => PermissionMode::Trust,
            (false, false) => PermissionMode::Default,
        }
    }

    pub fn allows_all(&self) -> bool {
        matches!(self, PermissionMode::Yolo)
    }

    pub fn auto_approves_edits(&self) -> bool {
        matches!(self, PermissionMode::Trust | PermissionMode::Yolo)
    }

    pub fn auto_approves_shell(&self) -> bool {
        matches!(self, PermissionMode::Trust | PermissionMode::Yolo)
    }

    pub fn is_default(&self) -> bool {
        matches!(self, PermissionMode::Default)
    }

    pub fn description(&self) -> &'static str {
        match self {
            PermissionMode::Default => "Ask before file changes and shell commands",
            PermissionMode::Trust => "Auto-approve file changes and safe shell commands",
            PermissionMode::Yolo => "Auto-approve everything except dangerous commands",
        }
    }
}

impl std::fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionMode::Default => write!(f, "default"),
            PermissionMode::Trust => write!(f, "trust"),
            PermissionMode::Yolo => write!(f, "yolo"),
        }
    }
}

impl std::str::FromStr for PermissionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "ask" => Ok(PermissionMode::Default),
            "trust" | "trusted" | "accept-edits" | "accept_edits" | "acceptedits" => {
                Ok(PermissionMode::Trust)
            }
            "yolo" | "bypass" | "bypass-permissions" | "bypass_permissions" => {
                Ok(PermissionMode::Yolo)
            }
            _ => Err(format!("Unknown permission mode: {}", s)),
        }
    }
}
