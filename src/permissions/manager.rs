//! Session permission manager.
//!
//! Decisions run through a fixed chain of stages; the first conclusive stage
//! wins:
//!
//! 1. denylist
//! 2. dangerous shell command
//! 3. allowlist
//! 4. read-only tool
//! 5. mode fallback

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use super::dangerous::detect_dangerous;
use super::prompt::format_permission_prompt;
use super::rules::{PermissionRule, RuleError};
use super::{
    ApprovalResponse, PermissionLevel, PermissionMode, PermissionRequest, is_read_only_tool,
    is_shell_tool, primary_argument,
};
use crate::tools::resolve_path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DecisionStage {
    Denylist,
    DangerousCommand,
    Allowlist,
    ReadOnly,
    Mode,
}

const DECISION_CHAIN: [DecisionStage; 5] = [
    DecisionStage::Denylist,
    DecisionStage::DangerousCommand,
    DecisionStage::Allowlist,
    DecisionStage::ReadOnly,
    DecisionStage::Mode,
];

#[derive(Debug, Default)]
struct SessionRules {
    allow: Vec<PermissionRule>,
    deny: Vec<PermissionRule>,
}

struct Invocation<'a> {
    tool_name: &'a str,
    input: &'a Value,
    primary_arg: Option<&'a str>,
    // Path the tool will actually touch, when it differs from the raw argument.
    resolved_path: Option<String>,
}

impl<'a> Invocation<'a> {
    fn new(tool_name: &'a str, input: &'a Value) -> Self {
        let primary_arg = primary_argument(tool_name, input);
        let resolved_path = primary_arg
            .filter(|_| !is_shell_tool(tool_name))
            .and_then(|raw| {
                let resolved = resolve_path(raw).ok()?;
                let resolved = resolved.to_string_lossy();
                (resolved != raw).then(|| resolved.into_owned())
            });
        Self {
            tool_name,
            input,
            primary_arg,
            resolved_path,
        }
    }

    // A rule hit on either spelling of the path counts.
    fn matches(&self, rule: &PermissionRule) -> bool {
        rule.matches(self.tool_name, self.primary_arg)
            || self
                .resolved_path
                .as_deref()
                .is_some_and(|path| rule.matches(self.tool_name, Some(path)))
    }
}

/// Per-session policy engine.
///
/// Holds the immutable mode and the two ordered rule lists. One manager is
/// built per session and shared explicitly (e.g. behind an `Arc`).
#[derive(Debug, Default)]
pub struct PermissionManager {
    mode: PermissionMode,
    rules: RwLock<SessionRules>,
}

impl PermissionManager {
    pub fn new(mode: PermissionMode) -> Self {
        Self {
            mode,
            rules: RwLock::new(SessionRules::default()),
        }
    }

    pub fn trusted() -> Self {
        Self::new(PermissionMode::Trust)
    }

    pub fn yolo() -> Self {
        Self::new(PermissionMode::Yolo)
    }

    pub fn mode(&self) -> PermissionMode {
        self.mode
    }

    /// Decide how an invocation of `tool_name` with `tool_input` may proceed.
    pub fn check_permission(&self, tool_name: &str, tool_input: &Value) -> PermissionRequest {
        let invocation = Invocation::new(tool_name, tool_input);

        let (stage, level, reason) = {
            let rules = self.read_rules();
            DECISION_CHAIN
                .iter()
                .find_map(|stage| {
                    self.evaluate(*stage, &invocation, &rules)
                        .map(|(level, reason)| (*stage, level, reason))
                })
                .unwrap_or_else(|| {
                    (
                        DecisionStage::Mode,
                        PermissionLevel::Ask,
                        "No stage reached a decision".to_string(),
                    )
                })
        };

        tracing::debug!(
            tool = tool_name,
            level = %level,
            stage = ?stage,
            mode = %self.mode,
            "Permission decided"
        );

        PermissionRequest::new(tool_name, tool_input.clone(), level).with_reason(reason)
    }

    fn evaluate(
        &self,
        stage: DecisionStage,
        invocation: &Invocation<'_>,
        rules: &SessionRules,
    ) -> Option<(PermissionLevel, String)> {
        let tool = invocation.tool_name;
        match stage {
            DecisionStage::Denylist => rules
                .deny
                .iter()
                .find(|rule| invocation.matches(rule))
                .map(|rule| (PermissionLevel::Deny, format!("Denied by rule: {}", rule))),

            DecisionStage::DangerousCommand => {
                if !is_shell_tool(tool) {
                    return None;
                }
                let command = invocation.input.get("command").and_then(Value::as_str)?;
                let label = detect_dangerous(command)?;
                tracing::warn!(tool, command, pattern = label, "Dangerous command blocked");
                Some((
                    PermissionLevel::Deny,
                    format!("Dangerous command blocked: {}", label),
                ))
            }

            DecisionStage::Allowlist => rules
                .allow
                .iter()
                .find(|rule| invocation.matches(rule))
                .map(|rule| (PermissionLevel::Auto, format!("Allowed by rule: {}", rule))),

            DecisionStage::ReadOnly => is_read_only_tool(tool)
                .then(|| (PermissionLevel::Auto, "Read-only tool".to_string())),

            DecisionStage::Mode => Some(self.mode_fallback(tool)),
        }
    }

    fn mode_fallback(&self, tool: &str) -> (PermissionLevel, String) {
        let shell = is_shell_tool(tool);
        let auto = if shell {
            self.mode.auto_approves_shell()
        } else {
            self.mode.auto_approves_edits()
        };
        let kind = if shell { "shell commands" } else { "file changes" };

        if self.mode.allows_all() {
            (PermissionLevel::Auto, "Yolo mode: auto-approved".to_string())
        } else if auto {
            (
                PermissionLevel::Auto,
                format!("{} mode: {} auto-approved", capitalize(self.mode), kind),
            )
        } else {
            (
                PermissionLevel::Ask,
                format!(
                    "{} mode: {} require confirmation",
                    capitalize(self.mode),
                    kind
                ),
            )
        }
    }

    /// Append a rule to the session allowlist. Duplicates are ignored.
    pub fn add_to_allowlist(&self, rule: &str) -> Result<(), RuleError> {
        let rule = PermissionRule::parse(rule)?;
        self.allow_rule(rule);
        Ok(())
    }

    /// Append a rule to the session denylist. Duplicates are ignored.
    pub fn add_to_denylist(&self, rule: &str) -> Result<(), RuleError> {
        let rule = PermissionRule::parse(rule)?;
        self.deny_rule(rule);
        Ok(())
    }

    pub fn allow_rule(&self, rule: PermissionRule) {
        let mut rules = self.write_rules();
        if !rules.allow.contains(&rule) {
            tracing::debug!(rule = %rule, "Added to allowlist");
            rules.allow.push(rule);
        }
    }

    pub fn deny_rule(&self, rule: PermissionRule) {
        let mut rules = self.write_rules();
        if !rules.deny.contains(&rule) {
            tracing::debug!(rule = %rule, "Added to denylist");
            rules.deny.push(rule);
        }
    }

    pub fn allowlist(&self) -> Vec<String> {
        self.read_rules().allow.iter().map(ToString::to_string).collect()
    }

    pub fn denylist(&self) -> Vec<String> {
        self.read_rules().deny.iter().map(ToString::to_string).collect()
    }

    pub fn format_permission_prompt(&self, request: &PermissionRequest) -> String {
        format_permission_prompt(request)
    }

    /// Record the answer to an ASK prompt and report whether the call may run.
    ///
    /// "Always" answers install a rule derived from the request. A denied
    /// request stays denied, and an allow rule is never derived from a command
    /// that trips the dangerous floor.
    pub fn apply_response(&self, request: &PermissionRequest, response: ApprovalResponse) -> bool {
        if request.is_denied() {
            return false;
        }
        if !response.is_persistent() {
            return response.is_allowed();
        }
        let Some(rule) = derive_rule(request) else {
            return response.is_allowed();
        };

        if response.is_allowed() {
            let dangerous = is_shell_tool(request.tool_name())
                && request
                    .input_str("command")
                    .and_then(detect_dangerous)
                    .is_some();
            if dangerous {
                tracing::warn!(
                    tool = request.tool_name(),
                    "Refusing to allowlist a dangerous command"
                );
                return false;
            }
            self.allow_rule(rule);
        } else {
            self.deny_rule(rule);
        }
        response.is_allowed()
    }

    // Rule lists stay structurally valid even if a writer panicked.
    fn read_rules(&self) -> RwLockReadGuard<'_, SessionRules> {
        self.rules.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_rules(&self) -> RwLockWriteGuard<'_, SessionRules> {
        self.rules.write().unwrap_or_else(|e| e.into_inner())
    }
}

// Shell calls without a program yield no rule; a bare shell rule would cover every command.
fn derive_rule(request: &PermissionRequest) -> Option<PermissionRule> {
    let tool = request.tool_name();
    let primary = primary_argument(tool, request.tool_input());
    if is_shell_tool(tool) {
        let program = primary?.split_whitespace().next()?;
        return Some(PermissionRule::prefix(tool, program));
    }
    Some(match primary {
        Some(path) if !path.is_empty() => PermissionRule::exact(tool, path),
        _ => PermissionRule::tool(tool),
    })
}

fn capitalize(mode: PermissionMode) -> String {
    let name = mode.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}
