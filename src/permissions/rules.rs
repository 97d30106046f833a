//! Session rule grammar and matching.
//!
//! Rules take one of three forms:
//!
//! - `tool` matches every invocation of `tool`
//! - `tool(prefix:*)` matches when the primary argument starts with `prefix`
//! - `tool(value)` matches when the primary argument equals `value`
//!
//! For shell tools the comparison is token-wise on whitespace-delimited words,
//! so `bash(git:*)` matches `git status` but not `gitk`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{is_shell_tool, primary_argument};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("empty permission rule")]
    Empty,

    #[error("invalid tool name in rule '{rule}'")]
    InvalidToolName { rule: String },

    #[error("unbalanced parentheses in rule '{rule}'")]
    Unbalanced { rule: String },

    #[error("empty argument pattern in rule '{rule}'")]
    EmptyArgument { rule: String },
}

/// Argument constraint of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgPattern {
    Any,
    Prefix(String),
    Exact(String),
}

/// A parsed session rule.
///
/// Parsing happens once when the rule is added; matching works on the parsed
/// form and never allocates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionRule {
    tool: String,
    pattern: ArgPattern,
}

impl PermissionRule {
    pub fn tool(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            pattern: ArgPattern::Any,
        }
    }

    pub fn prefix(tool: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            pattern: ArgPattern::Prefix(prefix.into()),
        }
    }

    pub fn exact(tool: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            pattern: ArgPattern::Exact(value.into()),
        }
    }

    pub fn parse(rule: &str) -> Result<Self, RuleError> {
        let rule = rule.trim();
        if rule.is_empty() {
            return Err(RuleError::Empty);
        }

        let Some(open) = rule.find('(') else {
            if rule.contains(')') {
                return Err(RuleError::Unbalanced { rule: rule.into() });
            }
            return Self::validated_tool(rule, rule).map(Self::tool);
        };

        let Some(inner) = rule[open + 1..].strip_suffix(')') else {
            return Err(RuleError::Unbalanced { rule: rule.into() });
        };
        let tool = Self::validated_tool(rule[..open].trim_end(), rule)?;

        if inner.is_empty() {
            return Err(RuleError::EmptyArgument { rule: rule.into() });
        }

        Ok(match inner.strip_suffix(":*") {
            Some(prefix) => Self::prefix(tool, prefix),
            None => Self::exact(tool, inner),
        })
    }

    fn validated_tool<'a>(tool: &'a str, rule: &str) -> Result<&'a str, RuleError> {
        let valid = !tool.is_empty()
            && !tool
                .chars()
                .any(|c| c.is_whitespace() || c == '(' || c == ')');
        if valid {
            Ok(tool)
        } else {
            Err(RuleError::InvalidToolName { rule: rule.into() })
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool
    }

    pub fn pattern(&self) -> &ArgPattern {
        &self.pattern
    }

    /// Match against a tool name and its primary argument, if it has one.
    ///
    /// Bare rules ignore the argument; argument rules never match an
    /// invocation without one.
    pub fn matches(&self, tool_name: &str, primary_arg: Option<&str>) -> bool {
        if self.tool != tool_name {
            return false;
        }

        let shell = is_shell_tool(tool_name);
        match (&self.pattern, primary_arg) {
            (ArgPattern::Any, _) => true,
            (_, None) => false,
            (ArgPattern::Prefix(prefix), Some(arg)) if shell => {
                let mut words = arg.split_whitespace();
                prefix.split_whitespace().all(|p| words.next() == Some(p))
            }
            (ArgPattern::Prefix(prefix), Some(arg)) => arg.starts_with(prefix.as_str()),
            (ArgPattern::Exact(value), Some(arg)) if shell => {
                arg.split_whitespace().eq(value.split_whitespace())
            }
            (ArgPattern::Exact(value), Some(arg)) => arg == value,
        }
    }

    pub fn matches_input(&self, tool_name: &str, input: &Value) -> bool {
        self.matches(tool_name, primary_argument(tool_name, input))
    }
}

impl fmt::Display for PermissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            ArgPattern::Any => write!(f, "{}", self.tool),
            ArgPattern::Prefix(prefix) => write!(f, "{}({}:*)", self.tool, prefix),
            ArgPattern::Exact(value) => write!(f, "{}({})", self.tool, value),
        }
    }
}

impl std::str::FromStr for PermissionRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PermissionRule {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PermissionRule> for String {
    fn from(rule: PermissionRule) -> Self {
        rule.to_string()
    }
}

/// Evaluate an unparsed rule string. A rule that fails to parse matches nothing.
pub fn matches_rule(rule: &str, tool_name: &str, primary_arg: &str) -> bool {
    PermissionRule::parse(rule)
        .map(|r| r.matches(tool_name, Some(primary_arg)))
        .unwrap_or(false)
}
