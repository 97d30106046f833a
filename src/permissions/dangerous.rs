//! Built-in heuristics for catastrophic shell commands.
//!
//! These are not session-editable. A command that trips one of them is denied
//! in every mode, whatever the allowlist says.

use std::sync::LazyLock;

use regex::Regex;

// Argument boundary after a path operand.
const END: &str = r"(\s|;|&|\||\)|$)";
// Shell interpreter, optionally invoked by path.
const SHELL: &str = r"(\S*/)?(ba|z|k|da|fi)?sh";

static DANGEROUS_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let table: Vec<(String, &'static str)> = vec![
        // Recursive delete of root, home, or a top-level system directory
        (format!(r"\brm\s+(-\S+\s+)*/\*?{END}"), "recursive delete of root"),
        (
            format!(r"\brm\s+(-\S+\s+)*(~|\$HOME|\$\{{HOME\}}|/home|/root)/?\*?{END}"),
            "recursive delete of home",
        ),
        (
            format!(
                r"\brm\s+(-\S+\s+)*/(bin|boot|dev|etc|lib|lib64|opt|proc|sbin|srv|sys|usr|var)/?\*?{END}"
            ),
            "recursive delete of system directory",
        ),
        (r"\brm\s+(-\S+\s+)*--no-preserve-root\b".into(), "rm --no-preserve-root"),
        (r"\bfind\s+/\s+.*-delete\b".into(), "find / -delete"),
        (r"\bfind\s+/\s+.*-exec\s+rm\b".into(), "find / -exec rm"),
        // Raw device writes
        (
            r"\bdd\s+.*\bof\s*=\s*/dev/(sd|hd|vd|xvd|nvme|mmcblk|disk)".into(),
            "raw device write",
        ),
        (
            r">\s*/dev/(sd|hd|vd|xvd|nvme|mmcblk|disk)[a-z0-9]*".into(),
            "overwrite block device",
        ),
        (r"\bmkfs(\.[a-z0-9]+)?\s".into(), "mkfs"),
        (r"\bwipefs\b".into(), "wipefs"),
        (r"\bshred\s+.*/dev/".into(), "shred device"),
        // Remote code piped into a shell
        (
            format!(r"\b(curl|wget)\b[^;&]*\|\s*(sudo\s+)?{SHELL}\b"),
            "pipe network fetch to shell",
        ),
        (
            format!(r"\b{SHELL}\s+(-c\s+)?<?\s*\(\s*(curl|wget)\b"),
            "shell process substitution of network fetch",
        ),
        (
            format!(r"\b({SHELL}\s+(-\S+\s+)*-c|eval)\s+.*\$\(\s*(curl|wget)\b"),
            "shell command substitution of network fetch",
        ),
        // Privilege escalation with a destructive verb
        (
            r"\b(sudo|doas)\s+(-\S+\s+(\w+\s+)?)*(rm|dd|mkfs(\.[a-z0-9]+)?|shred|wipefs|fdisk|chmod|chown|mv)\b"
                .into(),
            "privileged destructive command",
        ),
        // Fork bombs
        (
            r":\s*\(\s*\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:".into(),
            "fork bomb",
        ),
        (
            r"\b(\w+)\s*\(\s*\)\s*\{\s*(\w+)\s*\|\s*(\w+)\s*&\s*\}\s*;\s*(\w+)".into(),
            "fork bomb",
        ),
        // Permission wipes on the whole tree
        (
            format!(r"\bchmod\s+(-\S+\s+)*-R\s+(-\S+\s+)*[0-7]*7[0-7]*\s+/{END}"),
            "recursive chmod of root",
        ),
        (
            format!(r"\bchown\s+(-\S+\s+)*-R\s+\S+\s+/{END}"),
            "recursive chown of root",
        ),
    ];

    table
        .into_iter()
        .filter_map(|(pattern, label)| match Regex::new(&pattern) {
            Ok(regex) => Some((regex, label)),
            Err(e) => {
                tracing::error!(pattern = %pattern, error = %e, "Invalid dangerous-command pattern");
                None
            }
        })
        .collect()
});

/// Return the label of the first heuristic the command trips, if any.
///
/// Quote characters are dropped before matching, so `rm -rf "/"` is seen as
/// `rm -rf /`.
pub fn detect_dangerous(command: &str) -> Option<&'static str> {
    let unquoted: String = command
        .chars()
        .filter(|c| !matches!(c, '\'' | '"'))
        .collect();
    DANGEROUS_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(&unquoted))
        .map(|(_, label)| *label)
}

pub fn is_dangerous(command: &str) -> bool {
    detect_dangerous(command).is_some()
}
