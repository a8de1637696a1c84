// SPDX-License-Identifier: MIT OR Apache-2.0
//! The flat pattern library: every regex rule the scanner and the
//! reference detector run against skill content.

use kithkit_core::FindingSeverity;
use regex::Regex;
use std::sync::OnceLock;

/// Which family a rule belongs to. Mirrors the three families spec'd for
/// the pattern library; the detector reuses these to compute per-family
/// hit counts for confidence scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleFamily {
    /// Attempts to override or hide instructions from the host agent.
    PromptInjection,
    /// Reads, exfiltrates, or requests access to secrets.
    CredentialAccess,
    /// Sends local data to a network destination, or escalates privilege.
    Exfiltration,
}

/// One rule in the pattern library.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    /// Stable identifier, e.g. `"prompt-injection/ignore-previous"`.
    pub id: &'static str,
    /// Rules that target the same underlying behavior share a `base_id`
    /// across their single-line and multi-line variants, so a multi-line
    /// hit can be suppressed when a single-line hit on the same file
    /// already reported it.
    pub base_id: &'static str,
    /// Family this rule belongs to.
    pub family: RuleFamily,
    /// Human-readable description, used in the finding message.
    pub description: &'static str,
    /// Regex source. Matched case-insensitively.
    pub pattern: &'static str,
    /// Severity if this rule fires.
    pub severity: FindingSeverity,
    /// `true` if this rule runs against the whole-file,
    /// whitespace-normalized content; `false` if it runs per-line.
    pub multiline: bool,
}

macro_rules! rule {
    ($id:expr, $family:expr, $desc:expr, $pattern:expr, $severity:expr, $multiline:expr) => {
        PatternRule {
            id: $id,
            base_id: $id,
            family: $family,
            description: $desc,
            pattern: $pattern,
            severity: $severity,
            multiline: $multiline,
        }
    };
}

/// The full, fixed rule set.
#[must_use]
pub fn pattern_library() -> &'static [PatternRule] {
    static RULES: &[PatternRule] = &[
        // --- prompt-injection ---
        rule!(
            "prompt-injection/ignore-previous",
            RuleFamily::PromptInjection,
            "instructs the model to discard its prior instructions",
            r"ignore (all |any )?(previous|prior|above) instructions",
            FindingSeverity::Error,
            false
        ),
        rule!(
            "prompt-injection/disregard-system",
            RuleFamily::PromptInjection,
            "instructs the model to disregard its system prompt",
            r"disregard (the |your )?(system prompt|instructions|rules)",
            FindingSeverity::Error,
            false
        ),
        rule!(
            "prompt-injection/new-instructions",
            RuleFamily::PromptInjection,
            "declares new instructions that supersede the host agent's",
            r"(your |the )?new instructions are",
            FindingSeverity::Warning,
            false
        ),
        rule!(
            "prompt-injection/do-not-tell",
            RuleFamily::PromptInjection,
            "asks the model to hide its actions from the user",
            r"do not (tell|inform|mention|disclose) (the |to the )?user",
            FindingSeverity::Error,
            false
        ),
        rule!(
            "prompt-injection/pretend-role",
            RuleFamily::PromptInjection,
            "asks the model to assume an unrestricted persona",
            r"pretend (you are|to be) (an? )?(unrestricted|jailbroken|dan)",
            FindingSeverity::Error,
            false
        ),
        // --- credential-access ---
        rule!(
            "credential-access/read-env-secret",
            RuleFamily::CredentialAccess,
            "reads an environment variable that looks like a secret",
            r#"(env|environ)\w*\[['"]?(api[_-]?key|secret|token|password)"#,
            FindingSeverity::Error,
            false
        ),
        rule!(
            "credential-access/ssh-key-path",
            RuleFamily::CredentialAccess,
            "references a private SSH key file",
            r"\.ssh/id_(rsa|ed25519|ecdsa)",
            FindingSeverity::Error,
            false
        ),
        rule!(
            "credential-access/keychain",
            RuleFamily::CredentialAccess,
            "references the OS credential store",
            r"(keychain|credential manager|wincred)\b",
            FindingSeverity::Warning,
            false
        ),
        rule!(
            "credential-access/aws-credentials-file",
            RuleFamily::CredentialAccess,
            "references the AWS credentials file",
            r"\.aws/credentials",
            FindingSeverity::Error,
            false
        ),
        rule!(
            "credential-access/ask-for-api-key",
            RuleFamily::CredentialAccess,
            "asks the user to paste a credential into chat",
            r"(paste|enter|provide) your (api[_ -]?key|password|token)",
            FindingSeverity::Warning,
            false
        ),
        // --- exfiltration ---
        rule!(
            "exfiltration/curl-command-subst",
            RuleFamily::Exfiltration,
            "pipes a command substitution into a network request",
            r"curl[^\n]*\$\(",
            FindingSeverity::Error,
            false
        ),
        rule!(
            "exfiltration/post-external",
            RuleFamily::Exfiltration,
            "posts data to a hardcoded external host",
            r"(curl|wget|fetch)\s+(-X\s*POST|--request\s*POST)",
            FindingSeverity::Warning,
            false
        ),
        rule!(
            "exfiltration/sudo-chmod-777",
            RuleFamily::Exfiltration,
            "escalates privilege or opens permissions widely",
            r"(sudo\s|chmod\s+(-R\s+)?777)",
            FindingSeverity::Warning,
            false
        ),
        rule!(
            "exfiltration/security-disable",
            RuleFamily::Exfiltration,
            "disables a security control",
            r"(disable|turn off|bypass) (firewall|antivirus|selinux|sandbox)",
            FindingSeverity::Error,
            false
        ),
        rule!(
            "exfiltration/webhook-exfil",
            RuleFamily::Exfiltration,
            "sends content to a generic webhook collector, spanning lines",
            r"send (everything|all (files|data)|the contents) to (this|the following) (webhook|url|endpoint)",
            FindingSeverity::Error,
            true
        ),
        rule!(
            "prompt-injection/ignore-previous",
            RuleFamily::PromptInjection,
            "instructs the model to discard its prior instructions, spanning lines",
            r"ignore\s+(all\s+|any\s+)?(previous|prior|above)\s+instructions",
            FindingSeverity::Error,
            true
        ),
    ];
    RULES
}

/// Lazily-compiled, case-insensitive regex for one rule. Rules are
/// compiled once per process and cached by pointer identity of their
/// static `pattern` string (rules never change at runtime).
pub(crate) fn compiled(rule: &PatternRule) -> &'static Regex {
    static CACHE: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| {
        pattern_library()
            .iter()
            .map(|r| {
                let compiled = Regex::new(&format!("(?i){}", r.pattern))
                    .unwrap_or_else(|e| panic!("pattern library rule '{}' fails to compile: {e}", r.id));
                (r.pattern, compiled)
            })
            .collect()
    });
    cache
        .iter()
        .find(|(pattern, _)| *pattern == rule.pattern)
        .map(|(_, re)| re)
        .expect("every pattern_library() rule has a cached compiled regex")
}
