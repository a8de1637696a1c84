// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scope mismatch: the skill's content talks about a topic its manifest
//! never declares a capability or description keyword for.

use kithkit_core::{Finding, Manifest};

struct Topic {
    name: &'static str,
    keywords: &'static [&'static str],
    /// Words in a capability/name/description that show the topic is
    /// actually in scope for this skill.
    declared_by: &'static [&'static str],
}

const TOPICS: &[Topic] = &[
    Topic {
        name: "credentials",
        keywords: &["password", "credential", "token", "api key", "ssh key", "keychain", "secret"],
        declared_by: &["credential", "auth", "secret", "token"],
    },
    Topic {
        name: "system",
        keywords: &["sudo", "chmod", "registry key", "kernel module", "system32", "root access"],
        declared_by: &["system", "shell", "exec", "process"],
    },
    Topic {
        name: "network",
        keywords: &["curl", "wget", "http request", "socket", "webhook", "dns"],
        declared_by: &["network", "http", "fetch"],
    },
];

fn count_distinct_hits(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| haystack.matches(*kw).count() >= 2).count()
}

/// Build the set of declared capabilities plus name/description as one
/// lowercase haystack, then for each topic count keyword hits in
/// `skill_md`. A topic accumulating at least 2 distinct keywords (each
/// occurring at least twice) without being declared anywhere is a
/// `scope/mismatch` warning.
#[must_use]
pub fn scope_check(manifest: &Manifest, skill_md: &str) -> Vec<Finding> {
    let declared_haystack = {
        let mut s = manifest.name.to_lowercase();
        s.push(' ');
        s.push_str(&manifest.description.to_lowercase());
        s.push(' ');
        for cap in manifest.capabilities.all() {
            s.push_str(&cap.to_lowercase());
            s.push(' ');
        }
        s
    };
    let content = skill_md.to_lowercase();

    let mut findings = Vec::new();
    for topic in TOPICS {
        let hits = count_distinct_hits(&content, topic.keywords);
        if hits < 2 {
            continue;
        }
        let declared = topic.declared_by.iter().any(|kw| declared_haystack.contains(kw));
        if !declared {
            findings.push(Finding::warning(
                "scope/mismatch",
                format!(
                    "content repeatedly discusses '{}' topics ({hits} distinct keywords) \
                     but no declared capability, name, or description relates to it",
                    topic.name
                ),
            ));
        }
    }
    findings
}
