// SPDX-License-Identifier: MIT OR Apache-2.0
//! The skill manifest: an immutable descriptor authored per skill version.

use crate::finding::{Finding, FindingSeverity};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// `^[a-z0-9][a-z0-9-]*[a-z0-9]$` — lowercase alphanumeric/hyphen, must
/// start and end with an alphanumeric character.
fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").expect("name pattern is a valid regex"))
}

fn matches_name_pattern(name: &str) -> bool {
    name_pattern().is_match(name)
}

/// Names the catalog refuses regardless of an otherwise-valid pattern match.
pub const RESERVED_NAMES: &[&str] = &[
    "admin", "api", "catalog", "index", "kithkit", "revocation", "root", "system", "test",
];

/// An author-submitted, immutable descriptor for one skill version.
///
/// # Examples
///
/// ```
/// use kithkit_core::Manifest;
///
/// let yaml = r#"
/// name: weather-check
/// version: 1.0.0
/// description: Looks up current weather conditions.
/// author:
///   name: Jane Doe
///   github: janedoe
/// capabilities:
///   required: ["network"]
/// config: []
/// tags: []
/// "#;
/// let m: Manifest = serde_yaml::from_str(yaml).unwrap();
/// assert!(m.validate().is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    /// Lowercase, 2-64 chars, `^[a-z0-9][a-z0-9-]*[a-z0-9]$`.
    pub name: String,
    /// Strict semver string, e.g. `1.2.3`.
    pub version: String,
    /// Non-empty human description.
    pub description: String,
    /// Author identity (name and GitHub handle).
    pub author: Author,
    /// Capabilities the skill requires/optionally uses.
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Ordered configuration schema the skill expects at install time.
    #[serde(default)]
    pub config: Vec<ConfigField>,
    /// Free-form metadata tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Framework compatibility metadata.
    #[serde(default)]
    pub frameworks: Option<Frameworks>,
    /// Catalog-assigned trust level. If present in an author submission it
    /// is ignored by the catalog (an [`FindingSeverity::Info`] finding is
    /// produced for it, never an error) — trust level is assigned by the
    /// authority, not claimed by the author.
    #[serde(default)]
    pub trust_level: Option<TrustLevel>,
}

/// `{name, github}`, both non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// GitHub handle (no leading `@`).
    pub github: String,
}

/// Declared capability requirements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Capabilities {
    /// Capabilities the skill cannot function without.
    #[serde(default)]
    pub required: Vec<String>,
    /// Capabilities the skill uses opportunistically.
    #[serde(default)]
    pub optional: Vec<String>,
}

impl Capabilities {
    /// All declared capabilities, required and optional, as a flat iterator.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.required.iter().chain(self.optional.iter()).map(String::as_str)
    }
}

/// One entry in the skill's `config` schema.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConfigField {
    /// The config key name.
    pub key: String,
    /// The value type.
    #[serde(rename = "type")]
    pub field_type: ConfigType,
    /// Whether the field is required at install time.
    #[serde(default)]
    pub required: bool,
    /// Default value, if any.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Human-readable description shown to the installing user.
    pub description: String,
    /// Allowed values; required and non-empty when `field_type` is `Enum`.
    #[serde(default)]
    pub enum_values: Option<Vec<String>>,
}

/// Type of a single configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConfigType {
    /// A secret delegated to the platform's secure credential store.
    Credential,
    /// Free-text string.
    String,
    /// Numeric value.
    Number,
    /// Boolean flag.
    Boolean,
    /// One of a fixed set of strings (`enum_values`).
    Enum,
}

/// Framework compatibility metadata (informational only).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Frameworks {
    /// Frameworks this skill has been tested against.
    #[serde(default)]
    pub tested: Option<Vec<String>>,
}

/// Catalog-assigned trust tier. Affects screener recommendation text only,
/// never detection rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TrustLevel {
    /// Published by the registry operator itself.
    FirstParty,
    /// Reviewed and vouched for by the registry operator.
    Verified,
    /// Published by an unvetted third party.
    Community,
}

impl Manifest {
    /// Run the structural invariants from spec §3 and return one
    /// [`Finding`] per violation. An empty result means the manifest is
    /// structurally sound (this says nothing about its *content* — that is
    /// the screener's job).
    #[must_use]
    pub fn validate(&self) -> Vec<Finding> {
        let mut findings = Vec::new();

        if self.name.len() < 2 || self.name.len() > 64 || !matches_name_pattern(&self.name) {
            findings.push(Finding::error(
                "manifest/name",
                format!(
                    "name '{}' must be 2-64 lowercase alphanumeric/hyphen characters, \
                     starting and ending with an alphanumeric",
                    self.name
                ),
            ));
        }
        if RESERVED_NAMES.contains(&self.name.as_str()) {
            findings.push(Finding::error(
                "manifest/name",
                format!("name '{}' is reserved", self.name),
            ));
        }

        if semver::Version::parse(&self.version).is_err() {
            findings.push(Finding::error(
                "manifest/version",
                format!("version '{}' is not valid semver", self.version),
            ));
        }

        if self.description.trim().is_empty() {
            findings.push(Finding::error("manifest/description", "description must not be empty"));
        }

        if self.author.name.trim().is_empty() || self.author.github.trim().is_empty() {
            findings.push(Finding::error(
                "manifest/author",
                "author.name and author.github must both be non-empty",
            ));
        }

        for field in &self.config {
            if field.field_type == ConfigType::Enum {
                let has_values = field.enum_values.as_ref().is_some_and(|v| !v.is_empty());
                if !has_values {
                    findings.push(Finding::error(
                        "manifest/config",
                        format!("config field '{}' has type enum but no enum_values", field.key),
                    ));
                }
            }
        }

        if self.trust_level.is_some() {
            findings.push(Finding::info(
                "manifest/trust_level",
                "trust_level is catalog-assigned and was ignored in this submission",
            ));
        }

        findings
    }

    /// `true` iff [`Self::validate`] produced no [`FindingSeverity::Error`].
    #[must_use]
    pub fn is_structurally_valid(&self) -> bool {
        !self.validate().iter().any(|f| f.severity == FindingSeverity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Manifest {
        Manifest {
            name: "weather-check".into(),
            version: "1.0.0".into(),
            description: "Looks up weather".into(),
            author: Author { name: "Jane".into(), github: "jane".into() },
            capabilities: Capabilities { required: vec!["network".into()], optional: vec![] },
            config: vec![],
            tags: vec![],
            category: None,
            frameworks: None,
            trust_level: None,
        }
    }

    #[test]
    fn valid_manifest_has_no_findings() {
        assert!(base().validate().is_empty());
    }

    #[test]
    fn rejects_bad_name_pattern() {
        let mut m = base();
        m.name = "Weather_Check".into();
        assert!(!m.is_structurally_valid());
    }

    #[test]
    fn rejects_reserved_name() {
        let mut m = base();
        m.name = "admin".into();
        assert!(!m.is_structurally_valid());
    }

    #[test]
    fn rejects_bad_semver() {
        let mut m = base();
        m.version = "v1".into();
        assert!(!m.is_structurally_valid());
    }

    #[test]
    fn enum_without_values_is_error() {
        let mut m = base();
        m.config.push(ConfigField {
            key: "mode".into(),
            field_type: ConfigType::Enum,
            required: true,
            default: None,
            description: "mode".into(),
            enum_values: None,
        });
        assert!(!m.is_structurally_valid());
    }

    #[test]
    fn author_supplied_trust_level_is_info_not_error() {
        let mut m = base();
        m.trust_level = Some(TrustLevel::FirstParty);
        assert!(m.is_structurally_valid());
        assert!(m.validate().iter().any(|f| f.severity == FindingSeverity::Info));
    }
}
