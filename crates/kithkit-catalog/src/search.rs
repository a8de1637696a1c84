// SPDX-License-Identifier: MIT OR Apache-2.0
//! Filtered, ordered search over a (already-verified) catalog index.

use kithkit_core::{SignedCatalogIndex, SkillEntry, TrustLevel};

/// Filters combined with AND. `None` skips that filter entirely.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring match over name or description.
    pub text: Option<String>,
    /// Exact membership in the skill's tags.
    pub tag: Option<String>,
    /// Exact membership in the skill's required-or-optional capabilities.
    pub capability: Option<String>,
}

/// A latest-version projection of a matching [`SkillEntry`].
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Skill name.
    pub name: String,
    /// Skill description.
    pub description: String,
    /// Latest published version string.
    pub latest: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Required capabilities.
    pub capabilities_required: Vec<String>,
    /// Optional capabilities.
    pub capabilities_optional: Vec<String>,
    /// Catalog-assigned trust level.
    pub trust_level: TrustLevel,
}

/// Run `query` over `index`, returning hits in the order skills are stored
/// (sorted by name).
#[must_use]
pub fn search(index: &SignedCatalogIndex, query: &SearchQuery) -> Vec<SearchHit> {
    index
        .skills
        .iter()
        .filter(|s| matches_text(s, query.text.as_deref()))
        .filter(|s| query.tag.as_deref().is_none_or(|t| s.tags.iter().any(|x| x == t)))
        .filter(|s| query.capability.as_deref().is_none_or(|c| s.capabilities.all().any(|x| x == c)))
        .map(to_hit)
        .collect()
}

fn matches_text(skill: &SkillEntry, text: Option<&str>) -> bool {
    let Some(q) = text else { return true };
    let q = q.to_lowercase();
    skill.name.to_lowercase().contains(&q) || skill.description.to_lowercase().contains(&q)
}

fn to_hit(skill: &SkillEntry) -> SearchHit {
    SearchHit {
        name: skill.name.clone(),
        description: skill.description.clone(),
        latest: skill.latest.clone(),
        tags: skill.tags.clone(),
        capabilities_required: skill.capabilities.required.clone(),
        capabilities_optional: skill.capabilities.optional.clone(),
        trust_level: skill.trust_level,
    }
}
