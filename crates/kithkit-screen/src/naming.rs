// SPDX-License-Identifier: MIT OR Apache-2.0
//! Name pattern, length, reserved-name, and typosquat checks.

use kithkit_core::{Finding, Manifest};

/// Levenshtein distance at or below this against any existing skill name
/// is reported as a typosquat warning.
const TYPOSQUAT_DISTANCE: usize = 2;

/// Re-runs [`Manifest::validate`]'s name-shaped findings (pattern, length,
/// reserved) and additionally warns when `manifest.name` is a near-miss
/// (Levenshtein distance ≤2) of any name already in `existing_names` —
/// the structural validator has no catalog context to detect this.
#[must_use]
pub fn naming_check(manifest: &Manifest, existing_names: &[String]) -> Vec<Finding> {
    let mut findings: Vec<Finding> =
        manifest.validate().into_iter().filter(|f| f.check == "manifest/name").collect();

    for existing in existing_names {
        if existing == &manifest.name {
            continue;
        }
        let distance = levenshtein::levenshtein(&manifest.name, existing);
        if distance <= TYPOSQUAT_DISTANCE {
            findings.push(Finding::warning(
                "naming/typosquat",
                format!("name '{}' is distance {distance} from existing skill '{existing}'", manifest.name),
            ));
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use kithkit_core::Author;

    fn manifest(name: &str) -> Manifest {
        Manifest {
            name: name.into(),
            version: "1.0.0".into(),
            description: "d".into(),
            author: Author { name: "A".into(), github: "a".into() },
            capabilities: Default::default(),
            config: vec![],
            tags: vec![],
            category: None,
            frameworks: None,
            trust_level: None,
        }
    }

    #[test]
    fn distinct_name_has_no_typosquat_warning() {
        let existing = vec!["weather-check".to_string()];
        assert!(naming_check(&manifest("pdf-reader"), &existing).is_empty());
    }

    #[test]
    fn near_duplicate_name_is_flagged_with_distance() {
        let existing = vec!["weather-check".to_string()];
        let findings = naming_check(&manifest("wether-check"), &existing);
        let hit = findings.iter().find(|f| f.check == "naming/typosquat").unwrap();
        assert!(hit.message.contains("distance 1"));
    }

    #[test]
    fn exact_match_against_its_own_entry_is_not_a_typosquat() {
        let existing = vec!["weather-check".to_string()];
        assert!(naming_check(&manifest("weather-check"), &existing).is_empty());
    }

    #[test]
    fn reserved_name_still_surfaces_as_a_structural_error() {
        let findings = naming_check(&manifest("admin"), &[]);
        assert!(findings.iter().any(|f| f.check == "manifest/name"));
    }
}
