// SPDX-License-Identifier: MIT OR Apache-2.0
//! Unicode Tag range, zero-width character, and Cyrillic-Latin homoglyph
//! detection.

use kithkit_core::Finding;

const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

fn is_tag_range(ch: char) -> bool {
    ('\u{E0001}'..='\u{E007F}').contains(&ch)
}

fn is_cjk(ch: char) -> bool {
    matches!(ch, '\u{3000}'..='\u{9FFF}' | '\u{3040}'..='\u{30FF}' | '\u{F900}'..='\u{FAFF}' | '\u{20000}'..='\u{2A6DF}')
}

/// Fixed Cyrillic -> visually-identical Latin lookup table.
const HOMOGLYPHS: &[(char, char)] = &[
    ('а', 'a'),
    ('е', 'e'),
    ('о', 'o'),
    ('р', 'p'),
    ('с', 'c'),
    ('х', 'x'),
    ('у', 'y'),
    ('і', 'i'),
    ('ѕ', 's'),
    ('к', 'k'),
];

/// Scan `content` (one text file named `file`) line by line.
#[must_use]
pub fn unicode_check(file: &str, content: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let has_cjk = line.chars().any(is_cjk);

        for ch in line.chars() {
            if is_tag_range(ch) {
                findings.push(
                    Finding::error("unicode/tag-range", format!("contains a Unicode Tag character U+{:04X}", ch as u32))
                        .with_file(file)
                        .with_line(line_no),
                );
            }
            if ZERO_WIDTH.contains(&ch) {
                findings.push(
                    Finding::warning("unicode/zero-width", format!("contains a zero-width character U+{:04X}", ch as u32))
                        .with_file(file)
                        .with_line(line_no),
                );
            }
        }

        if !has_cjk {
            if let Some((cyrillic, latin)) = HOMOGLYPHS.iter().find(|(c, _)| line.contains(*c)) {
                findings.push(
                    Finding::warning(
                        "unicode/homoglyph",
                        format!("contains Cyrillic '{cyrillic}', visually identical to Latin '{latin}'"),
                    )
                    .with_file(file)
                    .with_line(line_no),
                );
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_ascii_has_no_findings() {
        assert!(unicode_check("SKILL.md", "# Weather Check\n\nLooks up the weather.").is_empty());
    }

    #[test]
    fn tag_range_character_is_an_error() {
        let findings = unicode_check("SKILL.md", "hidden\u{E0041}payload");
        assert!(findings.iter().any(|f| f.check == "unicode/tag-range"));
    }

    #[test]
    fn zero_width_character_is_a_warning() {
        let findings = unicode_check("SKILL.md", "zero\u{200B}width");
        assert!(findings.iter().any(|f| f.check == "unicode/zero-width"));
    }

    #[test]
    fn cyrillic_homoglyph_is_flagged_outside_cjk_lines() {
        let findings = unicode_check("SKILL.md", "this is \u{0430} test");
        assert!(findings.iter().any(|f| f.check == "unicode/homoglyph"));
    }

    #[test]
    fn homoglyph_is_suppressed_on_lines_containing_cjk() {
        let findings = unicode_check("SKILL.md", "\u{5929}\u{6c14} api is \u{0430} test");
        assert!(!findings.iter().any(|f| f.check == "unicode/homoglyph"));
    }
}
