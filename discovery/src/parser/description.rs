//! Command description extraction.

use regex::Regex;
use std::sync::LazyLock;

use manpage_schema_core::bounded_description;

use crate::config::SectionKind;

use super::sections::{ManSection, SectionMap};

/// Builds the command summary: DESCRIPTION's first paragraph, else the NAME
/// line with the name token(s) and separator removed.
pub fn extract_description(sections: &SectionMap) -> Option<String> {
    sections
        .first(SectionKind::Description)
        .and_then(leading_prose)
        .or_else(|| sections.first(SectionKind::Name).and_then(name_summary))
}

/// First paragraph: lines up to the first blank line after content, or up to
/// a dash-led line.
fn leading_prose(section: &ManSection) -> Option<String> {
    let mut paragraph: Vec<&str> = Vec::new();

    for line in &section.lines {
        let trimmed = line.text.trim();
        if trimmed.is_empty() {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        if trimmed.starts_with('-') {
            break;
        }
        paragraph.push(trimmed);
    }

    bounded_description(&paragraph.join(" "))
}

fn name_summary(section: &ManSection) -> Option<String> {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\s+(?:\\-|-|\x{2013}|\x{2014})\s+").expect("static regex must compile")
    });

    let text = section
        .lines
        .iter()
        .map(|line| line.text.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let summary = match SEPARATOR_RE.find(&text) {
        Some(separator) => &text[separator.end()..],
        None => text.as_str(),
    };
    bounded_description(summary)
}

#[cfg(test)]
mod tests {
    use manpage_schema_core::DESCRIPTION_LIMIT;

    use super::*;
    use crate::config::Dialect;
    use crate::parser::normalize::to_indexed_lines;
    use crate::parser::sections::split_sections;

    fn describe(text: &str) -> Option<String> {
        extract_description(&split_sections(
            &to_indexed_lines(text),
            Dialect::standard(),
        ))
    }

    #[test]
    fn test_prefers_description_first_paragraph() {
        let text = "NAME\n     grep - file pattern searcher\nDESCRIPTION\n     The grep utility searches any given input files,\n     selecting lines that match.\n\n     A second paragraph.\n";
        assert_eq!(
            describe(text).as_deref(),
            Some("The grep utility searches any given input files, selecting lines that match.")
        );
    }

    #[test]
    fn test_falls_back_to_name_summary() {
        let text = "NAME\n     grep, egrep, fgrep \u{2013} file pattern\n     searcher\nDESCRIPTION\n\n";
        assert_eq!(describe(text).as_deref(), Some("file pattern searcher"));
    }

    #[test]
    fn test_name_without_separator_keeps_text() {
        assert_eq!(
            describe("NAME\n   frobnicate widgets\n").as_deref(),
            Some("frobnicate widgets")
        );
    }

    #[test]
    fn test_name_with_roff_escaped_dash() {
        assert_eq!(
            describe("NAME\n   ls \\- list directory contents\n").as_deref(),
            Some("list directory contents")
        );
    }

    #[test]
    fn test_description_stops_at_option_line() {
        let text = "DESCRIPTION\n     List information about the FILEs.\n     -a, --all\n            do not ignore entries\n";
        assert_eq!(
            describe(text).as_deref(),
            Some("List information about the FILEs.")
        );
    }

    #[test]
    fn test_description_is_bounded() {
        let text = format!("DESCRIPTION\n     {}\n", "lorem ipsum ".repeat(40));
        let description = describe(&text).unwrap();
        assert!(description.chars().count() <= DESCRIPTION_LIMIT);
    }

    #[test]
    fn test_absent_when_both_sources_empty() {
        assert_eq!(describe("NAME\n\nDESCRIPTION\n\nOPTIONS\n  -v\n"), None);
        assert_eq!(describe(""), None);
    }
}
