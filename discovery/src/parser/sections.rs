//! Section splitting for rendered man-page text.

use crate::config::{Dialect, SectionKind, compact_heading};

use super::IndexedLine;
use super::util::leading_indent;

/// Longest text accepted as a column-0 heading.
const MAX_HEADING_LEN: usize = 48;

/// A recognized section with its body lines.
#[derive(Debug, Clone)]
pub struct ManSection {
    /// Heading as recognized (upper-cased for column-0 headings).
    pub heading: String,
    pub kind: SectionKind,
    /// Index of the heading line.
    pub start_line: usize,
    /// Body lines, heading excluded.
    pub lines: Vec<IndexedLine>,
}

/// Sections of one document in input order.
#[derive(Debug, Clone, Default)]
pub struct SectionMap {
    pub sections: Vec<ManSection>,
}

impl SectionMap {
    /// First section of the given kind.
    pub fn first(&self, kind: SectionKind) -> Option<&ManSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    /// Body lines of every section of `kind`, concatenated in document order.
    pub fn span(&self, kind: SectionKind) -> Vec<&IndexedLine> {
        self.sections
            .iter()
            .filter(|section| section.kind == kind)
            .flat_map(|section| section.lines.iter())
            .collect()
    }

    /// Heading of the first options-bearing section, if any.
    pub fn options_heading(&self) -> Option<&str> {
        self.first(SectionKind::Options)
            .map(|section| section.heading.as_str())
    }
}

/// Splits lines into sections. Lines before the first heading are dropped.
pub fn split_sections(lines: &[IndexedLine], dialect: &Dialect) -> SectionMap {
    let mut map = SectionMap::default();
    let mut current: Option<ManSection> = None;

    for line in lines {
        if let Some((heading, kind)) = recognize_heading(&line.text, dialect) {
            if let Some(done) = current.take() {
                map.sections.push(done);
            }
            current = Some(ManSection {
                heading,
                kind,
                start_line: line.index,
                lines: Vec::new(),
            });
            continue;
        }

        if let Some(section) = current.as_mut() {
            section.lines.push(line.clone());
        }
    }

    if let Some(done) = current {
        map.sections.push(done);
    }

    map
}

/// Recognizes a heading line and returns its name and role.
///
/// Column-0 lines match the dialect's heading table case-insensitively, or
/// become [`SectionKind::Other`] when written entirely in capitals. Phrase
/// headings match at any indentation.
pub fn recognize_heading(line: &str, dialect: &Dialect) -> Option<(String, SectionKind)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let compact = compact_heading(trimmed);
    if compact.is_empty() {
        return None;
    }

    if leading_indent(line) == 0 && compact.len() <= MAX_HEADING_LEN {
        let upper = compact.to_ascii_uppercase();
        if let Some(kind) = dialect.heading_kind(&upper) {
            return Some((upper, kind));
        }
        if is_capitalized_heading(&compact) {
            return Some((upper, SectionKind::Other));
        }
    }

    dialect
        .phrase_kind(&compact)
        .map(|kind| (compact.clone(), kind))
}

fn is_capitalized_heading(compact: &str) -> bool {
    compact.starts_with(|ch: char| ch.is_ascii_uppercase())
        && compact
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch == ' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::normalize::to_indexed_lines;

    fn split(text: &str) -> SectionMap {
        split_sections(&to_indexed_lines(text), Dialect::standard())
    }

    #[test]
    fn test_split_recognizes_standard_headings() {
        let map = split(
            "NAME\n     grep - search\nSYNOPSIS\n     grep [OPTION] PATTERN\nDESCRIPTION\n     Searches.\nOPTIONS\n     -i   ignore case\nSEE ALSO\n     egrep(1)\n",
        );

        let kinds = map.sections.iter().map(|s| s.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Name,
                SectionKind::Synopsis,
                SectionKind::Description,
                SectionKind::Options,
                SectionKind::Other,
            ]
        );
        let options = map.span(SectionKind::Options);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].text.trim(), "-i   ignore case");
    }

    #[test]
    fn test_indented_capitals_do_not_start_sections() {
        let map = split("SYNOPSIS\n     FILE\nOPTIONS\n     -v\n");
        let synopsis = map.first(SectionKind::Synopsis).unwrap();
        assert_eq!(synopsis.lines.len(), 1);
    }

    #[test]
    fn test_phrase_heading_splits_description() {
        let map = split(
            "DESCRIPTION\n     The grep utility searches files.\n\n     The following options are available:\n\n     -i      Perform case insensitive matching.\nEXIT STATUS\n     0\n",
        );

        let description = map.first(SectionKind::Description).unwrap();
        assert!(
            description
                .lines
                .iter()
                .all(|line| !line.text.contains("-i"))
        );
        assert_eq!(
            map.options_heading(),
            Some("The following options are available")
        );
        assert!(
            map.span(SectionKind::Options)
                .iter()
                .any(|line| line.text.trim().starts_with("-i"))
        );
    }

    #[test]
    fn test_multiple_option_sections_concatenate() {
        let map = split("GLOBAL OPTIONS\n  -v\nCOMMAND OPTIONS\n  -f FILE\n");
        let span = map.span(SectionKind::Options);
        let texts = span.iter().map(|line| line.text.trim()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["-v", "-f FILE"]);
    }

    #[test]
    fn test_missing_options_heading_yields_empty_span() {
        let map = split("NAME\n  true - do nothing\n");
        assert!(map.span(SectionKind::Options).is_empty());
        assert!(map.options_heading().is_none());
    }

    #[test]
    fn test_heading_accepts_trailing_colon_and_whitespace() {
        let dialect = Dialect::standard();
        assert_eq!(
            recognize_heading("Options:   ", dialect),
            Some(("OPTIONS".to_string(), SectionKind::Options))
        );
        assert_eq!(recognize_heading("  OPTIONS", dialect), None);
    }
}
