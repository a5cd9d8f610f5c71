//! Entry segmentation of the options-bearing span.

use crate::config::Dialect;

use super::IndexedLine;
use super::util::leading_indent;

/// One parameter definition chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Source line of the head.
    pub line: usize,
    /// Head line, trimmed (`-o file   Write output to file.`).
    pub head: String,
    /// Continuation prose, one trimmed line per element.
    pub body: Vec<String>,
}

/// Splits the options span into entries.
///
/// A line whose left-trimmed text matches a dialect entry-start pattern opens
/// a new entry; everything else continues the current one. Blank lines never
/// end an entry, and indentation never drops prose. A short capitalized line
/// without closing punctuation, indented less than the head and followed by
/// an entry start, is a subsection title and is left out of the prose. Lines
/// before the first entry are preamble and are dropped.
pub fn segment_entries(span: &[&IndexedLine], dialect: &Dialect) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current: Option<(usize, Entry)> = None;

    for (at, line) in span.iter().enumerate() {
        let trimmed = line.text.trim();
        let indent = leading_indent(&line.text);

        if dialect.is_entry_start(trimmed) {
            if let Some((_, done)) = current.take() {
                entries.push(done);
            }
            if is_malformed_head(trimmed) {
                continue;
            }
            current = Some((
                indent,
                Entry {
                    line: line.index,
                    head: trimmed.to_string(),
                    body: Vec::new(),
                },
            ));
            continue;
        }

        let Some((head_indent, entry)) = current.as_mut() else {
            continue;
        };
        if trimmed.is_empty() {
            continue;
        }
        if indent < *head_indent
            && looks_like_subsection_title(trimmed)
            && precedes_entry(&span[at + 1..], dialect)
        {
            continue;
        }
        entry.body.push(trimmed.to_string());
    }

    if let Some((_, done)) = current {
        entries.push(done);
    }

    entries
}

fn looks_like_subsection_title(trimmed: &str) -> bool {
    trimmed.chars().next().is_some_and(char::is_uppercase)
        && !trimmed.ends_with(['.', ',', ';', ':', ')'])
        && trimmed.split_whitespace().count() <= 6
}

/// Whether the next non-blank line opens an entry.
fn precedes_entry(rest: &[&IndexedLine], dialect: &Dialect) -> bool {
    rest.iter()
        .map(|line| line.text.trim())
        .find(|trimmed| !trimmed.is_empty())
        .is_some_and(|trimmed| dialect.is_entry_start(trimmed))
}

/// Heads whose first token is nothing but dashes and punctuation.
fn is_malformed_head(trimmed: &str) -> bool {
    let first = trimmed.split_whitespace().next().unwrap_or_default();
    !first.chars().any(|ch| ch.is_alphanumeric() || matches!(ch, '?' | '#' | '@'))
}
