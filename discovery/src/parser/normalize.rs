//! Text normalization ahead of section splitting.

use regex::Regex;
use std::sync::LazyLock;

use super::IndexedLine;
use super::util::looks_like_man_title_line;

/// Strips ANSI escapes and backspace overstrike (the `col -b` step), and
/// normalizes line endings.
pub fn normalize_man_text(raw: &str) -> String {
    static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile")
    });
    static OVERSTRIKE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r".\x08").expect("static regex must compile"));

    let stripped = ANSI_RE.replace_all(raw, "");
    let mut cleaned = stripped.into_owned();
    while OVERSTRIKE_RE.is_match(&cleaned) {
        cleaned = OVERSTRIKE_RE.replace_all(&cleaned, "").into_owned();
    }
    cleaned.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits normalized text into indexed lines, dropping rendered running
/// headers and footers.
///
/// Indexes refer to the original line numbers, so dropped lines leave gaps.
pub fn to_indexed_lines(normalized: &str) -> Vec<IndexedLine> {
    normalized
        .lines()
        .enumerate()
        .filter(|(_, text)| !is_running_header_footer(text.trim()))
        .map(|(index, text)| IndexedLine {
            index,
            text: text.trim_end().to_string(),
        })
        .collect()
}

fn is_running_header_footer(trimmed: &str) -> bool {
    if trimmed.is_empty() {
        return false;
    }

    if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return true;
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("general commands manual") {
        return true;
    }

    looks_like_man_title_line(trimmed)
}
