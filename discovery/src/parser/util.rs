//! Shared token and line helpers.

/// Returns `true` if `trimmed` matches a rendered man page title banner token
/// (e.g. `GIT-REBASE(1)` or `STAT(1)`).
///
/// Extracts the first whitespace-separated token to handle full title lines
/// like `GIT-REBASE(1)  Git Manual  GIT-REBASE(1)`. Uses `rfind('(')` on
/// that token for robustness, and applies permissive character rules:
///
/// - **Name part**: ASCII alphanumeric plus `-`, `_`, `.`, `+`
/// - **Section part**: ASCII digits or alphabetic characters
pub fn looks_like_man_title_line(trimmed: &str) -> bool {
    if trimmed.is_empty() {
        return false;
    }

    let first = trimmed.split_whitespace().next().unwrap_or_default();
    if !first.ends_with(')') {
        return false;
    }
    let Some(paren_idx) = first.rfind('(') else {
        return false;
    };
    if paren_idx == 0 {
        return false;
    }
    let name = &first[..paren_idx];
    let section = &first[paren_idx + 1..first.len() - 1];
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '+'))
        && !section.is_empty()
        && section
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_ascii_alphabetic())
}

/// Number of leading whitespace characters.
pub fn leading_indent(line: &str) -> usize {
    line.chars().take_while(|ch| ch.is_whitespace()).count()
}

/// Returns `true` for tokens written in capitals (`FILE`, `PATTERN_FILE`).
///
/// Digits, `_` and `-` are allowed; at least one letter is required.
pub fn is_upper_token(token: &str) -> bool {
    token.chars().any(|ch| ch.is_ascii_alphabetic())
        && !token.chars().any(|ch| ch.is_lowercase())
}

/// Strips bracket delimiters, ellipses, and trailing separators from a
/// placeholder or operand token.
pub fn strip_placeholder_delimiters(token: &str) -> &str {
    let mut current = token.trim();
    loop {
        let next = current
            .trim_end_matches([',', ';', '|'])
            .trim_end_matches("...")
            .trim_matches(|ch: char| matches!(ch, '[' | ']' | '<' | '>' | '{' | '}' | '(' | ')'))
            .trim_end_matches("...");
        if next == current {
            return current;
        }
        current = next;
    }
}
