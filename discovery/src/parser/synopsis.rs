//! Positional operands from the SYNOPSIS section.

use tracing::trace;

use manpage_schema_core::ParameterRecord;

use crate::config::Dialect;

use super::IndexedLine;
use super::util::{is_upper_token, leading_indent, strip_placeholder_delimiters};

/// Collects positional operands in order of first appearance.
///
/// Each usage form starts at the section's smallest indentation and opens with
/// the command name; deeper-indented lines continue the previous form.
pub fn scan_positionals(span: &[&IndexedLine], dialect: &Dialect) -> Vec<ParameterRecord> {
    let form_indent = span
        .iter()
        .filter(|line| !line.text.trim().is_empty())
        .map(|line| leading_indent(&line.text))
        .min()
        .unwrap_or(0);

    let mut names: Vec<String> = Vec::new();
    for line in span {
        let starts_form = leading_indent(&line.text) == form_indent;
        for name in scan_line(&line.text, starts_form, dialect) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    names
        .iter()
        .enumerate()
        .map(|(idx, name)| ParameterRecord::positional(name, idx + 1))
        .collect()
}

/// Operand candidates of one line, in order.
fn scan_line(text: &str, starts_form: bool, dialect: &Dialect) -> Vec<String> {
    let mut found = Vec::new();
    // One entry per open bracket; `true` when the group was opened by a dash
    // token.
    let mut groups: Vec<bool> = Vec::new();
    let mut skip_command = starts_form;
    let mut after_bare_dash = false;

    for token in text.split_whitespace() {
        let bracketed = !groups.is_empty();
        let inside_dash_group = groups.iter().any(|dash| *dash);
        let content = token.trim_start_matches(['[', '{']);
        let is_dash = content.starts_with('-');
        let opens = token.chars().filter(|ch| matches!(ch, '[' | '{')).count();
        let closes = token.chars().filter(|ch| matches!(ch, ']' | '}')).count();
        let opens_here = token.starts_with(['[', '{']);

        let in_group = bracketed || opens_here;
        let dash_group = inside_dash_group || (opens_here && is_dash);
        groups.extend(std::iter::repeat_n(dash_group, opens));

        let was_after_bare_dash = after_bare_dash;
        after_bare_dash = is_dash && !in_group;

        let command_name = skip_command && !in_group;
        if command_name {
            skip_command = false;
        }

        let accepted = if command_name || is_dash || dash_group || (was_after_bare_dash && !in_group)
        {
            None
        } else {
            operand_name(token, in_group, dialect)
        };

        for _ in 0..closes {
            groups.pop();
        }

        if let Some(name) = accepted {
            trace!(token, name = %name, "Synopsis operand");
            found.push(name);
        }
    }

    found
}

fn operand_name(token: &str, in_group: bool, dialect: &Dialect) -> Option<String> {
    let name = strip_placeholder_delimiters(token);
    if name.is_empty() || dialect.is_synopsis_skip_word(name) {
        return None;
    }
    let valid = name.starts_with(|ch: char| ch.is_ascii_alphabetic())
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));
    if !valid {
        return None;
    }

    (is_upper_token(name) || in_group || token.starts_with('<')).then(|| name.to_string())
}
