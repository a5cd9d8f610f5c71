//! Parameter classification for option entries.
//!
//! An entry head such as `-A NUM, --after-context=NUM` is read into a
//! [`Definition`] of dash-led alternates, each with an optional placeholder.
//! The governing alternate (the first one carrying value syntax, else the
//! first one) is then matched against [`SHAPE_RULES`] in order; `flag` is the
//! fallback shape.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use manpage_schema_core::{ParamType, ParameterRecord};

use crate::config::Dialect;

use super::infer::infer_value_type;
use super::segment::Entry;
use super::util::{is_upper_token, strip_placeholder_delimiters};

/// One dash-led spelling of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternate {
    /// Literal token, including inline `=value` syntax.
    pub token: String,
    /// Whitespace-separated value placeholder, if any.
    pub placeholder: Option<String>,
}

impl Alternate {
    fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            placeholder: None,
        }
    }

    /// Token up to any inline `=` or `[=`.
    pub fn flag_part(&self) -> &str {
        let end = self
            .token
            .find("[=")
            .or_else(|| self.token.find('='))
            .unwrap_or(self.token.len());
        &self.token[..end]
    }

    pub fn has_inline_equals(&self) -> bool {
        self.token.contains('=')
    }

    /// Inline value after the first `=`, without optional-value brackets.
    pub fn inline_value(&self) -> Option<&str> {
        self.token
            .split_once('=')
            .map(|(_, value)| value.trim_end_matches(']'))
    }

    /// The text describing the value: inline value first, then placeholder.
    pub fn value_text(&self) -> Option<&str> {
        self.inline_value().or(self.placeholder.as_deref())
    }

    pub fn has_value_syntax(&self) -> bool {
        self.has_inline_equals() || self.placeholder.is_some()
    }
}

/// Parsed entry head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    pub alternates: Vec<Alternate>,
    /// Text following the definition on the head line.
    pub inline_description: String,
}

impl Definition {
    /// First alternate with value syntax, else the first alternate.
    pub fn governing(&self) -> Option<&Alternate> {
        self.alternates
            .iter()
            .find(|alt| alt.has_value_syntax())
            .or_else(|| self.alternates.first())
    }
}

type ShapeRule = (ParamType, fn(&Alternate) -> bool);

/// Shape rules in precedence order; the key-value shapes win over the plain
/// value shapes, and an inline `=` wins over a separate placeholder.
pub const SHAPE_RULES: &[ShapeRule] = &[
    (ParamType::OptionKvEquals, has_key_equals_value),
    (ParamType::OptionKvColon, has_key_colon_value),
    (ParamType::OptionEquals, Alternate::has_inline_equals),
    (ParamType::Option, has_placeholder),
];

fn has_placeholder(alt: &Alternate) -> bool {
    alt.placeholder.is_some()
}

fn has_key_equals_value(alt: &Alternate) -> bool {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static KEY_EQUALS_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9_.@-]+\[?=[^\s=]").expect("static regex must compile")
    });
    alt.value_text()
        .map(strip_placeholder_delimiters)
        .is_some_and(|value| KEY_EQUALS_RE.is_match(value))
}

fn has_key_colon_value(alt: &Alternate) -> bool {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static KEY_COLON_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9_.@-]+\[?:[A-Za-z0-9_.@<\[-]").expect("static regex must compile")
    });
    alt.value_text()
        .map(strip_placeholder_delimiters)
        .is_some_and(|value| !value.contains("://") && KEY_COLON_RE.is_match(value))
}

/// Determines the shape of an alternate by walking [`SHAPE_RULES`].
pub fn classify_shape(alt: &Alternate) -> ParamType {
    SHAPE_RULES
        .iter()
        .find(|(_, matches)| matches(alt))
        .map_or(ParamType::Flag, |(shape, _)| *shape)
}

/// Classifies one entry into a parameter record.
///
/// Every entry yields exactly one record; an entry whose head cannot be read
/// degrades to a flag named by its first token.
pub fn classify_entry(entry: &Entry, dialect: &Dialect) -> ParameterRecord {
    let definition = parse_definition(&entry.head);
    let prose = entry_prose(&definition, entry);

    let Some(governing) = definition.governing() else {
        let name = entry.head.split_whitespace().next().unwrap_or_default();
        debug!(line = entry.line, head = %entry.head, "Entry head has no alternates");
        return ParameterRecord::flag(name).with_description(&prose);
    };

    let shape = classify_shape(governing);
    let record = match shape {
        ParamType::Flag | ParamType::Positional => ParameterRecord::flag(&governing.token),
        ParamType::OptionEquals => ParameterRecord::valued(
            &governing.token,
            shape,
            infer_value_type(governing.value_text(), &prose, dialect),
        ),
        ParamType::Option | ParamType::OptionKvEquals | ParamType::OptionKvColon => {
            ParameterRecord::valued(
                governing.flag_part(),
                shape,
                infer_value_type(governing.value_text(), &prose, dialect),
            )
        }
    };

    record.with_description(&prose)
}

fn entry_prose(definition: &Definition, entry: &Entry) -> String {
    let mut parts = Vec::with_capacity(entry.body.len() + 1);
    if !definition.inline_description.is_empty() {
        parts.push(definition.inline_description.as_str());
    }
    parts.extend(entry.body.iter().map(String::as_str));
    parts.join(" ")
}

/// Splits the head at the first tab or run of two spaces.
fn split_definition_and_description(head: &str) -> (&str, &str) {
    let cut = [head.find('\t'), head.find("  ")]
        .into_iter()
        .flatten()
        .min();
    match cut {
        Some(idx) => (head[..idx].trim(), head[idx..].trim()),
        None => (head.trim(), ""),
    }
}

/// Reads an entry head into alternates and trailing description text.
pub fn parse_definition(head: &str) -> Definition {
    let (definition, described) = split_definition_and_description(head);
    let tokens = group_delimited(definition.split_whitespace());

    let mut alternates: Vec<Alternate> = Vec::new();
    let mut expect_alternate = false;
    let mut rest_start = tokens.len();

    for (idx, raw) in tokens.iter().map(String::as_str).enumerate() {
        let ends_with_separator = raw.ends_with([',', '|']);
        let core = raw.trim_end_matches([',', '|']);

        if core.is_empty() {
            expect_alternate = true;
            continue;
        }

        if is_option_token(core) {
            alternates.extend(split_joined_alternates(core).into_iter().map(Alternate::new));
            expect_alternate = ends_with_separator;
            continue;
        }

        let next = tokens.get(idx + 1).map(String::as_str);
        let takes_placeholder = alternates.last().is_some_and(|alt| {
            alt.placeholder.is_none()
                && !alt.has_inline_equals()
                && !expect_alternate
                && looks_like_placeholder(core, ends_with_separator, next)
        });
        if takes_placeholder {
            if let Some(alt) = alternates.last_mut() {
                alt.placeholder = Some(core.to_string());
            }
            expect_alternate = ends_with_separator;
            continue;
        }

        rest_start = idx;
        break;
    }

    let mut inline = tokens[rest_start..].join(" ");
    if !described.is_empty() {
        if !inline.is_empty() {
            inline.push(' ');
        }
        inline.push_str(described);
    }

    Definition {
        alternates,
        inline_description: inline,
    }
}

/// Rejoins delimited placeholders that contain spaces (`<fractional seconds>`).
fn group_delimited<'a>(words: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut depth = 0i32;
    for word in words {
        if depth > 0 {
            if let Some(last) = tokens.last_mut() {
                last.push(' ');
                last.push_str(word);
            }
        } else {
            tokens.push(word.to_string());
        }
        if depth > 0 || word.starts_with(['<', '[', '{']) {
            depth += delimiter_balance(word);
        }
    }
    tokens
}

fn delimiter_balance(word: &str) -> i32 {
    word.chars()
        .map(|ch| match ch {
            '<' | '[' | '{' => 1,
            '>' | ']' | '}' => -1,
            _ => 0,
        })
        .sum()
}

fn is_option_token(token: &str) -> bool {
    let Some(body) = token.strip_prefix('-') else {
        return false;
    };
    let body = body.strip_prefix('-').unwrap_or(body);
    body.starts_with(|ch: char| ch.is_ascii_alphanumeric() || matches!(ch, '?' | '#' | '@' | '['))
}

/// Splits `-h/--help` or `-q|--quiet` when every part is itself dash-led.
fn split_joined_alternates(token: &str) -> Vec<&str> {
    for separator in ['/', '|'] {
        if token.contains(separator) {
            let parts = token.split(separator).collect::<Vec<_>>();
            if parts.iter().all(|part| is_option_token(part)) {
                return parts;
            }
        }
    }
    vec![token]
}

/// A non-dash token is a placeholder when it is delimited, capitalized,
/// key-value shaped, or closes the alternate.
fn looks_like_placeholder(core: &str, ends_with_separator: bool, next: Option<&str>) -> bool {
    if core.starts_with(['<', '[', '{']) {
        return true;
    }
    if core.contains(['=', ':']) {
        return true;
    }
    let bare = strip_placeholder_delimiters(core);
    if bare.is_empty() {
        return false;
    }
    if is_upper_token(bare) && bare.len() > 1 {
        return true;
    }
    ends_with_separator || next.is_none_or(|token| is_option_token(token))
}
