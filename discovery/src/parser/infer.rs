//! Value-type inference for value-taking parameters.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//! file path, directory, number (placeholder or numeric wording in the
//! description), process id, custom lexicon word, then the `string`
//! fallback.

use regex::Regex;
use std::sync::LazyLock;

use manpage_schema_core::ValueType;

use crate::config::Dialect;

use super::util::strip_placeholder_delimiters;

const FILE_WORDS: &[&str] = &[
    "file", "path", "filename", "filepath", "pathname", "fname",
];
const DIRECTORY_WORDS: &[&str] = &["dir", "directory", "dirname", "folder"];
const NUMBER_WORDS: &[&str] = &[
    "num", "n", "number", "count", "size", "int", "integer", "bytes", "lines", "seconds",
    "secs",
];
const PID_WORDS: &[&str] = &["pid", "process", "processid"];
/// Prefixes that form path compounds with `file`/`dir` (`outfile`, `tmpdir`).
const PATH_PREFIXES: &[&str] = &[
    "in", "out", "input", "output", "log", "key", "cert", "conf", "config", "lock", "pid",
    "tmp", "temp", "src", "source", "dst", "dest", "work", "data", "cache", "save", "home",
    "root", "base", "cookie", "pattern", "script", "socket", "trace",
];

/// Everything a rule may look at.
struct InferenceInput<'a> {
    /// Normalized placeholder: lower-cased, delimiters stripped.
    word: String,
    /// `word` split on `_`/`-`.
    segments: Vec<String>,
    /// Lower-cased description prose.
    description: String,
    dialect: &'a Dialect,
}

type ValueRule = (&'static str, fn(&InferenceInput<'_>) -> Option<ValueType>);

/// Inference rules in precedence order.
const VALUE_RULES: &[ValueRule] = &[
    ("file-path", file_path_rule),
    ("directory", directory_rule),
    ("number", number_rule),
    ("pid", pid_rule),
    ("custom-word", custom_word_rule),
];

/// Infers the value type from a placeholder and the parameter's description.
///
/// Never fails; unrecognized placeholders resolve to [`ValueType::String`].
pub fn infer_value_type(
    placeholder: Option<&str>,
    description: &str,
    dialect: &Dialect,
) -> ValueType {
    let word = normalize_placeholder(placeholder.unwrap_or_default());
    let segments = word
        .split(['_', '-'])
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect();
    let input = InferenceInput {
        word,
        segments,
        description: description.to_lowercase(),
        dialect,
    };

    VALUE_RULES
        .iter()
        .find_map(|(_, rule)| rule(&input))
        .unwrap_or(ValueType::String)
}

fn normalize_placeholder(raw: &str) -> String {
    strip_placeholder_delimiters(raw.trim().trim_start_matches('='))
        .trim_start_matches('=')
        .to_lowercase()
}

fn singular(word: &str) -> &str {
    if word.len() > 2 {
        word.strip_suffix('s').unwrap_or(word)
    } else {
        word
    }
}

fn segment_in(input: &InferenceInput<'_>, words: &[&str]) -> bool {
    input
        .segments
        .iter()
        .any(|segment| words.contains(&segment.as_str()) || words.contains(&singular(segment)))
}

/// `outfile`, `tmpdir`: a known path prefix glued to `suffix`.
fn is_path_compound(word: &str, suffix: &str) -> bool {
    singular(word)
        .strip_suffix(suffix)
        .is_some_and(|prefix| PATH_PREFIXES.contains(&prefix))
}

fn file_path_rule(input: &InferenceInput<'_>) -> Option<ValueType> {
    (segment_in(input, FILE_WORDS) || is_path_compound(&input.word, "file"))
        .then_some(ValueType::FilePath)
}

fn directory_rule(input: &InferenceInput<'_>) -> Option<ValueType> {
    (segment_in(input, DIRECTORY_WORDS) || is_path_compound(&input.word, "dir"))
        .then_some(ValueType::Directory)
}

fn number_rule(input: &InferenceInput<'_>) -> Option<ValueType> {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static NUMERIC_LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"\b(?:number of|numeric value|an integer|integer value|in seconds|in milliseconds|in bytes|how many|maximum of)\b",
        )
        .expect("static regex must compile")
    });

    (segment_in(input, NUMBER_WORDS) || NUMERIC_LANGUAGE_RE.is_match(&input.description))
        .then_some(ValueType::Number)
}

fn pid_rule(input: &InferenceInput<'_>) -> Option<ValueType> {
    segment_in(input, PID_WORDS).then_some(ValueType::Pid)
}

fn custom_word_rule(input: &InferenceInput<'_>) -> Option<ValueType> {
    let word = input.word.as_str();
    let is_single_word = !word.is_empty()
        && word
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-'));
    if !is_single_word {
        return None;
    }

    let dialect = input.dialect;
    (dialect.is_custom_value_word(word) || dialect.is_custom_value_word(singular(word)))
        .then(|| ValueType::Custom(word.to_string()))
}
