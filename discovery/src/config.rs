//! Engine configuration: man-page dialect tables and retrieval settings.
//!
//! Section headings, entry-start patterns, and the value-word lexicons are
//! plain data so new manual-page dialects can be described in YAML without
//! touching control flow. A [`DialectConfig`] is compiled once into a
//! [`Dialect`], which the parser borrows.
//!
//! # Example YAML
//!
//! ```yaml
//! dialect:
//!   headings:
//!     - { text: "OPTIONS", kind: options }
//!     - { text: "SWITCHES", kind: options }
//!   phrase_headings:
//!     - { text: "The following options are available:", kind: options }
//!   entry_start_patterns:
//!     - '^--?[[:alnum:]?#@\[]'
//! retrieval:
//!   local: true
//!   web: false
//!   timeout_ms: 5000
//! ```

use std::collections::{HashMap, HashSet};
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// Default timeout for a single manual-page retrieval (milliseconds).
pub const DEFAULT_RETRIEVAL_TIMEOUT_MS: u64 = 10_000;

/// Default remote manual-page location; the command name is appended.
pub const DEFAULT_WEB_BASE_URL: &str = "https://linux.die.net/man/1";

/// Role of a manual-page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Name,
    Synopsis,
    Description,
    /// Options-bearing section (OPTIONS and its synonyms).
    Options,
    /// Any other heading; ends the previous section.
    Other,
}

/// Maps heading text to a section role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRule {
    pub text: String,
    pub kind: SectionKind,
}

impl HeadingRule {
    fn new(text: &str, kind: SectionKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
        }
    }
}

/// Data tables describing a manual-page dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Column-0 headings, matched case-insensitively.
    pub headings: Vec<HeadingRule>,
    /// Prose lines that open a section at any indentation.
    pub phrase_headings: Vec<HeadingRule>,
    /// Regexes tested against a left-trimmed line to detect an option entry.
    pub entry_start_patterns: Vec<String>,
    /// Placeholder words reported verbatim as the value type.
    pub custom_value_words: Vec<String>,
    /// Synopsis placeholders that stand for "options", not operands.
    pub synopsis_skip_words: Vec<String>,
}

impl Default for DialectConfig {
    fn default() -> Self {
        use SectionKind::*;

        Self {
            headings: vec![
                HeadingRule::new("NAME", Name),
                HeadingRule::new("SYNOPSIS", Synopsis),
                HeadingRule::new("USAGE", Synopsis),
                HeadingRule::new("DESCRIPTION", Description),
                HeadingRule::new("OPTIONS", Options),
                HeadingRule::new("COMMAND OPTIONS", Options),
                HeadingRule::new("GLOBAL OPTIONS", Options),
                HeadingRule::new("GENERAL OPTIONS", Options),
                HeadingRule::new("FLAGS", Options),
                HeadingRule::new("SWITCHES", Options),
            ],
            phrase_headings: vec![
                HeadingRule::new("The following options are available:", Options),
                HeadingRule::new("The options are as follows:", Options),
                HeadingRule::new(
                    "Mandatory arguments to long options are mandatory for short options too.",
                    Options,
                ),
            ],
            entry_start_patterns: vec![r"^--?[[:alnum:]?#@\[]".to_string()],
            custom_value_words: [
                "pattern",
                "action",
                "format",
                "regex",
                "expression",
                "command",
                "signal",
                "url",
                "host",
                "user",
                "encoding",
                "mode",
                "type",
                "prefix",
                "suffix",
                "delimiter",
                "time",
                "date",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            synopsis_skip_words: ["option", "options", "flag", "flags", "switches"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Settings for the manual-page retrieval collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Try the local `man` viewer.
    pub local: bool,
    /// Fall back to the remote manual-page site.
    pub web: bool,
    /// Per-source timeout in milliseconds.
    pub timeout_ms: u64,
    /// Remote base URL; `/{command}` is appended.
    pub web_base_url: String,
    /// Column width requested from the local viewer.
    pub man_width: u16,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            local: true,
            web: true,
            timeout_ms: DEFAULT_RETRIEVAL_TIMEOUT_MS,
            web_base_url: DEFAULT_WEB_BASE_URL.to_string(),
            man_width: 120,
        }
    }
}

/// Top-level engine configuration, loadable from YAML.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Examples
///
/// ```
/// use manpage_schema_discovery::config::EngineConfig;
///
/// let config = EngineConfig::from_yaml_str("retrieval:\n  web: false\n").unwrap();
/// assert!(!config.retrieval.web);
/// assert!(config.retrieval.local);
/// assert!(!config.dialect.headings.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dialect: DialectConfig,
    pub retrieval: RetrievalConfig,
}

impl EngineConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](DiscoveryError::Io) if the file cannot be read, or
    /// [`Yaml`](DiscoveryError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

static STANDARD_DIALECT: LazyLock<Dialect> = LazyLock::new(|| {
    Dialect::compile(&DialectConfig::default()).expect("default dialect patterns must compile")
});

/// Compiled, immutable form of a [`DialectConfig`].
///
/// Lookup keys are pre-normalized: headings upper-cased, phrases lower-cased,
/// both whitespace-compacted with trailing `:`/`.` removed.
#[derive(Debug, Clone)]
pub struct Dialect {
    headings: HashMap<String, SectionKind>,
    phrases: HashMap<String, SectionKind>,
    entry_starts: Vec<Regex>,
    custom_words: HashSet<String>,
    synopsis_skip: HashSet<String>,
}

impl Dialect {
    /// Compiles a dialect configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPattern`](DiscoveryError::InvalidPattern) when an
    /// entry-start pattern is not a valid regular expression.
    pub fn compile(config: &DialectConfig) -> Result<Self> {
        let entry_starts = config
            .entry_start_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| DiscoveryError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            headings: config
                .headings
                .iter()
                .map(|rule| (compact_heading(&rule.text).to_ascii_uppercase(), rule.kind))
                .collect(),
            phrases: config
                .phrase_headings
                .iter()
                .map(|rule| (compact_heading(&rule.text).to_lowercase(), rule.kind))
                .collect(),
            entry_starts,
            custom_words: config
                .custom_value_words
                .iter()
                .map(|word| word.trim().to_lowercase())
                .collect(),
            synopsis_skip: config
                .synopsis_skip_words
                .iter()
                .map(|word| word.trim().to_lowercase())
                .collect(),
        })
    }

    /// Returns the built-in dialect shared by the whole process.
    pub fn standard() -> &'static Dialect {
        &STANDARD_DIALECT
    }

    /// Looks up a column-0 heading (already compacted).
    pub fn heading_kind(&self, compact: &str) -> Option<SectionKind> {
        self.headings.get(&compact.to_ascii_uppercase()).copied()
    }

    /// Looks up a phrase heading (already compacted).
    pub fn phrase_kind(&self, compact: &str) -> Option<SectionKind> {
        self.phrases.get(&compact.to_lowercase()).copied()
    }

    /// Returns `true` when a left-trimmed line opens an option entry.
    pub fn is_entry_start(&self, trimmed: &str) -> bool {
        self.entry_starts.iter().any(|re| re.is_match(trimmed))
    }

    /// Returns `true` for lexicon words reported verbatim as value types.
    pub fn is_custom_value_word(&self, word: &str) -> bool {
        self.custom_words.contains(word)
    }

    /// Returns `true` for synopsis placeholders that stand for options.
    pub fn is_synopsis_skip_word(&self, word: &str) -> bool {
        self.synopsis_skip.contains(&word.to_lowercase())
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Collapses whitespace and drops trailing `:`/`.` so headings compare
/// independent of layout.
pub fn compact_heading(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([':', '.'])
        .trim_end()
        .to_string()
}
