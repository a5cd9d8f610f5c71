//! Tool and parameter type definitions.
//!
//! This module defines the data model produced by man-page extraction: a
//! [`ToolSchema`] holding an optional command description and an ordered list
//! of [`ParameterRecord`]s. The types serialize with [`serde`] using the fixed
//! kebab-case field names of the output contract (`param-type`,
//! `value-type`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of any description field.
pub const DESCRIPTION_LIMIT: usize = 200;

/// Syntactic shape of a parameter.
///
/// # Examples
///
/// ```
/// use manpage_schema_core::ParamType;
///
/// assert!(ParamType::OptionEquals.takes_value());
/// assert!(!ParamType::Flag.takes_value());
/// assert_eq!(ParamType::OptionKvColon.as_str(), "option-kv-colon");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamType {
    /// Non-dash operand taken from the synopsis (`FILE`, `<path>`).
    Positional,
    /// Dash token without a value (`-v`, `--verbose`).
    Flag,
    /// Dash token followed by a separate value (`-o file`).
    Option,
    /// Long token with an attached `=value` (`--color=when`).
    OptionEquals,
    /// Value shaped as `key=value` (`--cookie name=value`).
    OptionKvEquals,
    /// Value shaped as `key:value` (`-A user:pass`).
    OptionKvColon,
}

impl ParamType {
    /// Every shape, in declaration order.
    pub const ALL: [ParamType; 6] = [
        ParamType::Positional,
        ParamType::Flag,
        ParamType::Option,
        ParamType::OptionEquals,
        ParamType::OptionKvEquals,
        ParamType::OptionKvColon,
    ];

    /// Returns `true` for shapes that carry a value and therefore a
    /// [`ValueType`].
    pub fn takes_value(self) -> bool {
        matches!(
            self,
            ParamType::Option
                | ParamType::OptionEquals
                | ParamType::OptionKvEquals
                | ParamType::OptionKvColon
        )
    }

    /// Returns `true` for the positional shape, the only one with a position.
    pub fn is_positional(self) -> bool {
        self == ParamType::Positional
    }

    /// Wire label of the shape.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::Positional => "positional",
            ParamType::Flag => "flag",
            ParamType::Option => "option",
            ParamType::OptionEquals => "option-equals",
            ParamType::OptionKvEquals => "option-kv-equals",
            ParamType::OptionKvColon => "option-kv-colon",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred semantic type of a parameter value.
///
/// Serializes as a bare string. Well-known categories map to fixed labels;
/// anything else is carried as a lower-cased [`Custom`](ValueType::Custom)
/// word.
///
/// # Examples
///
/// ```
/// use manpage_schema_core::ValueType;
///
/// assert_eq!(ValueType::from("file-path"), ValueType::FilePath);
/// assert_eq!(ValueType::from("Pattern"), ValueType::Custom("pattern".into()));
/// assert_eq!(ValueType::Number.as_str(), "number");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    /// Path to a file.
    FilePath,
    /// Path to a directory.
    Directory,
    /// Numeric value.
    Number,
    /// Process identifier.
    Pid,
    /// Free-form string (the fallback).
    #[default]
    String,
    /// Recognized placeholder word used verbatim (e.g. `pattern`).
    Custom(String),
}

impl ValueType {
    pub fn as_str(&self) -> &str {
        match self {
            ValueType::FilePath => "file-path",
            ValueType::Directory => "directory",
            ValueType::Number => "number",
            ValueType::Pid => "pid",
            ValueType::String => "string",
            ValueType::Custom(word) => word.as_str(),
        }
    }
}

impl From<&str> for ValueType {
    fn from(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "file-path" => ValueType::FilePath,
            "directory" => ValueType::Directory,
            "number" => ValueType::Number,
            "pid" => ValueType::Pid,
            "string" | "" => ValueType::String,
            _ => ValueType::Custom(lower),
        }
    }
}

impl From<String> for ValueType {
    fn from(raw: String) -> Self {
        ValueType::from(raw.as_str())
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        match value {
            ValueType::Custom(word) => word,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameter of a tool.
///
/// Records are built through the shape-specific constructors so that
/// `value-type` only appears on value-taking shapes and `position` only on
/// positional ones.
///
/// # Examples
///
/// ```
/// use manpage_schema_core::{ParamType, ParameterRecord, ValueType};
///
/// let output = ParameterRecord::valued("-o", ParamType::Option, ValueType::FilePath)
///     .with_description("Write output to file.");
/// assert_eq!(output.value_type, Some(ValueType::FilePath));
///
/// let json = serde_json::to_string(&output).unwrap();
/// assert_eq!(
///     json,
///     r#"{"name":"-o","param-type":"option","value-type":"file-path","description":"Write output to file."}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// Literal token as written (e.g. `-i`, `--color=when`, `FILE`).
    pub name: String,
    /// Syntactic shape.
    #[serde(rename = "param-type")]
    pub param_type: ParamType,
    /// Inferred value type; present only for value-taking shapes.
    #[serde(rename = "value-type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    /// 1-based ordinal among positional parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Bounded description; never empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterRecord {
    /// Creates a flag (no value).
    pub fn flag(name: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Flag,
            value_type: None,
            position: None,
            description: None,
        }
    }

    /// Creates a record for a value-taking shape.
    ///
    /// A non-value shape passed here still yields a consistent record: the
    /// value type is dropped.
    pub fn valued(name: &str, param_type: ParamType, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            value_type: param_type.takes_value().then_some(value_type),
            position: None,
            description: None,
        }
    }

    /// Creates a positional parameter at the given 1-based position.
    ///
    /// # Examples
    ///
    /// ```
    /// use manpage_schema_core::{ParamType, ParameterRecord};
    ///
    /// let file = ParameterRecord::positional("FILE", 1);
    /// assert_eq!(file.param_type, ParamType::Positional);
    /// assert_eq!(file.position, Some(1));
    /// assert!(file.value_type.is_none());
    /// ```
    pub fn positional(name: &str, position: usize) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::Positional,
            value_type: None,
            position: Some(position.max(1)),
            description: None,
        }
    }

    /// Sets the description, collapsing whitespace and truncating to
    /// [`DESCRIPTION_LIMIT`]. Blank text clears it.
    pub fn with_description(mut self, text: &str) -> Self {
        self.description = bounded_description(text);
        self
    }

    /// Returns `true` when the record carries a value.
    pub fn takes_value(&self) -> bool {
        self.param_type.takes_value()
    }
}

/// Schema for one tool: its name, description, and parameters.
///
/// # Examples
///
/// ```
/// use manpage_schema_core::{ParameterRecord, ToolSchema};
///
/// let mut tool = ToolSchema::new("grep").with_description("file pattern searcher");
/// tool.parameters.push(ParameterRecord::positional("PATTERN", 1));
/// tool.parameters.push(ParameterRecord::flag("-i"));
///
/// assert_eq!(tool.positional().count(), 1);
/// assert!(tool.find_parameter("-i").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Command name.
    pub name: String,
    /// Bounded command summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Positional parameters first, then options in source order.
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
}

impl ToolSchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the bounded description (see [`bounded_description`]).
    pub fn with_description(mut self, text: &str) -> Self {
        self.description = bounded_description(text);
        self
    }

    /// Iterates positional parameters in position order.
    pub fn positional(&self) -> impl Iterator<Item = &ParameterRecord> {
        self.parameters
            .iter()
            .filter(|param| param.param_type.is_positional())
    }

    /// Iterates dash-prefixed parameters in source order.
    pub fn options(&self) -> impl Iterator<Item = &ParameterRecord> {
        self.parameters
            .iter()
            .filter(|param| !param.param_type.is_positional())
    }

    /// Finds a parameter by its literal name.
    pub fn find_parameter(&self, name: &str) -> Option<&ParameterRecord> {
        self.parameters.iter().find(|param| param.name == name)
    }
}

/// Collapses whitespace runs and truncates to [`DESCRIPTION_LIMIT`]
/// characters. Returns `None` when nothing but whitespace remains.
///
/// # Examples
///
/// ```
/// use manpage_schema_core::{DESCRIPTION_LIMIT, bounded_description};
///
/// assert_eq!(
///     bounded_description("  print   lines\n  matching a pattern "),
///     Some("print lines matching a pattern".to_string())
/// );
/// assert_eq!(bounded_description(" \n\t"), None);
///
/// let long = "word ".repeat(100);
/// let cut = bounded_description(&long).unwrap();
/// assert!(cut.chars().count() <= DESCRIPTION_LIMIT);
/// ```
pub fn bounded_description(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated = collapsed
        .chars()
        .take(DESCRIPTION_LIMIT)
        .collect::<String>();
    let trimmed = truncated.trim_end();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
