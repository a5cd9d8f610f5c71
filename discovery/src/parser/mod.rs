//! Manual-page parser.
//!
//! Turns rendered man-page text into a description and an ordered list of
//! parameter records. The pipeline is a chain of pure stages:
//!
//! 1. [`normalize`]: strip overstrike and ANSI escapes, drop running
//!    headers and footers
//! 2. [`sections`]: split on NAME / SYNOPSIS / DESCRIPTION / OPTIONS headings
//!    (plus the dialect's synonyms and phrase headings)
//! 3. [`description`]: command summary
//! 4. [`synopsis`]: positional operands
//! 5. [`segment`]: one entry per dash-led definition in the options span
//! 6. [`classify`] and [`infer`]: shape, name, and value type per entry
//!
//! Malformed input never fails; it yields fewer records. The primary entry
//! point is [`ManPageParser::parse`], but most consumers should use
//! [`parse_man_page`](crate::parse_man_page) instead.

pub mod classify;
pub mod description;
pub mod infer;
pub mod normalize;
pub mod sections;
pub mod segment;
pub mod synopsis;
pub(crate) mod util;

use tracing::debug;

use manpage_schema_core::{ParameterRecord, ToolSchema};

use crate::config::{Dialect, SectionKind};

/// A line of normalized text with its original line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedLine {
    pub index: usize,
    pub text: String,
}

/// Everything the parser extracted from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManExtraction {
    pub description: Option<String>,
    /// Positional records first, then option records in entry order.
    pub parameters: Vec<ParameterRecord>,
    /// Entries found in the options span; equals the option record count.
    pub entry_count: usize,
    pub positional_count: usize,
    /// Heading of the first options-bearing section.
    pub options_heading: Option<String>,
}

impl ManExtraction {
    /// Wraps the extraction into a tool schema for `command`.
    pub fn into_tool(self, command: &str) -> ToolSchema {
        ToolSchema {
            name: command.to_string(),
            description: self.description,
            parameters: self.parameters,
        }
    }
}

/// Parser for rendered manual pages.
#[derive(Debug, Clone, Copy)]
pub struct ManPageParser<'a> {
    dialect: &'a Dialect,
}

impl Default for ManPageParser<'static> {
    fn default() -> Self {
        Self::new(Dialect::standard())
    }
}

impl<'a> ManPageParser<'a> {
    /// Creates a parser over a compiled dialect.
    pub fn new(dialect: &'a Dialect) -> Self {
        Self { dialect }
    }

    /// Parses one rendered page. Deterministic and infallible.
    pub fn parse(&self, raw: &str) -> ManExtraction {
        let normalized = normalize::normalize_man_text(raw);
        let lines = normalize::to_indexed_lines(&normalized);
        let sections = sections::split_sections(&lines, self.dialect);
        debug!(
            lines = lines.len(),
            sections = ?sections
                .sections
                .iter()
                .map(|section| section.heading.as_str())
                .collect::<Vec<_>>(),
            "Split manual page into sections"
        );

        let description = description::extract_description(&sections);

        let synopsis_span = sections.span(SectionKind::Synopsis);
        let positionals = synopsis::scan_positionals(&synopsis_span, self.dialect);

        let options_span = sections.span(SectionKind::Options);
        let entries = segment::segment_entries(&options_span, self.dialect);
        if options_span.is_empty() {
            debug!("No options section found");
        }

        let positional_count = positionals.len();
        let entry_count = entries.len();
        let mut parameters = positionals;
        parameters.extend(
            entries
                .iter()
                .map(|entry| classify::classify_entry(entry, self.dialect)),
        );

        debug!(
            positional_count,
            entry_count,
            has_description = description.is_some(),
            "Classified manual page parameters"
        );

        ManExtraction {
            description,
            parameters,
            entry_count,
            positional_count,
            options_heading: sections.options_heading().map(String::from),
        }
    }
}
