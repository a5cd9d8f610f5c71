//! Structured tool schemas from Unix manual pages.
//!
//! This crate turns the rendered text of a manual page into a
//! [`ToolSchema`]: the command's description plus an ordered list of
//! parameter records, each classified by shape (flag, option, option with
//! `=`, key-value forms, positional operand) and, when it takes a value, by
//! value type.
//!
//! # Main entry points
//!
//! - [`parse_man_page`]: parse already-rendered man-page text. Pure, never
//!   fails, runs no commands.
//! - [`parse_man_page_with`]: same, with a custom [`Dialect`].
//! - [`extractor::extract_tool_schema`]: retrieve the page (local `man`, then
//!   the web) and parse it.
//! - [`output::append_to_collection`]: accumulate tools into a multi-tool
//!   JSON file.
//!
//! # Example
//!
//! ```
//! use manpage_schema_discovery::parse_man_page;
//! use manpage_schema_core::{ParamType, ValueType};
//!
//! let page = "\
//! NAME
//!      demo - frobnicate files
//!
//! SYNOPSIS
//!      demo [-iv] [-o file] FILE
//!
//! OPTIONS
//!      -i      Perform case insensitive matching.
//!      -o file   Write output to file.
//!      --color=when   Mark up matching text.
//! ";
//!
//! let tool = parse_man_page("demo", page);
//! assert_eq!(tool.description.as_deref(), Some("frobnicate files"));
//!
//! let file = tool.find_parameter("FILE").unwrap();
//! assert_eq!(file.param_type, ParamType::Positional);
//! assert_eq!(file.position, Some(1));
//!
//! let output = tool.find_parameter("-o").unwrap();
//! assert_eq!(output.param_type, ParamType::Option);
//! assert_eq!(output.value_type, Some(ValueType::FilePath));
//! ```
//!
//! [`ToolSchema`]: manpage_schema_core::ToolSchema

pub mod config;
pub mod error;
pub mod extractor;
pub mod output;
pub mod parser;
pub mod retrieve;

use manpage_schema_core::ToolSchema;

pub use config::{Dialect, DialectConfig, EngineConfig, RetrievalConfig, SectionKind};
pub use error::{DiscoveryError, Result};
pub use output::{AppendOutcome, OutputFormat};
pub use parser::{ManExtraction, ManPageParser};

/// Parses rendered man-page text with the built-in dialect.
///
/// Positional operands from SYNOPSIS come first, then one record per option
/// entry in source order. Malformed input yields fewer records, never an
/// error.
pub fn parse_man_page(command: &str, raw: &str) -> ToolSchema {
    parse_man_page_with(command, raw, Dialect::standard())
}

/// Parses rendered man-page text with a caller-supplied dialect.
pub fn parse_man_page_with(command: &str, raw: &str, dialect: &Dialect) -> ToolSchema {
    ManPageParser::new(dialect).parse(raw).into_tool(command)
}
