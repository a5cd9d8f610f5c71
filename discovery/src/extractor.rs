//! Tool-schema extraction from installed or published manual pages.
//!
//! Retrieves the page for a command through the configured
//! [`ManPageSource`]s, then runs the parser over it.
//!
//! # Example
//!
//! ```no_run
//! use manpage_schema_discovery::config::EngineConfig;
//! use manpage_schema_discovery::extractor::extract_tool_schema;
//!
//! let tool = extract_tool_schema("grep", &EngineConfig::default()).unwrap();
//! println!("{} has {} parameters", tool.name, tool.parameters.len());
//! ```

use rayon::prelude::*;
use tracing::{debug, info, warn};

use manpage_schema_core::ToolSchema;

use crate::config::{Dialect, EngineConfig};
use crate::error::{DiscoveryError, Result};
use crate::parser::ManPageParser;
use crate::retrieve::{ManPageSource, sources_for, validate_command_name};

/// Fetches the first non-empty page for `command` from `sources`.
///
/// # Errors
///
/// Returns [`ManPageNotFound`](DiscoveryError::ManPageNotFound) when no source
/// has a page. A failing source is logged and the next one is tried; its
/// error is returned only if no later source succeeds.
pub fn retrieve_man_page(command: &str, sources: &[Box<dyn ManPageSource>]) -> Result<String> {
    validate_command_name(command)?;

    let mut last_error = None;
    for source in sources {
        match source.fetch(command) {
            Ok(Some(page)) if !page.trim().is_empty() => {
                info!(command, source = source.label(), bytes = page.len(), "Retrieved man page");
                return Ok(page);
            }
            Ok(_) => {
                debug!(command, source = source.label(), "No man page from source");
            }
            Err(e) => {
                warn!(command, source = source.label(), error = %e, "Man page source failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| DiscoveryError::ManPageNotFound(command.to_string())))
}

/// Extracts the schema of one command.
///
/// # Errors
///
/// Fails on an invalid dialect configuration, an invalid command name, or
/// when no page can be retrieved.
pub fn extract_tool_schema(command: &str, config: &EngineConfig) -> Result<ToolSchema> {
    let dialect = Dialect::compile(&config.dialect)?;
    let sources = sources_for(&config.retrieval);
    extract_with(command, &dialect, &sources)
}

fn extract_with(
    command: &str,
    dialect: &Dialect,
    sources: &[Box<dyn ManPageSource>],
) -> Result<ToolSchema> {
    let page = retrieve_man_page(command, sources)?;
    let extraction = ManPageParser::new(dialect).parse(&page);
    if extraction.entry_count == 0 {
        warn!(command, "Man page has no option entries");
    }
    Ok(extraction.into_tool(command))
}

/// Extracts schemas for several commands in parallel.
///
/// The dialect and sources are built once and shared by every command.
/// Results keep the input order; one command's failure does not affect the
/// others.
///
/// # Errors
///
/// Fails up front on an invalid dialect configuration.
pub fn extract_many(
    commands: &[String],
    config: &EngineConfig,
) -> Result<Vec<(String, Result<ToolSchema>)>> {
    let dialect = Dialect::compile(&config.dialect)?;
    let sources = sources_for(&config.retrieval);
    Ok(extract_many_with(commands, &dialect, &sources))
}

fn extract_many_with(
    commands: &[String],
    dialect: &Dialect,
    sources: &[Box<dyn ManPageSource>],
) -> Vec<(String, Result<ToolSchema>)> {
    commands
        .par_iter()
        .map(|command| (command.clone(), extract_with(command, dialect, sources)))
        .collect()
}
