//! Output formatting and multi-tool file assembly.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use manpage_schema_core::{ParameterRecord, ToolCollection, ToolDocument, ToolSchema};

use crate::error::{DiscoveryError, Result};

/// Supported stdout formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
}

/// What [`append_to_collection`] did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The file did not exist and was created.
    Created,
    /// The tool was appended; carries the new number of tools.
    Appended(usize),
}

/// Renders one tool as `{"tool": ...}`.
pub fn render_tool(tool: &ToolSchema, format: OutputFormat, pretty: bool) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(&ToolDocument::new(tool.clone()), pretty),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&ToolDocument::new(tool.clone()))?),
        OutputFormat::Markdown => Ok(tool_to_markdown(tool)),
    }
}

/// Renders several tools as `{"tools": [...]}`.
pub fn render_collection(
    collection: &ToolCollection,
    format: OutputFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(collection, pretty),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(collection)?),
        OutputFormat::Markdown => Ok(collection
            .tools
            .iter()
            .map(tool_to_markdown)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Appends `tool` to the `tools` array of the JSON file at `path`.
///
/// A missing file is created as `{"tools": [tool]}`. An existing file must
/// parse as JSON. When its top level has no `tools` key, the contents are
/// replaced by a fresh collection. Other top-level keys survive an append.
///
/// # Errors
///
/// Returns [`Json`](DiscoveryError::Json) when the existing file is not valid
/// JSON, [`InvalidCollection`](DiscoveryError::InvalidCollection) when
/// `tools` is not an array, or [`Io`](DiscoveryError::Io) on read and write
/// failures.
pub fn append_to_collection(path: &Path, tool: &ToolSchema, pretty: bool) -> Result<AppendOutcome> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let Some(raw) = raw else {
        let collection = ToolCollection::new(vec![tool.clone()]);
        fs::write(path, to_json(&collection, pretty)?)?;
        debug!(path = %path.display(), "Created tool collection");
        return Ok(AppendOutcome::Created);
    };

    let mut document: Value = serde_json::from_str(&raw)?;
    let has_tools = document
        .as_object()
        .is_some_and(|object| object.contains_key("tools"));
    if !has_tools {
        warn!(
            path = %path.display(),
            "Existing file has no \"tools\" key; starting a new collection"
        );
        document = serde_json::json!({ "tools": [] });
    }

    let tools = document
        .get_mut("tools")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| {
            DiscoveryError::InvalidCollection(format!(
                "{}: \"tools\" is not an array",
                path.display()
            ))
        })?;
    tools.push(serde_json::to_value(tool)?);
    let count = tools.len();

    fs::write(path, to_json(&document, pretty)?)?;
    debug!(path = %path.display(), count, "Appended tool to collection");
    Ok(AppendOutcome::Appended(count))
}

fn tool_to_markdown(tool: &ToolSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", tool.name));

    if let Some(ref desc) = tool.description {
        out.push_str(&format!("{desc}\n\n"));
    }

    let positional = tool.positional().collect::<Vec<_>>();
    if !positional.is_empty() {
        out.push_str("## Arguments\n\n");
        out.push_str("| Position | Argument | Description |\n");
        out.push_str("|----------|----------|-------------|\n");
        for param in positional {
            let position = param.position.unwrap_or_default();
            let desc = param.description.as_deref().unwrap_or("");
            out.push_str(&format!("| {position} | `{}` | {desc} |\n", param.name));
        }
        out.push('\n');
    }

    let options = tool.options().collect::<Vec<_>>();
    if !options.is_empty() {
        out.push_str("## Options\n\n");
        out.push_str("| Option | Kind | Value | Description |\n");
        out.push_str("|--------|------|-------|-------------|\n");
        for param in options {
            out.push_str(&option_row(param));
        }
        out.push('\n');
    }

    out
}

fn option_row(param: &ParameterRecord) -> String {
    let value = param
        .value_type
        .as_ref()
        .map(|value| value.as_str())
        .unwrap_or("");
    let desc = param
        .description
        .as_deref()
        .unwrap_or("")
        .replace('|', "\\|");
    format!(
        "| `{}` | {} | {value} | {desc} |\n",
        param.name, param.param_type
    )
}
