//! Core tool-schema types and output envelopes.
//!
//! This crate defines the structured record extracted from a Unix manual
//! page:
//!
//! - [`ToolSchema`]: a command's name, bounded description, and parameters.
//! - [`ParameterRecord`]: one parameter with its [`ParamType`] shape,
//!   optional [`ValueType`], position, and description.
//! - [`ToolDocument`] / [`ToolCollection`]: the single-tool
//!   (`{"tool": ...}`) and multi-tool (`{"tools": [...]}`) envelopes.
//!
//! Validation ([`validate_tool`], [`validate_collection`]) checks the record
//! invariants: value types only on value-taking shapes, positions only on
//! positional ones and gap-free, descriptions bounded by
//! [`DESCRIPTION_LIMIT`].
//!
//! # Example
//!
//! ```
//! use manpage_schema_core::*;
//!
//! let mut tool = ToolSchema::new("grep").with_description("file pattern searcher");
//! tool.parameters.push(ParameterRecord::positional("PATTERN", 1));
//! tool.parameters.push(
//!     ParameterRecord::flag("-i").with_description("Perform case insensitive matching."),
//! );
//! tool.parameters.push(ParameterRecord::valued(
//!     "--color=when",
//!     ParamType::OptionEquals,
//!     ValueType::String,
//! ));
//!
//! assert!(validate_tool(&tool).is_empty());
//! let json = serde_json::to_value(ToolDocument::new(tool)).unwrap();
//! assert_eq!(json["tool"]["parameters"][2]["param-type"], "option-equals");
//! ```

mod package;
mod types;
mod validate;

pub use package::{ToolCollection, ToolDocument};
pub use types::*;
pub use validate::{ValidationError, validate_collection, validate_parameter, validate_tool};
