//! Tool schema validation.
//!
//! Checks the structural invariants of extracted parameter records: the
//! value type appears exactly on value-taking shapes, the position exactly on
//! positional ones, positions run 1, 2, 3... without gaps, and descriptions
//! stay non-empty and bounded.
//!
//! # Examples
//!
//! ```
//! use manpage_schema_core::*;
//!
//! let mut tool = ToolSchema::new("grep");
//! tool.parameters.push(ParameterRecord::positional("PATTERN", 1));
//! tool.parameters.push(ParameterRecord::flag("-i"));
//! assert!(validate_tool(&tool).is_empty());
//!
//! // Invalid: a flag carrying a value type
//! let mut bad = ToolSchema::new("grep");
//! let mut flag = ParameterRecord::flag("-i");
//! flag.value_type = Some(ValueType::String);
//! bad.parameters.push(flag);
//! assert!(!validate_tool(&bad).is_empty());
//! ```

use thiserror::Error;

use crate::{DESCRIPTION_LIMIT, ParameterRecord, ToolCollection, ToolSchema};

/// Tool/parameter validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Tool name is empty or whitespace-only.
    #[error("tool name cannot be empty")]
    EmptyToolName,
    /// Parameter name is empty or whitespace-only.
    #[error("parameter name cannot be empty")]
    EmptyParameterName,
    /// A value-taking shape has no value type.
    #[error("missing value-type on value-taking parameter: {0}")]
    MissingValueType(String),
    /// A shape without a value carries a value type.
    #[error("unexpected value-type on parameter: {0}")]
    UnexpectedValueType(String),
    /// A positional parameter has no position.
    #[error("missing position on positional parameter: {0}")]
    MissingPosition(String),
    /// A non-positional parameter carries a position.
    #[error("unexpected position on parameter: {0}")]
    UnexpectedPosition(String),
    /// Positions are not 1, 2, 3... in order of appearance.
    #[error("positional parameter {name} has position {found}, expected {expected}")]
    PositionOutOfOrder {
        name: String,
        expected: usize,
        found: usize,
    },
    /// A description is present but empty.
    #[error("empty description on: {0}")]
    EmptyDescription(String),
    /// A description exceeds the character limit.
    #[error("description longer than 200 characters on: {0}")]
    DescriptionTooLong(String),
}

/// Validates every tool in a collection.
///
/// Stops at the first tool with errors.
pub fn validate_collection(collection: &ToolCollection) -> Vec<ValidationError> {
    for tool in &collection.tools {
        let errors = validate_tool(tool);
        if !errors.is_empty() {
            return errors;
        }
    }
    Vec::new()
}

/// Validates one tool schema and all of its parameters.
///
/// # Examples
///
/// ```
/// use manpage_schema_core::*;
///
/// // Positions must start at 1 and have no gaps
/// let mut tool = ToolSchema::new("cp");
/// tool.parameters.push(ParameterRecord::positional("SOURCE", 1));
/// tool.parameters.push(ParameterRecord::positional("DEST", 3));
/// let errors = validate_tool(&tool);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::PositionOutOfOrder { .. })));
/// ```
pub fn validate_tool(tool: &ToolSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if tool.name.trim().is_empty() {
        errors.push(ValidationError::EmptyToolName);
        return errors;
    }

    if let Some(description) = &tool.description {
        errors.extend(validate_description(&tool.name, description));
    }

    let mut expected_position = 1usize;
    for param in &tool.parameters {
        errors.extend(validate_parameter(param));
        if let Some(found) = param.position
            && param.param_type.is_positional()
        {
            if found != expected_position {
                errors.push(ValidationError::PositionOutOfOrder {
                    name: param.name.clone(),
                    expected: expected_position,
                    found,
                });
            }
            expected_position += 1;
        }
    }

    errors
}

/// Validates the shape invariants of a single record.
pub fn validate_parameter(param: &ParameterRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = param.name.as_str();

    if name.trim().is_empty() {
        errors.push(ValidationError::EmptyParameterName);
        return errors;
    }

    match (param.takes_value(), param.value_type.is_some()) {
        (true, false) => errors.push(ValidationError::MissingValueType(name.to_string())),
        (false, true) => errors.push(ValidationError::UnexpectedValueType(name.to_string())),
        _ => {}
    }

    match (param.param_type.is_positional(), param.position) {
        (true, None) | (true, Some(0)) => {
            errors.push(ValidationError::MissingPosition(name.to_string()))
        }
        (false, Some(_)) => errors.push(ValidationError::UnexpectedPosition(name.to_string())),
        _ => {}
    }

    if let Some(description) = &param.description {
        errors.extend(validate_description(name, description));
    }

    errors
}

fn validate_description(owner: &str, description: &str) -> Vec<ValidationError> {
    if description.trim().is_empty() {
        return vec![ValidationError::EmptyDescription(owner.to_string())];
    }
    if description.chars().count() > DESCRIPTION_LIMIT {
        return vec![ValidationError::DescriptionTooLong(owner.to_string())];
    }
    Vec::new()
}
