use serde::{Deserialize, Serialize};

use crate::ToolSchema;

/// Single-tool output envelope: `{"tool": {...}}`.
///
/// # Examples
///
/// ```
/// use manpage_schema_core::*;
///
/// let doc = ToolDocument::new(ToolSchema::new("grep"));
/// let json = serde_json::to_string(&doc).unwrap();
/// assert_eq!(json, r#"{"tool":{"name":"grep","parameters":[]}}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDocument {
    pub tool: ToolSchema,
}

impl ToolDocument {
    pub fn new(tool: ToolSchema) -> Self {
        Self { tool }
    }
}

/// Multi-tool output envelope: `{"tools": [...]}`.
///
/// A collection groups the schemas of several commands, typically grown one
/// command at a time by appending to a file on disk.
///
/// # Examples
///
/// ```
/// use manpage_schema_core::*;
///
/// let mut collection = ToolCollection::default();
/// collection.push(ToolSchema::new("grep"));
/// collection.push(ToolSchema::new("curl"));
///
/// assert_eq!(collection.len(), 2);
/// assert!(collection.find("curl").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolCollection {
    #[serde(default)]
    pub tools: Vec<ToolSchema>,
}

impl ToolCollection {
    pub fn new(tools: Vec<ToolSchema>) -> Self {
        Self { tools }
    }

    /// Appends a tool; duplicates are kept, matching append-only file use.
    pub fn push(&mut self, tool: ToolSchema) {
        self.tools.push(tool);
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns the first tool with the given name.
    pub fn find(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.iter().find(|tool| tool.name == name)
    }
}

impl FromIterator<ToolSchema> for ToolCollection {
    fn from_iter<I: IntoIterator<Item = ToolSchema>>(iter: I) -> Self {
        Self {
            tools: iter.into_iter().collect(),
        }
    }
}
