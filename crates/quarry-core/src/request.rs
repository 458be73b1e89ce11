//! Repository request types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A unit of work executed against a repository connection
///
/// Requests are opaque to the connection layer; only repository sources
/// interpret them. Node properties are carried as JSON values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Read the node at the given path
    ReadNode { path: String },
    /// Create or replace the node at the given path
    WriteNode {
        path: String,
        properties: HashMap<String, Value>,
    },
    /// Remove the node at the given path
    RemoveNode { path: String },
    /// Verify that the named workspace exists
    VerifyWorkspace { name: String },
}

impl Request {
    /// Read the node at `path`
    pub fn read_node(path: impl Into<String>) -> Self {
        Self::ReadNode { path: path.into() }
    }

    /// Create or replace the node at `path` with the given properties
    pub fn write_node(path: impl Into<String>, properties: HashMap<String, Value>) -> Self {
        Self::WriteNode {
            path: path.into(),
            properties,
        }
    }

    /// Remove the node at `path`
    pub fn remove_node(path: impl Into<String>) -> Self {
        Self::RemoveNode { path: path.into() }
    }

    /// Verify that the workspace named `name` exists
    pub fn verify_workspace(name: impl Into<String>) -> Self {
        Self::VerifyWorkspace { name: name.into() }
    }
}
