//! Construction options for a layered stack.

use crate::loader::parse_object;
use crate::{KeyPolicy, StackError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Options fixed at construction and re-applied on every reset.
///
/// Field names accept the camelCase spelling (`caseSensitive`, `layers`)
/// when loaded from JSON5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StackOptions {
    /// Keep keys that differ only by case distinct (default `true`).
    pub case_sensitive: bool,
    /// Number of empty layers created by a reset (default `1`).
    pub layers: usize,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            layers: 1,
        }
    }
}

impl StackOptions {
    /// Create options with defaults applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle case-sensitive keys.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Set the number of initial empty layers.
    pub fn with_layers(mut self, layers: usize) -> Self {
        self.layers = layers;
        self
    }

    /// Key policy implied by these options.
    pub fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::from_case_sensitive(self.case_sensitive)
    }

    /// Load options from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, StackError> {
        debug!("loading stack options from raw contents (len={})", contents.len());
        let map = parse_object(contents, "options")?;
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    /// Load options from a JSON5 file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, StackError> {
        let path = path.as_ref();
        info!("loading stack options from path: {}", path.display());
        let contents = fs::read_to_string(path).map_err(StackError::ReadFailed)?;
        Self::load_from_str(&contents)
    }
}
