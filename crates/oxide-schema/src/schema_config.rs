//! Schema-wide configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Settings shared by every table of a [`Schema`](crate::schema::Schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Whether foreign key indexes are declared explicitly by the caller.
    pub has_explicit_foreign_key_indexes: bool,
    /// Upper bound for generated identifier names.
    pub max_identifier_length: usize,
    /// Default namespace; `None` means `public`.
    pub name: Option<String>,
    /// Options applied to every table created through the schema.
    pub default_table_options: IndexMap<String, Value>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            has_explicit_foreign_key_indexes: false,
            max_identifier_length: 63,
            name: None,
            default_table_options: IndexMap::new(),
        }
    }
}

impl SchemaConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON document. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SchemaError::invalid_argument(format!("Invalid schema config: {e}")))
    }

    /// Sets the default namespace.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the maximum identifier length.
    #[must_use]
    pub const fn with_max_identifier_length(mut self, length: usize) -> Self {
        self.max_identifier_length = length;
        self
    }

    /// Adds a default table option.
    #[must_use]
    pub fn with_default_table_option(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.default_table_options
            .insert(name.to_string(), value.into());
        self
    }
}
