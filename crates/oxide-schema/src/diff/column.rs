//! Column differences.

use serde::{Deserialize, Serialize};

use crate::asset::Identifier;
use crate::column::Column;

/// A column present on both sides of a comparison whose properties changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDiff {
    /// Name of the column before the change.
    pub old_column_name: String,
    /// The column after the change.
    pub column: Column,
    /// Names of the changed properties, such as `type`, `default` or
    /// `length`.
    pub changed_properties: Vec<String>,
    /// The column before the change.
    pub from_column: Option<Column>,
}

impl ColumnDiff {
    #[must_use]
    pub fn new(old_column_name: &str, column: Column, changed_properties: Vec<String>) -> Self {
        Self {
            old_column_name: old_column_name.to_string(),
            column,
            changed_properties,
            from_column: None,
        }
    }

    /// Returns whether `property` is among the changed properties.
    #[must_use]
    pub fn has_changed(&self, property: &str) -> bool {
        self.changed_properties.iter().any(|p| p == property)
    }

    #[must_use]
    pub fn old_column_name(&self) -> Identifier {
        Identifier::new(&self.old_column_name)
    }
}
