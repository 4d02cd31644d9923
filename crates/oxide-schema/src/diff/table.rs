//! Table differences.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ColumnDiff;
use crate::asset::{Asset, Identifier};
use crate::column::Column;
use crate::foreign_key::ForeignKeyConstraint;
use crate::index::Index;
use crate::platform::Platform;
use crate::table::Table;

/// Everything that changed on one table.
///
/// Column and index maps are keyed by lowercased name. Renamed entries are
/// keyed by the old name and hold the new definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDiff {
    pub name: String,
    pub new_name: Option<String>,
    pub added_columns: IndexMap<String, Column>,
    pub changed_columns: IndexMap<String, ColumnDiff>,
    pub removed_columns: IndexMap<String, Column>,
    pub renamed_columns: IndexMap<String, Column>,
    pub added_indexes: IndexMap<String, Index>,
    pub changed_indexes: IndexMap<String, Index>,
    pub removed_indexes: IndexMap<String, Index>,
    pub renamed_indexes: IndexMap<String, Index>,
    pub added_foreign_keys: Vec<ForeignKeyConstraint>,
    pub changed_foreign_keys: Vec<ForeignKeyConstraint>,
    pub removed_foreign_keys: Vec<ForeignKeyConstraint>,
    /// The table before the change.
    pub from_table: Option<Table>,
}

impl TableDiff {
    /// Creates an empty diff for `name`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Returns the table name, taken from the original table when known so
    /// that its quoting survives.
    #[must_use]
    pub fn name<P: Platform + ?Sized>(&self, platform: &P) -> Identifier {
        match &self.from_table {
            Some(table) => Identifier::new(&table.quoted_name(platform)),
            None => Identifier::new(&self.name),
        }
    }

    /// Returns the target name when the table is renamed.
    #[must_use]
    pub fn new_name(&self) -> Option<Identifier> {
        self.new_name.as_deref().map(Identifier::new)
    }

    /// Returns whether the diff carries no change at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_name.is_none()
            && self.added_columns.is_empty()
            && self.changed_columns.is_empty()
            && self.removed_columns.is_empty()
            && self.renamed_columns.is_empty()
            && self.added_indexes.is_empty()
            && self.changed_indexes.is_empty()
            && self.removed_indexes.is_empty()
            && self.renamed_indexes.is_empty()
            && self.added_foreign_keys.is_empty()
            && self.changed_foreign_keys.is_empty()
            && self.removed_foreign_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MySqlPlatform;

    #[test]
    fn test_name_prefers_from_table() {
        let platform = MySqlPlatform::new();
        let mut diff = TableDiff::new("order");
        assert_eq!(diff.name(&platform).name(), "order");

        diff.from_table = Some(Table::new("order").unwrap());
        let name = diff.name(&platform);
        assert!(name.is_quoted());
        assert_eq!(name.quoted_name(&platform), "`order`");
    }

    #[test]
    fn test_new_name() {
        let mut diff = TableDiff::new("foo");
        assert!(diff.new_name().is_none());
        assert!(diff.is_empty());
        diff.new_name = Some("bar".into());
        assert_eq!(diff.new_name().map(|n| n.name()), Some("bar".to_string()));
        assert!(!diff.is_empty());
    }
}
