//! Sequences.

use serde::{Deserialize, Serialize};

use crate::asset::{Asset, Identifier};
use crate::table::Table;
use crate::visitor::Visitor;

/// A database sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    name: Identifier,
    allocation_size: u32,
    initial_value: i64,
    cache: Option<u32>,
}

impl Sequence {
    /// Creates a sequence starting at 1 with increment 1.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Identifier::new(name),
            allocation_size: 1,
            initial_value: 1,
            cache: None,
        }
    }

    #[must_use]
    pub const fn with_allocation_size(mut self, allocation_size: u32) -> Self {
        self.allocation_size = allocation_size;
        self
    }

    #[must_use]
    pub const fn with_initial_value(mut self, initial_value: i64) -> Self {
        self.initial_value = initial_value;
        self
    }

    #[must_use]
    pub const fn with_cache(mut self, cache: u32) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the increment.
    #[must_use]
    pub const fn allocation_size(&self) -> u32 {
        self.allocation_size
    }

    #[must_use]
    pub const fn initial_value(&self) -> i64 {
        self.initial_value
    }

    #[must_use]
    pub const fn cache(&self) -> Option<u32> {
        self.cache
    }

    /// Returns whether this sequence is the implicit generator behind the
    /// single-column autoincrement primary key of `table`, named
    /// `<table>_<column>_seq`.
    #[must_use]
    pub fn is_autoincrements_for(&self, table: &Table) -> bool {
        let Some(primary) = table.primary_key() else {
            return false;
        };

        let columns = primary.columns();
        let [pk_column] = columns.as_slice() else {
            return false;
        };

        if !table
            .column(pk_column)
            .is_ok_and(crate::column::Column::is_autoincrement)
        {
            return false;
        }

        let namespace = table.namespace_name();
        let sequence_name = self.shortest_name(namespace);
        let table_name = table.shortest_name(namespace);

        sequence_name == format!("{table_name}_{}_seq", pk_column.to_lowercase())
    }

    /// Dispatches this sequence to `visitor`.
    pub fn visit(&self, visitor: &mut dyn Visitor) -> crate::Result<()> {
        visitor.accept_sequence(self)
    }
}

impl Asset for Sequence {
    fn identifier(&self) -> &Identifier {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::types::ColumnType;

    fn table(autoincrement: bool) -> Table {
        let mut table = Table::new("foo").unwrap();
        table
            .add_column(Column::new("id", ColumnType::Int).with_autoincrement(autoincrement))
            .unwrap();
        table.set_primary_key(&["id"], None).unwrap();
        table
    }

    #[test]
    fn test_defaults() {
        let seq = Sequence::new("foo_seq");
        assert_eq!(seq.allocation_size(), 1);
        assert_eq!(seq.initial_value(), 1);
        assert_eq!(seq.cache(), None);
    }

    #[test]
    fn test_is_autoincrements_for() {
        let seq = Sequence::new("foo_id_seq");
        assert!(seq.is_autoincrements_for(&table(true)));
        assert!(!seq.is_autoincrements_for(&table(false)));
        assert!(!Sequence::new("other_seq").is_autoincrements_for(&table(true)));
    }

    #[test]
    fn test_is_autoincrements_for_without_primary_key() {
        let mut table = Table::new("foo").unwrap();
        table
            .add_column(Column::new("id", ColumnType::Int).with_autoincrement(true))
            .unwrap();
        assert!(!Sequence::new("foo_id_seq").is_autoincrements_for(&table));
    }
}
