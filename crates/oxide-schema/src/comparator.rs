//! Schema comparison.
//!
//! The [`Comparator`] walks two schemas and records what has to change to
//! turn the first into the second. It is a pure function of its inputs: the
//! compared schemas are never mutated and the produced diffs own clones of
//! the affected assets.
//!
//! # Renames
//!
//! Columns and indexes that were removed and re-added under another name
//! with an otherwise identical definition are reported as renames, but only
//! when exactly one candidate exists. Ambiguous candidates stay a plain
//! drop and add.

use indexmap::IndexMap;
use tracing::info;

use crate::asset::{normalize_identifier, Asset};
use crate::column::Column;
use crate::diff::{ColumnDiff, SchemaDiff, TableDiff};
use crate::foreign_key::ForeignKeyConstraint;
use crate::index::Index;
use crate::schema::Schema;
use crate::sequence::Sequence;
use crate::table::Table;
use crate::types::TypeCategory;

/// Length assumed for string and binary columns without one.
const DEFAULT_LENGTH: u32 = 255;

/// Precision assumed for decimal columns without one.
const DEFAULT_PRECISION: u32 = 10;

/// Computes the differences between schemas, tables and their assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator;

impl Comparator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Shorthand for `Comparator::new().compare(from, to)`.
    #[must_use]
    pub fn compare_schemas(from: &Schema, to: &Schema) -> SchemaDiff {
        Self::new().compare(from, to)
    }

    /// Returns the changes turning `from` into `to`.
    #[must_use]
    pub fn compare(&self, from: &Schema, to: &Schema) -> SchemaDiff {
        let mut diff = SchemaDiff {
            from_schema: Some(from.clone()),
            ..SchemaDiff::default()
        };

        for namespace in to.namespaces().values() {
            if !from.has_namespace(namespace) {
                diff.new_namespaces
                    .insert(namespace.clone(), namespace.clone());
            }
        }
        for namespace in from.namespaces().values() {
            if !to.has_namespace(namespace) {
                diff.removed_namespaces
                    .insert(namespace.clone(), namespace.clone());
            }
        }

        let to_name = to.name();
        for table in to.tables().values() {
            let name = table.shortest_name(Some(to_name.as_str()));
            match from.table(&name) {
                Err(_) => {
                    diff.new_tables.insert(name, table.clone());
                }
                Ok(from_table) => {
                    if let Some(table_diff) = self.diff_table(from_table, table) {
                        diff.changed_tables.insert(name, table_diff);
                    }
                }
            }
        }

        let from_name = from.name();
        let mut foreign_keys_to_table: IndexMap<String, Vec<&ForeignKeyConstraint>> =
            IndexMap::new();
        for table in from.tables().values() {
            let name = table.shortest_name(Some(from_name.as_str()));
            if !to.has_table(&name) {
                diff.removed_tables.insert(name, table.clone());
            }

            for fk in table.foreign_keys().values() {
                foreign_keys_to_table
                    .entry(fk.foreign_table_name().to_lowercase())
                    .or_default()
                    .push(fk);
            }
        }

        for name in diff.removed_tables.keys() {
            let Some(orphans) = foreign_keys_to_table.get(name) else {
                continue;
            };

            for fk in orphans {
                diff.orphaned_foreign_keys.push((*fk).clone());

                // The orphan drop already covers it on the local table.
                let local = fk.local_table_name().unwrap_or_default().to_lowercase();
                if let Some(changed) = diff.changed_tables.get_mut(&local) {
                    changed.removed_foreign_keys.retain(|removed| removed != *fk);
                }
            }
        }

        for sequence in to.sequences().values() {
            let name = sequence.shortest_name(Some(to_name.as_str()));
            match from.sequence(&name) {
                Err(_) => {
                    if !Self::is_autoincrement_sequence_in_schema(from, sequence) {
                        diff.new_sequences.push(sequence.clone());
                    }
                }
                Ok(from_sequence) => {
                    if self.diff_sequence(sequence, from_sequence) {
                        diff.changed_sequences.push(sequence.clone());
                    }
                }
            }
        }
        for sequence in from.sequences().values() {
            if Self::is_autoincrement_sequence_in_schema(to, sequence) {
                continue;
            }
            if !to.has_sequence(&sequence.shortest_name(Some(from_name.as_str()))) {
                diff.removed_sequences.push(sequence.clone());
            }
        }

        info!(
            new_tables = diff.new_tables.len(),
            changed_tables = diff.changed_tables.len(),
            removed_tables = diff.removed_tables.len(),
            new_sequences = diff.new_sequences.len(),
            changed_sequences = diff.changed_sequences.len(),
            removed_sequences = diff.removed_sequences.len(),
            orphaned_foreign_keys = diff.orphaned_foreign_keys.len(),
            "Compared schemas"
        );

        diff
    }

    fn is_autoincrement_sequence_in_schema(schema: &Schema, sequence: &Sequence) -> bool {
        schema
            .tables()
            .values()
            .any(|table| sequence.is_autoincrements_for(table))
    }

    /// Returns whether the sequences differ in allocation size or initial
    /// value.
    #[must_use]
    pub fn diff_sequence(&self, sequence1: &Sequence, sequence2: &Sequence) -> bool {
        sequence1.allocation_size() != sequence2.allocation_size()
            || sequence1.initial_value() != sequence2.initial_value()
    }

    /// Returns the changes turning `table1` into `table2`, or `None` when
    /// they are equivalent.
    #[must_use]
    pub fn diff_table(&self, table1: &Table, table2: &Table) -> Option<TableDiff> {
        let mut diff = TableDiff::new(&table1.name());
        diff.from_table = Some(table1.clone());

        for column in table2.columns() {
            if !table1.has_column(&column.name()) {
                diff.added_columns
                    .insert(normalize_identifier(&column.name()), column.clone());
            }
        }

        for column in table1.columns() {
            let key = normalize_identifier(&column.name());
            let Ok(other) = table2.column(&column.name()) else {
                diff.removed_columns.insert(key, column.clone());
                continue;
            };

            let changed = self.diff_column(column, other);
            if !changed.is_empty() {
                let mut column_diff = ColumnDiff::new(&column.name(), other.clone(), changed);
                column_diff.from_column = Some(column.clone());
                diff.changed_columns.insert(key, column_diff);
            }
        }

        self.detect_column_renamings(&mut diff);

        for (key, index) in table2.indexes() {
            if (index.is_primary() && table1.has_primary_key()) || table1.has_index(key) {
                continue;
            }
            diff.added_indexes.insert(key.clone(), index.clone());
        }

        for (key, index) in table1.indexes() {
            let counterpart = if index.is_primary() {
                table2.primary_key()
            } else {
                table2.indexes().get(key)
            };

            match counterpart {
                None => {
                    diff.removed_indexes.insert(key.clone(), index.clone());
                }
                Some(other) if self.diff_index(index, other) => {
                    diff.changed_indexes.insert(key.clone(), other.clone());
                }
                Some(_) => {}
            }
        }

        self.detect_index_renamings(&mut diff);

        let mut to_keys: Vec<&ForeignKeyConstraint> = table2.foreign_keys().values().collect();
        for fk in table1.foreign_keys().values() {
            let matched = to_keys.iter().position(|other| {
                !self.diff_foreign_key(fk, other) || fk.name().to_lowercase() == other.name().to_lowercase()
            });

            match matched {
                Some(position) => {
                    let other = to_keys.remove(position);
                    if self.diff_foreign_key(fk, other) {
                        diff.changed_foreign_keys.push(other.clone());
                    }
                }
                None => diff.removed_foreign_keys.push(fk.clone()),
            }
        }
        diff.added_foreign_keys
            .extend(to_keys.into_iter().cloned());

        if diff.is_empty() {
            None
        } else {
            Some(diff)
        }
    }

    /// Moves unambiguous drop and add pairs of identical columns into
    /// `renamed_columns`.
    fn detect_column_renamings(&self, diff: &mut TableDiff) {
        let candidates = rename_candidates(&diff.added_columns, &diff.removed_columns, |a, r| {
            self.diff_column(a, r).is_empty()
        });

        for (removed_key, added_key) in candidates {
            if diff.renamed_columns.contains_key(&removed_key) {
                continue;
            }
            let Some(added) = diff.added_columns.shift_remove(&added_key) else {
                continue;
            };
            diff.removed_columns.shift_remove(&removed_key);
            diff.renamed_columns.insert(removed_key, added);
        }
    }

    /// Moves unambiguous drop and add pairs of equivalent indexes into
    /// `renamed_indexes`.
    fn detect_index_renamings(&self, diff: &mut TableDiff) {
        let candidates = rename_candidates(&diff.added_indexes, &diff.removed_indexes, |a, r| {
            !self.diff_index(a, r)
        });

        for (removed_key, added_key) in candidates {
            if diff.renamed_indexes.contains_key(&removed_key) {
                continue;
            }
            let Some(added) = diff.added_indexes.shift_remove(&added_key) else {
                continue;
            };
            diff.removed_indexes.shift_remove(&removed_key);
            diff.renamed_indexes.insert(removed_key, added);
        }
    }

    /// Returns whether the foreign keys differ in columns, target table or
    /// referential actions.
    #[must_use]
    pub fn diff_foreign_key(&self, key1: &ForeignKeyConstraint, key2: &ForeignKeyConstraint) -> bool {
        let lower = |columns: Vec<String>| -> Vec<String> {
            columns.iter().map(|c| c.to_lowercase()).collect()
        };

        lower(key1.unquoted_local_columns()) != lower(key2.unquoted_local_columns())
            || lower(key1.unquoted_foreign_columns()) != lower(key2.unquoted_foreign_columns())
            || key1.unqualified_foreign_table_name() != key2.unqualified_foreign_table_name()
            || key1.on_update() != key2.on_update()
            || key1.on_delete() != key2.on_delete()
    }

    /// Returns the names of the properties that differ between the columns.
    ///
    /// An empty list means the columns are equivalent.
    #[must_use]
    pub fn diff_column(&self, column1: &Column, column2: &Column) -> Vec<String> {
        let mut changed: Vec<&str> = Vec::new();

        if column1.is_notnull() != column2.is_notnull() {
            changed.push("notnull");
        }
        if column1.is_unsigned() != column2.is_unsigned() {
            changed.push("unsigned");
        }
        if column1.is_autoincrement() != column2.is_autoincrement() {
            changed.push("autoincrement");
        }
        if column1.column_type().name() != column2.column_type().name() {
            changed.push("type");
        }

        let default_changed = match (column1.default_value(), column2.default_value()) {
            (None, None) => false,
            (Some(a), Some(b)) => !a.loose_eq(b),
            _ => true,
        };
        if default_changed {
            changed.push("default");
        }

        let category = column1.column_type().category();
        if category.has_length() {
            let length = |c: &Column| c.length().filter(|l| *l > 0).unwrap_or(DEFAULT_LENGTH);
            if length(column1) != length(column2) {
                changed.push("length");
            }
            if column1.is_fixed() != column2.is_fixed() {
                changed.push("fixed");
            }
        }

        if category == TypeCategory::Decimal {
            let precision = |c: &Column| match c.precision() {
                0 => DEFAULT_PRECISION,
                p => p,
            };
            if precision(column1) != precision(column2) {
                changed.push("precision");
            }
            if column1.scale() != column2.scale() {
                changed.push("scale");
            }
        }

        if column1.comment().unwrap_or_default() != column2.comment().unwrap_or_default() {
            changed.push("comment");
        }

        let options1 = column1.custom_schema_options();
        let options2 = column2.custom_schema_options();
        for key in options1.keys().chain(options2.keys()) {
            if options1.get(key) != options2.get(key) {
                changed.push(key);
            }
        }

        let platform1 = column1.platform_options();
        let platform2 = column2.platform_options();
        for (key, value) in platform1 {
            if platform2.get(key).is_some_and(|other| other != value) {
                changed.push(key);
            }
        }

        let mut result: Vec<String> = Vec::with_capacity(changed.len());
        for property in changed {
            if !result.iter().any(|p| p == property) {
                result.push(property.to_string());
            }
        }
        result
    }

    /// Returns whether the indexes are not interchangeable.
    #[must_use]
    pub fn diff_index(&self, index1: &Index, index2: &Index) -> bool {
        !(index1.is_fullfilled_by(index2) && index2.is_fullfilled_by(index1))
    }
}

/// Pairs each added item with the removed items it is identical to, keeping
/// only added items with exactly one candidate. Returns `(removed, added)`
/// keys.
fn rename_candidates<T: Asset>(
    added: &IndexMap<String, T>,
    removed: &IndexMap<String, T>,
    same: impl Fn(&T, &T) -> bool,
) -> Vec<(String, String)> {
    let mut groups: IndexMap<String, Vec<(String, String)>> = IndexMap::new();

    for (added_key, added_item) in added {
        let group = groups.entry(added_item.name()).or_default();
        for (removed_key, removed_item) in removed {
            if same(added_item, removed_item) {
                group.push((removed_key.clone(), added_key.clone()));
            }
        }
    }

    groups
        .into_values()
        .filter_map(|group| match group.as_slice() {
            [single] => Some(single.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;
    use serde_json::json;

    fn table_with(name: &str, columns: &[Column]) -> Table {
        let mut table = Table::new(name).unwrap();
        for column in columns {
            table.add_column(column.clone()).unwrap();
        }
        table
    }

    #[test]
    fn test_diff_column_equal() {
        let c = Comparator::new();
        let a = Column::new("a", ColumnType::VarChar).with_length(255);
        let b = Column::new("a", ColumnType::VarChar);
        assert!(c.diff_column(&a, &b).is_empty());
    }

    #[test]
    fn test_diff_column_property_order() {
        let c = Comparator::new();
        let a = Column::new("a", ColumnType::Int);
        let b = Column::new("a", ColumnType::BigInt)
            .nullable()
            .with_unsigned(true)
            .with_default(1);
        assert_eq!(
            c.diff_column(&a, &b),
            vec!["notnull", "unsigned", "type", "default"]
        );
    }

    #[test]
    fn test_diff_column_default_null_is_a_change() {
        let c = Comparator::new();
        let a = Column::new("a", ColumnType::Int).with_default(0);
        let b = Column::new("a", ColumnType::Int);
        assert_eq!(c.diff_column(&a, &b), vec!["default"]);

        let a = Column::new("a", ColumnType::Int).with_default("1");
        let b = Column::new("a", ColumnType::Int).with_default(1);
        assert!(c.diff_column(&a, &b).is_empty());
    }

    #[test]
    fn test_diff_column_length_and_precision() {
        let c = Comparator::new();
        let a = Column::new("a", ColumnType::VarChar).with_length(50);
        let b = Column::new("a", ColumnType::VarChar).with_length(60).with_fixed(true);
        assert_eq!(c.diff_column(&a, &b), vec!["length", "fixed"]);

        let a = Column::new("a", ColumnType::Decimal).with_precision(10).with_scale(2);
        let b = Column::new("a", ColumnType::Decimal).with_precision(12).with_scale(2);
        assert_eq!(c.diff_column(&a, &b), vec!["precision"]);
    }

    #[test]
    fn test_diff_column_comment() {
        let c = Comparator::new();
        let a = Column::new("a", ColumnType::Int);
        let b = Column::new("a", ColumnType::Int).with_comment("");
        assert!(c.diff_column(&a, &b).is_empty());

        let b = Column::new("a", ColumnType::Int).with_comment("hello");
        assert_eq!(c.diff_column(&a, &b), vec!["comment"]);
    }

    #[test]
    fn test_diff_column_options() {
        let c = Comparator::new();
        let a = Column::new("a", ColumnType::Int).with_custom_schema_option("foo", "bar");
        let b = Column::new("a", ColumnType::Int);
        assert_eq!(c.diff_column(&a, &b), vec!["foo"]);
        assert_eq!(c.diff_column(&b, &a), vec!["foo"]);

        // One-sided platform options are ignored.
        let a = Column::new("a", ColumnType::Int).with_platform_option("charset", "utf8");
        assert!(c.diff_column(&a, &b).is_empty());
        let b = Column::new("a", ColumnType::Int).with_platform_option("charset", json!("latin1"));
        assert_eq!(c.diff_column(&a, &b), vec!["charset"]);
    }

    #[test]
    fn test_diff_table_identical() {
        let c = Comparator::new();
        let table = table_with("foo", &[Column::new("id", ColumnType::Int)]);
        assert!(c.diff_table(&table, &table.clone()).is_none());
    }

    #[test]
    fn test_diff_table_columns() {
        let c = Comparator::new();
        let from = table_with(
            "foo",
            &[
                Column::new("id", ColumnType::Int),
                Column::new("gone", ColumnType::Date),
            ],
        );
        let to = table_with(
            "foo",
            &[
                Column::new("id", ColumnType::BigInt),
                Column::new("fresh", ColumnType::Text),
            ],
        );

        let diff = c.diff_table(&from, &to).unwrap();
        assert_eq!(diff.name, "foo");
        assert!(diff.added_columns.contains_key("fresh"));
        assert!(diff.removed_columns.contains_key("gone"));
        let changed = &diff.changed_columns["id"];
        assert!(changed.has_changed("type"));
        assert_eq!(changed.from_column.as_ref().map(Asset::name), Some("id".into()));
        assert!(diff.renamed_columns.is_empty());
    }

    #[test]
    fn test_detect_unambiguous_column_rename() {
        let c = Comparator::new();
        let from = table_with("foo", &[Column::new("old", ColumnType::Int)]);
        let to = table_with("foo", &[Column::new("new", ColumnType::Int)]);

        let diff = c.diff_table(&from, &to).unwrap();
        assert!(diff.added_columns.is_empty());
        assert!(diff.removed_columns.is_empty());
        assert_eq!(diff.renamed_columns["old"].name(), "new");
    }

    #[test]
    fn test_ambiguous_column_rename_stays_add_and_drop() {
        let c = Comparator::new();
        let from = table_with(
            "foo",
            &[
                Column::new("a", ColumnType::Int),
                Column::new("b", ColumnType::Int),
            ],
        );
        let to = table_with("foo", &[Column::new("c", ColumnType::Int)]);

        let diff = c.diff_table(&from, &to).unwrap();
        assert!(diff.renamed_columns.is_empty());
        assert_eq!(diff.added_columns.len(), 1);
        assert_eq!(diff.removed_columns.len(), 2);
    }

    #[test]
    fn test_diff_table_indexes() {
        let c = Comparator::new();
        let columns = [
            Column::new("a", ColumnType::Int),
            Column::new("b", ColumnType::Int),
        ];
        let mut from = table_with("foo", &columns);
        from.add_index(&["a"], Some("idx_a")).unwrap();
        from.add_index(&["b"], Some("idx_b")).unwrap();
        let mut to = table_with("foo", &columns);
        to.add_unique_index(&["a"], Some("idx_a")).unwrap();
        to.add_index(&["b"], Some("idx_b_renamed")).unwrap();

        let diff = c.diff_table(&from, &to).unwrap();
        assert!(diff.changed_indexes["idx_a"].is_unique());
        assert_eq!(diff.renamed_indexes["idx_b"].name(), "idx_b_renamed");
        assert!(diff.added_indexes.is_empty());
        assert!(diff.removed_indexes.is_empty());
    }

    #[test]
    fn test_diff_table_primary_key() {
        let c = Comparator::new();
        let columns = [Column::new("id", ColumnType::Int)];
        let from = table_with("foo", &columns);
        let mut to = table_with("foo", &columns);
        to.set_primary_key(&["id"], None).unwrap();

        let diff = c.diff_table(&from, &to).unwrap();
        assert!(diff.added_indexes["primary"].is_primary());

        let back = c.diff_table(&to, &from).unwrap();
        assert!(back.removed_indexes["primary"].is_primary());
    }

    #[test]
    fn test_diff_foreign_key() {
        let c = Comparator::new();
        let a = ForeignKeyConstraint::new(&["ID"], "bar", &["id"], "fk1");
        let b = ForeignKeyConstraint::new(&["id"], "`bar`", &["ID"], "fk2");
        assert!(!c.diff_foreign_key(&a, &b));

        let restrict = a.clone().with_option("onDelete", "RESTRICT");
        assert!(!c.diff_foreign_key(&a, &restrict));

        let cascade = a.clone().with_option("onDelete", "CASCADE");
        assert!(c.diff_foreign_key(&a, &cascade));
    }

    #[test]
    fn test_diff_table_foreign_keys() {
        let c = Comparator::new();
        let columns = [
            Column::new("id", ColumnType::Int),
            Column::new("bar_id", ColumnType::Int),
        ];
        let mut from = table_with("foo", &columns);
        from.add_foreign_key_constraint("bar", &["bar_id"], &["id"], IndexMap::new(), Some("fk_bar"))
            .unwrap();

        let mut to = table_with("foo", &columns);
        let mut options = IndexMap::new();
        options.insert("onDelete".to_string(), json!("CASCADE"));
        to.add_foreign_key_constraint("bar", &["bar_id"], &["id"], options, Some("FK_BAR"))
            .unwrap();

        let diff = c.diff_table(&from, &to).unwrap();
        assert_eq!(diff.changed_foreign_keys.len(), 1);
        assert!(diff.added_foreign_keys.is_empty());
        assert!(diff.removed_foreign_keys.is_empty());

        let same = c.diff_table(&from, &from.clone());
        assert!(same.is_none());
    }

    #[test]
    fn test_diff_sequence() {
        let c = Comparator::new();
        let a = Sequence::new("seq");
        assert!(!c.diff_sequence(&a, &a.clone()));
        assert!(c.diff_sequence(&a, &a.clone().with_allocation_size(10)));
        assert!(c.diff_sequence(&a, &a.clone().with_initial_value(5)));
    }
}
