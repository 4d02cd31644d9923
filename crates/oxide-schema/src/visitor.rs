//! Schema traversal.
//!
//! [`Schema::visit`] walks the schema, then each namespace, table (with its
//! columns, indexes and foreign keys) and sequence, handing each to a
//! [`Visitor`]. Every callback defaults to a no-op, so visitors only
//! implement what they collect.
//!
//! Three visitors ship with the crate:
//!
//! - [`CreateSchemaSqlCollector`] renders the statements creating a schema.
//! - [`DropSchemaSqlCollector`] renders the statements dropping it.
//! - [`RemoveNamespacedAssets`] strips assets outside the default namespace.

use indexmap::IndexSet;
use tracing::debug;

use crate::asset::Asset;
use crate::column::Column;
use crate::error::{Result, SchemaError};
use crate::foreign_key::ForeignKeyConstraint;
use crate::index::Index;
use crate::platform::{CreateFlags, Platform};
use crate::schema::{full_qualified_asset_name, Schema};
use crate::sequence::Sequence;
use crate::table::Table;

/// Callbacks invoked while walking a schema.
pub trait Visitor {
    fn accept_schema(&mut self, _schema: &Schema) -> Result<()> {
        Ok(())
    }

    fn accept_namespace(&mut self, _namespace: &str) -> Result<()> {
        Ok(())
    }

    fn accept_table(&mut self, _table: &Table) -> Result<()> {
        Ok(())
    }

    fn accept_column(&mut self, _table: &Table, _column: &Column) -> Result<()> {
        Ok(())
    }

    fn accept_index(&mut self, _table: &Table, _index: &Index) -> Result<()> {
        Ok(())
    }

    fn accept_foreign_key(&mut self, _table: &Table, _foreign_key: &ForeignKeyConstraint) -> Result<()> {
        Ok(())
    }

    fn accept_sequence(&mut self, _sequence: &Sequence) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Create
// ============================================================================

/// Collects the statements creating a schema.
///
/// Foreign keys are emitted after every table so that references between
/// tables always resolve.
pub struct CreateSchemaSqlCollector<'a> {
    platform: &'a dyn Platform,
    namespaces: Vec<String>,
    tables: Vec<String>,
    sequences: Vec<String>,
    foreign_keys: Vec<String>,
}

impl<'a> CreateSchemaSqlCollector<'a> {
    #[must_use]
    pub fn new(platform: &'a dyn Platform) -> Self {
        Self {
            platform,
            namespaces: Vec::new(),
            tables: Vec::new(),
            sequences: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Returns the collected statements: namespaces, tables, sequences, then
    /// foreign keys.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.namespaces
            .iter()
            .chain(&self.tables)
            .chain(&self.sequences)
            .chain(&self.foreign_keys)
            .cloned()
            .collect()
    }

    /// Forgets every collected statement.
    pub fn reset(&mut self) {
        self.namespaces.clear();
        self.tables.clear();
        self.sequences.clear();
        self.foreign_keys.clear();
    }
}

impl Visitor for CreateSchemaSqlCollector<'_> {
    fn accept_namespace(&mut self, namespace: &str) -> Result<()> {
        if self.platform.supports_schemas() {
            self.namespaces.push(self.platform.create_schema_sql(namespace)?);
        }
        Ok(())
    }

    fn accept_table(&mut self, table: &Table) -> Result<()> {
        let sql = self.platform.create_table_sql(table, CreateFlags::default())?;
        debug!(table = %table.name(), statements = sql.len(), "Collected create table");
        self.tables.extend(sql);
        Ok(())
    }

    fn accept_foreign_key(&mut self, table: &Table, foreign_key: &ForeignKeyConstraint) -> Result<()> {
        if self.platform.supports_foreign_key_constraints() {
            let name = table.quoted_name(self.platform);
            self.foreign_keys
                .push(self.platform.create_foreign_key_sql(foreign_key, &name)?);
        }
        Ok(())
    }

    fn accept_sequence(&mut self, sequence: &Sequence) -> Result<()> {
        if self.platform.supports_sequences() {
            self.sequences.push(self.platform.create_sequence_sql(sequence)?);
        }
        Ok(())
    }
}

// ============================================================================
// Drop
// ============================================================================

/// Collects the statements dropping a schema.
///
/// Assets are deduplicated by value, so a foreign key reached twice is only
/// dropped once. Foreign keys go first, then sequences, then tables.
pub struct DropSchemaSqlCollector<'a> {
    platform: &'a dyn Platform,
    foreign_keys: Vec<(ForeignKeyConstraint, String)>,
    sequences: Vec<Sequence>,
    tables: Vec<Table>,
}

impl<'a> DropSchemaSqlCollector<'a> {
    #[must_use]
    pub fn new(platform: &'a dyn Platform) -> Self {
        Self {
            platform,
            foreign_keys: Vec::new(),
            sequences: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Renders the collected drops.
    pub fn queries(&self) -> Result<Vec<String>> {
        let mut sql = Vec::new();

        for (foreign_key, table) in &self.foreign_keys {
            sql.push(self.platform.drop_foreign_key_sql(foreign_key, table));
        }
        for sequence in &self.sequences {
            sql.push(self.platform.drop_sequence_sql(sequence)?);
        }
        for table in &self.tables {
            sql.push(self.platform.drop_table_sql(&table.quoted_name(self.platform)));
        }

        Ok(sql)
    }

    /// Forgets every collected asset.
    pub fn reset(&mut self) {
        self.foreign_keys.clear();
        self.sequences.clear();
        self.tables.clear();
    }
}

impl Visitor for DropSchemaSqlCollector<'_> {
    fn accept_table(&mut self, table: &Table) -> Result<()> {
        if !self.tables.contains(table) {
            self.tables.push(table.clone());
        }
        Ok(())
    }

    fn accept_foreign_key(&mut self, table: &Table, foreign_key: &ForeignKeyConstraint) -> Result<()> {
        if foreign_key.name().is_empty() {
            return Err(SchemaError::NamedForeignKeyRequired {
                table: table.name(),
                columns: foreign_key.local_columns().join(", "),
                foreign_table: foreign_key.foreign_table_name(),
                foreign_columns: foreign_key.foreign_columns().join(", "),
            });
        }

        if !self.foreign_keys.iter().any(|(fk, _)| fk == foreign_key) {
            let name = table.quoted_name(self.platform);
            self.foreign_keys.push((foreign_key.clone(), name));
        }
        Ok(())
    }

    fn accept_sequence(&mut self, sequence: &Sequence) -> Result<()> {
        if self.platform.supports_sequences() && !self.sequences.contains(sequence) {
            self.sequences.push(sequence.clone());
        }
        Ok(())
    }
}

// ============================================================================
// Namespaces
// ============================================================================

/// Collects tables, sequences and foreign keys living outside the default
/// namespace, then removes them with [`RemoveNamespacedAssets::apply`].
///
/// Foreign keys pointing at a missing table or at a table outside the
/// default namespace are removed as well.
#[derive(Debug, Default)]
pub struct RemoveNamespacedAssets {
    schema_name: String,
    kept_tables: IndexSet<String>,
    tables: Vec<String>,
    sequences: Vec<String>,
    foreign_keys: Vec<(String, String)>,
}

impl RemoveNamespacedAssets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes the collected assets from `schema`.
    pub fn apply(self, schema: &mut Schema) -> Result<()> {
        for table in &self.tables {
            schema.drop_table(table)?;
        }
        for sequence in &self.sequences {
            schema.drop_sequence(sequence);
        }
        for (table, foreign_key) in &self.foreign_keys {
            if schema.has_table(table) {
                schema.table_mut(table)?.remove_foreign_key(foreign_key)?;
            }
        }
        Ok(())
    }
}

impl Visitor for RemoveNamespacedAssets {
    fn accept_schema(&mut self, schema: &Schema) -> Result<()> {
        self.schema_name = schema.name();
        self.kept_tables = schema
            .tables()
            .iter()
            .filter(|(_, table)| table.is_in_default_namespace(&self.schema_name))
            .map(|(key, _)| key.clone())
            .collect();
        Ok(())
    }

    fn accept_table(&mut self, table: &Table) -> Result<()> {
        if !table.is_in_default_namespace(&self.schema_name) {
            self.tables.push(table.name());
        }
        Ok(())
    }

    fn accept_foreign_key(&mut self, table: &Table, foreign_key: &ForeignKeyConstraint) -> Result<()> {
        let target = full_qualified_asset_name(&self.schema_name, &foreign_key.foreign_table_name());
        if !self.kept_tables.contains(&target) {
            self.foreign_keys.push((table.name(), foreign_key.name()));
        }
        Ok(())
    }

    fn accept_sequence(&mut self, sequence: &Sequence) -> Result<()> {
        if !sequence.is_in_default_namespace(&self.schema_name) {
            self.sequences.push(sequence.name());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MySqlPlatform;
    use crate::types::ColumnType;
    use indexmap::IndexMap;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        let user = schema.create_table("user").unwrap();
        user.add_column(Column::new("id", ColumnType::Int)).unwrap();
        user.set_primary_key(&["id"], None).unwrap();

        let post = schema.create_table("post").unwrap();
        post.add_column(Column::new("id", ColumnType::Int)).unwrap();
        post.add_column(Column::new("user_id", ColumnType::Int)).unwrap();
        post.add_foreign_key_constraint("user", &["user_id"], &["id"], IndexMap::new(), Some("fk_user"))
            .unwrap();
        schema
    }

    #[derive(Default)]
    struct Counter {
        tables: usize,
        columns: usize,
        indexes: usize,
        foreign_keys: usize,
    }

    impl Visitor for Counter {
        fn accept_table(&mut self, _table: &Table) -> Result<()> {
            self.tables += 1;
            Ok(())
        }

        fn accept_column(&mut self, _table: &Table, _column: &Column) -> Result<()> {
            self.columns += 1;
            Ok(())
        }

        fn accept_index(&mut self, _table: &Table, _index: &Index) -> Result<()> {
            self.indexes += 1;
            Ok(())
        }

        fn accept_foreign_key(&mut self, _table: &Table, _fk: &ForeignKeyConstraint) -> Result<()> {
            self.foreign_keys += 1;
            Ok(())
        }
    }

    #[test]
    fn test_visit_reaches_every_asset() {
        let mut counter = Counter::default();
        schema().visit(&mut counter).unwrap();
        assert_eq!(counter.tables, 2);
        assert_eq!(counter.columns, 3);
        // Primary key plus the implicit foreign key index.
        assert_eq!(counter.indexes, 2);
        assert_eq!(counter.foreign_keys, 1);
    }

    #[test]
    fn test_create_collector_order() {
        let platform = MySqlPlatform::new();
        let mut collector = CreateSchemaSqlCollector::new(&platform);
        schema().visit(&mut collector).unwrap();

        let sql = collector.queries();
        assert_eq!(sql.len(), 3);
        assert!(sql[0].starts_with("CREATE TABLE user"));
        assert!(sql[1].starts_with("CREATE TABLE post"));
        assert_eq!(
            sql[2],
            "ALTER TABLE post ADD CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES user (id)"
        );

        collector.reset();
        assert!(collector.queries().is_empty());
    }

    #[test]
    fn test_drop_collector_order() {
        let platform = MySqlPlatform::new();
        let mut collector = DropSchemaSqlCollector::new(&platform);
        let schema = schema();
        schema.visit(&mut collector).unwrap();
        schema.visit(&mut collector).unwrap();

        assert_eq!(
            collector.queries().unwrap(),
            vec![
                "ALTER TABLE post DROP FOREIGN KEY fk_user",
                "DROP TABLE user",
                "DROP TABLE post",
            ]
        );
    }

    #[test]
    fn test_drop_collector_requires_named_foreign_keys() {
        let platform = MySqlPlatform::new();
        let mut table = Table::new("post").unwrap();
        table.add_column(Column::new("user_id", ColumnType::Int)).unwrap();
        let fk = ForeignKeyConstraint::new(&["user_id"], "user", &["id"], "");

        let mut collector = DropSchemaSqlCollector::new(&platform);
        let err = collector.accept_foreign_key(&table, &fk).unwrap_err();
        assert!(matches!(err, SchemaError::NamedForeignKeyRequired { .. }));
    }

    #[test]
    fn test_remove_namespaced_assets() {
        let mut schema = schema();
        let audit = schema.create_table("audit.log").unwrap();
        audit.add_column(Column::new("user_id", ColumnType::Int)).unwrap();
        audit
            .add_foreign_key_constraint("user", &["user_id"], &["id"], IndexMap::new(), Some("fk_log_user"))
            .unwrap();
        let post = schema.table_mut("post").unwrap();
        post.add_column(Column::new("log_id", ColumnType::Int)).unwrap();
        post.add_foreign_key_constraint("audit.log", &["log_id"], &["user_id"], IndexMap::new(), Some("fk_post_log"))
            .unwrap();
        schema.create_sequence("audit.seq", 1, 1).unwrap();

        schema.remove_namespaced_assets().unwrap();

        assert!(!schema.has_table("audit.log"));
        assert!(!schema.has_sequence("audit.seq"));
        let post = schema.table("post").unwrap();
        assert!(post.has_foreign_key("fk_user"));
        assert!(!post.has_foreign_key("fk_post_log"));
    }
}
