//! Schemas.
//!
//! A [`Schema`] is the root of the model: tables and sequences keyed by
//! their fully-qualified lowercase name, plus the namespaces they live in.
//! Assets outside the default namespace create their namespace on insert.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::asset::{is_identifier_quoted, trim_quotes, Asset, Identifier};
use crate::comparator::Comparator;
use crate::error::{Result, SchemaError};
use crate::platform::Platform;
use crate::schema_config::SchemaConfig;
use crate::sequence::Sequence;
use crate::table::Table;
use crate::visitor::{
    CreateSchemaSqlCollector, DropSchemaSqlCollector, RemoveNamespacedAssets, Visitor,
};

/// Namespace used when the configuration does not name one.
pub const DEFAULT_SCHEMA_NAME: &str = "public";

/// Strips quotes from a quoted asset name.
fn unquoted_asset_name(name: &str) -> String {
    if is_identifier_quoted(name) {
        trim_quotes(name)
    } else {
        name.to_string()
    }
}

/// Qualifies `name` with `schema_name` unless it already has a namespace.
pub(crate) fn full_qualified_asset_name(schema_name: &str, name: &str) -> String {
    let name = unquoted_asset_name(name);
    if name.contains('.') {
        name.to_lowercase()
    } else {
        format!("{schema_name}.{name}").to_lowercase()
    }
}

/// A database schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    name: Identifier,
    namespaces: IndexMap<String, String>,
    tables: IndexMap<String, Table>,
    sequences: IndexMap<String, Sequence>,
    config: SchemaConfig,
}

impl Default for Schema {
    fn default() -> Self {
        Self::with_config(SchemaConfig::default())
    }
}

impl Schema {
    /// Creates an empty schema with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty schema.
    #[must_use]
    pub fn with_config(config: SchemaConfig) -> Self {
        let name = config.name.as_deref().unwrap_or(DEFAULT_SCHEMA_NAME);
        Self {
            name: Identifier::new(name),
            namespaces: IndexMap::new(),
            tables: IndexMap::new(),
            sequences: IndexMap::new(),
            config,
        }
    }

    /// Creates a schema from already-built tables and sequences.
    pub fn from_parts(
        tables: Vec<Table>,
        sequences: Vec<Sequence>,
        config: SchemaConfig,
        namespaces: &[&str],
    ) -> Result<Self> {
        let mut schema = Self::with_config(config);

        for namespace in namespaces {
            schema.create_namespace(namespace)?;
        }
        for table in tables {
            schema.add_table(table)?;
        }
        for sequence in sequences {
            schema.add_sequence(sequence)?;
        }

        Ok(schema)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SchemaConfig {
        &self.config
    }

    #[must_use]
    pub const fn has_explicit_foreign_key_indexes(&self) -> bool {
        self.config.has_explicit_foreign_key_indexes
    }

    /// Qualifies an asset name with this schema's name.
    #[must_use]
    pub fn full_qualified_asset_name(&self, name: &str) -> String {
        full_qualified_asset_name(&self.name(), name)
    }

    // ====================================================================
    // Namespaces
    // ====================================================================

    /// Registers a namespace.
    pub fn create_namespace(&mut self, name: &str) -> Result<()> {
        let key = unquoted_asset_name(name).to_lowercase();
        if self.namespaces.contains_key(&key) {
            return Err(SchemaError::NamespaceAlreadyExists(key));
        }
        self.namespaces.insert(key, name.to_string());
        Ok(())
    }

    #[must_use]
    pub fn has_namespace(&self, name: &str) -> bool {
        self.namespaces
            .contains_key(&unquoted_asset_name(name).to_lowercase())
    }

    /// Returns the namespaces, keyed by lowercase unquoted name.
    #[must_use]
    pub const fn namespaces(&self) -> &IndexMap<String, String> {
        &self.namespaces
    }

    fn ensure_namespace(&mut self, asset: &Identifier) -> Result<()> {
        if asset.is_in_default_namespace(&self.name()) {
            return Ok(());
        }
        match asset.namespace_name() {
            Some(ns) if !self.has_namespace(ns) => self.create_namespace(ns),
            _ => Ok(()),
        }
    }

    // ====================================================================
    // Tables
    // ====================================================================

    /// Creates a table carrying the default table options.
    pub fn create_table(&mut self, name: &str) -> Result<&mut Table> {
        let mut table = Table::new(name)?;
        for (option, value) in &self.config.default_table_options {
            table.add_option(option, value.clone());
        }
        self.add_table(table)
    }

    /// Adds a table.
    pub fn add_table(&mut self, mut table: Table) -> Result<&mut Table> {
        let key = table.full_qualified_name(&self.name());
        if self.tables.contains_key(&key) {
            return Err(SchemaError::TableAlreadyExists(key));
        }

        self.ensure_namespace(table.identifier())?;
        table.set_schema_config(self.config.clone());

        debug!(schema = %self.name(), table = %key, "Added table");
        Ok(self.tables.entry(key).or_insert(table))
    }

    #[must_use]
    pub fn has_table(&self, name: &str) -> bool {
        self.tables
            .contains_key(&self.full_qualified_asset_name(name))
    }

    /// Returns a table by name.
    pub fn table(&self, name: &str) -> Result<&Table> {
        let key = self.full_qualified_asset_name(name);
        self.tables
            .get(&key)
            .ok_or(SchemaError::TableDoesNotExist(key))
    }

    /// Returns a table by name for mutation.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table> {
        let key = self.full_qualified_asset_name(name);
        self.tables
            .get_mut(&key)
            .ok_or(SchemaError::TableDoesNotExist(key))
    }

    /// Returns the tables, keyed by fully-qualified lowercase name.
    #[must_use]
    pub const fn tables(&self) -> &IndexMap<String, Table> {
        &self.tables
    }

    /// Returns the fully-qualified table names.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Renames a table.
    pub fn rename_table(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        let old_key = self.full_qualified_asset_name(old_name);
        if !self.tables.contains_key(&old_key) {
            return Err(SchemaError::TableDoesNotExist(old_key));
        }

        let new_key = Identifier::new(new_name).full_qualified_name(&self.name());
        if new_key != old_key && self.tables.contains_key(&new_key) {
            return Err(SchemaError::TableAlreadyExists(new_key));
        }

        if let Some(mut table) = self.tables.shift_remove(&old_key) {
            table.set_name(new_name);
            self.add_table(table)?;
        }
        Ok(())
    }

    /// Drops a table.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        let key = self.full_qualified_asset_name(name);
        if self.tables.shift_remove(&key).is_none() {
            return Err(SchemaError::TableDoesNotExist(key));
        }
        debug!(schema = %self.name(), table = %key, "Dropped table");
        Ok(())
    }

    // ====================================================================
    // Sequences
    // ====================================================================

    /// Creates a sequence.
    pub fn create_sequence(
        &mut self,
        name: &str,
        allocation_size: u32,
        initial_value: i64,
    ) -> Result<&Sequence> {
        let sequence = Sequence::new(name)
            .with_allocation_size(allocation_size)
            .with_initial_value(initial_value);
        self.add_sequence(sequence)
    }

    /// Adds a sequence.
    pub fn add_sequence(&mut self, sequence: Sequence) -> Result<&Sequence> {
        let key = sequence.full_qualified_name(&self.name());
        if self.sequences.contains_key(&key) {
            return Err(SchemaError::SequenceAlreadyExists(key));
        }

        self.ensure_namespace(sequence.identifier())?;

        debug!(schema = %self.name(), sequence = %key, "Added sequence");
        Ok(self.sequences.entry(key).or_insert(sequence))
    }

    #[must_use]
    pub fn has_sequence(&self, name: &str) -> bool {
        self.sequences
            .contains_key(&self.full_qualified_asset_name(name))
    }

    /// Returns a sequence by name.
    pub fn sequence(&self, name: &str) -> Result<&Sequence> {
        let key = self.full_qualified_asset_name(name);
        self.sequences
            .get(&key)
            .ok_or(SchemaError::SequenceDoesNotExist(key))
    }

    /// Returns the sequences, keyed by fully-qualified lowercase name.
    #[must_use]
    pub const fn sequences(&self) -> &IndexMap<String, Sequence> {
        &self.sequences
    }

    /// Drops a sequence. Unknown sequences are ignored.
    pub fn drop_sequence(&mut self, name: &str) {
        let key = self.full_qualified_asset_name(name);
        if self.sequences.shift_remove(&key).is_some() {
            debug!(schema = %self.name(), sequence = %key, "Dropped sequence");
        }
    }

    // ====================================================================
    // SQL
    // ====================================================================

    /// Returns the statements creating this schema.
    pub fn to_sql(&self, platform: &dyn Platform) -> Result<Vec<String>> {
        let mut collector = CreateSchemaSqlCollector::new(platform);
        self.visit(&mut collector)?;
        Ok(collector.queries())
    }

    /// Returns the statements dropping this schema.
    pub fn to_drop_sql(&self, platform: &dyn Platform) -> Result<Vec<String>> {
        let mut collector = DropSchemaSqlCollector::new(platform);
        self.visit(&mut collector)?;
        collector.queries()
    }

    /// Returns the statements migrating this schema to `to`.
    pub fn migrate_to_sql(&self, to: &Self, platform: &dyn Platform) -> Result<Vec<String>> {
        Comparator::new().compare(self, to).to_sql(platform)
    }

    /// Returns the statements migrating `from` to this schema.
    pub fn migrate_from_sql(&self, from: &Self, platform: &dyn Platform) -> Result<Vec<String>> {
        Comparator::new().compare(from, self).to_sql(platform)
    }

    /// Drops tables and sequences outside the default namespace, and foreign
    /// keys pointing at tables that are missing or outside it.
    pub fn remove_namespaced_assets(&mut self) -> Result<()> {
        let mut collector = RemoveNamespacedAssets::new();
        self.visit(&mut collector)?;
        collector.apply(self)
    }

    /// Dispatches the schema, its namespaces, tables and sequences.
    pub fn visit(&self, visitor: &mut dyn Visitor) -> Result<()> {
        visitor.accept_schema(self)?;

        for namespace in self.namespaces.values() {
            visitor.accept_namespace(namespace)?;
        }
        for table in self.tables.values() {
            table.visit(visitor)?;
        }
        for sequence in self.sequences.values() {
            sequence.visit(visitor)?;
        }

        Ok(())
    }
}

impl Asset for Schema {
    fn identifier(&self) -> &Identifier {
        &self.name
    }
}
