//! Tables.
//!
//! A [`Table`] owns its columns, indexes and foreign keys, all keyed by
//! normalized name in declaration order. Every mutator validates its input
//! before touching the table, so a failed call leaves the table unchanged.
//!
//! Foreign keys always end up backed by an index over their local columns.
//! When no existing index fulfills that requirement the table creates one
//! itself, tagged [`IndexOrigin::Implicit`], and drops it again as soon as a
//! caller adds an index that fulfills it.

use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::asset::{generate_identifier_name, normalize_identifier, Asset, Identifier};
use crate::column::Column;
use crate::error::{Result, SchemaError};
use crate::foreign_key::{ForeignKeyConstraint, ForeignTableRef};
use crate::index::{Index, IndexOrigin};
use crate::schema_config::SchemaConfig;
use crate::visitor::Visitor;

/// Name given to primary indexes when the caller does not choose one.
pub const PRIMARY_INDEX_NAME: &str = "primary";

/// Identifier length used when the table is not attached to a schema.
const DEFAULT_MAX_IDENTIFIER_LENGTH: usize = 63;

/// A database table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: Identifier,
    columns: IndexMap<String, Column>,
    indexes: IndexMap<String, Index>,
    foreign_keys: IndexMap<String, ForeignKeyConstraint>,
    primary_key_name: Option<String>,
    options: IndexMap<String, Value>,
    #[serde(skip)]
    schema_config: Option<SchemaConfig>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(SchemaError::InvalidTableName(name.to_string()));
        }

        Ok(Self {
            name: Identifier::new(name),
            columns: IndexMap::new(),
            indexes: IndexMap::new(),
            foreign_keys: IndexMap::new(),
            primary_key_name: None,
            options: IndexMap::new(),
            schema_config: None,
        })
    }

    /// Creates a table from already-built parts, as catalog readers do.
    ///
    /// Indexes are added as given; foreign keys still get an implicit index
    /// when none of the given indexes fulfills them.
    pub fn from_parts(
        name: &str,
        columns: Vec<Column>,
        indexes: Vec<Index>,
        foreign_keys: Vec<ForeignKeyConstraint>,
        options: IndexMap<String, Value>,
    ) -> Result<Self> {
        let mut table = Self::new(name)?;
        table.options = options;

        for column in columns {
            table.add_column(column)?;
        }
        for index in indexes {
            table.add_index_definition(index)?;
        }
        for fk in foreign_keys {
            table.add_foreign_key_definition(fk)?;
        }

        Ok(table)
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = Identifier::new(name);
    }

    /// Attaches the configuration of the owning schema.
    pub fn set_schema_config(&mut self, config: SchemaConfig) {
        self.schema_config = Some(config);
    }

    fn max_identifier_length(&self) -> usize {
        self.schema_config
            .as_ref()
            .map_or(DEFAULT_MAX_IDENTIFIER_LENGTH, |c| c.max_identifier_length)
    }

    fn generate_name(&self, columns: &[String], prefix: &str) -> String {
        let mut parts = vec![self.name()];
        parts.extend_from_slice(columns);
        generate_identifier_name(&parts, prefix, self.max_identifier_length())
    }

    fn column_does_not_exist(&self, column: &str) -> SchemaError {
        SchemaError::ColumnDoesNotExist {
            column: column.to_string(),
            table: self.name(),
        }
    }

    fn index_does_not_exist(&self, index: &str) -> SchemaError {
        SchemaError::IndexDoesNotExist {
            index: index.to_string(),
            table: self.name(),
        }
    }

    // ====================================================================
    // Columns
    // ====================================================================

    /// Adds a column and returns it for further inspection.
    pub fn add_column(&mut self, column: Column) -> Result<&mut Column> {
        let key = normalize_identifier(&column.name());
        if self.columns.contains_key(&key) {
            return Err(SchemaError::ColumnAlreadyExists {
                column: key,
                table: self.name(),
            });
        }

        Ok(self.columns.entry(key).or_insert(column))
    }

    /// Rebuilds a column through `change`.
    pub fn change_column(&mut self, name: &str, change: impl FnOnce(Column) -> Column) -> Result<()> {
        let key = normalize_identifier(name);
        let Some(column) = self.columns.get_mut(&key) else {
            return Err(self.column_does_not_exist(name));
        };

        *column = change(column.clone());
        Ok(())
    }

    /// Drops a column. Unknown columns are ignored.
    pub fn drop_column(&mut self, name: &str) {
        self.columns.shift_remove(&normalize_identifier(name));
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(&normalize_identifier(name))
    }

    /// Returns a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(&normalize_identifier(name))
            .ok_or_else(|| self.column_does_not_exist(name))
    }

    /// Returns the columns: primary key columns first, then foreign key
    /// columns, then the rest in declaration order.
    #[must_use]
    pub fn columns(&self) -> Vec<&Column> {
        let mut order: Vec<String> = Vec::with_capacity(self.columns.len());
        let pk_columns = self.primary_key().map(Index::columns).unwrap_or_default();
        let fk_columns = self.foreign_keys.values().flat_map(ForeignKeyConstraint::local_columns);

        for name in pk_columns
            .into_iter()
            .chain(fk_columns)
            .map(|c| normalize_identifier(&c))
            .chain(self.columns.keys().cloned())
        {
            if !order.contains(&name) {
                order.push(name);
            }
        }

        order
            .iter()
            .filter_map(|name| self.columns.get(name))
            .collect()
    }

    // ====================================================================
    // Indexes
    // ====================================================================

    /// Sets the primary key, named `primary` unless `name` is given. The
    /// listed columns become NOT NULL.
    pub fn set_primary_key<S: AsRef<str>>(&mut self, columns: &[S], name: Option<&str>) -> Result<()> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let index = self.create_index(
            &columns,
            name.unwrap_or(PRIMARY_INDEX_NAME),
            true,
            true,
            &[],
            IndexMap::new(),
        )?;
        self.add_index_definition(index)?;

        for column in &columns {
            if let Some(column) = self.columns.get_mut(&normalize_identifier(column)) {
                column.set_notnull(true);
            }
        }

        Ok(())
    }

    /// Adds a plain index, generating an `IDX_` name when `name` is `None`.
    pub fn add_index<S: AsRef<str>>(&mut self, columns: &[S], name: Option<&str>) -> Result<()> {
        self.add_index_with(columns, name, &[], IndexMap::new())
    }

    /// Adds a plain index with flags and options.
    pub fn add_index_with<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        name: Option<&str>,
        flags: &[&str],
        options: IndexMap<String, Value>,
    ) -> Result<()> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let name = name.map_or_else(|| self.generate_name(&columns, "idx"), str::to_string);
        let index = self.create_index(&columns, &name, false, false, flags, options)?;
        self.add_index_definition(index)
    }

    /// Adds a unique index, generating an `UNIQ_` name when `name` is `None`.
    pub fn add_unique_index<S: AsRef<str>>(&mut self, columns: &[S], name: Option<&str>) -> Result<()> {
        self.add_unique_index_with(columns, name, IndexMap::new())
    }

    /// Adds a unique index with options, such as a partial `where` clause.
    pub fn add_unique_index_with<S: AsRef<str>>(
        &mut self,
        columns: &[S],
        name: Option<&str>,
        options: IndexMap<String, Value>,
    ) -> Result<()> {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let name = name.map_or_else(|| self.generate_name(&columns, "uniq"), str::to_string);
        let index = self.create_index(&columns, &name, true, false, &[], options)?;
        self.add_index_definition(index)
    }

    /// Renames an index by rebuilding it under the new name. Flags, options
    /// and the position among the table's indexes are kept.
    pub fn rename_index(&mut self, old_name: &str, new_name: Option<&str>) -> Result<()> {
        let old_key = normalize_identifier(old_name);

        if new_name.is_some_and(|n| normalize_identifier(n) == old_key) {
            return Ok(());
        }

        let old = self.index(old_name)?.clone();
        let columns = old.columns();
        let name = match new_name {
            Some(name) => name.to_string(),
            None if old.is_primary() => PRIMARY_INDEX_NAME.to_string(),
            None if old.is_unique() => self.generate_name(&columns, "uniq"),
            None => self.generate_name(&columns, "idx"),
        };

        let new_key = normalize_identifier(&name);
        if new_key == old_key {
            return Ok(());
        }
        if self.indexes.contains_key(&new_key) {
            return Err(SchemaError::IndexAlreadyExists {
                index: name,
                table: self.name(),
            });
        }

        let flags: Vec<&str> = old.flags().iter().map(String::as_str).collect();
        let renamed = self.create_index(
            &columns,
            &name,
            old.is_unique(),
            old.is_primary(),
            &flags,
            old.options().clone(),
        )?;

        let Some((position, _, _)) = self.indexes.shift_remove_full(&old_key) else {
            return Err(self.index_does_not_exist(old_name));
        };
        self.indexes.shift_insert(position, new_key.clone(), renamed);
        if old.is_primary() {
            self.primary_key_name = Some(new_key.clone());
        }

        debug!(table = %self.name(), from = %old_key, to = %new_key, "Renamed index");
        Ok(())
    }

    /// Returns whether some index spans exactly `columns`.
    #[must_use]
    pub fn columns_are_indexed<S: AsRef<str>>(&self, columns: &[S]) -> bool {
        self.indexes.values().any(|idx| idx.spans_columns(columns))
    }

    /// Drops the primary key.
    pub fn drop_primary_key(&mut self) -> Result<()> {
        let Some(name) = self.primary_key_name.clone() else {
            return Err(self.index_does_not_exist(PRIMARY_INDEX_NAME));
        };
        self.drop_index(&name)?;
        self.primary_key_name = None;
        Ok(())
    }

    /// Drops an index.
    pub fn drop_index(&mut self, name: &str) -> Result<()> {
        let key = normalize_identifier(name);
        if self.indexes.shift_remove(&key).is_none() {
            return Err(self.index_does_not_exist(name));
        }
        if self.primary_key_name.as_deref() == Some(key.as_str()) {
            self.primary_key_name = None;
        }
        debug!(table = %self.name(), index = %key, "Dropped index");
        Ok(())
    }

    #[must_use]
    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains_key(&normalize_identifier(name))
    }

    /// Returns an index by name.
    pub fn index(&self, name: &str) -> Result<&Index> {
        self.indexes
            .get(&normalize_identifier(name))
            .ok_or_else(|| self.index_does_not_exist(name))
    }

    /// Returns all indexes keyed by normalized name.
    #[must_use]
    pub const fn indexes(&self) -> &IndexMap<String, Index> {
        &self.indexes
    }

    /// Returns the primary index, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&Index> {
        self.primary_key_name
            .as_ref()
            .and_then(|name| self.indexes.get(name))
    }

    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        self.primary_key().is_some()
    }

    /// Returns the primary key column names.
    pub fn primary_key_columns(&self) -> Result<Vec<String>> {
        self.primary_key()
            .map(Index::columns)
            .ok_or_else(|| SchemaError::NoPrimaryKey(self.name()))
    }

    fn create_index(
        &self,
        columns: &[String],
        name: &str,
        unique: bool,
        primary: bool,
        flags: &[&str],
        options: IndexMap<String, Value>,
    ) -> Result<Index> {
        validate_index_name(name)?;

        if let Some(missing) = columns.iter().find(|c| !self.has_column(c)) {
            return Err(self.column_does_not_exist(missing));
        }

        Ok(Index::new(name, columns, unique, primary)
            .with_flags(flags)
            .with_options(options))
    }

    /// Adds a prebuilt index, replacing implicit indexes it fulfills.
    pub fn add_index_definition(&mut self, index: Index) -> Result<()> {
        let replaced = self.check_index_definition(&index)?;
        self.insert_index(index, &replaced);
        Ok(())
    }

    /// Returns the keys of the implicit indexes `index` would replace.
    fn check_index_definition(&self, index: &Index) -> Result<Vec<String>> {
        let replaced: Vec<String> = self
            .indexes
            .iter()
            .filter(|(_, existing)| existing.is_implicit() && existing.is_fullfilled_by(index))
            .map(|(key, _)| key.clone())
            .collect();

        let key = normalize_identifier(&index.name());
        if (self.indexes.contains_key(&key) && !replaced.contains(&key))
            || (self.primary_key_name.is_some() && index.is_primary())
        {
            return Err(SchemaError::IndexAlreadyExists {
                index: key,
                table: self.name(),
            });
        }

        Ok(replaced)
    }

    fn insert_index(&mut self, index: Index, replaced: &[String]) {
        for name in replaced {
            debug!(table = %self.name(), index = %name, "Replaced implicit index");
            self.indexes.shift_remove(name);
        }

        let key = normalize_identifier(&index.name());
        if index.is_primary() {
            self.primary_key_name = Some(key.clone());
        }

        debug!(table = %self.name(), index = %key, "Added index");
        self.indexes.insert(key, index);
    }

    // ====================================================================
    // Foreign keys
    // ====================================================================

    /// Adds a foreign key. When `name` is `None` an `FK_` name is generated.
    ///
    /// Local columns must exist on this table; when `foreign_table` is a live
    /// table, the foreign columns must exist there too.
    pub fn add_foreign_key_constraint<'a, L, F>(
        &mut self,
        foreign_table: impl Into<ForeignTableRef<'a>>,
        local_columns: &[L],
        foreign_columns: &[F],
        options: IndexMap<String, Value>,
        name: Option<&str>,
    ) -> Result<()>
    where
        L: AsRef<str>,
        F: AsRef<str>,
    {
        let foreign_table = foreign_table.into();
        let local: Vec<String> = local_columns.iter().map(|c| c.as_ref().to_string()).collect();

        if let ForeignTableRef::Table(table) = foreign_table {
            if let Some(missing) = foreign_columns.iter().find(|c| !table.has_column(c.as_ref())) {
                return Err(table.column_does_not_exist(missing.as_ref()));
            }
        }

        if let Some(missing) = local.iter().find(|c| !self.has_column(c)) {
            return Err(self.column_does_not_exist(missing));
        }

        let name = name.map_or_else(|| self.generate_name(&local, "fk"), str::to_string);
        let fk = ForeignKeyConstraint::new(&local, &foreign_table.name(), foreign_columns, &name)
            .with_options(options);

        self.add_foreign_key_definition(fk)
    }

    /// Adds a prebuilt foreign key and backs it with an index.
    ///
    /// Foreign key names are unique per table; reusing one is an error.
    pub fn add_foreign_key_definition(&mut self, mut fk: ForeignKeyConstraint) -> Result<()> {
        let columns = fk.local_columns();
        let key = if fk.name().is_empty() {
            normalize_identifier(&self.generate_name(&columns, "fk"))
        } else {
            normalize_identifier(&fk.name())
        };

        if self.foreign_keys.contains_key(&key) {
            return Err(SchemaError::ForeignKeyAlreadyExists {
                name: key,
                table: self.name(),
            });
        }

        let index_name = self.generate_name(&columns, "idx");
        let candidate = self.create_index(&columns, &index_name, false, false, &[], IndexMap::new())?;
        let implicit = if self.indexes.values().any(|existing| candidate.is_fullfilled_by(existing)) {
            None
        } else {
            let index = candidate.with_origin(IndexOrigin::Implicit);
            let replaced = self.check_index_definition(&index)?;
            Some((index, replaced))
        };

        fk.set_local_table(&self.name);
        debug!(table = %self.name(), foreign_key = %key, "Added foreign key");
        self.foreign_keys.insert(key, fk);

        if let Some((index, replaced)) = implicit {
            debug!(table = %self.name(), index = %index_name, "Added implicit index");
            self.insert_index(index, &replaced);
        }

        Ok(())
    }

    #[must_use]
    pub fn has_foreign_key(&self, name: &str) -> bool {
        self.foreign_keys.contains_key(&normalize_identifier(name))
    }

    /// Returns a foreign key by name.
    pub fn foreign_key(&self, name: &str) -> Result<&ForeignKeyConstraint> {
        self.foreign_keys
            .get(&normalize_identifier(name))
            .ok_or_else(|| SchemaError::ForeignKeyDoesNotExist {
                name: name.to_string(),
                table: self.name(),
            })
    }

    /// Returns all foreign keys keyed by normalized name.
    #[must_use]
    pub const fn foreign_keys(&self) -> &IndexMap<String, ForeignKeyConstraint> {
        &self.foreign_keys
    }

    /// Removes a foreign key.
    pub fn remove_foreign_key(&mut self, name: &str) -> Result<()> {
        let key = normalize_identifier(name);
        if self.foreign_keys.shift_remove(&key).is_none() {
            return Err(SchemaError::ForeignKeyDoesNotExist {
                name: name.to_string(),
                table: self.name(),
            });
        }
        debug!(table = %self.name(), foreign_key = %key, "Removed foreign key");
        Ok(())
    }

    // ====================================================================
    // Options
    // ====================================================================

    /// Sets a table option such as `engine` or `charset`.
    pub fn add_option(&mut self, name: &str, value: impl Into<Value>) {
        self.options.insert(name.to_string(), value.into());
    }

    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    #[must_use]
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    #[must_use]
    pub const fn options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    /// Dispatches the table, then its columns, indexes and foreign keys.
    pub fn visit(&self, visitor: &mut dyn Visitor) -> Result<()> {
        visitor.accept_table(self)?;

        for column in self.columns() {
            visitor.accept_column(self, column)?;
        }
        for index in self.indexes.values() {
            visitor.accept_index(self, index)?;
        }
        for fk in self.foreign_keys.values() {
            visitor.accept_foreign_key(self, fk)?;
        }

        Ok(())
    }
}

impl Asset for Table {
    fn identifier(&self) -> &Identifier {
        &self.name
    }
}

static INVALID_INDEX_CHARS: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();

/// Index names are limited to `[a-zA-Z0-9_]` once normalized.
fn validate_index_name(name: &str) -> Result<()> {
    let invalid = INVALID_INDEX_CHARS
        .get_or_init(|| Regex::new("[^a-zA-Z0-9_]"))
        .as_ref()
        .map_err(|e| SchemaError::invalid_argument(e.to_string()))?;
    if invalid.is_match(&normalize_identifier(name)) {
        return Err(SchemaError::IndexNameInvalid(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    fn table_with(columns: &[&str]) -> Table {
        let mut table = Table::new("foo").unwrap();
        for name in columns {
            table.add_column(Column::new(name, ColumnType::Int)).unwrap();
        }
        table
    }

    #[test]
    fn test_empty_name_is_invalid() {
        assert_eq!(
            Table::new("").unwrap_err(),
            SchemaError::InvalidTableName(String::new())
        );
    }

    #[test]
    fn test_duplicate_column() {
        let mut table = table_with(&["bar"]);
        let err = table
            .add_column(Column::new("`BAR`", ColumnType::Int))
            .unwrap_err();
        assert_eq!(err.code(), Some(40));
    }

    #[test]
    fn test_column_lookup_is_case_insensitive() {
        let table = table_with(&["Bar"]);
        assert!(table.has_column("bar"));
        assert!(table.has_column("`BAR`"));
        assert_eq!(table.column("BAR").unwrap().name(), "Bar");
        assert_eq!(table.column("baz").unwrap_err().code(), Some(30));
    }

    #[test]
    fn test_drop_column_is_tolerant() {
        let mut table = table_with(&["bar"]);
        table.drop_column("missing");
        table.drop_column("bar");
        assert!(!table.has_column("bar"));
    }

    #[test]
    fn test_change_column() {
        let mut table = table_with(&["bar"]);
        table
            .change_column("bar", |c| c.with_type(ColumnType::BigInt).nullable())
            .unwrap();
        let column = table.column("bar").unwrap();
        assert_eq!(column.column_type(), ColumnType::BigInt);
        assert!(!column.is_notnull());
        assert!(table.change_column("missing", |c| c).is_err());
    }

    #[test]
    fn test_primary_key_forces_notnull() {
        let mut table = Table::new("foo").unwrap();
        table
            .add_column(Column::new("id", ColumnType::Int).nullable())
            .unwrap();
        table.set_primary_key(&["id"], None).unwrap();

        assert!(table.column("id").unwrap().is_notnull());
        assert!(table.has_primary_key());
        assert_eq!(table.primary_key_columns().unwrap(), vec!["id"]);
        assert_eq!(table.primary_key().unwrap().name(), "primary");
    }

    #[test]
    fn test_second_primary_key_fails() {
        let mut table = table_with(&["id", "other"]);
        table.set_primary_key(&["id"], None).unwrap();
        let err = table.set_primary_key(&["other"], Some("pk2")).unwrap_err();
        assert_eq!(err.code(), Some(60));
    }

    #[test]
    fn test_no_primary_key() {
        let table = table_with(&["id"]);
        assert_eq!(
            table.primary_key_columns().unwrap_err(),
            SchemaError::NoPrimaryKey("foo".into())
        );
    }

    #[test]
    fn test_add_index_validates() {
        let mut table = table_with(&["bar"]);
        assert_eq!(
            table.add_index(&["missing"], None).unwrap_err().code(),
            Some(30)
        );
        assert_eq!(
            table.add_index(&["bar"], Some("bad-name")).unwrap_err().code(),
            Some(90)
        );
        table.add_index(&["bar"], Some("my_idx")).unwrap();
        assert_eq!(
            table.add_index(&["bar"], Some("MY_IDX")).unwrap_err().code(),
            Some(60)
        );
    }

    #[test]
    fn test_generated_index_names() {
        let mut table = Table::new("test").unwrap();
        table.add_column(Column::new("foo", ColumnType::Int)).unwrap();
        table.add_column(Column::new("bar", ColumnType::Int)).unwrap();
        table.add_unique_index(&["foo", "bar"], None).unwrap();
        assert!(table.has_index("UNIQ_D87F7E0C8C73652176FF8CAA"));
    }

    #[test]
    fn test_implicit_index_created_and_replaced() {
        let mut table = table_with(&["id", "other_id"]);
        table
            .add_foreign_key_constraint("other", &["other_id"], &["id"], IndexMap::new(), None)
            .unwrap();

        let implicit: Vec<&Index> = table.indexes().values().filter(|i| i.is_implicit()).collect();
        assert_eq!(implicit.len(), 1);
        assert!(implicit[0].spans_columns(&["other_id"]));

        table.add_index(&["other_id"], Some("explicit_idx")).unwrap();
        assert_eq!(table.indexes().len(), 1);
        assert!(table.has_index("explicit_idx"));
        assert!(!table.index("explicit_idx").unwrap().is_implicit());
    }

    #[test]
    fn test_existing_index_fulfills_foreign_key() {
        let mut table = table_with(&["id", "other_id"]);
        table.add_unique_index(&["other_id"], Some("uniq_other")).unwrap();
        table
            .add_foreign_key_constraint("other", &["other_id"], &["id"], IndexMap::new(), Some("fk_other"))
            .unwrap();
        assert_eq!(table.indexes().len(), 1);
        assert!(table.has_foreign_key("FK_OTHER"));
        assert_eq!(
            table.foreign_key("fk_other").unwrap().local_table_name().as_deref(),
            Some("foo")
        );
    }

    #[test]
    fn test_foreign_key_validates_columns() {
        let mut table = table_with(&["id"]);
        let foreign = table_with(&["id"]);

        let err = table
            .add_foreign_key_constraint(&foreign, &["id"], &["missing"], IndexMap::new(), None)
            .unwrap_err();
        assert_eq!(err.code(), Some(30));

        let err = table
            .add_foreign_key_constraint("bar", &["missing"], &["id"], IndexMap::new(), None)
            .unwrap_err();
        assert_eq!(err.code(), Some(30));
        assert!(table.foreign_keys().is_empty());
        assert!(table.indexes().is_empty());
    }

    #[test]
    fn test_remove_foreign_key() {
        let mut table = table_with(&["id"]);
        assert_eq!(table.remove_foreign_key("nope").unwrap_err().code(), Some(100));
        table
            .add_foreign_key_constraint("bar", &["id"], &["id"], IndexMap::new(), Some("fk"))
            .unwrap();
        table.remove_foreign_key("FK").unwrap();
        assert!(!table.has_foreign_key("fk"));
    }

    #[test]
    fn test_rename_index() {
        let mut table = table_with(&["bar", "baz"]);
        table.add_index_with(&["bar"], Some("idx_bar"), &["fulltext"], IndexMap::new()).unwrap();
        table.add_unique_index(&["baz"], Some("uniq_baz")).unwrap();

        table.rename_index("idx_bar", Some("idx_renamed")).unwrap();
        assert!(!table.has_index("idx_bar"));
        assert!(table.index("idx_renamed").unwrap().has_flag("fulltext"));

        table.rename_index("uniq_baz", Some("uniq_renamed")).unwrap();
        assert!(table.index("uniq_renamed").unwrap().is_unique());

        assert_eq!(
            table.rename_index("missing", Some("x")).unwrap_err().code(),
            Some(50)
        );
        assert_eq!(
            table.rename_index("idx_renamed", Some("uniq_renamed")).unwrap_err().code(),
            Some(60)
        );
        table.rename_index("idx_renamed", Some("IDX_RENAMED")).unwrap();
    }

    #[test]
    fn test_rename_primary_key() {
        let mut table = table_with(&["id"]);
        table.set_primary_key(&["id"], None).unwrap();
        table.rename_index("primary", Some("pk_foo")).unwrap();
        assert_eq!(table.primary_key().unwrap().name(), "pk_foo");
        assert!(!table.has_index("primary"));
    }

    fn partial(predicate: &str) -> IndexMap<String, Value> {
        let mut options = IndexMap::new();
        options.insert("where".to_string(), Value::from(predicate));
        options
    }

    fn index_keys(table: &Table) -> Vec<&str> {
        table.indexes().keys().map(String::as_str).collect()
    }

    #[test]
    fn test_rename_index_keeps_flags_options_and_position() {
        let mut table = table_with(&["a", "b", "c"]);
        table.add_index(&["a"], Some("first")).unwrap();
        table
            .add_index_with(&["b"], Some("ix"), &["fulltext"], partial("b > 0"))
            .unwrap();
        table
            .add_unique_index_with(&["c"], Some("uniq_c"), partial("c > 0"))
            .unwrap();

        table.rename_index("ix", Some("ix2")).unwrap();
        let renamed = table.index("ix2").unwrap();
        assert!(renamed.has_flag("fulltext"));
        assert_eq!(renamed.where_clause().as_deref(), Some("b > 0"));
        assert_eq!(index_keys(&table), vec!["first", "ix2", "uniq_c"]);

        table.rename_index("uniq_c", None).unwrap();
        let generated = table.generate_name(&["c".to_string()], "uniq");
        let renamed = table.index(&generated).unwrap();
        assert!(renamed.is_unique());
        assert_eq!(renamed.where_clause().as_deref(), Some("c > 0"));
        assert_eq!(index_keys(&table)[2], normalize_identifier(&generated));
    }

    #[test]
    fn test_failed_rename_leaves_indexes_untouched() {
        let mut table = table_with(&["a", "b"]);
        table.add_index(&["a"], Some("first")).unwrap();
        table.add_index(&["b"], Some("second")).unwrap();

        assert_eq!(
            table.rename_index("first", Some("bad-name")).unwrap_err().code(),
            Some(90)
        );
        assert_eq!(
            table.rename_index("first", Some("SECOND")).unwrap_err().code(),
            Some(60)
        );
        assert_eq!(index_keys(&table), vec!["first", "second"]);
    }

    #[test]
    fn test_failed_foreign_key_leaves_table_unchanged() {
        let mut table = table_with(&["a"]);
        let taken = table.generate_name(&["a".to_string()], "idx");
        table
            .add_index_with(&["a"], Some(taken.as_str()), &[], partial("a > 0"))
            .unwrap();

        let err = table
            .add_foreign_key_constraint("u", &["a"], &["id"], IndexMap::new(), Some("fk_a"))
            .unwrap_err();
        assert_eq!(err.code(), Some(60));
        assert!(!table.has_foreign_key("fk_a"));
        assert!(table.foreign_keys().is_empty());
        assert_eq!(table.indexes().len(), 1);
        assert!(!table.index(&taken).unwrap().is_implicit());
    }

    #[test]
    fn test_duplicate_foreign_key_name() {
        let mut table = table_with(&["a", "b"]);
        table
            .add_foreign_key_constraint("u", &["a"], &["id"], IndexMap::new(), Some("fk_x"))
            .unwrap();

        let err = table
            .add_foreign_key_constraint("v", &["b"], &["id"], IndexMap::new(), Some("FK_X"))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::ForeignKeyAlreadyExists {
                name: "fk_x".into(),
                table: "foo".into(),
            }
        );
        assert_eq!(table.foreign_key("fk_x").unwrap().foreign_table_name(), "u");
        assert_eq!(table.indexes().len(), 1);
        assert!(!table.columns_are_indexed(&["b"]));
    }

    #[test]
    fn test_drop_index_and_primary_key() {
        let mut table = table_with(&["id"]);
        assert_eq!(table.drop_index("nope").unwrap_err().code(), Some(50));
        assert!(table.drop_primary_key().is_err());
        table.set_primary_key(&["id"], None).unwrap();
        table.drop_primary_key().unwrap();
        assert!(!table.has_primary_key());
        assert!(table.indexes().is_empty());
    }

    #[test]
    fn test_column_order() {
        let mut table = table_with(&["name", "other_id", "id"]);
        table.set_primary_key(&["id"], None).unwrap();
        table
            .add_foreign_key_constraint("other", &["other_id"], &["id"], IndexMap::new(), None)
            .unwrap();

        let names: Vec<String> = table.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["id", "other_id", "name"]);
    }

    #[test]
    fn test_columns_are_indexed() {
        let mut table = table_with(&["a", "b"]);
        table.add_index(&["a", "b"], None).unwrap();
        assert!(table.columns_are_indexed(&["A", "b"]));
        assert!(!table.columns_are_indexed(&["b", "a"]));
    }

    #[test]
    fn test_from_parts() {
        let table = Table::from_parts(
            "foo",
            vec![Column::new("id", ColumnType::Int), Column::new("bar_id", ColumnType::Int)],
            vec![Index::new("primary", &["id"], true, true)],
            vec![ForeignKeyConstraint::new(&["bar_id"], "bar", &["id"], "fk_bar")],
            IndexMap::new(),
        )
        .unwrap();

        assert!(table.has_primary_key());
        assert!(table.has_foreign_key("fk_bar"));
        assert_eq!(table.indexes().len(), 2);
    }

    #[test]
    fn test_options() {
        let mut table = table_with(&[]);
        table.add_option("engine", "MyISAM");
        assert!(table.has_option("engine"));
        assert_eq!(table.option("engine"), Some(&Value::String("MyISAM".into())));
    }
}
