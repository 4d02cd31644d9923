//! Foreign key constraints.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset::{normalize_identifier, trim_quotes, Asset, Identifier};
use crate::index::{value_text, Index};
use crate::platform::Platform;
use crate::table::Table;

/// Referential actions accepted for `onUpdate`/`onDelete`.
pub const REFERENTIAL_ACTIONS: [&str; 5] =
    ["CASCADE", "SET NULL", "NO ACTION", "RESTRICT", "SET DEFAULT"];

/// The table a foreign key points to.
#[derive(Debug, Clone, Copy)]
pub enum ForeignTableRef<'a> {
    /// Reference by name only; foreign columns are not validated.
    Name(&'a str),
    /// Reference to a live table; foreign columns must exist on it.
    Table(&'a Table),
}

impl<'a> From<&'a str> for ForeignTableRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a Table> for ForeignTableRef<'a> {
    fn from(table: &'a Table) -> Self {
        Self::Table(table)
    }
}

impl ForeignTableRef<'_> {
    /// Returns the referenced table name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Name(name) => (*name).to_string(),
            Self::Table(table) => table.name(),
        }
    }
}

/// A foreign key from local columns onto a foreign table.
///
/// The local table is stored by name only; the declaring [`Table`] owns the
/// constraint and sets the name when the constraint is added to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    name: Identifier,
    local_table: Option<Identifier>,
    local_columns: Vec<Identifier>,
    foreign_table: Identifier,
    foreign_columns: Vec<Identifier>,
    options: IndexMap<String, Value>,
}

impl ForeignKeyConstraint {
    /// Creates a constraint. An empty `name` leaves it unnamed.
    #[must_use]
    pub fn new<L, F>(local_columns: &[L], foreign_table: &str, foreign_columns: &[F], name: &str) -> Self
    where
        L: AsRef<str>,
        F: AsRef<str>,
    {
        Self {
            name: Identifier::new(name),
            local_table: None,
            local_columns: local_columns
                .iter()
                .map(|c| Identifier::new(c.as_ref()))
                .collect(),
            foreign_table: Identifier::new(foreign_table),
            foreign_columns: foreign_columns
                .iter()
                .map(|c| Identifier::new(c.as_ref()))
                .collect(),
            options: IndexMap::new(),
        }
    }

    /// Sets an option such as `onDelete`, `onUpdate` or `match`.
    #[must_use]
    pub fn with_option(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.options.insert(name.to_string(), value.into());
        self
    }

    /// Merges options into the existing ones.
    #[must_use]
    pub fn with_options(mut self, options: IndexMap<String, Value>) -> Self {
        self.options.extend(options);
        self
    }

    pub(crate) fn set_local_table(&mut self, table: &Identifier) {
        self.local_table = Some(table.clone());
    }

    /// Returns the name of the declaring table, once attached.
    #[must_use]
    pub fn local_table_name(&self) -> Option<String> {
        self.local_table.as_ref().map(Identifier::name)
    }

    /// Returns the declaring table identifier, once attached.
    #[must_use]
    pub const fn local_table(&self) -> Option<&Identifier> {
        self.local_table.as_ref()
    }

    #[must_use]
    pub fn local_columns(&self) -> Vec<String> {
        self.local_columns.iter().map(Identifier::name).collect()
    }

    #[must_use]
    pub fn quoted_local_columns<P: Platform + ?Sized>(&self, platform: &P) -> Vec<String> {
        self.local_columns
            .iter()
            .map(|c| c.quoted_name(platform))
            .collect()
    }

    #[must_use]
    pub fn unquoted_local_columns(&self) -> Vec<String> {
        self.local_columns
            .iter()
            .map(|c| trim_quotes(&c.name()))
            .collect()
    }

    #[must_use]
    pub fn foreign_columns(&self) -> Vec<String> {
        self.foreign_columns.iter().map(Identifier::name).collect()
    }

    #[must_use]
    pub fn quoted_foreign_columns<P: Platform + ?Sized>(&self, platform: &P) -> Vec<String> {
        self.foreign_columns
            .iter()
            .map(|c| c.quoted_name(platform))
            .collect()
    }

    #[must_use]
    pub fn unquoted_foreign_columns(&self) -> Vec<String> {
        self.foreign_columns
            .iter()
            .map(|c| trim_quotes(&c.name()))
            .collect()
    }

    /// Returns the referenced table name, namespace included.
    #[must_use]
    pub fn foreign_table_name(&self) -> String {
        self.foreign_table.name()
    }

    /// Returns the lowercased referenced table name without namespace.
    #[must_use]
    pub fn unqualified_foreign_table_name(&self) -> String {
        self.foreign_table
            .name()
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    #[must_use]
    pub fn quoted_foreign_table_name<P: Platform + ?Sized>(&self, platform: &P) -> String {
        self.foreign_table.quoted_name(platform)
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

    /// Returns the `ON UPDATE` action; `NO ACTION` and `RESTRICT` count as
    /// none.
    #[must_use]
    pub fn on_update(&self) -> Option<String> {
        self.referential_action("onUpdate")
    }

    /// Returns the `ON DELETE` action; `NO ACTION` and `RESTRICT` count as
    /// none.
    #[must_use]
    pub fn on_delete(&self) -> Option<String> {
        self.referential_action("onDelete")
    }

    fn referential_action(&self, event: &str) -> Option<String> {
        let action = value_text(self.option(event)?).to_uppercase();
        match action.as_str() {
            "NO ACTION" | "RESTRICT" => None,
            _ => Some(action),
        }
    }

    /// Returns whether any column of `index` is one of the local columns.
    #[must_use]
    pub fn intersects_index_columns(&self, index: &Index) -> bool {
        let local: Vec<String> = self
            .local_columns
            .iter()
            .map(|c| normalize_identifier(&c.name()))
            .collect();

        index
            .columns()
            .iter()
            .any(|c| local.contains(&normalize_identifier(c)))
    }
}

impl Asset for ForeignKeyConstraint {
    fn identifier(&self) -> &Identifier {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk() -> ForeignKeyConstraint {
        ForeignKeyConstraint::new(&["user_id"], "app.Users", &["id"], "fk_user")
    }

    #[test]
    fn test_names() {
        let fk = fk();
        assert_eq!(fk.name(), "fk_user");
        assert_eq!(fk.foreign_table_name(), "app.Users");
        assert_eq!(fk.unqualified_foreign_table_name(), "users");
        assert_eq!(fk.local_table_name(), None);
    }

    #[test]
    fn test_referential_actions() {
        let fk = fk()
            .with_option("onDelete", "cascade")
            .with_option("onUpdate", "restrict");
        assert_eq!(fk.on_delete().as_deref(), Some("CASCADE"));
        assert_eq!(fk.on_update(), None);

        let plain = self::fk().with_option("onDelete", "NO ACTION");
        assert_eq!(plain.on_delete(), None);
    }

    #[test]
    fn test_intersects_index_columns() {
        let fk = fk();
        let hit = Index::new("idx", &["USER_ID", "other"], false, false);
        let miss = Index::new("idx", &["other"], false, false);
        assert!(fk.intersects_index_columns(&hit));
        assert!(!fk.intersects_index_columns(&miss));
    }

    #[test]
    fn test_unquoted_columns() {
        let fk = ForeignKeyConstraint::new(&["`order`"], "`group`", &["`id`"], "");
        assert_eq!(fk.unquoted_local_columns(), vec!["order"]);
        assert_eq!(fk.unquoted_foreign_columns(), vec!["id"]);
        assert_eq!(fk.name(), "");
    }
}
