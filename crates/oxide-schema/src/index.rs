//! Table indexes.
//!
//! Besides plain, unique and primary indexes, a table keeps indexes it
//! created on its own to back a foreign key. Those carry
//! [`IndexOrigin::Implicit`] and are replaced silently once an index that
//! fulfills them is added.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset::{normalize_identifier, trim_quotes, Asset, Identifier};
use crate::platform::Platform;

/// How an index came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexOrigin {
    /// Declared by the caller.
    #[default]
    Explicit,
    /// Created by the table to back a foreign key.
    Implicit,
}

/// An index over an ordered list of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    name: Identifier,
    columns: Vec<Identifier>,
    unique: bool,
    primary: bool,
    flags: Vec<String>,
    options: IndexMap<String, Value>,
    origin: IndexOrigin,
}

impl Index {
    /// Creates an index. A primary index is always unique.
    #[must_use]
    pub fn new<S: AsRef<str>>(name: &str, columns: &[S], unique: bool, primary: bool) -> Self {
        Self {
            name: Identifier::new(name),
            columns: columns.iter().map(|c| Identifier::new(c.as_ref())).collect(),
            unique: unique || primary,
            primary,
            flags: Vec::new(),
            options: IndexMap::new(),
            origin: IndexOrigin::Explicit,
        }
    }

    /// Adds a platform hint such as `fulltext`.
    #[must_use]
    pub fn with_flag(mut self, flag: &str) -> Self {
        self.add_flag(flag);
        self
    }

    /// Sets the flags, replacing existing ones.
    #[must_use]
    pub fn with_flags<S: AsRef<str>>(mut self, flags: &[S]) -> Self {
        self.flags.clear();
        for flag in flags {
            self.add_flag(flag.as_ref());
        }
        self
    }

    /// Sets an option such as `where`.
    #[must_use]
    pub fn with_option(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.options.insert(name.to_lowercase(), value.into());
        self
    }

    /// Replaces all options.
    #[must_use]
    pub fn with_options(mut self, options: IndexMap<String, Value>) -> Self {
        self.options = options
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        self
    }

    #[must_use]
    pub(crate) fn with_origin(mut self, origin: IndexOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Adds a flag; flags are stored lowercase and kept unique.
    pub fn add_flag(&mut self, flag: &str) {
        let flag = flag.to_lowercase();
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
    }

    /// Removes a flag.
    pub fn remove_flag(&mut self, flag: &str) {
        let flag = flag.to_lowercase();
        self.flags.retain(|f| *f != flag);
    }

    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(&flag.to_lowercase())
    }

    #[must_use]
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(&name.to_lowercase())
    }

    #[must_use]
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(&name.to_lowercase())
    }

    #[must_use]
    pub const fn options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    /// Returns the partial-index predicate.
    #[must_use]
    pub fn where_clause(&self) -> Option<String> {
        self.option("where").map(value_text)
    }

    /// Returns the column names as declared.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.columns.iter().map(Identifier::name).collect()
    }

    /// Returns the column names quoted for `platform` where needed.
    #[must_use]
    pub fn quoted_columns<P: Platform + ?Sized>(&self, platform: &P) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.quoted_name(platform))
            .collect()
    }

    /// Returns the column names with quote characters removed.
    #[must_use]
    pub fn unquoted_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| trim_quotes(&c.name()))
            .collect()
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.primary
    }

    /// Returns whether the index is neither unique nor primary.
    #[must_use]
    pub const fn is_simple_index(&self) -> bool {
        !self.unique && !self.primary
    }

    #[must_use]
    pub const fn origin(&self) -> IndexOrigin {
        self.origin
    }

    #[must_use]
    pub fn is_implicit(&self) -> bool {
        self.origin == IndexOrigin::Implicit
    }

    /// Returns whether `column` sits at `position` in the column list.
    #[must_use]
    pub fn has_column_at_position(&self, column: &str, position: usize) -> bool {
        let column = normalize_identifier(column);
        self.columns
            .iter()
            .position(|c| normalize_identifier(&c.name()) == column)
            == Some(position)
    }

    /// Returns whether the index covers exactly `columns`, in order.
    #[must_use]
    pub fn spans_columns<S: AsRef<str>>(&self, columns: &[S]) -> bool {
        self.columns.len() == columns.len()
            && self
                .columns
                .iter()
                .zip(columns)
                .all(|(own, other)| {
                    normalize_identifier(&own.name()) == normalize_identifier(other.as_ref())
                })
    }

    /// Returns whether `other` satisfies everything this index provides.
    #[must_use]
    pub fn is_fullfilled_by(&self, other: &Self) -> bool {
        if other.columns.len() != self.columns.len() {
            return false;
        }

        if !self.spans_columns(&other.columns()) || !self.same_partial_index(other) {
            return false;
        }

        if self.is_simple_index() {
            return true;
        }

        other.is_primary() == self.is_primary() && other.is_unique() == self.is_unique()
    }

    /// Returns whether this index makes `other` redundant.
    #[must_use]
    pub fn overrules(&self, other: &Self) -> bool {
        if other.is_primary() || (self.is_simple_index() && other.is_unique()) {
            return false;
        }

        self.spans_columns(&other.columns())
            && (self.is_primary() || self.is_unique())
            && self.same_partial_index(other)
    }

    /// Returns whether both indexes have the same partial predicate, or none.
    #[must_use]
    pub fn same_partial_index(&self, other: &Self) -> bool {
        self.where_clause() == other.where_clause()
    }
}

impl Asset for Index {
    fn identifier(&self) -> &Identifier {
        &self.name
    }
}

/// Renders an option value as plain text.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(unique: bool, primary: bool) -> Index {
        Index::new("foo", &["bar", "baz"], unique, primary)
    }

    #[test]
    fn test_primary_implies_unique() {
        let idx = index(false, true);
        assert!(idx.is_unique());
        assert!(idx.is_primary());
        assert!(!idx.is_simple_index());
    }

    #[test]
    fn test_fulfilled_by_unique() {
        let plain = index(false, false);
        let unique = index(true, false);
        let primary = index(true, true);

        assert!(plain.is_fullfilled_by(&plain));
        assert!(plain.is_fullfilled_by(&unique));
        assert!(plain.is_fullfilled_by(&primary));
        assert!(unique.is_fullfilled_by(&unique));
        assert!(!unique.is_fullfilled_by(&primary));
        assert!(!unique.is_fullfilled_by(&plain));
        assert!(!primary.is_fullfilled_by(&unique));
    }

    #[test]
    fn test_fulfilled_with_partial() {
        let without = index(false, false);
        let partial = index(false, false).with_option("where", "bar IS NULL");
        let other_partial = index(false, false).with_option("where", "bar IS NULL");

        assert!(partial.is_fullfilled_by(&other_partial));
        assert!(!without.is_fullfilled_by(&partial));
        assert!(!partial.is_fullfilled_by(&without));
    }

    #[test]
    fn test_overrules() {
        let plain = index(false, false);
        let unique = index(true, false);
        let primary = index(true, true);

        assert!(unique.overrules(&plain));
        assert!(primary.overrules(&unique));
        assert!(!plain.overrules(&unique));
        assert!(!unique.overrules(&primary));

        let other_cols = Index::new("foo", &["baz", "bar"], true, false);
        assert!(!other_cols.overrules(&plain));
    }

    #[test]
    fn test_spans_columns_case_insensitive() {
        let idx = Index::new("foo", &["`Bar`", "baz"], false, false);
        assert!(idx.spans_columns(&["bar", "BAZ"]));
        assert!(!idx.spans_columns(&["baz", "bar"]));
        assert!(!idx.spans_columns(&["bar"]));
    }

    #[test]
    fn test_column_at_position() {
        let idx = index(false, false);
        assert!(idx.has_column_at_position("bar", 0));
        assert!(idx.has_column_at_position("BAZ", 1));
        assert!(!idx.has_column_at_position("baz", 0));
    }

    #[test]
    fn test_flags() {
        let mut idx = index(false, false).with_flag("FULLTEXT");
        assert!(idx.has_flag("fulltext"));
        idx.add_flag("fulltext");
        assert_eq!(idx.flags().len(), 1);
        idx.remove_flag("Fulltext");
        assert!(!idx.has_flag("fulltext"));
    }

    #[test]
    fn test_options_are_case_insensitive() {
        let idx = index(false, false).with_option("WHERE", "x > 1");
        assert!(idx.has_option("where"));
        assert_eq!(idx.where_clause().as_deref(), Some("x > 1"));
    }
}
