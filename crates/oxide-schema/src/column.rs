//! Column definitions.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset::{Asset, Identifier};
use crate::types::ColumnType;

/// Default value of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default, also used for expressions such as `CURRENT_TIMESTAMP`.
    String(String),
}

impl DefaultValue {
    /// Returns the value as the text placed inside a DEFAULT clause.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Loose equality: numeric forms compare by value, everything else by
    /// rendered text, so `1`, `"1"` and `true` are all equal.
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        let (left, right) = (self.as_text(), other.as_text());
        match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
            (Ok(a), Ok(b)) => (a - b).abs() < f64::EPSILON,
            _ => left == right,
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: Identifier,
    column_type: ColumnType,
    length: Option<u32>,
    precision: u32,
    scale: u32,
    unsigned: bool,
    fixed: bool,
    notnull: bool,
    default: Option<DefaultValue>,
    autoincrement: bool,
    comment: Option<String>,
    values: Vec<String>,
    platform_options: IndexMap<String, Value>,
    custom_schema_options: IndexMap<String, Value>,
    column_definition: Option<String>,
}

impl Column {
    /// Creates a NOT NULL column without default.
    #[must_use]
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: Identifier::new(name),
            column_type,
            length: None,
            precision: 10,
            scale: 0,
            unsigned: false,
            fixed: false,
            notnull: true,
            default: None,
            autoincrement: false,
            comment: None,
            values: Vec::new(),
            platform_options: IndexMap::new(),
            custom_schema_options: IndexMap::new(),
            column_definition: None,
        }
    }

    // ====================================================================
    // Builders
    // ====================================================================

    /// Sets the column type.
    #[must_use]
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    /// Sets the length of string and binary columns.
    #[must_use]
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the precision of decimal columns.
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the scale of decimal columns.
    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    /// Marks a numeric column unsigned.
    #[must_use]
    pub fn with_unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    /// Marks a string column fixed-width.
    #[must_use]
    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Sets NOT NULL.
    #[must_use]
    pub fn with_notnull(mut self, notnull: bool) -> Self {
        self.notnull = notnull;
        self
    }

    /// Shorthand for `with_notnull(false)`.
    #[must_use]
    pub fn nullable(self) -> Self {
        self.with_notnull(false)
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Clears the default value.
    #[must_use]
    pub fn without_default(mut self) -> Self {
        self.default = None;
        self
    }

    /// Marks the column auto-incrementing.
    #[must_use]
    pub fn with_autoincrement(mut self, autoincrement: bool) -> Self {
        self.autoincrement = autoincrement;
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the value list of ENUM and SET columns.
    #[must_use]
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Sets a platform option such as `charset` or `collation`.
    #[must_use]
    pub fn with_platform_option(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.platform_options.insert(name.to_string(), value.into());
        self
    }

    /// Sets a custom schema option such as `unique` or `check`.
    #[must_use]
    pub fn with_custom_schema_option(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.custom_schema_options
            .insert(name.to_string(), value.into());
        self
    }

    /// Replaces the generated declaration with a verbatim one.
    #[must_use]
    pub fn with_column_definition(mut self, definition: impl Into<String>) -> Self {
        self.column_definition = Some(definition.into());
        self
    }

    pub(crate) fn set_notnull(&mut self, notnull: bool) {
        self.notnull = notnull;
    }

    pub(crate) fn set_length(&mut self, length: u32) {
        self.length = Some(length);
    }

    // ====================================================================
    // Accessors
    // ====================================================================

    /// Returns the column type.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns the explicit length.
    #[must_use]
    pub const fn length(&self) -> Option<u32> {
        self.length
    }

    /// Returns the decimal precision.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the decimal scale.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        self.fixed
    }

    #[must_use]
    pub const fn is_notnull(&self) -> bool {
        self.notnull
    }

    #[must_use]
    pub const fn is_autoincrement(&self) -> bool {
        self.autoincrement
    }

    /// Returns the default value.
    #[must_use]
    pub const fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Returns the comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the ENUM/SET value list.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the verbatim declaration override.
    #[must_use]
    pub fn column_definition(&self) -> Option<&str> {
        self.column_definition.as_deref()
    }

    #[must_use]
    pub fn has_platform_option(&self, name: &str) -> bool {
        self.platform_options.contains_key(name)
    }

    #[must_use]
    pub fn platform_option(&self, name: &str) -> Option<&Value> {
        self.platform_options.get(name)
    }

    #[must_use]
    pub const fn platform_options(&self) -> &IndexMap<String, Value> {
        &self.platform_options
    }

    #[must_use]
    pub fn has_custom_schema_option(&self, name: &str) -> bool {
        self.custom_schema_options.contains_key(name)
    }

    #[must_use]
    pub fn custom_schema_option(&self, name: &str) -> Option<&Value> {
        self.custom_schema_options.get(name)
    }

    #[must_use]
    pub const fn custom_schema_options(&self) -> &IndexMap<String, Value> {
        &self.custom_schema_options
    }

    /// Looks up an option in the platform options first, then in the
    /// custom schema options.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.platform_options
            .get(name)
            .or_else(|| self.custom_schema_options.get(name))
    }
}

impl Asset for Column {
    fn identifier(&self) -> &Identifier {
        &self.name
    }
}
