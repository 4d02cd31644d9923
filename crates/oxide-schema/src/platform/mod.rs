//! SQL platforms.
//!
//! A [`Platform`] renders schema objects and diffs into the DDL of one
//! database vendor. Shared behavior lives in the trait's default methods;
//! each dialect overrides only what differs. [`MySqlPlatform`] is the
//! reference dialect.

mod keywords;
mod mysql;

use std::ops::BitOr;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

pub use keywords::{KeywordList, MYSQL_KEYWORDS};
pub use mysql::MySqlPlatform;

use crate::asset::{Asset, Identifier};
use crate::column::{Column, DefaultValue};
use crate::diff::TableDiff;
use crate::error::{Result, SchemaError};
use crate::foreign_key::{ForeignKeyConstraint, REFERENTIAL_ACTIONS};
use crate::index::{value_text, Index};
use crate::sequence::Sequence;
use crate::table::Table;
use crate::types::{ColumnType, TypeCategory};

// ============================================================================
// Flags and enums
// ============================================================================

/// Selects which parts of a table [`Platform::create_table_sql`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CreateFlags(u8);

impl CreateFlags {
    /// Render indexes and the primary key.
    pub const CREATE_INDEXES: Self = Self(1);
    /// Render foreign key constraints.
    pub const CREATE_FOREIGNKEYS: Self = Self(2);

    /// Renders columns only.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns whether every flag of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for CreateFlags {
    fn default() -> Self {
        Self::CREATE_INDEXES
    }
}

impl BitOr for CreateFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Position argument of TRIM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimMode {
    #[default]
    Unspecified,
    Leading,
    Trailing,
    Both,
}

/// Direction of date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOperator {
    Add,
    Sub,
}

impl DateOperator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
        }
    }
}

/// Unit of a date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateIntervalUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl DateIntervalUnit {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Second => "SECOND",
            Self::Minute => "MINUTE",
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Quarter => "QUARTER",
            Self::Year => "YEAR",
        }
    }
}

/// Transaction isolation levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionIsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl TransactionIsolationLevel {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

/// A constraint rendered by [`Platform::create_constraint_sql`].
#[derive(Debug, Clone, Copy)]
pub enum ConstraintRef<'a> {
    Index(&'a Index),
    ForeignKey(&'a ForeignKeyConstraint),
}

/// Everything a dialect needs to render one `CREATE TABLE` statement.
#[derive(Debug, Clone)]
pub struct TableDefinition<'a> {
    /// Quoted table name.
    pub name: String,
    pub table: &'a Table,
    /// Columns keyed by quoted name, string lengths already defaulted.
    pub columns: IndexMap<String, Column>,
    /// Quoted primary key columns.
    pub primary: Vec<String>,
    /// Secondary indexes keyed by quoted name.
    pub indexes: IndexMap<String, &'a Index>,
    pub foreign_keys: Vec<&'a ForeignKeyConstraint>,
    pub options: &'a IndexMap<String, Value>,
}

impl TableDefinition<'_> {
    /// Returns a table option as text.
    #[must_use]
    pub fn option_text(&self, name: &str) -> Option<String> {
        self.options.get(name).map(value_text)
    }

    /// Returns whether a table option is set to a truthy value.
    #[must_use]
    pub fn has_flag_option(&self, name: &str) -> bool {
        match self.options.get(name) {
            None | Some(Value::Null | Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty() && s != "0",
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(_) => true,
        }
    }
}

// ============================================================================
// Platform trait
// ============================================================================

/// DDL and expression rendering for one SQL dialect.
///
/// Table arguments of the rendering methods are already quoted names.
pub trait Platform: Send + Sync {
    /// Returns the platform name.
    fn name(&self) -> &'static str;

    /// Returns the reserved keywords of the platform.
    fn reserved_keywords(&self) -> &KeywordList;

    // ------------------------------------------------------------------------
    // Quoting
    // ------------------------------------------------------------------------

    fn identifier_quote_character(&self) -> char {
        '"'
    }

    fn string_literal_quote_character(&self) -> char {
        '\''
    }

    /// Quotes each dotted segment of `identifier`.
    fn quote_identifier(&self, identifier: &str) -> String {
        identifier
            .split('.')
            .map(|part| self.quote_single_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes one identifier segment, doubling embedded quote characters.
    fn quote_single_identifier(&self, identifier: &str) -> String {
        let c = self.identifier_quote_character();
        format!("{c}{}{c}", identifier.replace(c, &format!("{c}{c}")))
    }

    fn quote_string_literal(&self, literal: &str) -> String {
        let c = self.string_literal_quote_character();
        format!("{c}{}{c}", literal.replace(c, &format!("{c}{c}")))
    }

    fn sql_comment_start_string(&self) -> &'static str {
        "--"
    }

    fn sql_comment_end_string(&self) -> &'static str {
        "\n"
    }

    fn wildcards(&self) -> &'static [&'static str] {
        &["%", "_"]
    }

    // ------------------------------------------------------------------------
    // Limits and capabilities
    // ------------------------------------------------------------------------

    fn max_identifier_length(&self) -> usize {
        63
    }

    fn varchar_max_length(&self) -> u32 {
        4000
    }

    fn varchar_default_length(&self) -> u32 {
        255
    }

    fn binary_max_length(&self) -> u32 {
        4000
    }

    fn supports_sequences(&self) -> bool {
        false
    }

    fn supports_identity_columns(&self) -> bool {
        false
    }

    fn prefers_sequences(&self) -> bool {
        false
    }

    fn prefers_identity_columns(&self) -> bool {
        false
    }

    fn supports_indexes(&self) -> bool {
        true
    }

    fn supports_partial_indexes(&self) -> bool {
        false
    }

    fn supports_alter_table(&self) -> bool {
        true
    }

    fn supports_transactions(&self) -> bool {
        true
    }

    fn supports_savepoints(&self) -> bool {
        true
    }

    fn supports_release_savepoints(&self) -> bool {
        self.supports_savepoints()
    }

    fn supports_primary_constraints(&self) -> bool {
        true
    }

    fn supports_foreign_key_constraints(&self) -> bool {
        true
    }

    fn supports_foreign_key_on_update(&self) -> bool {
        self.supports_foreign_key_constraints()
    }

    fn supports_schemas(&self) -> bool {
        false
    }

    fn can_emulate_schemas(&self) -> bool {
        false
    }

    fn supports_create_drop_database(&self) -> bool {
        true
    }

    fn supports_inline_column_comments(&self) -> bool {
        false
    }

    fn supports_comment_on_statement(&self) -> bool {
        false
    }

    fn supports_views(&self) -> bool {
        true
    }

    fn supports_column_collation(&self) -> bool {
        false
    }

    fn supports_limit_offset(&self) -> bool {
        true
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn regexp_expression(&self) -> Result<String> {
        Err(SchemaError::not_supported("regexp_expression"))
    }

    fn guid_expression(&self) -> Result<String> {
        Err(SchemaError::not_supported("guid_expression"))
    }

    fn avg_expression(&self, column: &str) -> String {
        format!("AVG({column})")
    }

    fn count_expression(&self, column: &str) -> String {
        format!("COUNT({column})")
    }

    fn max_expression(&self, column: &str) -> String {
        format!("MAX({column})")
    }

    fn min_expression(&self, column: &str) -> String {
        format!("MIN({column})")
    }

    fn sum_expression(&self, column: &str) -> String {
        format!("SUM({column})")
    }

    fn md5_expression(&self, column: &str) -> String {
        format!("MD5({column})")
    }

    fn length_expression(&self, column: &str) -> String {
        format!("LENGTH({column})")
    }

    fn sqrt_expression(&self, column: &str) -> String {
        format!("SQRT({column})")
    }

    fn round_expression(&self, column: &str, decimals: u32) -> String {
        format!("ROUND({column}, {decimals})")
    }

    fn mod_expression(&self, left: &str, right: &str) -> String {
        format!("MOD({left}, {right})")
    }

    /// Renders `TRIM([mode] [char FROM] value)`.
    fn trim_expression(&self, value: &str, mode: TrimMode, character: Option<&str>) -> String {
        let mut expression = String::new();
        match mode {
            TrimMode::Leading => expression.push_str("LEADING "),
            TrimMode::Trailing => expression.push_str("TRAILING "),
            TrimMode::Both => expression.push_str("BOTH "),
            TrimMode::Unspecified => {}
        }

        if let Some(character) = character {
            expression.push_str(character);
            expression.push(' ');
        }

        if mode != TrimMode::Unspecified || character.is_some() {
            expression.push_str("FROM ");
        }

        format!("TRIM({expression}{value})")
    }

    fn rtrim_expression(&self, value: &str) -> String {
        format!("RTRIM({value})")
    }

    fn ltrim_expression(&self, value: &str) -> String {
        format!("LTRIM({value})")
    }

    fn upper_expression(&self, value: &str) -> String {
        format!("UPPER({value})")
    }

    fn lower_expression(&self, value: &str) -> String {
        format!("LOWER({value})")
    }

    fn locate_expression(&self, _value: &str, _substring: &str, _start: Option<&str>) -> Result<String> {
        Err(SchemaError::not_supported("locate_expression"))
    }

    fn now_expression(&self) -> String {
        "NOW()".to_string()
    }

    fn substring_expression(&self, value: &str, from: &str, length: Option<&str>) -> String {
        match length {
            Some(length) => format!("SUBSTRING({value} FROM {from} FOR {length})"),
            None => format!("SUBSTRING({value} FROM {from})"),
        }
    }

    fn concat_expression(&self, values: &[&str]) -> String {
        values.join(" || ")
    }

    fn not_expression(&self, expression: &str) -> String {
        format!("NOT({expression})")
    }

    fn is_null_expression(&self, expression: &str) -> String {
        format!("{expression} IS NULL")
    }

    fn is_not_null_expression(&self, expression: &str) -> String {
        format!("{expression} IS NOT NULL")
    }

    fn between_expression(&self, expression: &str, low: &str, high: &str) -> String {
        format!("{expression} BETWEEN {low} AND {high}")
    }

    fn acos_expression(&self, value: &str) -> String {
        format!("ACOS({value})")
    }

    fn sin_expression(&self, value: &str) -> String {
        format!("SIN({value})")
    }

    fn pi_expression(&self) -> String {
        "PI()".to_string()
    }

    fn cos_expression(&self, value: &str) -> String {
        format!("COS({value})")
    }

    fn date_diff_expression(&self, _date1: &str, _date2: &str) -> Result<String> {
        Err(SchemaError::not_supported("date_diff_expression"))
    }

    /// Renders `date <operator> interval unit`.
    fn date_arithmetic_interval_expression(
        &self,
        _date: &str,
        _operator: DateOperator,
        _interval: &str,
        _unit: DateIntervalUnit,
    ) -> Result<String> {
        Err(SchemaError::not_supported(
            "date_arithmetic_interval_expression",
        ))
    }

    fn date_add_expression(&self, date: &str, interval: &str, unit: DateIntervalUnit) -> Result<String> {
        self.date_arithmetic_interval_expression(date, DateOperator::Add, interval, unit)
    }

    fn date_sub_expression(&self, date: &str, interval: &str, unit: DateIntervalUnit) -> Result<String> {
        self.date_arithmetic_interval_expression(date, DateOperator::Sub, interval, unit)
    }

    fn bit_and_comparison_expression(&self, left: &str, right: &str) -> String {
        format!("({left} & {right})")
    }

    fn bit_or_comparison_expression(&self, left: &str, right: &str) -> String {
        format!("({left} | {right})")
    }

    // ------------------------------------------------------------------------
    // Column declarations
    // ------------------------------------------------------------------------

    /// Renders the type part of a column declaration.
    fn type_declaration_sql(&self, column: &Column) -> Result<String> {
        let ty = column.column_type();
        let unsigned = if column.is_unsigned() { " UNSIGNED" } else { "" };

        let sql = match ty {
            ColumnType::Int
            | ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::MediumInt
            | ColumnType::BigInt => format!(
                "{}{}",
                ty.name().to_uppercase(),
                self.common_integer_type_declaration_sql(column)
            ),
            ColumnType::Float | ColumnType::Double => {
                format!("{}{unsigned}", ty.name().to_uppercase())
            }
            ColumnType::Decimal => format!(
                "DECIMAL({},{}){unsigned}",
                column.precision(),
                column.scale()
            ),
            ColumnType::Bit => format!("BIT({})", column.length().unwrap_or(1).clamp(1, 64)),
            ColumnType::Char => format!(
                "CHAR({})",
                column
                    .length()
                    .filter(|l| *l > 0)
                    .map_or(255, |l| l.min(255))
            ),
            ColumnType::VarChar => self.varchar_type_declaration_sql(column),
            ColumnType::Text => self.clob_type_declaration_sql(column.length()),
            ColumnType::Blob => self.blob_type_declaration_sql(column.length()),
            ColumnType::Enum | ColumnType::Set => {
                let keyword = ty.name().to_uppercase();
                if column.values().is_empty() {
                    return Err(SchemaError::invalid_argument(format!(
                        "{keyword} need value list"
                    )));
                }
                let values: Vec<String> = column
                    .values()
                    .iter()
                    .map(|v| self.quote_string_literal(v))
                    .collect();
                format!("{keyword}({})", values.join(","))
            }
            _ => ty.name().to_uppercase(),
        };

        Ok(sql)
    }

    /// Renders the attributes shared by all integer types.
    fn common_integer_type_declaration_sql(&self, column: &Column) -> String {
        let mut sql = String::new();
        if column.is_unsigned() {
            sql.push_str(" UNSIGNED");
        }
        if column.is_autoincrement() {
            sql.push_str(" AUTO_INCREMENT");
        }
        sql
    }

    /// Renders `VARCHAR(n)`, or `CHAR(n)` for fixed columns. Lengths above
    /// [`Platform::varchar_max_length`] fall back to a large-object type.
    fn varchar_type_declaration_sql(&self, column: &Column) -> String {
        let length = column
            .length()
            .filter(|l| *l > 0)
            .unwrap_or_else(|| self.varchar_default_length());

        if length > self.varchar_max_length() {
            return self.clob_type_declaration_sql(Some(length));
        }

        if column.is_fixed() {
            format!("CHAR({length})")
        } else {
            format!("VARCHAR({length})")
        }
    }

    fn clob_type_declaration_sql(&self, _length: Option<u32>) -> String {
        "TEXT".to_string()
    }

    fn blob_type_declaration_sql(&self, _length: Option<u32>) -> String {
        "BLOB".to_string()
    }

    /// Renders `name <declaration>` for one column.
    fn column_declaration_sql(&self, name: &str, column: &Column) -> Result<String> {
        let mut declaration = if let Some(definition) = column.column_definition() {
            definition.to_string()
        } else {
            let type_sql = self.type_declaration_sql(column)?;
            let charset = option_clause(column, "charset", |c| {
                self.column_charset_declaration_sql(c)
            });
            let default = self.default_value_declaration_sql(column);
            let notnull = if column.is_notnull() { " NOT NULL" } else { "" };
            let unique = if column.option("unique").is_some_and(is_truthy) {
                " UNIQUE"
            } else {
                ""
            };
            let check = option_clause(column, "check", str::to_string);
            let collation = option_clause(column, "collation", |c| {
                self.column_collation_declaration_sql(c)
            });

            format!("{type_sql}{charset}{default}{notnull}{unique}{check}{collation}")
        };

        if self.supports_inline_column_comments() {
            if let Some(comment) = column.comment().filter(|c| !c.is_empty()) {
                declaration.push_str(" COMMENT ");
                declaration.push_str(&self.quote_string_literal(comment));
            }
        }

        Ok(format!("{name} {declaration}"))
    }

    /// Renders a comma separated list of column declarations.
    fn column_declaration_list_sql(&self, columns: &IndexMap<String, Column>) -> Result<String> {
        let declarations = columns
            .iter()
            .map(|(name, column)| self.column_declaration_sql(name, column))
            .collect::<Result<Vec<_>>>()?;
        Ok(declarations.join(", "))
    }

    /// Renders the DEFAULT clause of a column, with a leading space.
    fn default_value_declaration_sql(&self, column: &Column) -> String {
        default_value_declaration(self, column, column.default_value())
    }

    fn column_charset_declaration_sql(&self, _charset: &str) -> String {
        String::new()
    }

    fn column_collation_declaration_sql(&self, collation: &str) -> String {
        if self.supports_column_collation() {
            format!("COLLATE {collation}")
        } else {
            String::new()
        }
    }

    /// Renders `CHECK (...)` clauses.
    fn check_declaration_sql(&self, constraints: &[String]) -> String {
        constraints
            .iter()
            .map(|c| format!("CHECK ({c})"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn convert_booleans(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::Bool(true) => "1".to_string(),
            DefaultValue::Bool(false) => "0".to_string(),
            other => other.as_text(),
        }
    }

    fn current_date_sql(&self) -> &'static str {
        "CURRENT_DATE"
    }

    fn current_time_sql(&self) -> &'static str {
        "CURRENT_TIME"
    }

    fn current_timestamp_sql(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    // ------------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------------

    /// Renders the statements creating `table`.
    fn create_table_sql(&self, table: &Table, flags: CreateFlags) -> Result<Vec<String>> {
        if table.columns().is_empty() {
            return Err(SchemaError::NoColumnsSpecifiedForTable(table.name()));
        }

        let name = table.quoted_name(self);
        let mut definition = TableDefinition {
            name: name.clone(),
            table,
            columns: IndexMap::new(),
            primary: Vec::new(),
            indexes: IndexMap::new(),
            foreign_keys: Vec::new(),
            options: table.options(),
        };

        if flags.contains(CreateFlags::CREATE_INDEXES) {
            for index in table.indexes().values() {
                if index.is_primary() {
                    definition.primary = index.quoted_columns(self);
                } else {
                    definition.indexes.insert(index.quoted_name(self), index);
                }
            }
        }

        for column in table.columns() {
            let mut column = column.clone();
            if column.column_type().category() == TypeCategory::String
                && column.length().is_none()
            {
                column.set_length(self.varchar_default_length());
            }
            definition.columns.insert(column.quoted_name(self), column);
        }

        if flags.contains(CreateFlags::CREATE_FOREIGNKEYS) && self.supports_foreign_key_constraints() {
            definition.foreign_keys = table.foreign_keys().values().collect();
        }

        let mut sql = self.build_create_table_sql(&definition)?;

        if self.supports_comment_on_statement() {
            for column in table.columns() {
                if let Some(comment) = column.comment().filter(|c| !c.is_empty()) {
                    sql.push(self.comment_on_column_sql(&name, &column.quoted_name(self), comment));
                }
            }
        }

        debug!(platform = self.name(), table = %table.name(), statements = sql.len(), "rendered create table");
        Ok(sql)
    }

    /// Renders a prepared table definition.
    fn build_create_table_sql(&self, definition: &TableDefinition<'_>) -> Result<Vec<String>> {
        let mut column_list = self.column_declaration_list_sql(&definition.columns)?;

        if !definition.primary.is_empty() {
            column_list.push_str(&format!(", PRIMARY KEY({})", unique_list(&definition.primary).join(", ")));
        }

        for (name, index) in &definition.indexes {
            column_list.push_str(", ");
            column_list.push_str(&self.index_declaration_sql(name, index)?);
        }

        let mut sql = vec![format!("CREATE TABLE {} ({column_list})", definition.name)];
        for foreign_key in &definition.foreign_keys {
            sql.push(self.create_foreign_key_sql(foreign_key, &definition.name)?);
        }

        Ok(sql)
    }

    fn create_temporary_table_snippet_sql(&self) -> &'static str {
        "CREATE TEMPORARY TABLE"
    }

    fn comment_on_column_sql(&self, table: &str, column: &str, comment: &str) -> String {
        format!(
            "COMMENT ON COLUMN {}.{} IS {}",
            Identifier::new(table).quoted_name(self),
            Identifier::new(column).quoted_name(self),
            self.quote_string_literal(comment)
        )
    }

    fn drop_table_sql(&self, table: &str) -> String {
        format!("DROP TABLE {table}")
    }

    fn drop_temporary_table_sql(&self, table: &str) -> String {
        self.drop_table_sql(table)
    }

    fn truncate_table_sql(&self, table: &str, _cascade: bool) -> String {
        format!("TRUNCATE {table}")
    }

    /// Renders the statements altering a table. Not supported by default.
    fn alter_table_sql(&self, _diff: &TableDiff) -> Result<Vec<String>> {
        Err(SchemaError::not_supported("alter_table_sql"))
    }

    /// Renders the drops that must run before the body of an alter table.
    fn pre_alter_table_index_foreign_key_sql(&self, diff: &mut TableDiff) -> Result<Vec<String>> {
        Ok(drop_index_foreign_key_sql(self, diff))
    }

    /// Renders the creates that must run after the body of an alter table.
    fn post_alter_table_index_foreign_key_sql(&self, diff: &TableDiff) -> Result<Vec<String>> {
        create_index_foreign_key_sql(self, diff)
    }

    // ------------------------------------------------------------------------
    // Indexes and constraints
    // ------------------------------------------------------------------------

    fn index_field_declaration_list_sql(&self, columns: &[String]) -> String {
        columns.join(", ")
    }

    fn unique_constraint_declaration_sql(&self, name: &str, index: &Index) -> Result<String> {
        let columns = required_columns(index.quoted_columns(self))?;
        Ok(format!(
            "CONSTRAINT {} UNIQUE ({}){}",
            Identifier::new(name).quoted_name(self),
            self.index_field_declaration_list_sql(&columns),
            self.partial_index_sql(index)
        ))
    }

    fn index_declaration_sql(&self, name: &str, index: &Index) -> Result<String> {
        let columns = required_columns(index.quoted_columns(self))?;
        Ok(format!(
            "{}INDEX {} ({}){}",
            self.create_index_flags_sql(index),
            Identifier::new(name).quoted_name(self),
            self.index_field_declaration_list_sql(&columns),
            self.partial_index_sql(index)
        ))
    }

    /// Renders `CREATE INDEX`, or the primary key statement for a primary
    /// index.
    fn create_index_sql(&self, index: &Index, table: &str) -> Result<String> {
        let columns = required_columns(index.quoted_columns(self))?;

        if index.is_primary() {
            return Ok(self.create_primary_key_sql(index, table));
        }

        Ok(format!(
            "CREATE {}INDEX {} ON {table} ({}){}",
            self.create_index_flags_sql(index),
            index.quoted_name(self),
            self.index_field_declaration_list_sql(&columns),
            self.partial_index_sql(index)
        ))
    }

    fn create_index_flags_sql(&self, index: &Index) -> String {
        if index.is_unique() {
            "UNIQUE ".to_string()
        } else {
            String::new()
        }
    }

    fn partial_index_sql(&self, index: &Index) -> String {
        match index.where_clause() {
            Some(predicate) if self.supports_partial_indexes() => format!(" WHERE {predicate}"),
            _ => String::new(),
        }
    }

    fn create_primary_key_sql(&self, index: &Index, table: &str) -> String {
        format!(
            "ALTER TABLE {table} ADD PRIMARY KEY ({})",
            self.index_field_declaration_list_sql(&index.quoted_columns(self))
        )
    }

    /// Renders `ALTER TABLE ... ADD CONSTRAINT` for a primary or unique
    /// index, or a foreign key.
    fn create_constraint_sql(&self, constraint: ConstraintRef<'_>, table: &str) -> Result<String> {
        match constraint {
            ConstraintRef::Index(index) => {
                let kind = if index.is_primary() {
                    "PRIMARY KEY"
                } else if index.is_unique() {
                    "UNIQUE"
                } else {
                    return Err(SchemaError::invalid_argument(
                        "Can only create primary or unique constraints, no common indexes with create_constraint_sql().",
                    ));
                };
                Ok(format!(
                    "ALTER TABLE {table} ADD CONSTRAINT {} {kind} ({})",
                    index.quoted_name(self),
                    index.quoted_columns(self).join(", ")
                ))
            }
            ConstraintRef::ForeignKey(foreign_key) => Ok(format!(
                "ALTER TABLE {table} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                foreign_key.quoted_name(self),
                foreign_key.quoted_local_columns(self).join(", "),
                foreign_key.quoted_foreign_table_name(self),
                foreign_key.quoted_foreign_columns(self).join(", ")
            )),
        }
    }

    /// Renders `DROP INDEX` for an already quoted index name.
    fn drop_index_by_name_sql(&self, name: &str, _table: &str) -> String {
        format!("DROP INDEX {name}")
    }

    fn drop_index_sql(&self, index: &Index, table: &str) -> String {
        self.drop_index_by_name_sql(&index.quoted_name(self), table)
    }

    fn drop_constraint_sql(&self, name: &str, table: &str) -> String {
        format!("ALTER TABLE {table} DROP CONSTRAINT {name}")
    }

    /// Renders a drop followed by a create; no native rename is assumed.
    fn rename_index_sql(&self, old_name: &str, index: &Index, table: &str) -> Result<Vec<String>> {
        Ok(vec![
            self.drop_index_by_name_sql(old_name, table),
            self.create_index_sql(index, table)?,
        ])
    }

    // ------------------------------------------------------------------------
    // Foreign keys
    // ------------------------------------------------------------------------

    fn create_foreign_key_sql(&self, foreign_key: &ForeignKeyConstraint, table: &str) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {table} ADD {}",
            self.foreign_key_declaration_sql(foreign_key)?
        ))
    }

    fn drop_foreign_key_sql(&self, foreign_key: &ForeignKeyConstraint, table: &str) -> String {
        format!(
            "ALTER TABLE {table} DROP FOREIGN KEY {}",
            foreign_key.quoted_name(self)
        )
    }

    fn foreign_key_declaration_sql(&self, foreign_key: &ForeignKeyConstraint) -> Result<String> {
        Ok(format!(
            "{}{}",
            self.foreign_key_base_declaration_sql(foreign_key)?,
            self.advanced_foreign_key_options_sql(foreign_key)?
        ))
    }

    /// Renders `[CONSTRAINT name] FOREIGN KEY (...) REFERENCES t (...)`.
    fn foreign_key_base_declaration_sql(&self, foreign_key: &ForeignKeyConstraint) -> Result<String> {
        if foreign_key.local_columns().is_empty() {
            return Err(SchemaError::invalid_argument(
                "Incomplete definition. 'local' required.",
            ));
        }
        if foreign_key.foreign_columns().is_empty() {
            return Err(SchemaError::invalid_argument(
                "Incomplete definition. 'foreign' required.",
            ));
        }
        if foreign_key.foreign_table_name().is_empty() {
            return Err(SchemaError::invalid_argument(
                "Incomplete definition. 'foreignTable' required.",
            ));
        }

        let mut sql = String::new();
        if !foreign_key.name().is_empty() {
            sql.push_str(&format!("CONSTRAINT {} ", foreign_key.quoted_name(self)));
        }

        sql.push_str(&format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            foreign_key.quoted_local_columns(self).join(", "),
            foreign_key.quoted_foreign_table_name(self),
            foreign_key.quoted_foreign_columns(self).join(", ")
        ));

        Ok(sql)
    }

    /// Renders the `ON UPDATE`/`ON DELETE` clauses.
    fn advanced_foreign_key_options_sql(&self, foreign_key: &ForeignKeyConstraint) -> Result<String> {
        referential_actions_sql(self, foreign_key)
    }

    /// Validates and uppercases a referential action.
    fn foreign_key_referential_action_sql(&self, action: &str) -> Result<String> {
        let upper = action.to_uppercase();
        if REFERENTIAL_ACTIONS.contains(&upper.as_str()) {
            Ok(upper)
        } else {
            Err(SchemaError::invalid_argument(format!(
                "Invalid foreign key action: {upper}"
            )))
        }
    }

    // ------------------------------------------------------------------------
    // Sequences, schemas, databases and views
    // ------------------------------------------------------------------------

    fn create_sequence_sql(&self, _sequence: &Sequence) -> Result<String> {
        Err(SchemaError::not_supported("create_sequence_sql"))
    }

    fn alter_sequence_sql(&self, _sequence: &Sequence) -> Result<String> {
        Err(SchemaError::not_supported("alter_sequence_sql"))
    }

    fn drop_sequence_sql(&self, _sequence: &Sequence) -> Result<String> {
        Err(SchemaError::not_supported("drop_sequence_sql"))
    }

    fn create_schema_sql(&self, _name: &str) -> Result<String> {
        Err(SchemaError::not_supported("create_schema_sql"))
    }

    fn create_database_sql(&self, _name: &str) -> Result<String> {
        Err(SchemaError::not_supported("create_database_sql"))
    }

    fn drop_database_sql(&self, name: &str) -> Result<String> {
        Ok(format!("DROP DATABASE {name}"))
    }

    fn create_view_sql(&self, _name: &str, _sql: &str) -> Result<String> {
        Err(SchemaError::not_supported("create_view_sql"))
    }

    fn drop_view_sql(&self, _name: &str) -> Result<String> {
        Err(SchemaError::not_supported("drop_view_sql"))
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    fn create_savepoint_sql(&self, savepoint: &str) -> String {
        format!("SAVEPOINT {savepoint}")
    }

    fn release_savepoint_sql(&self, savepoint: &str) -> String {
        format!("RELEASE SAVEPOINT {savepoint}")
    }

    fn rollback_savepoint_sql(&self, savepoint: &str) -> String {
        format!("ROLLBACK TO SAVEPOINT {savepoint}")
    }

    fn default_transaction_isolation_level(&self) -> TransactionIsolationLevel {
        TransactionIsolationLevel::ReadCommitted
    }

    fn set_transaction_isolation_sql(&self, _level: TransactionIsolationLevel) -> Result<String> {
        Err(SchemaError::not_supported("set_transaction_isolation_sql"))
    }

    /// Appends LIMIT/OFFSET to `query`. Negative offsets are rejected.
    fn modify_limit_query(&self, query: &str, limit: Option<u64>, offset: Option<i64>) -> Result<String> {
        let offset = match offset {
            Some(offset) if offset < 0 => return Err(SchemaError::InvalidLimitOffset(offset)),
            Some(offset) if offset > 0 && !self.supports_limit_offset() => {
                return Err(SchemaError::OffsetNotSupported(self.name().to_string()));
            }
            Some(offset) => Some(offset.unsigned_abs()),
            None => None,
        };

        Ok(self.do_modify_limit_query(query, limit, offset))
    }

    fn do_modify_limit_query(&self, query: &str, limit: Option<u64>, offset: Option<u64>) -> String {
        let mut query = query.to_string();
        if let Some(limit) = limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            query.push_str(&format!(" OFFSET {offset}"));
        }
        query
    }

    fn dummy_select_sql(&self) -> &'static str {
        "SELECT 1"
    }

    fn for_update_sql(&self) -> &'static str {
        "FOR UPDATE"
    }

    fn read_lock_sql(&self) -> &'static str {
        self.for_update_sql()
    }

    fn write_lock_sql(&self) -> &'static str {
        self.for_update_sql()
    }

    fn empty_identity_insert_sql(&self, table: &str, identifier_column: &str) -> String {
        format!("INSERT INTO {table} ({identifier_column}) VALUES (null)")
    }
}

// ============================================================================
// Shared rendering helpers
// ============================================================================

/// Renders the DEFAULT clause for `default` on `column`.
pub(crate) fn default_value_declaration<P: Platform + ?Sized>(
    platform: &P,
    column: &Column,
    default: Option<&DefaultValue>,
) -> String {
    let Some(default) = default else {
        return if column.is_notnull() {
            String::new()
        } else {
            " DEFAULT NULL".to_string()
        };
    };

    let text = default.as_text();
    match column.column_type().category() {
        category if category.is_integer() => format!(" DEFAULT {text}"),
        TypeCategory::DateTime if text == platform.current_timestamp_sql() => {
            format!(" DEFAULT {text}")
        }
        TypeCategory::Time if text == platform.current_time_sql() => format!(" DEFAULT {text}"),
        TypeCategory::Date if text == platform.current_date_sql() => format!(" DEFAULT {text}"),
        TypeCategory::Boolean => format!(
            " DEFAULT {}",
            platform.quote_string_literal(&platform.convert_booleans(default))
        ),
        _ => format!(" DEFAULT {}", platform.quote_string_literal(&text)),
    }
}

/// Renders the `ON UPDATE`/`ON DELETE` clauses of `foreign_key`.
pub(crate) fn referential_actions_sql<P: Platform + ?Sized>(
    platform: &P,
    foreign_key: &ForeignKeyConstraint,
) -> Result<String> {
    let mut sql = String::new();

    if platform.supports_foreign_key_on_update() {
        if let Some(action) = foreign_key.option("onUpdate") {
            sql.push_str(" ON UPDATE ");
            sql.push_str(&platform.foreign_key_referential_action_sql(&value_text(action))?);
        }
    }

    if let Some(action) = foreign_key.option("onDelete") {
        sql.push_str(" ON DELETE ");
        sql.push_str(&platform.foreign_key_referential_action_sql(&value_text(action))?);
    }

    Ok(sql)
}

/// Drops removed and changed foreign keys, then removed and changed indexes.
pub(crate) fn drop_index_foreign_key_sql<P: Platform + ?Sized>(
    platform: &P,
    diff: &TableDiff,
) -> Vec<String> {
    let table = diff.name(platform).quoted_name(platform);
    let mut sql = Vec::new();

    if platform.supports_foreign_key_constraints() {
        for foreign_key in diff.removed_foreign_keys.iter().chain(&diff.changed_foreign_keys) {
            sql.push(platform.drop_foreign_key_sql(foreign_key, &table));
        }
    }

    for index in diff.removed_indexes.values().chain(diff.changed_indexes.values()) {
        sql.push(platform.drop_index_sql(index, &table));
    }

    sql
}

/// Creates added and changed foreign keys and indexes, then renames indexes.
pub(crate) fn create_index_foreign_key_sql<P: Platform + ?Sized>(
    platform: &P,
    diff: &TableDiff,
) -> Result<Vec<String>> {
    let table = diff
        .new_name()
        .unwrap_or_else(|| diff.name(platform))
        .quoted_name(platform);
    let mut sql = Vec::new();

    if platform.supports_foreign_key_constraints() {
        for foreign_key in diff.added_foreign_keys.iter().chain(&diff.changed_foreign_keys) {
            sql.push(platform.create_foreign_key_sql(foreign_key, &table)?);
        }
    }

    for index in diff.added_indexes.values().chain(diff.changed_indexes.values()) {
        sql.push(platform.create_index_sql(index, &table)?);
    }

    for (old_name, index) in &diff.renamed_indexes {
        let old_name = Identifier::new(old_name).quoted_name(platform);
        sql.extend(platform.rename_index_sql(&old_name, index, &table)?);
    }

    Ok(sql)
}

/// Removes duplicates while keeping the first occurrence.
pub(crate) fn unique_list(items: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(item) {
            seen.push(item.clone());
        }
    }
    seen
}

fn required_columns(columns: Vec<String>) -> Result<Vec<String>> {
    if columns.is_empty() {
        return Err(SchemaError::invalid_argument(
            "Incomplete definition. 'columns' required.",
        ));
    }
    Ok(columns)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Renders ` <clause>` for a non-empty column option, or nothing.
fn option_clause(column: &Column, name: &str, render: impl Fn(&str) -> String) -> String {
    column
        .option(name)
        .filter(|v| is_truthy(v))
        .map(value_text)
        .map(|value| render(&value))
        .filter(|clause| !clause.is_empty())
        .map(|clause| format!(" {clause}"))
        .unwrap_or_default()
}
