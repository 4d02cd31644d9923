//! MySQL platform.

use tracing::{debug, warn};

use super::{
    create_index_foreign_key_sql, default_value_declaration, drop_index_foreign_key_sql,
    referential_actions_sql, unique_list, DateIntervalUnit, DateOperator, KeywordList, Platform,
    TableDefinition, TransactionIsolationLevel, MYSQL_KEYWORDS,
};
use crate::asset::{Asset, Identifier};
use crate::column::Column;
use crate::diff::TableDiff;
use crate::error::Result;
use crate::foreign_key::ForeignKeyConstraint;
use crate::index::{value_text, Index};
use crate::types::TypeCategory;

/// Upper length bound of `TINYTEXT`.
pub const LENGTH_LIMIT_TINYTEXT: u32 = 255;
/// Upper length bound of `TEXT`.
pub const LENGTH_LIMIT_TEXT: u32 = 65_535;
/// Upper length bound of `MEDIUMTEXT`.
pub const LENGTH_LIMIT_MEDIUMTEXT: u32 = 16_777_215;
/// Upper length bound of `TINYBLOB`.
pub const LENGTH_LIMIT_TINYBLOB: u32 = 255;
/// Upper length bound of `BLOB`.
pub const LENGTH_LIMIT_BLOB: u32 = 65_535;
/// Upper length bound of `MEDIUMBLOB`.
pub const LENGTH_LIMIT_MEDIUMBLOB: u32 = 16_777_215;

/// Row count used when a query has an offset but no limit.
const MAX_LIMIT: &str = "18446744073709551615";

/// Storage engine assumed when a table does not name one.
const DEFAULT_ENGINE: &str = "INNODB";

/// The MySQL dialect.
#[derive(Debug, Clone)]
pub struct MySqlPlatform {
    keywords: KeywordList,
}

impl Default for MySqlPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlPlatform {
    /// Creates the platform.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keywords: KeywordList::new("MySQL", MYSQL_KEYWORDS),
        }
    }

    /// Renders `ALTER TABLE t DROP PRIMARY KEY`. MySQL names every primary
    /// key `PRIMARY`, a reserved word, so it cannot be dropped by name.
    #[must_use]
    pub fn drop_primary_key_sql(&self, table: &str) -> String {
        format!("ALTER TABLE {table} DROP PRIMARY KEY")
    }

    /// Renders `ALTER TABLE t MODIFY <column>` with autoincrement cleared.
    fn clear_autoincrement_sql(&self, table: &str, column: &Column) -> Result<String> {
        let cleared = column.clone().with_autoincrement(false);
        Ok(format!(
            "ALTER TABLE {table} MODIFY {}",
            self.column_declaration_sql(&cleared.quoted_name(self), &cleared)?
        ))
    }

    /// Clears autoincrement on columns leaving a changed primary key.
    fn pre_alter_table_alter_index_sql(&self, diff: &TableDiff) -> Result<Vec<String>> {
        let mut sql = Vec::new();
        let Some(from_table) = &diff.from_table else {
            return Ok(sql);
        };
        let table = diff.name(self).quoted_name(self);

        for changed in diff.changed_indexes.values().filter(|i| i.is_primary()) {
            let remaining = changed.columns();
            for column_name in from_table.primary_key_columns()? {
                let column = from_table.column(&column_name)?;
                if column.is_autoincrement() && !remaining.contains(&column_name) {
                    sql.push(self.clear_autoincrement_sql(&table, column)?);
                }
            }
        }

        Ok(sql)
    }

    /// Returns the foreign keys that survive the diff but cover a renamed
    /// index, and so have to be dropped and recreated around the rename.
    fn foreign_keys_requiring_renamed_indexes(diff: &TableDiff) -> Vec<ForeignKeyConstraint> {
        let Some(from_table) = &diff.from_table else {
            return Vec::new();
        };
        if diff.renamed_indexes.is_empty() {
            return Vec::new();
        }

        from_table
            .foreign_keys()
            .values()
            .filter(|fk| !diff.removed_foreign_keys.contains(fk))
            .filter(|fk| !diff.changed_foreign_keys.contains(fk))
            .filter(|fk| {
                diff.renamed_indexes
                    .values()
                    .any(|index| fk.intersects_index_columns(index))
            })
            .cloned()
            .collect()
    }

    fn table_options_sql(&self, definition: &TableDefinition<'_>) -> String {
        if let Some(options) = definition.option_text("table_options") {
            return options;
        }

        let mut options = vec![
            format!(
                "DEFAULT CHARACTER SET {}",
                definition.option_text("charset").unwrap_or_else(|| "utf8".into())
            ),
            format!(
                "COLLATE {}",
                definition
                    .option_text("collate")
                    .unwrap_or_else(|| "utf8_unicode_ci".into())
            ),
            format!(
                "ENGINE = {}",
                definition.option_text("engine").unwrap_or_else(|| "InnoDB".into())
            ),
        ];

        if let Some(auto_increment) = definition.option_text("auto_increment") {
            options.push(format!("AUTO_INCREMENT = {auto_increment}"));
        }

        if let Some(comment) = definition.option_text("comment") {
            let comment = comment.trim_matches(|c| c == ' ' || c == '\'');
            options.push(format!("COMMENT = {}", self.quote_string_literal(comment)));
        }

        if let Some(row_format) = definition.option_text("row_format") {
            options.push(format!("ROW_FORMAT = {row_format}"));
        }

        options.join(" ")
    }
}

fn engine_of(option: Option<&serde_json::Value>) -> String {
    option.map_or_else(
        || DEFAULT_ENGINE.to_string(),
        |engine| value_text(engine).trim().to_uppercase(),
    )
}

impl Platform for MySqlPlatform {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn reserved_keywords(&self) -> &KeywordList {
        &self.keywords
    }

    fn identifier_quote_character(&self) -> char {
        '`'
    }

    fn varchar_max_length(&self) -> u32 {
        65_535
    }

    fn binary_max_length(&self) -> u32 {
        65_535
    }

    fn supports_identity_columns(&self) -> bool {
        true
    }

    fn prefers_identity_columns(&self) -> bool {
        true
    }

    fn supports_inline_column_comments(&self) -> bool {
        true
    }

    fn supports_column_collation(&self) -> bool {
        true
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn regexp_expression(&self) -> Result<String> {
        Ok("RLIKE".to_string())
    }

    fn guid_expression(&self) -> Result<String> {
        Ok("UUID()".to_string())
    }

    fn locate_expression(&self, value: &str, substring: &str, start: Option<&str>) -> Result<String> {
        Ok(match start {
            Some(start) => format!("LOCATE({substring}, {value}, {start})"),
            None => format!("LOCATE({substring}, {value})"),
        })
    }

    fn concat_expression(&self, values: &[&str]) -> String {
        format!("CONCAT({})", values.join(", "))
    }

    fn date_diff_expression(&self, date1: &str, date2: &str) -> Result<String> {
        Ok(format!("DATEDIFF({date1}, {date2})"))
    }

    fn date_arithmetic_interval_expression(
        &self,
        date: &str,
        operator: DateOperator,
        interval: &str,
        unit: DateIntervalUnit,
    ) -> Result<String> {
        let function = match operator {
            DateOperator::Add => "DATE_ADD",
            DateOperator::Sub => "DATE_SUB",
        };
        Ok(format!("{function}({date}, INTERVAL {interval} {})", unit.as_str()))
    }

    // ------------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------------

    fn clob_type_declaration_sql(&self, length: Option<u32>) -> String {
        match length {
            Some(l) if l <= LENGTH_LIMIT_TINYTEXT => "TINYTEXT",
            Some(l) if l <= LENGTH_LIMIT_TEXT => "TEXT",
            Some(l) if l <= LENGTH_LIMIT_MEDIUMTEXT => "MEDIUMTEXT",
            Some(_) => "LONGTEXT",
            None => "TEXT",
        }
        .to_string()
    }

    fn blob_type_declaration_sql(&self, length: Option<u32>) -> String {
        match length {
            Some(l) if l <= LENGTH_LIMIT_TINYBLOB => "TINYBLOB",
            Some(l) if l <= LENGTH_LIMIT_BLOB => "BLOB",
            Some(l) if l <= LENGTH_LIMIT_MEDIUMBLOB => "MEDIUMBLOB",
            Some(_) => "LONGBLOB",
            None => "BLOB",
        }
        .to_string()
    }

    /// Text and blob columns cannot carry a default in MySQL; timestamps
    /// accept `CURRENT_TIMESTAMP` and `ON UPDATE CURRENT_TIMESTAMP`.
    fn default_value_declaration_sql(&self, column: &Column) -> String {
        let category = column.column_type().category();
        if matches!(category, TypeCategory::Text | TypeCategory::Blob) {
            return default_value_declaration(self, column, None);
        }

        let sql = default_value_declaration(self, column, column.default_value());

        if column.column_type() == crate::types::ColumnType::Timestamp {
            if let Some(default) = column.default_value() {
                let text = default.as_text();
                let mut clauses = Vec::new();
                if text.contains("CURRENT_TIMESTAMP") {
                    clauses.push("CURRENT_TIMESTAMP");
                }
                if text.contains("ON UPDATE CURRENT_TIMESTAMP") {
                    clauses.push("ON UPDATE CURRENT_TIMESTAMP");
                }
                if !clauses.is_empty() {
                    return format!(" DEFAULT {}", clauses.join(" "));
                }
            }
        }

        sql
    }

    fn column_charset_declaration_sql(&self, charset: &str) -> String {
        format!("CHARACTER SET {charset}")
    }

    // ------------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------------

    fn build_create_table_sql(&self, definition: &TableDefinition<'_>) -> Result<Vec<String>> {
        let mut column_list = self.column_declaration_list_sql(&definition.columns)?;

        for (name, index) in &definition.indexes {
            column_list.push_str(", ");
            column_list.push_str(&self.index_declaration_sql(name, index)?);
        }

        if !definition.primary.is_empty() {
            column_list.push_str(&format!(
                ", PRIMARY KEY({})",
                unique_list(&definition.primary).join(", ")
            ));
        }

        let temporary = if definition.has_flag_option("temporary") {
            "TEMPORARY "
        } else {
            ""
        };

        let partition = definition
            .option_text("partition_options")
            .map(|p| format!(" {p}"))
            .unwrap_or_default();

        let mut sql = vec![format!(
            "CREATE {temporary}TABLE {} ({column_list}) {}{partition}",
            definition.name,
            self.table_options_sql(definition)
        )];

        let engine = engine_of(definition.options.get("engine"));
        if engine == DEFAULT_ENGINE {
            for foreign_key in &definition.foreign_keys {
                sql.push(self.create_foreign_key_sql(foreign_key, &definition.name)?);
            }
        } else if !definition.foreign_keys.is_empty() {
            warn!(
                table = %definition.name,
                engine = %engine,
                "skipping foreign keys, engine does not support them"
            );
        }

        Ok(sql)
    }

    fn drop_temporary_table_sql(&self, table: &str) -> String {
        format!("DROP TEMPORARY TABLE {table}")
    }

    fn alter_table_sql(&self, diff: &TableDiff) -> Result<Vec<String>> {
        let mut diff = diff.clone();
        let table = diff.name(self).quoted_name(self);
        let mut query_parts = Vec::new();

        if let Some(new_name) = diff.new_name() {
            query_parts.push(format!("RENAME TO {}", new_name.quoted_name(self)));
        }

        for column in diff.added_columns.values() {
            query_parts.push(format!(
                "ADD {}",
                self.column_declaration_sql(&column.quoted_name(self), column)?
            ));
        }

        for column in diff.removed_columns.values() {
            query_parts.push(format!("DROP {}", column.quoted_name(self)));
        }

        for column_diff in diff.changed_columns.values() {
            let column = &column_diff.column;
            let category = column.column_type().category();

            // A lone default change on a text or blob column renders nothing.
            if column_diff.has_changed("default")
                && column_diff.changed_properties.len() == 1
                && matches!(category, TypeCategory::Text | TypeCategory::Blob)
            {
                continue;
            }

            query_parts.push(format!(
                "CHANGE {} {}",
                column_diff.old_column_name().quoted_name(self),
                self.column_declaration_sql(&column.quoted_name(self), column)?
            ));
        }

        for (old_name, column) in &diff.renamed_columns {
            query_parts.push(format!(
                "CHANGE {} {}",
                Identifier::new(old_name).quoted_name(self),
                self.column_declaration_sql(&column.quoted_name(self), column)?
            ));
        }

        let added_primary = diff
            .added_indexes
            .iter()
            .find(|(_, index)| index.is_primary())
            .map(|(key, _)| key.clone());
        if let Some(key) = added_primary {
            if let Some(primary) = diff.added_indexes.shift_remove(&key) {
                query_parts.push(format!(
                    "ADD PRIMARY KEY ({})",
                    unique_list(&primary.columns()).join(", ")
                ));
            }
        }

        let mut sql = self.pre_alter_table_index_foreign_key_sql(&mut diff)?;
        if !query_parts.is_empty() {
            sql.push(format!("ALTER TABLE {table} {}", query_parts.join(", ")));
        }
        sql.extend(self.post_alter_table_index_foreign_key_sql(&diff)?);

        debug!(table = %table, statements = sql.len(), "rendered alter table");
        Ok(sql)
    }

    fn pre_alter_table_index_foreign_key_sql(&self, diff: &mut TableDiff) -> Result<Vec<String>> {
        let table = diff.name(self).quoted_name(self);
        let mut sql = Vec::new();

        let removed_keys: Vec<String> = diff.removed_indexes.keys().cloned().collect();
        for removed_key in removed_keys {
            let Some(removed) = diff.removed_indexes.get(&removed_key).cloned() else {
                continue;
            };

            // The autoincrement attribute has to go before its primary key can.
            if removed.is_primary() {
                if let Some(from_table) = &diff.from_table {
                    for column_name in removed.columns() {
                        let column = from_table.column(&column_name)?;
                        if column.is_autoincrement() {
                            sql.push(self.clear_autoincrement_sql(&table, column)?);
                        }
                    }
                }
            }

            let replacement = diff
                .added_indexes
                .iter()
                .find(|(_, added)| added.columns() == removed.columns())
                .map(|(key, added)| (key.clone(), added.clone()));

            if let Some((added_key, added)) = replacement {
                let clause = if added.is_primary() {
                    "PRIMARY KEY".to_string()
                } else if added.is_unique() {
                    format!("UNIQUE INDEX {}", added.name())
                } else {
                    format!("INDEX {}", added.name())
                };

                sql.push(format!(
                    "ALTER TABLE {table} DROP INDEX {}, ADD {clause} ({})",
                    removed.name(),
                    self.index_field_declaration_list_sql(&added.quoted_columns(self))
                ));

                diff.removed_indexes.shift_remove(&removed_key);
                diff.added_indexes.shift_remove(&added_key);
            }
        }

        let engine = engine_of(
            diff.from_table
                .as_ref()
                .and_then(|from_table| from_table.option("engine")),
        );
        if engine != DEFAULT_ENGINE {
            if !(diff.added_foreign_keys.is_empty()
                && diff.changed_foreign_keys.is_empty()
                && diff.removed_foreign_keys.is_empty())
            {
                warn!(
                    table = %table,
                    engine = %engine,
                    "skipping foreign key changes, engine does not support them"
                );
            }
            diff.added_foreign_keys.clear();
            diff.changed_foreign_keys.clear();
            diff.removed_foreign_keys.clear();
        }

        sql.extend(self.pre_alter_table_alter_index_sql(diff)?);
        sql.extend(drop_index_foreign_key_sql(self, diff));

        for foreign_key in Self::foreign_keys_requiring_renamed_indexes(diff) {
            sql.push(self.drop_foreign_key_sql(&foreign_key, &table));
        }

        Ok(sql)
    }

    fn post_alter_table_index_foreign_key_sql(&self, diff: &TableDiff) -> Result<Vec<String>> {
        let mut sql = create_index_foreign_key_sql(self, diff)?;

        let table = diff
            .new_name()
            .unwrap_or_else(|| diff.name(self))
            .quoted_name(self);
        for foreign_key in Self::foreign_keys_requiring_renamed_indexes(diff) {
            sql.push(self.create_foreign_key_sql(&foreign_key, &table)?);
        }

        Ok(sql)
    }

    // ------------------------------------------------------------------------
    // Indexes and foreign keys
    // ------------------------------------------------------------------------

    fn create_index_flags_sql(&self, index: &Index) -> String {
        if index.is_unique() {
            "UNIQUE "
        } else if index.has_flag("fulltext") {
            "FULLTEXT "
        } else if index.has_flag("spatial") {
            "SPATIAL "
        } else {
            ""
        }
        .to_string()
    }

    fn drop_index_by_name_sql(&self, name: &str, table: &str) -> String {
        format!("DROP INDEX {name} ON {table}")
    }

    fn drop_index_sql(&self, index: &Index, table: &str) -> String {
        if index.is_primary() {
            return self.drop_primary_key_sql(table);
        }
        self.drop_index_by_name_sql(&index.quoted_name(self), table)
    }

    fn advanced_foreign_key_options_sql(&self, foreign_key: &ForeignKeyConstraint) -> Result<String> {
        let mut sql = String::new();
        if let Some(method) = foreign_key.option("match") {
            sql.push_str(" MATCH ");
            sql.push_str(&value_text(method));
        }
        sql.push_str(&referential_actions_sql(self, foreign_key)?);
        Ok(sql)
    }

    // ------------------------------------------------------------------------
    // Databases and views
    // ------------------------------------------------------------------------

    fn create_database_sql(&self, name: &str) -> Result<String> {
        Ok(format!("CREATE DATABASE {}", self.quote_identifier(name)))
    }

    fn drop_database_sql(&self, name: &str) -> Result<String> {
        Ok(format!("DROP DATABASE {}", self.quote_identifier(name)))
    }

    fn create_view_sql(&self, name: &str, sql: &str) -> Result<String> {
        Ok(format!("CREATE VIEW {name} AS {sql}"))
    }

    fn drop_view_sql(&self, name: &str) -> Result<String> {
        Ok(format!("DROP VIEW {name}"))
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    fn set_transaction_isolation_sql(&self, level: TransactionIsolationLevel) -> Result<String> {
        Ok(format!(
            "SET SESSION TRANSACTION ISOLATION LEVEL {}",
            level.as_sql()
        ))
    }

    fn do_modify_limit_query(&self, query: &str, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (Some(limit), Some(offset)) => format!("{query} LIMIT {limit} OFFSET {offset}"),
            (Some(limit), None) => format!("{query} LIMIT {limit}"),
            (None, Some(offset)) => format!("{query} LIMIT {MAX_LIMIT} OFFSET {offset}"),
            (None, None) => query.to_string(),
        }
    }

    fn read_lock_sql(&self) -> &'static str {
        "LOCK IN SHARE MODE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::platform::CreateFlags;
    use crate::table::Table;
    use crate::types::ColumnType;

    #[test]
    fn test_quoting_and_keywords() {
        let platform = MySqlPlatform::new();
        assert_eq!(platform.quote_identifier("a.b"), "`a`.`b`");
        assert_eq!(platform.quote_single_identifier("a`b"), "`a``b`");
        assert!(platform.reserved_keywords().is_keyword("order"));
    }

    #[test]
    fn test_type_declarations() {
        let platform = MySqlPlatform::new();
        let decl = |c: Column| platform.type_declaration_sql(&c).unwrap();

        assert_eq!(
            decl(Column::new("c", ColumnType::Int).with_unsigned(true).with_autoincrement(true)),
            "INT UNSIGNED AUTO_INCREMENT"
        );
        assert_eq!(decl(Column::new("c", ColumnType::VarChar)), "VARCHAR(255)");
        assert_eq!(
            decl(Column::new("c", ColumnType::VarChar).with_length(10).with_fixed(true)),
            "CHAR(10)"
        );
        assert_eq!(
            decl(Column::new("c", ColumnType::VarChar).with_length(70_000)),
            "MEDIUMTEXT"
        );
        assert_eq!(
            decl(Column::new("c", ColumnType::Decimal).with_precision(8).with_scale(2)),
            "DECIMAL(8,2)"
        );
        assert_eq!(decl(Column::new("c", ColumnType::Bit).with_length(100)), "BIT(64)");
        assert_eq!(decl(Column::new("c", ColumnType::Char).with_length(300)), "CHAR(255)");
        assert_eq!(
            decl(Column::new("c", ColumnType::Enum).with_values(["a", "b"])),
            "ENUM('a','b')"
        );
        assert_eq!(decl(Column::new("c", ColumnType::MediumBlob)), "MEDIUMBLOB");
        assert_eq!(decl(Column::new("c", ColumnType::Blob)), "BLOB");
        assert_eq!(decl(Column::new("c", ColumnType::Blob).with_length(200)), "TINYBLOB");
        assert_eq!(
            decl(Column::new("c", ColumnType::Blob).with_length(70_000)),
            "MEDIUMBLOB"
        );
        assert_eq!(
            decl(Column::new("c", ColumnType::Blob).with_length(20_000_000)),
            "LONGBLOB"
        );
        assert_eq!(decl(Column::new("c", ColumnType::Text).with_length(100)), "TINYTEXT");
        assert!(platform
            .type_declaration_sql(&Column::new("c", ColumnType::Set))
            .is_err());
    }

    #[test]
    fn test_text_default_is_dropped() {
        let platform = MySqlPlatform::new();
        let column = Column::new("body", ColumnType::Text).with_default("hello");
        assert_eq!(platform.default_value_declaration_sql(&column), "");

        let nullable = Column::new("body", ColumnType::Blob)
            .nullable()
            .with_default("x");
        assert_eq!(
            platform.default_value_declaration_sql(&nullable),
            " DEFAULT NULL"
        );
    }

    #[test]
    fn test_timestamp_defaults() {
        let platform = MySqlPlatform::new();
        let column = Column::new("updated", ColumnType::Timestamp)
            .with_default("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP");
        assert_eq!(
            platform.default_value_declaration_sql(&column),
            " DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP"
        );

        let plain = Column::new("created", ColumnType::Timestamp).with_default("CURRENT_TIMESTAMP");
        assert_eq!(
            platform.default_value_declaration_sql(&plain),
            " DEFAULT CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_column_declaration_with_comment_and_charset() {
        let platform = MySqlPlatform::new();
        let column = Column::new("name", ColumnType::VarChar)
            .with_length(50)
            .with_comment("user's name")
            .with_platform_option("charset", "utf8mb4")
            .with_platform_option("collation", "utf8mb4_bin");
        assert_eq!(
            platform.column_declaration_sql("name", &column).unwrap(),
            "name VARCHAR(50) CHARACTER SET utf8mb4 NOT NULL COLLATE utf8mb4_bin COMMENT 'user''s name'"
        );
    }

    #[test]
    fn test_create_table_options() {
        let platform = MySqlPlatform::new();
        let mut table = Table::new("log").unwrap();
        table.add_column(Column::new("id", ColumnType::BigInt)).unwrap();
        table.add_option("engine", "MyISAM");
        table.add_option("comment", "'audit'");
        table.add_option("temporary", true);

        let sql = platform.create_table_sql(&table, CreateFlags::default()).unwrap();
        assert_eq!(
            sql,
            vec![
                "CREATE TEMPORARY TABLE log (id BIGINT NOT NULL) DEFAULT CHARACTER SET utf8 \
                 COLLATE utf8_unicode_ci ENGINE = MyISAM COMMENT = 'audit'"
            ]
        );
    }

    #[test]
    fn test_table_options_override() {
        let platform = MySqlPlatform::new();
        let mut table = Table::new("t").unwrap();
        table.add_column(Column::new("id", ColumnType::Int)).unwrap();
        table.add_option("table_options", "ENGINE = MEMORY");
        table.add_option("partition_options", "PARTITION BY HASH(id)");

        let sql = platform.create_table_sql(&table, CreateFlags::default()).unwrap();
        assert_eq!(
            sql,
            vec!["CREATE TABLE t (id INT NOT NULL) ENGINE = MEMORY PARTITION BY HASH(id)"]
        );
    }

    #[test]
    fn test_index_flags() {
        let platform = MySqlPlatform::new();
        let fulltext = Index::new("ft_body", &["body"], false, false).with_flag("fulltext");
        assert_eq!(
            platform.create_index_sql(&fulltext, "posts").unwrap(),
            "CREATE FULLTEXT INDEX ft_body ON posts (body)"
        );
        let primary = Index::new("primary", &["id"], true, true);
        assert_eq!(
            platform.drop_index_sql(&primary, "posts"),
            "ALTER TABLE posts DROP PRIMARY KEY"
        );
        assert_eq!(
            platform.create_index_sql(&primary, "posts").unwrap(),
            "ALTER TABLE posts ADD PRIMARY KEY (id)"
        );
    }

    #[test]
    fn test_foreign_key_match_option() {
        let platform = MySqlPlatform::new();
        let fk = ForeignKeyConstraint::new(&["user_id"], "users", &["id"], "fk_user")
            .with_option("match", "FULL")
            .with_option("onDelete", "cascade");
        assert_eq!(
            platform.create_foreign_key_sql(&fk, "posts").unwrap(),
            "ALTER TABLE posts ADD CONSTRAINT fk_user FOREIGN KEY (user_id) REFERENCES users (id) \
             MATCH FULL ON DELETE CASCADE"
        );
    }

    #[test]
    fn test_expressions() {
        let platform = MySqlPlatform::new();
        assert_eq!(platform.concat_expression(&["a", "b"]), "CONCAT(a, b)");
        assert_eq!(
            platform.locate_expression("col", "'x'", Some("3")).unwrap(),
            "LOCATE('x', col, 3)"
        );
        assert_eq!(
            platform
                .date_sub_expression("created", "3", DateIntervalUnit::Month)
                .unwrap(),
            "DATE_SUB(created, INTERVAL 3 MONTH)"
        );
        assert_eq!(platform.regexp_expression().unwrap(), "RLIKE");
        assert_eq!(platform.read_lock_sql(), "LOCK IN SHARE MODE");
        assert_eq!(
            platform
                .set_transaction_isolation_sql(TransactionIsolationLevel::Serializable)
                .unwrap(),
            "SET SESSION TRANSACTION ISOLATION LEVEL SERIALIZABLE"
        );
    }

    #[test]
    fn test_limit_query() {
        let platform = MySqlPlatform::new();
        assert_eq!(
            platform.modify_limit_query("SELECT n FROM Foo", Some(10), None).unwrap(),
            "SELECT n FROM Foo LIMIT 10"
        );
        assert_eq!(
            platform.modify_limit_query("SELECT n FROM Foo", None, Some(10)).unwrap(),
            "SELECT n FROM Foo LIMIT 18446744073709551615 OFFSET 10"
        );
    }
}
