#![allow(dead_code)]

use indexmap::IndexMap;
use oxide_schema::prelude::*;
use oxide_schema::platform::KeywordList;

/// Routes library events to the test output; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A platform with sequences and schemas, on top of the shared defaults.
pub struct SequencePlatform {
    keywords: KeywordList,
}

impl SequencePlatform {
    pub const fn new() -> Self {
        Self {
            keywords: KeywordList::new("Sequence", &["SELECT", "TABLE", "USER"]),
        }
    }
}

impl Platform for SequencePlatform {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn reserved_keywords(&self) -> &KeywordList {
        &self.keywords
    }

    fn supports_sequences(&self) -> bool {
        true
    }

    fn supports_schemas(&self) -> bool {
        true
    }

    fn create_sequence_sql(&self, sequence: &Sequence) -> Result<String> {
        Ok(format!(
            "CREATE SEQUENCE {} INCREMENT BY {} START WITH {}",
            sequence.quoted_name(self),
            sequence.allocation_size(),
            sequence.initial_value()
        ))
    }

    fn alter_sequence_sql(&self, sequence: &Sequence) -> Result<String> {
        Ok(format!(
            "ALTER SEQUENCE {} INCREMENT BY {}",
            sequence.quoted_name(self),
            sequence.allocation_size()
        ))
    }

    fn drop_sequence_sql(&self, sequence: &Sequence) -> Result<String> {
        Ok(format!("DROP SEQUENCE {}", sequence.quoted_name(self)))
    }

    fn create_schema_sql(&self, name: &str) -> Result<String> {
        Ok(format!("CREATE SCHEMA {name}"))
    }
}

pub fn mysql() -> MySqlPlatform {
    MySqlPlatform::new()
}

/// Builds a detached table from columns.
pub fn table(name: &str, columns: &[Column]) -> Table {
    let mut table =
        Table::new(name).unwrap_or_else(|e| panic!("Failed to create table {name}: {e}"));
    for column in columns {
        table
            .add_column(column.clone())
            .unwrap_or_else(|e| panic!("Failed to add column to {name}: {e}"));
    }
    table
}

pub fn int(name: &str) -> Column {
    Column::new(name, ColumnType::Int)
}

pub fn string(name: &str) -> Column {
    Column::new(name, ColumnType::VarChar).with_length(255)
}

/// Builds a schema holding `tables`.
pub fn schema(tables: Vec<Table>) -> Schema {
    Schema::from_parts(tables, Vec::new(), SchemaConfig::new(), &[])
        .unwrap_or_else(|e| panic!("Failed to build schema: {e}"))
}

/// Adds a named foreign key from `columns` onto `foreign_table`.
pub fn add_foreign_key(table: &mut Table, foreign_table: &str, columns: &[&str], name: &str) {
    table
        .add_foreign_key_constraint(foreign_table, columns, &["id"], IndexMap::new(), Some(name))
        .unwrap_or_else(|e| panic!("Failed to add foreign key {name}: {e}"));
}
