//! Error types for schema modeling, comparison and DDL generation.
//!
//! Schema-domain errors carry the numeric codes external tooling relies on
//! (see [`SchemaError::code`]). Platform errors and argument validation
//! errors carry no code.

/// Numeric code: table does not exist.
pub const TABLE_DOESNT_EXIST: u32 = 10;
/// Numeric code: table already exists.
pub const TABLE_ALREADY_EXISTS: u32 = 20;
/// Numeric code: column does not exist.
pub const COLUMN_DOESNT_EXIST: u32 = 30;
/// Numeric code: column already exists.
pub const COLUMN_ALREADY_EXISTS: u32 = 40;
/// Numeric code: index does not exist.
pub const INDEX_DOESNT_EXIST: u32 = 50;
/// Numeric code: index already exists.
pub const INDEX_ALREADY_EXISTS: u32 = 60;
/// Numeric code: sequence does not exist.
pub const SEQUENCE_DOESNT_EXIST: u32 = 70;
/// Numeric code: sequence already exists.
pub const SEQUENCE_ALREADY_EXISTS: u32 = 80;
/// Numeric code: invalid index name.
pub const INDEX_INVALID_NAME: u32 = 90;
/// Numeric code: foreign key does not exist.
pub const FOREIGNKEY_DOESNT_EXIST: u32 = 100;
/// Numeric code: namespace already exists.
pub const NAMESPACE_ALREADY_EXISTS: u32 = 110;

/// Errors raised by the schema model, the comparator and the platforms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Lookup of an unknown table.
    #[error("There is no table with name '{0}' in the schema.")]
    TableDoesNotExist(String),

    /// A table with the same fully-qualified name is already registered.
    #[error("The table with name '{0}' already exists.")]
    TableAlreadyExists(String),

    /// Reference to a column the table does not have.
    #[error("There is no column with name '{column}' on table '{table}'.")]
    ColumnDoesNotExist {
        /// The missing column.
        column: String,
        /// The table that was searched.
        table: String,
    },

    /// Two columns normalize to the same name.
    #[error("The column '{column}' on table '{table}' already exists.")]
    ColumnAlreadyExists {
        /// The duplicate column.
        column: String,
        /// The owning table.
        table: String,
    },

    /// Reference to an index the table does not have.
    #[error("Index '{index}' does not exist on table '{table}'.")]
    IndexDoesNotExist {
        /// The missing index.
        index: String,
        /// The table that was searched.
        table: String,
    },

    /// An index name collides, or a second primary key was requested.
    #[error("An index with name '{index}' was already defined on table '{table}'.")]
    IndexAlreadyExists {
        /// The duplicate index.
        index: String,
        /// The owning table.
        table: String,
    },

    /// Lookup of an unknown sequence.
    #[error("There exists no sequence with the name '{0}'.")]
    SequenceDoesNotExist(String),

    /// A sequence with the same fully-qualified name is already registered.
    #[error("The sequence '{0}' already exists.")]
    SequenceAlreadyExists(String),

    /// Index names are restricted to `[a-zA-Z0-9_]`.
    #[error("Invalid index-name \"{0}\" given, has to be [a-zA-Z0-9_]")]
    IndexNameInvalid(String),

    /// Reference to a foreign key the table does not have.
    #[error("There exists no foreign key with the name '{name}' on table '{table}'.")]
    ForeignKeyDoesNotExist {
        /// The missing constraint.
        name: String,
        /// The table that was searched.
        table: String,
    },

    /// A foreign key name is already taken on the table.
    #[error("A foreign key with name '{name}' was already defined on table '{table}'.")]
    ForeignKeyAlreadyExists {
        /// The duplicate constraint name.
        name: String,
        /// The table holding the existing constraint.
        table: String,
    },

    /// A namespace was created twice.
    #[error("The namespace with name '{0}' already exists.")]
    NamespaceAlreadyExists(String),

    /// An operation needs a foreign key name but the constraint is unnamed.
    #[error(
        "The performed schema operation on {table} requires a named foreign key, \
         but the given foreign key from ({columns}) onto foreign table '{foreign_table}' \
         ({foreign_columns}) is currently unnamed."
    )]
    NamedForeignKeyRequired {
        /// The local table.
        table: String,
        /// Comma separated local columns.
        columns: String,
        /// The referenced table.
        foreign_table: String,
        /// Comma separated referenced columns.
        foreign_columns: String,
    },

    /// The platform does not implement the requested operation.
    #[error("Operation \"{0}\" is not supported by platform.")]
    NotSupported(String),

    /// Tables require a non-empty name.
    #[error("Invalid table name specified: {0}")]
    InvalidTableName(String),

    /// `CREATE TABLE` needs at least one column.
    #[error("No columns specified for table {0}")]
    NoColumnsSpecifiedForTable(String),

    /// The table has no primary key.
    #[error("Table {0} has no primary key.")]
    NoPrimaryKey(String),

    /// A negative offset was passed to a limit query.
    #[error("LIMIT argument offset={0} is not valid")]
    InvalidLimitOffset(i64),

    /// The platform cannot apply offsets in limit queries.
    #[error("Platform {0} does not support offset values in limit queries.")]
    OffsetNotSupported(String),

    /// Malformed argument.
    #[error("{0}")]
    InvalidArgument(String),
}

impl SchemaError {
    /// Returns the numeric code of a schema-domain error.
    #[must_use]
    pub const fn code(&self) -> Option<u32> {
        match self {
            Self::TableDoesNotExist(_) => Some(TABLE_DOESNT_EXIST),
            Self::TableAlreadyExists(_) => Some(TABLE_ALREADY_EXISTS),
            Self::ColumnDoesNotExist { .. } => Some(COLUMN_DOESNT_EXIST),
            Self::ColumnAlreadyExists { .. } => Some(COLUMN_ALREADY_EXISTS),
            Self::IndexDoesNotExist { .. } => Some(INDEX_DOESNT_EXIST),
            Self::IndexAlreadyExists { .. } => Some(INDEX_ALREADY_EXISTS),
            Self::SequenceDoesNotExist(_) => Some(SEQUENCE_DOESNT_EXIST),
            Self::SequenceAlreadyExists(_) => Some(SEQUENCE_ALREADY_EXISTS),
            Self::IndexNameInvalid(_) => Some(INDEX_INVALID_NAME),
            Self::ForeignKeyDoesNotExist { .. } => Some(FOREIGNKEY_DOESNT_EXIST),
            Self::NamespaceAlreadyExists(_) => Some(NAMESPACE_ALREADY_EXISTS),
            _ => None,
        }
    }

    /// Shorthand for [`SchemaError::NotSupported`].
    pub fn not_supported(method: impl Into<String>) -> Self {
        Self::NotSupported(method.into())
    }

    /// Shorthand for [`SchemaError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
