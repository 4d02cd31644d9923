//! Column types.
//!
//! A [`ColumnType`] names the storage type of a column; its
//! [`TypeCategory`] drives how the comparator and the platforms treat
//! lengths, precision and default values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Coarse grouping of column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    /// 64-bit integers.
    BigInt,
    /// Binary strings.
    Binary,
    /// Large binary objects.
    Blob,
    /// Single-bit or tiny integer flags.
    Boolean,
    /// Calendar dates.
    Date,
    /// Dates with a time of day.
    DateTime,
    /// Fixed-point numbers.
    Decimal,
    /// Floating-point numbers.
    Float,
    /// Regular integers.
    Integer,
    /// Lists stored as delimited strings.
    SimpleArray,
    /// 16-bit integers.
    SmallInt,
    /// Character strings.
    String,
    /// Large character objects.
    Text,
    /// Times of day.
    Time,
}

impl TypeCategory {
    /// Returns whether default values of this category are rendered unquoted.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Integer | Self::BigInt | Self::SmallInt)
    }

    /// Returns whether columns of this category carry a length.
    #[must_use]
    pub const fn has_length(self) -> bool {
        matches!(self, Self::String | Self::Binary)
    }
}

/// The storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Int,
    TinyInt,
    SmallInt,
    MediumInt,
    BigInt,
    Float,
    Double,
    Decimal,
    Bit,
    Char,
    VarChar,
    Text,
    TinyText,
    MediumText,
    LongText,
    Blob,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Date,
    Time,
    Datetime,
    Timestamp,
    Enum,
    Set,
}

impl ColumnType {
    /// Every known type, in declaration order.
    pub const ALL: [Self; 25] = [
        Self::Int,
        Self::TinyInt,
        Self::SmallInt,
        Self::MediumInt,
        Self::BigInt,
        Self::Float,
        Self::Double,
        Self::Decimal,
        Self::Bit,
        Self::Char,
        Self::VarChar,
        Self::Text,
        Self::TinyText,
        Self::MediumText,
        Self::LongText,
        Self::Blob,
        Self::TinyBlob,
        Self::MediumBlob,
        Self::LongBlob,
        Self::Date,
        Self::Time,
        Self::Datetime,
        Self::Timestamp,
        Self::Enum,
        Self::Set,
    ];

    /// Returns the declared name of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::TinyInt => "TinyInt",
            Self::SmallInt => "SmallInt",
            Self::MediumInt => "MediumInt",
            Self::BigInt => "BigInt",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Decimal => "Decimal",
            Self::Bit => "Bit",
            Self::Char => "Char",
            Self::VarChar => "VarChar",
            Self::Text => "Text",
            Self::TinyText => "TinyText",
            Self::MediumText => "MediumText",
            Self::LongText => "LongText",
            Self::Blob => "Blob",
            Self::TinyBlob => "TinyBlob",
            Self::MediumBlob => "MediumBlob",
            Self::LongBlob => "LongBlob",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Datetime => "Datetime",
            Self::Timestamp => "Timestamp",
            Self::Enum => "Enum",
            Self::Set => "Set",
        }
    }

    /// Returns the category of the type.
    #[must_use]
    pub const fn category(self) -> TypeCategory {
        match self {
            Self::BigInt => TypeCategory::BigInt,
            Self::Bit | Self::TinyInt => TypeCategory::Boolean,
            Self::Blob | Self::TinyBlob | Self::MediumBlob | Self::LongBlob => TypeCategory::Blob,
            Self::Char | Self::VarChar | Self::Enum => TypeCategory::String,
            Self::Datetime | Self::Timestamp => TypeCategory::DateTime,
            Self::Date => TypeCategory::Date,
            Self::Decimal => TypeCategory::Decimal,
            Self::Double | Self::Float => TypeCategory::Float,
            Self::Int | Self::MediumInt => TypeCategory::Integer,
            Self::Text | Self::TinyText | Self::MediumText | Self::LongText => TypeCategory::Text,
            Self::Set => TypeCategory::SimpleArray,
            Self::SmallInt => TypeCategory::SmallInt,
            Self::Time => TypeCategory::Time,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnType {
    type Err = SchemaError;

    /// Case-insensitive lookup by declared name.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchemaError::invalid_argument(format!("Unknown column type \"{s}\"")))
    }
}
