//! Column values
//!
//! `Value` is what a mapped field hands to the payload writer, and
//! `ColumnValue` is implemented by every Rust type that can be mapped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::borrow::Cow;
use uuid::Uuid;

// ============================================================================
// Column Types
// ============================================================================

/// Semantic kind of a column, used to pick serialization and transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Signed or unsigned integer
    Integer,
    /// Floating point number
    Float,
    /// Boolean, written as 1/0
    Boolean,
    /// Text
    Text,
    /// Point in time
    DateTime,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// 128-bit unique identifier
    Uuid,
    /// Binary blob
    Binary,
    /// Enumeration written by ordinal
    Enumeration,
}

/// Declared type of a mapped field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnType {
    /// Semantic kind
    pub kind: ColumnKind,
    /// Whether the field may be absent
    pub nullable: bool,
}

impl ColumnType {
    /// A non-nullable column of the given kind
    pub const fn new(kind: ColumnKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// The same kind, wrapped as nullable
    #[must_use]
    pub const fn nullable(self) -> Self {
        Self {
            kind: self.kind,
            nullable: true,
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// A single field value read from a record
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    /// Always UTC; zoned values are normalized when mapped
    DateTime(DateTime<Utc>),
    NaiveDateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Uuid(Uuid),
    /// Ordinal of an enumeration member
    Enum(i64),
}

impl Value<'_> {
    /// Detach the value from the record it was borrowed from
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(v),
            Value::Int(v) => Value::Int(v),
            Value::UInt(v) => Value::UInt(v),
            Value::Float(v) => Value::Float(v),
            Value::Text(v) => Value::Text(Cow::Owned(v.into_owned())),
            Value::Bytes(v) => Value::Bytes(Cow::Owned(v.into_owned())),
            Value::DateTime(v) => Value::DateTime(v),
            Value::NaiveDateTime(v) => Value::NaiveDateTime(v),
            Value::Date(v) => Value::Date(v),
            Value::Time(v) => Value::Time(v),
            Value::Uuid(v) => Value::Uuid(v),
            Value::Enum(v) => Value::Enum(v),
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ============================================================================
// ColumnValue
// ============================================================================

/// A Rust type that can be mapped onto a table column
pub trait ColumnValue {
    /// Declared column type of this Rust type
    const COLUMN_TYPE: ColumnType;

    /// Read the value for serialization
    fn to_value(&self) -> Value<'_>;
}

macro_rules! signed_column {
    ($($ty:ty),+) => {
        $(
            impl ColumnValue for $ty {
                const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Integer);

                fn to_value(&self) -> Value<'_> {
                    Value::Int(i64::from(*self))
                }
            }
        )+
    };
}

macro_rules! unsigned_column {
    ($($ty:ty),+) => {
        $(
            impl ColumnValue for $ty {
                const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Integer);

                fn to_value(&self) -> Value<'_> {
                    Value::UInt(u64::from(*self))
                }
            }
        )+
    };
}

signed_column!(i8, i16, i32, i64);
unsigned_column!(u8, u16, u32, u64);

impl ColumnValue for isize {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Integer);

    fn to_value(&self) -> Value<'_> {
        Value::Int(*self as i64)
    }
}

impl ColumnValue for usize {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Integer);

    fn to_value(&self) -> Value<'_> {
        Value::UInt(*self as u64)
    }
}

impl ColumnValue for f32 {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Float);

    fn to_value(&self) -> Value<'_> {
        Value::Float(f64::from(*self))
    }
}

impl ColumnValue for f64 {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Float);

    fn to_value(&self) -> Value<'_> {
        Value::Float(*self)
    }
}

impl ColumnValue for bool {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Boolean);

    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ColumnValue for str {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Text);

    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self))
    }
}

impl ColumnValue for String {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Text);

    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }
}

impl ColumnValue for [u8] {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Binary);

    fn to_value(&self) -> Value<'_> {
        Value::Bytes(Cow::Borrowed(self))
    }
}

impl ColumnValue for Vec<u8> {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Binary);

    fn to_value(&self) -> Value<'_> {
        Value::Bytes(Cow::Borrowed(self.as_slice()))
    }
}

impl ColumnValue for bytes::Bytes {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Binary);

    fn to_value(&self) -> Value<'_> {
        Value::Bytes(Cow::Borrowed(self.as_ref()))
    }
}

impl ColumnValue for Uuid {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Uuid);

    fn to_value(&self) -> Value<'_> {
        Value::Uuid(*self)
    }
}

impl<Tz: TimeZone> ColumnValue for DateTime<Tz> {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::DateTime);

    fn to_value(&self) -> Value<'_> {
        Value::DateTime(self.with_timezone(&Utc))
    }
}

impl ColumnValue for NaiveDateTime {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::DateTime);

    fn to_value(&self) -> Value<'_> {
        Value::NaiveDateTime(*self)
    }
}

impl ColumnValue for NaiveDate {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Date);

    fn to_value(&self) -> Value<'_> {
        Value::Date(*self)
    }
}

impl ColumnValue for NaiveTime {
    const COLUMN_TYPE: ColumnType = ColumnType::new(ColumnKind::Time);

    fn to_value(&self) -> Value<'_> {
        Value::Time(*self)
    }
}

impl<T: ColumnValue> ColumnValue for Option<T> {
    const COLUMN_TYPE: ColumnType = T::COLUMN_TYPE.nullable();

    fn to_value(&self) -> Value<'_> {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ColumnValue + ?Sized> ColumnValue for &T {
    const COLUMN_TYPE: ColumnType = T::COLUMN_TYPE;

    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

/// Map fieldless enums onto columns by their ordinal
///
/// The enum must be `Copy`; the written value is `member as i64`, so
/// explicit discriminants are honored and member names never reach the
/// payload.
///
/// ```
/// #[derive(Clone, Copy)]
/// enum Status {
///     Pending = 1,
///     Shipped = 2,
/// }
///
/// fast_insert::enum_column!(Status);
/// ```
#[macro_export]
macro_rules! enum_column {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::record::ColumnValue for $ty {
                const COLUMN_TYPE: $crate::record::ColumnType =
                    $crate::record::ColumnType::new($crate::record::ColumnKind::Enumeration);

                fn to_value(&self) -> $crate::record::Value<'_> {
                    $crate::record::Value::Enum(*self as i64)
                }
            }
        )+
    };
}
