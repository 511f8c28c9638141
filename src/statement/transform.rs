//! Column transforms
//!
//! A transform binds a payload column to a user variable and computes the
//! stored value from it on the server.

use crate::record::{ColumnKind, ColumnType};
use crate::types::BinaryEncoding;
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the bound variable in an expression template
pub const VARIABLE_PLACEHOLDER: &str = "{}";

/// Server-side expression applied to a bound variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// `UNHEX(@v)`
    Unhex,
    /// `UNHEX(NULLIF(@v, ''))`
    UnhexNullIfEmpty,
    /// `NULLIF(@v, '')`
    NullIfEmpty,
    /// Any expression; `{}` stands for the variable
    Expression(String),
}

impl Transform {
    /// SQL expression over `variable`
    pub fn expression(&self, variable: &str) -> String {
        match self {
            Transform::Unhex => format!("UNHEX({variable})"),
            Transform::UnhexNullIfEmpty => format!("UNHEX(NULLIF({variable}, ''))"),
            Transform::NullIfEmpty => format!("NULLIF({variable}, '')"),
            Transform::Expression(template) => template.replace(VARIABLE_PLACEHOLDER, variable),
        }
    }

    /// Transform a column needs by default, if any
    pub fn default_for(column_type: ColumnType, binary: BinaryEncoding) -> Option<Self> {
        match column_type.kind {
            ColumnKind::Uuid if column_type.nullable => Some(Transform::UnhexNullIfEmpty),
            ColumnKind::Uuid => Some(Transform::Unhex),
            ColumnKind::Binary if binary == BinaryEncoding::Hex => Some(Transform::Unhex),
            _ => None,
        }
    }
}

/// A transform bound to one column of the load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTransform {
    /// Destination column
    pub column: String,
    /// User variable the payload field is read into, `@` included
    pub variable: String,
    pub transform: Transform,
}

impl ColumnTransform {
    /// Bind `transform` to `column` through the variable for `ordinal`
    pub fn new(column: impl Into<String>, ordinal: usize, transform: Transform) -> Self {
        Self {
            column: column.into(),
            variable: variable_name(ordinal),
            transform,
        }
    }

    /// Right-hand side of the `SET` assignment
    pub fn expression(&self) -> String {
        self.transform.expression(&self.variable)
    }
}

/// User variable holding the payload field at `ordinal`
pub fn variable_name(ordinal: usize) -> String {
    format!("@fi_{ordinal}")
}
