//! Common types used throughout fast-insert
//!
//! This module contains shared enums that are part of the load
//! configuration and are consulted by several components.

use serde::{Deserialize, Serialize};

// ============================================================================
// Binary Encoding
// ============================================================================

/// How binary blobs are written into the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryEncoding {
    /// Lowercase hex text, converted back with `UNHEX()` on load
    #[default]
    Hex,
    /// Raw bytes protected by the payload escape character
    Escaped,
}

// ============================================================================
// Date/Time Format
// ============================================================================

/// Text form used for UTC date/time values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeFormat {
    /// `YYYY-MM-DD HH:MM:SS.ffffff`, always in UTC
    #[default]
    Mysql,
    /// RFC 3339 with microseconds and a `+00:00` offset, which MySQL
    /// 8.0.19+ accepts in date/time literals
    Iso8601,
}

impl DateTimeFormat {
    /// strftime pattern for this format
    pub fn pattern(self) -> &'static str {
        match self {
            DateTimeFormat::Mysql => "%Y-%m-%d %H:%M:%S%.6f",
            DateTimeFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S%.6f+00:00",
        }
    }
}

// ============================================================================
// Column Order
// ============================================================================

/// Where the column order of a load comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
    /// Field order declared by the record mapping
    #[default]
    Declared,
    /// Physical column order of the destination table
    Schema,
}
