//! Load configuration
//!
//! This module contains the settings of a bulk load, loadable from YAML or
//! JSON, and the strategies that derive a table name from a record type.

use crate::error::{Error, Result, ResultExt};
use crate::payload::PayloadFormat;
use crate::statement::Transform;
use crate::types::{BinaryEncoding, ColumnOrder, DateTimeFormat};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

// ============================================================================
// Load Config
// ============================================================================

/// Settings of one bulk load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Destination table; derived from the record type name when absent
    pub table: Option<String>,

    /// Records per batch; `None` loads everything in one batch
    pub batch_size: Option<usize>,

    /// How binary blobs are written
    pub binary_encoding: BinaryEncoding,

    /// How UTC date/times are written
    pub datetime_format: DateTimeFormat,

    /// Where the column order comes from
    pub column_order: ColumnOrder,

    /// Payload file layout
    pub payload: PayloadFormat,

    /// Directory for payload files (OS temp dir when absent)
    pub temp_dir: Option<PathBuf>,

    /// Per-column transforms replacing the defaults
    ///
    /// Written as `column: unhex` or `column: {expression: "LOWER({})"}`.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub transforms: HashMap<String, Transform>,
}

impl LoadConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file; `.json` files are JSON, anything else YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read load config '{}'", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Set the destination table
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the batch size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Set the binary encoding
    #[must_use]
    pub fn with_binary_encoding(mut self, encoding: BinaryEncoding) -> Self {
        self.binary_encoding = encoding;
        self
    }

    /// Set the date/time format
    #[must_use]
    pub fn with_datetime_format(mut self, format: DateTimeFormat) -> Self {
        self.datetime_format = format;
        self
    }

    /// Set the column order
    #[must_use]
    pub fn with_column_order(mut self, order: ColumnOrder) -> Self {
        self.column_order = order;
        self
    }

    /// Set the payload format
    #[must_use]
    pub fn with_payload(mut self, payload: PayloadFormat) -> Self {
        self.payload = payload;
        self
    }

    /// Set the payload directory
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Replace the default transform of one column
    #[must_use]
    pub fn with_transform(mut self, column: impl Into<String>, transform: Transform) -> Self {
        self.transforms.insert(column.into(), transform);
        self
    }

    /// Check the configuration before any batch is processed
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == Some(0) {
            return Err(Error::invalid_value("batch_size", "must be greater than 0"));
        }

        if let Some(table) = &self.table {
            if table.trim().is_empty() {
                return Err(Error::invalid_value("table", "must not be blank"));
            }
        }

        self.payload.validate()?;

        if self.binary_encoding == BinaryEncoding::Escaped && self.payload.escape.is_none() {
            return Err(Error::invalid_value(
                "binary_encoding",
                "escaped binary needs an escape character in the payload format",
            ));
        }

        for (column, transform) in &self.transforms {
            if let Transform::Expression(template) = transform {
                if !template.contains(crate::statement::VARIABLE_PLACEHOLDER) {
                    return Err(Error::invalid_value(
                        format!("transforms.{column}"),
                        "expression must reference the column value as {}",
                    ));
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// Table Name Strategies
// ============================================================================

/// Derives a table name from a record type name
pub trait TableNameStrategy: Send + Sync {
    fn table_name(&self, type_name: &str) -> String;
}

impl<F> TableNameStrategy for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn table_name(&self, type_name: &str) -> String {
        self(type_name)
    }
}

/// Uses the type name unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeName;

impl TableNameStrategy for TypeName {
    fn table_name(&self, type_name: &str) -> String {
        type_name.to_string()
    }
}

/// `OrderLine` becomes `order_line`, `HTTPLog` becomes `http_log`
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCase;

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap());
static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

impl TableNameStrategy for SnakeCase {
    fn table_name(&self, type_name: &str) -> String {
        let split = ACRONYM_BOUNDARY.replace_all(type_name, "${1}_${2}");
        WORD_BOUNDARY
            .replace_all(&split, "${1}_${2}")
            .to_lowercase()
    }
}
