//! Table definition types

use crate::error::{Error, Result};
use crate::record::{ColumnType, RecordMap};

/// One destination column of a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name as written in the statement and the header row
    pub name: String,
    /// Declared type of the record field feeding the column
    pub column_type: ColumnType,
    /// Position in the payload and in the statement column list
    pub ordinal: usize,
    /// Index of the record field in its `RecordMap`
    pub field: usize,
}

impl ColumnDefinition {
    /// Create a column definition
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        ordinal: usize,
        field: usize,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            ordinal,
            field,
        }
    }
}

/// Ordered column list shared by the payload writer and the statement builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    table: String,
    columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Create a definition from columns already in payload order
    ///
    /// Ordinals are reassigned so they always match the list position.
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDefinition>) -> Result<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(Error::missing_field("table"));
        }
        if columns.is_empty() {
            return Err(Error::column_mapping(&table, "no columns to load"));
        }

        let mut seen: Vec<&str> = Vec::with_capacity(columns.len());
        for column in &columns {
            if seen.iter().any(|name| name.eq_ignore_ascii_case(&column.name)) {
                return Err(Error::column_mapping(
                    &table,
                    format!("column '{}' is mapped more than once", column.name),
                ));
            }
            seen.push(&column.name);
        }

        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(ordinal, column)| ColumnDefinition { ordinal, ..column })
            .collect();

        Ok(Self { table, columns })
    }

    /// Definition in the record's declared field order
    pub fn from_record_map<R>(table: impl Into<String>, map: &RecordMap<R>) -> Result<Self> {
        let columns = map
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| {
                ColumnDefinition::new(field.name(), field.column_type(), index, index)
            })
            .collect();
        Self::new(table, columns)
    }

    /// Destination table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns in payload order
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Column names in payload order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Find a column by name (case-insensitive)
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there are no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
