//! Table definition resolver
//!
//! Aligns record fields with destination columns, optionally against the
//! live table schema.

use super::types::{ColumnDefinition, TableDefinition};
use crate::error::{Error, Result};
use crate::record::RecordMap;
use crate::types::ColumnOrder;
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of a table's physical column names
#[async_trait]
pub trait ColumnNameProvider: Send {
    /// Column names of `table` in physical (ordinal) order
    ///
    /// An unknown table yields an empty list.
    async fn column_names(&mut self, table: &str) -> Result<Vec<String>>;
}

/// In-memory column catalog
#[derive(Debug, Clone, Default)]
pub struct StaticColumns {
    tables: HashMap<String, Vec<String>>,
}

impl StaticColumns {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table and its columns in physical order
    #[must_use]
    pub fn with_table<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .insert(table.into(), columns.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl ColumnNameProvider for StaticColumns {
    async fn column_names(&mut self, table: &str) -> Result<Vec<String>> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }
}

/// Resolve the table definition for a load
pub async fn resolve<R, P>(
    table: &str,
    map: &RecordMap<R>,
    order: ColumnOrder,
    provider: &mut P,
) -> Result<TableDefinition>
where
    P: ColumnNameProvider + ?Sized,
{
    match order {
        ColumnOrder::Declared => TableDefinition::from_record_map(table, map),
        ColumnOrder::Schema => resolve_with_schema(table, map, provider).await,
    }
}

/// Reorder record fields to the destination table's physical column order
///
/// Names are matched case-insensitively and the table's spelling is kept.
/// Every record field must match a column; table columns without a field
/// are left out of the load.
pub async fn resolve_with_schema<R, P>(
    table: &str,
    map: &RecordMap<R>,
    provider: &mut P,
) -> Result<TableDefinition>
where
    P: ColumnNameProvider + ?Sized,
{
    let physical = provider.column_names(table).await?;
    if physical.is_empty() {
        return Err(Error::column_mapping(
            table,
            "table does not exist or has no columns",
        ));
    }

    let mut placed: Vec<(usize, usize)> = Vec::with_capacity(map.len());
    for (field_index, field) in map.fields().iter().enumerate() {
        let position = physical
            .iter()
            .position(|column| column.eq_ignore_ascii_case(field.name()))
            .ok_or_else(|| {
                Error::column_mapping(
                    table,
                    format!(
                        "field '{}' does not match any column (table has: {})",
                        field.name(),
                        physical.join(", ")
                    ),
                )
            })?;
        placed.push((position, field_index));
    }
    placed.sort_by_key(|&(position, _)| position);

    let columns = placed
        .into_iter()
        .enumerate()
        .map(|(ordinal, (position, field_index))| {
            let field = &map.fields()[field_index];
            ColumnDefinition::new(
                physical[position].clone(),
                field.column_type(),
                ordinal,
                field_index,
            )
        })
        .collect();

    let definition = TableDefinition::new(table, columns)?;
    tracing::debug!(
        table,
        columns = ?definition.names(),
        "Resolved column order from table schema"
    );
    Ok(definition)
}
