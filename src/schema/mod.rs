//! Table definition module
//!
//! Produces the ordered column list that both the payload writer and the
//! load statement builder consume.
//!
//! # Features
//!
//! - **Declared Order**: Columns follow the record mapping
//! - **Schema-Aware Order**: Columns follow the destination table, matched case-insensitively
//! - **Pluggable Catalog**: Column names come from any `ColumnNameProvider`

mod resolver;
mod types;

pub use resolver::{resolve, resolve_with_schema, ColumnNameProvider, StaticColumns};
pub use types::{ColumnDefinition, TableDefinition};

#[cfg(test)]
mod tests;
