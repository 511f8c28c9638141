//! Load statement module
//!
//! Builds the `LOAD DATA LOCAL INFILE` text for one payload file.
//!
//! The column list comes from the same `TableDefinition` the payload writer
//! uses, so the statement and the payload header always agree. Columns with a
//! transform are read into `@fi_<ordinal>` and assigned in the `SET` clause.

mod builder;
mod transform;

pub use builder::{
    column_transforms, quote_identifier, sql_literal, LoadStatement, BINARY_CHARACTER_SET,
};
pub use transform::{variable_name, ColumnTransform, Transform, VARIABLE_PLACEHOLDER};

#[cfg(test)]
mod tests;
