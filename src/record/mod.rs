//! Record mapping module
//!
//! Describes how the fields of a Rust record type become table columns.
//!
//! # Overview
//!
//! - `Record` - implemented by every type that can be bulk loaded
//! - `RecordMap` - ordered field mappings (stored fields and computed getters)
//! - `ColumnValue` / `Value` - typed field values handed to the serializer
//! - `enum_column!` - maps fieldless enums by ordinal

mod map;
mod value;

pub use map::{Accessor, FieldMapping, Record, RecordMap};
pub use value::{ColumnKind, ColumnType, ColumnValue, Value};
