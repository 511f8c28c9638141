//! Column-type serializer
//!
//! Converts typed field values into their payload text.
//!
//! # Rules
//!
//! - Date/times are normalized to UTC with microsecond precision
//! - UUIDs are 32 hex digits; an absent UUID is an empty field
//! - Binary blobs are hex text or escaped raw bytes
//! - Enumerations are written by ordinal
//! - Everything else uses locale-independent `Display`

mod encoder;

pub use encoder::FieldEncoder;
