//! Payload module
//!
//! Writes batches of records as delimited text for `LOAD DATA LOCAL INFILE`.
//!
//! # Overview
//!
//! This module provides:
//! - `PayloadFormat` - delimiter, terminator, escape and enclosure settings
//! - `PayloadWriter` - header + rows for one batch, in table definition order
//! - `PayloadFile` - transient payload file removed on every exit path
//! - `DiagnosticSink` - echo of each payload after its batch

mod file;
mod format;
mod sink;
mod writer;

pub use file::PayloadFile;
pub use format::{platform_line_terminator, PayloadFormat};
pub use sink::DiagnosticSink;
pub use writer::PayloadWriter;
