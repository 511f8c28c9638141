//! Payload writer
//!
//! Writes one batch of records as a header row followed by one row per
//! record, columns in table definition order.

use super::format::PayloadFormat;
use crate::encode::FieldEncoder;
use crate::error::{Error, Result};
use crate::record::RecordMap;
use crate::schema::TableDefinition;
use crate::types::{BinaryEncoding, DateTimeFormat};
use std::io::Write;

/// Delimited text writer for one table definition
#[derive(Debug, Clone)]
pub struct PayloadWriter<'d> {
    definition: &'d TableDefinition,
    encoder: FieldEncoder,
    delimiter: Vec<u8>,
    terminator: Vec<u8>,
}

impl<'d> PayloadWriter<'d> {
    /// Create a writer; `format` must already be validated
    pub fn new(
        definition: &'d TableDefinition,
        format: &PayloadFormat,
        binary: BinaryEncoding,
        datetime: DateTimeFormat,
    ) -> Self {
        Self {
            definition,
            encoder: FieldEncoder::new(format, binary, datetime),
            delimiter: format.field_delimiter.as_bytes().to_vec(),
            terminator: format.line_terminator.as_bytes().to_vec(),
        }
    }

    /// Append the header row
    pub fn write_header(&self, out: &mut Vec<u8>) -> Result<()> {
        for (index, column) in self.definition.columns().iter().enumerate() {
            if index > 0 {
                out.extend_from_slice(&self.delimiter);
            }
            self.encoder.encode_header(column, out)?;
        }
        out.extend_from_slice(&self.terminator);
        Ok(())
    }

    /// Append one record as a row
    pub fn write_row<R>(&self, map: &RecordMap<R>, record: &R, out: &mut Vec<u8>) -> Result<()> {
        for (index, column) in self.definition.columns().iter().enumerate() {
            let field = map.get(column.field).ok_or_else(|| {
                Error::column_mapping(
                    self.definition.table(),
                    format!(
                        "column '{}' refers to field #{} which the record does not map",
                        column.name, column.field
                    ),
                )
            })?;

            if index > 0 {
                out.extend_from_slice(&self.delimiter);
            }
            self.encoder.encode(column, &field.value(record), out)?;
        }
        out.extend_from_slice(&self.terminator);
        Ok(())
    }

    /// Encode a whole batch (header included) into memory
    pub fn write_batch<R>(&self, map: &RecordMap<R>, records: &[R]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(64 * (records.len() + 1));
        self.write_header(&mut out)?;
        for record in records {
            self.write_row(map, record, &mut out)?;
        }
        Ok(out)
    }

    /// Stream a whole batch (header included) into any writer
    ///
    /// Returns the number of bytes written.
    pub fn write_to<R, W: Write>(
        &self,
        map: &RecordMap<R>,
        records: &[R],
        mut sink: W,
    ) -> Result<usize> {
        let mut row = Vec::new();
        self.write_header(&mut row)?;
        sink.write_all(&row)?;
        let mut written = row.len();

        for record in records {
            row.clear();
            self.write_row(map, record, &mut row)?;
            sink.write_all(&row)?;
            written += row.len();
        }

        sink.flush()?;
        Ok(written)
    }
}
