//! Field encoder
//!
//! Turns one `Value` into the bytes of one payload field.

use crate::error::{Error, Result};
use crate::payload::PayloadFormat;
use crate::record::{ColumnKind, Value};
use crate::schema::ColumnDefinition;
use crate::types::{BinaryEncoding, DateTimeFormat};
use std::borrow::Cow;

const NAIVE_DATETIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.6f";
const DATE_PATTERN: &str = "%Y-%m-%d";
const TIME_PATTERN: &str = "%H:%M:%S%.6f";

/// Word read as NULL in enclosed payloads without an escape character
const NULL_WORD: &[u8] = b"NULL";

/// Serializes field values for one payload format
#[derive(Debug, Clone)]
pub struct FieldEncoder {
    escape: Option<u8>,
    enclosure: Option<u8>,
    /// Bytes that would end a field or a line if written bare
    specials: Vec<u8>,
    binary: BinaryEncoding,
    datetime: DateTimeFormat,
}

impl FieldEncoder {
    /// Create an encoder for a validated payload format
    pub fn new(format: &PayloadFormat, binary: BinaryEncoding, datetime: DateTimeFormat) -> Self {
        let enclosure = format.enclosure.map(|c| c as u8);
        let mut specials: Vec<u8> = [
            format.field_delimiter.as_bytes().first(),
            format.line_terminator.as_bytes().first(),
            enclosure.as_ref(),
        ]
        .into_iter()
        .flatten()
        .copied()
        .collect();
        specials.sort_unstable();
        specials.dedup();

        Self {
            escape: format.escape.map(|c| c as u8),
            enclosure,
            specials,
            binary,
            datetime,
        }
    }

    /// Binary encoding in use
    pub fn binary_encoding(&self) -> BinaryEncoding {
        self.binary
    }

    /// Append the encoded form of `value` to `out`
    pub fn encode(
        &self,
        column: &ColumnDefinition,
        value: &Value<'_>,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        let raw: Cow<'_, [u8]> = match value {
            Value::Null => return self.write_null(column, out),
            Value::Bool(v) => Cow::Borrowed(if *v { &b"1"[..] } else { &b"0"[..] }),
            Value::Int(v) | Value::Enum(v) => Cow::Owned(v.to_string().into_bytes()),
            Value::UInt(v) => Cow::Owned(v.to_string().into_bytes()),
            Value::Float(v) => {
                if !v.is_finite() {
                    return Err(Error::payload(
                        &column.name,
                        format!("{v} has no SQL representation"),
                    ));
                }
                Cow::Owned(v.to_string().into_bytes())
            }
            Value::Text(v) => Cow::Borrowed(v.as_bytes()),
            Value::Bytes(v) => match self.binary {
                BinaryEncoding::Hex => Cow::Owned(hex::encode(v).into_bytes()),
                BinaryEncoding::Escaped => Cow::Borrowed(v.as_ref()),
            },
            Value::DateTime(v) => {
                Cow::Owned(v.format(self.datetime.pattern()).to_string().into_bytes())
            }
            Value::NaiveDateTime(v) => {
                Cow::Owned(v.format(NAIVE_DATETIME_PATTERN).to_string().into_bytes())
            }
            Value::Date(v) => Cow::Owned(v.format(DATE_PATTERN).to_string().into_bytes()),
            Value::Time(v) => Cow::Owned(v.format(TIME_PATTERN).to_string().into_bytes()),
            Value::Uuid(v) => Cow::Owned(v.simple().to_string().into_bytes()),
        };

        self.write_field(column, &raw, out)
    }

    /// Append a header cell (a column name)
    pub fn encode_header(&self, column: &ColumnDefinition, out: &mut Vec<u8>) -> Result<()> {
        self.write_field(column, column.name.as_bytes(), out)
    }

    fn write_null(&self, column: &ColumnDefinition, out: &mut Vec<u8>) -> Result<()> {
        // Absent identifiers go out empty; NULLIF in the statement turns them into NULL.
        if column.column_type.kind == ColumnKind::Uuid {
            return Ok(());
        }
        match (self.escape, self.enclosure) {
            (Some(escape), _) => out.extend_from_slice(&[escape, b'N']),
            // Left unenclosed, so the server reads the word rather than the text.
            (None, Some(_)) => out.extend_from_slice(NULL_WORD),
            (None, None) => {
                return Err(Error::payload(
                    &column.name,
                    "NULL needs an escape character or an enclosure to be loaded",
                ))
            }
        }
        Ok(())
    }

    fn write_field(&self, column: &ColumnDefinition, raw: &[u8], out: &mut Vec<u8>) -> Result<()> {
        match self.escape {
            Some(escape) => {
                out.reserve(raw.len() + 2);
                self.write_enclosure(out);
                for &byte in raw {
                    self.escape_byte(escape, byte, out);
                }
                self.write_enclosure(out);
            }
            None => {
                self.check_collision(column, raw)?;
                self.write_enclosure(out);
                out.extend_from_slice(raw);
                self.write_enclosure(out);
            }
        }
        Ok(())
    }

    fn write_enclosure(&self, out: &mut Vec<u8>) {
        if let Some(enclosure) = self.enclosure {
            out.push(enclosure);
        }
    }

    fn escape_byte(&self, escape: u8, byte: u8, out: &mut Vec<u8>) {
        match byte {
            0x00 => out.extend_from_slice(&[escape, b'0']),
            b'\n' => out.extend_from_slice(&[escape, b'n']),
            b'\r' => out.extend_from_slice(&[escape, b'r']),
            0x1a => out.extend_from_slice(&[escape, b'Z']),
            _ if byte == escape || self.specials.contains(&byte) => {
                out.extend_from_slice(&[escape, byte]);
            }
            _ => out.push(byte),
        }
    }

    fn check_collision(&self, column: &ColumnDefinition, raw: &[u8]) -> Result<()> {
        if let Some(byte) = raw.iter().find(|&&b| self.specials.contains(&b)) {
            return Err(Error::payload(
                &column.name,
                format!(
                    "value contains {:?}, which needs an escape character to be loaded",
                    char::from(*byte)
                ),
            ));
        }
        Ok(())
    }
}
