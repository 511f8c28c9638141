//! Test helpers
//!
//! A reader that splits payloads the way `LOAD DATA` does, so tests can
//! check what the server would actually receive.

use crate::payload::PayloadFormat;

/// One field as the server would read it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Null,
    Data(Vec<u8>),
}

impl Field {
    /// Field content as UTF-8 text
    pub fn text(&self) -> Option<String> {
        match self {
            Field::Null => None,
            Field::Data(bytes) => Some(String::from_utf8(bytes.clone()).unwrap()),
        }
    }
}

/// Split a payload into rows of fields, header row included
pub fn read_payload(format: &PayloadFormat, payload: &[u8]) -> Vec<Vec<Field>> {
    let escape = format.escape.map(|c| c as u8);
    let enclosure = format.enclosure.map(|c| c as u8);
    let delimiter = format.field_delimiter.as_bytes();
    let terminator = format.line_terminator.as_bytes();

    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = Vec::new();
    let mut start = 0;
    let mut i = 0;

    let finish = |raw: &[u8], field: &mut Vec<u8>| -> Field {
        // An unenclosed NULL word is NULL only when fields are enclosed.
        let is_null = escape.is_some_and(|e| raw == [e, b'N'])
            || (enclosure.is_some() && raw == b"NULL");
        let value = std::mem::take(field);
        if is_null {
            Field::Null
        } else {
            Field::Data(value)
        }
    };

    while i < payload.len() {
        let byte = payload[i];
        if Some(byte) == escape && i + 1 < payload.len() {
            field.push(match payload[i + 1] {
                b'0' => 0x00,
                b'b' => 0x08,
                b'n' => b'\n',
                b'r' => b'\r',
                b't' => b'\t',
                b'Z' => 0x1a,
                other => other,
            });
            i += 2;
        } else if Some(byte) == enclosure {
            i += 1;
        } else if payload[i..].starts_with(delimiter) {
            row.push(finish(&payload[start..i], &mut field));
            i += delimiter.len();
            start = i;
        } else if payload[i..].starts_with(terminator) {
            row.push(finish(&payload[start..i], &mut field));
            rows.push(std::mem::take(&mut row));
            i += terminator.len();
            start = i;
        } else {
            field.push(byte);
            i += 1;
        }
    }

    rows
}
