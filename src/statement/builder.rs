//! Load statement builder

use super::transform::{ColumnTransform, Transform};
use crate::error::{Error, Result};
use crate::payload::PayloadFormat;
use crate::schema::TableDefinition;
use crate::types::BinaryEncoding;
use std::collections::HashMap;
use std::path::Path;

/// Character set that loads escaped binary bytes unchanged
pub const BINARY_CHARACTER_SET: &str = "binary";

/// `LOAD DATA LOCAL INFILE` statement for one table definition
#[derive(Debug, Clone)]
pub struct LoadStatement<'d> {
    definition: &'d TableDefinition,
    format: PayloadFormat,
    transforms: Vec<ColumnTransform>,
}

impl<'d> LoadStatement<'d> {
    /// Create a statement reading payloads written in `format`
    pub fn new(definition: &'d TableDefinition, format: &PayloadFormat) -> Self {
        Self {
            definition,
            format: format.clone(),
            transforms: Vec::new(),
        }
    }

    /// Add a column transform, replacing any earlier one for the same column
    #[must_use]
    pub fn with_transform(mut self, transform: ColumnTransform) -> Self {
        self.transforms
            .retain(|t| !t.column.eq_ignore_ascii_case(&transform.column));
        self.transforms.push(transform);
        self
    }

    /// Add several column transforms
    #[must_use]
    pub fn with_transforms(self, transforms: impl IntoIterator<Item = ColumnTransform>) -> Self {
        transforms
            .into_iter()
            .fold(self, |statement, transform| statement.with_transform(transform))
    }

    /// Override the character set the server reads the file in
    #[must_use]
    pub fn with_character_set(mut self, character_set: impl Into<String>) -> Self {
        self.format.character_set = character_set.into();
        self
    }

    /// Transforms currently bound, in insertion order
    pub fn transforms(&self) -> &[ColumnTransform] {
        &self.transforms
    }

    /// Render the statement for a payload file
    pub fn build(&self, payload_path: &Path) -> String {
        let format = &self.format;
        let mut targets = Vec::with_capacity(self.definition.len());
        let mut assignments = Vec::new();

        for column in self.definition.columns() {
            match self.transform_for(&column.name) {
                Some(transform) => {
                    targets.push(transform.variable.clone());
                    assignments.push(format!(
                        "{} = {}",
                        quote_identifier(&column.name),
                        transform.expression()
                    ));
                }
                None => targets.push(quote_identifier(&column.name)),
            }
        }

        let mut lines = vec![
            format!(
                "LOAD DATA LOCAL INFILE {}",
                sql_literal(&payload_path.to_string_lossy())
            ),
            format!("INTO TABLE {}", quote_table(self.definition.table())),
            format!("CHARACTER SET {}", format.character_set),
            format!(
                "FIELDS TERMINATED BY {} ENCLOSED BY {} ESCAPED BY {}",
                sql_literal(&format.field_delimiter),
                sql_literal(&optional_char(format.enclosure)),
                sql_literal(&optional_char(format.escape)),
            ),
            format!("LINES TERMINATED BY {}", sql_literal(&format.line_terminator)),
            "IGNORE 1 LINES".to_string(),
            format!("({})", targets.join(", ")),
        ];
        if !assignments.is_empty() {
            lines.push(format!("SET {}", assignments.join(", ")));
        }

        lines.join("\n")
    }

    fn transform_for(&self, column: &str) -> Option<&ColumnTransform> {
        self.transforms
            .iter()
            .find(|t| t.column.eq_ignore_ascii_case(column))
    }
}

/// Transforms for every column of a load: defaults first, then overrides
///
/// Override keys match columns case-insensitively; a key naming no column
/// of the definition is a configuration error.
pub fn column_transforms(
    definition: &TableDefinition,
    binary: BinaryEncoding,
    overrides: &HashMap<String, Transform>,
) -> Result<Vec<ColumnTransform>> {
    for column in overrides.keys() {
        if definition.column(column).is_none() {
            return Err(Error::column_mapping(
                definition.table(),
                format!("transform configured for unknown column '{column}'"),
            ));
        }
    }

    let transforms = definition
        .columns()
        .iter()
        .filter_map(|column| {
            let configured = overrides
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(&column.name))
                .map(|(_, transform)| transform.clone());
            configured
                .or_else(|| Transform::default_for(column.column_type, binary))
                .map(|transform| ColumnTransform::new(&column.name, column.ordinal, transform))
        })
        .collect();

    Ok(transforms)
}

/// Quote an identifier with backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a possibly schema-qualified table name
fn quote_table(table: &str) -> String {
    table
        .split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

/// Single-quoted MySQL string literal
pub fn sql_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            '\u{1a}' => out.push_str("\\Z"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn optional_char(c: Option<char>) -> String {
    c.map(String::from).unwrap_or_default()
}
