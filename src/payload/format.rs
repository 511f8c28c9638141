//! Payload format
//!
//! Delimiter, terminator, escape and enclosure settings shared by the
//! payload writer and the load statement.

use crate::error::{Error, Result};
use crate::record::ColumnKind;
use crate::schema::TableDefinition;
use serde::{Deserialize, Serialize};

/// Characters that form escape sequences after the escape character
const ESCAPE_SEQUENCE_LETTERS: &[char] = &['0', 'b', 'n', 'r', 't', 'Z', 'N'];

/// Line terminator of the current platform
pub fn platform_line_terminator() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }
}

fn default_field_delimiter() -> String {
    ";;".to_string()
}

fn default_line_terminator() -> String {
    platform_line_terminator().to_string()
}

fn default_escape() -> Option<char> {
    Some('\\')
}

fn default_character_set() -> String {
    "utf8mb4".to_string()
}

/// Layout of the delimited payload file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadFormat {
    /// Separator between fields (two characters by default)
    #[serde(default = "default_field_delimiter")]
    pub field_delimiter: String,

    /// Separator between rows
    #[serde(default = "default_line_terminator")]
    pub line_terminator: String,

    /// Escape character; `None` disables escaping
    #[serde(default = "default_escape")]
    pub escape: Option<char>,

    /// Quote wrapped around every non-null field
    #[serde(default)]
    pub enclosure: Option<char>,

    /// Character set the server reads the file in
    #[serde(default = "default_character_set")]
    pub character_set: String,
}

impl Default for PayloadFormat {
    fn default() -> Self {
        Self {
            field_delimiter: default_field_delimiter(),
            line_terminator: default_line_terminator(),
            escape: default_escape(),
            enclosure: None,
            character_set: default_character_set(),
        }
    }
}

impl PayloadFormat {
    /// Create the default format
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter
    #[must_use]
    pub fn with_field_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.field_delimiter = delimiter.into();
        self
    }

    /// Set the line terminator
    #[must_use]
    pub fn with_line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.line_terminator = terminator.into();
        self
    }

    /// Set or clear the escape character
    #[must_use]
    pub fn with_escape(mut self, escape: Option<char>) -> Self {
        self.escape = escape;
        self
    }

    /// Set or clear the field enclosure
    #[must_use]
    pub fn with_enclosure(mut self, enclosure: Option<char>) -> Self {
        self.enclosure = enclosure;
        self
    }

    /// Set the character set
    #[must_use]
    pub fn with_character_set(mut self, character_set: impl Into<String>) -> Self {
        self.character_set = character_set.into();
        self
    }

    /// Text the server reads as NULL in this format
    ///
    /// A bare `NULL` word only counts as NULL when fields are enclosed, so
    /// a format with neither escape nor enclosure has no null token.
    pub fn null_token(&self) -> Option<String> {
        match (self.escape, self.enclosure) {
            (Some(escape), _) => Some(format!("{escape}N")),
            (None, Some(_)) => Some("NULL".to_string()),
            (None, None) => None,
        }
    }

    /// Reject definitions with nullable columns this format cannot mark as NULL
    pub fn check_nulls(&self, definition: &TableDefinition) -> Result<()> {
        if self.null_token().is_some() {
            return Ok(());
        }
        // Nullable identifiers are written empty and turned into NULL by the statement.
        let nullable = definition.columns().iter().find(|column| {
            column.column_type.nullable && column.column_type.kind != ColumnKind::Uuid
        });
        match nullable {
            Some(column) => Err(Error::invalid_value(
                "escape",
                format!(
                    "column {} is nullable, which needs an escape character or an enclosure",
                    column.name
                ),
            )),
            None => Ok(()),
        }
    }

    /// Check that fields and rows can be told apart unambiguously
    pub fn validate(&self) -> Result<()> {
        let delimiter = &self.field_delimiter;
        let terminator = &self.line_terminator;

        if delimiter.is_empty() {
            return Err(Error::invalid_value("field_delimiter", "must not be empty"));
        }
        if terminator.is_empty() {
            return Err(Error::invalid_value("line_terminator", "must not be empty"));
        }
        if !delimiter.is_ascii() {
            return Err(Error::invalid_value("field_delimiter", "must be ASCII"));
        }
        if !terminator.is_ascii() {
            return Err(Error::invalid_value("line_terminator", "must be ASCII"));
        }
        if delimiter.starts_with(terminator.as_str()) || terminator.starts_with(delimiter.as_str())
        {
            return Err(Error::invalid_value(
                "field_delimiter",
                "must not overlap the line terminator",
            ));
        }

        for (field, value) in [("field_delimiter", delimiter), ("line_terminator", terminator)] {
            if let Some(first) = value.chars().next() {
                if self.escape.is_some() && ESCAPE_SEQUENCE_LETTERS.contains(&first) {
                    return Err(Error::invalid_value(
                        field,
                        format!("cannot start with '{first}', which forms an escape sequence"),
                    ));
                }
            }
        }

        if let Some(escape) = self.escape {
            if !escape.is_ascii() || escape.is_ascii_alphanumeric() || escape.is_ascii_whitespace()
            {
                return Err(Error::invalid_value(
                    "escape",
                    format!("'{escape}' cannot be used as escape character"),
                ));
            }
            if delimiter.contains(escape) || terminator.contains(escape) {
                return Err(Error::invalid_value(
                    "escape",
                    "must not appear in the field delimiter or line terminator",
                ));
            }
        }

        if let Some(enclosure) = self.enclosure {
            if !enclosure.is_ascii() || enclosure.is_ascii_alphanumeric() {
                return Err(Error::invalid_value(
                    "enclosure",
                    format!("'{enclosure}' cannot be used as enclosure"),
                ));
            }
            if Some(enclosure) == self.escape
                || delimiter.contains(enclosure)
                || terminator.contains(enclosure)
            {
                return Err(Error::invalid_value(
                    "enclosure",
                    "must differ from the escape character, delimiter and terminator",
                ));
            }
        }

        if self.character_set.is_empty()
            || !self
                .character_set
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::invalid_value(
                "character_set",
                format!("'{}' is not a character set name", self.character_set),
            ));
        }

        Ok(())
    }
}
