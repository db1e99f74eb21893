use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Width every record is padded or truncated to.
pub const RECORD_WIDTH: usize = 80;

const NAME_COLUMNS: Range<usize> = 0..6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Cannot create a record from an empty line")]
    EmptyLine,
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInteger { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
}

/// A value sliced out of a record and coerced by content.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Field {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Field::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric value of the field; integers widen to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Field::Int(value) => Some(*value as f64),
            Field::Float(value) => Some(*value),
            Field::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// One physical line of a fixed-column structure file.
///
/// The line is padded with spaces, or truncated, to [`RECORD_WIDTH`] columns. Columns are
/// addressed by half-open ranges of character offsets, so `0..6` is the record name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    number: usize,
    text: String,
}

impl Record {
    /// Builds a record from a line and its 1-based position in the file.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::EmptyLine`] if `line` is empty.
    pub fn new(line: &str, number: usize) -> Result<Self, RecordError> {
        if line.is_empty() {
            return Err(RecordError::EmptyLine);
        }
        let mut text: String = line.chars().take(RECORD_WIDTH).collect();
        let width = text.chars().count();
        text.extend(std::iter::repeat_n(' ', RECORD_WIDTH - width));
        Ok(Self { number, text })
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// The record name: the first six columns without trailing spaces.
    pub fn name(&self) -> &str {
        self.slice(NAME_COLUMNS).trim_end()
    }

    /// The full padded line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Everything after the record name.
    pub fn content(&self) -> &str {
        self.slice(NAME_COLUMNS.end..RECORD_WIDTH)
    }

    pub fn char_at(&self, column: usize) -> Option<char> {
        self.text.chars().nth(column)
    }

    /// The trimmed text of a column range, coerced to a number when it is one.
    ///
    /// Integers are tried first, then decimals. A decimal needs at least one digit, so words
    /// such as `inf`, `NaN` or `Infinity` stay text. Returns `None` for a blank range.
    pub fn get(&self, columns: Range<usize>) -> Option<Field> {
        let value = self.get_str(columns)?;
        if let Ok(int) = value.parse::<i64>() {
            return Some(Field::Int(int));
        }
        if value.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(float) = value.parse::<f64>() {
                return Some(Field::Float(float));
            }
        }
        Some(Field::Text(value.to_string()))
    }

    /// The trimmed text of a column range, never coerced. `None` for a blank range.
    pub fn get_as_string(&self, columns: Range<usize>) -> Option<String> {
        self.get_str(columns).map(str::to_string)
    }

    pub fn get_str(&self, columns: Range<usize>) -> Option<&str> {
        let value = self.slice(columns).trim();
        (!value.is_empty()).then_some(value)
    }

    /// Parses a column range that must hold an integer when it is not blank.
    pub fn get_int(&self, columns: Range<usize>) -> Result<Option<i64>, RecordError> {
        self.get_str(columns.clone())
            .map(|value| {
                value.parse().map_err(|_| RecordError::InvalidInteger {
                    columns: describe(&columns),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    /// Parses a column range that must hold a decimal number when it is not blank.
    pub fn get_float(&self, columns: Range<usize>) -> Result<Option<f64>, RecordError> {
        self.get_str(columns.clone())
            .map(|value| {
                value.parse().map_err(|_| RecordError::InvalidFloat {
                    columns: describe(&columns),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    fn slice(&self, columns: Range<usize>) -> &str {
        let start = self.byte_offset(columns.start);
        let end = self.byte_offset(columns.end.max(columns.start));
        &self.text[start..end]
    }

    fn byte_offset(&self, column: usize) -> usize {
        self.text
            .char_indices()
            .nth(column)
            .map_or(self.text.len(), |(offset, _)| offset)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record {} ({})", self.number, self.name())
    }
}

// 1-based inclusive column numbers, as the format documentation writes them.
fn describe(columns: &Range<usize>) -> String {
    format!("{}-{}", columns.start + 1, columns.end)
}
