//! Error types for schema construction and row streaming.

use thiserror::Error;

use crate::schema::HeadingPolicy;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, TableError>;

/// Boxed error produced by an external row source or sink.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a conversion function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The text is not in the literal form the conversion expects.
    #[error("cannot parse {text:?}: {reason}")]
    Malformed { text: String, reason: String },

    /// Any other failure inside the conversion.
    #[error("{0}")]
    Failed(String),
}

impl ConvertError {
    pub fn malformed(text: impl Into<String>, reason: impl ToString) -> Self {
        Self::Malformed {
            text: text.into(),
            reason: reason.to_string(),
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Errors raised by schemas, readers and writers.
///
/// Per-record variants carry `line`, the 0-based index of the line being
/// read or written when the failure happened (heading line included).
#[derive(Error, Debug)]
pub enum TableError {
    /// Invalid column description, bad name or bad definition row.
    #[error("schema error: {0}")]
    Schema(String),

    /// A column name that the operation requires is absent.
    #[error("column not found: {0:?}")]
    NotFound(String),

    /// A column name that must be unique collides with another.
    #[error("duplicate column name: {0:?}")]
    DuplicateName(String),

    /// The heading row disagrees with the schema under a checking policy.
    #[error("input line {line}: heading mismatch under {policy:?}\nexpected {expected:?}\nreceived {actual:?}")]
    HeadingMismatch {
        line: usize,
        expected: Vec<String>,
        actual: Vec<String>,
        policy: HeadingPolicy,
    },

    /// A row has fewer fields than the schema has columns.
    #[error("input line {line}: expected {expected} fields, got {actual}")]
    RowLength {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// An input conversion rejected malformed text.
    #[error("input line {line}: column {column:?} cannot convert {text:?}: {reason}")]
    Conversion {
        line: usize,
        column: String,
        text: String,
        reason: String,
    },

    /// Any other failure while reading data.
    #[error("input line {line}: error reading data: {message}")]
    Read { line: usize, message: String },

    /// The external source could not produce a row.
    #[error("input line {line}: {source}")]
    Source {
        line: usize,
        #[source]
        source: BoxError,
    },

    /// Any failure while writing a heading or data row.
    #[error("output line {line}: error writing data: {message}")]
    Write { line: usize, message: String },

    /// A record has the wrong shape for the writer.
    #[error("output line {line}: {message}")]
    Value { line: usize, message: String },

    /// A keyed or named record lacks values for some columns.
    #[error("output line {line}: record is missing values for columns {missing:?}")]
    MissingField { line: usize, missing: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TableError {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    /// Line index attached to a per-record error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::HeadingMismatch { line, .. }
            | Self::RowLength { line, .. }
            | Self::Conversion { line, .. }
            | Self::Read { line, .. }
            | Self::Source { line, .. }
            | Self::Write { line, .. }
            | Self::Value { line, .. }
            | Self::MissingField { line, .. } => Some(*line),
            _ => None,
        }
    }
}
