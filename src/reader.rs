//! Schema-aware readers.
//!
//! [`ListReader`] does the work: it consumes the heading line according to
//! the heading policy, checks row length and applies each column's input
//! conversion. [`KeyedReader`] and [`NamedReader`] each own a `ListReader`
//! and reshape its rows.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::convert::Value;
use crate::error::{ConvertError, Result, TableError};
use crate::io::RowSource;
use crate::schema::{ColumnSchema, HeadingPolicy};

/// Row keyed by column name, in column order.
pub type KeyedRow = serde_json::Map<String, Value>;

/// Options for opening a reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderOptions {
    /// Accept rows with fewer fields than columns; missing trailing values
    /// become `Value::Null`.
    pub short_rows_allowed: bool,
    /// Overrides the schema's heading policy.
    pub heading_policy: Option<HeadingPolicy>,
    /// Fail on empty input when the policy expects a heading line, instead
    /// of treating it as "no heading".
    pub require_heading: bool,
}

impl ReaderOptions {
    pub fn short_rows(mut self, allowed: bool) -> Self {
        self.short_rows_allowed = allowed;
        self
    }

    pub fn heading_policy(mut self, policy: HeadingPolicy) -> Self {
        self.heading_policy = Some(policy);
        self
    }

    pub fn require_heading(mut self, required: bool) -> Self {
        self.require_heading = required;
        self
    }
}

/// Reads each row as a list of typed values in column order.
pub struct ListReader<'s, S> {
    schema: &'s ColumnSchema,
    source: S,
    short_rows_allowed: bool,
    line_num: usize,
    heading_row: Option<Vec<String>>,
}

impl<'s, S: RowSource> ListReader<'s, S> {
    /// Open a reader. Unless the policy is `NoHeading` the heading line is
    /// read and verified immediately.
    pub fn new(schema: &'s ColumnSchema, mut source: S, options: ReaderOptions) -> Result<Self> {
        let policy = options.heading_policy.unwrap_or(schema.heading_policy());
        debug!(%schema, %policy, short_rows = options.short_rows_allowed, "opening reader");

        let mut heading_row = None;
        let mut line_num = 0;
        if policy.has_heading() {
            match source.next_row() {
                Some(Ok(row)) => {
                    if let Err(e) = policy.verify(&schema.headings(), &row, 0) {
                        warn!(error = %e, "heading check failed");
                        return Err(e);
                    }
                    heading_row = Some(row);
                    line_num = 1;
                }
                Some(Err(err)) => return Err(TableError::Source { line: 0, source: err }),
                // Empty input: the first data pull reports the end.
                None if options.require_heading => {
                    return Err(TableError::HeadingMismatch {
                        line: 0,
                        expected: schema.headings(),
                        actual: Vec::new(),
                        policy,
                    })
                }
                None => debug!("empty input, no heading line"),
            }
        }

        Ok(Self {
            schema,
            source,
            short_rows_allowed: options.short_rows_allowed,
            line_num,
            heading_row,
        })
    }

    /// Lines consumed so far, heading line included.
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    /// Heading line exactly as read, `None` with `NoHeading` or on empty
    /// input. It need not equal the schema's headings.
    pub fn heading_row(&self) -> Option<&[String]> {
        self.heading_row.as_deref()
    }

    pub fn schema(&self) -> &'s ColumnSchema {
        self.schema
    }

    /// Read the next row, `None` at end of input. The line counter only
    /// advances when the row converts.
    pub fn read_row(&mut self) -> Option<Result<Vec<Value>>> {
        let line = self.line_num;
        let fields = match self.source.next_row()? {
            Ok(fields) => fields,
            Err(err) => return Some(Err(TableError::Source { line, source: err })),
        };
        let values = self.convert(line, fields);
        if values.is_ok() {
            self.line_num += 1;
        }
        Some(values)
    }

    fn convert(&self, line: usize, fields: Vec<String>) -> Result<Vec<Value>> {
        let columns = self.schema.columns();
        if fields.len() < columns.len() && !self.short_rows_allowed {
            warn!(line, expected = columns.len(), actual = fields.len(), "short row");
            return Err(TableError::RowLength {
                line,
                expected: columns.len(),
                actual: fields.len(),
            });
        }

        let mut values = Vec::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            let Some(text) = fields.get(i) else {
                values.push(Value::Null);
                continue;
            };
            let value = col.input.apply(text).map_err(|e| match e {
                ConvertError::Malformed { text, reason } => TableError::Conversion {
                    line,
                    column: col.name.clone(),
                    text,
                    reason,
                },
                ConvertError::Failed(msg) => TableError::Read {
                    line,
                    message: format!("column {:?}: {}", col.name, msg),
                },
            })?;
            values.push(value);
        }
        trace!(line, fields = fields.len(), "read row");
        Ok(values)
    }
}

impl<S: RowSource> Iterator for ListReader<'_, S> {
    type Item = Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_row()
    }
}

/// Reads each row as a map from column name to value, in column order.
pub struct KeyedReader<'s, S> {
    inner: ListReader<'s, S>,
}

impl<'s, S: RowSource> KeyedReader<'s, S> {
    pub fn new(schema: &'s ColumnSchema, source: S, options: ReaderOptions) -> Result<Self> {
        Ok(Self {
            inner: ListReader::new(schema, source, options)?,
        })
    }

    pub fn line_num(&self) -> usize {
        self.inner.line_num()
    }

    pub fn heading_row(&self) -> Option<&[String]> {
        self.inner.heading_row()
    }

    pub fn read_row(&mut self) -> Option<Result<KeyedRow>> {
        let values = match self.inner.read_row()? {
            Ok(values) => values,
            Err(e) => return Some(Err(e)),
        };
        Some(Ok(keyed(self.inner.schema(), values)))
    }
}

impl<S: RowSource> Iterator for KeyedReader<'_, S> {
    type Item = Result<KeyedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_row()
    }
}

fn keyed(schema: &ColumnSchema, values: Vec<Value>) -> KeyedRow {
    schema
        .columns()
        .iter()
        .map(|c| c.name.clone())
        .zip(values)
        .collect()
}

/// Reads each row into a caller record type whose field names are the
/// column names, e.g. a `#[derive(Deserialize)]` struct.
///
/// Field names are not checked against the schema. Only a missing required
/// field is rejected: columns `T` does not name are dropped, and `Option`
/// fields with no column are `None`. Put `#[serde(deny_unknown_fields)]` on
/// `T` to reject extra columns.
pub struct NamedReader<'s, S, T> {
    inner: ListReader<'s, S>,
    _record: PhantomData<fn() -> T>,
}

impl<'s, S: RowSource, T: DeserializeOwned> NamedReader<'s, S, T> {
    pub fn new(schema: &'s ColumnSchema, source: S, options: ReaderOptions) -> Result<Self> {
        Ok(Self {
            inner: ListReader::new(schema, source, options)?,
            _record: PhantomData,
        })
    }

    pub fn line_num(&self) -> usize {
        self.inner.line_num()
    }

    pub fn heading_row(&self) -> Option<&[String]> {
        self.inner.heading_row()
    }

    pub fn read_row(&mut self) -> Option<Result<T>> {
        let line = self.inner.line_num();
        let values = match self.inner.read_row()? {
            Ok(values) => values,
            Err(e) => return Some(Err(e)),
        };
        let map = keyed(self.inner.schema(), values);
        match serde_json::from_value(Value::Object(map)) {
            Ok(record) => Some(Ok(record)),
            Err(e) => {
                // the row converted but is not a record
                self.inner.line_num = line;
                Some(Err(TableError::Read {
                    line,
                    message: format!("cannot build record: {}", e),
                }))
            }
        }
    }
}

impl<S: RowSource, T: DeserializeOwned> Iterator for NamedReader<'_, S, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_row()
    }
}

impl ColumnSchema {
    pub fn list_reader<S: RowSource>(
        &self,
        source: S,
        options: ReaderOptions,
    ) -> Result<ListReader<'_, S>> {
        ListReader::new(self, source, options)
    }

    pub fn keyed_reader<S: RowSource>(
        &self,
        source: S,
        options: ReaderOptions,
    ) -> Result<KeyedReader<'_, S>> {
        KeyedReader::new(self, source, options)
    }

    pub fn named_reader<T: DeserializeOwned, S: RowSource>(
        &self,
        source: S,
        options: ReaderOptions,
    ) -> Result<NamedReader<'_, S, T>> {
        NamedReader::new(self, source, options)
    }
}
