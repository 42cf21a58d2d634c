//! Schema-aware writers.
//!
//! [`ListWriter`] writes the heading line (unless the policy is
//! `NoHeading`) and applies each column's output conversion. [`KeyedWriter`]
//! and [`NamedWriter`] own a `ListWriter` and feed it values in column order.
//! Headings are never checked on output.

use std::marker::PhantomData;

use serde::Serialize;
use tracing::{debug, trace};

use crate::convert::Value;
use crate::error::{Result, TableError};
use crate::io::RowSink;
use crate::reader::KeyedRow;
use crate::schema::{ColumnSchema, HeadingPolicy};

/// Options for opening a writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriterOptions {
    /// Overrides the schema's heading policy; only `NoHeading` versus
    /// anything else matters on output.
    pub heading_policy: Option<HeadingPolicy>,
}

impl WriterOptions {
    pub fn heading_policy(mut self, policy: HeadingPolicy) -> Self {
        self.heading_policy = Some(policy);
        self
    }
}

/// Writes lists of typed values, one per row, in column order.
pub struct ListWriter<'s, K> {
    schema: &'s ColumnSchema,
    sink: K,
    line_num: usize,
}

impl<'s, K: RowSink> ListWriter<'s, K> {
    /// Open a writer, writing the heading line immediately unless the
    /// policy is `NoHeading`.
    pub fn new(schema: &'s ColumnSchema, mut sink: K, options: WriterOptions) -> Result<Self> {
        let policy = options.heading_policy.unwrap_or(schema.heading_policy());
        debug!(%schema, %policy, "opening writer");

        let mut line_num = 0;
        if policy.has_heading() {
            sink.write_row(&schema.headings())
                .map_err(|e| TableError::Write {
                    line: 0,
                    message: format!("cannot write column headings: {}", e),
                })?;
            line_num = 1;
        }
        Ok(Self {
            schema,
            sink,
            line_num,
        })
    }

    /// Lines written so far, heading line included.
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    pub fn schema(&self) -> &'s ColumnSchema {
        self.schema
    }

    /// Write one row; it must hold exactly one value per column.
    pub fn writerow(&mut self, row: &[Value]) -> Result<()> {
        let line = self.line_num;
        let columns = self.schema.columns();
        if row.len() != columns.len() {
            return Err(TableError::Value {
                line,
                message: format!("expected {} items, got {}", columns.len(), row.len()),
            });
        }

        let fields = columns
            .iter()
            .zip(row)
            .map(|(col, value)| {
                col.output.apply(value).map_err(|e| TableError::Write {
                    line,
                    message: format!("column {:?}: {}", col.name, e),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.sink.write_row(&fields).map_err(|e| TableError::Write {
            line,
            message: e.to_string(),
        })?;
        self.line_num += 1;
        trace!(line, "wrote row");
        Ok(())
    }

    /// Write a row held as a single value; only arrays are accepted.
    pub fn writerow_value(&mut self, row: &Value) -> Result<()> {
        match row {
            Value::Array(items) => self.writerow(items),
            Value::String(_) => Err(TableError::Value {
                line: self.line_num,
                message: "row data must be a sequence of values, not text".to_string(),
            }),
            other => Err(TableError::Value {
                line: self.line_num,
                message: format!("row data must be a sequence of values, got {}", other),
            }),
        }
    }

    /// Write every row in order, stopping at the first failure.
    pub fn writerows<I, R>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[Value]>,
    {
        for row in rows {
            self.writerow(row.as_ref())?;
        }
        Ok(())
    }

    /// Give back the sink, e.g. to flush it.
    pub fn into_inner(self) -> K {
        self.sink
    }
}

/// Writes rows keyed by column name. Keys that are not column names are
/// ignored.
pub struct KeyedWriter<'s, K> {
    inner: ListWriter<'s, K>,
}

impl<'s, K: RowSink> KeyedWriter<'s, K> {
    pub fn new(schema: &'s ColumnSchema, sink: K, options: WriterOptions) -> Result<Self> {
        Ok(Self {
            inner: ListWriter::new(schema, sink, options)?,
        })
    }

    pub fn line_num(&self) -> usize {
        self.inner.line_num()
    }

    pub fn writerow(&mut self, row: &KeyedRow) -> Result<()> {
        let values = ordered_values(self.inner.schema(), row, self.inner.line_num())?;
        self.inner.writerow(&values)
    }

    pub fn writerows<'r, I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = &'r KeyedRow>,
    {
        for row in rows {
            self.writerow(row)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> K {
        self.inner.into_inner()
    }
}

/// Writes caller records whose field names are the column names, e.g. a
/// `#[derive(Serialize)]` struct.
pub struct NamedWriter<'s, K, T> {
    inner: ListWriter<'s, K>,
    _record: PhantomData<fn(&T)>,
}

impl<'s, K: RowSink, T: Serialize> NamedWriter<'s, K, T> {
    pub fn new(schema: &'s ColumnSchema, sink: K, options: WriterOptions) -> Result<Self> {
        Ok(Self {
            inner: ListWriter::new(schema, sink, options)?,
            _record: PhantomData,
        })
    }

    pub fn line_num(&self) -> usize {
        self.inner.line_num()
    }

    pub fn writerow(&mut self, record: &T) -> Result<()> {
        let line = self.inner.line_num();
        let value = serde_json::to_value(record).map_err(|e| TableError::Value {
            line,
            message: format!("cannot serialize record: {}", e),
        })?;
        let map = match value {
            Value::Object(map) => map,
            Value::String(_) => {
                return Err(TableError::Value {
                    line,
                    message: "record must have named fields, not be text".to_string(),
                })
            }
            other => {
                return Err(TableError::Value {
                    line,
                    message: format!("record must have named fields, got {}", other),
                })
            }
        };
        let values = ordered_values(self.inner.schema(), &map, line)?;
        self.inner.writerow(&values)
    }

    pub fn writerows<'r, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'r T>,
        T: 'r,
    {
        for record in records {
            self.writerow(record)?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> K {
        self.inner.into_inner()
    }
}

fn ordered_values(schema: &ColumnSchema, row: &KeyedRow, line: usize) -> Result<Vec<Value>> {
    let missing: Vec<String> = schema
        .columns()
        .iter()
        .filter(|c| !row.contains_key(&c.name))
        .map(|c| c.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(TableError::MissingField { line, missing });
    }
    Ok(schema
        .columns()
        .iter()
        .filter_map(|c| row.get(&c.name).cloned())
        .collect())
}

impl ColumnSchema {
    pub fn list_writer<K: RowSink>(
        &self,
        sink: K,
        options: WriterOptions,
    ) -> Result<ListWriter<'_, K>> {
        ListWriter::new(self, sink, options)
    }

    pub fn keyed_writer<K: RowSink>(
        &self,
        sink: K,
        options: WriterOptions,
    ) -> Result<KeyedWriter<'_, K>> {
        KeyedWriter::new(self, sink, options)
    }

    pub fn named_writer<T: Serialize, K: RowSink>(
        &self,
        sink: K,
        options: WriterOptions,
    ) -> Result<NamedWriter<'_, K, T>> {
        NamedWriter::new(self, sink, options)
    }
}
