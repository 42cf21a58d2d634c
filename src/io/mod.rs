//! Row sources and sinks: the seam between the schema-aware readers and
//! writers and whatever tokenizes lines into fields.
//!
//! A [`RowSource`] yields one field sequence per input line; a [`RowSink`]
//! accepts one field sequence per output line. Implementations are provided
//! for the `csv` crate, for [`delim`] text, and for in-memory rows.

pub mod delim;

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::BoxError;

pub use delim::{DelimReader, DelimWriter};

/// Producer of rows of text fields.
pub trait RowSource {
    /// Next row, `None` once the input is exhausted.
    fn next_row(&mut self) -> Option<Result<Vec<String>, BoxError>>;
}

/// Consumer of rows of text fields, one output line per call.
pub trait RowSink {
    fn write_row(&mut self, fields: &[String]) -> Result<(), BoxError>;

    /// Push buffered output through; a no-op for unbuffered sinks.
    fn flush(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn next_row(&mut self) -> Option<Result<Vec<String>, BoxError>> {
        (**self).next_row()
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn next_row(&mut self) -> Option<Result<Vec<String>, BoxError>> {
        (**self).next_row()
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, fields: &[String]) -> Result<(), BoxError> {
        (**self).write_row(fields)
    }

    fn flush(&mut self) -> Result<(), BoxError> {
        (**self).flush()
    }
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn write_row(&mut self, fields: &[String]) -> Result<(), BoxError> {
        (**self).write_row(fields)
    }

    fn flush(&mut self) -> Result<(), BoxError> {
        (**self).flush()
    }
}

// ─── csv crate ───────────────────────────────────────────────────

/// CSV reader that hands every line to the caller, heading line included,
/// and tolerates rows of differing length.
pub fn csv_source<R: Read>(rdr: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr)
}

/// CSV writer that accepts rows of differing length.
pub fn csv_sink<W: Write>(wtr: W) -> csv::Writer<W> {
    WriterBuilder::new().flexible(true).from_writer(wtr)
}

impl<R: Read> RowSource for csv::Reader<R> {
    fn next_row(&mut self) -> Option<Result<Vec<String>, BoxError>> {
        let mut record = StringRecord::new();
        match self.read_record(&mut record) {
            Ok(true) => Some(Ok(record.iter().map(str::to_string).collect())),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl<W: Write> RowSink for csv::Writer<W> {
    fn write_row(&mut self, fields: &[String]) -> Result<(), BoxError> {
        self.write_record(fields)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BoxError> {
        csv::Writer::flush(self)?;
        Ok(())
    }
}

// ─── in memory ───────────────────────────────────────────────────

/// Source over any iterator of rows, e.g. `Rows::new(vec![vec!["a", "1"]])`.
pub struct Rows<I> {
    iter: I,
}

impl<I> Rows<I> {
    pub fn new<T>(rows: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            iter: rows.into_iter(),
        }
    }
}

impl<I, R> RowSource for Rows<I>
where
    I: Iterator<Item = R>,
    R: IntoIterator,
    R::Item: Into<String>,
{
    fn next_row(&mut self) -> Option<Result<Vec<String>, BoxError>> {
        self.iter
            .next()
            .map(|row| Ok(row.into_iter().map(Into::into).collect()))
    }
}

/// Collects written rows in memory.
impl RowSink for Vec<Vec<String>> {
    fn write_row(&mut self, fields: &[String]) -> Result<(), BoxError> {
        self.push(fields.to_vec());
        Ok(())
    }
}
