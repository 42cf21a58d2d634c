//! Utilities for exploring delimited text and drafting column definitions.
//!
//! Each tool works on [`RowSource`](crate::io::RowSource)s and
//! [`RowSink`](crate::io::RowSink)s; [`cli`] holds the plumbing the
//! `tabletext-*` binaries share.

pub mod cli;
pub mod coldef;
pub mod headings;
pub mod strip;
pub mod summary;

pub use coldef::fill_defaults;
pub use headings::{read_headings, write_headings};
pub use strip::strip_fields;
pub use summary::FieldSummary;

use crate::error::{BoxError, TableError};

fn source_error(line: usize) -> impl FnOnce(BoxError) -> TableError {
    move |source| TableError::Source { line, source }
}

fn sink_error(line: usize) -> impl FnOnce(BoxError) -> TableError {
    move |e| TableError::Write {
        line,
        message: e.to_string(),
    }
}
