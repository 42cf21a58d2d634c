//! Plumbing shared by the `tabletext-*` binaries: logging setup and
//! choosing between CSV and delimited text on either side.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::io::{csv_sink, csv_source, DelimReader, DelimWriter, RowSink, RowSource};

/// Log to stderr so stdout carries only data. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// The named file, or stdin when no path is given.
pub fn open_input(path: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
    match path {
        Some(p) => Ok(Box::new(BufReader::new(File::open(p)?))),
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// CSV when `delim` is `None`; otherwise delimited text, where an empty
/// delimiter means runs of whitespace.
pub fn row_source(input: Box<dyn BufRead>, delim: Option<&str>) -> Box<dyn RowSource> {
    match delim {
        None => Box::new(csv_source(input)),
        Some(d) => Box::new(DelimReader::new(input, Some(d))),
    }
}

/// CSV when `delim` is `None`; otherwise delimited text, where an empty
/// delimiter means a single space.
pub fn row_sink<W: Write + 'static>(out: W, delim: Option<&str>) -> Box<dyn RowSink> {
    match delim {
        None => Box::new(csv_sink(out)),
        Some(d) => Box::new(DelimWriter::new(out, Some(d))),
    }
}

/// File suffix matching the output format.
pub fn suffix(delim: Option<&str>) -> &'static str {
    match delim {
        None => ".csv",
        Some(_) => ".txt",
    }
}
