//! Schema-driven translation between rows of delimited text and typed
//! records.
//!
//! A [`ColumnSchema`] lists columns in order; each column has a heading, an
//! input conversion (text to [`Value`]), an output conversion (`Value` to
//! text) and a unique name. Readers pull rows of text fields from a
//! [`RowSource`](io::RowSource), optionally check the heading line, and
//! yield positional, keyed or named records. Writers do the reverse into a
//! [`RowSink`](io::RowSink).
//!
//! ```no_run
//! use tabletext::{io::csv_source, ColumnSchema, ConversionRegistry, ReaderOptions};
//! use tabletext::schema::read_definitions;
//!
//! # fn main() -> tabletext::Result<()> {
//! let defs = read_definitions(std::fs::File::open("columns.csv")?)?;
//! let schema = ColumnSchema::from_definitions(&defs, &ConversionRegistry::builtin(), None)?;
//! let source = csv_source(std::fs::File::open("data.csv")?);
//! for row in schema.keyed_reader(source, ReaderOptions::default())? {
//!     println!("{:?}", row?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod error;
pub mod io;
pub mod reader;
pub mod schema;
pub mod tools;
pub mod writer;

pub use convert::{ConversionRegistry, InputConversion, OutputConversion, Value};
pub use error::{ConvertError, Result, TableError};
pub use reader::{KeyedReader, KeyedRow, ListReader, NamedReader, ReaderOptions};
pub use schema::{Column, ColumnDef, ColumnSchema, HeadingPolicy};
pub use writer::{KeyedWriter, ListWriter, NamedWriter, WriterOptions};
