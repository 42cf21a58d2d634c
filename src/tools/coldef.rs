//! Draft column definitions from partial ones.
//!
//! Each input row is `heading[, input[, output[, name]]]`. Missing or blank
//! fields are filled in, so a bare list of headings (one per line) becomes
//! a usable definition file that can be edited by hand.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::{sink_error, source_error};
use crate::convert::ConversionRegistry;
use crate::error::{Result, TableError};
use crate::io::{RowSink, RowSource};
use crate::schema::{column_name_from_heading, is_valid_column_name, ColumnDef};

pub const DEFAULT_INPUT: &str = "nullable_text";
pub const DEFAULT_OUTPUT: &str = "text";

/// Copy definitions from `source` to `sink` with blanks replaced by
/// defaults.
///
/// Blank input and output conversions become [`DEFAULT_INPUT`] and
/// [`DEFAULT_OUTPUT`]; every conversion named must exist in `registry`.
/// A blank name is generated from the heading, or `column_<n>` (n = rows
/// so far) when that fails or collides. Explicit names must be valid and
/// unique. Returns the number of definitions written.
pub fn fill_defaults<S, K>(mut source: S, mut sink: K, registry: &ConversionRegistry) -> Result<usize>
where
    S: RowSource,
    K: RowSink,
{
    let mut names: HashSet<String> = HashSet::new();
    let mut line = 0;

    while let Some(row) = source.next_row() {
        let row = row.map_err(source_error(line))?;
        let def = fill_row(&row, &names, registry)
            .map_err(|e| TableError::schema(format!("input line {} {:?}: {}", line, row, e)))?;
        trace!(line, name = %def.name, "filled definition");
        names.insert(def.name.clone());
        sink.write_row(&def.to_fields()).map_err(sink_error(line))?;
        line += 1;
    }
    sink.flush().map_err(sink_error(line))?;
    debug!(definitions = line, "filled column definitions");
    Ok(line)
}

fn fill_row(row: &[String], names: &HashSet<String>, registry: &ConversionRegistry) -> Result<ColumnDef> {
    let field = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
    let heading = field(0);

    let input = match field(1) {
        "" => DEFAULT_INPUT,
        s => s,
    };
    if registry.input(input).is_none() {
        return Err(TableError::schema(format!("unknown input conversion {:?}", input)));
    }
    let output = match field(2) {
        "" => DEFAULT_OUTPUT,
        s => s,
    };
    if registry.output(output).is_none() {
        return Err(TableError::schema(format!("unknown output conversion {:?}", output)));
    }

    let name = match field(3) {
        "" => {
            let fallback = format!("column_{}", names.len());
            match column_name_from_heading(heading) {
                Ok(name) if !names.contains(&name) => name,
                _ => fallback,
            }
        }
        s if !is_valid_column_name(s) => {
            return Err(TableError::schema(format!("invalid column name {:?}", s)))
        }
        s => s.to_string(),
    };
    if names.contains(&name) {
        return Err(TableError::duplicate(name));
    }

    Ok(ColumnDef::new(heading, input, output, &name))
}
