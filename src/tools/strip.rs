use tracing::debug;

use super::{sink_error, source_error};
use crate::error::Result;
use crate::io::{RowSink, RowSource};

/// Copy rows from `source` to `sink`, trimming leading and trailing
/// whitespace from every field. Returns the number of rows copied.
pub fn strip_fields<S: RowSource, K: RowSink>(mut source: S, mut sink: K) -> Result<usize> {
    let mut line = 0;
    while let Some(row) = source.next_row() {
        let row = row.map_err(source_error(line))?;
        let stripped: Vec<String> = row.iter().map(|f| f.trim().to_string()).collect();
        sink.write_row(&stripped).map_err(sink_error(line))?;
        line += 1;
    }
    sink.flush().map_err(sink_error(line))?;
    debug!(rows = line, "stripped fields");
    Ok(line)
}
