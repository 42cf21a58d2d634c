//! Extract the first line of delimited text as column headings.

use super::{sink_error, source_error};
use crate::error::Result;
use crate::io::{RowSink, RowSource};

/// First row of the source, or an empty list when there is none. Headings
/// may be empty strings.
pub fn read_headings<S: RowSource>(mut source: S) -> Result<Vec<String>> {
    match source.next_row() {
        Some(row) => row.map_err(source_error(0)),
        None => Ok(Vec::new()),
    }
}

/// Write one heading per line. Enumerated output starts with a
/// `Column,Heading` line and numbers headings from 0.
pub fn write_headings<K: RowSink>(headings: &[String], mut sink: K, enumerate: bool) -> Result<()> {
    let mut line = 0;
    if enumerate {
        sink.write_row(&["Column".to_string(), "Heading".to_string()])
            .map_err(sink_error(line))?;
        line += 1;
    }
    for (n, heading) in headings.iter().enumerate() {
        let row = if enumerate {
            vec![n.to_string(), heading.clone()]
        } else {
            vec![heading.clone()]
        };
        sink.write_row(&row).map_err(sink_error(line))?;
        line += 1;
    }
    sink.flush().map_err(sink_error(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{csv_source, Rows};
    use std::io::Cursor;

    #[test]
    fn first_row_or_nothing() {
        let heads = read_headings(csv_source(Cursor::new("A, B ,\n1,2,3\n"))).unwrap();
        assert_eq!(heads, vec!["A", " B ", ""]);
        let heads = read_headings(Rows::new(Vec::<Vec<String>>::new())).unwrap();
        assert!(heads.is_empty());
    }

    #[test]
    fn enumerated_and_bare_output() {
        let heads = vec!["Name".to_string(), "Age".to_string()];

        let mut out: Vec<Vec<String>> = Vec::new();
        write_headings(&heads, &mut out, true).unwrap();
        assert_eq!(
            out,
            vec![vec!["Column", "Heading"], vec!["0", "Name"], vec!["1", "Age"]]
        );

        let mut out: Vec<Vec<String>> = Vec::new();
        write_headings(&heads, &mut out, false).unwrap();
        assert_eq!(out, vec![vec!["Name"], vec!["Age"]]);
    }
}
