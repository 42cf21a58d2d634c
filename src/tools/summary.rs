//! Frequency summary of row lengths and of the values in each column.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::{debug, warn};

use super::source_error;
use crate::error::{Result, TableError};
use crate::io::RowSource;

/// Occurrence counts kept in order of first occurrence.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    entries: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, key: &K) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key.clone(), 1));
            }
        }
    }

    /// `(key, count)` pairs, first-seen key first.
    pub fn entries(&self) -> &[(K, usize)] {
        &self.entries
    }

    pub fn get(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Summary of line- and column-oriented text.
///
/// Tracks how many rows have each field count, and for each column
/// position how often each value appears there. Rows may differ in length;
/// column tallies grow as longer rows arrive.
#[derive(Debug, Clone)]
pub struct FieldSummary {
    row_lengths: Tally<usize>,
    columns: Vec<Tally<String>>,
    max_columns: Option<usize>,
    rows: usize,
}

impl FieldSummary {
    pub fn new(max_columns: Option<usize>) -> Self {
        Self {
            row_lengths: Tally::new(),
            columns: Vec::new(),
            max_columns,
            rows: 0,
        }
    }

    /// Count one row. A row longer than `max_columns` is rejected without
    /// being counted.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<()> {
        if let Some(max) = self.max_columns {
            if row.len() > max {
                warn!(row = self.rows, len = row.len(), max, "row exceeds column limit");
                return Err(TableError::RowLength {
                    line: self.rows,
                    expected: max,
                    actual: row.len(),
                });
            }
        }
        self.row_lengths.add(&row.len());
        while self.columns.len() < row.len() {
            self.columns.push(Tally::new());
        }
        for (value, column) in row.iter().zip(self.columns.iter_mut()) {
            column.add(&value.as_ref().to_string());
        }
        self.rows += 1;
        Ok(())
    }

    /// Count every row the source yields, stopping at the first failure.
    pub fn add_rows<R: RowSource>(&mut self, mut source: R) -> Result<()> {
        while let Some(row) = source.next_row() {
            let row = row.map_err(source_error(self.rows))?;
            self.add_row(&row)?;
        }
        debug!(
            rows = self.rows,
            columns = self.columns.len(),
            "summarized rows"
        );
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Rows per field count, in order of first occurrence of each count.
    pub fn row_lengths(&self) -> &Tally<usize> {
        &self.row_lengths
    }

    /// Value counts per column position, leftmost column first.
    pub fn columns(&self) -> &[Tally<String>] {
        &self.columns
    }
}

impl Default for FieldSummary {
    fn default() -> Self {
        Self::new(None)
    }
}
