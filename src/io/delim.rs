//! Delimited text that is not CSV: a literal separator string, or
//! whitespace runs when no separator is given.

use std::io::{BufRead, Write};

use tracing::trace;

use super::{RowSink, RowSource};
use crate::error::BoxError;

/// Splits each input line into fields.
///
/// With a non-empty delimiter lines are split literally, so consecutive
/// delimiters give empty fields. With no (or an empty) delimiter lines are
/// split on runs of whitespace.
pub struct DelimReader<B> {
    input: B,
    delim: Option<String>,
    line_num: usize,
}

impl<B: BufRead> DelimReader<B> {
    pub fn new(input: B, delim: Option<&str>) -> Self {
        Self {
            input,
            delim: delim.filter(|d| !d.is_empty()).map(str::to_string),
            line_num: 0,
        }
    }

    /// Number of lines read so far.
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    fn split(&self, line: &str) -> Vec<String> {
        match &self.delim {
            Some(d) => line.split(d.as_str()).map(str::to_string).collect(),
            None => line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl<B: BufRead> RowSource for DelimReader<B> {
    fn next_row(&mut self) -> Option<Result<Vec<String>, BoxError>> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                self.line_num += 1;
                let row = self.split(line.trim_end_matches(&['\n', '\r'][..]));
                trace!(line = self.line_num, fields = row.len(), "split delimited line");
                Some(Ok(row))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl<B: BufRead> Iterator for DelimReader<B> {
    type Item = Result<Vec<String>, BoxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }
}

/// Joins fields with a delimiter, one line per row. The delimiter
/// defaults to a single space.
pub struct DelimWriter<W> {
    out: W,
    delim: String,
}

impl<W: Write> DelimWriter<W> {
    pub fn new(out: W, delim: Option<&str>) -> Self {
        Self {
            out,
            delim: delim.filter(|d| !d.is_empty()).unwrap_or(" ").to_string(),
        }
    }

    pub fn writerow<S: AsRef<str>>(&mut self, fields: &[S]) -> std::io::Result<()> {
        let joined = fields
            .iter()
            .map(|f| f.as_ref())
            .collect::<Vec<_>>()
            .join(&self.delim);
        writeln!(self.out, "{}", joined)
    }

    pub fn writerows<I, R, S>(&mut self, rows: I) -> std::io::Result<()>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        for row in rows {
            self.writerow(row.as_ref())?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RowSink for DelimWriter<W> {
    fn write_row(&mut self, fields: &[String]) -> Result<(), BoxError> {
        self.writerow(fields)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BoxError> {
        DelimWriter::flush(self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(text: &str, delim: Option<&str>) -> Vec<Vec<String>> {
        DelimReader::new(Cursor::new(text), delim)
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn literal_delimiter_keeps_empty_fields() {
        let rows = read_all("a\t\tb\r\nc\n", Some("\t"));
        assert_eq!(rows, vec![vec!["a", "", "b"], vec!["c"]]);
    }

    #[test]
    fn missing_delimiter_splits_on_whitespace() {
        assert_eq!(read_all("  a   b\tc \n", None), vec![vec!["a", "b", "c"]]);
        assert_eq!(read_all("a  b\n", Some("")), vec![vec!["a", "b"]]);
    }

    #[test]
    fn line_count_tracks_lines() {
        let mut rdr = DelimReader::new(Cursor::new("1\n2\n3"), Some(","));
        while rdr.next_row().is_some() {}
        assert_eq!(rdr.line_num(), 3);
    }

    #[test]
    fn writer_joins_with_delimiter() {
        let mut w = DelimWriter::new(Vec::new(), Some("|"));
        w.writerows(vec![vec!["a", "b"], vec!["", "c"]]).unwrap();
        assert_eq!(String::from_utf8(w.into_inner()).unwrap(), "a|b\n|c\n");

        let mut w = DelimWriter::new(Vec::new(), None);
        w.writerow(&["x", "y"]).unwrap();
        assert_eq!(String::from_utf8(w.into_inner()).unwrap(), "x y\n");
    }
}
