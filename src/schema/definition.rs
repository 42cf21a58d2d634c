//! Text column definitions: `(heading, input, output, name)` per column.
//!
//! Conversions are referenced by name and resolved against a
//! [`ConversionRegistry`]; nothing is compiled from the text.

use std::io::Read;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Column, ColumnSchema, HeadingPolicy};
use crate::convert::ConversionRegistry;
use crate::error::{Result, TableError};

/// One column definition as written in a definition file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct ColumnDef {
    pub heading: String,
    pub input: String,
    pub output: String,
    pub name: String,
}

impl ColumnDef {
    pub fn new(heading: &str, input: &str, output: &str, name: &str) -> Self {
        Self {
            heading: heading.to_string(),
            input: input.to_string(),
            output: output.to_string(),
            name: name.to_string(),
        }
    }

    /// Build from the fields of one definition row; extra fields are ignored.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() < 4 {
            return Err(TableError::schema(format!(
                "less than 4 items in column description: {:?}",
                fields.iter().map(|f| f.as_ref()).collect::<Vec<_>>()
            )));
        }
        Ok(Self::new(
            fields[0].as_ref(),
            fields[1].as_ref(),
            fields[2].as_ref(),
            fields[3].as_ref(),
        ))
    }

    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.heading.clone(),
            self.input.clone(),
            self.output.clone(),
            self.name.clone(),
        ]
    }

    fn resolve(&self, registry: &ConversionRegistry) -> Result<Column> {
        let input = registry.input(&self.input).ok_or_else(|| {
            TableError::schema(format!(
                "column {:?}: unknown input conversion {:?}",
                self.name, self.input
            ))
        })?;
        let output = registry.output(&self.output).ok_or_else(|| {
            TableError::schema(format!(
                "column {:?}: unknown output conversion {:?}",
                self.name, self.output
            ))
        })?;
        Ok(Column::new(
            self.heading.clone(),
            input.clone(),
            output.clone(),
            self.name.clone(),
        ))
    }
}

/// Parse definition rows from CSV text (no heading line).
pub fn read_definitions<R: Read>(rdr: R) -> Result<Vec<ColumnDef>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let mut defs = Vec::new();
    for result in csv.records() {
        let record = result?;
        let fields: Vec<&str> = record.iter().collect();
        defs.push(ColumnDef::from_fields(&fields)?);
    }
    debug!(count = defs.len(), "read column definitions");
    Ok(defs)
}

impl ColumnSchema {
    /// Build a schema from text definitions, resolving conversion names in
    /// `registry`.
    pub fn from_definitions(
        defs: &[ColumnDef],
        registry: &ConversionRegistry,
        policy: Option<HeadingPolicy>,
    ) -> Result<Self> {
        let columns = defs
            .iter()
            .map(|d| d.resolve(registry))
            .collect::<Result<Vec<_>>>()?;
        ColumnSchema::new(columns, policy)
    }

    /// Text definitions describing this schema.
    pub fn definitions(&self) -> Vec<ColumnDef> {
        self.columns()
            .iter()
            .map(|c| ColumnDef::new(&c.heading, c.input.label(), c.output.label(), &c.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DEFS: &str = "\
String,text,text,string_v
Nullable String,nullable_text,text,nullable_string
Integer,integer,text,integer_v
List,literal,literal,list_v
";

    #[test]
    fn schema_from_csv_definitions() {
        let defs = read_definitions(Cursor::new(DEFS)).unwrap();
        assert_eq!(defs.len(), 4);
        assert_eq!(defs[1], ColumnDef::new("Nullable String", "nullable_text", "text", "nullable_string"));

        let schema =
            ColumnSchema::from_definitions(&defs, &ConversionRegistry::builtin(), None).unwrap();
        assert_eq!(
            schema.names(),
            vec!["string_v", "nullable_string", "integer_v", "list_v"]
        );
        assert_eq!(schema.heading("list_v").unwrap(), "List");
        assert_eq!(schema.definitions(), defs);
    }

    #[test]
    fn short_definition_row_is_schema_error() {
        let err = read_definitions(Cursor::new("Heading,text,text\n")).unwrap_err();
        assert!(matches!(err, TableError::Schema(_)));
    }

    #[test]
    fn unknown_conversion_is_schema_error() {
        let defs = vec![ColumnDef::new("A", "eval", "text", "a")];
        let err =
            ColumnSchema::from_definitions(&defs, &ConversionRegistry::builtin(), None).unwrap_err();
        assert!(err.to_string().contains("unknown input conversion"));
    }

    #[test]
    fn invalid_and_duplicate_names_fail() {
        let reg = ConversionRegistry::builtin();
        let bad = vec![ColumnDef::new("A", "text", "text", "a_")];
        assert!(matches!(
            ColumnSchema::from_definitions(&bad, &reg, None),
            Err(TableError::Schema(_))
        ));
        let dup = vec![
            ColumnDef::new("A", "text", "text", "a"),
            ColumnDef::new("B", "text", "text", "a"),
        ];
        assert!(matches!(
            ColumnSchema::from_definitions(&dup, &reg, None),
            Err(TableError::Schema(_))
        ));
    }
}
