use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs::File;
use std::io::{BufReader, Cursor, Write};
use tempfile::NamedTempFile;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tabletext::convert::{integer, literal, nullable_text, text, to_literal, to_text};
use tabletext::io::{csv_sink, csv_source, DelimReader, DelimWriter, Rows};
use tabletext::schema::read_definitions;
use tabletext::{
    Column, ColumnSchema, ConversionRegistry, HeadingPolicy, ReaderOptions, TableError, Value,
    WriterOptions,
};

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tabletext=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

const DEFINITIONS: &str = "\
String,text,text,string_v
Nullable String,nullable_text,text,nullable_string
Integer,integer,text,integer_v
List,literal,literal,list_v
";

fn schema() -> Result<ColumnSchema> {
    let defs = read_definitions(Cursor::new(DEFINITIONS))?;
    Ok(ColumnSchema::from_definitions(
        &defs,
        &ConversionRegistry::builtin(),
        None,
    )?)
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Record {
    string_v: String,
    nullable_string: Option<String>,
    integer_v: Option<i64>,
    list_v: Option<Vec<i64>>,
}

#[test]
fn csv_file_round_trip_through_named_records() -> Result<()> {
    init_test_logging();
    let schema = schema()?;
    let records = vec![
        Record {
            string_v: "plain".into(),
            nullable_string: None,
            integer_v: Some(-12),
            list_v: Some(vec![1, 2, 3]),
        },
        Record {
            string_v: "with, comma".into(),
            nullable_string: Some("x".into()),
            integer_v: None,
            list_v: None,
        },
    ];

    let mut file = NamedTempFile::new()?;
    {
        let mut writer = schema.named_writer::<Record, _>(csv_sink(file.as_file_mut()), WriterOptions::default())?;
        writer.writerows(&records)?;
        assert_eq!(writer.line_num(), 3);
        writer.into_inner().flush()?;
    }

    let source = csv_source(BufReader::new(File::open(file.path())?));
    let mut reader = schema.named_reader::<Record, _>(source, ReaderOptions::default())?;
    let read: Vec<Record> = reader.by_ref().collect::<tabletext::Result<_>>()?;
    assert_eq!(read, records);
    assert_eq!(reader.line_num(), 3);
    Ok(())
}

#[test]
fn inverse_conversions_reproduce_values() -> Result<()> {
    let schema = schema()?;
    let row = vec![json!("a"), json!("b"), json!(42), json!([1, [2, 3]])];

    let mut writer = schema.list_writer(Vec::<Vec<String>>::new(), WriterOptions::default().heading_policy(HeadingPolicy::NoHeading))?;
    writer.writerow(&row)?;
    let written = writer.into_inner();

    let opts = ReaderOptions::default().heading_policy(HeadingPolicy::NoHeading);
    let read: Vec<Vec<Value>> = schema
        .list_reader(Rows::new(written), opts)?
        .collect::<tabletext::Result<_>>()?;
    assert_eq!(read, vec![row]);
    Ok(())
}

#[test]
fn nullable_text_reads_and_writes_back() -> Result<()> {
    let schema = ColumnSchema::new(
        vec![
            Column::new("String", text(), to_text(), "string_v"),
            Column::new("Nullable", nullable_text(), to_text(), "nullable_string"),
        ],
        Some(HeadingPolicy::HeadingNoCheck),
    )?;

    let mut reader = schema.list_reader(Rows::new(vec![vec!["whatever", "heads"], vec!["a", ""]]), ReaderOptions::default())?;
    let row = reader.next().unwrap()?;
    assert_eq!(row, vec![json!("a"), Value::Null]);

    let mut writer = schema.list_writer(Vec::<Vec<String>>::new(), WriterOptions::default())?;
    writer.writerow(&row)?;
    assert_eq!(writer.into_inner()[1], vec!["a", ""]);
    Ok(())
}

#[test]
fn easy_check_tolerates_whitespace_exact_check_does_not() -> Result<()> {
    let schema = schema()?;
    let text = "  String ,Nullable   String,Integer,List\nx,,1,[]\n";

    let easy = schema.with_heading_policy(HeadingPolicy::HeadingEasyCheck);
    let rows: Vec<_> = easy
        .keyed_reader(csv_source(Cursor::new(text)), ReaderOptions::default())?
        .collect::<tabletext::Result<Vec<_>>>()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["integer_v"], json!(1));

    let exact = schema.keyed_reader(csv_source(Cursor::new(text)), ReaderOptions::default());
    assert!(matches!(exact.err(), Some(TableError::HeadingMismatch { line: 0, .. })));
    Ok(())
}

#[test]
fn short_rows_fail_unless_allowed() -> Result<()> {
    let schema = schema()?;
    let text = "String Nullable\na\n";
    let opts = ReaderOptions::default().heading_policy(HeadingPolicy::HeadingNoCheck);

    let mut strict = schema.list_reader(DelimReader::new(Cursor::new(text), None), opts)?;
    assert!(matches!(
        strict.next(),
        Some(Err(TableError::RowLength { line: 1, expected: 4, actual: 1 }))
    ));

    let mut lenient = schema.list_reader(DelimReader::new(Cursor::new(text), None), opts.short_rows(true))?;
    assert_eq!(
        lenient.next().unwrap()?,
        vec![json!("a"), Value::Null, Value::Null, Value::Null]
    );
    Ok(())
}

#[test]
fn delimited_text_round_trip() -> Result<()> {
    let schema = schema()?;
    let mut writer = schema.list_writer(DelimWriter::new(Vec::<u8>::new(), Some("\t")), WriterOptions::default())?;
    writer.writerow(&[json!("a b"), Value::Null, json!(7), json!(["x"])])?;
    let out = writer.into_inner().into_inner();
    assert_eq!(
        String::from_utf8(out.clone())?,
        "String\tNullable String\tInteger\tList\na b\t\t7\t[\"x\"]\n"
    );

    let rows: Vec<_> = schema
        .list_reader(DelimReader::new(Cursor::new(out), Some("\t")), ReaderOptions::default())?
        .collect::<tabletext::Result<Vec<_>>>()?;
    assert_eq!(rows, vec![vec![json!("a b"), Value::Null, json!(7), json!(["x"])]]);
    Ok(())
}

#[test]
fn schema_algebra_properties() -> Result<()> {
    let s = schema()?;

    let same = s.select(s.names())?;
    assert_eq!(same.names(), s.names());
    assert_eq!(same.headings(), s.headings());
    assert_eq!(same.definitions(), s.definitions());

    let extra = ColumnSchema::new(
        vec![
            Column::new("Extra", integer(), to_text(), "extra"),
            Column::new("More", literal(), to_literal(), "more"),
        ],
        None,
    )?;
    let joined = s.append(&extra)?;
    let mut expected = s.names();
    expected.extend(extra.names());
    assert_eq!(joined.names(), expected);

    let clash = ColumnSchema::new(vec![Column::new("Int", integer(), to_text(), "integer_v")], None)?;
    assert!(matches!(s.append(&clash), Err(TableError::DuplicateName(_))));
    assert_eq!(s.len(), 4);

    assert!(matches!(s.remove(["x"]), Err(TableError::NotFound(_))));

    let abc = ColumnSchema::new(
        vec![
            Column::new("A", text(), to_text(), "a"),
            Column::new("B", text(), to_text(), "other"),
            Column::new("C", text(), to_text(), "b"),
        ],
        None,
    )?;
    assert!(matches!(abc.rename([("a", "b")]), Err(TableError::DuplicateName(_))));
    Ok(())
}

#[test]
fn definitions_file_builds_schema() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(DEFINITIONS.as_bytes())?;
    let defs = read_definitions(File::open(file.path())?)?;
    let schema = ColumnSchema::from_definitions(&defs, &ConversionRegistry::builtin(), None)?;
    assert_eq!(
        schema.names(),
        vec!["string_v", "nullable_string", "integer_v", "list_v"]
    );
    assert_eq!(schema.heading_policy(), HeadingPolicy::HeadingExactCheck);
    Ok(())
}
