use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use tabletext::tools::cli::{init_logging, open_input, row_sink, row_source};
use tabletext::tools::strip_fields;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Strip leading and trailing spaces from each field of delimited text"
)]
struct Args {
    /// Field delimiter for input and output; empty means whitespace in and
    /// a single space out, absent means CSV
    #[arg(long)]
    delim: Option<String>,
    /// Input file (stdin if omitted)
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let input = open_input(args.file.as_deref()).context("cannot open input")?;
    let delim = args.delim.as_deref();
    let rows = strip_fields(
        row_source(input, delim),
        row_sink(std::io::stdout(), delim),
    )
    .context("cannot strip fields")?;
    info!(rows, "stripped fields");
    Ok(())
}
