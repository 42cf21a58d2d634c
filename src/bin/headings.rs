use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use tabletext::tools::cli::{init_logging, open_input, row_sink, row_source};
use tabletext::tools::{read_headings, write_headings};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Extract the first line of delimited text as a list of headings"
)]
struct Args {
    /// Write bare headings, one per line, without numbering
    #[arg(long)]
    noenum: bool,
    /// Input field delimiter; empty means runs of whitespace, absent means CSV
    #[arg(long)]
    indelim: Option<String>,
    /// Output field delimiter; empty means a single space, absent means CSV
    #[arg(long)]
    outdelim: Option<String>,
    /// Input file (stdin if omitted)
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let input = open_input(args.file.as_deref()).context("cannot open input")?;
    let headings = read_headings(row_source(input, args.indelim.as_deref()))
        .context("cannot read headings")?;
    info!(count = headings.len(), "read headings");

    let sink = row_sink(std::io::stdout(), args.outdelim.as_deref());
    write_headings(&headings, sink, !args.noenum).context("cannot write headings")?;
    Ok(())
}
