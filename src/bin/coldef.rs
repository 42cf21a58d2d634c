use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use tabletext::tools::cli::{init_logging, open_input, row_sink, row_source};
use tabletext::tools::fill_defaults;
use tabletext::ConversionRegistry;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Copy column definitions, replacing blank fields by defaults"
)]
struct Args {
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
    let registry = ConversionRegistry::builtin();
    let count = fill_defaults(
        row_source(input, args.indelim.as_deref()),
        row_sink(std::io::stdout(), args.outdelim.as_deref()),
        &registry,
    )
    .context("cannot fill column definitions")?;
    info!(count, "wrote column definitions");
    Ok(())
}
