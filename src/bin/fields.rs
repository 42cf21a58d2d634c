use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use tabletext::io::RowSink;
use tabletext::tools::cli::{init_logging, open_input, row_sink, row_source, suffix};
use tabletext::tools::FieldSummary;

const MAX_COLUMNS: usize = 100;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Summarize row lengths and the values found in each column"
)]
struct Args {
    /// Output directory for the summary files
    #[arg(long, default_value = ".")]
    outdir: PathBuf,
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
    let mut summary = FieldSummary::new(Some(MAX_COLUMNS));
    summary
        .add_rows(row_source(input, args.indelim.as_deref()))
        .context("cannot summarize input")?;
    info!(
        rows = summary.row_count(),
        columns = summary.columns().len(),
        "summarized input"
    );

    fs::create_dir_all(&args.outdir)
        .with_context(|| format!("cannot create {}", args.outdir.display()))?;
    let outdelim = args.outdelim.as_deref();
    let suffix = suffix(outdelim);

    let path = args.outdir.join(format!("column_columncounts{}", suffix));
    let rows = summary
        .row_lengths()
        .entries()
        .iter()
        .map(|(len, count)| vec![len.to_string(), count.to_string()]);
    write_table(&path, outdelim, ["Number of columns", "Number of Rows"], rows)?;

    for (n, column) in summary.columns().iter().enumerate() {
        let path = args.outdir.join(format!("column_{:03}{}", n, suffix));
        let rows = column
            .entries()
            .iter()
            .map(|(value, count)| vec![count.to_string(), value.clone()]);
        write_table(&path, outdelim, ["Count", "Column Value"], rows)?;
    }

    info!(dir = %args.outdir.display(), files = summary.columns().len() + 1, "wrote summary");
    Ok(())
}

fn write_table<I>(path: &Path, delim: Option<&str>, heading: [&str; 2], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut sink = row_sink(BufWriter::new(file), delim);
    let heading: Vec<String> = heading.iter().map(|h| h.to_string()).collect();
    sink.write_row(&heading)
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    for row in rows {
        sink.write_row(&row)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    }
    sink.flush()
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    Ok(())
}
