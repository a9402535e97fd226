//! blockdex - HTML to search-index records

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use blockdex::{Extractor, Options, Record};

#[derive(Parser)]
#[command(name = "blockdex")]
#[command(version, about = "Split HTML documents into search-index records", long_about = None)]
#[command(after_help = "EXAMPLES:
    blockdex page.html                      Records of one page as a JSON array
    blockdex -s 'article p' -x script a.html b.html
                                            One JSON line per page
    blockdex -c options.json --pretty page.html")]
struct Cli {
    /// HTML files to extract
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// CSS selector of the content blocks (default: p)
    #[arg(short, long, value_name = "CSS")]
    selector: Option<String>,

    /// Tag to strip from every block (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "TAG")]
    exclude: Vec<String>,

    /// JSON options file ({"cssSelector": ..., "tagsToExclude": ...})
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output (single input only; several inputs always
    /// print one JSON object per line)
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct FileRecords<'a> {
    file: &'a Path,
    records: &'a [Record],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn options(cli: &Cli) -> blockdex::Result<Options> {
    let mut options = match &cli.config {
        Some(path) => Options::from_file(path)?,
        None => Options::default(),
    };
    if let Some(selector) = &cli.selector {
        options.css_selector = selector.clone();
    }
    options.tags_to_exclude.extend(cli.exclude.iter().cloned());
    Ok(options)
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = options(cli).map_err(|e| e.to_string())?;
    // Fail on a bad selector before reading any input
    Extractor::new(&options).map_err(|e| e.to_string())?;

    let results: Vec<blockdex::Result<Vec<Record>>> = cli
        .inputs
        .par_iter()
        .map(|path| {
            let extractor = Extractor::new(&options)?;
            let html = blockdex::input::read_document(path)?;
            let records = extractor.extract(&html).into_records();
            debug!(file = %path.display(), records = records.len(), "extracted");
            Ok(records)
        })
        .collect();

    let stdout = io::stdout();
    write_output(&mut stdout.lock(), &cli.inputs, &results, cli.pretty)
}

/// One input prints a JSON array. Several inputs print one `{file, records}`
/// object per line; `pretty` is ignored there so every line stays a document.
fn write_output<W: Write>(
    out: &mut W,
    inputs: &[PathBuf],
    results: &[blockdex::Result<Vec<Record>>],
    pretty: bool,
) -> Result<(), String> {
    if let ([path], [single]) = (inputs, results) {
        let records = single.as_ref().map_err(|e| format!("{}: {e}", path.display()))?;
        return write_json(out, &records, pretty);
    }

    for (path, result) in inputs.iter().zip(results) {
        let records = result
            .as_ref()
            .map_err(|e| format!("{}: {e}", path.display()))?;
        write_json(out, &FileRecords { file: path, records }, false)?;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<(), String> {
    let written = if pretty {
        serde_json::to_writer_pretty(&mut *out, value)
    } else {
        serde_json::to_writer(&mut *out, value)
    };
    written.map_err(|e| e.to_string())?;
    writeln!(out).map_err(|e| e.to_string())
}
