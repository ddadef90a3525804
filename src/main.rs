// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use geonames_loader::{
    display::{render, OutputFormat},
    schema::{geonames_schema, load_schema_file, GEONAMES_COLUMN_COUNT},
    MalformedRowPolicy, ReadOptions, TabularReader,
};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Load a GeoNames dump and print a preview plus the record count"
)]
struct Args {
    /// Tab-separated GeoNames file, `.zip` archive, or glob pattern
    #[arg(env = "GEONAMES_PATH", default_value = "extracted/allCountries.txt")]
    path: String,

    /// Number of records to preview
    #[arg(short = 'n', long, default_value_t = 5)]
    rows: usize,

    /// Preview layout: table, vertical or json
    #[arg(long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Cut vertical values to this many characters (0 = never)
    #[arg(long, default_value_t = 0)]
    truncate: usize,

    /// Lines with the wrong field count: reject or skip
    #[arg(long, default_value_t = MalformedRowPolicy::Reject)]
    on_malformed: MalformedRowPolicy,

    /// Rows per Arrow batch
    #[arg(long, default_value_t = 8192)]
    batch_size: usize,

    /// Worker threads (default: all cores; 1 reads sequentially)
    #[arg(long)]
    threads: Option<usize>,

    /// YAML or JSON schema overriding the built-in GeoNames layout
    #[arg(long)]
    schema: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    let args = Args::parse();
    info!(path = %args.path, "startup");

    // ─── 2) schema ───────────────────────────────────────────────────
    let schema = match &args.schema {
        Some(path) => load_schema_file(path)?,
        None => geonames_schema().clone(),
    };
    if schema.len() != GEONAMES_COLUMN_COUNT {
        warn!(
            columns = schema.len(),
            geonames = GEONAMES_COLUMN_COUNT,
            "schema does not match the GeoNames layout"
        );
    }

    // ─── 3) read ─────────────────────────────────────────────────────
    let options = ReadOptions {
        batch_size: args.batch_size,
        threads: args.threads,
        on_malformed: args.on_malformed,
    };
    let reader = TabularReader::new(schema, options)?;
    let table = reader
        .read(&args.path)
        .inspect_err(|err| {
            if let Some(line) = err.line() {
                error!(path = %args.path, line, "read failed");
            }
        })
        .with_context(|| format!("reading {}", args.path))?;
    info!(
        columns = table.schema().fields().len(),
        batches = table.batches().len(),
        "loaded"
    );

    // ─── 4) show ─────────────────────────────────────────────────────
    let preview = table.preview(args.rows);
    println!(
        "--- First {} rows of {} (GeoNames data) ---",
        args.rows.min(table.count()),
        args.path
    );
    print!("{}", render(&preview, args.format, args.truncate)?);
    if args.format == OutputFormat::Table {
        println!();
    }
    println!("\nTotal records: {}", table.count());

    if !table.skipped().is_empty() {
        warn!(skipped = table.skipped().len(), "malformed rows were skipped");
        println!("Skipped malformed rows: {}", table.skipped().len());
    }

    Ok(())
}
