// src/reader/mod.rs
//! Schema-validated reader for headerless tab-separated files.

pub mod convert;
pub mod source;

use arrow::{datatypes::SchemaRef, record_batch::RecordBatch};
use csv::ReaderBuilder;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::{fmt, io::Read, str::FromStr, sync::Arc, time::Instant};
use tracing::{debug, info, warn};

use crate::error::ReadError;
use crate::schema::{geonames_schema, TableSchema};
use crate::table::{SkippedRow, Table};
use convert::{line_of, RowChunk};
pub use source::{resolve, Source};

/// What to do with a line whose field count differs from the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRowPolicy {
    /// Fail the whole read on the first malformed line.
    #[default]
    Reject,
    /// Drop the line, log it and record it on the table.
    Skip,
}

impl fmt::Display for MalformedRowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedRowPolicy::Reject => f.write_str("reject"),
            MalformedRowPolicy::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for MalformedRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "strict" => Ok(MalformedRowPolicy::Reject),
            "skip" => Ok(MalformedRowPolicy::Skip),
            other => Err(format!(
                "unknown malformed-row policy `{}` (expected reject or skip)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Rows per Arrow batch.
    pub batch_size: usize,
    /// Worker threads converting batches; `None` uses every core, `Some(1)`
    /// reads strictly sequentially.
    pub threads: Option<usize>,
    pub on_malformed: MalformedRowPolicy,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            batch_size: 8192,
            threads: None,
            on_malformed: MalformedRowPolicy::Reject,
        }
    }
}

/// Reads headerless tab-separated text into Arrow batches according to a
/// fixed positional schema.
pub struct TabularReader {
    schema: TableSchema,
    arrow_schema: SchemaRef,
    options: ReadOptions,
}

impl TabularReader {
    pub fn new(schema: TableSchema, options: ReadOptions) -> Result<Self, ReadError> {
        schema.validate()?;
        let arrow_schema = schema.to_arrow();
        let options = ReadOptions {
            batch_size: options.batch_size.max(1),
            ..options
        };
        Ok(Self {
            schema,
            arrow_schema,
            options,
        })
    }

    /// Reader for the 19-column GeoNames layout.
    pub fn geonames(options: ReadOptions) -> Result<Self, ReadError> {
        Self::new(geonames_schema().clone(), options)
    }

    /// Read every source `input` resolves to (plain file, `.zip` archive or
    /// glob pattern) into one table, in source then line order.
    #[tracing::instrument(level = "info", skip(self), fields(policy = %self.options.on_malformed))]
    pub fn read(&self, input: &str) -> Result<Table, ReadError> {
        let start = Instant::now();
        let sources = resolve(input)?;
        info!(sources = sources.len(), "reading");

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.threads.unwrap_or(0))
            .build()?;

        let mut scan = Scan::new(self, &pool);
        for source in &sources {
            let source_name: Arc<str> = Arc::from(source.to_string());
            source.with_reader(|r| scan.consume(source_name, r))?;
        }
        let table = scan.finish()?;

        info!(
            rows = table.count(),
            skipped = table.skipped().len(),
            elapsed = ?start.elapsed(),
            "read complete"
        );
        Ok(table)
    }

    /// Read from an already-open stream; `source_name` labels errors.
    pub fn read_from<R: Read>(&self, source_name: &str, mut reader: R) -> Result<Table, ReadError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.threads.unwrap_or(0))
            .build()?;
        let mut scan = Scan::new(self, &pool);
        scan.consume(Arc::from(source_name), &mut reader)?;
        scan.finish()
    }
}

/// State of one read pass: the chunk being filled, full chunks waiting for
/// the pool, and converted batches in file order.
struct Scan<'a> {
    reader: &'a TabularReader,
    pool: &'a ThreadPool,
    pending: Vec<RowChunk>,
    batches: Vec<RecordBatch>,
    skipped: Vec<SkippedRow>,
}

impl<'a> Scan<'a> {
    fn new(reader: &'a TabularReader, pool: &'a ThreadPool) -> Self {
        Self {
            reader,
            pool,
            pending: Vec::new(),
            batches: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn consume(&mut self, source_name: Arc<str>, input: &mut dyn Read) -> Result<(), ReadError> {
        let batch_size = self.reader.options.batch_size;
        let expected = self.reader.schema.len();

        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true) // field counts are checked here, per line
            .quoting(false)
            .from_reader(input);

        let mut chunk = RowChunk::new(Arc::clone(&source_name), batch_size);
        for result in rdr.records() {
            let record = result.map_err(|err| ReadError::Delimited {
                source_name: source_name.to_string(),
                err,
            })?;

            if record.len() != expected {
                let line = line_of(&record);
                match self.reader.options.on_malformed {
                    MalformedRowPolicy::Reject => {
                        // earlier lines may hold an earlier error
                        if !chunk.is_empty() {
                            self.pending.push(chunk);
                        }
                        self.flush()?;
                        return Err(ReadError::MalformedRow {
                            source_name: source_name.to_string(),
                            line,
                            expected,
                            found: record.len(),
                        });
                    }
                    MalformedRowPolicy::Skip => {
                        warn!(
                            source = %source_name,
                            line,
                            expected,
                            found = record.len(),
                            "skipping malformed row"
                        );
                        self.skipped.push(SkippedRow {
                            source_name: source_name.to_string(),
                            line,
                            found: record.len(),
                        });
                        continue;
                    }
                }
            }

            chunk.rows.push(record);
            if chunk.len() >= batch_size {
                let full = std::mem::replace(
                    &mut chunk,
                    RowChunk::new(Arc::clone(&source_name), batch_size),
                );
                self.pending.push(full);
                if self.pending.len() >= self.pool.current_num_threads() {
                    self.flush()?;
                }
            }
        }

        if !chunk.is_empty() {
            self.pending.push(chunk);
        }
        self.flush()
    }

    /// Convert queued chunks on the pool. Results come back in queue order,
    /// and the first failing chunk in that order wins.
    fn flush(&mut self) -> Result<(), ReadError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.pending);
        let schema = &self.reader.schema;
        let arrow_schema = &self.reader.arrow_schema;

        let converted: Vec<Result<RecordBatch, ReadError>> = self.pool.install(|| {
            pending
                .par_iter()
                .map(|chunk| chunk.to_batch(schema, arrow_schema))
                .collect()
        });

        let before = self.batches.len();
        for result in converted {
            self.batches.push(result?);
        }
        debug!(
            chunks = self.batches.len() - before,
            total_batches = self.batches.len(),
            "converted chunks"
        );
        Ok(())
    }

    fn finish(mut self) -> Result<Table, ReadError> {
        self.flush()?;
        Ok(Table::new(
            Arc::clone(&self.reader.arrow_schema),
            self.batches,
            self.skipped,
        ))
    }
}
