// src/error.rs
//! Error types for reading GeoNames dumps.

use arrow::error::ArrowError;
use thiserror::Error;

use crate::schema::ColumnType;

/// Everything that can stop a read. Line numbers are 1-based physical lines
/// of the named source.
#[derive(Error, Debug)]
pub enum ReadError {
    /// The input path, archive entry or glob pattern resolved to nothing.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A line did not split into the schema's field count.
    #[error("malformed row at {source_name}:{line}: expected {expected} fields, found {found}")]
    MalformedRow {
        source_name: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A field could not be parsed into its column's declared type.
    #[error(
        "type coercion failed at {source_name}:{line}: column `{column}` expects {expected}, got {value:?}"
    )]
    TypeCoercion {
        source_name: String,
        line: u64,
        column: String,
        value: String,
        expected: ColumnType,
    },

    /// The schema cannot drive a read, or a table does not match the
    /// layout a typed view expects.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("i/o error reading {source_name}: {err}")]
    Io {
        source_name: String,
        #[source]
        err: std::io::Error,
    },

    /// Lower-level failure from the delimited-text scanner (e.g. invalid UTF-8).
    #[error("could not scan {source_name}: {err}")]
    Delimited {
        source_name: String,
        #[source]
        err: csv::Error,
    },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("invalid input pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("could not start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl ReadError {
    /// Source line that triggered the error, for row-level and scan errors.
    pub fn line(&self) -> Option<u64> {
        match self {
            ReadError::MalformedRow { line, .. } | ReadError::TypeCoercion { line, .. } => {
                Some(*line)
            }
            ReadError::Delimited { err, .. } => err.position().map(|pos| pos.line()),
            _ => None,
        }
    }
}
