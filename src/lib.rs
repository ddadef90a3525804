// src/lib.rs
//! Load GeoNames gazetteer dumps (tab-separated, headerless, 19 columns)
//! into Arrow record batches against a fixed positional schema.

pub mod display;
pub mod error;
pub mod reader;
pub mod record;
pub mod schema;
pub mod table;

pub use error::ReadError;
pub use reader::{MalformedRowPolicy, ReadOptions, TabularReader};
pub use record::GeoName;
pub use schema::{geonames_schema, Column, ColumnType, TableSchema};
pub use table::{SkippedRow, Table};
