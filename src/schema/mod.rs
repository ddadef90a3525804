// src/schema/mod.rs

pub mod arrow;
pub mod geonames;
pub mod load;
pub mod types;

pub use self::arrow::{build_arrow_schema, map_to_arrow_type};
pub use geonames::{geonames_schema, GEONAMES_COLUMN_COUNT};
pub use load::load_schema_file;
pub use types::{Column, ColumnType, TableSchema};
