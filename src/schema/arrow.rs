// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use std::sync::Arc;

use super::types::{Column, ColumnType, TableSchema};

/// Map a column type into an Arrow DataType.
///
/// - int64   → Int64
/// - int32   → Int32
/// - float64 → Float64
/// - utf8    → Utf8
pub fn map_to_arrow_type(ty: ColumnType) -> DataType {
    match ty {
        ColumnType::Int64 => DataType::Int64,
        ColumnType::Int32 => DataType::Int32,
        ColumnType::Float64 => DataType::Float64,
        ColumnType::Utf8 => DataType::Utf8,
    }
}

/// Build an ArrowSchema (inside an Arc) from a slice of `Column`s, carrying
/// each column's nullability onto its field.
pub fn build_arrow_schema(cols: &[Column]) -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = cols
        .iter()
        .map(|col| ArrowField::new(&col.name, map_to_arrow_type(col.ty), col.nullable))
        .collect();

    Arc::new(ArrowSchema::new(fields))
}

impl TableSchema {
    pub fn to_arrow(&self) -> Arc<ArrowSchema> {
        build_arrow_schema(&self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_schema_keeps_order_types_and_nullability() {
        let schema = TableSchema::new(vec![
            Column::required("geonameid", ColumnType::Int64),
            Column::nullable("latitude", ColumnType::Float64),
            Column::nullable("dem", ColumnType::Int32),
            Column::nullable("elevation", ColumnType::Utf8),
        ]);
        let arrow = schema.to_arrow();

        let names: Vec<&str> = arrow.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["geonameid", "latitude", "dem", "elevation"]);

        assert_eq!(arrow.field(0).data_type(), &DataType::Int64);
        assert!(!arrow.field(0).is_nullable());
        assert_eq!(arrow.field(1).data_type(), &DataType::Float64);
        assert_eq!(arrow.field(2).data_type(), &DataType::Int32);
        assert_eq!(arrow.field(3).data_type(), &DataType::Utf8);
        assert!(arrow.field(3).is_nullable());
    }
}
