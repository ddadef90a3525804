// src/reader/convert.rs

use arrow::{
    array::{ArrayRef, Float64Builder, Int32Builder, Int64Builder, StringBuilder},
    datatypes::SchemaRef,
    record_batch::RecordBatch,
};
use csv::StringRecord;
use std::sync::Arc;

use crate::error::ReadError;
use crate::schema::{Column, ColumnType, TableSchema};

/// Field value rejected by a column builder.
struct Rejected;

/// Typed Arrow builder for one column of a chunk.
enum ColumnBuilder {
    Int64(Int64Builder),
    Int32(Int32Builder),
    Float64(Float64Builder),
    Utf8(StringBuilder),
}

impl ColumnBuilder {
    fn new(ty: ColumnType, capacity: usize) -> Self {
        match ty {
            ColumnType::Int64 => ColumnBuilder::Int64(Int64Builder::with_capacity(capacity)),
            ColumnType::Int32 => ColumnBuilder::Int32(Int32Builder::with_capacity(capacity)),
            ColumnType::Float64 => ColumnBuilder::Float64(Float64Builder::with_capacity(capacity)),
            ColumnType::Utf8 => {
                ColumnBuilder::Utf8(StringBuilder::with_capacity(capacity, capacity * 16))
            }
        }
    }

    /// Numbers are parsed after trimming; empty means null when the column
    /// allows it. Text is kept verbatim, empty text is null when nullable.
    fn append(&mut self, raw: &str, column: &Column) -> Result<(), Rejected> {
        match self {
            ColumnBuilder::Int64(b) => b.append_option(parse_numeric::<i64>(raw, column)?),
            ColumnBuilder::Int32(b) => b.append_option(parse_numeric::<i32>(raw, column)?),
            ColumnBuilder::Float64(b) => b.append_option(parse_numeric::<f64>(raw, column)?),
            ColumnBuilder::Utf8(b) => {
                if raw.is_empty() && column.nullable {
                    b.append_null();
                } else {
                    b.append_value(raw);
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnBuilder::Int64(b) => Arc::new(b.finish()),
            ColumnBuilder::Int32(b) => Arc::new(b.finish()),
            ColumnBuilder::Float64(b) => Arc::new(b.finish()),
            ColumnBuilder::Utf8(b) => Arc::new(b.finish()),
        }
    }
}

fn parse_numeric<T: std::str::FromStr>(raw: &str, column: &Column) -> Result<Option<T>, Rejected> {
    let v = raw.trim();
    if v.is_empty() {
        return if column.nullable { Ok(None) } else { Err(Rejected) };
    }
    v.parse::<T>().map(Some).map_err(|_| Rejected)
}

/// Rows of one source waiting to become a record batch. Every row already
/// has the schema's field count.
pub(crate) struct RowChunk {
    pub source_name: Arc<str>,
    pub rows: Vec<StringRecord>,
}

impl RowChunk {
    pub fn new(source_name: Arc<str>, capacity: usize) -> Self {
        Self {
            source_name,
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert the chunk into a batch of `arrow_schema`. The first field that
    /// fails coercion, in row order, is reported with its line.
    pub fn to_batch(
        &self,
        schema: &TableSchema,
        arrow_schema: &SchemaRef,
    ) -> Result<RecordBatch, ReadError> {
        let mut builders: Vec<ColumnBuilder> = schema
            .columns
            .iter()
            .map(|c| ColumnBuilder::new(c.ty, self.rows.len()))
            .collect();

        for record in &self.rows {
            for ((raw, column), builder) in record
                .iter()
                .zip(&schema.columns)
                .zip(builders.iter_mut())
            {
                if builder.append(raw, column).is_err() {
                    return Err(ReadError::TypeCoercion {
                        source_name: self.source_name.to_string(),
                        line: line_of(record),
                        column: column.name.clone(),
                        value: raw.to_string(),
                        expected: column.ty,
                    });
                }
            }
        }

        let columns: Vec<ArrayRef> = builders.iter_mut().map(ColumnBuilder::finish).collect();
        RecordBatch::try_new(Arc::clone(arrow_schema), columns).map_err(Into::into)
    }
}

pub(crate) fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}
