// src/table.rs

use arrow::{datatypes::SchemaRef, record_batch::RecordBatch};

use crate::error::ReadError;
use crate::record::GeoName;

/// A line dropped under the skip policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub source_name: String,
    pub line: u64,
    pub found: usize,
}

/// Immutable result of one read pass: record batches in file order.
#[derive(Debug, Clone)]
pub struct Table {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    row_count: usize,
    skipped: Vec<SkippedRow>,
}

impl Table {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>, skipped: Vec<SkippedRow>) -> Self {
        let row_count = batches.iter().map(RecordBatch::num_rows).sum();
        Self {
            schema,
            batches,
            row_count,
            skipped,
        }
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total rows loaded. Skipped lines are not counted.
    pub fn count(&self) -> usize {
        self.row_count
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// First `n` rows in file order, as zero-copy slices of the stored
    /// batches. Never longer than `count()`.
    pub fn preview(&self, n: usize) -> Vec<RecordBatch> {
        let mut remaining = n;
        let mut out = Vec::new();
        for batch in &self.batches {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(batch.num_rows());
            if take > 0 {
                out.push(batch.slice(0, take));
            }
            remaining -= take;
        }
        out
    }

    /// First `n` rows as typed GeoNames records.
    pub fn preview_records(&self, n: usize) -> Result<Vec<GeoName>, ReadError> {
        GeoName::from_batches(&self.preview(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn table(sizes: &[i64]) -> Table {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let mut next = 0;
        let batches = sizes
            .iter()
            .map(|&size| {
                let ids: Vec<i64> = (next..next + size).collect();
                next += size;
                let col: ArrayRef = Arc::new(Int64Array::from(ids));
                RecordBatch::try_new(schema.clone(), vec![col]).unwrap()
            })
            .collect();
        Table::new(schema, batches, Vec::new())
    }

    fn preview_ids(t: &Table, n: usize) -> Vec<i64> {
        t.preview(n)
            .iter()
            .flat_map(|b| {
                b.column(0)
                    .as_any()
                    .downcast_ref::<Int64Array>()
                    .unwrap()
                    .values()
                    .to_vec()
            })
            .collect()
    }

    #[test]
    fn preview_spans_batches_in_order() {
        let t = table(&[3, 2, 4]);
        assert_eq!(t.count(), 9);
        assert_eq!(preview_ids(&t, 4), vec![0, 1, 2, 3]);
        assert_eq!(preview_ids(&t, 9), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn preview_is_bounded_by_count() {
        let t = table(&[2, 1]);
        assert_eq!(preview_ids(&t, 50).len(), 3);
        assert!(t.preview(0).is_empty());
    }

    #[test]
    fn empty_table_previews_nothing() {
        let t = table(&[]);
        assert_eq!(t.count(), 0);
        assert!(t.preview(5).is_empty());
    }
}
