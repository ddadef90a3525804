// src/record.rs

use arrow::{
    array::{Array, Float64Array, Int32Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use serde::Serialize;

use crate::error::ReadError;

/// One row of the GeoNames gazetteer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoName {
    pub geonameid: i64,
    pub name: Option<String>,
    pub asciiname: Option<String>,
    /// Comma-separated alternate names, kept as one blob.
    pub alternatenames: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub feature_class: Option<String>,
    pub feature_code: Option<String>,
    pub country_code: Option<String>,
    pub cc2: Option<String>,
    pub admin1_code: Option<String>,
    pub admin2_code: Option<String>,
    pub admin3_code: Option<String>,
    pub admin4_code: Option<String>,
    pub population: Option<i64>,
    pub elevation: Option<String>,
    pub dem: Option<i32>,
    pub timezone: Option<String>,
    pub modification_date: Option<String>,
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T, ReadError> {
    let arr = batch
        .column_by_name(name)
        .ok_or_else(|| ReadError::InvalidSchema(format!("missing column `{}`", name)))?;
    arr.as_any().downcast_ref::<T>().ok_or_else(|| {
        ReadError::InvalidSchema(format!(
            "column `{}` has type {}, which does not fit a GeoNames record",
            name,
            arr.data_type()
        ))
    })
}

fn text(batch: &RecordBatch, name: &str, row: usize) -> Result<Option<String>, ReadError> {
    let arr = column::<StringArray>(batch, name)?;
    Ok((!arr.is_null(row)).then(|| arr.value(row).to_string()))
}

impl GeoName {
    /// Build the record at `row` of `batch`, looking columns up by name.
    pub fn from_batch(batch: &RecordBatch, row: usize) -> Result<Self, ReadError> {
        let ids = column::<Int64Array>(batch, "geonameid")?;
        if ids.is_null(row) {
            return Err(ReadError::InvalidSchema(format!(
                "geonameid is null in row {}",
                row
            )));
        }
        let latitude = column::<Float64Array>(batch, "latitude")?;
        let longitude = column::<Float64Array>(batch, "longitude")?;
        let population = column::<Int64Array>(batch, "population")?;
        let dem = column::<Int32Array>(batch, "dem")?;

        Ok(Self {
            geonameid: ids.value(row),
            name: text(batch, "name", row)?,
            asciiname: text(batch, "asciiname", row)?,
            alternatenames: text(batch, "alternatenames", row)?,
            latitude: (!latitude.is_null(row)).then(|| latitude.value(row)),
            longitude: (!longitude.is_null(row)).then(|| longitude.value(row)),
            feature_class: text(batch, "feature_class", row)?,
            feature_code: text(batch, "feature_code", row)?,
            country_code: text(batch, "country_code", row)?,
            cc2: text(batch, "cc2", row)?,
            admin1_code: text(batch, "admin1_code", row)?,
            admin2_code: text(batch, "admin2_code", row)?,
            admin3_code: text(batch, "admin3_code", row)?,
            admin4_code: text(batch, "admin4_code", row)?,
            population: (!population.is_null(row)).then(|| population.value(row)),
            elevation: text(batch, "elevation", row)?,
            dem: (!dem.is_null(row)).then(|| dem.value(row)),
            timezone: text(batch, "timezone", row)?,
            modification_date: text(batch, "modification_date", row)?,
        })
    }

    /// Every row of `batches`, in order.
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Vec<Self>, ReadError> {
        let total = batches.iter().map(RecordBatch::num_rows).sum();
        let mut out = Vec::with_capacity(total);
        for batch in batches {
            for row in 0..batch.num_rows() {
                out.push(Self::from_batch(batch, row)?);
            }
        }
        Ok(out)
    }
}
