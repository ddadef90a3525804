// src/schema/geonames.rs
//! The GeoNames gazetteer layout ("allCountries.txt" and the per-country
//! dumps share it): 19 tab-separated columns, no header row.

use once_cell::sync::Lazy;

use super::types::{Column, ColumnType, TableSchema};

/// Number of fields on every GeoNames line.
pub const GEONAMES_COLUMN_COUNT: usize = 19;

static GEONAMES_SCHEMA: Lazy<TableSchema> = Lazy::new(|| {
    use ColumnType::*;

    TableSchema::new(vec![
        Column::required("geonameid", Int64),
        Column::nullable("name", Utf8),
        Column::nullable("asciiname", Utf8),
        Column::nullable("alternatenames", Utf8),
        Column::nullable("latitude", Float64),
        Column::nullable("longitude", Float64),
        Column::nullable("feature_class", Utf8),
        Column::nullable("feature_code", Utf8),
        Column::nullable("country_code", Utf8),
        Column::nullable("cc2", Utf8),
        Column::nullable("admin1_code", Utf8),
        Column::nullable("admin2_code", Utf8),
        Column::nullable("admin3_code", Utf8),
        Column::nullable("admin4_code", Utf8),
        Column::nullable("population", Int64),
        // -9999 marks "unknown"; blanks are common too
        Column::nullable("elevation", Utf8),
        Column::nullable("dem", Int32),
        Column::nullable("timezone", Utf8),
        Column::nullable("modification_date", Utf8),
    ])
});

/// The static GeoNames schema.
pub fn geonames_schema() -> &'static TableSchema {
    &GEONAMES_SCHEMA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geonames_schema_has_nineteen_positional_columns() {
        let schema = geonames_schema();
        assert_eq!(schema.len(), GEONAMES_COLUMN_COUNT);
        assert!(schema.validate().is_ok());
        assert_eq!(schema.columns[0].name, "geonameid");
        assert_eq!(schema.columns[4].name, "latitude");
        assert_eq!(schema.columns[14].name, "population");
        assert_eq!(schema.columns[18].name, "modification_date");
    }

    #[test]
    fn only_geonameid_is_required() {
        let required: Vec<&str> = geonames_schema()
            .columns
            .iter()
            .filter(|c| !c.nullable)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(required, vec!["geonameid"]);
    }

    #[test]
    fn elevation_and_modification_date_stay_text() {
        let schema = geonames_schema();
        for name in ["elevation", "modification_date"] {
            let idx = schema.index_of(name).unwrap();
            assert_eq!(schema.columns[idx].ty, ColumnType::Utf8);
        }
        let dem = schema.index_of("dem").unwrap();
        assert_eq!(schema.columns[dem].ty, ColumnType::Int32);
    }
}
