// src/schema/load.rs

use anyhow::{bail, Context, Result};
use std::{fs, path::Path};
use tracing::info;

use super::types::TableSchema;

/// Read a schema override from `path`. YAML (`.yaml`/`.yml`) and JSON
/// (`.json`) are accepted; the document is `{ columns: [{name, type, nullable?}] }`.
pub fn load_schema_file<P: AsRef<Path>>(path: P) -> Result<TableSchema> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let schema: TableSchema = match ext.as_str() {
        "yaml" | "yml" => {
            serde_yaml::from_str(&text).with_context(|| format!("parsing {:?}", path))?
        }
        "json" => serde_json::from_str(&text).with_context(|| format!("parsing {:?}", path))?,
        other => bail!(
            "unsupported schema file extension `{}` for {:?} (expected yaml, yml or json)",
            other,
            path
        ),
    };

    schema
        .validate()
        .with_context(|| format!("validating {:?}", path))?;
    info!(path = %path.display(), columns = schema.len(), "loaded schema");
    Ok(schema)
}
