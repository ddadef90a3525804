// src/schema/types.rs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::ReadError;

/// Value type of a single positional column.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int64,
    Int32,
    Float64,
    Utf8,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int64 => "int64",
            ColumnType::Int32 => "int32",
            ColumnType::Float64 => "float64",
            ColumnType::Utf8 => "utf8",
        };
        f.write_str(name)
    }
}

fn default_nullable() -> bool {
    true
}

/// A single column definition. Position in the owning schema is the only key.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

impl Column {
    pub fn nullable(name: &str, ty: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            nullable: true,
        }
    }

    pub fn required(name: &str, ty: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            nullable: false,
        }
    }
}

/// Ordered column list for a headerless delimited file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq)]
pub struct TableSchema {
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Checks the schema can drive a positional read: at least one column,
    /// every name non-empty and unique.
    pub fn validate(&self) -> Result<(), ReadError> {
        if self.is_empty() {
            return Err(ReadError::InvalidSchema("schema has no columns".into()));
        }

        let mut seen = HashSet::with_capacity(self.columns.len());
        for (i, col) in self.columns.iter().enumerate() {
            if col.name.trim().is_empty() {
                return Err(ReadError::InvalidSchema(format!(
                    "column #{} has an empty name",
                    i + 1
                )));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(ReadError::InvalidSchema(format!(
                    "duplicate column name `{}`",
                    col.name
                )));
            }
        }
        Ok(())
    }
}
