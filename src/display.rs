// src/display.rs
//! Console rendering of a table preview.

use anyhow::{Context, Result};
use arrow::{
    record_batch::RecordBatch,
    util::{
        display::{ArrayFormatter, FormatOptions},
        pretty::pretty_format_batches,
    },
};
use std::{fmt, str::FromStr};

use crate::record::GeoName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// ASCII grid, one line per record.
    #[default]
    Table,
    /// One block per record, one line per column.
    Vertical,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Vertical => f.write_str("vertical"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "vertical" => Ok(OutputFormat::Vertical),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format `{}` (expected table, vertical or json)",
                other
            )),
        }
    }
}

/// Render `batches` in `format`. `truncate` only applies to vertical output;
/// 0 disables it.
pub fn render(batches: &[RecordBatch], format: OutputFormat, truncate: usize) -> Result<String> {
    match format {
        OutputFormat::Table => format_table(batches),
        OutputFormat::Vertical => format_vertical(batches, truncate),
        OutputFormat::Json => format_json(batches),
    }
}

pub fn format_table(batches: &[RecordBatch]) -> Result<String> {
    Ok(pretty_format_batches(batches)
        .context("formatting preview")?
        .to_string())
}

/// Cut `value` to `limit` characters, ending in `...` when there is room.
pub fn truncate_value(value: &str, limit: usize) -> String {
    if limit == 0 || value.chars().count() <= limit {
        return value.to_string();
    }
    if limit < 4 {
        return value.chars().take(limit).collect();
    }
    let mut out: String = value.chars().take(limit - 3).collect();
    out.push_str("...");
    out
}

/// Per-record blocks:
///
/// ```text
/// -RECORD 0---------------------
///  geonameid         | 3041565
///  name              | Andorra la Vella
/// ```
pub fn format_vertical(batches: &[RecordBatch], truncate: usize) -> Result<String> {
    let options = FormatOptions::default().with_null("null");
    let mut out = String::new();
    let mut record = 0usize;

    for batch in batches {
        let schema = batch.schema();
        let name_width = schema
            .fields()
            .iter()
            .map(|f| f.name().chars().count())
            .max()
            .unwrap_or(0);
        let formatters = batch
            .columns()
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()
            .context("formatting preview")?;

        for row in 0..batch.num_rows() {
            let cells: Vec<String> = formatters
                .iter()
                .map(|f| truncate_value(&f.value(row).to_string(), truncate))
                .collect();
            let value_width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);

            let title = format!("-RECORD {}", record);
            let rule = (name_width + value_width + 4).max(title.chars().count());
            out.push_str(&format!("{:-<width$}\n", title, width = rule));
            for (field, cell) in schema.fields().iter().zip(&cells) {
                out.push_str(&format!(
                    " {:<width$} | {}\n",
                    field.name(),
                    cell,
                    width = name_width
                ));
            }
            record += 1;
        }
    }

    if record == 0 {
        out.push_str("(0 rows)\n");
    }
    Ok(out)
}

pub fn format_json(batches: &[RecordBatch]) -> Result<String> {
    let mut out = String::new();
    for record in GeoName::from_batches(batches)? {
        out.push_str(&serde_json::to_string(&record).context("serializing record")?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{ReadOptions, TabularReader};

    const ANDORRA: &str = "3041565\tAndorra la Vella\tAndorra la Vella\t\t42.50779\t1.52109\tP\tPPLC\tAD\t\t07\t\t\t\t20430\t\t1033\tEurope/Andorra\t2024-01-01\n";

    fn andorra() -> Vec<RecordBatch> {
        let reader = TabularReader::geonames(ReadOptions::default()).unwrap();
        reader.read_from("inline", ANDORRA.as_bytes()).unwrap().preview(1)
    }

    #[test]
    fn truncate_value_cuts_with_ellipsis() {
        assert_eq!(truncate_value("Andorra la Vella", 0), "Andorra la Vella");
        assert_eq!(truncate_value("Andorra la Vella", 16), "Andorra la Vella");
        assert_eq!(truncate_value("Andorra la Vella", 10), "Andorra...");
        assert_eq!(truncate_value("Andorra", 3), "And");
        assert_eq!(truncate_value("Zürich-Höngg", 8), "Züric...");
    }

    #[test]
    fn vertical_lists_every_column_with_nulls() -> Result<()> {
        let text = format_vertical(&andorra(), 0)?;
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("-RECORD 0"));
        assert_eq!(lines.len(), 1 + 19);
        assert!(lines[1].starts_with(" geonameid"));
        assert!(lines[1].ends_with("| 3041565"));
        assert!(text.contains("| Andorra la Vella\n"));
        assert!(lines[10].starts_with(" cc2"));
        assert!(lines[10].ends_with("| null"));
        Ok(())
    }

    #[test]
    fn vertical_truncates_long_values() -> Result<()> {
        let text = format_vertical(&andorra(), 8)?;
        assert!(text.contains("| Andor...\n"));
        assert!(!text.contains("Andorra la Vella"));
        Ok(())
    }

    #[test]
    fn table_and_json_render() -> Result<()> {
        let batches = andorra();
        let grid = format_table(&batches)?;
        assert!(grid.contains("geonameid"));
        assert!(grid.contains("3041565"));

        let json = format_json(&batches)?;
        assert_eq!(json.lines().count(), 1);
        assert!(json.contains("\"geonameid\":3041565"));
        assert!(json.contains("\"dem\":1033"));
        Ok(())
    }

    #[test]
    fn empty_preview_renders_placeholder() -> Result<()> {
        assert_eq!(format_vertical(&[], 0)?, "(0 rows)\n");
        assert_eq!(render(&[], OutputFormat::Json, 0)?, "");
        Ok(())
    }

    #[test]
    fn output_format_parses() {
        assert_eq!("Vertical".parse::<OutputFormat>(), Ok(OutputFormat::Vertical));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
