use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use burgerlog_core::{ColumnStyle, Record, Schema};

/// Records read from a CSV source plus what had to be patched up.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub records: Vec<Record>,
    pub style: ColumnStyle,
    /// Schema columns the source lacked; every row got the default value.
    pub backfilled: Vec<String>,
    /// Source columns the schema does not know; dropped.
    pub ignored: Vec<String>,
}

/// Reads a CSV ledger with a header row. `style` forces the column naming;
/// `None` detects it from the header.
pub fn read_records<R: Read>(reader: R, style: Option<ColumnStyle>) -> Result<ImportReport> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("read CSV header")?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let style = style.unwrap_or_else(|| ColumnStyle::detect(&headers));
    let schema = Schema::new(style);
    let backfilled = if headers.is_empty() {
        Vec::new()
    } else {
        schema.missing_columns(&headers)
    };
    let ignored = schema.unknown_columns(&headers);
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(position, header)| (header.as_str(), position))
        .collect();

    let mut records = Vec::new();
    for (line, row) in csv_reader.records().enumerate() {
        let row = row.with_context(|| format!("read CSV row {}", line + 1))?;
        let record = schema.record_from(|name| {
            index
                .get(name)
                .map(|position| row.get(*position).unwrap_or_default().to_string())
        });
        records.push(record);
    }

    if !backfilled.is_empty() && !records.is_empty() {
        warn!(columns = ?backfilled, rows = records.len(), "backfilled missing columns with defaults");
    }
    if !ignored.is_empty() {
        debug!(columns = ?ignored, "ignored unknown columns");
    }

    Ok(ImportReport {
        records,
        style,
        backfilled,
        ignored,
    })
}

pub fn read_path(path: &Path, style: Option<ColumnStyle>) -> Result<ImportReport> {
    let file = File::open(path).with_context(|| format!("open ledger CSV {}", path.display()))?;
    read_records(file, style).with_context(|| format!("parse ledger CSV {}", path.display()))
}
