use std::io::Write;

use anyhow::{Context, Result};

use burgerlog_core::{Record, Schema};

/// Writes the header and one row per record in the ledger's flat format.
pub fn write_records<W: Write>(writer: W, schema: &Schema, records: &[Record]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(schema.header()).context("write CSV header")?;
    for record in records {
        csv_writer
            .write_record(schema.row(record))
            .with_context(|| format!("write CSV row for {}", record.id()))?;
    }
    csv_writer.flush().context("flush CSV output")?;
    Ok(())
}

pub fn to_csv_string(schema: &Schema, records: &[Record]) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, schema, records)?;
    String::from_utf8(buffer).context("CSV output is not UTF-8")
}
