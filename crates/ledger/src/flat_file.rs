use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use burgerlog_core::{Record, Schema};

use crate::export::write_records;
use crate::import::read_path;
use crate::LedgerBackend;

/// CSV file holding the whole ledger. Reads detect the header style so a file
/// written with the other column naming still loads; writes always use
/// `schema`.
pub struct FlatFileLedger {
    path: PathBuf,
    schema: Schema,
}

impl FlatFileLedger {
    pub fn new(path: PathBuf, schema: Schema) -> Self {
        Self { path, schema }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerBackend for FlatFileLedger {
    fn describe(&self) -> String {
        format!("flat file {}", self.path.display())
    }

    fn list_all(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let report = read_path(&self.path, None)?;
        debug!(path = %self.path.display(), count = report.records.len(), "loaded ledger");
        Ok(report.records)
    }

    fn replace_all(&mut self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create ledger dir {}", parent.display()))?;
            }
        }
        let file = File::create(&self.path)
            .with_context(|| format!("write ledger {}", self.path.display()))?;
        write_records(file, &self.schema, records)
            .with_context(|| format!("write ledger {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = records.len(), "wrote ledger");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burgerlog_core::config::LedgerOrder;
    use burgerlog_core::{ColumnStyle, RecordBuilder, RecordId, Reviewer, ScoreSet};
    use tempfile::TempDir;

    fn record(venue: &str) -> Record {
        RecordBuilder::new(venue)
            .reviewer(Reviewer::Baba, ScoreSet::from_ratings(&[2, 4, 6, 8, 10, 0]), "b")
            .reviewer(Reviewer::Gokce, ScoreSet::from_ratings(&[10; 6]), "g")
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let ledger = FlatFileLedger::new(dir.path().join("none.csv"), Schema::new(ColumnStyle::Snake));
        assert!(ledger.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_remove_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/burger_log.csv");
        let mut ledger = FlatFileLedger::new(path.clone(), Schema::new(ColumnStyle::Snake));

        let first = record("Birinci");
        let first_id = first.id().clone();
        ledger.append(first, LedgerOrder::NewestFirst).unwrap();
        ledger.append(record("İkinci"), LedgerOrder::NewestFirst).unwrap();

        let reopened = FlatFileLedger::new(path.clone(), Schema::new(ColumnStyle::Snake));
        let records = reopened.list_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].venue(), "İkinci");
        assert_eq!(records[1].overall(), 7.5);

        assert!(ledger.remove(&first_id).unwrap());
        assert!(!ledger.remove(&RecordId::from("nope")).unwrap());
        assert_eq!(reopened.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_all_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut ledger = FlatFileLedger::new(dir.path().join("log.csv"), Schema::new(ColumnStyle::Titled));
        ledger.replace_all(&[record("a"), record("b")]).unwrap();

        let before = ledger.list_all().unwrap();
        ledger.replace_all(&before).unwrap();
        assert_eq!(ledger.list_all().unwrap(), before);
    }

    #[test]
    fn test_reads_file_in_other_style() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        let mut titled = FlatFileLedger::new(path.clone(), Schema::new(ColumnStyle::Titled));
        titled.replace_all(&[record("eski")]).unwrap();

        let snake = FlatFileLedger::new(path, Schema::new(ColumnStyle::Snake));
        let records = snake.list_all().unwrap();
        assert_eq!(records[0].venue(), "eski");
        assert_eq!(records[0].entry(Reviewer::Gokce).comment, "g");
    }

    #[test]
    fn test_clear_keeps_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        let mut ledger = FlatFileLedger::new(path.clone(), Schema::new(ColumnStyle::Snake));
        ledger.replace_all(&[record("a")]).unwrap();
        ledger.replace_all(&[]).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(ledger.list_all().unwrap().is_empty());
    }
}
