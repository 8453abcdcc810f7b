use anyhow::Result;

use burgerlog_core::Record;

use crate::LedgerBackend;

/// Ledger kept in process memory. Counts writes so callers can check that a
/// no-op mutation did not rewrite the store.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: Vec<Record>,
    writes: usize,
}

impl MemoryLedger {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self { records, writes: 0 }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl LedgerBackend for MemoryLedger {
    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }

    fn list_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }

    fn replace_all(&mut self, records: &[Record]) -> Result<()> {
        self.records = records.to_vec();
        self.writes += 1;
        Ok(())
    }
}
