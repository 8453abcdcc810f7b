//! The record collection and the stores behind it.
//!
//! Every mutation is one reload, one change and one write of the backing
//! store. Nothing coordinates concurrent writers: the last full write wins.

use anyhow::Result;
use tracing::info;

use burgerlog_core::config::{BackendKind, Config, ConfigPaths, LedgerOrder};
use burgerlog_core::paths::ledger_path;
use burgerlog_core::{Record, RecordId, Schema};

pub mod export;
pub mod flat_file;
pub mod import;
pub mod memory;
pub mod remote;

pub use flat_file::FlatFileLedger;
pub use import::ImportReport;
pub use memory::MemoryLedger;
pub use remote::RemoteTableLedger;

/// Storage capability. Backends only have to load and replace the whole
/// collection; `append` and `remove` fall back to a full rewrite.
pub trait LedgerBackend {
    /// Short human description, e.g. the file path or table URL.
    fn describe(&self) -> String;

    fn list_all(&self) -> Result<Vec<Record>>;

    fn replace_all(&mut self, records: &[Record]) -> Result<()>;

    fn append(&mut self, record: Record, order: LedgerOrder) -> Result<()> {
        let mut records = self.list_all()?;
        match order {
            LedgerOrder::NewestFirst => records.insert(0, record),
            LedgerOrder::Insertion => records.push(record),
        }
        self.replace_all(&records)
    }

    /// Returns false, without writing, when no record has `id`.
    fn remove(&mut self, id: &RecordId) -> Result<bool> {
        let mut records = self.list_all()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.replace_all(&records)?;
        Ok(true)
    }
}

pub struct Ledger {
    backend: Box<dyn LedgerBackend>,
    order: LedgerOrder,
}

impl Ledger {
    pub fn new(backend: Box<dyn LedgerBackend>, order: LedgerOrder) -> Self {
        Self { backend, order }
    }

    /// Opens the backend selected in `config`.
    pub fn open(config: &Config, paths: &ConfigPaths) -> Result<Self> {
        let schema = Schema::new(config.ledger.columns);
        let order = config.ledger.order;
        let backend: Box<dyn LedgerBackend> = match config.ledger.backend {
            BackendKind::FlatFile => Box::new(FlatFileLedger::new(ledger_path(config, paths), schema)),
            BackendKind::RemoteTable => {
                Box::new(RemoteTableLedger::from_config(&config.remote, schema, order)?)
            }
        };
        Ok(Self::new(backend, order))
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    pub fn order(&self) -> LedgerOrder {
        self.order
    }

    pub fn list_all(&self) -> Result<Vec<Record>> {
        self.backend.list_all()
    }

    pub fn get(&self, id: &RecordId) -> Result<Option<Record>> {
        let records = self.list_all()?;
        Ok(records.into_iter().find(|record| record.id() == id))
    }

    pub fn append(&mut self, record: Record) -> Result<()> {
        info!(id = %record.id(), venue = record.venue(), overall = record.overall(), "appending record");
        self.backend.append(record, self.order)
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<bool> {
        let removed = self.backend.remove(id)?;
        if removed {
            info!(%id, "removed record");
        } else {
            info!(%id, "no record to remove");
        }
        Ok(removed)
    }

    /// Persists `records` verbatim in place of the current collection.
    pub fn replace_all(&mut self, records: &[Record]) -> Result<()> {
        info!(count = records.len(), "replacing ledger contents");
        self.backend.replace_all(records)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.replace_all(&[])
    }
}
