use std::path::PathBuf;

use anyhow::{Context, Result};

use burgerlog_core::config::{Config, ConfigPaths};
use burgerlog_core::paths::photo_dir;
use burgerlog_core::{BurgerLogError, Record, RecordId, Schema};
use gallery::Gallery;
use ledger::Ledger;

pub mod config;
pub mod entry;
pub mod photos;
pub mod records;
pub mod transfer;

/// Resolved configuration shared by every command.
pub struct Session {
    pub config_path: PathBuf,
    pub paths: ConfigPaths,
    pub config: Config,
}

impl Session {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let paths = ConfigPaths::resolve()?;
        let config_path = config_path.unwrap_or_else(|| paths.config_path.clone());
        let config = Config::load_or_default(&config_path)
            .with_context(|| format!("load config {}", config_path.display()))?;
        Ok(Self {
            config_path,
            paths,
            config,
        })
    }

    pub fn ledger(&self) -> Result<Ledger> {
        Ledger::open(&self.config, &self.paths)
    }

    pub fn gallery(&self) -> Gallery {
        Gallery::new(photo_dir(&self.config, &self.paths))
    }

    pub fn schema(&self) -> Schema {
        Schema::new(self.config.ledger.columns)
    }
}

pub fn find_record(ledger: &Ledger, id: &str) -> Result<Record> {
    let record = ledger
        .get(&RecordId::from(id))?
        .ok_or_else(|| BurgerLogError::NotFound(id.to_string()))?;
    Ok(record)
}
