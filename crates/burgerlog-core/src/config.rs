use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::BurgerLogError;
use crate::schema::ColumnStyle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub journal: JournalConfig,
    pub ledger: LedgerConfig,
    pub remote: RemoteConfig,
    pub photos: PhotoConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub backend: BackendKind,
    pub path: String,
    pub columns: ColumnStyle,
    pub order: LedgerOrder,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    FlatFile,
    RemoteTable,
}

/// Where `append` puts a new record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOrder {
    #[default]
    NewestFirst,
    Insertion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub table: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            journal: JournalConfig {
                title: "Burger Günlüğü".to_string(),
            },
            ledger: LedgerConfig {
                backend: BackendKind::FlatFile,
                path: "${DATA_DIR}/burger_log.csv".to_string(),
                columns: ColumnStyle::Snake,
                order: LedgerOrder::NewestFirst,
            },
            remote: RemoteConfig {
                url: String::new(),
                table: "burger-logs".to_string(),
                api_key_env: "SUPABASE_ANON_KEY".to_string(),
            },
            photos: PhotoConfig {
                dir: "${DATA_DIR}/photos".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path`, falling back to the defaults when no file exists yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default_config());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), BurgerLogError> {
        if self.ledger.backend == BackendKind::FlatFile && self.ledger.path.trim().is_empty() {
            return Err(BurgerLogError::InvalidConfig(
                "ledger.path must be set for the flat_file backend".to_string(),
            ));
        }
        if self.ledger.backend == BackendKind::RemoteTable {
            if self.remote.url.trim().is_empty() {
                return Err(BurgerLogError::InvalidConfig(
                    "remote.url must be set for the remote_table backend".to_string(),
                ));
            }
            if self.remote.table.trim().is_empty() {
                return Err(BurgerLogError::InvalidConfig("remote.table is empty".to_string()));
            }
        }
        Ok(())
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "burgerlog", "burgerlog")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        let config_dir = project_dirs.config_dir();
        let data_dir = project_dirs.data_dir();
        Ok(Self {
            config_path: config_dir.join("config.toml"),
            data_dir: data_dir.to_path_buf(),
        })
    }
}
