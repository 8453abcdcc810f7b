use std::path::PathBuf;

use anyhow::Result;

use burgerlog_core::config::{Config, ConfigPaths};

use crate::commands::Session;

pub fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let paths = ConfigPaths::resolve()?;
    let config_path = path.unwrap_or(paths.config_path);
    if config_path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    let config = Config::default_config();
    config.save(&config_path)?;
    println!("Ayarlar yazıldı: {}", config_path.display());
    Ok(())
}

pub fn print_effective(session: &Session) -> Result<()> {
    let output = session.config.to_toml_string()?;
    println!("# {}", session.config_path.display());
    println!("{}", output);
    Ok(())
}
