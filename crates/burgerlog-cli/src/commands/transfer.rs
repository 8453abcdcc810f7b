use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use ledger::export::write_records;
use ledger::import::read_path;
use reporting::json;
use reporting::redact::redact_path;

use crate::commands::Session;

/// Replaces the whole ledger with the file's records.
pub fn import(session: &Session, file: &Path) -> Result<()> {
    let report = read_path(file, None)?;
    let mut ledger = session.ledger()?;
    ledger.replace_all(&report.records)?;

    println!(
        "İçe aktarıldı: {} kayıt ({})",
        report.records.len(),
        redact_path(file)
    );
    if !report.backfilled.is_empty() {
        println!("Eksik sütunlar varsayılanla dolduruldu: {}", report.backfilled.join(", "));
    }
    if !report.ignored.is_empty() {
        println!("Tanınmayan sütunlar atlandı: {}", report.ignored.join(", "));
    }
    Ok(())
}

pub fn export(session: &Session, output: Option<PathBuf>, as_json: bool) -> Result<()> {
    let ledger = session.ledger()?;
    let records = ledger.list_all()?;

    match output {
        Some(path) => {
            if as_json {
                fs::write(&path, json::render_records(&records))
                    .with_context(|| format!("write export {}", path.display()))?;
            } else {
                let file = File::create(&path)
                    .with_context(|| format!("create export {}", path.display()))?;
                write_records(file, &session.schema(), &records)?;
            }
            eprintln!("{} kayıt yazıldı: {}", records.len(), redact_path(&path));
        }
        None => {
            if as_json {
                println!("{}", json::render_records(&records));
            } else {
                write_records(io::stdout().lock(), &session.schema(), &records)?;
            }
        }
    }
    Ok(())
}

pub fn clear(session: &Session, yes: bool) -> Result<()> {
    if !yes {
        return Err(anyhow::anyhow!("refusing to delete every record without --yes"));
    }
    let mut ledger = session.ledger()?;
    ledger.clear()?;
    println!("Tüm kayıtlar silindi ({}).", ledger.describe());
    Ok(())
}
