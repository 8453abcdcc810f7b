use anyhow::Result;

use reporting::redact::redact_path;

use crate::commands::Session;

#[derive(Debug)]
pub enum PhotosAction {
    Orphans { prune: bool },
    Missing,
}

pub fn execute(session: &Session, action: PhotosAction) -> Result<()> {
    let ledger = session.ledger()?;
    let records = ledger.list_all()?;
    let gallery = session.gallery();

    match action {
        PhotosAction::Orphans { prune } => {
            let orphans = gallery.orphans(&records)?;
            if orphans.is_empty() {
                println!("Sahipsiz fotoğraf yok: {}", redact_path(&gallery.dir));
                return Ok(());
            }
            for entry in &orphans {
                println!("{} ({} bayt)", redact_path(&entry.path), entry.size);
            }
            if prune {
                let removed = gallery.prune(&orphans)?;
                println!("{removed} sahipsiz fotoğraf silindi");
            } else {
                println!("{} sahipsiz fotoğraf (silmek için --prune)", orphans.len());
            }
        }
        PhotosAction::Missing => {
            let missing = gallery.missing(&records);
            if missing.is_empty() {
                println!("Tüm fotoğraflar yerinde.");
            }
            for record in missing {
                println!("{} {}: {}", record.id(), record.venue(), record.photo());
            }
        }
    }
    Ok(())
}
