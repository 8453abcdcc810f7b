use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

use burgerlog_core::{PhotoRef, Record};

const STAMP: &[FormatItem<'static>] = format_description!("[year][month][day]-[hour][minute][second]");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified_at: Option<OffsetDateTime>,
}

/// Directory of re-encoded venue photos. Records point at files here by path;
/// removing a record leaves its photo in place.
pub struct Gallery {
    pub dir: PathBuf,
}

impl Gallery {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Stores a copy of `source` and returns its reference. A file that cannot
    /// be decoded or written yields the empty reference instead of an error.
    pub fn save(&self, source: &Path) -> PhotoRef {
        match self.try_save(source) {
            Ok(path) => {
                info!(source = %source.display(), stored = %path.display(), "stored photo");
                self.reference_for(&path)
            }
            Err(error) => {
                warn!(source = %source.display(), error = %format!("{error:#}"), "photo skipped");
                PhotoRef::empty()
            }
        }
    }

    /// Relative reference kept in the ledger, `<gallery dir name>/<file name>`,
    /// so records do not depend on where the data directory lives.
    pub fn reference_for(&self, stored: &Path) -> PhotoRef {
        let dir_name = self
            .dir
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("photos"));
        match stored.file_name() {
            Some(file_name) => PhotoRef::new(Path::new(&dir_name).join(file_name).to_string_lossy()),
            None => PhotoRef::empty(),
        }
    }

    pub fn try_save(&self, source: &Path) -> Result<PathBuf> {
        let image = image::io::Reader::open(source)
            .with_context(|| format!("open photo {}", source.display()))?
            .with_guessed_format()
            .with_context(|| format!("inspect photo {}", source.display()))?
            .decode()
            .with_context(|| format!("decode photo {}", source.display()))?;

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create photo dir {}", self.dir.display()))?;

        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let target = self.dir.join(photo_file_name(source, now));
        let image = match extension_of(source).as_str() {
            ".jpg" | ".jpeg" => DynamicImage::ImageRgb8(image.to_rgb8()),
            _ => image,
        };
        if let Err(error) = image.save(&target) {
            let _ = fs::remove_file(&target);
            return Err(error).with_context(|| format!("encode photo {}", target.display()));
        }
        Ok(target)
    }

    pub fn entries(&self) -> Result<Vec<PhotoEntry>> {
        let mut entries = Vec::new();
        if !self.dir.exists() {
            return Ok(entries);
        }
        for entry in WalkDir::new(&self.dir) {
            let entry = entry?;
            if entry.file_type().is_file() {
                let metadata = entry.metadata()?;
                let modified_at = metadata
                    .modified()
                    .ok()
                    .map(OffsetDateTime::from);
                entries.push(PhotoEntry {
                    path: entry.path().to_path_buf(),
                    size: metadata.len(),
                    modified_at,
                });
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    /// Photos no record refers to. References match on file name, since older
    /// ledgers store paths relative to wherever the journal used to run.
    pub fn orphans(&self, records: &[Record]) -> Result<Vec<PhotoEntry>> {
        let referenced: HashSet<OsString> = records
            .iter()
            .filter(|record| !record.photo().is_empty())
            .filter_map(|record| Path::new(record.photo().as_str()).file_name().map(OsString::from))
            .collect();
        let orphans = self
            .entries()?
            .into_iter()
            .filter(|entry| {
                entry
                    .path
                    .file_name()
                    .map(|name| !referenced.contains(name))
                    .unwrap_or(true)
            })
            .collect();
        Ok(orphans)
    }

    /// Records whose photo reference no longer resolves to a file.
    pub fn missing<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records
            .iter()
            .filter(|record| !record.photo().is_empty() && self.resolve(record.photo()).is_none())
            .collect()
    }

    /// Finds the file behind `photo`: relative references are looked up next
    /// to the gallery dir, then the stored path as given, then a file of the
    /// same name inside the gallery.
    pub fn resolve(&self, photo: &PhotoRef) -> Option<PathBuf> {
        if photo.is_empty() {
            return None;
        }
        let stored = PathBuf::from(photo.as_str());
        if stored.is_relative() {
            if let Some(base) = self.dir.parent() {
                let beside = base.join(&stored);
                if beside.is_file() {
                    return Some(beside);
                }
            }
        }
        if stored.is_file() {
            return Some(stored);
        }
        let local = self.dir.join(stored.file_name()?);
        local.is_file().then_some(local)
    }

    /// Deletes the given files, returning how many were removed.
    pub fn prune(&self, entries: &[PhotoEntry]) -> Result<usize> {
        let mut removed = 0;
        for entry in entries {
            if !entry.path.starts_with(&self.dir) {
                warn!(path = %entry.path.display(), "refusing to prune outside photo dir");
                continue;
            }
            fs::remove_file(&entry.path)
                .with_context(|| format!("remove photo {}", entry.path.display()))?;
            removed += 1;
        }
        info!(removed, "pruned orphaned photos");
        Ok(removed)
    }
}

/// `<YYYYmmdd-HHMMSS>-<8 hex><ext>`, with the source extension lowercased and
/// `.jpg` when the source has none.
pub fn photo_file_name(source: &Path, now: OffsetDateTime) -> String {
    let stamp = now.format(STAMP).unwrap_or_default();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("{stamp}-{suffix}{}", extension_of(source))
}

fn extension_of(source: &Path) -> String {
    source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_else(|| ".jpg".to_string())
}
