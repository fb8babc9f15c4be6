//! On-disk PDF library with in-memory document records.
//!
//! The directory is the source of truth at startup: every `.pdf` in it
//! becomes a record (sorted by filename, ids `1..=n`). Uploads add files and
//! records; deletes remove both.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("library io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("only PDF files are accepted (got `{0}`)")]
    NotPdf(String),

    #[error("invalid upload type `{0}` (expected `fresh` or `bulk`)")]
    InvalidUploadType(String),

    #[error("document {0} not found")]
    NotFound(u64),
}

/// How a document entered the library.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadType {
    #[default]
    Fresh,
    Bulk,
}

impl FromStr for UploadType {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fresh" => Ok(Self::Fresh),
            "bulk" => Ok(Self::Bulk),
            other => Err(LibraryError::InvalidUploadType(other.to_string())),
        }
    }
}

impl fmt::Display for UploadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fresh => "fresh",
            Self::Bulk => "bulk",
        })
    }
}

/// Metadata for one PDF in the library.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: u64,
    pub filename: String,
    /// RFC3339 UTC.
    pub upload_date: String,
    pub file_size: u64,
    pub upload_type: UploadType,
    /// Whether sections have been extracted for this document.
    pub indexed: bool,
    pub section_count: usize,
}

/// Result of [`DocumentLibrary::store`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stored {
    /// A new file and record were written.
    Created(DocumentRecord),
    /// The filename already existed and is indexed; only its upload type was
    /// updated and the stored file was kept.
    Existing(DocumentRecord),
    /// The filename existed but was never indexed; its file was overwritten
    /// with the new bytes.
    Replaced(DocumentRecord),
}

impl Stored {
    pub fn record(&self) -> &DocumentRecord {
        match self {
            Self::Created(r) | Self::Existing(r) | Self::Replaced(r) => r,
        }
    }
}

/// Reduces a client-supplied name to its final path component and checks
/// the `.pdf` extension (case-insensitive).
pub fn sanitize_filename(raw: &str) -> Result<String, LibraryError> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let is_pdf = name.len() > 4 && name.to_ascii_lowercase().ends_with(".pdf");
    if !is_pdf || name.starts_with('.') {
        return Err(LibraryError::NotPdf(raw.to_string()));
    }
    Ok(name.to_string())
}

fn rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub struct DocumentLibrary {
    dir: PathBuf,
    records: RwLock<BTreeMap<u64, DocumentRecord>>,
}

impl DocumentLibrary {
    /// Opens (creating if needed) the library directory and records every PDF
    /// found directly inside it as a bulk document.
    ///
    /// # Errors
    /// [`LibraryError::Io`] if the directory cannot be created or listed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let mut files: Vec<(String, u64, SystemTime)> = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| LibraryError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                warn!(path = %entry.path().display(), "skipping non-UTF-8 filename");
                continue;
            };
            if sanitize_filename(name).is_err() {
                continue;
            }
            let meta = entry.metadata().map_err(|e| LibraryError::Io(e.into()))?;
            let modified = meta.modified().unwrap_or_else(|_| SystemTime::now());
            files.push((name.to_string(), meta.len(), modified));
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let records = files
            .into_iter()
            .zip(1u64..)
            .map(|((filename, file_size, modified), id)| {
                let record = DocumentRecord {
                    id,
                    filename,
                    upload_date: rfc3339(modified),
                    file_size,
                    upload_type: UploadType::Bulk,
                    indexed: false,
                    section_count: 0,
                };
                (id, record)
            })
            .collect::<BTreeMap<_, _>>();

        info!(dir = %dir.display(), documents = records.len(), "document library opened");
        Ok(Self {
            dir,
            records: RwLock::new(records),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, record: &DocumentRecord) -> PathBuf {
        self.dir.join(&record.filename)
    }

    /// Records in ascending id order.
    pub async fn list(&self) -> Vec<DocumentRecord> {
        self.records.read().await.values().cloned().collect()
    }

    pub async fn get(&self, id: u64) -> Option<DocumentRecord> {
        self.records.read().await.get(&id).cloned()
    }

    /// Writes an uploaded PDF and creates its record.
    ///
    /// Re-uploading an indexed filename keeps the existing file and only
    /// updates the upload type. A recorded but unindexed filename (a failed
    /// earlier upload) gets its file replaced so the next ingest reads what
    /// is on disk.
    ///
    /// # Errors
    /// [`LibraryError::NotPdf`] for non-PDF names, [`LibraryError::Io`] on
    /// write failures.
    pub async fn store(
        &self,
        raw_name: &str,
        bytes: &[u8],
        upload_type: UploadType,
    ) -> Result<Stored, LibraryError> {
        let filename = sanitize_filename(raw_name)?;
        let mut records = self.records.write().await;

        let path = self.dir.join(&filename);

        if let Some(existing) = records.values_mut().find(|r| r.filename == filename) {
            existing.upload_type = upload_type;
            if existing.indexed {
                debug!(id = existing.id, %upload_type, "indexed document re-uploaded; file kept");
                return Ok(Stored::Existing(existing.clone()));
            }
            tokio::fs::write(&path, bytes).await?;
            existing.file_size = bytes.len() as u64;
            existing.upload_date = rfc3339(SystemTime::now());
            info!(id = existing.id, filename = %existing.filename, "unindexed document replaced");
            return Ok(Stored::Replaced(existing.clone()));
        }

        tokio::fs::write(&path, bytes).await?;

        let id = records.keys().next_back().map_or(1, |max| max + 1);
        let record = DocumentRecord {
            id,
            filename,
            upload_date: rfc3339(SystemTime::now()),
            file_size: bytes.len() as u64,
            upload_type,
            indexed: false,
            section_count: 0,
        };
        records.insert(id, record.clone());
        info!(id, filename = %record.filename, %upload_type, "document stored");
        Ok(Stored::Created(record))
    }

    /// Reads the stored bytes of a document.
    pub async fn read(&self, record: &DocumentRecord) -> Result<Vec<u8>, LibraryError> {
        Ok(tokio::fs::read(self.path_of(record)).await?)
    }

    /// Removes the record and its file. A file that is already gone is not
    /// an error.
    pub async fn remove(&self, id: u64) -> Result<DocumentRecord, LibraryError> {
        let record = self
            .records
            .write()
            .await
            .remove(&id)
            .ok_or(LibraryError::NotFound(id))?;
        match tokio::fs::remove_file(self.path_of(&record)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(id, filename = %record.filename, "file already missing on delete");
            }
            Err(e) => return Err(e.into()),
        }
        info!(id, filename = %record.filename, "document deleted");
        Ok(record)
    }

    pub async fn set_upload_type(
        &self,
        id: u64,
        upload_type: UploadType,
    ) -> Result<DocumentRecord, LibraryError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(LibraryError::NotFound(id))?;
        record.upload_type = upload_type;
        Ok(record.clone())
    }

    /// Marks a document as indexed with `section_count` sections. Unknown ids
    /// (deleted meanwhile) are ignored.
    pub async fn mark_indexed(&self, id: u64, section_count: usize) {
        if let Some(record) = self.records.write().await.get_mut(&id) {
            record.indexed = true;
            record.section_count = section_count;
        }
    }
}
