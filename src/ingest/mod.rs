//! Image ingestion: drop-zone acceptance and inline data-URI encoding.
//!
//! Images are persisted as `data:<mime>;base64,<payload>` strings so a row
//! needs no separate object storage. Nothing is resized or recompressed; a
//! row grows with its image.

pub mod discovery;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::{NewGalleryImage, Store, StoreError, UNCATEGORIZED};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Which files a drop target takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    pub accepted: &'static [&'static str],
    /// A drop with more files than this is rejected as a whole.
    pub max_files: Option<usize>,
}

pub const GALLERY_DROP_ZONE: DropZone = DropZone {
    accepted: &["image/png", "image/jpeg", "image/gif", "image/webp"],
    max_files: None,
};

pub const AVATAR_DROP_ZONE: DropZone = DropZone {
    accepted: &["image/png", "image/jpeg", "image/gif"],
    max_files: Some(1),
};

/// MIME type implied by a file name's extension, for the image types we know.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A file offered to a drop zone, before acceptance.
#[derive(Debug, Clone)]
pub struct DroppedFile {
    pub name: String,
    mime: Option<String>,
    source: FileSource,
}

impl DroppedFile {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_for_name(&name).map(String::from);

        Self {
            name,
            mime,
            source: FileSource::Path(path.to_path_buf()),
        }
    }

    /// An uploaded file. A missing or generic declared type falls back to the extension.
    pub fn from_bytes(name: &str, declared_mime: Option<&str>, bytes: Vec<u8>) -> Self {
        let mime = declared_mime
            .filter(|m| !m.is_empty() && *m != "application/octet-stream")
            .map(String::from)
            .or_else(|| mime_for_name(name).map(String::from));

        Self {
            name: name.to_string(),
            mime,
            source: FileSource::Memory(bytes),
        }
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }
}

/// A file that passed a drop zone; only these reach the ingestion flows.
#[derive(Debug, Clone)]
pub struct AcceptedFile {
    pub name: String,
    pub mime: String,
    source: FileSource,
}

impl AcceptedFile {
    /// Read the whole file and encode it as a data URI.
    pub async fn into_data_uri(self) -> Result<String, IngestError> {
        let bytes = match self.source {
            FileSource::Memory(bytes) => bytes,
            FileSource::Path(path) => tokio::fs::read(&path).await.map_err(|source| IngestError::Read {
                name: self.name.clone(),
                source,
            })?,
        };
        Ok(encode_data_uri(&self.mime, &bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnsupportedType { name: String, mime: Option<String> },
    TooManyFiles { name: String },
}

impl Rejection {
    pub fn name(&self) -> &str {
        match self {
            Rejection::UnsupportedType { name, .. } | Rejection::TooManyFiles { name } => name,
        }
    }

    pub fn reason(&self) -> String {
        match self {
            Rejection::UnsupportedType { mime: Some(mime), .. } => format!("unsupported file type {}", mime),
            Rejection::UnsupportedType { mime: None, .. } => "unknown file type".to_string(),
            Rejection::TooManyFiles { .. } => "too many files".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct DropOutcome {
    pub accepted: Vec<AcceptedFile>,
    pub rejected: Vec<Rejection>,
}

impl DropZone {
    pub fn accept(&self, files: Vec<DroppedFile>) -> DropOutcome {
        let mut outcome = DropOutcome::default();

        if self.max_files.is_some_and(|max| files.len() > max) {
            outcome.rejected = files
                .into_iter()
                .map(|f| Rejection::TooManyFiles { name: f.name })
                .collect();
            return outcome;
        }

        for file in files {
            match file.mime {
                Some(mime) if self.accepted.contains(&mime.as_str()) => {
                    outcome.accepted.push(AcceptedFile {
                        name: file.name,
                        mime,
                        source: file.source,
                    });
                }
                mime => outcome.rejected.push(Rejection::UnsupportedType { name: file.name, mime }),
            }
        }

        outcome
    }
}

/// Read, encode and insert one gallery file.
///
/// The title is the original filename and the category is "Uncategorized".
pub async fn persist_gallery_file(store: &Store, file: AcceptedFile, order: i64) -> Result<(), IngestError> {
    let title = file.name.clone();
    let image_url = file.into_data_uri().await?;

    let row = NewGalleryImage {
        image_url,
        title: Some(title),
        category: Some(UNCATEGORIZED.to_string()),
        order,
    };
    store.insert_gallery_image(&row).await?;
    Ok(())
}
