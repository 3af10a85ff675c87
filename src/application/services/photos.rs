//! Tree photo lookup and embedding
//!
//! Photos are matched loosely: a file belongs to a tree when its lowercased
//! stem contains the lowercased tree code. Codes that are prefixes of other
//! codes (`T1` vs `T12`) can therefore pick up each other's photos.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use tracing::{debug, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::PathExt;

/// A photo file found in the photo directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub path: PathBuf,
    stem_lower: String,
    extension: String,
}

impl PhotoEntry {
    /// MIME type for the data URI (`jpg` is served as `image/jpeg`).
    pub fn mime_type(&self) -> String {
        match self.extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg".to_string(),
            "svg" => "image/svg+xml".to_string(),
            "tif" => "image/tiff".to_string(),
            other => format!("image/{other}"),
        }
    }
}

/// Inline image ready to be placed in a popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPhoto {
    pub data_uri: String,
}

/// What the info panel shows in its photo section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSlot {
    /// No photo directory, or the tree has no code: section omitted
    Omitted,
    /// Photo directory exists but nothing matched
    Missing,
    Embedded(EmbeddedPhoto),
}

/// Photos of one site, scanned once.
#[derive(Debug, Clone, Default)]
pub struct PhotoIndex {
    entries: Vec<PhotoEntry>,
}

impl PhotoIndex {
    /// Scan `dir` for files with one of `extensions`, in file-name order.
    pub fn scan(fs: &dyn FileSystem, dir: &Path, extensions: &[String]) -> ApplicationResult<Self> {
        let entries: Vec<PhotoEntry> = fs
            .list_files(dir)
            .with_path_context("list photo directory", dir)?
            .into_iter()
            .filter(|p| p.has_extension_ci(extensions))
            .map(|path| PhotoEntry {
                stem_lower: path.stem_lossy().to_lowercase(),
                extension: path.extension_lowercase().unwrap_or_default(),
                path,
            })
            .collect();
        debug!("scan: {} photo(s) in {}", entries.len(), dir.display());
        Ok(Self { entries })
    }

    /// First photo whose stem contains `code`, ignoring case.
    pub fn find(&self, code: &str) -> Option<&PhotoEntry> {
        let code = code.trim().to_lowercase();
        if code.is_empty() {
            return None;
        }
        self.entries.iter().find(|e| e.stem_lower.contains(&code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves photo slots for tree codes, embedding matched files as base64.
pub struct PhotoService {
    fs: Arc<dyn FileSystem>,
    index: Option<PhotoIndex>,
}

impl PhotoService {
    /// Service for a site without a photo directory.
    pub fn disabled(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, index: None }
    }

    /// Service over the photos in `dir`.
    pub fn scan(fs: Arc<dyn FileSystem>, dir: &Path, extensions: &[String]) -> ApplicationResult<Self> {
        let index = PhotoIndex::scan(fs.as_ref(), dir, extensions)?;
        Ok(Self {
            fs,
            index: Some(index),
        })
    }

    /// Photo section for the tree with `code`.
    ///
    /// An unreadable photo file degrades to `Missing`.
    pub fn slot_for(&self, code: &str) -> PhotoSlot {
        let Some(index) = &self.index else {
            return PhotoSlot::Omitted;
        };
        if code.trim().is_empty() {
            return PhotoSlot::Omitted;
        }
        let Some(entry) = index.find(code) else {
            return PhotoSlot::Missing;
        };
        match self.fs.read(&entry.path) {
            Ok(bytes) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
                PhotoSlot::Embedded(EmbeddedPhoto {
                    data_uri: format!("data:{};base64,{}", entry.mime_type(), encoded),
                })
            }
            Err(e) => {
                warn!("Cannot read photo {}: {}", entry.path.display(), e);
                PhotoSlot::Missing
            }
        }
    }
}
