//! Dataset cache keyed by content hash.
//!
//! Every interaction re-runs the whole pipeline, so the source file is read
//! again each time. Parsing is skipped when the bytes hash to the same key
//! and format as the table already held. A new upload always invalidates.

use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::data::loader::{self, DataLoadError, FileFormat};
use crate::data::model::MeasurementTable;

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A file on disk, re-read on every run.
    File(PathBuf),
    /// A file picked or dropped by the user, held in memory.
    Upload { name: String, bytes: Arc<[u8]> },
}

impl DataSource {
    /// Human-readable name for status lines.
    pub fn display_name(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Upload { name, .. } => name.clone(),
        }
    }

    fn format_hint(&self) -> String {
        match self {
            DataSource::File(path) => path.to_string_lossy().into_owned(),
            DataSource::Upload { name, .. } => name.clone(),
        }
    }

    fn read(&self) -> Result<Arc<[u8]>, DataLoadError> {
        match self {
            DataSource::File(path) => loader::read_file(path).map(Arc::from),
            DataSource::Upload { bytes, .. } => Ok(Arc::clone(bytes)),
        }
    }
}

/// Compute the SHA256 of a byte buffer as lowercase hex.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Arc<MeasurementTable>,
    /// `true` when the table was parsed on this call rather than reused.
    pub fresh: bool,
}

#[derive(Debug, Default)]
pub struct DatasetCache {
    key: Option<String>,
    table: Option<Arc<MeasurementTable>>,
}

impl DatasetCache {
    /// Return the table for `source`, parsing only when its content changed.
    /// A failed load clears the cache.
    pub fn load(&mut self, source: &DataSource) -> Result<Loaded, DataLoadError> {
        let bytes = match source.read() {
            Ok(bytes) => bytes,
            Err(e) => {
                self.invalidate();
                return Err(e);
            }
        };
        let format = match FileFormat::from_name(&source.format_hint()) {
            Ok(format) => format,
            Err(e) => {
                self.invalidate();
                return Err(e);
            }
        };
        let key = format!("{format:?}:{}", content_hash(&bytes));

        if let (Some(cached), Some(table)) = (&self.key, &self.table) {
            if *cached == key {
                log::debug!("dataset cache hit for {}", source.display_name());
                return Ok(Loaded {
                    table: Arc::clone(table),
                    fresh: false,
                });
            }
        }

        match loader::load_bytes(&source.format_hint(), &bytes) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    table.len(),
                    table.columns,
                    source.display_name()
                );
                let table = Arc::new(table);
                self.key = Some(key);
                self.table = Some(Arc::clone(&table));
                Ok(Loaded { table, fresh: true })
            }
            Err(e) => {
                self.invalidate();
                Err(e)
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.table = None;
    }
}
