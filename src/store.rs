//! Sources of content records.

use crate::error::ExportError;
use crate::record::ContentRecord;
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Looks up posts by id. `Ok(None)` means the post does not exist; errors are
/// reserved for a store that cannot answer.
pub trait ContentStore: Send + Sync + Debug {
    fn fetch_post(&self, id: u64) -> Result<Option<ContentRecord>, ExportError>;
}

#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    records: RwLock<HashMap<u64, ContentRecord>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: ContentRecord) -> Result<(), ExportError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| ExportError::Store("record map lock poisoned".to_string()))?;
        records.insert(record.id, record);
        Ok(())
    }

    pub fn with_record(self, record: ContentRecord) -> Result<Self, ExportError> {
        self.insert(record)?;
        Ok(self)
    }
}

impl ContentStore for InMemoryContentStore {
    fn fetch_post(&self, id: u64) -> Result<Option<ContentRecord>, ExportError> {
        let records = self
            .records
            .read()
            .map_err(|_| ExportError::Store("record map lock poisoned".to_string()))?;
        Ok(records.get(&id).cloned())
    }
}

/// One `<id>.json` file per post in a directory.
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    dir: PathBuf,
}

impl JsonDirectoryStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn record_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl ContentStore for JsonDirectoryStore {
    fn fetch_post(&self, id: u64) -> Result<Option<ContentRecord>, ExportError> {
        let path = self.record_path(id);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No record file at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(ExportError::Store(format!(
                    "failed to read '{}': {}",
                    path.display(),
                    e
                )));
            }
        };
        let record = ContentRecord::from_json(&json)
            .map_err(|e| ExportError::Store(format!("'{}' is not a valid record: {}", path.display(), e)))?;
        if record.id != id {
            log::warn!(
                "Record file {} carries id {}, expected {}",
                path.display(),
                record.id,
                id
            );
        }
        Ok(Some(record))
    }
}
