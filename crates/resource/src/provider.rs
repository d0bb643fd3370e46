use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Path escapes the document root: {0}")]
    OutsideRoot(String),

    #[error("Failed to read resource '{path}': {message}")]
    ReadFailed { path: String, message: String },
}

/// Reference-counted file contents.
pub type SharedResourceData = Arc<Vec<u8>>;

/// Looks up files relative to a document root.
///
/// Paths are always root-relative and use `/` separators; callers strip any
/// leading slash before asking. Each `load` reads the whole file in one step.
pub trait ResourceProvider: Send + Sync + Debug {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// `true` when `path` names a regular file that can be opened for reading.
    fn is_readable(&self, path: &str) -> bool;

    /// Human-readable provider name for log lines.
    fn name(&self) -> &'static str;
}

/// Serves bytes registered up front. Keys are root-relative paths.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    files: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `data` under `path`, replacing any previous entry.
    pub fn insert(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let path = path.into();
        let mut files = self.files.write().map_err(|_| ResourceError::ReadFailed {
            path: path.clone(),
            message: "resource table lock poisoned".to_string(),
        })?;
        files.insert(path, Arc::new(data));
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert) for fixtures.
    pub fn with_file(self, path: impl Into<String>, data: Vec<u8>) -> Result<Self, ResourceError> {
        self.insert(path, data)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.files.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let files = self.files.read().map_err(|_| ResourceError::ReadFailed {
            path: path.to_string(),
            message: "resource table lock poisoned".to_string(),
        })?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn is_readable(&self, path: &str) -> bool {
        self.files
            .read()
            .map(|f| f.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
