//! Filesystem lookups confined to a document root.
//!
//! Every resolved path must stay inside the root: `..` components and
//! absolute paths are refused, and symlinks are checked after
//! canonicalization.

use crate::provider::{ResourceError, ResourceProvider, SharedResourceData};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Reads files below a directory, typically the web application's public root.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: PathBuf,
    /// Canonical form of `root`, when the directory exists.
    canonical_root: Option<PathBuf>,
}

impl DocumentRoot {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let canonical_root = root.canonicalize().ok();
        if canonical_root.is_none() {
            log::warn!("Document root {} does not exist; image lookups will fail", root.display());
        }
        Self {
            root,
            canonical_root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, ResourceError> {
        let relative = Path::new(path);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if escapes {
            return Err(ResourceError::OutsideRoot(path.to_string()));
        }

        let full = self.root.join(relative);
        match (full.canonicalize(), &self.canonical_root) {
            (Ok(canonical), Some(root)) if canonical.starts_with(root) => Ok(canonical),
            (Ok(_), Some(_)) => Err(ResourceError::OutsideRoot(path.to_string())),
            _ => Err(ResourceError::NotFound(path.to_string())),
        }
    }
}

impl ResourceProvider for DocumentRoot {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full = self.resolve(path)?;
        let read_failed = |e: std::io::Error| match e.kind() {
            ErrorKind::NotFound => ResourceError::NotFound(path.to_string()),
            _ => ResourceError::ReadFailed {
                path: path.to_string(),
                message: e.to_string(),
            },
        };

        let mut file = File::open(&full).map_err(read_failed)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(read_failed)?;
        log::debug!("Loaded {} ({} bytes)", full.display(), bytes.len());
        Ok(Arc::new(bytes))
    }

    fn is_readable(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(full) => full.is_file() && File::open(&full).is_ok(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        "DocumentRoot"
    }
}
