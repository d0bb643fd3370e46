use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A finished export. Delivering it is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    /// Suggested download name.
    pub filename: String,
    pub page_count: usize,
}

impl ExportedDocument {
    /// Writes the PDF into `dir` under its suggested name.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}
