//! On-disk scratch area for downloaded coordinate files.
//!
//! Files are keyed by identifier, written once through a temporary file that is
//! atomically renamed into place, and re-read by later requests.

use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Staging {
    dir: PathBuf,
}

impl Staging {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, id: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", id.to_lowercase()))
    }

    /// Return the staged file for `id`, producing its content with `fetch` if absent.
    pub fn stage<F>(&self, id: &str, extension: &str, fetch: F) -> Result<PathBuf>
    where
        F: FnOnce() -> Result<String>,
    {
        let path = self.path_for(id, extension);
        if path.exists() {
            debug!("Using staged file {}", path.display());
            return Ok(path);
        }

        let content = fetch()?;
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        // A concurrent writer for the same id produces identical content
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!("Staged {} bytes at {}", content.len(), path.display());
        Ok(path)
    }
}
