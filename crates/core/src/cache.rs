//! Reusable local tool cache.
//!
//! Entries live at `<root>/<tool>/<key>` with a `<key>.complete` marker
//! file beside the directory. The marker is written only after the
//! payload is fully in place, so a killed process can leave a stale
//! directory but never a visible cache entry - lookups require both.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Marker suffix for completed cache entries.
const COMPLETE_SUFFIX: &str = "complete";

/// Key-value store mapping `(tool, key)` to an installed directory.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl ToolCache {
    /// Open a cache rooted at the given directory.
    ///
    /// Nothing is created until the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default cache root when the runner does not provide one.
    #[must_use]
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("setup-gyro")
    }

    /// The cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a completed entry. Pure lookup: no side effects, no
    /// network. Absence is not an error.
    #[must_use]
    pub fn find(&self, tool: &str, key: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, key);
        if dir.is_dir() && self.marker_path(tool, key).is_file() {
            debug!(path = %dir.display(), "cache hit");
            Some(dir)
        } else {
            None
        }
    }

    /// Commit a directory to the cache under `(tool, key)`.
    ///
    /// Moves `source` into place (falling back to a recursive copy when
    /// the rename crosses filesystems), then writes the completion
    /// marker. Returns the final, relocated path. A stale entry under
    /// the same key is replaced wholesale.
    pub fn write(&self, source: &Path, tool: &str, key: &str) -> Result<PathBuf> {
        let dest = self.entry_dir(tool, key);
        let marker = self.marker_path(tool, key);

        let parent = dest
            .parent()
            .unwrap_or(&self.root);
        fs::create_dir_all(parent).map_err(|e| Error::cache_write(e, parent))?;

        // Replace any stale, incomplete entry from an earlier run.
        if marker.exists() {
            fs::remove_file(&marker).map_err(|e| Error::cache_write(e, &marker))?;
        }
        if dest.exists() {
            fs::remove_dir_all(&dest).map_err(|e| Error::cache_write(e, &dest))?;
        }

        if fs::rename(source, &dest).is_err() {
            copy_dir_all(source, &dest).map_err(|e| Error::cache_write(e, &dest))?;
        }

        fs::write(&marker, b"").map_err(|e| Error::cache_write(e, &marker))?;

        info!(path = %dest.display(), "cache entry committed");
        Ok(dest)
    }

    fn entry_dir(&self, tool: &str, key: &str) -> PathBuf {
        self.root.join(tool).join(key)
    }

    fn marker_path(&self, tool: &str, key: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(format!("{key}.{COMPLETE_SUFFIX}"))
    }
}

/// Recursively copy a directory, preserving file permissions.
fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            // std::fs::copy carries permission bits, which matters for
            // the executables we are caching.
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
