//! Image file store.
//!
//! Image files live flat in one directory and are keyed by `Image::file_name`.

use crate::error::{DatasetError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read, save, delete and copy operations on a directory of image files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path an image file is stored at.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn exists(&self, file_name: &str) -> bool {
        self.path(file_name).is_file()
    }

    /// Reads the encoded bytes of an image file.
    pub fn read(&self, file_name: &str) -> Result<Vec<u8>> {
        let path = self.path(file_name);
        fs::read(&path).map_err(|source| DatasetError::io(path, source))
    }

    /// Writes an image file, replacing any previous content.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(file_name);
        fs::write(&path, bytes).map_err(|source| DatasetError::io(&path, source))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved image");
        Ok(())
    }

    pub fn delete(&self, file_name: &str) -> Result<()> {
        let path = self.path(file_name);
        fs::remove_file(&path).map_err(|source| DatasetError::io(&path, source))?;
        tracing::debug!(path = %path.display(), "deleted image");
        Ok(())
    }

    /// Copies an image file into `dst_dir` under the same file name.
    ///
    /// Returns the number of bytes copied.
    pub fn copy_to(&self, file_name: &str, dst_dir: impl AsRef<Path>) -> Result<u64> {
        let src = self.path(file_name);
        let dst = dst_dir.as_ref().join(file_name);
        let bytes = fs::copy(&src, &dst).map_err(|source| DatasetError::io(&src, source))?;
        tracing::trace!(src = %src.display(), dst = %dst.display(), "copied image");
        Ok(bytes)
    }
}
