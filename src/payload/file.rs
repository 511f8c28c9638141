//! Transient payload files
//!
//! A `PayloadFile` owns its file on disk: dropping it deletes the file, so
//! every exit path of a batch cleans up. `remove` deletes it explicitly and
//! reports failures.

use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const PAYLOAD_PREFIX: &str = "fast-insert-";
const PAYLOAD_SUFFIX: &str = ".csv";

/// Uniquely named payload file, deleted when dropped
#[derive(Debug)]
pub struct PayloadFile {
    file: NamedTempFile,
}

impl PayloadFile {
    /// Create an empty payload file in `dir` (the OS temp dir by default)
    pub fn create(dir: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PAYLOAD_PREFIX).suffix(PAYLOAD_SUFFIX);

        let file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        tracing::trace!(path = %file.path().display(), "Created payload file");
        Ok(Self { file })
    }

    /// Location of the file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Owned copy of the location, for checks after the file is gone
    pub fn path_buf(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Replace the file content
    pub async fn write_all(&self, payload: &[u8]) -> Result<()> {
        tokio::fs::write(self.path(), payload).await?;
        Ok(())
    }

    /// Delete the file, reporting any failure
    pub fn remove(self) -> Result<()> {
        let path = self.path_buf();
        self.file.close()?;
        tracing::trace!(path = %path.display(), "Removed payload file");
        Ok(())
    }
}
