//! `UploadStore` backed by a capability-scoped directory.
//!
//! All file access goes through a `cap_std::fs::Dir` opened once at startup,
//! so sanitised names can never escape the upload directory. File I/O runs on
//! the blocking pool.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ports::{UploadStore, UploadStoreError};
use crate::domain::{ImageUpload, TraceId, UploadFilename};

/// Upload store rooted at a single directory.
#[derive(Clone)]
pub struct CapStdUploadStore {
    dir: Arc<Dir>,
}

impl CapStdUploadStore {
    /// Open `path`, creating it (and its parents) when missing.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

fn map_io_error(error: io::Error) -> UploadStoreError {
    UploadStoreError::io(error.to_string())
}

#[async_trait]
impl UploadStore for CapStdUploadStore {
    async fn save(&self, upload: ImageUpload) -> Result<(), UploadStoreError> {
        let dir = Arc::clone(&self.dir);
        let ImageUpload { filename, bytes } = upload;
        let size = bytes.len();
        let name = filename.as_ref().to_owned();
        let path = name.clone();
        TraceId::spawn_blocking(move || dir.write(path, bytes))
            .await
            .map_err(|err| UploadStoreError::io(err.to_string()))?
            .map_err(map_io_error)?;
        debug!(filename = %name, size, "image stored");
        Ok(())
    }

    async fn open(&self, filename: &UploadFilename) -> Result<Option<Vec<u8>>, UploadStoreError> {
        let dir = Arc::clone(&self.dir);
        let name = filename.as_ref().to_owned();
        let read = TraceId::spawn_blocking(move || dir.read(&name))
            .await
            .map_err(|err| UploadStoreError::io(err.to_string()))?;
        match read {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(map_io_error(err)),
        }
    }
}
