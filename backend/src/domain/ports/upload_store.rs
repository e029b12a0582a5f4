//! Port for flat-file image storage.

use async_trait::async_trait;

use crate::domain::{ImageUpload, UploadFilename};

use super::define_port_error;

define_port_error! {
    /// Errors raised by upload store adapters.
    pub enum UploadStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "upload store i/o failed: {message}",
    }
}

/// Stores uploaded images by sanitised filename. Saving an existing name
/// overwrites it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persist an image.
    async fn save(&self, upload: ImageUpload) -> Result<(), UploadStoreError>;

    /// Read an image, or `None` when no file has that name.
    async fn open(&self, filename: &UploadFilename) -> Result<Option<Vec<u8>>, UploadStoreError>;
}
