//! Flat-file storage for uploaded place images.

mod cap_std_upload_store;

pub use cap_std_upload_store::CapStdUploadStore;
