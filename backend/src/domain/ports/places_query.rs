//! Driving port for place reads and stored images.

use async_trait::async_trait;

use crate::domain::{CategoryFilter, Error, Place, PlaceCounts, PlaceId, PlaceSummary};

/// Image bytes ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// MIME type derived from the filename.
    pub content_type: &'static str,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Domain use-case port for reading places, counts and images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesQuery: Send + Sync {
    /// List places, optionally filtered by category.
    async fn list_places(&self, filter: CategoryFilter) -> Result<Vec<PlaceSummary>, Error>;

    /// Fetch a place with its menu.
    async fn get_place(&self, id: &PlaceId) -> Result<Place, Error>;

    /// Count places per category.
    async fn place_counts(&self) -> Result<PlaceCounts, Error>;

    /// Read an uploaded place image by its filename.
    async fn place_image(&self, filename: &str) -> Result<StoredImage, Error>;
}
