//! Driving port for place mutations.

use async_trait::async_trait;

use crate::domain::{Error, ImageUpload, NewPlace, PlaceId, PlacePatch};

/// Place creation request as parsed by an inbound adapter.
///
/// When `image` is present it is stored first and `place.image_url` is
/// replaced with the stored image's public URL.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePlaceRequest {
    /// Place to create.
    pub place: NewPlace,
    /// Optional uploaded image.
    pub image: Option<ImageUpload>,
}

/// Domain use-case port for creating, patching and deleting places.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlacesCommand: Send + Sync {
    /// Create a place with its menu and return its identifier.
    async fn create_place(&self, request: CreatePlaceRequest) -> Result<PlaceId, Error>;

    /// Patch a place; a present menu replaces the existing one.
    async fn update_place(&self, id: &PlaceId, patch: PlacePatch) -> Result<(), Error>;

    /// Delete a place together with its menu and comments.
    async fn delete_place(&self, id: &PlaceId) -> Result<(), Error>;
}
