//! Place domain service.
//!
//! Implements the place driving ports on top of the place repository and the
//! upload store. Images are written before the place row so a failed upload
//! never leaves a place pointing at a missing file.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CreatePlaceRequest, PlaceRepository, PlaceRepositoryError, PlacesCommand, PlacesQuery,
    StoredImage, UploadStore, UploadStoreError,
};
use crate::domain::{
    CategoryFilter, Error, Place, PlaceCounts, PlaceId, PlacePatch, PlaceSummary, UploadFilename,
};

fn map_repository_error(error: PlaceRepositoryError) -> Error {
    match error {
        PlaceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("place repository unavailable: {message}"))
        }
        PlaceRepositoryError::Query { message } => {
            Error::internal(format!("place repository error: {message}"))
        }
    }
}

fn map_upload_error(error: UploadStoreError) -> Error {
    match error {
        UploadStoreError::Io { message } => {
            Error::internal(format!("upload store error: {message}"))
        }
    }
}

fn place_not_found() -> Error {
    Error::not_found("Place not found")
}

/// Place service implementing [`PlacesCommand`] and [`PlacesQuery`].
pub struct PlaceService<P, U> {
    places: Arc<P>,
    uploads: Arc<U>,
}

impl<P, U> PlaceService<P, U> {
    /// Create a service over a place repository and an upload store.
    #[must_use]
    pub const fn new(places: Arc<P>, uploads: Arc<U>) -> Self {
        Self { places, uploads }
    }
}

#[async_trait]
impl<P, U> PlacesCommand for PlaceService<P, U>
where
    P: PlaceRepository,
    U: UploadStore,
{
    async fn create_place(&self, request: CreatePlaceRequest) -> Result<PlaceId, Error> {
        let CreatePlaceRequest { mut place, image } = request;
        if let Some(upload) = image {
            place.image_url = Some(upload.filename.public_url());
            self.uploads.save(upload).await.map_err(map_upload_error)?;
        }

        let id = PlaceId::random();
        self.places
            .create(&id, &place)
            .await
            .map_err(map_repository_error)?;
        info!(place_id = %id, category = %place.category, menu_items = place.menu.len(), "place created");
        Ok(id)
    }

    async fn update_place(&self, id: &PlaceId, patch: PlacePatch) -> Result<(), Error> {
        let replaces_menu = patch.menu.is_some();
        let updated = self
            .places
            .update(id, &patch)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            return Err(place_not_found());
        }
        info!(place_id = %id, replaces_menu, "place updated");
        Ok(())
    }

    async fn delete_place(&self, id: &PlaceId) -> Result<(), Error> {
        let deleted = self
            .places
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(place_not_found());
        }
        info!(place_id = %id, "place deleted");
        Ok(())
    }
}

#[async_trait]
impl<P, U> PlacesQuery for PlaceService<P, U>
where
    P: PlaceRepository,
    U: UploadStore,
{
    async fn list_places(&self, filter: CategoryFilter) -> Result<Vec<PlaceSummary>, Error> {
        self.places
            .list(filter)
            .await
            .map_err(map_repository_error)
    }

    async fn get_place(&self, id: &PlaceId) -> Result<Place, Error> {
        self.places
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(place_not_found)
    }

    async fn place_counts(&self) -> Result<PlaceCounts, Error> {
        self.places.counts().await.map_err(map_repository_error)
    }

    async fn place_image(&self, filename: &str) -> Result<StoredImage, Error> {
        let image_not_found = || Error::not_found("Image not found");
        let name = UploadFilename::from_stored(filename).ok_or_else(image_not_found)?;
        let bytes = self
            .uploads
            .open(&name)
            .await
            .map_err(map_upload_error)?
            .ok_or_else(image_not_found)?;
        Ok(StoredImage {
            content_type: name.content_type(),
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "place_service_tests.rs"]
mod tests;
