//! Port for place persistence, including menus and category counts.

use async_trait::async_trait;

use crate::domain::{CategoryFilter, NewPlace, Place, PlaceCounts, PlaceId, PlacePatch, PlaceSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by place repository adapters.
    pub enum PlaceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "place repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "place repository query failed: {message}",
    }
}

/// Port for reading and writing places.
///
/// Adapters own referential integrity: deleting a place must remove its menu
/// items and comments in the same operation, and writes that touch both a
/// place and its menu must be atomic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// List places matching the filter, each with its latest comment text.
    async fn list(&self, filter: CategoryFilter) -> Result<Vec<PlaceSummary>, PlaceRepositoryError>;

    /// Fetch one place with its menu.
    async fn find_by_id(&self, id: &PlaceId) -> Result<Option<Place>, PlaceRepositoryError>;

    /// Insert a place and its menu under the given identifier.
    async fn create(&self, id: &PlaceId, place: &NewPlace) -> Result<(), PlaceRepositoryError>;

    /// Apply a patch. Returns `false` when the place does not exist.
    async fn update(&self, id: &PlaceId, patch: &PlacePatch) -> Result<bool, PlaceRepositoryError>;

    /// Delete a place with its menu and comments. Returns `false` when the
    /// place does not exist.
    async fn delete(&self, id: &PlaceId) -> Result<bool, PlaceRepositoryError>;

    /// Count places per category.
    async fn counts(&self) -> Result<PlaceCounts, PlaceRepositoryError>;
}
