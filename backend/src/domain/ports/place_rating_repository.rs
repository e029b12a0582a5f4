//! Port used by the rating aggregator to scan ratings and store aggregates.

use async_trait::async_trait;

use crate::domain::{PlaceId, PlaceRating};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rating repository adapters.
    pub enum PlaceRatingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "rating repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rating repository query failed: {message}",
    }
}

/// Port for scanning comment ratings and storing place aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceRatingRepository: Send + Sync {
    /// Whether the place exists.
    async fn place_exists(&self, place_id: &PlaceId) -> Result<bool, PlaceRatingRepositoryError>;

    /// Every comment rating currently attached to the place.
    async fn comment_ratings(&self, place_id: &PlaceId) -> Result<Vec<i32>, PlaceRatingRepositoryError>;

    /// Overwrite the stored aggregate. Returns `false` when the place is gone.
    async fn store_rating(
        &self,
        place_id: &PlaceId,
        rating: PlaceRating,
    ) -> Result<bool, PlaceRatingRepositoryError>;
}
