//! PostgreSQL-backed `PlaceRatingRepository` used by the rating aggregator.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PlaceRatingRepository, PlaceRatingRepositoryError};
use crate::domain::{PlaceId, PlaceRating};

use super::diesel_error_mapping::{DatabaseFailure, classify_diesel_error};
use super::models::PlaceRatingChangeset;
use super::pool::{DbPool, PoolError};
use super::schema::{comments, places};

/// Diesel-backed implementation of the rating repository port.
#[derive(Clone)]
pub struct DieselPlaceRatingRepository {
    pool: DbPool,
}

impl DieselPlaceRatingRepository {
    /// Build the repository over a connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PlaceRatingRepositoryError {
    DatabaseFailure::from_pool(error).into_basic(
        PlaceRatingRepositoryError::connection,
        PlaceRatingRepositoryError::query,
    )
}

fn map_diesel_error(error: diesel::result::Error) -> PlaceRatingRepositoryError {
    classify_diesel_error(error).into_basic(
        PlaceRatingRepositoryError::connection,
        PlaceRatingRepositoryError::query,
    )
}

#[async_trait]
impl PlaceRatingRepository for DieselPlaceRatingRepository {
    async fn place_exists(&self, place_id: &PlaceId) -> Result<bool, PlaceRatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(places::table.find(place_id.as_uuid())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn comment_ratings(
        &self,
        place_id: &PlaceId,
    ) -> Result<Vec<i32>, PlaceRatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        comments::table
            .filter(comments::place_id.eq(place_id.as_uuid()))
            .select(comments::rating)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn store_rating(
        &self,
        place_id: &PlaceId,
        rating: PlaceRating,
    ) -> Result<bool, PlaceRatingRepositoryError> {
        let num_ratings = i32::try_from(rating.num_ratings())
            .map_err(|_| PlaceRatingRepositoryError::query("rating count exceeds column range"))?;
        let changeset = PlaceRatingChangeset {
            rating: rating.rating(),
            num_ratings,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(places::table.find(place_id.as_uuid()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
