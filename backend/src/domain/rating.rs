//! Rating aggregation for places.
//!
//! A place's `rating` and `num_ratings` are derived state: the arithmetic
//! mean and count of the ratings of every comment currently attached to the
//! place. [`RatingAggregator::recompute`] rebuilds both values from a full
//! scan after every comment mutation. The values are never patched
//! incrementally, so concurrent edits settle on whatever the last scan saw.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use super::ports::{PlaceRatingRepository, PlaceRatingRepositoryError};
use super::{Error, PlaceId};

/// Raised when a place carries more ratings than the counter can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingCountOverflow;

impl fmt::Display for RatingCountOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rating count exceeds u32::MAX")
    }
}

impl std::error::Error for RatingCountOverflow {}

/// Aggregate rating of a place.
///
/// # Examples
/// ```
/// use cuceifoods::domain::PlaceRating;
///
/// let rating = PlaceRating::from_ratings(&[5, 3, 4]).unwrap();
/// assert_eq!(rating.num_ratings(), 3);
/// assert!((rating.rating() - 4.0).abs() < f64::EPSILON);
///
/// assert_eq!(PlaceRating::from_ratings(&[]).unwrap(), PlaceRating::unrated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceRating {
    rating: f64,
    num_ratings: u32,
}

impl PlaceRating {
    /// Rating of a place without comments.
    #[must_use]
    pub const fn unrated() -> Self {
        Self {
            rating: 0.0,
            num_ratings: 0,
        }
    }

    /// Rebuild a stored aggregate without recomputing it.
    #[must_use]
    pub const fn from_stored(rating: f64, num_ratings: u32) -> Self {
        Self {
            rating,
            num_ratings,
        }
    }

    /// Unweighted mean and count of the given comment ratings. No rounding is
    /// applied.
    #[expect(clippy::float_arithmetic, reason = "the mean is a float by definition")]
    pub fn from_ratings(ratings: &[i32]) -> Result<Self, RatingCountOverflow> {
        if ratings.is_empty() {
            return Ok(Self::unrated());
        }
        let num_ratings = u32::try_from(ratings.len()).map_err(|_| RatingCountOverflow)?;
        let total: f64 = ratings.iter().map(|&rating| f64::from(rating)).sum();
        Ok(Self {
            rating: total / f64::from(num_ratings),
            num_ratings,
        })
    }

    /// Mean rating; `0.0` when unrated.
    #[must_use]
    pub const fn rating(&self) -> f64 {
        self.rating
    }

    /// Number of ratings in the mean.
    #[must_use]
    pub const fn num_ratings(&self) -> u32 {
        self.num_ratings
    }
}

impl Default for PlaceRating {
    fn default() -> Self {
        Self::unrated()
    }
}

fn map_repository_error(error: PlaceRatingRepositoryError) -> Error {
    match error {
        PlaceRatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating store unavailable: {message}"))
        }
        PlaceRatingRepositoryError::Query { message } => {
            Error::internal(format!("rating store error: {message}"))
        }
    }
}

/// Recomputes and persists a place's aggregate rating.
pub struct RatingAggregator<R> {
    repository: Arc<R>,
}

impl<R> Clone for RatingAggregator<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> RatingAggregator<R>
where
    R: PlaceRatingRepository,
{
    /// Build an aggregator over the rating store.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Scan every comment rating for the place and store the new aggregate.
    ///
    /// Returns `not_found` without writing when the place does not exist.
    pub async fn recompute(&self, place_id: &PlaceId) -> Result<PlaceRating, Error> {
        let exists = self
            .repository
            .place_exists(place_id)
            .await
            .map_err(map_repository_error)?;
        if !exists {
            return Err(Error::not_found("Place not found"));
        }

        let ratings = self
            .repository
            .comment_ratings(place_id)
            .await
            .map_err(map_repository_error)?;
        debug!(%place_id, scanned = ratings.len(), "recomputing place rating");

        let aggregate = PlaceRating::from_ratings(&ratings)
            .map_err(|error| Error::internal(error.to_string()))?;

        let stored = self
            .repository
            .store_rating(place_id, aggregate)
            .await
            .map_err(map_repository_error)?;
        if !stored {
            return Err(Error::not_found("Place not found"));
        }

        info!(
            %place_id,
            rating = aggregate.rating(),
            num_ratings = aggregate.num_ratings(),
            "place rating recomputed"
        );
        Ok(aggregate)
    }
}
