//! Comment domain service.
//!
//! Every comment mutation is followed by a full rating recomputation for the
//! owning place before the call returns. The mutation and the recomputation
//! are separate steps; if the recomputation fails the caller sees the error
//! and the next mutation on the place repairs the aggregate.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, CommentsCommand, CommentsQuery,
    PlaceRatingRepository, PlaceRatingRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentId, CommentPatch, Error, NewComment, PlaceId, RatingAggregator,
};

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentRepositoryError::PlaceNotFound { .. } => place_not_found(),
        CommentRepositoryError::UserNotFound { .. } => user_not_found(),
    }
}

fn map_rating_error(error: PlaceRatingRepositoryError) -> Error {
    match error {
        PlaceRatingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("rating repository unavailable: {message}"))
        }
        PlaceRatingRepositoryError::Query { message } => {
            Error::internal(format!("rating repository error: {message}"))
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::internal(format!("unexpected duplicate email during lookup: {email}"))
        }
    }
}

fn place_not_found() -> Error {
    Error::not_found("Place not found")
}

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

fn comment_not_found() -> Error {
    Error::not_found("Comment not found")
}

/// Comment service implementing [`CommentsCommand`] and [`CommentsQuery`].
pub struct CommentService<C, R, U> {
    comments: Arc<C>,
    ratings: Arc<R>,
    users: Arc<U>,
    aggregator: RatingAggregator<R>,
}

impl<C, R, U> CommentService<C, R, U>
where
    R: PlaceRatingRepository,
{
    /// Create a service over the comment, rating and user repositories.
    #[must_use]
    pub fn new(comments: Arc<C>, ratings: Arc<R>, users: Arc<U>) -> Self {
        let aggregator = RatingAggregator::new(Arc::clone(&ratings));
        Self {
            comments,
            ratings,
            users,
            aggregator,
        }
    }

    async fn ensure_place_exists(&self, place_id: &PlaceId) -> Result<(), Error> {
        let exists = self
            .ratings
            .place_exists(place_id)
            .await
            .map_err(map_rating_error)?;
        if exists {
            Ok(())
        } else {
            Err(place_not_found())
        }
    }
}

#[async_trait]
impl<C, R, U> CommentsCommand for CommentService<C, R, U>
where
    C: CommentRepository,
    R: PlaceRatingRepository,
    U: UserRepository,
{
    async fn add_comment(&self, comment: NewComment) -> Result<CommentId, Error> {
        self.ensure_place_exists(&comment.place_id).await?;
        self.users
            .find_by_id(&comment.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(user_not_found)?;

        let id = CommentId::random();
        self.comments
            .create(&id, &comment)
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %id, place_id = %comment.place_id, rating = comment.rating, "comment added");

        self.aggregator.recompute(&comment.place_id).await?;
        Ok(id)
    }

    async fn update_comment(&self, id: &CommentId, patch: CommentPatch) -> Result<(), Error> {
        let place_id = self
            .comments
            .update(id, &patch)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(comment_not_found)?;
        info!(comment_id = %id, %place_id, "comment updated");

        self.aggregator.recompute(&place_id).await?;
        Ok(())
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error> {
        let place_id = self
            .comments
            .delete(id)
            .await
            .map_err(map_comment_error)?
            .ok_or_else(comment_not_found)?;
        info!(comment_id = %id, %place_id, "comment deleted");

        self.aggregator.recompute(&place_id).await?;
        Ok(())
    }
}

#[async_trait]
impl<C, R, U> CommentsQuery for CommentService<C, R, U>
where
    C: CommentRepository,
    R: PlaceRatingRepository,
    U: UserRepository,
{
    async fn list_comments(&self, place_id: &PlaceId) -> Result<Vec<Comment>, Error> {
        self.ensure_place_exists(place_id).await?;
        self.comments
            .list_for_place(place_id)
            .await
            .map_err(map_comment_error)
    }
}

#[cfg(test)]
#[path = "comment_service_tests.rs"]
mod tests;
