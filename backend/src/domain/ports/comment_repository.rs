//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, CommentPatch, NewComment, PlaceId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
        /// The referenced place vanished before the write landed.
        PlaceNotFound { place_id: String } => "place {place_id} does not exist",
        /// The referenced user does not exist.
        UserNotFound { user_id: String } => "user {user_id} does not exist",
    }
}

/// Port for reading and writing comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on a place, oldest first, with author names resolved.
    async fn list_for_place(&self, place_id: &PlaceId) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Insert a comment under the given identifier.
    async fn create(&self, id: &CommentId, comment: &NewComment) -> Result<(), CommentRepositoryError>;

    /// Apply a patch and return the owning place, or `None` when the comment
    /// does not exist.
    async fn update(
        &self,
        id: &CommentId,
        patch: &CommentPatch,
    ) -> Result<Option<PlaceId>, CommentRepositoryError>;

    /// Delete a comment and return its former place, or `None` when the
    /// comment does not exist.
    async fn delete(&self, id: &CommentId) -> Result<Option<PlaceId>, CommentRepositoryError>;
}
