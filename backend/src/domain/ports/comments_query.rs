//! Driving port for comment reads.

use async_trait::async_trait;

use crate::domain::{Comment, Error, PlaceId};

/// Domain use-case port for reading comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// Comments on a place, oldest first. Unknown places are `not_found`.
    async fn list_comments(&self, place_id: &PlaceId) -> Result<Vec<Comment>, Error>;
}
