//! Driving port for comment mutations.
//!
//! Every successful mutation recomputes the owning place's rating before
//! returning.

use async_trait::async_trait;

use crate::domain::{CommentId, CommentPatch, Error, NewComment};

/// Domain use-case port for adding, patching and deleting comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Add a comment to a place.
    async fn add_comment(&self, comment: NewComment) -> Result<CommentId, Error>;

    /// Patch a comment's text and/or rating.
    async fn update_comment(&self, id: &CommentId, patch: CommentPatch) -> Result<(), Error>;

    /// Delete a comment.
    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error>;
}
