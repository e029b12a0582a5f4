//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.
//!
//! Author names are resolved with a join on `users`; comments are ordered
//! by the `seq` identity column.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, CommentPatch, NewComment, PlaceId};

use super::diesel_error_mapping::{
    COMMENTS_PLACE_FK, COMMENTS_USER_FK, DatabaseFailure, classify_diesel_error,
};
use super::models::{CommentChangeset, CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Build the repository over a connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    DatabaseFailure::from_pool(error)
        .into_basic(CommentRepositoryError::connection, CommentRepositoryError::query)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    classify_diesel_error(error)
        .into_basic(CommentRepositoryError::connection, CommentRepositoryError::query)
}

/// Insert failures additionally distinguish dangling place and user
/// references.
fn map_insert_error(error: diesel::result::Error, comment: &NewComment) -> CommentRepositoryError {
    let failure = classify_diesel_error(error);
    if failure.names(COMMENTS_PLACE_FK) {
        CommentRepositoryError::place_not_found(comment.place_id.to_string())
    } else if failure.names(COMMENTS_USER_FK) {
        CommentRepositoryError::user_not_found(comment.user_id.to_string())
    } else {
        failure.into_basic(CommentRepositoryError::connection, CommentRepositoryError::query)
    }
}

fn row_to_comment((row, user_name): (CommentRow, String)) -> Result<Comment, CommentRepositoryError> {
    row.into_comment(user_name)
        .map_err(CommentRepositoryError::query)
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list_for_place(
        &self,
        place_id: &PlaceId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(CommentRow, String)> = comments::table
            .inner_join(users::table)
            .filter(comments::place_id.eq(place_id.as_uuid()))
            .order(comments::seq)
            .select((CommentRow::as_select(), users::name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_comment).collect()
    }

    async fn create(
        &self,
        id: &CommentId,
        comment: &NewComment,
    ) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewCommentRow {
            id: *id.as_uuid(),
            place_id: *comment.place_id.as_uuid(),
            user_id: *comment.user_id.as_uuid(),
            text: comment.text.as_ref(),
            rating: comment.rating,
        };

        diesel::insert_into(comments::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, comment))
    }

    async fn update(
        &self,
        id: &CommentId,
        patch: &CommentPatch,
    ) -> Result<Option<PlaceId>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = CommentChangeset {
            text: patch.text.as_ref().map(AsRef::as_ref),
            rating: patch.rating,
        };

        let place_id: Option<Uuid> = if changeset.text.is_none() && changeset.rating.is_none() {
            comments::table
                .find(id.as_uuid())
                .select(comments::place_id)
                .first(&mut conn)
                .await
                .optional()
        } else {
            diesel::update(comments::table.find(id.as_uuid()))
                .set(&changeset)
                .returning(comments::place_id)
                .get_result(&mut conn)
                .await
                .optional()
        }
        .map_err(map_diesel_error)?;

        Ok(place_id.map(PlaceId::from_uuid))
    }

    async fn delete(&self, id: &CommentId) -> Result<Option<PlaceId>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let place_id: Option<Uuid> = diesel::delete(comments::table.find(id.as_uuid()))
            .returning(comments::place_id)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(place_id.map(PlaceId::from_uuid))
    }
}
