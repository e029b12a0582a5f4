//! Comment HTTP handlers.
//!
//! ```text
//! GET    /api/places/{id}/comments
//! POST   /api/places/{id}/comments
//! PUT    /api/comments/{id}
//! DELETE /api/comments/{id}
//! ```
//!
//! Every mutation returns only after the owning place's rating has been
//! recomputed.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    Comment, CommentPatch, CommentText, CommentValidationError, Error, NewComment,
    parse_rating_text,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::form::FormData;
use crate::inbound::http::schemas::{CreatedBody, ErrorSchema, MessageBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_user_id, path_comment_id, path_place_id,
};

/// Comment as rendered to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentBody {
    /// Comment identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Place identifier.
    #[schema(format = "uuid")]
    pub place_id: String,
    /// Author identifier.
    #[schema(format = "uuid")]
    pub user_id: String,
    /// Author display name.
    pub user_name: String,
    /// Comment body.
    pub text: String,
    /// Rating as submitted.
    pub rating: i32,
}

impl From<Comment> for CommentBody {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id.to_string(),
            place_id: value.place_id.to_string(),
            user_id: value.user_id.to_string(),
            user_name: value.user_name.as_ref().to_owned(),
            text: value.text.as_ref().to_owned(),
            rating: value.rating,
        }
    }
}

/// Form fields accepted when adding a comment.
#[derive(Debug, ToSchema)]
pub struct AddCommentForm {
    /// Author identifier.
    #[schema(format = "uuid")]
    pub user_id: String,
    /// Comment body.
    pub text: String,
    /// Integer text; absent or blank counts as `0`.
    pub rating: Option<String>,
}

/// Patch payload for a comment.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCommentRequest {
    /// Replacement text.
    pub text: Option<String>,
    /// Integer, or a string holding one.
    #[schema(value_type = Option<i32>)]
    pub rating: Option<Value>,
}

const USER_ID: FieldName = FieldName::new("user_id");
const TEXT: FieldName = FieldName::new("text");
const RATING: FieldName = FieldName::new("rating");

fn comment_field_error(field: FieldName, err: &CommentValidationError) -> Error {
    invalid_value_error(field, err.to_string())
}

fn parse_text(raw: &str) -> Result<CommentText, Error> {
    CommentText::new(raw).map_err(|err| comment_field_error(TEXT, &err))
}

fn parse_rating_value(value: &Value) -> Result<Option<i32>, Error> {
    let not_integer = || comment_field_error(RATING, &CommentValidationError::RatingNotInteger);
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_i64()
            .and_then(|rating| i32::try_from(rating).ok())
            .map(Some)
            .ok_or_else(not_integer),
        Value::String(text) => parse_rating_text(Some(text.as_str()))
            .map(Some)
            .map_err(|err| comment_field_error(RATING, &err)),
        _ => Err(not_integer()),
    }
}

fn parse_patch(payload: UpdateCommentRequest) -> Result<CommentPatch, Error> {
    Ok(CommentPatch {
        text: payload.text.as_deref().map(parse_text).transpose()?,
        rating: match payload.rating {
            Some(value) => parse_rating_value(&value)?,
            None => None,
        },
    })
}

/// List a place's comments, oldest first.
#[utoipa::path(
    get,
    path = "/api/places/{id}/comments",
    params(("id" = String, Path, description = "Place identifier")),
    responses(
        (status = 200, description = "Comments", body = Vec<CommentBody>),
        (status = 404, description = "Place not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/places/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CommentBody>>> {
    let place_id = path_place_id(&path)?;
    let comments = state.comments_query.list_comments(&place_id).await?;
    Ok(web::Json(
        comments.into_iter().map(CommentBody::from).collect(),
    ))
}

/// Add a comment and recompute the place's rating.
#[utoipa::path(
    post,
    path = "/api/places/{id}/comments",
    params(("id" = String, Path, description = "Place identifier")),
    request_body(content = AddCommentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Comment added", body = CreatedBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Place or user not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "addComment"
)]
#[post("/places/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: FormData,
) -> ApiResult<HttpResponse> {
    let place_id = path_place_id(&path)?;
    let comment = NewComment {
        place_id,
        user_id: parse_user_id(form.require_text(USER_ID)?, USER_ID)?,
        text: parse_text(form.require_text(TEXT)?)?,
        rating: parse_rating_text(form.text(RATING.as_str()))
            .map_err(|err| comment_field_error(RATING, &err))?,
    };
    let id = state.comments.add_comment(comment).await?;
    Ok(HttpResponse::Created().json(CreatedBody { id: id.to_string() }))
}

/// Patch a comment and recompute its place's rating.
#[utoipa::path(
    put,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    request_body = UpdateCommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = MessageBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateCommentRequest>,
) -> ApiResult<web::Json<MessageBody>> {
    let id = path_comment_id(&path)?;
    let patch = parse_patch(payload.into_inner())?;
    state.comments.update_comment(&id, patch).await?;
    Ok(web::Json(MessageBody::new("Updated")))
}

/// Delete a comment and recompute its former place's rating.
#[utoipa::path(
    delete,
    path = "/api/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment deleted", body = MessageBody),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let id = path_comment_id(&path)?;
    state.comments.delete_comment(&id).await?;
    Ok(web::Json(MessageBody::new("Deleted")))
}

#[cfg(test)]
#[path = "comments_tests.rs"]
mod tests;
