//! Comments: user-authored reviews of a place, each with an integer rating.
//!
//! Ratings are expected to fall in `0..=5` but the range is not enforced;
//! clients own that convention.

use std::fmt;

use super::identifier::define_uuid_id;
use super::{DisplayName, PlaceId, UserId};

define_uuid_id! {
    /// Stable comment identifier stored as a UUID.
    CommentId
}

/// Validation errors for comment fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    /// Text was empty or whitespace.
    EmptyText,
    /// Rating was not an integer.
    RatingNotInteger,
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyText => write!(f, "text must not be empty"),
            Self::RatingNotInteger => write!(f, "rating must be an integer"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Non-blank comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate comment text; blank text is rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self, CommentValidationError> {
        let text = raw.into();
        if text.trim().is_empty() {
            return Err(CommentValidationError::EmptyText);
        }
        Ok(Self(text))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse a rating submitted as form text. A missing rating counts as `0`.
///
/// # Examples
/// ```
/// use cuceifoods::domain::parse_rating_text;
///
/// assert_eq!(parse_rating_text(None), Ok(0));
/// assert_eq!(parse_rating_text(Some(" 4 ")), Ok(4));
/// assert!(parse_rating_text(Some("4.5")).is_err());
/// ```
pub fn parse_rating_text(raw: Option<&str>) -> Result<i32, CommentValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(text) => text
            .parse::<i32>()
            .map_err(|_| CommentValidationError::RatingNotInteger),
    }
}

/// A stored comment with its author's display name resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment identifier.
    pub id: CommentId,
    /// Place the comment belongs to.
    pub place_id: PlaceId,
    /// Author.
    pub user_id: UserId,
    /// Author's display name.
    pub user_name: DisplayName,
    /// Comment body.
    pub text: CommentText,
    /// Rating as submitted. Not range checked.
    pub rating: i32,
}

/// Data required to add a comment to a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Place being reviewed.
    pub place_id: PlaceId,
    /// Author.
    pub user_id: UserId,
    /// Comment body.
    pub text: CommentText,
    /// Rating as submitted.
    pub rating: i32,
}

/// Patch applied by a comment update. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentPatch {
    /// Replacement text.
    pub text: Option<CommentText>,
    /// Replacement rating.
    pub rating: Option<i32>,
}

impl CommentPatch {
    /// Overwrite the fields present in the patch.
    pub fn apply_to(self, comment: &mut Comment) {
        if let Some(text) = self.text {
            comment.text = text;
        }
        if let Some(rating) = self.rating {
            comment.rating = rating;
        }
    }
}
