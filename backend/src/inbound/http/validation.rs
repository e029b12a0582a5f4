//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{CommentId, Error, IdValidationError, PlaceId, UserId};

/// Validation error codes placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Request field name, as clients spell it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_value_error(field: FieldName, message: impl Into<String>) -> Error {
    field_error(field, ValidationCode::InvalidValue, message)
}

/// Parse a user identifier submitted in a request body.
pub(crate) fn parse_user_id(raw: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| match err {
        IdValidationError::Empty => missing_field_error(field),
        IdValidationError::Malformed => field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
        ),
    })
}

/// Parse a place identifier from the path. Malformed identifiers cannot name
/// a stored place, so they are reported as not found.
pub(crate) fn path_place_id(raw: &str) -> Result<PlaceId, Error> {
    PlaceId::new(raw).map_err(|_| Error::not_found("Place not found"))
}

/// Parse a comment identifier from the path; malformed means not found.
pub(crate) fn path_comment_id(raw: &str) -> Result<CommentId, Error> {
    CommentId::new(raw).map_err(|_| Error::not_found("Comment not found"))
}
