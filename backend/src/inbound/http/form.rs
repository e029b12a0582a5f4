//! Form extractor accepting urlencoded and multipart bodies alike.
//!
//! Handlers that take form input read text fields and optional files from
//! [`FormData`] without caring which encoding the client used. Text fields
//! are capped at [`TEXT_FIELD_LIMIT`] bytes and files at [`FILE_LIMIT`];
//! multipart bodies carry at most [`PART_LIMIT`] parts and
//! [`MULTIPART_LIMIT`] bytes of content in total.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use actix_web::dev::{Payload, UrlEncoded};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::TryStreamExt as _;
use futures_util::future::LocalBoxFuture;
use serde_json::json;

use crate::domain::Error;

use super::validation::{FieldName, missing_field_error};

/// Largest accepted uploaded file.
pub const FILE_LIMIT: usize = 5 * 1024 * 1024;
/// Largest accepted text field, and the whole body for urlencoded forms.
pub const TEXT_FIELD_LIMIT: usize = 64 * 1024;
/// Most parts accepted in one multipart body, named or not.
pub const PART_LIMIT: usize = 16;
/// Largest total part content in one multipart body: one file plus a
/// handful of full-size text fields.
pub const MULTIPART_LIMIT: usize = FILE_LIMIT + 8 * TEXT_FIELD_LIMIT;

/// An uploaded file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFile {
    /// Client-supplied filename, unsanitised.
    pub filename: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Decoded form body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, FormFile>,
}

impl FormData {
    /// Text field value, if submitted.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub(crate) fn require_text(&self, field: FieldName) -> Result<&str, Error> {
        self.text(field.as_str())
            .ok_or_else(|| missing_field_error(field))
    }

    /// Remove and return a file part. Parts without a filename are treated
    /// as absent.
    pub fn take_file(&mut self, name: &str) -> Option<FormFile> {
        self.files.remove(name)
    }
}

fn too_large(field: &str, limit: usize) -> Error {
    Error::invalid_request(format!("{field} exceeds {limit} bytes")).with_details(json!({
        "field": field,
        "code": "payload_too_large",
    }))
}

fn malformed(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("Malformed form body: {reason}"))
        .with_details(json!({ "code": "malformed_form" }))
}

fn too_many_parts() -> Error {
    Error::invalid_request(format!("form has more than {PART_LIMIT} parts"))
        .with_details(json!({ "code": "too_many_parts" }))
}

/// Byte allowance shared by every part of one multipart body.
struct Budget {
    remaining: usize,
}

impl Budget {
    const fn new() -> Self {
        Self {
            remaining: MULTIPART_LIMIT,
        }
    }

    fn spend(&mut self, len: usize) -> Result<(), Error> {
        self.remaining = self
            .remaining
            .checked_sub(len)
            .ok_or_else(|| too_large("form", MULTIPART_LIMIT))?;
        Ok(())
    }
}

async fn read_part(
    field: &mut Field,
    name: &str,
    limit: usize,
    budget: &mut Budget,
) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if bytes.len() + chunk.len() > limit {
            return Err(too_large(name, limit));
        }
        budget.spend(chunk.len())?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormData, Error> {
    let mut form = FormData::default();
    let mut budget = Budget::new();
    let mut parts = 0_usize;
    while let Some(mut field) = multipart.try_next().await.map_err(malformed)? {
        parts += 1;
        if parts > PART_LIMIT {
            return Err(too_many_parts());
        }
        let Some(disposition) = field.content_disposition() else {
            continue;
        };
        let Some(name) = disposition.get_name().map(str::to_owned) else {
            continue;
        };
        let filename = disposition.get_filename().map(str::to_owned);

        match filename {
            Some(filename) => {
                let bytes = read_part(&mut field, &name, FILE_LIMIT, &mut budget).await?;
                if !filename.is_empty() {
                    form.files.insert(name, FormFile { filename, bytes });
                }
            }
            None => {
                let bytes = read_part(&mut field, &name, TEXT_FIELD_LIMIT, &mut budget).await?;
                let text = String::from_utf8(bytes).map_err(|_| {
                    Error::invalid_request(format!("{name} must be UTF-8 text")).with_details(
                        json!({ "field": name, "code": "invalid_encoding" }),
                    )
                })?;
                form.fields.insert(name, text);
            }
        }
    }
    Ok(form)
}

impl FromRequest for FormData {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let request = req.clone();
        let mut body = payload.take();
        Box::pin(async move {
            let content_type = request.content_type().to_ascii_lowercase();
            if content_type.starts_with("multipart/form-data") {
                read_multipart(Multipart::new(request.headers(), body)).await
            } else if content_type == "application/x-www-form-urlencoded" {
                let fields = UrlEncoded::<HashMap<String, String>>::new(&request, &mut body)
                    .limit(TEXT_FIELD_LIMIT)
                    .await
                    .map_err(malformed)?;
                Ok(FormData {
                    fields,
                    files: HashMap::new(),
                })
            } else {
                // No body, or one we do not decode: handlers report the
                // missing fields.
                Ok(FormData::default())
            }
        })
    }
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
