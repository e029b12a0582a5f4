//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::Value;
use tempfile::TempDir;

use crate::Trace;
use crate::domain::EmailDomainPolicy;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryDirectory;
use crate::outbound::uploads::CapStdUploadStore;
use crate::server::state_builders::in_memory_http_state;

/// In-memory HTTP state plus the upload directory backing it.
///
/// The temporary directory is removed when the context is dropped, so keep
/// the context alive for the duration of the test.
pub struct TestContext {
    /// Services handed to the handlers.
    pub state: HttpState,
    /// Store behind `state`, for direct inspection.
    pub directory: Arc<InMemoryDirectory>,
    /// Upload directory behind `state`.
    pub uploads: TempDir,
}

/// Build a fresh in-memory context using the default email domain.
pub fn test_context() -> TestContext {
    let uploads = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
    let store = CapStdUploadStore::open(uploads.path())
        .unwrap_or_else(|err| panic!("open upload store: {err}"));
    let directory = Arc::new(InMemoryDirectory::new());
    let state = in_memory_http_state(
        Arc::clone(&directory),
        store,
        EmailDomainPolicy::default(),
    );
    TestContext {
        state,
        directory,
        uploads,
    }
}

/// Application with every API route registered over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(crate::inbound::http::configure)
}

/// Encode `parts` as a multipart body. Each part is `(name, filename, bytes)`;
/// parts with a filename are sent as files.
pub fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let boundary = "----cuceifoods-boundary";
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        let disposition = match filename {
            Some(filename) => {
                format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n")
            }
            None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// Send `request` and decode the response body as JSON (`null` when empty).
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: test::TestRequest,
) -> (StatusCode, Value) {
    let res = test::call_service(app, request.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|err| panic!("response body is not JSON: {err}"));
    (status, body)
}

/// Create a place through the form endpoint and return its identifier.
pub async fn create_place(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    fields: &[(&str, &str)],
) -> String {
    let request = test::TestRequest::post().uri("/api/places").set_form(fields);
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"]
        .as_str()
        .unwrap_or_else(|| panic!("created body lacks an id: {body}"))
        .to_owned()
}

/// Register a user and log in, returning the user id.
pub async fn register_and_login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
    email: &str,
) -> String {
    let register = test::TestRequest::post()
        .uri("/api/register")
        .set_form([("name", name), ("email", email), ("password", "secreto")]);
    let (status, body) = send(app, register).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    let login = test::TestRequest::post()
        .uri("/api/login")
        .set_form([("email", email), ("password", "secreto")]);
    let (status, body) = send(app, login).await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["user_id"]
        .as_str()
        .unwrap_or_else(|| panic!("login body lacks user_id: {body}"))
        .to_owned()
}
