//! Shared fixtures for the integration tests.
//!
//! Not every test binary uses every helper.
#![expect(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use cuceifoods::Trace;
use cuceifoods::domain::ports::CreatePlaceRequest;
use cuceifoods::domain::{
    EmailDomainPolicy, NewPlace, PlaceCategory, PlaceId, PlaceName, Registration, Schedule, UserId,
};
use cuceifoods::inbound::http::configure;
use cuceifoods::inbound::http::state::HttpState;
use cuceifoods::outbound::memory::InMemoryDirectory;
use cuceifoods::outbound::uploads::CapStdUploadStore;
use cuceifoods::server::state_builders::in_memory_http_state;
use serde_json::Value;
use tempfile::TempDir;

/// In-memory services plus the upload directory behind them.
pub struct Directory {
    pub state: HttpState,
    pub uploads: TempDir,
}

/// Fresh in-memory directory using the default institutional domain.
pub fn in_memory_directory() -> Directory {
    let uploads = tempfile::tempdir().expect("tempdir");
    let store = CapStdUploadStore::open(uploads.path()).expect("open upload store");
    let state = in_memory_http_state(
        Arc::new(InMemoryDirectory::new()),
        store,
        EmailDomainPolicy::default(),
    );
    Directory { state, uploads }
}

/// Create an empty place named `name` directly through the command port.
pub async fn seed_place(state: &HttpState, name: &str, category: PlaceCategory) -> PlaceId {
    let place = NewPlace {
        name: PlaceName::new(name).expect("valid place name"),
        category,
        image_url: None,
        schedule: Schedule::default(),
        menu: Vec::new(),
    };
    state
        .places
        .create_place(CreatePlaceRequest { place, image: None })
        .await
        .expect("create place")
}

/// Register a student account directly through the registration port.
pub async fn seed_user(state: &HttpState, name: &str, email: &str) -> UserId {
    let registration =
        Registration::try_from_parts(name, email, "secreto").expect("valid registration");
    state
        .registration
        .register(&registration)
        .await
        .expect("register user")
}

/// Application serving every route over `state`.
pub fn app(
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
        .configure(configure)
}

/// Send `request` and decode the body as JSON (`null` when empty).
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
    let body = serde_json::from_slice(&bytes).expect("JSON response body");
    (status, body)
}

/// Environment variable naming the PostgreSQL database used by the
/// database-backed suites.
pub const TEST_DATABASE_URL_ENV: &str = "CUCEIFOODS_TEST_DATABASE_URL";

/// The configured test database URL, or `None` after printing a skip marker.
#[expect(clippy::print_stderr, reason = "skip markers are reported on stderr")]
pub fn test_database_url() -> Option<String> {
    match std::env::var(TEST_DATABASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {TEST_DATABASE_URL_ENV} is not set");
            None
        }
    }
}
