//! Tests for HTTP error mapping.

use actix_web::body::to_bytes;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("Invalid credentials"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("Place not found"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("Email already registered"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_follows_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

async fn render(error: &Error) -> (Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body()).await.expect("body");
    (header, serde_json::from_slice(&bytes).expect("json body"))
}

#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_the_trace_id() {
    let error = Error::internal("connection string leaked")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "secret": "x" }));
    let (header, body) = render(&error).await;

    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({ "code": "internal_error", "message": "Internal server error", "traceId": TRACE_ID })
    );
}

#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::conflict("Email already registered")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "field": "email" }));
    let (_, body) = render(&error).await;

    assert_eq!(body["code"], "conflict");
    assert_eq!(body["message"], "Email already registered");
    assert_eq!(body["details"]["field"], "email");
    assert_eq!(body["traceId"], TRACE_ID);
}

#[actix_web::test]
async fn errors_without_trace_id_omit_the_header() {
    let response = ResponseError::error_response(&Error::not_found("missing"));
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
}

#[derive(serde::Deserialize)]
struct Named {
    #[expect(dead_code, reason = "only deserialised")]
    name: String,
}

async fn echo(_payload: web::Json<Named>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[actix_web::test]
async fn malformed_json_bodies_are_invalid_requests() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/", web::post().to(echo)),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "malformed_json");
}
