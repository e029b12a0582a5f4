//! Tests for comment HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{
    create_place, register_and_login, send, test_app, test_context,
};

async fn comment(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    place_id: &str,
    fields: &[(&str, &str)],
) -> (StatusCode, Value) {
    let request = test::TestRequest::post()
        .uri(&format!("/api/places/{place_id}/comments"))
        .set_form(fields);
    send(app, request).await
}

async fn place_rating(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    place_id: &str,
) -> (f64, u64) {
    let (_, body) = send(app, test::TestRequest::get().uri(&format!("/api/places/{place_id}"))).await;
    (
        body["rating"].as_f64().expect("rating"),
        body["num_ratings"].as_u64().expect("num_ratings"),
    )
}

#[actix_web::test]
async fn adding_comments_recomputes_the_mean() {
    let ctx = test_context();
    let app = test::init_service(test_app(ctx.state.clone())).await;
    let place_id = create_place(&app, &[("name", "Tortas"), ("category", "Snacks")]).await;
    let user_id = register_and_login(&app, "Ana", "ana@alumnos.udg.mx").await;

    for (text, rating) in [("Rica", "5"), ("Regular", "3")] {
        let (status, body) = comment(
            &app,
            &place_id,
            &[("user_id", user_id.as_str()), ("text", text), ("rating", rating)],
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_string());
    }
    assert_eq!(place_rating(&app, &place_id).await, (4.0, 2));

    comment(
        &app,
        &place_id,
        &[("user_id", user_id.as_str()), ("text", "Buena"), ("rating", "4")],
    )
    .await;
    assert_eq!(place_rating(&app, &place_id).await, (4.0, 3));

    let (_, listing) = send(&app, test::TestRequest::get().uri("/api/places")).await;
    assert_eq!(listing[0]["latest_comment"], "Buena");
}

#[actix_web::test]
async fn comments_list_oldest_first_with_author_names() {
    let ctx = test_context();
    let app = test::init_service(test_app(ctx.state.clone())).await;
    let place_id = create_place(&app, &[("name", "Tortas"), ("category", "Snacks")]).await;
    let ana = register_and_login(&app, "Ana", "ana@alumnos.udg.mx").await;
    let luis = register_and_login(&app, "Luis", "luis@alumnos.udg.mx").await;

    comment(&app, &place_id, &[("user_id", ana.as_str()), ("text", "Primero")]).await;
    comment(&app, &place_id, &[("user_id", luis.as_str()), ("text", "Segundo"), ("rating", "2")]).await;

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/places/{place_id}/comments")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["text"], "Primero");
    assert_eq!(body[0]["user_name"], "Ana");
    assert_eq!(body[0]["rating"], 0);
    assert_eq!(body[0]["place_id"], place_id.as_str());
    assert_eq!(body[1]["user_id"], luis.as_str());
    assert_eq!(body[1]["rating"], 2);
}

#[rstest]
#[case(&[("text", "Hola")], "user_id", "missing_field")]
#[case(&[("user_id", "nope"), ("text", "Hola")], "user_id", "invalid_uuid")]
#[case(&[("user_id", "00000000-0000-0000-0000-000000000001"), ("text", " ")], "text", "invalid_value")]
#[case(
    &[("user_id", "00000000-0000-0000-0000-000000000001"), ("text", "Hola"), ("rating", "4.5")],
    "rating",
    "invalid_value"
)]
#[actix_web::test]
async fn invalid_comment_forms_are_rejected(
    #[case] fields: &[(&str, &str)],
    #[case] field: &str,
    #[case] code: &str,
) {
    let ctx = test_context();
    let app = test::init_service(test_app(ctx.state.clone())).await;
    let place_id = create_place(&app, &[("name", "Tortas"), ("category", "Snacks")]).await;

    let (status, body) = comment(&app, &place_id, fields).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn unknown_authors_are_not_found() {
    let ctx = test_context();
    let app = test::init_service(test_app(ctx.state.clone())).await;
    let place_id = create_place(&app, &[("name", "Tortas"), ("category", "Snacks")]).await;

    let (status, body) = comment(
        &app,
        &place_id,
        &[("user_id", "00000000-0000-0000-0000-000000000009"), ("text", "Hola")],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
    assert_eq!(place_rating(&app, &place_id).await, (0.0, 0));
}

#[actix_web::test]
async fn patching_a_rating_recomputes_and_accepts_numeric_strings() {
    let ctx = test_context();
    let app = test::init_service(test_app(ctx.state.clone())).await;
    let place_id = create_place(&app, &[("name", "Tortas"), ("category", "Snacks")]).await;
    let user_id = register_and_login(&app, "Ana", "ana@alumnos.udg.mx").await;
    comment(&app, &place_id, &[("user_id", user_id.as_str()), ("text", "Rica"), ("rating", "5")]).await;
    let (_, second) = comment(
        &app,
        &place_id,
        &[("user_id", user_id.as_str()), ("text", "Mala"), ("rating", "1")],
    )
    .await;
    let comment_id = second["id"].as_str().expect("id").to_owned();
    let uri = format!("/api/comments/{comment_id}");

    let (status, body) = send(
        &app,
        test::TestRequest::put().uri(&uri).set_json(json!({"rating": "3"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Updated"}));
    assert_eq!(place_rating(&app, &place_id).await, (4.0, 2));

    let (status, _) = send(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({"rating": 5, "text": "Mejoró"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(place_rating(&app, &place_id).await, (5.0, 2));

    let (status, body) = send(
        &app,
        test::TestRequest::put().uri(&uri).set_json(json!({"rating": 4.5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "rating");
}

#[actix_web::test]
async fn deleting_the_last_comment_resets_the_rating() {
    let ctx = test_context();
    let app = test::init_service(test_app(ctx.state.clone())).await;
    let place_id = create_place(&app, &[("name", "Tortas"), ("category", "Snacks")]).await;
    let user_id = register_and_login(&app, "Ana", "ana@alumnos.udg.mx").await;
    let (_, created) = comment(
        &app,
        &place_id,
        &[("user_id", user_id.as_str()), ("text", "Rica"), ("rating", "5")],
    )
    .await;
    let comment_id = created["id"].as_str().expect("id");

    let (status, body) = send(
        &app,
        test::TestRequest::delete().uri(&format!("/api/comments/{comment_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Deleted"}));
    assert_eq!(place_rating(&app, &place_id).await, (0.0, 0));
}

#[rstest]
#[case("00000000-0000-0000-0000-000000000001")]
#[case("7")]
#[actix_web::test]
async fn missing_comments_are_not_found(#[case] id: &str) {
    let ctx = test_context();
    let app = test::init_service(test_app(ctx.state.clone())).await;
    let uri = format!("/api/comments/{id}");
    let requests = [
        test::TestRequest::put().uri(&uri).set_json(json!({"text": "x"})),
        test::TestRequest::delete().uri(&uri),
    ];
    for request in requests {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Comment not found");
    }
}
