//! Serves stored place images.
//!
//! ```text
//! GET /uploads/{filename}
//! ```

use actix_web::{HttpResponse, get, http::header, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Return an uploaded image with a content type derived from its extension.
#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    params(("filename" = String, Path, description = "Stored image filename")),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 404, description = "Image not found", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "serveUpload"
)]
#[get("/uploads/{filename}")]
pub async fn serve_upload(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let image = state.places_query.place_image(&path).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, image.content_type))
        .body(image.bytes))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    use crate::inbound::http::test_utils::{send, test_app, test_context};

    #[actix_web::test]
    async fn stored_images_are_served_with_their_type() {
        let ctx = test_context();
        std::fs::write(ctx.uploads.path().join("logo.jpeg"), [0xFF, 0xD8, 0xFF])
            .expect("write fixture image");
        let app = test::init_service(test_app(ctx.state.clone())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/uploads/logo.jpeg").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok()),
            Some("image/jpeg")
        );
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), [0xFF, 0xD8, 0xFF]);
    }

    #[rstest]
    #[case("/uploads/missing.png")]
    #[case("/uploads/notes.txt")]
    #[case("/uploads/..%2Fsecret.png")]
    #[actix_web::test]
    async fn unknown_or_unsafe_names_are_not_found(#[case] uri: &str) {
        let ctx = test_context();
        std::fs::write(ctx.uploads.path().join("notes.txt"), b"hello").expect("write fixture");
        let app = test::init_service(test_app(ctx.state.clone())).await;

        let (status, body) = send(&app, test::TestRequest::get().uri(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
}
