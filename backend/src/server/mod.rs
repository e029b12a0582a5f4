//! Server construction and middleware wiring.

mod config;
pub mod state_builders;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryDirectory;
use state_builders::{diesel_http_state, in_memory_http_state};

/// Build the HTTP state for `config`: PostgreSQL when a pool is attached,
/// a fresh in-memory directory otherwise.
fn build_http_state(config: &ServerConfig) -> HttpState {
    config.db_pool.as_ref().map_or_else(
        || {
            in_memory_http_state(
                Arc::new(InMemoryDirectory::new()),
                config.uploads.clone(),
                config.email_policy.clone(),
            )
        },
        |pool| diesel_http_state(pool, config.uploads.clone(), config.email_policy.clone()),
    )
}

/// Assemble the application: CORS, tracing, the `/api` scope, image route,
/// health checks and, in debug builds, Swagger UI.
#[must_use]
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    with_api_docs(
        App::new()
            .app_data(health_state)
            .app_data(http_state)
            .wrap(Trace)
            .wrap(Cors::permissive())
            .configure(crate::inbound::http::configure)
            .service(ready)
            .service(live),
    )
}

#[cfg(debug_assertions)]
fn with_api_docs<T>(app: App<T>) -> App<T>
where
    T: ServiceFactory<ServiceRequest, Config = (), Error = actix_web::Error, InitError = ()>,
{
    app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(not(debug_assertions))]
const fn with_api_docs<T>(app: App<T>) -> App<T> {
    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let bind_addr = config.bind_addr();
    info!(%bind_addr, database = config.uses_database(), "starting HTTP server");

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use actix_web::http::{Method, StatusCode, header};
    use actix_web::test;

    use super::*;
    use crate::inbound::http::test_utils::test_context;

    #[actix_web::test]
    async fn preflight_requests_are_allowed_from_other_origins() {
        let ctx = test_context();
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            web::Data::new(ctx.state.clone()),
        ))
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/places")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success(), "status {}", res.status());
        assert!(
            res.headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[actix_web::test]
    async fn api_routes_and_health_checks_share_one_app() {
        let ctx = test_context();
        let health = web::Data::new(HealthState::new());
        let app = test::init_service(build_app(
            health.clone(),
            web::Data::new(ctx.state.clone()),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/places")
                .insert_header((header::ORIGIN, "http://localhost:5173"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(
            res.headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );

        let get = |uri: &'static str| test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, get("/health/ready")).await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        health.mark_ready();
        let res = test::call_service(&app, get("/health/ready")).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[cfg(debug_assertions)]
    #[actix_web::test]
    async fn debug_builds_serve_the_openapi_document() {
        let ctx = test_context();
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            web::Data::new(ctx.state.clone()),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api-docs/openapi.json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let doc: serde_json::Value = test::read_body_json(res).await;
        assert!(doc["paths"]["/api/places"].is_object());
    }
}
