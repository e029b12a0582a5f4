//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod comments;
pub mod error;
pub mod form;
pub mod health;
pub mod places;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register the `/api` resource handlers.
///
/// `GET /places/counts` is registered ahead of `GET /places/{id}` so the
/// literal segment wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(places::list_places)
        .service(places::place_counts)
        .service(places::get_place)
        .service(places::create_place)
        .service(places::update_place)
        .service(places::delete_place)
        .service(comments::list_comments)
        .service(comments::add_comment)
        .service(comments::update_comment)
        .service(comments::delete_comment)
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout);
}

/// Register the `/api` scope plus the image route with the JSON and query
/// error handlers installed.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(web::scope("/api").configure(configure_api))
        .service(uploads::serve_upload);
}
