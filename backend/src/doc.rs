//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler from the inbound layer plus the
//! schema wrappers for domain types, keeping the domain free of utoipa. The
//! document is served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::accounts::{LoginForm, LoginResponse, RegisterForm};
use crate::inbound::http::comments::{AddCommentForm, CommentBody, UpdateCommentRequest};
use crate::inbound::http::places::{
    CreatePlaceForm, MenuItemBody, PlaceBody, PlaceCountsBody, PlaceSummaryBody,
    UpdatePlaceRequest,
};
use crate::inbound::http::schemas::{CreatedBody, ErrorCodeSchema, ErrorSchema, MessageBody};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CUCEI Foods API",
        description = "Directory of campus food venues with menus, comments and ratings."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::places::list_places,
        crate::inbound::http::places::place_counts,
        crate::inbound::http::places::get_place,
        crate::inbound::http::places::create_place,
        crate::inbound::http::places::update_place,
        crate::inbound::http::places::delete_place,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::add_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::uploads::serve_upload,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageBody,
        CreatedBody,
        MenuItemBody,
        PlaceBody,
        PlaceSummaryBody,
        PlaceCountsBody,
        CreatePlaceForm,
        UpdatePlaceRequest,
        CommentBody,
        AddCommentForm,
        UpdateCommentRequest,
        RegisterForm,
        LoginForm,
        LoginResponse,
    )),
    tags(
        (name = "places", description = "Food venues, their menus and counts"),
        (name = "comments", description = "Reviews that drive each place's rating"),
        (name = "accounts", description = "Registration and stateless login"),
        (name = "uploads", description = "Stored place images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
