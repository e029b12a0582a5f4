//! Place HTTP handlers.
//!
//! ```text
//! GET    /api/places?category=
//! GET    /api/places/counts
//! GET    /api/places/{id}
//! POST   /api/places
//! PUT    /api/places/{id}
//! DELETE /api/places/{id}
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CreatePlaceRequest;
use crate::domain::{
    CategoryFilter, Error, ImageUpload, MenuItem, MenuValidationError, NewPlace, Place,
    PlaceCategory, PlaceCounts, PlaceName, PlacePatch, PlaceSummary, PlaceValidationError,
    Schedule, UnknownCategory, UploadFilename, normalise_image_url,
    parse_menu_text, parse_menu_value,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::form::FormData;
use crate::inbound::http::schemas::{CreatedBody, ErrorSchema, MessageBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, path_place_id};

/// Menu entry as rendered to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItemBody {
    /// Menu section label.
    pub category: String,
    /// Dish name.
    pub dish_name: String,
    /// Price.
    pub price: f64,
}

impl From<MenuItem> for MenuItemBody {
    fn from(value: MenuItem) -> Self {
        Self {
            category: value.category().to_owned(),
            dish_name: value.dish_name().to_owned(),
            price: value.price().value(),
        }
    }
}

/// Place detail payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceBody {
    /// Place identifier.
    #[schema(format = "uuid")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Opaque opening-hours document.
    #[schema(value_type = Object)]
    pub schedule: Value,
    /// Category label.
    pub category: String,
    /// Image location; empty when the place has none.
    pub image_url: String,
    /// Menu in submission order.
    pub menu: Vec<MenuItemBody>,
    /// Mean comment rating.
    pub rating: f64,
    /// Number of ratings.
    pub num_ratings: u32,
}

impl From<Place> for PlaceBody {
    fn from(value: Place) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.as_ref().to_owned(),
            schedule: value.schedule.into_value(),
            category: value.category.label().to_owned(),
            image_url: value.image_url.unwrap_or_default(),
            menu: value.menu.into_iter().map(MenuItemBody::from).collect(),
            rating: value.rating.rating(),
            num_ratings: value.rating.num_ratings(),
        }
    }
}

/// Place listing entry: the detail payload plus the newest comment text.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceSummaryBody {
    /// Place detail fields.
    #[serde(flatten)]
    #[schema(inline)]
    pub place: PlaceBody,
    /// Text of the most recent comment, or `""` when there are none.
    pub latest_comment: String,
}

impl From<PlaceSummary> for PlaceSummaryBody {
    fn from(value: PlaceSummary) -> Self {
        Self {
            place: PlaceBody::from(value.place),
            latest_comment: value.latest_comment.unwrap_or_default(),
        }
    }
}

/// Per-category place counts keyed by category label, plus `all`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PlaceCountsBody(pub BTreeMap<String, u64>);

impl From<PlaceCounts> for PlaceCountsBody {
    fn from(value: PlaceCounts) -> Self {
        let mut counts: BTreeMap<String, u64> = PlaceCategory::ALL
            .into_iter()
            .map(|category| (category.label().to_owned(), value.count(category)))
            .collect();
        counts.insert("all".to_owned(), value.all());
        Self(counts)
    }
}

/// Query string accepted by the place listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListPlacesQuery {
    /// Category label, or `all` for no filter.
    pub category: Option<String>,
}

/// Patch payload for a place. Absent and `null` fields are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePlaceRequest {
    /// New name.
    pub name: Option<String>,
    /// New category label.
    pub category: Option<String>,
    /// An empty string removes the image reference.
    pub image_url: Option<String>,
    /// New opening hours, stored verbatim.
    #[schema(value_type = Option<Object>)]
    pub schedule: Option<Value>,
    /// Replaces the whole menu when present.
    #[schema(value_type = Option<Vec<MenuItemBody>>)]
    pub menu: Option<Value>,
}

/// Multipart or urlencoded fields accepted by place creation.
#[derive(Debug, ToSchema)]
pub struct CreatePlaceForm {
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// JSON text; unparseable text becomes `{}`.
    pub schedule: Option<String>,
    /// JSON array text; unparseable text becomes an empty menu.
    pub menu: Option<String>,
    /// Ignored unless the filename carries an allowed image extension.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
    /// Image location used when no file is uploaded.
    pub image_url: Option<String>,
}

const NAME: FieldName = FieldName::new("name");
const CATEGORY: FieldName = FieldName::new("category");
const IMAGE_URL: FieldName = FieldName::new("image_url");
const IMAGE: &str = "image";

fn place_field_error(err: &PlaceValidationError) -> Error {
    let field = match err {
        PlaceValidationError::EmptyName | PlaceValidationError::NameTooLong { .. } => NAME,
        PlaceValidationError::ImageUrlTooLong { .. } => IMAGE_URL,
    };
    invalid_value_error(field, err.to_string())
}

fn category_error(err: &UnknownCategory) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "category",
        "value": err.0,
        "code": "unknown_category",
    }))
}

fn menu_error(err: &MenuValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "menu",
        "index": err.index,
        "code": "invalid_menu_item",
    }))
}

fn parse_category(raw: &str) -> Result<PlaceCategory, Error> {
    raw.parse::<PlaceCategory>()
        .map_err(|err| category_error(&err))
}

fn parse_create_form(mut form: FormData) -> Result<CreatePlaceRequest, Error> {
    let name = PlaceName::new(form.require_text(NAME)?).map_err(|err| place_field_error(&err))?;
    let category = parse_category(form.require_text(CATEGORY)?)?;
    let schedule = form
        .text("schedule")
        .map_or_else(Schedule::default, Schedule::from_text);
    let menu = match form.text("menu") {
        Some(raw) => parse_menu_text(raw).map_err(|err| menu_error(&err))?,
        None => Vec::new(),
    };
    let image_url = match form.text(IMAGE_URL.as_str()) {
        Some(raw) => normalise_image_url(raw).map_err(|err| place_field_error(&err))?,
        None => None,
    };
    let image = form.take_file(IMAGE).and_then(|file| {
        match UploadFilename::from_client(&file.filename) {
            Ok(filename) => Some(ImageUpload {
                filename,
                bytes: file.bytes,
            }),
            Err(err) => {
                debug!(filename = %file.filename, error = %err, "skipping rejected image upload");
                None
            }
        }
    });

    Ok(CreatePlaceRequest {
        place: NewPlace {
            name,
            category,
            image_url,
            schedule,
            menu,
        },
        image,
    })
}

fn parse_patch(payload: UpdatePlaceRequest) -> Result<PlacePatch, Error> {
    Ok(PlacePatch {
        name: payload
            .name
            .map(PlaceName::new)
            .transpose()
            .map_err(|err| place_field_error(&err))?,
        category: payload
            .category
            .as_deref()
            .map(parse_category)
            .transpose()?,
        image_url: payload
            .image_url
            .as_deref()
            .map(normalise_image_url)
            .transpose()
            .map_err(|err| place_field_error(&err))?,
        schedule: payload.schedule.map(Schedule::from_value),
        menu: payload
            .menu
            .as_ref()
            .map(parse_menu_value)
            .transpose()
            .map_err(|err| menu_error(&err))?,
    })
}

/// List places with their menus, rating and latest comment.
#[utoipa::path(
    get,
    path = "/api/places",
    params(ListPlacesQuery),
    responses(
        (status = 200, description = "Places; an unknown category lists none", body = Vec<PlaceSummaryBody>),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "listPlaces"
)]
#[get("/places")]
pub async fn list_places(
    state: web::Data<HttpState>,
    query: web::Query<ListPlacesQuery>,
) -> ApiResult<web::Json<Vec<PlaceSummaryBody>>> {
    let filter = CategoryFilter::parse(query.category.as_deref());
    let places = state.places_query.list_places(filter).await?;
    Ok(web::Json(
        places.into_iter().map(PlaceSummaryBody::from).collect(),
    ))
}

/// Count places per category.
#[utoipa::path(
    get,
    path = "/api/places/counts",
    responses(
        (status = 200, description = "Counts keyed by category label and `all`", body = PlaceCountsBody),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "countPlaces"
)]
#[get("/places/counts")]
pub async fn place_counts(state: web::Data<HttpState>) -> ApiResult<web::Json<PlaceCountsBody>> {
    let counts = state.places_query.place_counts().await?;
    Ok(web::Json(PlaceCountsBody::from(counts)))
}

/// Fetch one place with its menu.
#[utoipa::path(
    get,
    path = "/api/places/{id}",
    params(("id" = String, Path, description = "Place identifier")),
    responses(
        (status = 200, description = "Place", body = PlaceBody),
        (status = 404, description = "Place not found", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "getPlace"
)]
#[get("/places/{id}")]
pub async fn get_place(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlaceBody>> {
    let id = path_place_id(&path)?;
    let place = state.places_query.get_place(&id).await?;
    Ok(web::Json(PlaceBody::from(place)))
}

/// Create a place and its menu, optionally storing an uploaded image.
///
/// An image whose filename has a disallowed extension is skipped.
#[utoipa::path(
    post,
    path = "/api/places",
    request_body(content = CreatePlaceForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Place created", body = CreatedBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "createPlace"
)]
#[post("/places")]
pub async fn create_place(state: web::Data<HttpState>, form: FormData) -> ApiResult<HttpResponse> {
    let request = parse_create_form(form)?;
    let id = state.places.create_place(request).await?;
    Ok(HttpResponse::Created().json(CreatedBody { id: id.to_string() }))
}

/// Patch a place. A present `menu` replaces every existing menu item.
#[utoipa::path(
    put,
    path = "/api/places/{id}",
    params(("id" = String, Path, description = "Place identifier")),
    request_body = UpdatePlaceRequest,
    responses(
        (status = 200, description = "Place updated", body = MessageBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Place not found", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "updatePlace"
)]
#[put("/places/{id}")]
pub async fn update_place(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdatePlaceRequest>,
) -> ApiResult<web::Json<MessageBody>> {
    let id = path_place_id(&path)?;
    let patch = parse_patch(payload.into_inner())?;
    state.places.update_place(&id, patch).await?;
    Ok(web::Json(MessageBody::new("Updated")))
}

/// Delete a place together with its menu and comments.
#[utoipa::path(
    delete,
    path = "/api/places/{id}",
    params(("id" = String, Path, description = "Place identifier")),
    responses(
        (status = 200, description = "Place deleted", body = MessageBody),
        (status = 404, description = "Place not found", body = ErrorSchema)
    ),
    tags = ["places"],
    operation_id = "deletePlace"
)]
#[delete("/places/{id}")]
pub async fn delete_place(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let id = path_place_id(&path)?;
    state.places.delete_place(&id).await?;
    Ok(web::Json(MessageBody::new("Deleted")))
}

#[cfg(test)]
#[path = "places_tests.rs"]
mod tests;
