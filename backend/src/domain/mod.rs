//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, the services that implement the driving ports, and the ports
//! themselves. Nothing here depends on actix or Diesel.
//!
//! Public surface:
//! - Places: [`Place`], [`PlaceSummary`], [`NewPlace`], [`PlacePatch`],
//!   [`PlaceCategory`], [`CategoryFilter`], [`PlaceCounts`].
//! - Menus and schedules: [`MenuItem`], [`Schedule`] with lenient parsers.
//! - Comments: [`Comment`], [`NewComment`], [`CommentPatch`].
//! - Ratings: [`PlaceRating`] and the [`RatingAggregator`].
//! - Accounts: [`User`], [`Registration`], [`LoginCredentials`].
//! - Errors: [`Error`] and [`ErrorCode`].

pub mod account_service;
pub mod auth;
pub mod comment;
pub mod comment_service;
pub mod error;
pub(crate) mod identifier;
pub mod menu;
pub mod place;
pub mod place_service;
pub mod ports;
pub mod rating;
pub mod schedule;
pub mod trace_id;
pub mod upload;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthenticatedUser, CredentialsValidationError, DEFAULT_EMAIL_DOMAIN, EmailDomainPolicy,
    LoginCredentials, PasswordHash, Registration,
};
pub use self::comment::{
    Comment, CommentId, CommentPatch, CommentText, CommentValidationError, NewComment,
    parse_rating_text,
};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode};
pub use self::identifier::IdValidationError;
pub use self::menu::{
    MenuEntryProblem, MenuItem, MenuValidationError, Price, parse_menu_text, parse_menu_value,
};
pub use self::place::{
    CategoryFilter, NewPlace, Place, PlaceCategory, PlaceCounts, PlaceId, PlaceName, PlacePatch,
    IMAGE_URL_MAX, PlaceSummary, PlaceValidationError, UnknownCategory, normalise_image_url,
};
pub use self::place_service::PlaceService;
pub use self::rating::{PlaceRating, RatingAggregator, RatingCountOverflow};
pub use self::schedule::Schedule;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::upload::{
    ALLOWED_IMAGE_EXTENSIONS, ImageUpload, UploadFilename, UploadValidationError,
    sanitise_filename,
};
pub use self::user::{DisplayName, EmailAddress, User, UserId, UserValidationError};
