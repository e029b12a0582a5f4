//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`UploadStore`]) are
//! implemented by outbound adapters; driving ports (`*Command`, `*Query`,
//! [`LoginService`], [`RegistrationService`]) are called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod comments_command;
mod comments_query;
mod login_service;
mod password_hasher;
mod place_rating_repository;
mod place_repository;
mod places_command;
mod places_query;
mod registration_service;
mod upload_store;
mod user_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use comments_command::MockCommentsCommand;
pub use comments_command::CommentsCommand;
#[cfg(test)]
pub use comments_query::MockCommentsQuery;
pub use comments_query::CommentsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use place_rating_repository::MockPlaceRatingRepository;
pub use place_rating_repository::{PlaceRatingRepository, PlaceRatingRepositoryError};
#[cfg(test)]
pub use place_repository::MockPlaceRepository;
pub use place_repository::{PlaceRepository, PlaceRepositoryError};
#[cfg(test)]
pub use places_command::MockPlacesCommand;
pub use places_command::{CreatePlaceRequest, PlacesCommand};
#[cfg(test)]
pub use places_query::MockPlacesQuery;
pub use places_query::{PlacesQuery, StoredImage};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use upload_store::MockUploadStore;
pub use upload_store::{UploadStore, UploadStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserAccount, UserPersistenceError, UserRepository};
