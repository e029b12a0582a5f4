//! Builders wiring repositories into services and services into
//! [`HttpState`].

use std::sync::Arc;

use crate::domain::ports::{
    CommentRepository, PasswordHasher, PlaceRatingRepository, PlaceRepository, UploadStore,
    UserRepository,
};
use crate::domain::{AccountService, CommentService, EmailDomainPolicy, PlaceService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryDirectory;
use crate::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselPlaceRatingRepository, DieselPlaceRepository,
    DieselUserRepository,
};
use crate::outbound::security::Argon2PasswordHasher;
use crate::outbound::uploads::CapStdUploadStore;

/// Driven adapters backing the directory services.
pub struct DirectoryRepositories<P, C, R, U> {
    /// Place store.
    pub places: Arc<P>,
    /// Comment store.
    pub comments: Arc<C>,
    /// Rating store.
    pub ratings: Arc<R>,
    /// User store.
    pub users: Arc<U>,
}

/// Build the HTTP state from a set of repositories and supporting adapters.
#[must_use]
pub fn build_http_state<P, C, R, U, S, H>(
    repositories: DirectoryRepositories<P, C, R, U>,
    uploads: Arc<S>,
    hasher: Arc<H>,
    policy: EmailDomainPolicy,
) -> HttpState
where
    P: PlaceRepository + 'static,
    C: CommentRepository + 'static,
    R: PlaceRatingRepository + 'static,
    U: UserRepository + 'static,
    S: UploadStore + 'static,
    H: PasswordHasher + 'static,
{
    let DirectoryRepositories {
        places,
        comments,
        ratings,
        users,
    } = repositories;

    let place_service = Arc::new(PlaceService::new(places, uploads));
    let comment_service = Arc::new(CommentService::new(comments, ratings, Arc::clone(&users)));
    let account_service = Arc::new(AccountService::new(users, hasher, policy));

    HttpState {
        places: place_service.clone(),
        places_query: place_service,
        comments: comment_service.clone(),
        comments_query: comment_service,
        login: account_service.clone(),
        registration: account_service,
    }
}

/// HTTP state over a single in-memory directory.
#[must_use]
pub fn in_memory_http_state(
    directory: Arc<InMemoryDirectory>,
    uploads: CapStdUploadStore,
    policy: EmailDomainPolicy,
) -> HttpState {
    build_http_state(
        DirectoryRepositories {
            places: Arc::clone(&directory),
            comments: Arc::clone(&directory),
            ratings: Arc::clone(&directory),
            users: directory,
        },
        Arc::new(uploads),
        Arc::new(Argon2PasswordHasher::new()),
        policy,
    )
}

/// HTTP state backed by PostgreSQL through the shared pool.
#[must_use]
pub fn diesel_http_state(
    pool: &DbPool,
    uploads: CapStdUploadStore,
    policy: EmailDomainPolicy,
) -> HttpState {
    build_http_state(
        DirectoryRepositories {
            places: Arc::new(DieselPlaceRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            ratings: Arc::new(DieselPlaceRatingRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
        },
        Arc::new(uploads),
        Arc::new(Argon2PasswordHasher::new()),
        policy,
    )
}
