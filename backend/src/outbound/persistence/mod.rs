//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; row structs and the table schema stay private to this module.
//! Connections come from a `bb8` pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use cuceifoods::outbound::persistence::{DbPool, DieselPlaceRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cuceifoods")).await?;
//! let places = DieselPlaceRepository::new(pool);
//! ```

mod diesel_comment_repository;
mod diesel_error_mapping;
mod diesel_place_rating_repository;
mod diesel_place_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_place_rating_repository::DieselPlaceRatingRepository;
pub use diesel_place_repository::DieselPlaceRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
