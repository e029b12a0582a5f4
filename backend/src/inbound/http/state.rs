//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against in-memory adapters or mocks.

use std::sync::Arc;

use crate::domain::ports::{
    CommentsCommand, CommentsQuery, LoginService, PlacesCommand, PlacesQuery, RegistrationService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Place mutations.
    pub places: Arc<dyn PlacesCommand>,
    /// Place reads.
    pub places_query: Arc<dyn PlacesQuery>,
    /// Comment mutations.
    pub comments: Arc<dyn CommentsCommand>,
    /// Comment reads.
    pub comments_query: Arc<dyn CommentsQuery>,
    /// Credential checks.
    pub login: Arc<dyn LoginService>,
    /// Account creation.
    pub registration: Arc<dyn RegistrationService>,
}
