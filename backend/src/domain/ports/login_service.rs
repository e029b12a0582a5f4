//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the user's id and name. Unknown
    /// emails and wrong passwords are indistinguishable `unauthorized`
    /// errors.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser, Error>;
}
