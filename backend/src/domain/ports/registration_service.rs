//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, Registration, UserId};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account. Emails outside the institutional domain are
    /// `invalid_request`; an email already in use is `conflict`.
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;
}
