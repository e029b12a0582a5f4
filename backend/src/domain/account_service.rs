//! Account domain service: registration and stateless login.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    LoginService, PasswordHasher, PasswordHasherError, RegistrationService, UserAccount,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthenticatedUser, EmailDomainPolicy, Error, LoginCredentials, Registration, User, UserId,
};

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("Email already registered"),
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn invalid_credentials() -> Error {
    Error::unauthorized("Invalid credentials")
}

/// Account service implementing [`RegistrationService`] and [`LoginService`].
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    policy: EmailDomainPolicy,
}

impl<U, H> AccountService<U, H> {
    /// Build the service over a user store and password hasher.
    #[must_use]
    pub const fn new(users: Arc<U>, hasher: Arc<H>, policy: EmailDomainPolicy) -> Self {
        Self {
            users,
            hasher,
            policy,
        }
    }
}

#[async_trait]
impl<U, H> RegistrationService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        if !self.policy.permits(registration.email()) {
            return Err(Error::invalid_request(format!(
                "Email must belong to the @{} domain",
                self.policy.domain()
            ))
            .with_details(serde_json::json!({
                "field": "email",
                "code": "email_domain",
            })));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;
        let id = UserId::random();
        let account = UserAccount {
            user: User::new(id, registration.name().clone(), registration.email().clone()),
            password_hash,
        };
        self.users.create(&account).await.map_err(map_user_error)?;
        info!(user_id = %id, "user registered");
        Ok(id)
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        let Some(account) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(invalid_credentials());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .await
            .map_err(map_hasher_error)?;
        if !verified {
            warn!(user_id = %account.user.id(), "login rejected");
            return Err(invalid_credentials());
        }

        Ok(AuthenticatedUser {
            user_id: *account.user.id(),
            user_name: account.user.name().clone(),
        })
    }
}
