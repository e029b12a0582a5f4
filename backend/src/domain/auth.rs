//! Authentication primitives: login credentials, registration payloads and
//! the institutional email policy.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//!
//! Login is stateless: a successful login returns the user's id and name and
//! nothing else. The client resubmits the id on later actions. This is weak
//! authentication and is kept deliberately.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, EmailAddress, UserId, UserValidationError};

/// Default institutional domain accepted at registration.
pub const DEFAULT_EMAIL_DOMAIN: &str = "alumnos.udg.mx";

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
    /// Name or email failed user validation.
    User(UserValidationError),
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::User(inner) => inner.fmt(f),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. Its shape is not checked
///   so unknown addresses fail as bad credentials rather than validation.
/// - `password` is non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use cuceifoods::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ana@alumnos.udg.mx", "pw").unwrap();
/// assert_eq!(creds.email(), "ana@alumnos.udg.mx");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for the user lookup.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw name/email/password inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        if email.trim().is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            name: DisplayName::new(name)?,
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested display name.
    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Normalised email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password, wiped on drop.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Registration policy restricting accounts to one institutional domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDomainPolicy {
    domain: String,
}

impl EmailDomainPolicy {
    /// Build a policy for the given domain (without the leading `@`).
    #[must_use]
    pub fn new(domain: impl AsRef<str>) -> Self {
        let trimmed = domain.as_ref().trim().trim_start_matches('@');
        Self {
            domain: trimmed.to_lowercase(),
        }
    }

    /// Accepted domain, lowercase and without `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Whether the email belongs to the institutional domain.
    #[must_use]
    pub fn permits(&self, email: &EmailAddress) -> bool {
        email.has_domain(&self.domain)
    }
}

impl Default for EmailDomainPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_DOMAIN)
    }
}

/// Salted password hash in PHC string format. Never holds plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded PHC string produced by a password hasher.
    #[must_use]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account identifier.
    pub user_id: UserId,
    /// Display name shown next to the user's comments.
    pub user_name: DisplayName,
}
