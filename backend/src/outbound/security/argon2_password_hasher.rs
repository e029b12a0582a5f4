//! `PasswordHasher` producing salted Argon2id PHC strings.
//!
//! Hashing is deliberately slow, so both operations run on the blocking
//! pool. Plaintext copies handed to the worker are zeroised on drop.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as PhcError, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _,
    SaltString,
};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};
use crate::domain::{PasswordHash, TraceId};

/// Argon2id hasher with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Hasher with the default Argon2id parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn hash_blocking(password: &[u8]) -> Result<PasswordHash, PasswordHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    let encoded = Argon2::default()
        .hash_password(password, &salt)
        .map_err(|err| PasswordHasherError::hashing(err.to_string()))?
        .to_string();
    Ok(PasswordHash::from_encoded(encoded))
}

fn verify_blocking(password: &[u8], encoded: &str) -> Result<bool, PasswordHasherError> {
    let parsed =
        PhcHash::new(encoded).map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
    match Argon2::default().verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(PhcError::Password) => Ok(false),
        Err(err) => Err(PasswordHasherError::hashing(err.to_string())),
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let secret = Zeroizing::new(password.as_bytes().to_vec());
        TraceId::spawn_blocking(move || hash_blocking(&secret))
            .await
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let secret = Zeroizing::new(password.as_bytes().to_vec());
        let encoded = hash.as_str().to_owned();
        TraceId::spawn_blocking(move || verify_blocking(&secret, &encoded))
            .await
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?
    }
}
