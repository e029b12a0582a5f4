//! Application settings loaded via OrthoConfig.
//!
//! Values come from `CUCEIFOODS_*` environment variables, an optional
//! configuration file and command-line flags, in increasing precedence.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_EMAIL_DOMAIN, EmailDomainPolicy};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Process-wide settings read once at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CUCEIFOODS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the directory lives in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Directory holding uploaded place images.
    pub upload_dir: Option<PathBuf>,
    /// Institutional domain registrations must belong to.
    pub email_domain: Option<String>,
    /// Skip applying embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Pool size, defaulting when unset.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Upload directory, defaulting to `uploads` under the working directory.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Registration policy for the configured domain.
    #[must_use]
    pub fn email_policy(&self) -> EmailDomainPolicy {
        EmailDomainPolicy::new(
            self.email_domain
                .as_deref()
                .unwrap_or(DEFAULT_EMAIL_DOMAIN),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "CUCEIFOODS_BIND_ADDR",
        "CUCEIFOODS_DATABASE_URL",
        "CUCEIFOODS_POOL_MAX_SIZE",
        "CUCEIFOODS_UPLOAD_DIR",
        "CUCEIFOODS_EMAIL_DOMAIN",
        "CUCEIFOODS_SKIP_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("cuceifoods")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.pool_max_size(), 10);
        assert_eq!(settings.upload_dir(), PathBuf::from("uploads"));
        assert_eq!(settings.email_policy().domain(), "alumnos.udg.mx");
        assert!(!settings.skip_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("CUCEIFOODS_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "CUCEIFOODS_DATABASE_URL",
                Some("postgres://localhost/cuceifoods".to_owned()),
            ),
            ("CUCEIFOODS_POOL_MAX_SIZE", Some("4".to_owned())),
            ("CUCEIFOODS_UPLOAD_DIR", Some("/var/lib/cuceifoods".to_owned())),
            ("CUCEIFOODS_EMAIL_DOMAIN", Some("@Academicos.UDG.mx".to_owned())),
            ("CUCEIFOODS_SKIP_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("configured address").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/cuceifoods")
        );
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.upload_dir(), PathBuf::from("/var/lib/cuceifoods"));
        assert_eq!(settings.email_policy().domain(), "academicos.udg.mx");
        assert!(settings.skip_migrations);
    }

    #[rstest]
    fn malformed_bind_addresses_are_reported() {
        let _guard = lock_env([("CUCEIFOODS_BIND_ADDR", Some("not an address".to_owned()))]);
        let settings = load_from_empty_args();
        assert!(settings.bind_addr().is_err());
    }
}
