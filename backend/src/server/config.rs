//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::domain::EmailDomainPolicy;
use crate::outbound::persistence::DbPool;
use crate::outbound::uploads::CapStdUploadStore;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) uploads: CapStdUploadStore,
    pub(crate) email_policy: EmailDomainPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration that keeps data in memory until a pool is
    /// attached.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, uploads: CapStdUploadStore) -> Self {
        Self {
            bind_addr,
            uploads,
            email_policy: EmailDomainPolicy::default(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool; every repository then uses
    /// PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Restrict registrations to the given institutional domain.
    #[must_use]
    pub fn with_email_policy(mut self, policy: EmailDomainPolicy) -> Self {
        self.email_policy = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Whether the server will use PostgreSQL rather than memory.
    #[must_use]
    pub fn uses_database(&self) -> bool {
        self.db_pool.is_some()
    }
}
