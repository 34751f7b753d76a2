//! Notification store settings.
//!
//! Only the create, list and mark-read endpoints touch PostgreSQL; socket
//! traffic never does. A create writes one row per accepted recipient, so
//! the pool stays small and a request that cannot get a connection fails
//! before the HTTP timeout cuts it off.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on `max_connections`.
pub const MAX_POOL_SIZE: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` URL of the portal database.
    pub url: String,

    /// Connections kept open while idle. Zero lets a quiet portal hold none.
    #[serde(default)]
    pub min_connections: u32,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection. Must stay below the
    /// server's request timeout.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Checks the URL scheme, the pool bounds and that an acquire gives up
    /// before a request of `request_timeout_secs` would.
    pub fn validate(&self, request_timeout_secs: u64) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__URL"));
        }
        match self.url.split_once("://") {
            Some(("postgres" | "postgresql", rest)) if !rest.is_empty() => {}
            _ => return Err(ValidationError::InvalidDatabaseUrl),
        }
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge(MAX_POOL_SIZE));
        }
        if self.acquire_timeout_secs == 0 || self.acquire_timeout_secs >= request_timeout_secs {
            return Err(ValidationError::AcquireTimeoutTooLong {
                acquire_secs: self.acquire_timeout_secs,
                request_secs: request_timeout_secs,
            });
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: 0,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}
