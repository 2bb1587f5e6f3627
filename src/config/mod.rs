//! Environment-derived service configuration
//!
//! Every knob has a default, so a bare `tally-server` starts against a
//! local PostgreSQL. A `.env` file is honored when present (loaded by the
//! binary before this module reads the environment).

use std::env;

/// Which store backend to run against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL via sqlx (production)
    Postgres,
    /// In-process memory (dev runs without a database; state is lost on exit)
    Memory,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind, `BIND_ADDR` (default `0.0.0.0`)
    pub bind_addr: String,
    /// TCP port, `PORT` (default 3000)
    pub port: u16,
    /// Connection string, `DATABASE_URL`
    pub database_url: String,
    /// Backend selection, `TALLY_STORAGE` = `postgres` | `memory`
    pub storage: StorageBackend,
}

impl Config {
    /// Read configuration from the process environment, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/tally".to_string());
        let storage = match env::var("TALLY_STORAGE").as_deref() {
            Ok("memory") => StorageBackend::Memory,
            Ok("postgres") | Err(_) => StorageBackend::Postgres,
            Ok(other) => {
                tracing::warn!(value = other, "unknown TALLY_STORAGE, using postgres");
                StorageBackend::Postgres
            }
        };

        Self {
            bind_addr,
            port,
            database_url,
            storage,
        }
    }

    /// Socket address string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_joins_host_and_port() {
        let config = Config {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "postgres://localhost/tally".to_string(),
            storage: StorageBackend::Postgres,
        };
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    }
}
