//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

/// Default bind address when neither `PORT` nor `SERVER_ADDR` is set
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:5000";

/// Default table holding store rows
const DEFAULT_STORES_TABLE: &str = "stores";

/// Where store records are persisted
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local map, lost on restart
    Memory,
    /// Supabase (PostgREST) table
    Supabase {
        url: String,
        /// Service role key (bypasses RLS - server only!)
        service_role_key: String,
        table: String,
    },
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Supabase { .. } => "supabase",
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Persistence backend
    pub backend: StorageBackend,
    /// Origins allowed on admin routes; empty means any origin
    pub admin_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
        };

        let backend = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            Some("memory") => StorageBackend::Memory,
            Some("supabase") => supabase_backend(&lookup)?,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
            None if lookup("SUPABASE_URL").is_some() => supabase_backend(&lookup)?,
            None => StorageBackend::Memory,
        };

        let admin_origins = lookup("ADMIN_ORIGIN")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(server_addr.clone()))?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            backend,
            admin_origins,
        })
    }
}

fn supabase_backend<F>(lookup: &F) -> Result<StorageBackend, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = lookup("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
    Ok(StorageBackend::Supabase {
        url: url.trim_end_matches('/').to_string(),
        service_role_key: lookup("SUPABASE_SERVICE_ROLE_KEY")
            .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?,
        table: lookup("STORES_TABLE").unwrap_or_else(|| DEFAULT_STORES_TABLE.to_string()),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid server address format: {0}")]
    InvalidAddress(String),

    #[error("Unknown STORE_BACKEND '{0}' (expected 'memory' or 'supabase')")]
    UnknownBackend(String),
}
