//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use linkup_shared::constants::DEFAULT_HTTP_PORT;

/// Path value that selects a throwaway in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file. `:memory:` keeps everything in RAM.
    /// Env: `DATABASE_PATH`
    /// Default: `./linkup.db`
    pub database_path: PathBuf,

    /// Human-readable name for this server instance.
    /// Env: `INSTANCE_NAME`
    /// Default: `"Linkup Node"`
    pub instance_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: PathBuf::from("./linkup.db"),
            instance_name: "Linkup Node".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(
                    value = %addr,
                    "Invalid HTTP_ADDR, using default"
                );
            }
        }

        if let Some(path) = var("DATABASE_PATH") {
            if path.trim().is_empty() {
                tracing::warn!("Empty DATABASE_PATH, using default");
            } else {
                config.database_path = PathBuf::from(path);
            }
        }

        if let Some(name) = var("INSTANCE_NAME") {
            config.instance_name = name;
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.database_path, PathBuf::from("./linkup.db"));
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_env_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "HTTP_ADDR" => Some("127.0.0.1:9000".into()),
            "DATABASE_PATH" => Some(":memory:".into()),
            "INSTANCE_NAME" => Some("Pune chapter".into()),
            _ => None,
        });
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert!(config.is_in_memory());
        assert_eq!(config.instance_name, "Pune chapter");
    }

    #[test]
    fn test_invalid_addr_keeps_default() {
        let config = ServerConfig::from_lookup(|key| match key {
            "HTTP_ADDR" => Some("not an address".into()),
            _ => None,
        });
        assert_eq!(config.http_addr, ServerConfig::default().http_addr);
    }
}
