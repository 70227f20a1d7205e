//! Client configuration loaded from environment variables.
//!
//! Every setting has a default, so an embedding shell can start a session
//! with no configuration at all.

use std::path::PathBuf;

use linkup_shared::constants::DEFAULT_PROFILE_BASE_URL;

/// Where the session keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// No store: everything lives in memory and is lost on restart.
    None,
    /// `<platform data dir>/linkup.db`.
    PlatformDefault,
    Path(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Env: `LINKUP_DB_PATH` (unset = no store, `default` = platform dir)
    pub store: StoreLocation,

    /// Prefix of shareable profile links.
    /// Env: `LINKUP_PROFILE_BASE_URL`
    /// Default: `https://linkup.local`
    pub profile_base_url: String,

    /// Whether newly opened rooms start with a sample conversation.
    /// Env: `LINKUP_SEED_MOCK_CHAT` (true/false)
    /// Default: `true`
    pub seed_mock_chat: bool,

    /// Seed for catalog member counts. `None` draws from entropy.
    /// Env: `LINKUP_CATALOG_SEED`
    pub catalog_seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            store: StoreLocation::None,
            profile_base_url: DEFAULT_PROFILE_BASE_URL.to_string(),
            seed_mock_chat: true,
            catalog_seed: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = var("LINKUP_DB_PATH") {
            config.store = match path.trim() {
                "" => StoreLocation::None,
                "default" => StoreLocation::PlatformDefault,
                p => StoreLocation::Path(PathBuf::from(p)),
            };
        }

        if let Some(url) = var("LINKUP_PROFILE_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                tracing::warn!("Empty LINKUP_PROFILE_BASE_URL, using default");
            } else {
                config.profile_base_url = url.to_string();
            }
        }

        if let Some(val) = var("LINKUP_SEED_MOCK_CHAT") {
            config.seed_mock_chat = val != "false" && val != "0";
        }

        if let Some(val) = var("LINKUP_CATALOG_SEED") {
            match val.trim().parse::<u64>() {
                Ok(seed) => config.catalog_seed = Some(seed),
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid LINKUP_CATALOG_SEED, using entropy");
                }
            }
        }

        config
    }

    /// A config for tests and demos: no store, fixed catalog seed.
    pub fn in_memory(seed: u64) -> Self {
        Self {
            catalog_seed: Some(seed),
            ..Self::default()
        }
    }
}
