//! Configuration module for the card catalog.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;

/// Storage slot holding the serialized collection.
pub const DEFAULT_STORAGE_KEY: &str = "pokemon_card_collection";
/// Roughly the localStorage quota of common browsers.
pub const DEFAULT_MAX_STORAGE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_CATALOG_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/assets/card-placeholder.svg";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Key of the storage slot that holds the collection
    pub storage_key: String,
    /// Largest serialized collection the slot accepts
    pub max_storage_bytes: usize,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the reference species catalog
    pub catalog_url: String,
    /// Number of candidates fetched from the catalog
    pub catalog_limit: usize,
    /// Number of candidates shown per search
    pub candidate_page_size: usize,
    /// Upper bound on a single catalog request
    pub lookup_timeout: Duration,
    /// Image shown whenever a card image is absent or fails to load
    pub placeholder_image: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("CARDS_DB_PATH")
            .unwrap_or_else(|_| "./data/cards.sqlite".to_string())
            .into();

        let storage_key =
            env::var("CARDS_STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string());

        let max_storage_bytes = parse_var("CARDS_MAX_STORAGE_BYTES", DEFAULT_MAX_STORAGE_BYTES)?;

        let bind_addr = parse_var(
            "CARDS_BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 8080)),
        )?;

        let log_level = env::var("CARDS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let catalog_url = env::var("CARDS_CATALOG_URL")
            .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let catalog_limit = parse_var("CARDS_CATALOG_LIMIT", 151)?;
        let candidate_page_size = parse_var("CARDS_CANDIDATE_PAGE_SIZE", 20)?;
        let lookup_timeout = Duration::from_secs(parse_var("CARDS_LOOKUP_TIMEOUT_SECS", 10)?);

        let placeholder_image = env::var("CARDS_PLACEHOLDER_IMAGE")
            .unwrap_or_else(|_| DEFAULT_PLACEHOLDER_IMAGE.to_string());

        Ok(Self {
            db_path,
            storage_key,
            max_storage_bytes,
            bind_addr,
            log_level,
            catalog_url,
            catalog_limit,
            candidate_page_size,
            lookup_timeout,
            placeholder_image,
        })
    }
}

/// Parse an optional environment variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid {} value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment is process-global, so all env assertions live in one test.
    #[test]
    fn test_config_from_env() {
        for name in [
            "CARDS_DB_PATH",
            "CARDS_STORAGE_KEY",
            "CARDS_MAX_STORAGE_BYTES",
            "CARDS_BIND_ADDR",
            "CARDS_LOG_LEVEL",
            "CARDS_CATALOG_URL",
            "CARDS_CATALOG_LIMIT",
            "CARDS_CANDIDATE_PAGE_SIZE",
            "CARDS_LOOKUP_TIMEOUT_SECS",
            "CARDS_PLACEHOLDER_IMAGE",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/cards.sqlite"));
        assert_eq!(config.storage_key, "pokemon_card_collection");
        assert_eq!(config.max_storage_bytes, 5 * 1024 * 1024);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.catalog_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.catalog_limit, 151);
        assert_eq!(config.candidate_page_size, 20);
        assert_eq!(config.lookup_timeout, Duration::from_secs(10));
        assert_eq!(config.placeholder_image, "/assets/card-placeholder.svg");

        env::set_var("CARDS_CATALOG_URL", "http://localhost:9000/api/");
        env::set_var("CARDS_CATALOG_LIMIT", "30");
        let config = Config::from_env().unwrap();
        assert_eq!(config.catalog_url, "http://localhost:9000/api");
        assert_eq!(config.catalog_limit, 30);

        env::set_var("CARDS_BIND_ADDR", "not-an-address");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        env::remove_var("CARDS_CATALOG_URL");
        env::remove_var("CARDS_CATALOG_LIMIT");
        env::remove_var("CARDS_BIND_ADDR");
    }
}
