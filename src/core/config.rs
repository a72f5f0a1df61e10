//! Configuration management for the engine.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main configuration structure for the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pagination behavior of collection requests.
    pub pagination: PaginationConfig,

    /// Base URL derivation.
    pub base_url: BaseUrlConfig,
}

/// Pagination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size applied when a request carries no page parameters.
    /// `None` leaves such requests unpaginated.
    pub default_page_size: Option<u64>,

    /// Upper bound on the page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: Some(25),
            max_page_size: 100,
        }
    }
}

/// Base URL configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseUrlConfig {
    /// Context path the engine is served under, without surrounding
    /// slashes. Empty when serving from the root.
    pub context_path: String,
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Variables are prefixed with `RESOURCE_ENGINE_`, for example
    /// `RESOURCE_ENGINE_DEFAULT_PAGE_SIZE`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(raw) = std::env::var("RESOURCE_ENGINE_DEFAULT_PAGE_SIZE") {
            match raw.parse::<u64>() {
                Ok(0) => config.pagination.default_page_size = None,
                Ok(size) => config.pagination.default_page_size = Some(size),
                Err(_) => warn!(
                    value = %raw,
                    "ignoring non-numeric RESOURCE_ENGINE_DEFAULT_PAGE_SIZE"
                ),
            }
        }

        if let Ok(raw) = std::env::var("RESOURCE_ENGINE_MAX_PAGE_SIZE") {
            match raw.parse::<u64>() {
                Ok(size) if size > 0 => config.pagination.max_page_size = size,
                _ => warn!(
                    value = %raw,
                    "ignoring invalid RESOURCE_ENGINE_MAX_PAGE_SIZE"
                ),
            }
        }

        if let Ok(path) = std::env::var("RESOURCE_ENGINE_CONTEXT_PATH") {
            config.base_url.context_path = path.trim_matches('/').to_string();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.pagination.default_page_size, Some(25));
        assert_eq!(config.pagination.max_page_size, 100);
        assert!(config.base_url.context_path.is_empty());
    }

    #[test]
    fn test_page_sizes_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("RESOURCE_ENGINE_DEFAULT_PAGE_SIZE", "10");
            std::env::set_var("RESOURCE_ENGINE_MAX_PAGE_SIZE", "50");
        }
        let config = EngineConfig::from_env();
        assert_eq!(config.pagination.default_page_size, Some(10));
        assert_eq!(config.pagination.max_page_size, 50);
        unsafe {
            std::env::remove_var("RESOURCE_ENGINE_DEFAULT_PAGE_SIZE");
            std::env::remove_var("RESOURCE_ENGINE_MAX_PAGE_SIZE");
        }
    }

    #[test]
    fn test_zero_default_page_size_disables_pagination() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("RESOURCE_ENGINE_DEFAULT_PAGE_SIZE", "0");
        }
        let config = EngineConfig::from_env();
        assert_eq!(config.pagination.default_page_size, None);
        unsafe {
            std::env::remove_var("RESOURCE_ENGINE_DEFAULT_PAGE_SIZE");
        }
    }

    #[test]
    fn test_context_path_is_trimmed() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("RESOURCE_ENGINE_CONTEXT_PATH", "/api/v1/");
        }
        let config = EngineConfig::from_env();
        assert_eq!(config.base_url.context_path, "api/v1");
        unsafe {
            std::env::remove_var("RESOURCE_ENGINE_CONTEXT_PATH");
        }
    }
}
