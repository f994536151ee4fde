//! Centralized configuration for Cinefind.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

use crate::CinefindError;

/// Central configuration for all Cinefind components.
#[derive(Debug, Clone, Default)]
pub struct CinefindConfig {
    /// Remote movie service access
    pub api: ApiConfig,
    /// Search pipeline tuning
    pub search: SearchConfig,
    /// Local saved-movie store
    pub storage: StorageConfig,
}

/// Remote movie database access.
///
/// The API key is opaque and passed through on every request.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the OMDb-style service
    pub base_url: String,
    /// Caller supplied API key
    pub api_key: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.omdbapi.com/".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            user_agent: "cinefind/0.1.0",
        }
    }
}

/// Search pipeline tuning.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum detail requests in flight during one enrichment
    pub detail_concurrency: usize,
    /// Minimum query length before the wildcard phase is attempted
    pub min_wildcard_len: usize,
    /// Prefixes tried in order once direct and wildcard searches come up empty
    pub fallback_prefixes: Vec<&'static str>,
    /// Minimum normalized similarity for a typo-tolerant title match (0.0-1.0)
    pub similarity_threshold: f64,
    /// Results per remote page
    pub page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            detail_concurrency: 4,
            min_wildcard_len: 3,
            fallback_prefixes: vec!["the ", "a ", ""],
            similarity_threshold: 0.8,
            page_size: 10, // OMDb fixed page size
        }
    }
}

/// Local record storage.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// JSON document holding saved movies
    pub records_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("cinefind-movies.json"),
        }
    }
}

impl CinefindConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparsable values are ignored and the default is kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("CINEFIND_API_KEY").or_else(|_| std::env::var("OMDB_API_KEY"))
            && !key.trim().is_empty()
        {
            config.api.api_key = Some(key.trim().to_string());
        }

        if let Ok(base_url) = std::env::var("CINEFIND_BASE_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("CINEFIND_REQUEST_TIMEOUT")
            && let Ok(seconds) = timeout.parse::<u64>()
        {
            config.api.request_timeout = Duration::from_secs(seconds);
        }

        if let Ok(concurrency) = std::env::var("CINEFIND_DETAIL_CONCURRENCY")
            && let Ok(count) = concurrency.parse::<usize>()
        {
            config.search.detail_concurrency = count;
        }

        if let Ok(threshold) = std::env::var("CINEFIND_SIMILARITY_THRESHOLD")
            && let Ok(value) = threshold.parse::<f64>()
        {
            config.search.similarity_threshold = value.clamp(0.0, 1.0);
        }

        if let Ok(path) = std::env::var("CINEFIND_STORE_PATH") {
            config.storage.records_path = PathBuf::from(path);
        }

        config
    }

    /// Creates a configuration pointed at a local test server.
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.api.base_url = base_url.into();
        config.api.api_key = Some("test-key".to_string());
        config.api.request_timeout = Duration::from_secs(2);
        config
    }

    /// Checks values that would otherwise fail deep inside a request.
    ///
    /// # Errors
    ///
    /// - `CinefindError::Configuration` - If the base URL does not parse or
    ///   detail concurrency is zero
    pub fn validate(&self) -> Result<(), CinefindError> {
        url::Url::parse(&self.api.base_url).map_err(|e| CinefindError::Configuration {
            reason: format!("invalid base URL '{}': {e}", self.api.base_url),
        })?;

        if self.search.detail_concurrency == 0 {
            return Err(CinefindError::Configuration {
                reason: "detail concurrency must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = CinefindConfig::default();

        assert_eq!(config.api.base_url, "https://www.omdbapi.com/");
        assert!(config.api.api_key.is_none());
        assert_eq!(config.search.min_wildcard_len, 3);
        assert_eq!(config.search.fallback_prefixes, vec!["the ", "a ", ""]);
        assert_eq!(config.search.page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CinefindConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = CinefindConfig::default();
        config.search.detail_concurrency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_testing_preset() {
        let config = CinefindConfig::for_testing("http://127.0.0.1:9999");

        assert_eq!(config.api.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.api.api_key.as_deref(), Some("test-key"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("CINEFIND_API_KEY", "abc123");
            std::env::set_var("CINEFIND_REQUEST_TIMEOUT", "3");
            std::env::set_var("CINEFIND_DETAIL_CONCURRENCY", "8");
            std::env::set_var("CINEFIND_SIMILARITY_THRESHOLD", "not-a-number");
        }

        let config = CinefindConfig::from_env();

        assert_eq!(config.api.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.api.request_timeout, Duration::from_secs(3));
        assert_eq!(config.search.detail_concurrency, 8);
        assert_eq!(config.search.similarity_threshold, 0.8);

        // Cleanup
        unsafe {
            std::env::remove_var("CINEFIND_API_KEY");
            std::env::remove_var("CINEFIND_REQUEST_TIMEOUT");
            std::env::remove_var("CINEFIND_DETAIL_CONCURRENCY");
            std::env::remove_var("CINEFIND_SIMILARITY_THRESHOLD");
        }
    }
}
