//! Connection settings for the RetroBoard API.

/// Environment variable overriding the server base URL.
pub const URL_ENV: &str = "RETROBOARD_URL";

/// Default server base URL.
const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default path prefix of the API routes.
const DEFAULT_API_PREFIX: &str = "/api";

/// Configuration for the HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server root, without trailing slash
    pub base_url: String,

    /// Path prefix prepended to every endpoint
    pub api_prefix: String,
}

impl ClientConfig {
    /// Create config for the given server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }

    /// Build config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        match std::env::var(URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Full URL for an endpoint path such as `/notes`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
