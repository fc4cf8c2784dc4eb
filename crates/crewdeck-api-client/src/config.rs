//! Client configuration

/// Session client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the Crewdeck REST API (no trailing slash)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// How long an identical GET is served from the shared in-flight/cached
    /// result instead of re-issued, in milliseconds (default: 2000)
    pub dedup_window_ms: u64,
    /// Cooldown after a settled token refresh during which near-simultaneous
    /// 401s reuse the settled outcome, in milliseconds (default: 500)
    pub refresh_cooldown_ms: u64,
    /// Seconds before the `exp` claim at which the access token is already
    /// treated as expired (default: 5)
    pub expiry_leeway_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            dedup_window_ms: 2000,
            refresh_cooldown_ms: 500,
            expiry_leeway_secs: 5,
        }
    }
}

impl ClientConfig {
    /// Config for the given API base URL, defaults for everything else
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Build a full request URL from an API path (path starts with `/`)
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let config = ClientConfig::new("https://api.example.com");
        assert_eq!(
            config.url("/api/core/tasks/"),
            "https://api.example.com/api/core/tasks/"
        );
    }
}
