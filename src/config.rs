use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

pub const ENV_API_URL: &str = "BROKERAGE_API_URL";
pub const ENV_PAGE_SIZE: &str = "BROKERAGE_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "BROKERAGE_TIMEOUT_SECS";
pub const ENV_SESSION_PATH: &str = "BROKERAGE_SESSION_PATH";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// REST API root, without trailing slash
    pub base_url: String,
    /// Listings requested per page
    pub page_size: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Where the signed-in session is persisted
    pub session_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            page_size: 9,
            timeout_secs: 30,
            user_agent: concat!("brokerage-client/", env!("CARGO_PKG_VERSION")).to_string(),
            session_path: PathBuf::from(".brokerage/session.json"),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `BROKERAGE_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Unparsable numbers keep the
    /// current value.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL) {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => self.page_size = size,
                _ => warn!("Ignoring invalid {}={:?}", ENV_PAGE_SIZE, raw),
            }
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT_SECS, raw),
            }
        }
        if let Some(path) = lookup(ENV_SESSION_PATH) {
            self.session_path = PathBuf::from(path);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = ClientConfig::default().with_overrides(lookup(&[
            (ENV_API_URL, "https://reality.example.cz/api/"),
            (ENV_PAGE_SIZE, "12"),
            (ENV_SESSION_PATH, "/tmp/session.json"),
        ]));

        assert_eq!(config.base_url, "https://reality.example.cz/api");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.session_path, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn invalid_numbers_are_ignored() {
        let config = ClientConfig::default().with_overrides(lookup(&[
            (ENV_PAGE_SIZE, "0"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));

        assert_eq!(config.page_size, 9);
        assert_eq!(config.timeout_secs, 30);
    }
}
