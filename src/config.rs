use color_eyre::eyre::{Result, eyre};

pub const BACKEND_URL_ENV: &str = "MUSICCLUB_BACKEND_URL";
pub const BOT_URL_ENV: &str = "MUSICCLUB_BOT_URL";
pub const INIT_DATA_ENV: &str = "MUSICCLUB_INIT_DATA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL for the embedder's `ClubApi` transport. Only validated here.
    pub backend_url: String,
    /// Where users are sent when the app is opened outside the chat client.
    pub host_bot_url: String,
    /// Identity blob handed over by the launcher, if any.
    pub init_data: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://backend:6969".to_string(),
            host_bot_url: "https://t.me/cumusicclubbot".to_string(),
            init_data: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            backend_url: lookup(BACKEND_URL_ENV).unwrap_or(defaults.backend_url),
            host_bot_url: lookup(BOT_URL_ENV).unwrap_or(defaults.host_bot_url),
            init_data: lookup(INIT_DATA_ENV).filter(|v| !v.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, url) in [
            (BACKEND_URL_ENV, &self.backend_url),
            (BOT_URL_ENV, &self.host_bot_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(eyre!("{key} must be an http(s) URL, got {url:?}"));
            }
        }
        Ok(())
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).expect("defaults are valid");
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn reads_overrides_and_drops_blank_init_data() {
        let config = ClientConfig::from_lookup(lookup(&[
            (BACKEND_URL_ENV, "https://club.example.org/api"),
            (INIT_DATA_ENV, "   "),
        ]))
        .expect("valid config");
        assert_eq!(config.backend_url, "https://club.example.org/api");
        assert_eq!(config.init_data, None);
    }

    #[test]
    fn rejects_non_http_backend() {
        let err = ClientConfig::from_lookup(lookup(&[(BACKEND_URL_ENV, "backend:6969")]))
            .expect_err("scheme is required");
        assert!(err.to_string().contains(BACKEND_URL_ENV));
    }
}
