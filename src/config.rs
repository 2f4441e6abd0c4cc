use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::session::{Role, SessionContext};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub log_level: String,
    pub session: SessionContext,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read settings from the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("MARKET_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match lookup("MARKET_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("MARKET_HTTP_TIMEOUT_SECS must be a number of seconds, got '{}'", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        // Mirrors what the login screen stores: token, role and user id
        let session = SessionContext {
            token: lookup("MARKET_TOKEN").filter(|t| !t.trim().is_empty()),
            role: lookup("MARKET_ROLE")
                .map(|r| Role::parse(&r))
                .unwrap_or_default(),
            user_id: lookup("MARKET_USER_ID")
                .and_then(|id| id.trim().parse::<u64>().ok())
                .filter(|id| *id > 0),
        };

        Ok(Self {
            api: ApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                timeout: Duration::from_secs(timeout_secs),
            },
            log_level: lookup("MARKET_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.session, SessionContext::anonymous());
    }

    #[test]
    fn reads_session_and_api_settings() {
        let config = config_from(&[
            ("MARKET_API_URL", "https://market.example.edu/"),
            ("MARKET_HTTP_TIMEOUT_SECS", "5"),
            ("MARKET_TOKEN", "abc"),
            ("MARKET_ROLE", "admin"),
            ("MARKET_USER_ID", "17"),
        ])
        .unwrap();

        assert_eq!(config.api.base_url, "https://market.example.edu");
        assert_eq!(config.api.timeout, Duration::from_secs(5));
        assert!(config.session.is_admin());
        assert_eq!(config.session.user_id, Some(17));
        assert!(config.session.is_authenticated());
    }

    #[test]
    fn bad_timeout_is_an_error() {
        assert!(config_from(&[("MARKET_HTTP_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn invalid_user_id_is_ignored() {
        let config = config_from(&[("MARKET_USER_ID", "0")]).unwrap();
        assert_eq!(config.session.user_id, None);
    }
}
