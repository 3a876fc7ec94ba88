//! Configuration loading from the environment.
//!
//! The relay reads its configuration exactly once at startup. Empty
//! variables are treated as unset, matching the reference deployment where
//! `PROXY_SHARED_SECRET=""` disables the caller guard.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::RelayConfig;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl { value: String, source: url::ParseError },
    InvalidAddress { name: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl { value, source } => {
                write!(f, "Invalid OPENAI_BASE_URL {:?}: {}", value, source)
            }
            ConfigError::InvalidAddress { name, value } => {
                write!(f, "Invalid {} {:?}: expected host:port", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from process environment variables.
pub fn load_from_env() -> Result<RelayConfig, ConfigError> {
    from_lookup(|name| std::env::var(name).ok())
}

/// Build configuration from an arbitrary variable source.
///
/// Split out from [`load_from_env`] so tests can supply variables without
/// mutating process-global state.
pub fn from_lookup<F>(lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = RelayConfig::default();

    if let Some(key) = non_empty(&lookup, "OPENAI_API_KEY") {
        config.upstream.api_key = Some(key);
    }

    if let Some(secret) = non_empty(&lookup, "PROXY_SHARED_SECRET") {
        config.auth.shared_secret = Some(secret);
    }

    if let Some(base) = non_empty(&lookup, "OPENAI_BASE_URL") {
        Url::parse(&base).map_err(|source| ConfigError::InvalidBaseUrl {
            value: base.clone(),
            source,
        })?;
        config.upstream.base_url = base.trim_end_matches('/').to_string();
    }

    if let Some(addr) = non_empty(&lookup, "PROXY_BIND_ADDR") {
        addr.parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddress { name: "PROXY_BIND_ADDR", value: addr.clone() })?;
        config.listener.bind_address = addr;
    }

    if let Some(addr) = non_empty(&lookup, "PROXY_METRICS_ADDR") {
        addr.parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddress { name: "PROXY_METRICS_ADDR", value: addr.clone() })?;
        config.observability.metrics_address = addr;
        config.observability.metrics_enabled = true;
    }

    Ok(config)
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|v| v.to_string())
    }

    #[test]
    fn bare_environment_yields_defaults() {
        let config = from_lookup(|_| None).unwrap();
        assert!(config.upstream.api_key.is_none());
        assert!(config.auth.shared_secret.is_none());
        assert_eq!(config.upstream.base_url, "https://api.openai.com");
    }

    #[test]
    fn empty_values_are_treated_as_unset() {
        let config = from_lookup(lookup(&[
            ("OPENAI_API_KEY", ""),
            ("PROXY_SHARED_SECRET", ""),
        ]))
        .unwrap();
        assert!(config.upstream.api_key.is_none());
        assert!(config.auth.shared_secret.is_none());
    }

    #[test]
    fn base_url_is_normalized_without_trailing_slash() {
        let config = from_lookup(lookup(&[(
            "OPENAI_BASE_URL",
            "https://gateway.internal:8443/",
        )]))
        .unwrap();
        assert_eq!(config.upstream.base_url, "https://gateway.internal:8443");
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let result = from_lookup(lookup(&[("OPENAI_BASE_URL", "not a url")]));
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn metrics_address_enables_the_exporter() {
        let config = from_lookup(lookup(&[("PROXY_METRICS_ADDR", "127.0.0.1:9311")])).unwrap();
        assert!(config.observability.metrics_enabled);
        assert_eq!(config.observability.metrics_address, "127.0.0.1:9311");
    }

    #[test]
    fn malformed_bind_address_is_rejected() {
        let result = from_lookup(lookup(&[("PROXY_BIND_ADDR", "8080")]));
        assert!(matches!(result, Err(ConfigError::InvalidAddress { .. })));
    }
}
