//! Relay configuration read from the process environment.

use std::{env, fmt, time::Duration};

use crate::error::RelayError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

/// Variables holding the upstream credential, checked in order.
pub const CREDENTIAL_VARS: [&str; 2] = ["OPENAI_API_KEY", "OPEN_API"];
/// Prefix every upstream credential carries.
pub const CREDENTIAL_PREFIX: &str = "sk-";

#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub port: u16,
    /// Upstream credential. Missing is not fatal at startup; chat requests report it.
    pub api_key: Option<String>,
    /// Base URL of the completion API, without the `/chat/completions` suffix.
    pub upstream_url: String,
    pub model: String,
    /// Bound on the whole upstream exchange.
    pub timeout: Duration,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from `lookup`, which maps a variable name to its value.
    ///
    /// Empty values count as unset. Unparseable numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = CREDENTIAL_VARS.iter().find_map(|&name| read(name));
        let port = read("PORT")
            .and_then(|raw| parse_or_warn("PORT", &raw))
            .unwrap_or(DEFAULT_PORT);
        let timeout = read("CHAT_RELAY_TIMEOUT_SECS")
            .and_then(|raw| parse_or_warn("CHAT_RELAY_TIMEOUT_SECS", &raw))
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            port,
            api_key,
            upstream_url: read("CHAT_RELAY_UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            model: read("CHAT_RELAY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.upstream_url.trim_end_matches('/'))
    }

    /// Returns the credential, or the configuration error a chat request should report.
    pub fn credential(&self) -> Result<&str, RelayError> {
        let key = self.api_key.as_deref().ok_or(RelayError::MissingCredential)?;
        if !key.starts_with(CREDENTIAL_PREFIX) {
            return Err(RelayError::MalformedCredential);
        }
        Ok(key)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("upstream_url", &self.upstream_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_or_warn<T: std::str::FromStr>(name: &str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        log::warn!("ignoring {name}={raw:?}: not a valid number");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> RelayConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.timeout, Duration::from_secs(25));
        assert_eq!(
            config.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn primary_credential_wins_and_empty_values_fall_through() {
        let both = config(&[("OPENAI_API_KEY", "sk-a"), ("OPEN_API", "sk-b")]);
        assert_eq!(both.api_key.as_deref(), Some("sk-a"));

        let fallback = config(&[("OPENAI_API_KEY", ""), ("OPEN_API", "sk-b")]);
        assert_eq!(fallback.api_key.as_deref(), Some("sk-b"));
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let config = config(&[
            ("PORT", "8080"),
            ("CHAT_RELAY_TIMEOUT_SECS", "soon"),
            ("CHAT_RELAY_UPSTREAM_URL", "http://127.0.0.1:9/v1/"),
        ]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.completions_url(), "http://127.0.0.1:9/v1/chat/completions");
    }

    #[test]
    fn credential_checks_presence_then_prefix() {
        assert!(matches!(
            config(&[]).credential(),
            Err(RelayError::MissingCredential)
        ));
        assert!(matches!(
            config(&[("OPEN_API", "pk-123")]).credential(),
            Err(RelayError::MalformedCredential)
        ));
        assert_eq!(
            config(&[("OPEN_API", "sk-123")]).credential().unwrap(),
            "sk-123"
        );
    }

    #[test]
    fn debug_output_hides_the_key() {
        let rendered = format!("{:?}", config(&[("OPENAI_API_KEY", "sk-secret")]));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
