//! Sync configuration.
//!
//! A plain value built once at startup and handed to the pipeline; nothing
//! here is global. [`SyncConfig::from_env`] reads the process environment,
//! [`SyncConfig::from_lookup`] takes any key → value source so tests can
//! feed a map instead.

use crate::error::ConfigError;
use ds_core::emitter::ArtifactConfig;
use ds_core::name::KeyStyle;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.figma.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_OUT_DIR: &str = "frontend/src/tokens";
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Clone)]
pub struct SyncConfig {
    pub access_token: Option<String>,
    pub file_key: Option<String>,
    pub api_base: String,
    /// Bound on each request to the design tool.
    pub timeout: Duration,
    pub out_dir: PathBuf,
    pub artifacts: ArtifactConfig,
    pub key_style: KeyStyle,
    /// Shared secret for webhook signatures. `None` disables verification.
    pub webhook_secret: Option<String>,
    /// Fail the run instead of falling back to mock data.
    pub strict_source: bool,
    pub port: u16,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            file_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            artifacts: ArtifactConfig::default(),
            key_style: KeyStyle::default(),
            webhook_secret: None,
            strict_source: false,
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &Option<String>| s.as_ref().map(|_| "<redacted>");
        f.debug_struct("SyncConfig")
            .field("access_token", &redact(&self.access_token))
            .field("file_key", &self.file_key)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("out_dir", &self.out_dir)
            .field("artifacts", &self.artifacts)
            .field("key_style", &self.key_style)
            .field("webhook_secret", &redact(&self.webhook_secret))
            .field("strict_source", &self.strict_source)
            .field("port", &self.port)
            .finish()
    }
}

impl SyncConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup. Unset and blank values keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        config.access_token = get("FIGMA_ACCESS_TOKEN");
        config.file_key = get("FIGMA_FILE_KEY");
        config.webhook_secret = get("FIGMA_WEBHOOK_SECRET");
        if let Some(base) = get("FIGMA_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(secs) = get("FIGMA_TIMEOUT_SECS") {
            let secs: u64 = parse("FIGMA_TIMEOUT_SECS", &secs, "a whole number of seconds")?;
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(dir) = get("TOKENS_OUT_DIR") {
            config.out_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = get("TOKENS_PREFIX") {
            config.artifacts.prefix = validate_prefix(prefix)?;
        }
        if let Some(style) = get("TOKENS_KEY_STYLE") {
            config.key_style = parse("TOKENS_KEY_STYLE", &style, "`camel` or `snake`")?;
        }
        if let Some(strict) = get("SYNC_STRICT_SOURCE") {
            config.strict_source = parse_flag("SYNC_STRICT_SOURCE", &strict)?;
        }
        if let Some(port) = get("PORT") {
            config.port = parse("PORT", &port, "a TCP port")?;
        }

        Ok(config)
    }

    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some() && self.file_key.is_some()
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    value: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
        expected,
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            expected: "a boolean",
        }),
    }
}

/// Prefixes end up in JS identifiers and CSS class names.
fn validate_prefix(prefix: String) -> Result<String, ConfigError> {
    let valid = prefix.starts_with(|c: char| c.is_ascii_lowercase())
        && prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if valid {
        Ok(prefix)
    } else {
        Err(ConfigError::Invalid {
            var: "TOKENS_PREFIX",
            value: prefix,
            expected: "a lowercase ASCII identifier",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<SyncConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SyncConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = from(&[]).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.port, 3001);
        assert_eq!(config.artifacts.prefix, "mep");
        assert_eq!(config.key_style, KeyStyle::Camel);
        assert!(!config.strict_source);
        assert!(!config.has_credentials());
    }

    #[test]
    fn reads_every_variable() {
        let config = from(&[
            ("FIGMA_ACCESS_TOKEN", "figd_secret"),
            ("FIGMA_FILE_KEY", "abc123"),
            ("FIGMA_API_BASE", "http://localhost:9000/v1/"),
            ("FIGMA_TIMEOUT_SECS", "3"),
            ("TOKENS_OUT_DIR", "/tmp/tokens"),
            ("TOKENS_PREFIX", "acme"),
            ("TOKENS_KEY_STYLE", "snake"),
            ("FIGMA_WEBHOOK_SECRET", "shh"),
            ("SYNC_STRICT_SOURCE", "true"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert!(config.has_credentials());
        assert_eq!(config.api_base, "http://localhost:9000/v1");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.out_dir, PathBuf::from("/tmp/tokens"));
        assert_eq!(config.artifacts.prefix, "acme");
        assert_eq!(config.key_style, KeyStyle::Snake);
        assert_eq!(config.webhook_secret.as_deref(), Some("shh"));
        assert!(config.strict_source);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn blank_values_are_unset() {
        let config = from(&[("FIGMA_ACCESS_TOKEN", "  "), ("PORT", "")]).unwrap();
        assert_eq!(config.access_token, None);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            from(&[("PORT", "http")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(from(&[("TOKENS_PREFIX", "My-Prefix")]).is_err());
        assert!(from(&[("TOKENS_KEY_STYLE", "kebab")]).is_err());
        assert!(from(&[("SYNC_STRICT_SOURCE", "maybe")]).is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = from(&[("FIGMA_ACCESS_TOKEN", "figd_secret"), ("FIGMA_WEBHOOK_SECRET", "shh")])
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("figd_secret"));
        assert!(!debug.contains("shh"));
        assert!(debug.contains("<redacted>"));
    }
}
