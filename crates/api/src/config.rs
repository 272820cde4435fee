//! Client configuration via `scrive.toml`
//!
//! A default `scrive.toml` can be written next to the application; edit it
//! to point the client at another host or to add OAuth credentials.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file name looked up by applications
pub const CONFIG_FILE_NAME: &str = "scrive.toml";

/// Failure to load or store a [`ClientConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config file '{path}': {source}")]
    Io {
        /// File involved
        path: String,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for a [`ClientConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting has an unusable value
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// OAuth 1.0 credentials for personal-access-token authentication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthCredentials {
    /// Client credentials identifier (consumer key)
    pub client_credentials_identifier: String,
    /// Client credentials secret (consumer secret)
    pub client_credentials_secret: String,
    /// Token credentials identifier (access token)
    pub token_credentials_identifier: String,
    /// Token credentials secret (access token secret)
    pub token_credentials_secret: String,
}

/// Client configuration loaded from `scrive.toml`
///
/// # Example
///
/// ```toml
/// api_hostname = "scrive.com"
/// https = true
/// api_version = "v1"
/// timeout_ms = 30000
///
/// # [credentials]
/// # client_credentials_identifier = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Host serving the API
    #[serde(default = "default_hostname")]
    pub api_hostname: String,
    /// Use `https` rather than `http`
    #[serde(default = "default_https")]
    pub https: bool,
    /// API version path segment
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Request timeout handed to the transport, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// OAuth credentials, if the transport signs requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<OAuthCredentials>,
}

fn default_hostname() -> String {
    "scrive.com".to_string()
}

fn default_https() -> bool {
    true
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_hostname: default_hostname(),
            https: default_https(),
            api_version: default_api_version(),
            timeout_ms: default_timeout_ms(),
            credentials: None,
        }
    }
}

impl ClientConfig {
    /// Config for `hostname` with every other setting at its default
    pub fn for_host(hostname: impl Into<String>) -> Self {
        Self {
            api_hostname: hostname.into(),
            ..Self::default()
        }
    }

    /// Full URL of API `path` (e.g. `documents/new`)
    pub fn endpoint(&self, path: &str) -> String {
        let scheme = if self.https { "https" } else { "http" };
        format!(
            "{}://{}/api/{}/{}",
            scheme,
            self.api_hostname,
            self.api_version,
            path.trim_start_matches('/')
        )
    }

    /// Check settings that parse but cannot work
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for an empty hostname or version, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_hostname.trim().is_empty() {
            return Err(ConfigError::Invalid("api_hostname is empty".into()));
        }
        if self.api_version.trim().is_empty() {
            return Err(ConfigError::Invalid("api_version is empty".into()));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Scrive client configuration
#
# Host serving the API, and whether to reach it over https (default: true)
api_hostname = "scrive.com"
https = true

# API version path segment (default: "v1")
api_version = "v1"

# Request timeout in milliseconds (default: 30000)
timeout_ms = 30000

# OAuth credentials of a personal access token.
# Uncomment and fill in to sign requests.
# [credentials]
# client_credentials_identifier = "..."
# client_credentials_secret = "..."
# token_credentials_identifier = "..."
# token_credentials_secret = "..."
"#
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
