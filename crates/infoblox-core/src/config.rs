//! Configuration for connecting to a WAPI endpoint.
//!
//! [`WapiConfig`] carries everything needed to reach one Infoblox grid:
//! the appliance URL, the WAPI version, credentials and TLS settings.

use crate::types::DEFAULT_WAPI_VERSION;
use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Connection configuration for a WAPI client.
///
/// TLS certificate verification is enabled unless explicitly turned off with
/// [`WapiConfig::with_tls_verify`]. The password is never serialized and is
/// redacted from `Debug` output.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct WapiConfig {
    /// Appliance base URL, e.g. `https://infoblox.example.com`
    #[validate(url)]
    pub url: String,

    /// WAPI username
    #[validate(length(min = 1))]
    pub username: String,

    /// WAPI password
    #[serde(skip_serializing)]
    pub password: SecretString,

    /// WAPI version, without the leading `v`
    #[validate(length(min = 1))]
    #[serde(default = "default_version")]
    pub version: String,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to a custom CA certificate (PEM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_version() -> String {
    DEFAULT_WAPI_VERSION.to_string()
}

const fn default_tls_verify() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    crate::client::WAPI_DEFAULT_TIMEOUT
}

impl WapiConfig {
    /// Create a new configuration with required parameters.
    ///
    /// # Arguments
    ///
    /// * `url` - Appliance base URL (e.g. "https://infoblox.example.com")
    /// * `username` - WAPI user
    /// * `password` - WAPI password
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        let config = Self {
            url: url.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            version: default_version(),
            tls_verify: default_tls_verify(),
            tls_ca_cert: None,
            request_timeout_secs: default_request_timeout_secs(),
        };

        config.validated()
    }

    /// Set the WAPI version (e.g. "2.12").
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Set custom CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Run validation and hand the configuration back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Borrow the password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Build the WAPI base URL, `{url}/wapi/v{version}/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL cannot be parsed.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = self.url.trim_end_matches('/');
        let raw = format!("{host}/wapi/v{}/", self.version);
        Url::parse(&raw).map_err(|e| Error::ConfigError(format!("Invalid WAPI URL `{raw}`: {e}")))
    }
}
