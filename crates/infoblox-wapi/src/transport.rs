//! Request transport between the client and a WAPI endpoint.

use crate::Result;
use async_trait::async_trait;
use infoblox_core::{Error, HttpMethod};
use reqwest::header::ACCEPT;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

/// A single request, relative to the WAPI base URL.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WapiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

/// Status and raw body of a WAPI response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub(crate) trait WapiTransport: Send + Sync {
    async fn send(&self, request: WapiRequest) -> Result<RawResponse>;
}

/// Transport backed by a `reqwest` session with basic authentication.
pub(crate) struct HttpTransport {
    http: Client,
    base_url: Url,
    username: String,
    password: SecretString,
}

impl HttpTransport {
    pub(crate) fn new(
        http: Client,
        base_url: Url,
        username: String,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            password,
        }
    }

    // Paths are appended, not joined: `record:a` would otherwise parse as a scheme.
    fn build_url(&self, path: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid WAPI path `{path}`: {err}")))
    }
}

#[async_trait]
impl WapiTransport for HttpTransport {
    async fn send(&self, request: WapiRequest) -> Result<RawResponse> {
        let url = self.build_url(&request.path)?;
        let mut builder = self
            .http
            .request(request.method.into(), url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .header(ACCEPT, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            Error::HttpError(format!("Failed to read WAPI response body: {err}"))
        })?;

        Ok(RawResponse { status, body })
    }
}
