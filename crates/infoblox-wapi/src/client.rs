//! Asynchronous WAPI client implementation.

use crate::models::{
    CreateNetworkRequest, DhcpOption, FixedAddressRequest, GridMember, Network, NetworkFilter,
    NextAvailableIpRequest, NextAvailableIps, RangeRequest, Record, RecordData, RecordFilter,
    RecordPayload, WapiErrorBody, WapiResponse,
};
use crate::transport::{HttpTransport, RawResponse, WapiRequest, WapiTransport};
use crate::Result;
use infoblox_core::client::ClientConfig;
use infoblox_core::{Error, HttpMethod, ObjectRef, RecordType, WapiConfig};
use reqwest::ClientBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("infoblox-wapi/", env!("CARGO_PKG_VERSION"));

/// Builder for [`WapiClient`].
#[derive(Debug)]
pub struct WapiClientBuilder {
    config: WapiConfig,
    http_config: ClientConfig,
}

impl WapiClientBuilder {
    /// Create a new builder from a [`WapiConfig`].
    #[must_use]
    pub fn new(config: WapiConfig) -> Self {
        Self {
            config,
            http_config: ClientConfig::new(),
        }
    }

    /// Override the HTTP client configuration.
    ///
    /// The request timeout always comes from the [`WapiConfig`].
    #[must_use]
    pub fn with_http_config(mut self, http_config: ClientConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Finalise the builder and create the [`WapiClient`].
    ///
    /// The configuration is validated again here, since the `with_*` setters
    /// and deserialization bypass the checks in [`WapiConfig::new`].
    pub fn build(self) -> Result<WapiClient> {
        let config = self.config.validated()?;
        let base_url = config.base_url()?;
        let http_config = self.http_config.with_timeout(config.timeout());

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(http_config.timeout)
            .connect_timeout(http_config.connect_timeout)
            .cookie_store(true);

        if !http_config.enable_compression {
            builder = builder.no_gzip();
        }

        if !config.tls_verify {
            warn!("TLS verification disabled for WAPI client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &config.tls_ca_cert {
            debug!("loading WAPI CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read WAPI CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid WAPI CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build WAPI HTTP client: {err}"))
        })?;

        let WapiConfig {
            username, password, ..
        } = config;
        let transport = HttpTransport::new(http, base_url.clone(), username, password);

        Ok(WapiClient {
            transport: Box::new(transport),
            base_url,
        })
    }
}

/// Asynchronous client for the Infoblox WAPI.
///
/// Each operation issues its requests strictly one after another. The client
/// owns its HTTP session (including the WAPI auth cookie) and is not meant
/// to be shared between tasks without external coordination.
pub struct WapiClient {
    transport: Box<dyn WapiTransport>,
    base_url: Url,
}

impl fmt::Debug for WapiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WapiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl WapiClient {
    /// Connect to `hostname` with the default WAPI version.
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::from_config(WapiConfig::new(hostname, username, password)?)
    }

    /// Construct a client directly from the configuration.
    pub fn from_config(config: WapiConfig) -> Result<Self> {
        WapiClientBuilder::new(config).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: WapiConfig) -> WapiClientBuilder {
        WapiClientBuilder::new(config)
    }

    #[cfg(test)]
    pub(crate) fn with_transport(base_url: Url, transport: Box<dyn WapiTransport>) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// Access the WAPI base URL, `{hostname}/wapi/v{version}/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue one request against `path` and interpret the response.
    ///
    /// `path` is relative to the base URL and may carry a query string. The
    /// payload is sent as the JSON body, except for `DELETE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RemoteApi`] for any status other than 200 or 201,
    /// [`Error::MalformedResponse`] when a body cannot be decoded, and the
    /// transport errors from the underlying HTTP call.
    pub async fn execute<B>(
        &self,
        path: &str,
        payload: &B,
        method: HttpMethod,
    ) -> Result<WapiResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = if method.sends_body() {
            Some(serde_json::to_value(payload).map_err(|err| {
                Error::InvalidArgument(format!("Failed to serialize payload for `{path}`: {err}"))
            })?)
        } else {
            None
        };

        info!(%method, path, "WAPI request");
        let raw = self
            .transport
            .send(WapiRequest {
                method,
                path: path.to_string(),
                body,
            })
            .await?;
        debug!(status = raw.status, path, "WAPI response");

        interpret_response(path, raw)
    }

    /// Return the networks matching `cidr`.
    pub async fn get_network(&self, cidr: &str) -> Result<Vec<Network>> {
        let filter = NetworkFilter {
            network: cidr.to_string(),
        };
        self.get_json("network", &filter).await
    }

    /// Create a network, optionally served by `grid_member` and with DHCP
    /// option overrides.
    pub async fn create_network(
        &self,
        cidr: &str,
        grid_member: Option<&str>,
        options: &[DhcpOption],
    ) -> Result<WapiResponse> {
        let request = CreateNetworkRequest::new(cidr, grid_member, options);
        self.execute("network", &request, HttpMethod::Post).await
    }

    /// Return the records of `record_type` named `name`.
    ///
    /// `record_type` is matched case-insensitively against the supported set.
    pub async fn get_record(
        &self,
        name: &str,
        record_type: impl AsRef<str>,
    ) -> Result<Vec<Record>> {
        let record_type: RecordType = record_type.as_ref().parse()?;
        let filter = RecordFilter {
            name: name.to_string(),
        };
        self.get_json(record_type.object_type(), &filter).await
    }

    /// Create a DNS record.
    ///
    /// MX and SRV records take [`RecordData::Fields`] (see [`RecordData::mx`]
    /// and [`RecordData::srv`]); every other type takes a single value.
    pub async fn create_record(
        &self,
        record_type: impl AsRef<str>,
        name: &str,
        data: impl Into<RecordData>,
    ) -> Result<WapiResponse> {
        let record_type: RecordType = record_type.as_ref().parse()?;
        let payload = RecordPayload::build(record_type, name, data.into())?;
        self.execute(record_type.object_type(), &payload, HttpMethod::Post)
            .await
    }

    /// Delete the first record of `record_type` named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] without issuing a delete when the
    /// lookup finds nothing.
    pub async fn delete_record(
        &self,
        name: &str,
        record_type: impl AsRef<str>,
    ) -> Result<WapiResponse> {
        let record_type = record_type.as_ref();
        let record = self
            .get_record(name, record_type)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::RecordNotFound(format!("Unable to delete {record_type} {name}"))
            })?;

        self.delete_object(&record.object_ref).await
    }

    /// Delete an object by its reference.
    pub async fn delete_object(&self, object_ref: &ObjectRef) -> Result<WapiResponse> {
        self.execute(object_ref.as_str(), &json!({}), HttpMethod::Delete)
            .await
    }

    /// Create a fixed (static) address binding `ip` to `mac`.
    pub async fn create_fixed_address(
        &self,
        hostname: &str,
        ip: &str,
        mac: &str,
        comment: &str,
    ) -> Result<WapiResponse> {
        let request = FixedAddressRequest {
            name: hostname.to_string(),
            ipv4addr: ip.to_string(),
            mac: mac.to_string(),
            comment: comment.to_string(),
        };
        self.execute("fixedaddress", &request, HttpMethod::Post)
            .await
    }

    /// Return the next `count` free addresses of the network `cidr`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NetworkNotFound`] when no network matches `cidr`.
    pub async fn get_next_ip(&self, cidr: &str, count: u32) -> Result<NextAvailableIps> {
        let network = self.get_network(cidr).await?.into_iter().next().ok_or_else(|| {
            Error::NetworkNotFound(format!(
                "Unable to retrieve next available IP address for {cidr}"
            ))
        })?;

        let path = format!("{}?_function=next_available_ip", network.object_ref);
        self.execute(&path, &NextAvailableIpRequest { num: count }, HttpMethod::Post)
            .await?
            .into_json(&path)
    }

    /// Reserve the DHCP range `start`..=`end` on the network `cidr`.
    pub async fn network_range(&self, cidr: &str, start: &str, end: &str) -> Result<WapiResponse> {
        let request = RangeRequest {
            start_addr: start.to_string(),
            end_addr: end.to_string(),
            network: cidr.to_string(),
        };
        self.execute("range", &request, HttpMethod::Post).await
    }

    /// List the grid members.
    pub async fn get_grid_members(&self) -> Result<Vec<GridMember>> {
        self.get_json("member", &json!({})).await
    }

    async fn get_json<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(path, payload, HttpMethod::Get)
            .await?
            .into_json(path)
    }
}

/// Map a raw WAPI response onto the client's result.
///
/// Only 200 and 201 are successes. A success body that, stripped of quotes,
/// starts with the request path is the WAPI bare-string echo and becomes
/// [`WapiResponse::Confirmed`].
fn interpret_response(path: &str, raw: RawResponse) -> Result<WapiResponse> {
    if matches!(raw.status, 200 | 201) {
        let unquoted = raw.body.replace('"', "");
        if unquoted.starts_with(path) {
            return Ok(WapiResponse::Confirmed(ObjectRef::new(unquoted)));
        }

        return serde_json::from_str(&raw.body)
            .map(WapiResponse::Json)
            .map_err(|err| {
                Error::MalformedResponse(format!(
                    "Failed to parse WAPI response for `{path}`: {err}"
                ))
            });
    }

    match serde_json::from_str::<WapiErrorBody>(&raw.body) {
        Ok(error) => Err(Error::RemoteApi {
            status: raw.status,
            message: error.text,
        }),
        Err(err) => Err(Error::MalformedResponse(format!(
            "WAPI returned status {} for `{path}` with an unreadable error body: {err}",
            raw.status
        ))),
    }
}
