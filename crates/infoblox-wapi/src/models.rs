//! WAPI request payloads and response models.

use crate::Result;
use infoblox_core::{Error, ObjectRef, RecordType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::IpAddr;

/// Outcome of a successful WAPI call.
#[derive(Debug, Clone, PartialEq)]
pub enum WapiResponse {
    /// WAPI echoed the requested object path back as a bare string.
    ///
    /// Carries the echoed string with quotes removed, which for creations is
    /// the reference of the new object.
    Confirmed(ObjectRef),
    /// Any other JSON body.
    Json(Value),
}

impl WapiResponse {
    /// Whether this is a bare confirmation.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    /// The echoed object reference, if this is a confirmation.
    #[must_use]
    pub fn object_ref(&self) -> Option<&ObjectRef> {
        match self {
            Self::Confirmed(object_ref) => Some(object_ref),
            Self::Json(_) => None,
        }
    }

    /// The decoded body, if this is not a confirmation.
    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Confirmed(_) => None,
        }
    }

    /// Decode the JSON body into a typed model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] for a confirmation or a body that
    /// does not match `T`.
    pub fn into_json<T>(self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        match self {
            Self::Json(value) => serde_json::from_value(value).map_err(|err| {
                Error::MalformedResponse(format!(
                    "Failed to parse WAPI response for `{path}`: {err}"
                ))
            }),
            Self::Confirmed(echo) => Err(Error::MalformedResponse(format!(
                "Expected a JSON body for `{path}`, got confirmation `{echo}`"
            ))),
        }
    }
}

/// Error body returned by WAPI on failure.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WapiErrorBody {
    /// Human-readable message.
    pub text: String,
    /// Internal error class, e.g. `AdmConDataError: None`.
    #[serde(default, rename = "Error")]
    pub error: Option<String>,
    /// Error code, e.g. `Client.Ibap.Data.Conflict`.
    #[serde(default)]
    pub code: Option<String>,
}

/// Lookup filter for `network` GET requests.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NetworkFilter {
    /// Network in CIDR notation.
    pub network: String,
}

/// DHCP grid member serving a network.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DhcpMember {
    #[serde(rename = "_struct")]
    struct_type: &'static str,
    /// Grid member address.
    pub ipv4addr: String,
}

impl DhcpMember {
    /// Reference a grid member by its IPv4 address.
    #[must_use]
    pub fn new(ipv4addr: impl Into<String>) -> Self {
        Self {
            struct_type: "dhcpmember",
            ipv4addr: ipv4addr.into(),
        }
    }
}

/// DHCP option overriding the grid-level setting for a network.
///
/// Common option names are `routers`, `dhcp-lease-time`, `domain-name` and
/// `ntp-servers`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DhcpOption {
    /// Option name.
    pub name: String,
    /// Option value.
    pub value: String,
    /// Whether the option overrides the inherited value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_option: Option<bool>,
    /// Vendor class the option belongs to, e.g. `DHCP`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_class: Option<String>,
}

impl DhcpOption {
    /// Create an option with just a name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            use_option: None,
            vendor_class: None,
        }
    }

    /// Set the `use_option` flag.
    #[must_use]
    pub const fn with_use_option(mut self, use_option: bool) -> Self {
        self.use_option = Some(use_option);
        self
    }

    /// Set the vendor class.
    #[must_use]
    pub fn with_vendor_class(mut self, vendor_class: impl Into<String>) -> Self {
        self.vendor_class = Some(vendor_class.into());
        self
    }
}

/// Request payload to create a network.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateNetworkRequest {
    /// Network in CIDR notation.
    pub network: String,
    /// DHCP option overrides.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<DhcpOption>,
    /// Grid members serving DHCP for the network.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<DhcpMember>,
}

impl CreateNetworkRequest {
    /// Build the payload from the caller's arguments.
    #[must_use]
    pub fn new(network: &str, grid_member: Option<&str>, options: &[DhcpOption]) -> Self {
        Self {
            network: network.to_string(),
            options: options.to_vec(),
            members: grid_member.map(DhcpMember::new).into_iter().collect(),
        }
    }
}

/// Lookup filter for record GET requests.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecordFilter {
    /// Fully qualified record name.
    pub name: String,
}

/// Data supplied when creating a record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordData {
    /// Single value: an address, canonical name or text.
    Value(String),
    /// Named fields for structured record types (MX, SRV).
    Fields(Map<String, Value>),
}

impl RecordData {
    /// Fields for an MX record.
    #[must_use]
    pub fn mx(mail_exchanger: impl Into<String>, preference: u32) -> Self {
        let mut fields = Map::new();
        fields.insert("mail_exchanger".into(), Value::String(mail_exchanger.into()));
        fields.insert("preference".into(), Value::from(preference));
        Self::Fields(fields)
    }

    /// Fields for an SRV record.
    #[must_use]
    pub fn srv(target: impl Into<String>, port: u16, priority: u32, weight: u32) -> Self {
        let mut fields = Map::new();
        fields.insert("target".into(), Value::String(target.into()));
        fields.insert("port".into(), Value::from(port));
        fields.insert("priority".into(), Value::from(priority));
        fields.insert("weight".into(), Value::from(weight));
        Self::Fields(fields)
    }
}

impl From<&str> for RecordData {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for RecordData {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<IpAddr> for RecordData {
    fn from(value: IpAddr) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<Map<String, Value>> for RecordData {
    fn from(value: Map<String, Value>) -> Self {
        Self::Fields(value)
    }
}

/// Address entry of a host record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HostAddress {
    /// IPv4 address.
    pub ipv4addr: String,
}

/// Type-specific payload for record creation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RecordPayload {
    /// `record:a`
    A {
        /// Record name.
        name: String,
        /// IPv4 address.
        ipv4addr: String,
    },
    /// `record:aaaa`
    Aaaa {
        /// Record name.
        name: String,
        /// IPv6 address.
        ipv6addr: String,
    },
    /// `record:cname`
    Cname {
        /// Alias name.
        name: String,
        /// Target name.
        canonical: String,
    },
    /// `record:host`
    Host {
        /// Host name.
        name: String,
        /// Host addresses.
        ipv4addrs: Vec<HostAddress>,
    },
    /// `record:ptr`
    Ptr {
        /// Record name.
        name: String,
        /// IPv4 address.
        ipv4addr: String,
        /// Name the pointer resolves to.
        ptrdname: String,
    },
    /// `record:txt`
    Txt {
        /// Record name.
        name: String,
        /// Text value.
        text: String,
    },
    /// `record:mx`
    Mx {
        /// Record name.
        name: String,
        /// Mail exchanger host.
        mail_exchanger: Value,
        /// Preference.
        preference: Value,
    },
    /// `record:srv`
    Srv {
        /// Record name.
        name: String,
        /// Service port.
        port: Value,
        /// Priority.
        priority: Value,
        /// Target host.
        target: Value,
        /// Weight.
        weight: Value,
    },
}

impl RecordPayload {
    /// Build the payload for `record_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `data` does not fit the record
    /// type: a single-valued type given fields, or MX/SRV given a plain value
    /// or missing a required field.
    pub fn build(record_type: RecordType, name: &str, data: RecordData) -> Result<Self> {
        let name = name.to_string();
        let payload = match (record_type, data) {
            (RecordType::A, RecordData::Value(ipv4addr)) => Self::A { name, ipv4addr },
            (RecordType::Aaaa, RecordData::Value(ipv6addr)) => Self::Aaaa { name, ipv6addr },
            (RecordType::Cname, RecordData::Value(canonical)) => Self::Cname { name, canonical },
            (RecordType::Host, RecordData::Value(ipv4addr)) => Self::Host {
                name,
                ipv4addrs: vec![HostAddress { ipv4addr }],
            },
            (RecordType::Ptr, RecordData::Value(ipv4addr)) => Self::Ptr {
                ptrdname: name.clone(),
                name,
                ipv4addr,
            },
            (RecordType::Txt, RecordData::Value(text)) => Self::Txt { name, text },
            (RecordType::Mx, RecordData::Fields(mut fields)) => Self::Mx {
                mail_exchanger: take_field(&mut fields, record_type, "mail_exchanger")?,
                preference: take_field(&mut fields, record_type, "preference")?,
                name,
            },
            (RecordType::Srv, RecordData::Fields(mut fields)) => Self::Srv {
                port: take_field(&mut fields, record_type, "port")?,
                priority: take_field(&mut fields, record_type, "priority")?,
                target: take_field(&mut fields, record_type, "target")?,
                weight: take_field(&mut fields, record_type, "weight")?,
                name,
            },
            (RecordType::Mx | RecordType::Srv, RecordData::Value(_)) => {
                return Err(Error::InvalidArgument(format!(
                    "{record_type} records require named fields, not a single value"
                )))
            }
            (_, RecordData::Fields(_)) => {
                return Err(Error::InvalidArgument(format!(
                    "{record_type} records take a single value, not named fields"
                )))
            }
        };
        Ok(payload)
    }
}

fn take_field(
    fields: &mut Map<String, Value>,
    record_type: RecordType,
    key: &str,
) -> Result<Value> {
    fields.remove(key).ok_or_else(|| {
        Error::InvalidArgument(format!("{record_type} record data is missing `{key}`"))
    })
}

/// Request payload to create a fixed address.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FixedAddressRequest {
    /// Host name.
    pub name: String,
    /// Reserved IPv4 address.
    pub ipv4addr: String,
    /// MAC address bound to the IP.
    pub mac: String,
    /// Free-form comment.
    pub comment: String,
}

/// Arguments of the `next_available_ip` function.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct NextAvailableIpRequest {
    /// Number of addresses to return.
    pub num: u32,
}

/// Request payload to reserve a DHCP range.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RangeRequest {
    /// First address of the range.
    pub start_addr: String,
    /// Last address of the range.
    pub end_addr: String,
    /// Network in CIDR notation.
    pub network: String,
}

/// Network object returned by WAPI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Network {
    /// Object reference.
    #[serde(rename = "_ref")]
    pub object_ref: ObjectRef,
    /// Network in CIDR notation.
    pub network: String,
    /// Network view, usually `default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_view: Option<String>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Any additional returned fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// DNS record object returned by WAPI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Object reference.
    #[serde(rename = "_ref")]
    pub object_ref: ObjectRef,
    /// Record name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// DNS view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Type-specific fields (`ipv4addr`, `ipv4addrs`, `canonical`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Grid member object returned by WAPI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridMember {
    /// Object reference.
    #[serde(rename = "_ref")]
    pub object_ref: ObjectRef,
    /// Member host name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    /// Any additional returned fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of the `next_available_ip` function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NextAvailableIps {
    /// Free addresses, in allocation order.
    pub ips: Vec<IpAddr>,
}
