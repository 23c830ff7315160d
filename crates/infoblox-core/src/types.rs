//! Core WAPI domain types.
//!
//! This module provides the supported DNS record types, the HTTP methods the
//! client issues and the opaque object references WAPI hands out.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// WAPI version used when none is configured.
pub const DEFAULT_WAPI_VERSION: &str = "1.2.1";

/// DNS record types the client knows how to look up and create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
    /// Canonical name record
    Cname,
    /// Infoblox host record
    Host,
    /// Mail exchanger record
    Mx,
    /// Pointer record
    Ptr,
    /// Service locator record
    Srv,
    /// Text record
    Txt,
}

impl RecordType {
    /// Returns the record type as its conventional uppercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Host => "HOST",
            Self::Mx => "MX",
            Self::Ptr => "PTR",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        }
    }

    /// Returns the WAPI object type, e.g. `record:host`.
    #[must_use]
    pub const fn object_type(&self) -> &'static str {
        match self {
            Self::A => "record:a",
            Self::Aaaa => "record:aaaa",
            Self::Cname => "record:cname",
            Self::Host => "record:host",
            Self::Mx => "record:mx",
            Self::Ptr => "record:ptr",
            Self::Srv => "record:srv",
            Self::Txt => "record:txt",
        }
    }

    /// Returns all supported record types.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::A,
            Self::Aaaa,
            Self::Cname,
            Self::Host,
            Self::Mx,
            Self::Ptr,
            Self::Srv,
            Self::Txt,
        ]
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AsRef<str> for RecordType {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|record_type| record_type.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedRecordType(s.to_string()))
    }
}

/// HTTP methods used against WAPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Read objects
    Get,
    /// Create objects or call functions
    Post,
    /// Remove objects by reference
    Delete,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    #[must_use]
    pub const fn sends_body(&self) -> bool {
        !matches!(self, Self::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Opaque object reference (`_ref`) assigned by WAPI.
///
/// The value is never interpreted; it is used verbatim as a request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(String);

impl ObjectRef {
    /// Wrap a raw reference string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the reference and return the raw string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ObjectRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ObjectRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
