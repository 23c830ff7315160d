//! Infoblox WAPI client for DNS, DHCP and IPAM management.
//!
//! Provides typed request payloads and an asynchronous client that maps each
//! operation onto a single WAPI request.
//!
//! ```no_run
//! # async fn example() -> infoblox_wapi::Result<()> {
//! use infoblox_wapi::{RecordData, RecordType, WapiClient};
//!
//! let client = WapiClient::new("https://infoblox.example.com", "admin", "secret")?;
//! client
//!     .create_record(RecordType::Mx, "example.com", RecordData::mx("mail.example.com", 10))
//!     .await?;
//! let next = client.get_next_ip("10.224.253.0/28", 2).await?;
//! # let _ = next;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod models;
mod transport;

pub use client::{WapiClient, WapiClientBuilder};
pub use infoblox_core::{Error, HttpMethod, ObjectRef, RecordType, WapiConfig};
pub use models::{
    DhcpOption, GridMember, Network, NextAvailableIps, Record, RecordData, WapiResponse,
};

/// Convenient result alias sharing the `infoblox-core` error type.
pub type Result<T> = infoblox_core::Result<T>;
