//! # infoblox-core
//!
//! Core types and utilities for working with the Infoblox WAPI.
//!
//! This crate provides the shared error type, connection configuration and
//! domain primitives used by the `infoblox-wapi` client.
//!
//! ## Modules
//!
//! - [`error`] - Error types and WAPI error codes
//! - [`types`] - Record types, HTTP methods and object references
//! - [`config`] - Connection configuration for a WAPI endpoint
//! - [`client`] - HTTP client settings and timeout defaults

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::WapiConfig;
pub use error::{Error, Result};
pub use types::{HttpMethod, ObjectRef, RecordType, DEFAULT_WAPI_VERSION};
