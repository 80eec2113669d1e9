// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # infoblox-cname - Infoblox WAPI client for CNAME records
//!
//! A client for the Infoblox WAPI (the REST API of Infoblox DNS appliances)
//! that manages CNAME records with typed create, read, update and delete
//! operations.
//!
//! ## Modules
//!
//! - [`wapi`] - [`InfobloxClient`] and the CNAME operations
//! - [`config`] - Client configuration, builder and environment settings
//! - [`wapi_errors`] - Error type and HTTP status mapping
//! - [`constants`] - WAPI defaults and environment variable names
//!
//! ## Example
//!
//! ```rust,no_run
//! use infoblox_cname::InfobloxClient;
//!
//! # async fn example() -> Result<(), infoblox_cname::WapiError> {
//! let client = InfobloxClient::builder()
//!     .endpoint("infoblox.example.com")
//!     .username("admin")
//!     .password("secret")
//!     .tls_verify(false)
//!     .build()?;
//!
//! let alias = "blog.example.com";
//! client.delete_cname_rec(alias).await?; // no-op when absent
//!
//! let record = client.create_cname_rec(alias, "www.example.com").await?;
//! assert_eq!(record.canonical(), "www.example.com");
//!
//! let renamed = client.modify_cname_rec(alias, "news.example.com").await?;
//! assert_eq!(renamed.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Behavior
//!
//! - Lookups and deletes by alias are case-insensitive.
//! - Finding nothing is not an error: lookups, modifications and deletes by
//!   name return an empty `Vec`.
//! - Every network failure or non-success HTTP status is a [`WapiError`].

pub mod config;
pub mod constants;
pub mod wapi;
pub mod wapi_errors;

pub use config::{ClientConfig, ClientConfigBuilder, EnvConfig};
pub use wapi::{Cname, InfobloxClient, WapiRecord};
pub use wapi_errors::WapiError;
