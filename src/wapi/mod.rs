// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Infoblox WAPI client.
//!
//! [`InfobloxClient`] exposes typed CNAME operations and translates them into
//! WAPI REST calls. Each call is a stateless round trip; the appliance is the
//! only source of truth.
//!
//! # Example
//!
//! ```rust,no_run
//! use infoblox_cname::InfobloxClient;
//!
//! # async fn example() -> Result<(), infoblox_cname::WapiError> {
//! let client = InfobloxClient::builder()
//!     .endpoint("infoblox.example.com")
//!     .username("admin")
//!     .password("secret")
//!     .build()?;
//!
//! client.create_cname_rec("www.example.com", "web01.example.com").await?;
//! let records = client.get_cname_rec("WWW.EXAMPLE.COM").await?;
//! assert_eq!(records[0].canonical(), "web01.example.com");
//!
//! let deleted = client.delete_cname_rec("www.example.com").await?;
//! assert_eq!(deleted.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod records;
pub mod request;
pub mod retry;

pub use records::cname::Cname;
pub use records::WapiRecord;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::wapi_errors::WapiError;
use request::WapiTransport;

/// Client for one Infoblox appliance.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct InfobloxClient {
    transport: WapiTransport,
    config: ClientConfig,
}

impl InfobloxClient {
    /// Start building a client.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WapiError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: ClientConfig) -> Result<Self, WapiError> {
        config.validate()?;
        let transport = WapiTransport::new(&config)?;
        Ok(Self { transport, config })
    }

    /// Configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Versioned WAPI root URL, e.g. `https://ib.example.com/wapi/v2.5`.
    #[must_use]
    pub fn wapi_root(&self) -> &str {
        self.transport.root()
    }

    // ===== CNAME record methods =====

    /// Create a CNAME record `alias -> canonical`.
    ///
    /// # Errors
    ///
    /// Fails if a name is malformed, the alias already exists, or the request fails.
    pub async fn create_cname_rec(&self, alias: &str, canonical: &str) -> Result<Cname, WapiError> {
        records::cname::create_cname_record(
            &self.transport,
            &self.config.dns_view,
            self.config.ttl,
            alias,
            canonical,
        )
        .await
    }

    /// Look up CNAME records by alias, ignoring case.
    ///
    /// # Errors
    ///
    /// Fails if the alias is malformed or the request fails. No match is an empty vec.
    pub async fn get_cname_rec(&self, alias: &str) -> Result<Vec<Cname>, WapiError> {
        records::cname::get_cname_records(&self.transport, &self.config.dns_view, alias).await
    }

    /// Look up every CNAME record pointing at `canonical`.
    ///
    /// # Errors
    ///
    /// Fails if the name is malformed or the request fails. No match is an empty vec.
    pub async fn get_cname_canonical_rec(&self, canonical: &str) -> Result<Vec<Cname>, WapiError> {
        records::cname::get_cname_records_by_canonical(
            &self.transport,
            &self.config.dns_view,
            canonical,
        )
        .await
    }

    /// Rename `old_alias` to `new_alias`, returning the updated record(s).
    ///
    /// # Errors
    ///
    /// Fails if a name is malformed or a request fails. No match is an empty vec.
    pub async fn modify_cname_rec(
        &self,
        old_alias: &str,
        new_alias: &str,
    ) -> Result<Vec<Cname>, WapiError> {
        records::cname::modify_cname_alias(
            &self.transport,
            &self.config.dns_view,
            old_alias,
            new_alias,
        )
        .await
    }

    /// Point `alias` at `new_canonical`, returning the updated record(s).
    ///
    /// # Errors
    ///
    /// Fails if a name is malformed or a request fails. No match is an empty vec.
    pub async fn modify_cname_canonical_rec(
        &self,
        alias: &str,
        new_canonical: &str,
    ) -> Result<Vec<Cname>, WapiError> {
        records::cname::modify_cname_canonical(
            &self.transport,
            &self.config.dns_view,
            alias,
            new_canonical,
        )
        .await
    }

    /// Delete CNAME records by alias, ignoring case.
    ///
    /// Returns the deleted references; an empty vec when nothing matched.
    ///
    /// # Errors
    ///
    /// Fails if the alias is malformed or a request fails.
    pub async fn delete_cname_rec(&self, alias: &str) -> Result<Vec<String>, WapiError> {
        records::cname::delete_cname_records(&self.transport, &self.config.dns_view, alias).await
    }

    /// Delete a record by its handle and return the confirmed reference.
    ///
    /// # Errors
    ///
    /// Fails if the reference no longer exists or the request fails.
    pub async fn delete_record<R: WapiRecord>(&self, record: &R) -> Result<String, WapiError> {
        records::delete_record(&self.transport, record).await
    }
}
