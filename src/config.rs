// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Client configuration.
//!
//! [`ClientConfig`] holds everything needed to talk to one appliance. It is
//! normally assembled through [`ClientConfigBuilder`]:
//!
//! ```rust,no_run
//! use infoblox_cname::InfobloxClient;
//!
//! # fn example() -> Result<(), infoblox_cname::WapiError> {
//! let client = InfobloxClient::builder()
//!     .endpoint("infoblox.example.com")
//!     .username("admin")
//!     .password("secret")
//!     .ttl(1)
//!     .tls_verify(false)
//!     .debug(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`EnvConfig`] reads appliance credentials from `IBA_*` environment
//! variables; the CLI and the live integration tests use it.

use std::fmt;
use std::time::Duration;

use crate::constants::{
    DEFAULT_DNS_VIEW, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WAPI_VERSION, ENV_CLIENT_TTL_SECS,
    ENV_DOMAIN, ENV_HOST, ENV_PASSWORD, ENV_USER, ENV_WAPI_VERSION,
};
use crate::wapi::InfobloxClient;
use crate::wapi_errors::WapiError;

/// Connection and record defaults for an [`InfobloxClient`].
#[derive(Clone)]
pub struct ClientConfig {
    /// Appliance address: host, host:port or full URL
    pub endpoint: String,
    /// WAPI username
    pub username: String,
    /// WAPI password
    pub password: String,
    /// WAPI version, e.g. `2.5`
    pub wapi_version: String,
    /// DNS view records are created in and searched within
    pub dns_view: String,
    /// Record TTL in seconds applied on create; `None` keeps the zone default
    pub ttl: Option<u32>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Verify the appliance TLS certificate
    pub tls_verify: bool,
    /// Log request and response bodies
    pub debug: bool,
    /// Retry `GET` and `DELETE` requests on transient failures
    pub retry: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            username: String::new(),
            password: String::new(),
            wapi_version: DEFAULT_WAPI_VERSION.to_string(),
            dns_view: DEFAULT_DNS_VIEW.to_string(),
            ttl: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            tls_verify: true,
            debug: false,
            retry: true,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("wapi_version", &self.wapi_version)
            .field("dns_view", &self.dns_view)
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .field("tls_verify", &self.tls_verify)
            .field("debug", &self.debug)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientConfig {
    /// Check that the configuration can address an appliance.
    ///
    /// # Errors
    ///
    /// Returns [`WapiError::InvalidConfig`] if the endpoint, username, WAPI
    /// version or DNS view is empty, or the timeout is zero.
    pub fn validate(&self) -> Result<(), WapiError> {
        let missing = |field: &str| WapiError::InvalidConfig {
            reason: format!("{field} must not be empty"),
        };

        if self.endpoint.trim().is_empty() {
            return Err(missing("endpoint"));
        }
        if self.username.trim().is_empty() {
            return Err(missing("username"));
        }
        if self.wapi_version.trim().is_empty() {
            return Err(missing("wapi_version"));
        }
        if self.dns_view.trim().is_empty() {
            return Err(missing("dns_view"));
        }
        if self.timeout.is_zero() {
            return Err(WapiError::InvalidConfig {
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Fluent builder for [`ClientConfig`] and [`InfobloxClient`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Start from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appliance address (`host`, `host:port` or `https://host`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// WAPI username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    /// WAPI password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// WAPI version, e.g. `2.7`.
    pub fn wapi_version(mut self, version: impl Into<String>) -> Self {
        self.config.wapi_version = version.into();
        self
    }

    /// DNS view.
    pub fn dns_view(mut self, view: impl Into<String>) -> Self {
        self.config.dns_view = view.into();
        self
    }

    /// Record TTL in seconds for created records.
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.config.ttl = Some(ttl);
        self
    }

    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Verify the appliance TLS certificate (default `true`).
    pub fn tls_verify(mut self, verify: bool) -> Self {
        self.config.tls_verify = verify;
        self
    }

    /// Log request and response bodies.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Retry `GET` and `DELETE` requests on transient failures (default `true`).
    pub fn retry(mut self, retry: bool) -> Self {
        self.config.retry = retry;
        self
    }

    /// Validate and return the configuration.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::validate`].
    pub fn build_config(self) -> Result<ClientConfig, WapiError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Validate the configuration and build a client.
    ///
    /// # Errors
    ///
    /// Returns [`WapiError::InvalidConfig`] if the configuration is invalid or
    /// the HTTP client cannot be constructed.
    pub fn build(self) -> Result<InfobloxClient, WapiError> {
        InfobloxClient::new(self.build_config()?)
    }
}

/// Appliance settings read from the environment.
///
/// | Variable | Meaning |
/// |----------|---------|
/// | `IBA_HOST` | appliance host |
/// | `IBA_USER` | WAPI username |
/// | `IBA_PASSWORD` | WAPI password |
/// | `IBA_DOMAIN` | domain test records are created under |
/// | `IBA_WAPI_VERSION` | optional WAPI version |
#[derive(Clone, Default)]
pub struct EnvConfig {
    /// Appliance host (`IBA_HOST`)
    pub host: Option<String>,
    /// WAPI username (`IBA_USER`)
    pub user: Option<String>,
    /// WAPI password (`IBA_PASSWORD`)
    pub password: Option<String>,
    /// Domain test records are created under (`IBA_DOMAIN`)
    pub domain: Option<String>,
    /// WAPI version override (`IBA_WAPI_VERSION`)
    pub wapi_version: Option<String>,
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("domain", &self.domain)
            .field("wapi_version", &self.wapi_version)
            .finish()
    }
}

impl EnvConfig {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            host: get(ENV_HOST),
            user: get(ENV_USER),
            password: get(ENV_PASSWORD),
            domain: get(ENV_DOMAIN),
            wapi_version: get(ENV_WAPI_VERSION),
        }
    }

    /// Whether every required variable is present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.missing().is_empty()
    }

    /// Human-readable explanation of which variables are missing.
    #[must_use]
    pub fn err_msg(&self) -> String {
        format!(
            "Infoblox appliance not configured, missing environment variables: {}",
            self.missing().join(", ")
        )
    }

    /// Test domain, empty when unset.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or_default()
    }

    /// Build a client for the configured appliance.
    ///
    /// Uses a one second record TTL and skips TLS verification, which is what
    /// lab appliances with self-signed certificates need.
    ///
    /// # Errors
    ///
    /// Returns [`WapiError::InvalidConfig`] if variables are missing.
    pub fn client(&self) -> Result<InfobloxClient, WapiError> {
        if !self.is_valid() {
            return Err(WapiError::InvalidConfig {
                reason: self.err_msg(),
            });
        }

        let mut builder = ClientConfigBuilder::new()
            .endpoint(self.host.clone().unwrap_or_default())
            .username(self.user.clone().unwrap_or_default())
            .password(self.password.clone().unwrap_or_default())
            .ttl(ENV_CLIENT_TTL_SECS)
            .tls_verify(false)
            .debug(true);
        if let Some(version) = &self.wapi_version {
            builder = builder.wapi_version(version.clone());
        }
        builder.build()
    }

    fn missing(&self) -> Vec<&'static str> {
        [
            (ENV_HOST, &self.host),
            (ENV_USER, &self.user),
            (ENV_PASSWORD, &self.password),
            (ENV_DOMAIN, &self.domain),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
