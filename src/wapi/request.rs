// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WAPI HTTP request execution.
//!
//! All record operations go through [`WapiTransport::request`], which adds
//! basic authentication, applies the retry policy to replayable methods, maps
//! non-success statuses to [`WapiError::Api`] and logs every call.

use reqwest::{Client as HttpClient, Method};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};
use url::Url;

use super::retry::{http_backoff, is_replayable_method, retry_wapi_call};
use crate::config::ClientConfig;
use crate::constants::{DEFAULT_SCHEME, WAPI_PATH_PREFIX};
use crate::wapi_errors::WapiError;

/// Build the appliance base URL from an endpoint.
///
/// Converts `"infoblox.example.com"` or `"10.0.0.5:8443"` to
/// `https://infoblox.example.com` / `https://10.0.0.5:8443`. Endpoints that
/// already carry a scheme are kept; trailing slashes are removed.
#[must_use]
pub fn build_api_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.trim_end_matches('/').to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{}", endpoint.trim_end_matches('/'))
    }
}

/// Build the versioned WAPI root, e.g. `https://ib.example.com/wapi/v2.5`.
#[must_use]
pub fn build_wapi_root(endpoint: &str, version: &str) -> String {
    let version = version.trim().trim_start_matches('v');
    format!("{}/{WAPI_PATH_PREFIX}/v{version}", build_api_url(endpoint))
}

/// Authenticated HTTP access to one WAPI root.
#[derive(Clone)]
pub struct WapiTransport {
    client: Arc<HttpClient>,
    root: String,
    username: String,
    password: String,
    timeout_ms: u64,
    debug: bool,
    retry: bool,
}

impl fmt::Debug for WapiTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WapiTransport")
            .field("root", &self.root)
            .field("username", &self.username)
            .field("timeout_ms", &self.timeout_ms)
            .field("debug", &self.debug)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl WapiTransport {
    /// Create a transport from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WapiError::InvalidConfig`] if the endpoint does not form a
    /// valid URL or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, WapiError> {
        let root = build_wapi_root(&config.endpoint, &config.wapi_version);
        Url::parse(&root).map_err(|e| WapiError::InvalidConfig {
            reason: format!("endpoint '{}' is not a valid URL: {e}", config.endpoint),
        })?;

        let client = HttpClient::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.tls_verify)
            .build()
            .map_err(|e| WapiError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client: Arc::new(client),
            root,
            username: config.username.clone(),
            password: config.password.clone(),
            timeout_ms: u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
            debug: config.debug,
            retry: config.retry,
        })
    }

    /// The versioned WAPI root URL.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Build the URL for a WAPI object type or reference plus query pairs.
    ///
    /// References such as `record:cname/ZG5z...:alias.example.com/default`
    /// contain `:` and `/`, so they are appended as raw path text instead of
    /// going through [`Url::join`], which would read `record:` as a scheme.
    ///
    /// # Errors
    ///
    /// Returns [`WapiError::InvalidConfig`] if the result is not a valid URL.
    pub fn url(&self, resource: &str, query: &[(&str, &str)]) -> Result<Url, WapiError> {
        let raw = format!("{}/{}", self.root, resource.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| WapiError::InvalidConfig {
            reason: format!("cannot build WAPI URL for '{resource}': {e}"),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        Ok(url)
    }

    /// Execute a request and return the response body.
    ///
    /// `GET` and `DELETE` are retried on transient failures when retries are
    /// enabled.
    ///
    /// # Errors
    ///
    /// Returns [`WapiError::Api`] for non-success statuses, transport errors
    /// as [`WapiError::Connection`] / [`WapiError::Timeout`], and
    /// [`WapiError::RetriesExhausted`] when the retry window closes.
    pub async fn request<T: Serialize + fmt::Debug>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&T>,
    ) -> Result<String, WapiError> {
        if self.retry && is_replayable_method(&method) {
            let operation = format!("{method} {}", url.path());
            let transport = self;
            retry_wapi_call(http_backoff(), &operation, move || {
                transport.request_once(method.clone(), url, body)
            })
            .await
        } else {
            self.request_once(method, url, body).await
        }
    }

    async fn request_once<T: Serialize + fmt::Debug>(
        &self,
        method: Method,
        url: &Url,
        body: Option<&T>,
    ) -> Result<String, WapiError> {
        let start = Instant::now();
        if self.debug {
            debug!(method = %method, url = %url, body = ?body, "WAPI request");
        } else {
            debug!(method = %method, url = %url, "WAPI request");
        }

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .basic_auth(&self.username, Some(&self.password));
        if let Some(body_data) = body {
            request = request.json(body_data);
        }

        let response = request
            .send()
            .await
            .map_err(|e| WapiError::from_transport(&e, &self.root, self.timeout_ms))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| WapiError::from_transport(&e, &self.root, self.timeout_ms))?;

        if !status.is_success() {
            let err = WapiError::from_response(method.as_str(), url.as_str(), status.as_u16(), &text);
            error!(
                method = %method,
                url = %url,
                status = %status,
                error = %err,
                "WAPI request failed"
            );
            return Err(err);
        }

        if self.debug {
            debug!(
                method = %method,
                url = %url,
                status = %status,
                elapsed = ?start.elapsed(),
                response = %text,
                "WAPI request successful"
            );
        } else {
            debug!(
                method = %method,
                url = %url,
                status = %status,
                elapsed = ?start.elapsed(),
                response_len = text.len(),
                "WAPI request successful"
            );
        }

        Ok(text)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod request_tests;
