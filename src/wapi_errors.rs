// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for Infoblox WAPI operations.
//!
//! Every failure of a network call, including a non-success HTTP status, is
//! surfaced as a [`WapiError`]. Lookups and deletes that match nothing are
//! not errors; they return empty results.
//!
//! HTTP status codes are additionally mapped to stable reason strings so
//! callers can branch on a failure class without parsing messages.
//!
//! ```rust
//! use infoblox_cname::wapi_errors::map_http_error_to_reason;
//!
//! let (reason, message) = map_http_error_to_reason(404);
//! assert_eq!(reason, "ObjectNotFound");
//! assert!(message.contains("404"));
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Request was rejected as malformed (400)
pub const REASON_BAD_REQUEST: &str = "WapiBadRequest";

/// Credentials missing or rejected (401/403)
pub const REASON_AUTH_FAILED: &str = "WapiAuthFailed";

/// Referenced object does not exist (404)
pub const REASON_OBJECT_NOT_FOUND: &str = "ObjectNotFound";

/// Appliance rate limited the client (429)
pub const REASON_RATE_LIMITED: &str = "WapiRateLimited";

/// Appliance failed internally (500)
pub const REASON_INTERNAL_ERROR: &str = "WapiInternalError";

/// Proxy or appliance temporarily unavailable (502/503/504)
pub const REASON_GATEWAY_ERROR: &str = "GatewayError";

/// Appliance could not be reached at all
pub const REASON_UNREACHABLE: &str = "WapiUnreachable";

/// Response body could not be understood
pub const REASON_DECODE_ERROR: &str = "WapiDecodeError";

/// Input rejected before any request was sent
pub const REASON_INVALID_INPUT: &str = "InvalidInput";

/// Errors returned by the WAPI client.
#[derive(Error, Debug, Clone)]
pub enum WapiError {
    /// The appliance answered with a non-success HTTP status.
    ///
    /// `code` carries the WAPI error code (e.g. `Client.Ibap.Data.Conflict`)
    /// when the body had the usual `{"Error", "code", "text"}` shape.
    #[error("WAPI {method} {url} failed with HTTP {status}: {message}")]
    Api {
        /// HTTP method of the failed request
        method: String,
        /// Request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// WAPI error code, if the body carried one
        code: Option<String>,
        /// Error text reported by the appliance
        message: String,
    },

    /// HTTP connection failed (DNS failure, refused connection, TLS handshake)
    #[error("HTTP connection to {endpoint} failed: {reason}")]
    Connection {
        /// Endpoint that could not be reached
        endpoint: String,
        /// Underlying transport error
        reason: String,
    },

    /// Request exceeded the configured timeout
    #[error("HTTP request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout {
        /// Endpoint that timed out
        endpoint: String,
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// Response body did not match the expected WAPI shape
    #[error("Failed to decode WAPI response from {url}: {reason}")]
    Decode {
        /// Request URL
        url: String,
        /// Parser error
        reason: String,
    },

    /// A record name failed validation before any request was made
    #[error("Invalid domain name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// Client configuration is incomplete or malformed
    #[error("Invalid client configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is invalid
        reason: String,
    },

    /// Transient failures persisted for the whole retry window
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Error returned by the final attempt
        last: Box<WapiError>,
    },
}

impl WapiError {
    /// HTTP status of the failure, if the appliance answered at all.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::RetriesExhausted { last, .. } => last.status_code(),
            _ => None,
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Rate limiting, 5xx gateway/server errors, connection failures and
    /// timeouts are transient; everything else fails immediately.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Connection { .. } | Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Stable reason string for this error.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Api { status, .. } => map_http_error_to_reason(*status).0,
            Self::Connection { .. } | Self::Timeout { .. } => REASON_UNREACHABLE,
            Self::Decode { .. } => REASON_DECODE_ERROR,
            Self::InvalidName { .. } | Self::InvalidConfig { .. } => REASON_INVALID_INPUT,
            Self::RetriesExhausted { last, .. } => last.reason(),
        }
    }

    /// Generic description of the failure class for HTTP errors, such as
    /// `"WAPI authorization failed (403)"`. `None` when no response arrived.
    #[must_use]
    pub fn reason_message(&self) -> Option<String> {
        self.status_code().map(|status| map_http_error_to_reason(status).1)
    }

    /// Build a [`WapiError::Api`] from a failed response body.
    ///
    /// WAPI error bodies look like
    /// `{"Error": "AdmConDataError: ...", "code": "Client.Ibap.Data.Conflict", "text": "..."}`.
    /// `text` is preferred for the message, then `Error`, then the raw body.
    #[must_use]
    pub fn from_response(method: &str, url: &str, status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<WapiErrorBody>(body).ok();

        let code = parsed.as_ref().and_then(|b| b.code.clone());
        let message = parsed
            .and_then(|b| b.text.or(b.error))
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "Unknown error".to_string()
                } else {
                    trimmed.to_string()
                }
            });

        Self::Api {
            method: method.to_string(),
            url: url.to_string(),
            status,
            code,
            message,
        }
    }

    /// Classify a transport error from `reqwest`.
    pub(crate) fn from_transport(err: &reqwest::Error, endpoint: &str, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms,
            }
        } else {
            Self::Connection {
                endpoint: endpoint.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

/// Error body returned by WAPI on non-success responses.
#[derive(Debug, Deserialize)]
struct WapiErrorBody {
    #[serde(rename = "Error")]
    error: Option<String>,
    code: Option<String>,
    text: Option<String>,
}

/// Map HTTP status code to reason and message.
///
/// | HTTP Code | Reason |
/// |-----------|--------|
/// | 400 | `WapiBadRequest` |
/// | 401, 403 | `WapiAuthFailed` |
/// | 404 | `ObjectNotFound` |
/// | 429 | `WapiRateLimited` |
/// | 500 | `WapiInternalError` |
/// | 502, 503, 504 | `GatewayError` |
/// | Other | `WapiUnreachable` |
#[must_use]
pub fn map_http_error_to_reason(status_code: u16) -> (&'static str, String) {
    match status_code {
        400 => (
            REASON_BAD_REQUEST,
            "Invalid request to WAPI (400)".into(),
        ),
        401 => (
            REASON_AUTH_FAILED,
            "WAPI authentication required (401)".into(),
        ),
        403 => (
            REASON_AUTH_FAILED,
            "WAPI authorization failed (403)".into(),
        ),
        404 => (
            REASON_OBJECT_NOT_FOUND,
            "Object or reference not found on appliance (404)".into(),
        ),
        429 => (
            REASON_RATE_LIMITED,
            "WAPI rate limit exceeded (429)".into(),
        ),
        500 => (
            REASON_INTERNAL_ERROR,
            "WAPI internal error (500)".into(),
        ),
        502 => (
            REASON_GATEWAY_ERROR,
            "Bad gateway reaching WAPI (502)".into(),
        ),
        503 => (
            REASON_GATEWAY_ERROR,
            "WAPI service unavailable (503)".into(),
        ),
        504 => (
            REASON_GATEWAY_ERROR,
            "Gateway timeout reaching WAPI (504)".into(),
        ),
        _ => (
            REASON_UNREACHABLE,
            format!("Unexpected HTTP error from WAPI ({status_code})"),
        ),
    }
}

#[cfg(test)]
#[path = "wapi_errors_tests.rs"]
mod wapi_errors_tests;
