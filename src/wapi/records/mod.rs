// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WAPI record management.
//!
//! Record types implement [`WapiRecord`]; the generic helpers here perform
//! the search, create, update and delete round trips for any of them.

pub mod cname;

use hickory_proto::rr::Name;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

use super::request::WapiTransport;
use crate::constants::RETURN_FIELDS_PARAM;
use crate::wapi_errors::WapiError;

/// A WAPI object addressed by its `_ref`.
pub trait WapiRecord: DeserializeOwned {
    /// WAPI object type, e.g. `record:cname`
    const OBJECT_TYPE: &'static str;

    /// Comma-separated `_return_fields` requested on every read and write
    const RETURN_FIELDS: &'static str;

    /// Opaque server-assigned reference.
    fn reference(&self) -> &str;
}

/// Normalize and validate a fully qualified domain name.
///
/// Surrounding whitespace and a single trailing dot are removed (WAPI stores
/// names without the root label). Case is preserved; the appliance compares
/// names case-insensitively.
///
/// # Errors
///
/// Returns [`WapiError::InvalidName`] for empty or syntactically invalid names.
pub fn normalize_fqdn(name: &str) -> Result<String, WapiError> {
    let trimmed = name.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Err(WapiError::InvalidName {
            name: name.to_string(),
            reason: "name is empty".to_string(),
        });
    }
    if trimmed.ends_with('.') || trimmed.starts_with('.') || trimmed.contains("..") {
        return Err(WapiError::InvalidName {
            name: name.to_string(),
            reason: "name contains an empty label".to_string(),
        });
    }

    Name::from_str(trimmed).map_err(|e| WapiError::InvalidName {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    Ok(trimmed.to_string())
}

fn decode<T: DeserializeOwned>(url: &url::Url, text: &str) -> Result<T, WapiError> {
    serde_json::from_str(text).map_err(|e| WapiError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Search for records matching `filters`.
///
/// An empty result is not an error.
///
/// # Errors
///
/// Returns an error if the request fails or the body is not a record list.
pub async fn search<R: WapiRecord>(
    transport: &WapiTransport,
    filters: &[(&str, &str)],
) -> Result<Vec<R>, WapiError> {
    let mut query = filters.to_vec();
    query.push((RETURN_FIELDS_PARAM, R::RETURN_FIELDS));

    let url = transport.url(R::OBJECT_TYPE, &query)?;
    let text = transport.request(Method::GET, &url, None::<&()>).await?;
    let records: Vec<R> = decode(&url, &text)?;

    debug!(
        object_type = R::OBJECT_TYPE,
        matches = records.len(),
        "WAPI search complete"
    );
    Ok(records)
}

/// Create a record and return it as stored by the appliance.
///
/// # Errors
///
/// Returns an error if the appliance rejects the record (for example a
/// duplicate name) or the body cannot be decoded.
pub async fn create<R: WapiRecord, B: Serialize + std::fmt::Debug>(
    transport: &WapiTransport,
    body: &B,
) -> Result<R, WapiError> {
    let url = transport.url(R::OBJECT_TYPE, &[(RETURN_FIELDS_PARAM, R::RETURN_FIELDS)])?;
    let text = transport.request(Method::POST, &url, Some(body)).await?;
    decode(&url, &text)
}

/// Update fields of the record at `reference` and return the new state.
///
/// # Errors
///
/// Returns an error if the update fails or the body cannot be decoded.
pub async fn update<R: WapiRecord, B: Serialize + std::fmt::Debug>(
    transport: &WapiTransport,
    reference: &str,
    body: &B,
) -> Result<R, WapiError> {
    let url = transport.url(reference, &[(RETURN_FIELDS_PARAM, R::RETURN_FIELDS)])?;
    let text = transport.request(Method::PUT, &url, Some(body)).await?;
    decode(&url, &text)
}

/// Delete the object at `reference`, returning the reference WAPI confirms.
///
/// # Errors
///
/// Returns an error if the delete fails or the body is not a JSON string.
pub async fn delete_reference(
    transport: &WapiTransport,
    reference: &str,
) -> Result<String, WapiError> {
    let url = transport.url(reference, &[])?;
    let text = transport
        .request(Method::DELETE, &url, None::<&()>)
        .await?;
    decode(&url, &text)
}

/// Delete a record by its handle.
///
/// # Errors
///
/// See [`delete_reference`].
pub async fn delete_record<R: WapiRecord>(
    transport: &WapiTransport,
    record: &R,
) -> Result<String, WapiError> {
    delete_reference(transport, record.reference()).await
}
