// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CNAME record management.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{create, delete_reference, normalize_fqdn, search, update, WapiRecord};
use crate::constants::{
    CANONICAL_PARAM, CNAME_RETURN_FIELDS, NAME_CASE_INSENSITIVE_PARAM, OBJECT_TYPE_CNAME,
    VIEW_PARAM,
};
use crate::wapi::request::WapiTransport;
use crate::wapi_errors::WapiError;

/// A CNAME record as stored on the appliance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cname {
    /// Opaque server-assigned reference
    #[serde(rename = "_ref")]
    pub reference: String,
    /// Alias FQDN
    pub name: String,
    /// Canonical target FQDN
    pub canonical: String,
    /// DNS view the record lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Record TTL in seconds (meaningful when `use_ttl` is set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Whether `ttl` overrides the zone default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_ttl: Option<bool>,
}

impl Cname {
    /// Alias FQDN.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical target FQDN.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

impl WapiRecord for Cname {
    const OBJECT_TYPE: &'static str = OBJECT_TYPE_CNAME;
    const RETURN_FIELDS: &'static str = CNAME_RETURN_FIELDS;

    fn reference(&self) -> &str {
        &self.reference
    }
}

/// Body of a CNAME create request.
#[derive(Debug, Serialize)]
struct NewCname<'a> {
    name: &'a str,
    canonical: &'a str,
    view: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_ttl: Option<bool>,
}

/// Body of a CNAME update request; only set fields are sent.
#[derive(Debug, Default, Serialize)]
struct CnamePatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical: Option<&'a str>,
}

/// Create a CNAME record `alias -> canonical` in `view`.
///
/// # Errors
///
/// Returns [`WapiError::InvalidName`] for malformed names, or the appliance
/// error (typically a conflict) if the alias already exists.
pub async fn create_cname_record(
    transport: &WapiTransport,
    view: &str,
    ttl: Option<u32>,
    alias: &str,
    canonical: &str,
) -> Result<Cname, WapiError> {
    let alias = normalize_fqdn(alias)?;
    let canonical = normalize_fqdn(canonical)?;

    let body = NewCname {
        name: &alias,
        canonical: &canonical,
        view,
        ttl,
        use_ttl: ttl.map(|_| true),
    };
    let record: Cname = create(transport, &body).await?;

    info!(
        alias = %record.name,
        canonical = %record.canonical,
        reference = %record.reference,
        "Created CNAME record"
    );
    Ok(record)
}

/// Find CNAME records by alias, ignoring case.
///
/// # Errors
///
/// Returns an error if the alias is malformed or the request fails. No match
/// is an empty vec.
pub async fn get_cname_records(
    transport: &WapiTransport,
    view: &str,
    alias: &str,
) -> Result<Vec<Cname>, WapiError> {
    let alias = normalize_fqdn(alias)?;
    search(
        transport,
        &[(NAME_CASE_INSENSITIVE_PARAM, alias.as_str()), (VIEW_PARAM, view)],
    )
    .await
}

/// Find every CNAME record pointing at `canonical`.
///
/// # Errors
///
/// Returns an error if the name is malformed or the request fails. No match
/// is an empty vec.
pub async fn get_cname_records_by_canonical(
    transport: &WapiTransport,
    view: &str,
    canonical: &str,
) -> Result<Vec<Cname>, WapiError> {
    let canonical = normalize_fqdn(canonical)?;
    search(transport, &[(CANONICAL_PARAM, canonical.as_str()), (VIEW_PARAM, view)]).await
}

/// Apply `patch` to every record whose alias matches `alias`.
async fn modify_matching(
    transport: &WapiTransport,
    view: &str,
    alias: &str,
    patch: &CnamePatch<'_>,
) -> Result<Vec<Cname>, WapiError> {
    let existing = get_cname_records(transport, view, alias).await?;

    let mut updated = Vec::with_capacity(existing.len());
    for record in &existing {
        let new_record: Cname = update(transport, &record.reference, patch).await?;
        info!(
            old_alias = %record.name,
            old_canonical = %record.canonical,
            alias = %new_record.name,
            canonical = %new_record.canonical,
            "Modified CNAME record"
        );
        updated.push(new_record);
    }
    Ok(updated)
}

/// Rename the alias of the record(s) matching `old_alias`.
///
/// # Errors
///
/// Returns an error if either name is malformed or a request fails. No match
/// is an empty vec.
pub async fn modify_cname_alias(
    transport: &WapiTransport,
    view: &str,
    old_alias: &str,
    new_alias: &str,
) -> Result<Vec<Cname>, WapiError> {
    let new_alias = normalize_fqdn(new_alias)?;
    let patch = CnamePatch {
        name: Some(new_alias.as_str()),
        ..CnamePatch::default()
    };
    modify_matching(transport, view, old_alias, &patch).await
}

/// Point the record(s) matching `alias` at `new_canonical`.
///
/// # Errors
///
/// Returns an error if either name is malformed or a request fails. No match
/// is an empty vec.
pub async fn modify_cname_canonical(
    transport: &WapiTransport,
    view: &str,
    alias: &str,
    new_canonical: &str,
) -> Result<Vec<Cname>, WapiError> {
    let new_canonical = normalize_fqdn(new_canonical)?;
    let patch = CnamePatch {
        canonical: Some(new_canonical.as_str()),
        ..CnamePatch::default()
    };
    modify_matching(transport, view, alias, &patch).await
}

/// Delete every CNAME record whose alias matches `alias`, ignoring case.
///
/// Returns the deleted references; nothing matching is not an error. A
/// matched record that is already gone when its `DELETE` arrives (404) counts
/// as deleted.
///
/// # Errors
///
/// Returns an error if the alias is malformed or a request fails.
pub async fn delete_cname_records(
    transport: &WapiTransport,
    view: &str,
    alias: &str,
) -> Result<Vec<String>, WapiError> {
    let existing = get_cname_records(transport, view, alias).await?;

    let mut deleted = Vec::with_capacity(existing.len());
    for record in &existing {
        let reference = match delete_reference(transport, &record.reference).await {
            Ok(reference) => reference,
            // Gone already: removed by another writer, or by an earlier
            // attempt whose response was lost before a retry
            Err(e) if e.status_code() == Some(404) => {
                debug!(
                    alias = %record.name,
                    reference = %record.reference,
                    "CNAME record already deleted"
                );
                record.reference.clone()
            }
            Err(e) => return Err(e),
        };
        info!(alias = %record.name, reference = %reference, "Deleted CNAME record");
        deleted.push(reference);
    }
    Ok(deleted)
}

#[cfg(test)]
#[path = "cname_tests.rs"]
mod cname_tests;
