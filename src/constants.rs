// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Infoblox WAPI client.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// WAPI Constants
// ============================================================================

/// Path prefix under which every WAPI resource lives
pub const WAPI_PATH_PREFIX: &str = "wapi";

/// WAPI version used when none is configured
pub const DEFAULT_WAPI_VERSION: &str = "2.5";

/// Infoblox DNS view used when none is configured
pub const DEFAULT_DNS_VIEW: &str = "default";

/// WAPI object type for CNAME records
pub const OBJECT_TYPE_CNAME: &str = "record:cname";

/// Fields requested for every CNAME read or write (`_ref` is always returned)
pub const CNAME_RETURN_FIELDS: &str = "name,canonical,view,ttl,use_ttl";

/// Query parameter selecting the fields returned by WAPI
pub const RETURN_FIELDS_PARAM: &str = "_return_fields";

/// Case-insensitive equality search on a name field (`name:=value`)
pub const NAME_CASE_INSENSITIVE_PARAM: &str = "name:";

/// Exact search on the canonical target
pub const CANONICAL_PARAM: &str = "canonical";

/// Query parameter scoping searches to a DNS view
pub const VIEW_PARAM: &str = "view";

// ============================================================================
// HTTP Constants
// ============================================================================

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Scheme prepended to endpoints given as bare host or host:port
pub const DEFAULT_SCHEME: &str = "https";

// ============================================================================
// Environment Variables
// ============================================================================

/// Appliance host (and optional port)
pub const ENV_HOST: &str = "IBA_HOST";

/// WAPI username
pub const ENV_USER: &str = "IBA_USER";

/// WAPI password
pub const ENV_PASSWORD: &str = "IBA_PASSWORD";

/// DNS domain that integration tests create records under
pub const ENV_DOMAIN: &str = "IBA_DOMAIN";

/// Optional WAPI version override
pub const ENV_WAPI_VERSION: &str = "IBA_WAPI_VERSION";

/// Record TTL (seconds) used by clients built from the environment
pub const ENV_CLIENT_TTL_SECS: u32 = 1;
