// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CNAME tests against a real Infoblox appliance.
//!
//! Requires IBA_HOST, IBA_USER, IBA_PASSWORD and IBA_DOMAIN. Records are
//! created and removed under IBA_DOMAIN.
//!
//! Run with: cargo test --test live_appliance -- --ignored

mod common;

use common::{
    get_appliance_client_or_skip, scenario_canonical_lookup, scenario_case_insensitive,
    scenario_create_modify_delete,
};

#[tokio::test]
#[ignore = "Requires an Infoblox appliance configured through IBA_* environment variables"]
async fn test_live_create_modify_delete() {
    let Some((client, domain)) = get_appliance_client_or_skip() else {
        return;
    };
    scenario_create_modify_delete(&client, &domain)
        .await
        .expect("lifecycle should succeed");
}

#[tokio::test]
#[ignore = "Requires an Infoblox appliance configured through IBA_* environment variables"]
async fn test_live_case_insensitive() {
    let Some((client, domain)) = get_appliance_client_or_skip() else {
        return;
    };
    scenario_case_insensitive(&client, &domain)
        .await
        .expect("case-insensitive operations should succeed");
}

#[tokio::test]
#[ignore = "Requires an Infoblox appliance configured through IBA_* environment variables"]
async fn test_live_canonical_lookup() {
    let Some((client, domain)) = get_appliance_client_or_skip() else {
        return;
    };
    scenario_canonical_lookup(&client, &domain)
        .await
        .expect("reverse lookup should succeed");
}
