// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use infoblox_cname::{
    constants::{
        DEFAULT_DNS_VIEW, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WAPI_VERSION, ENV_HOST,
        ENV_PASSWORD, ENV_USER, ENV_WAPI_VERSION,
    },
    InfobloxClient,
};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Manage CNAME records on an Infoblox appliance through WAPI.
#[derive(Debug, Parser)]
#[command(name = "infoblox-cname", version, about)]
struct Cli {
    /// Appliance host, host:port or URL
    #[arg(long, env = ENV_HOST)]
    endpoint: String,

    /// WAPI username
    #[arg(long, env = ENV_USER)]
    user: String,

    /// WAPI password
    #[arg(long, env = ENV_PASSWORD, hide_env_values = true, default_value = "")]
    password: String,

    /// WAPI version
    #[arg(long, env = ENV_WAPI_VERSION, default_value = DEFAULT_WAPI_VERSION)]
    wapi_version: String,

    /// DNS view
    #[arg(long, default_value = DEFAULT_DNS_VIEW)]
    view: String,

    /// TTL in seconds for created records
    #[arg(long)]
    ttl: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Log request and response bodies
    #[arg(long)]
    debug: bool,

    /// Do not retry transient failures
    #[arg(long)]
    no_retry: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a CNAME record
    Create { alias: String, canonical: String },
    /// Look up CNAME records by alias (case-insensitive)
    Get { alias: String },
    /// Look up every CNAME record pointing at a canonical name
    GetCanonical { canonical: String },
    /// Rename an alias
    Rename { old_alias: String, new_alias: String },
    /// Point an alias at a new canonical name
    Retarget { alias: String, canonical: String },
    /// Delete CNAME records by alias (case-insensitive)
    Delete { alias: String },
}

impl Cli {
    fn client(&self) -> Result<InfobloxClient> {
        let mut builder = InfobloxClient::builder()
            .endpoint(&self.endpoint)
            .username(&self.user)
            .password(&self.password)
            .wapi_version(&self.wapi_version)
            .dns_view(&self.view)
            .timeout(Duration::from_secs(self.timeout))
            .tls_verify(!self.insecure)
            .debug(self.debug)
            .retry(!self.no_retry);
        if let Some(ttl) = self.ttl {
            builder = builder.ttl(ttl);
        }
        builder.build().context("Invalid Infoblox client configuration")
    }
}

async fn run(client: &InfobloxClient, command: &Command) -> Result<Value> {
    let output = match command {
        Command::Create { alias, canonical } => serde_json::to_value(
            client
                .create_cname_rec(alias, canonical)
                .await
                .with_context(|| format!("Failed to create CNAME {alias} -> {canonical}"))?,
        )?,
        Command::Get { alias } => serde_json::to_value(
            client
                .get_cname_rec(alias)
                .await
                .with_context(|| format!("Failed to look up CNAME {alias}"))?,
        )?,
        Command::GetCanonical { canonical } => serde_json::to_value(
            client
                .get_cname_canonical_rec(canonical)
                .await
                .with_context(|| format!("Failed to look up CNAMEs pointing at {canonical}"))?,
        )?,
        Command::Rename {
            old_alias,
            new_alias,
        } => serde_json::to_value(
            client
                .modify_cname_rec(old_alias, new_alias)
                .await
                .with_context(|| format!("Failed to rename CNAME {old_alias} to {new_alias}"))?,
        )?,
        Command::Retarget { alias, canonical } => serde_json::to_value(
            client
                .modify_cname_canonical_rec(alias, canonical)
                .await
                .with_context(|| format!("Failed to point CNAME {alias} at {canonical}"))?,
        )?,
        Command::Delete { alias } => serde_json::to_value(
            client
                .delete_cname_rec(alias)
                .await
                .with_context(|| format!("Failed to delete CNAME {alias}"))?,
        )?,
    };
    Ok(output)
}

fn init_logging() {
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Respects RUST_LOG_FORMAT environment variable for output format (json|text)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    // Logs go to stderr so stdout stays machine-readable JSON
    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let client = cli.client()?;
    debug!(wapi_root = client.wapi_root(), "Infoblox client initialized");

    let output = runtime.block_on(run(&client, &cli.command))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
