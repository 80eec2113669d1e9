// Common test utilities for integration tests
//
// `FakeWapi` is a small stateful stand-in for the CNAME part of an Infoblox
// appliance, mounted on a wiremock server. The `scenario_*` functions hold the
// end-to-end checks and run against either the fake or a real appliance.

#![allow(dead_code)]

use infoblox_cname::{EnvConfig, InfobloxClient, WapiError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const WAPI_PREFIX: &str = "/wapi/v2.5/";
const CNAME_TYPE: &str = "record:cname";

#[derive(Debug, Clone)]
struct StoredCname {
    reference: String,
    name: String,
    canonical: String,
    view: String,
    ttl: Option<u64>,
}

impl StoredCname {
    fn to_json(&self) -> Value {
        let mut value = json!({
            "_ref": self.reference,
            "name": self.name,
            "canonical": self.canonical,
            "view": self.view,
            "use_ttl": self.ttl.is_some(),
        });
        if let Some(ttl) = self.ttl {
            value["ttl"] = json!(ttl);
        }
        value
    }
}

#[derive(Debug, Default)]
struct FakeState {
    records: Vec<StoredCname>,
    next_id: u64,
}

impl FakeState {
    fn make_ref(&mut self, name: &str, view: &str) -> String {
        self.next_id += 1;
        format!("{CNAME_TYPE}/ZG5zLmJpbmRfY25hbWUk{:04}:{name}/{view}", self.next_id)
    }

    fn name_taken(&self, name: &str, view: &str, except: Option<&str>) -> bool {
        self.records.iter().any(|r| {
            r.view == view && r.name.eq_ignore_ascii_case(name) && Some(r.reference.as_str()) != except
        })
    }
}

fn wapi_error(status: u16, code: &str, text: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "Error": format!("AdmConDataError: None ({text})"),
        "code": code,
        "text": text,
    }))
}

fn conflict(name: &str) -> ResponseTemplate {
    wapi_error(
        400,
        "Client.Ibap.Data.Conflict",
        &format!("The record '{name}' already exists."),
    )
}

/// Stateful fake of the WAPI `record:cname` endpoints.
#[derive(Debug, Clone, Default)]
pub struct FakeWapi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeWapi {
    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.state.lock().expect("fake state poisoned").records.len()
    }

    fn search(&self, request: &Request) -> ResponseTemplate {
        let state = self.state.lock().expect("fake state poisoned");
        let mut matches: Vec<Value> = Vec::new();

        'records: for record in &state.records {
            for (key, value) in request.url.query_pairs() {
                let keep = match key.as_ref() {
                    "name:" => record.name.eq_ignore_ascii_case(&value),
                    "name" => record.name == value,
                    "canonical" => record.canonical == value,
                    "view" => record.view == value,
                    _ => true,
                };
                if !keep {
                    continue 'records;
                }
            }
            matches.push(record.to_json());
        }

        ResponseTemplate::new(200).set_body_json(Value::Array(matches))
    }

    fn create(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return wapi_error(400, "Client.Ibap.Proto", "Invalid JSON body");
        };
        let (Some(name), Some(canonical)) = (body["name"].as_str(), body["canonical"].as_str())
        else {
            return wapi_error(400, "Client.Ibap.Proto", "Field name and canonical are required");
        };
        let view = body["view"].as_str().unwrap_or("default");
        let ttl = if body["use_ttl"].as_bool().unwrap_or(false) {
            body["ttl"].as_u64()
        } else {
            None
        };

        let mut state = self.state.lock().expect("fake state poisoned");
        if state.name_taken(name, view, None) {
            return conflict(name);
        }

        let record = StoredCname {
            reference: state.make_ref(name, view),
            name: name.to_string(),
            canonical: canonical.to_string(),
            view: view.to_string(),
            ttl,
        };
        let response = record.to_json();
        state.records.push(record);
        ResponseTemplate::new(201).set_body_json(response)
    }

    fn update(&self, reference: &str, request: &Request) -> ResponseTemplate {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return wapi_error(400, "Client.Ibap.Proto", "Invalid JSON body");
        };

        let mut state = self.state.lock().expect("fake state poisoned");
        let Some(index) = state.records.iter().position(|r| r.reference == reference) else {
            return not_found(reference);
        };

        let mut record = state.records[index].clone();
        if let Some(name) = body["name"].as_str() {
            if state.name_taken(name, &record.view, Some(reference)) {
                return conflict(name);
            }
            record.name = name.to_string();
            // WAPI references embed the name, so a rename issues a new one
            record.reference = state.make_ref(name, &record.view);
        }
        if let Some(canonical) = body["canonical"].as_str() {
            record.canonical = canonical.to_string();
        }

        let response = record.to_json();
        state.records[index] = record;
        ResponseTemplate::new(200).set_body_json(response)
    }

    fn delete(&self, reference: &str) -> ResponseTemplate {
        let mut state = self.state.lock().expect("fake state poisoned");
        let before = state.records.len();
        state.records.retain(|r| r.reference != reference);
        if state.records.len() == before {
            return not_found(reference);
        }
        ResponseTemplate::new(200).set_body_json(reference)
    }
}

fn not_found(reference: &str) -> ResponseTemplate {
    wapi_error(
        404,
        "Client.Ibap.Data.NotFound",
        &format!("Reference {reference} not found"),
    )
}

impl Respond for FakeWapi {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(resource) = request.url.path().strip_prefix(WAPI_PREFIX) else {
            return ResponseTemplate::new(404);
        };

        match (request.method.as_str(), resource) {
            ("GET", CNAME_TYPE) => self.search(request),
            ("POST", CNAME_TYPE) => self.create(request),
            ("PUT", reference) if reference.starts_with("record:cname/") => {
                self.update(reference, request)
            }
            ("DELETE", reference) if reference.starts_with("record:cname/") => {
                self.delete(reference)
            }
            _ => wapi_error(400, "Client.Ibap.Proto", "Unsupported request"),
        }
    }
}

/// Start a fake appliance and a client configured against it.
pub async fn start_fake_appliance() -> (MockServer, FakeWapi, InfobloxClient) {
    let server = MockServer::start().await;
    let fake = FakeWapi::default();

    Mock::given(path_regex(r"^/wapi/v2\.5/"))
        .respond_with(fake.clone())
        .mount(&server)
        .await;

    let client = InfobloxClient::builder()
        .endpoint(server.uri())
        .username("admin")
        .password("infoblox")
        .ttl(1)
        .tls_verify(false)
        .debug(true)
        .build()
        .expect("client for fake appliance");

    (server, fake, client)
}

/// Get a client for the appliance named in the environment, or skip the test.
pub fn get_appliance_client_or_skip() -> Option<(InfobloxClient, String)> {
    let env = EnvConfig::from_env();
    if !env.is_valid() {
        eprintln!("Skipping integration test: {}", env.err_msg());
        return None;
    }
    match env.client() {
        Ok(client) => Some((client, env.domain().to_string())),
        Err(e) => {
            eprintln!("Skipping integration test: {e}");
            None
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

/// Create, rename, retarget and delete one alias.
pub async fn scenario_create_modify_delete(
    client: &InfobloxClient,
    domain: &str,
) -> Result<(), WapiError> {
    let canonical = format!("cname-test.{domain}");
    let new_canonical = format!("cname-test-mod.{domain}");
    let alias = format!("cname-test-cname1.{domain}");
    let new_alias = format!("cname-test-cname1-mod.{domain}");

    client.delete_cname_rec(&alias).await?;
    client.delete_cname_rec(&new_alias).await?;
    assert!(client.get_cname_rec(&alias).await?.is_empty());

    let created = client.create_cname_rec(&alias, &canonical).await?;
    assert_eq!(created.canonical(), canonical);

    let found = client.get_cname_rec(&alias).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].canonical(), canonical);

    let renamed = client.modify_cname_rec(&alias, &new_alias).await?;
    assert_eq!(renamed.len(), 1);

    let retargeted = client
        .modify_cname_canonical_rec(&new_alias, &new_canonical)
        .await?;
    assert_eq!(retargeted.len(), 1);
    assert_eq!(retargeted[0].name(), new_alias);
    assert_eq!(retargeted[0].canonical(), new_canonical);

    assert!(client.delete_cname_rec(&alias).await?.is_empty());
    assert_eq!(client.delete_cname_rec(&new_alias).await?.len(), 1);
    Ok(())
}

/// Lookups and deletes by alias ignore case.
pub async fn scenario_case_insensitive(
    client: &InfobloxClient,
    domain: &str,
) -> Result<(), WapiError> {
    let alias = format!("cname-test-cs-cname1.{domain}");
    let canonical = format!("cname-test-cs.{domain}");

    client.delete_cname_rec(&alias).await?;
    assert!(client.get_cname_rec(&alias).await?.is_empty());

    let created = client.create_cname_rec(&alias, &canonical).await?;
    assert_eq!(created.canonical(), canonical);

    let upper = alias.to_uppercase();
    let found = client.get_cname_rec(&upper).await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].canonical(), canonical);

    assert_eq!(client.delete_cname_rec(&upper).await?.len(), 1);
    assert!(client.get_cname_rec(&alias).await?.is_empty());
    Ok(())
}

/// Reverse lookup returns every alias of a canonical name.
pub async fn scenario_canonical_lookup(
    client: &InfobloxClient,
    domain: &str,
) -> Result<(), WapiError> {
    let alias1 = format!("cname-test-cn-cname1.{domain}");
    let alias2 = format!("cname-test-cn-cname2.{domain}");
    let canonical = format!("cname-test-cn.{domain}");

    client.delete_cname_rec(&alias1).await?;
    client.delete_cname_rec(&alias2).await?;
    assert!(client.get_cname_canonical_rec(&canonical).await?.is_empty());

    let cname1 = client.create_cname_rec(&alias1, &canonical).await?;
    assert_eq!(cname1.canonical(), canonical);
    let cname2 = client.create_cname_rec(&alias2, &canonical).await?;
    assert_eq!(cname2.canonical(), canonical);

    let aliases = client.get_cname_canonical_rec(&canonical).await?;
    assert_eq!(aliases.len(), 2);
    assert!(aliases.contains(&cname1));
    assert!(aliases.contains(&cname2));

    let ref1 = client.delete_record(&cname1).await?;
    assert!(!ref1.is_empty());
    let ref2 = client.delete_record(&cname2).await?;
    assert!(!ref2.is_empty());

    assert!(client.get_cname_canonical_rec(&canonical).await?.is_empty());
    Ok(())
}
