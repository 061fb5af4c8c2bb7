//! CI validation for the endpoint manifest (manifest/endpoints.toml).
//!
//! These tests keep the manifest syntactically valid and in step with the
//! library: every endpoint must have its required fields, paths must be
//! anchored at the instance root and carry the billing ID, and every
//! endpoint the library wraps must be flagged as implemented.

use serde::Deserialize;

/// Top-level manifest structure matching the TOML schema.
#[derive(Debug, Deserialize)]
struct Manifest {
    meta: Meta,
    endpoints: Vec<Endpoint>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Meta {
    schema_version: u32,
    last_validated: String,
}

/// A single endpoint entry in the manifest.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Endpoint {
    family: String,
    name: String,
    method: String,
    path: String,
    request_content_type: String,
    response_status: u16,
    permissions: Vec<String>,
    implemented: bool,
    #[serde(default)]
    notes: String,
}

fn load_manifest() -> Manifest {
    let content = std::fs::read_to_string("manifest/endpoints.toml")
        .expect("manifest/endpoints.toml should exist and be readable");
    toml::from_str(&content).expect("manifest/endpoints.toml should be valid TOML")
}

#[test]
fn manifest_endpoints_toml_is_valid() {
    let manifest = load_manifest();

    assert!(
        manifest.meta.schema_version >= 1,
        "schema_version must be at least 1"
    );
    assert!(
        !manifest.endpoints.is_empty(),
        "manifest should contain at least one endpoint"
    );

    for ep in &manifest.endpoints {
        assert!(!ep.family.is_empty(), "endpoint family must not be empty");
        assert!(!ep.name.is_empty(), "endpoint name must not be empty");
        assert!(!ep.method.is_empty(), "endpoint method must not be empty");
        assert!(!ep.path.is_empty(), "endpoint path must not be empty");
        assert_eq!(
            ep.response_status, 200,
            "endpoint '{}': every MaaS360 call succeeds with 200 only",
            ep.name
        );
    }
}

#[test]
fn manifest_paths_are_rooted_and_scoped_to_billing_id() {
    let manifest = load_manifest();
    for ep in &manifest.endpoints {
        assert!(
            ep.path.starts_with('/'),
            "endpoint '{}' path must start with '/'",
            ep.name
        );
        assert!(
            ep.path.contains("{billingId}"),
            "endpoint '{}' path must include the billing ID",
            ep.name
        );
    }
}

#[test]
fn manifest_has_every_wrapped_endpoint_implemented() {
    let manifest = load_manifest();

    let implemented_names: Vec<&str> = manifest
        .endpoints
        .iter()
        .filter(|ep| ep.implemented)
        .map(|ep| ep.name.as_str())
        .collect();

    for expected in [
        "authenticate",
        "refresh_token",
        "get_device",
        "search_devices",
        "get_device_actions",
        "perform_device_action",
        "lock_device",
        "hide_device",
        "send_message",
        "get_hardware_inventory",
        "get_software_installed",
        "get_network_info",
        "get_device_attributes",
        "search_catalog",
        "search_installed_apps",
    ] {
        assert!(
            implemented_names.contains(&expected),
            "endpoint '{expected}' should be marked as implemented"
        );
    }
}

#[test]
fn manifest_endpoint_methods_are_valid_http_verbs() {
    let manifest = load_manifest();

    let valid_methods = ["GET", "POST", "PUT", "PATCH", "DELETE"];
    for ep in &manifest.endpoints {
        assert!(
            valid_methods.contains(&ep.method.as_str()),
            "endpoint '{}' has invalid method '{}', expected one of {:?}",
            ep.name,
            ep.method,
            valid_methods
        );
    }
}

#[test]
fn manifest_content_types_match_request_shape() {
    // JSON bodies go to auth and action dispatch; everything else is bodyless.
    let manifest = load_manifest();
    for ep in &manifest.endpoints {
        let expected = if ep.family == "auth" || ep.name == "perform_device_action" {
            "application/json"
        } else {
            "application/x-www-form-urlencoded"
        };
        assert_eq!(
            ep.request_content_type, expected,
            "endpoint '{}' has unexpected content type",
            ep.name
        );
    }
}
