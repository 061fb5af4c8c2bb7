//! Integration tests for the inventory endpoints using wiremock.
//!
//! - GET .../hardwareInventory/{billing}     — get_hardware_inventory
//! - GET .../softwareInstalled/{billing}     — get_software_installed
//! - GET .../mdNetworkInformation/{billing}  — get_network_info
//! - GET .../identity/{billing}              — get_device_attributes

use maas360_api::auth::Session;
use maas360_api::inventory::*;
use maas360_api::transport::Transport;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_transport(server: &MockServer) -> (Transport, Session) {
    let transport = Transport::with_endpoint(&server.uri()).unwrap();
    let session = Session::new("123456", "mock-token").unwrap();
    (transport, session)
}

async fn mount_resource(server: &MockServer, resource: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/device-apis/devices/1.0/{resource}/123456")))
        .and(query_param("deviceId", "Andr3551"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn hardware_inventory_flattens_attribute_list() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);
    mount_resource(
        &server,
        "hardwareInventory",
        json!({
            "deviceHardware": {
                "maas360DeviceId": "Andr3551",
                "deviceAttributes": {
                    "deviceAttribute": [
                        {"key": "Manufacturer", "type": "String", "value": "Google"},
                        {"key": "Total Storage", "type": "Float", "value": 118.25}
                    ]
                }
            }
        }),
    )
    .await;

    let hw = get_hardware_inventory(&transport, &session, "Andr3551")
        .await
        .unwrap();
    assert_eq!(hw.maas360_device_id.as_deref(), Some("Andr3551"));
    assert_eq!(hw.attributes.len(), 2);
    assert_eq!(hw.attributes[1].value, json!(118.25));
}

#[tokio::test]
async fn software_installed_returns_packages() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);
    mount_resource(
        &server,
        "softwareInstalled",
        json!({
            "deviceSoftwares": {
                "maas360DeviceID": "Andr3551",
                "lastSoftwareDataRefreshDate": "2024-06-10T08:15:00",
                "deviceSw": [
                    {"swName": "Chrome", "swAttrs": [{"key": "Version", "type": "String", "value": "125.0"}]},
                    {"swName": "Gmail", "swAttrs": []}
                ]
            }
        }),
    )
    .await;

    let sw = get_software_installed(&transport, &session, "Andr3551")
        .await
        .unwrap();
    assert_eq!(sw.software.0.len(), 2);
    assert_eq!(sw.software.0[0].name, "Chrome");
    assert_eq!(
        sw.last_data_refresh.as_deref(),
        Some("2024-06-10T08:15:00")
    );
}

#[tokio::test]
async fn software_installed_empty_is_not_an_error() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);
    mount_resource(&server, "softwareInstalled", json!({"deviceSoftwares": {}})).await;

    let sw = get_software_installed(&transport, &session, "Andr3551")
        .await
        .unwrap();
    assert!(sw.software.0.is_empty());
}

#[tokio::test]
async fn network_info_returns_attributes() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);
    mount_resource(
        &server,
        "mdNetworkInformation",
        json!({
            "networkInformation": {
                "maas360DeviceID": "Andr3551",
                "deviceAttributes": {
                    "deviceAttribute": {"key": "Roaming", "type": "Boolean", "value": false}
                }
            }
        }),
    )
    .await;

    let attrs = get_network_info(&transport, &session, "Andr3551")
        .await
        .unwrap();
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0].key, "Roaming");
    assert_eq!(attrs[0].value, json!(false));
}

#[tokio::test]
async fn device_attributes_include_custom_attributes() {
    let server = MockServer::start().await;
    let (transport, session) = mock_transport(&server);
    mount_resource(
        &server,
        "identity",
        json!({
            "deviceIdentity": {
                "maas360DeviceID": "Andr3551",
                "ownership": "Employee Owned",
                "warrantyType": "Extended",
                "customAttributes": {
                    "customAttribute": [
                        {"customAttributeName": "CostCenter", "customAttributeValue": "CC-42"}
                    ]
                }
            }
        }),
    )
    .await;

    let identity = get_device_attributes(&transport, &session, "Andr3551")
        .await
        .unwrap();
    assert_eq!(identity.ownership.as_deref(), Some("Employee Owned"));
    assert_eq!(identity.custom_attributes()[0].name, "CostCenter");
}
