//! Per-device inventory endpoints: hardware, installed software, network
//! information and identity attributes.
//!
//! Hardware and network information come back as loosely typed key/value
//! lists. Their values can be strings, numbers, booleans or null depending
//! on the key, so [`DeviceAttribute::value`] keeps the raw
//! [`serde_json::Value`]; rendering is left to [`report`](crate::report).

use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::error::{Result, require};
use crate::flexible::{FlexibleString, OneOrMany, null_as_default};
use crate::transport::Transport;

// ── Response types ─────────────────────────────────────────────────────

/// A typed key/value attribute (hardware, network and software details).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceAttribute {
    /// Attribute name (e.g. `"Total RAM"`, `"Wi-Fi MAC Address"`).
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    /// Vendor type hint (`"String"`, `"Integer"`, `"Float"`, `"Timestamp"`, ...).
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub attr_type: String,
    /// Raw value; shape depends on the key.
    pub value: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AttributeList {
    device_attribute: OneOrMany<DeviceAttribute>,
}

/// Hardware inventory of one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HardwareInventory {
    /// Device the inventory belongs to.
    pub maas360_device_id: FlexibleString,
    /// Hardware attributes in vendor order.
    pub attributes: Vec<DeviceAttribute>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeviceHardware {
    #[serde(rename = "maas360DeviceId", alias = "maas360DeviceID")]
    maas360_device_id: FlexibleString,
    #[serde(rename = "deviceAttributes", deserialize_with = "null_as_default")]
    device_attributes: AttributeList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardwareInventoryResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    device_hardware: DeviceHardware,
}

/// One installed software package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Software {
    /// Package display name.
    #[serde(rename = "swName", deserialize_with = "null_as_default")]
    pub name: String,
    /// Version, size, install date and similar attributes.
    #[serde(rename = "swAttrs")]
    pub attributes: OneOrMany<DeviceAttribute>,
}

/// Installed software of one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSoftware {
    /// Device the list belongs to.
    #[serde(rename = "maas360DeviceID", alias = "maas360DeviceId")]
    pub maas360_device_id: FlexibleString,
    /// When the device last reported its software list.
    #[serde(rename = "lastSoftwareDataRefreshDate")]
    pub last_data_refresh: Option<String>,
    /// Installed packages in vendor order.
    #[serde(rename = "deviceSw")]
    pub software: OneOrMany<Software>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SoftwareInstalledResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    device_softwares: DeviceSoftware,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NetworkInformation {
    #[serde(rename = "deviceAttributes", deserialize_with = "null_as_default")]
    device_attributes: AttributeList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkInformationResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    network_information: NetworkInformation,
}

/// An administrator-defined attribute on a device's identity record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomAttribute {
    /// Attribute name.
    #[serde(rename = "customAttributeName", deserialize_with = "null_as_default")]
    pub name: String,
    /// Attribute value; text, number, boolean or date depending on the
    /// attribute's definition.
    #[serde(rename = "customAttributeValue")]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CustomAttributeList {
    custom_attribute: OneOrMany<CustomAttribute>,
}

/// Asset and ownership record of a device.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceIdentity {
    #[serde(rename = "maas360DeviceID")]
    pub maas360_device_id: FlexibleString,
    pub custom_asset_number: Option<String>,
    pub owner: Option<String>,
    pub ownership: Option<String>,
    pub vendor: Option<String>,
    pub po_number: Option<String>,
    pub purchase_type: Option<String>,
    pub purchase_date: Option<String>,
    pub purchase_price: FlexibleString,
    pub warranty_number: Option<String>,
    pub warranty_expiration_date: Option<String>,
    pub warranty_type: Option<String>,
    pub office: Option<String>,
    pub department: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    custom_attributes: CustomAttributeList,
}

impl DeviceIdentity {
    /// Administrator-defined attributes in vendor order.
    pub fn custom_attributes(&self) -> &[CustomAttribute] {
        &self.custom_attributes.custom_attribute.0
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceIdentityResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    device_identity: DeviceIdentity,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Fetches and decodes a `device-apis/devices/1.0/{resource}` record.
async fn get_device_resource<T: serde::de::DeserializeOwned>(
    transport: &Transport,
    session: &Session,
    resource: &str,
    device_id: &str,
) -> Result<T> {
    require("device_id", device_id)?;
    let billing_id = session.billing_id();
    let url = transport.url(
        billing_id,
        &format!("/device-apis/devices/1.0/{resource}/{billing_id}"),
        [("deviceId", device_id)],
    )?;
    transport.get(url, session.access_token()).await
}

/// Retrieves the hardware inventory of a device.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — empty `device_id`.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn get_hardware_inventory(
    transport: &Transport,
    session: &Session,
    device_id: &str,
) -> Result<HardwareInventory> {
    let response: HardwareInventoryResponse =
        get_device_resource(transport, session, "hardwareInventory", device_id).await?;
    let hardware = response.device_hardware;
    Ok(HardwareInventory {
        maas360_device_id: hardware.maas360_device_id,
        attributes: hardware.device_attributes.device_attribute.into_vec(),
    })
}

/// Retrieves the software installed on a device.
///
/// A device that has never reported software yields an empty list.
///
/// # Errors
///
/// Same as [`get_hardware_inventory`].
pub async fn get_software_installed(
    transport: &Transport,
    session: &Session,
    device_id: &str,
) -> Result<DeviceSoftware> {
    let response: SoftwareInstalledResponse =
        get_device_resource(transport, session, "softwareInstalled", device_id).await?;
    Ok(response.device_softwares)
}

/// Retrieves network details (carrier, roaming, IP and MAC addresses).
///
/// # Errors
///
/// Same as [`get_hardware_inventory`].
pub async fn get_network_info(
    transport: &Transport,
    session: &Session,
    device_id: &str,
) -> Result<Vec<DeviceAttribute>> {
    let response: NetworkInformationResponse =
        get_device_resource(transport, session, "mdNetworkInformation", device_id).await?;
    Ok(response
        .network_information
        .device_attributes
        .device_attribute
        .into_vec())
}

/// Retrieves the identity record (asset, purchase and warranty data plus
/// custom attributes) of a device.
///
/// # Errors
///
/// Same as [`get_hardware_inventory`].
pub async fn get_device_attributes(
    transport: &Transport,
    session: &Session,
    device_id: &str,
) -> Result<DeviceIdentity> {
    let response: DeviceIdentityResponse =
        get_device_resource(transport, session, "identity", device_id).await?;
    Ok(response.device_identity)
}
