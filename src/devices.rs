//! Device lookup and search for the MaaS360 API.
//!
//! This module covers the two read endpoints of the `device-apis` family
//! that return device records:
//!
//! - [`get_device`] — core attributes of one device.
//! - [`search_devices`] — filtered search across the customer's devices.
//!
//! Field names follow the vendor's camelCase contract. Fields the vendor
//! encodes inconsistently (epoch timestamps, IMEI, phone numbers, device
//! IDs) use the [`flexible`](crate::flexible) adapters so both encodings
//! decode to the same value.
//!
//! ## Search filters
//!
//! [`search_devices`] passes the filter map through as query parameters.
//! Commonly used keys: `deviceStatus` (`Active` | `InActive`),
//! `partialDeviceName`, `partialUsername`, `partialPhoneNumber`, `udid`,
//! `imeiMeid`, `wifiMacAddress`, `platformName` (`iOS`, `Android`,
//! `Windows`, `Mac`, `Others`), `maas360ManagedStatus`, `email`,
//! `pageSize`, `pageNumber`. An empty map searches with the vendor
//! defaults (active devices, first page).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::error::{MaasError, Result, require};
use crate::flexible::{FlexibleInt, FlexibleString, OneOrMany, null_as_default};
use crate::transport::Transport;

/// Query filters for search endpoints. Ordered so request URLs are
/// reproducible; the server does not care about parameter order.
pub type Filters = BTreeMap<String, String>;

// ── Response types ─────────────────────────────────────────────────────

/// Core identifiers and status of a single device, as returned by
/// `devices/1.0/core`.
///
/// Undocumented fields carry the vendor field of the same camelCase name
/// verbatim.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceIdentifiers {
    /// MaaS360 device ID (e.g. `"ApplF17XXXXXXX"`).
    #[serde(rename = "maas360DeviceID")]
    pub maas360_device_id: FlexibleString,
    pub device_name: Option<String>,
    pub custom_asset_number: Option<String>,
    /// `"Corporate Owned"`, `"Employee Owned"`, ...
    pub ownership: Option<String>,
    pub device_owner: Option<String>,
    pub username: Option<String>,
    pub email_address: Option<String>,
    pub platform_name: Option<String>,
    #[serde(rename = "sourceID")]
    pub source_id: FlexibleInt,
    pub device_type: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub os_name: Option<String>,
    pub os_service_pack: Option<String>,
    pub imei_esn: FlexibleString,
    pub installed_date: Option<String>,
    pub last_reported: Option<String>,
    pub installed_date_in_epochms: FlexibleInt,
    pub last_reported_in_epochms: FlexibleInt,
    /// `"Active"` or `"Inactive"`.
    pub device_status: Option<String>,
    #[serde(rename = "maas360ManagedStatus")]
    pub maas360_managed_status: Option<String>,
    pub udid: Option<String>,
    pub wifi_mac_address: Option<String>,
    pub mailbox_device_id: Option<String>,
    pub mailbox_last_reported: Option<String>,
    pub mailbox_last_reported_in_epochms: FlexibleInt,
    pub mailbox_managed: Option<String>,
    pub is_supervised_device: Option<bool>,
    pub test_device: Option<bool>,
    pub unified_traveler_device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    device: DeviceIdentifiers,
}

/// A device record as returned by the search endpoint.
///
/// The search schema differs from [`DeviceIdentifiers`] in a handful of
/// names (`modelId`, `platformSerialNumber`) and carries compliance state.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    #[serde(rename = "maas360DeviceID")]
    pub maas360_device_id: FlexibleString,
    pub device_name: Option<String>,
    pub custom_asset_number: Option<String>,
    pub device_owner: Option<String>,
    pub email_address: Option<String>,
    pub username: Option<String>,
    pub user_domain: Option<String>,
    pub platform_name: Option<String>,
    pub device_type: Option<String>,
    pub manufacturer: Option<String>,
    pub model_id: Option<String>,
    pub os_name: Option<String>,
    /// OS version; numeric on some platforms.
    pub os_version: FlexibleString,
    pub os_service_pack: Option<String>,
    pub platform_serial_number: Option<String>,
    pub imei_esn: FlexibleString,
    pub phone_number: FlexibleString,
    pub udid: Option<String>,
    pub wifi_mac_address: Option<String>,
    pub ownership: Option<String>,
    pub device_status: Option<String>,
    #[serde(rename = "maas360ManagedStatus")]
    pub maas360_managed_status: Option<String>,
    pub enrollment_mode: Option<String>,
    pub installed_date: Option<String>,
    pub last_reported: Option<String>,
    pub first_registered_in_epochms: FlexibleInt,
    pub installed_date_in_epochms: FlexibleInt,
    pub last_mdm_registered_in_epochms: FlexibleInt,
    pub last_reported_in_epochms: FlexibleInt,
    pub last_registered_in_epochms: FlexibleInt,
    pub mailbox_device_id: FlexibleString,
    pub mailbox_last_reported: Option<String>,
    pub mailbox_last_reported_in_epochms: FlexibleInt,
    pub mailbox_managed: Option<String>,
    pub mdm_mailbox_device_id: Option<String>,
    pub mdm_policy: Option<String>,
    pub unified_traveler_device_id: FlexibleString,
    pub app_compliance_state: Option<String>,
    pub policy_compliance_state: Option<String>,
    pub rule_compliance_state: Option<String>,
    pub passcode_compliance: Option<String>,
    pub encryption_status: Option<String>,
    pub jailbreak_status: Option<String>,
    pub selective_wipe_status: Option<String>,
    pub is_supervised_device: Option<bool>,
    pub test_device: Option<bool>,
    #[serde(rename = "sourceID")]
    pub source_id: FlexibleInt,
}

/// Page envelope of the search endpoint: `{"devices":{"device":[...]}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevicePage {
    /// Total number of matches across all pages.
    pub count: FlexibleInt,
    /// Requested page size.
    pub page_size: FlexibleInt,
    /// 1-based page number of this page.
    pub page_number: FlexibleInt,
    /// One object instead of an array when the page has a single device.
    pub device: OneOrMany<Device>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    devices: DevicePage,
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Retrieves the core attributes of one device.
///
/// Fields the vendor leaves out stay at their defaults; an unknown device
/// typically comes back as an empty record rather than an error.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — empty `device_id`.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn get_device(
    transport: &Transport,
    session: &Session,
    device_id: &str,
) -> Result<DeviceIdentifiers> {
    require("device_id", device_id)?;
    let billing_id = session.billing_id();
    let url = transport.url(
        billing_id,
        &format!("/device-apis/devices/1.0/core/{billing_id}"),
        [("deviceId", device_id)],
    )?;
    let response: DeviceResponse = transport.get(url, session.access_token()).await?;
    Ok(response.device)
}

/// Searches the customer's devices.
///
/// Returns the devices on the requested page in the order the vendor sent
/// them. Paging is the caller's job: repeat with an incremented
/// `pageNumber` filter to walk further pages.
///
/// # Errors
///
/// - `MaasError::NotFound` — the search matched no devices.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn search_devices(
    transport: &Transport,
    session: &Session,
    filters: &Filters,
) -> Result<Vec<Device>> {
    let billing_id = session.billing_id();
    let url = transport.url(
        billing_id,
        &format!("/device-apis/devices/2.0/search/customer/{billing_id}"),
        filters.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;
    let response: SearchResponse = transport.get(url, session.access_token()).await?;
    let devices = response.devices.device.into_vec();
    if devices.is_empty() {
        return Err(MaasError::NotFound {
            resource: "devices",
        });
    }
    tracing::debug!("Device search returned {} devices", devices.len());
    Ok(devices)
}
