//! Human-readable summaries of decoded records.
//!
//! Every function writes to a caller-supplied [`Write`] sink (stdout in the
//! CLI, a `Vec<u8>` in tests) and returns the sink's I/O error unchanged.
//! Nothing here terminates the process.
//!
//! Attribute values are rendered with [`attribute_value`]:
//!
//! | JSON value | Rendering |
//! |------------|-----------|
//! | `null` | `<nil>` |
//! | `"2024-06-10T08:15:00"` | `Mon, 10 Jun 2024 08:15:00 UTC` (hardware only) |
//! | `7.5` | `7.50` |
//! | `8` | `8` |
//! | other strings, bools | as-is |

use std::io::{self, Write};

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::applications::{CatalogApp, InstalledApp};
use crate::device_actions::{ActionResponse, DeviceActions};
use crate::devices::{Device, DeviceIdentifiers};
use crate::inventory::{DeviceAttribute, DeviceIdentity, DeviceSoftware, HardwareInventory};

const VENDOR_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const RFC1123_UTC: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Renders an attribute value.
///
/// With `parse_dates`, strings in the vendor's local timestamp format are
/// reinterpreted as UTC and shown in RFC 1123 form.
pub fn attribute_value(value: &Value, parse_dates: bool) -> String {
    match value {
        Value::Null => "<nil>".to_string(),
        Value::String(s) => {
            if parse_dates {
                if let Ok(ts) = NaiveDateTime::parse_from_str(s, VENDOR_TIME_FORMAT) {
                    return ts.and_utc().format(RFC1123_UTC).to_string();
                }
            }
            s.clone()
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => match n.as_f64() {
                Some(f) => format!("{f:.2}"),
                None => n.to_string(),
            },
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

fn write_attributes(
    out: &mut impl Write,
    attributes: &[DeviceAttribute],
    parse_dates: bool,
) -> io::Result<()> {
    for attr in attributes {
        writeln!(
            out,
            " {}: {}",
            attr.key,
            attribute_value(&attr.value, parse_dates)
        )?;
    }
    Ok(())
}

/// One line per device: ID, name, platform, status, user.
pub fn write_devices(out: &mut impl Write, devices: &[Device]) -> io::Result<()> {
    writeln!(out, "Found {} devices:", devices.len())?;
    for d in devices {
        writeln!(
            out,
            " {} | {} | {} | {} | {}",
            d.maas360_device_id,
            or_dash(d.device_name.as_deref()),
            or_dash(d.platform_name.as_deref()),
            or_dash(d.device_status.as_deref()),
            or_dash(d.username.as_deref()),
        )?;
    }
    Ok(())
}

/// Core attributes of one device.
pub fn write_device(out: &mut impl Write, device: &DeviceIdentifiers) -> io::Result<()> {
    writeln!(out, "Device {}:", device.maas360_device_id)?;
    let rows = [
        ("Name", device.device_name.as_deref()),
        ("Owner", device.device_owner.as_deref()),
        ("Username", device.username.as_deref()),
        ("Email", device.email_address.as_deref()),
        ("Platform", device.platform_name.as_deref()),
        ("Manufacturer", device.manufacturer.as_deref()),
        ("Model", device.model.as_deref()),
        ("OS", device.os_name.as_deref()),
        ("Ownership", device.ownership.as_deref()),
        ("Status", device.device_status.as_deref()),
        ("Managed", device.maas360_managed_status.as_deref()),
        ("Last Reported", device.last_reported.as_deref()),
    ];
    for (label, value) in rows {
        writeln!(out, " {label}: {}", or_dash(value))?;
    }
    writeln!(out, " IMEI/ESN: {}", or_dash(device.imei_esn.as_deref()))?;
    Ok(())
}

/// Hardware attributes, with timestamps converted to RFC 1123.
pub fn write_hardware_inventory(
    out: &mut impl Write,
    inventory: &HardwareInventory,
) -> io::Result<()> {
    writeln!(
        out,
        "Hardware Inventory for Device ID {}:",
        inventory.maas360_device_id
    )?;
    write_attributes(out, &inventory.attributes, true)
}

/// Installed packages with their attributes.
pub fn write_software(out: &mut impl Write, software: &DeviceSoftware) -> io::Result<()> {
    writeln!(
        out,
        "Software Installed for Device ID {}:",
        software.maas360_device_id
    )?;
    writeln!(
        out,
        "Last Data Refresh Time: {}",
        or_dash(software.last_data_refresh.as_deref())
    )?;
    for package in &software.software.0 {
        writeln!(out, "Software Name: {}", package.name)?;
        write_attributes(out, &package.attributes.0, false)?;
    }
    Ok(())
}

/// Network attributes of a device.
pub fn write_network_info(
    out: &mut impl Write,
    device_id: &str,
    attributes: &[DeviceAttribute],
) -> io::Result<()> {
    writeln!(out, "Network Info for Device ID {device_id}:")?;
    write_attributes(out, attributes, false)
}

/// Asset, purchase and warranty data plus custom attributes.
pub fn write_identity(out: &mut impl Write, identity: &DeviceIdentity) -> io::Result<()> {
    writeln!(
        out,
        "Device Attributes for Device ID {}:",
        identity.maas360_device_id
    )?;
    let purchase_price = identity.purchase_price.as_deref();
    let rows = [
        ("Ownership", identity.ownership.as_deref()),
        ("Office", identity.office.as_deref()),
        ("Department", identity.department.as_deref()),
        ("Vendor", identity.vendor.as_deref()),
        ("PO Number", identity.po_number.as_deref()),
        ("Purchase Type", identity.purchase_type.as_deref()),
        ("Purchase Date", identity.purchase_date.as_deref()),
        ("Purchase Price", purchase_price),
        ("Warranty Number", identity.warranty_number.as_deref()),
        (
            "Warranty Expiration Date",
            identity.warranty_expiration_date.as_deref(),
        ),
        ("Warranty Type", identity.warranty_type.as_deref()),
        ("Custom Asset Number", identity.custom_asset_number.as_deref()),
        ("Owner", identity.owner.as_deref()),
    ];
    for (label, value) in rows {
        writeln!(out, " {label}: {}", or_dash(value))?;
    }
    writeln!(out, " Custom Attributes:")?;
    for attr in identity.custom_attributes() {
        writeln!(out, " - {}: {}", attr.name, attribute_value(&attr.value, false))?;
    }
    Ok(())
}

/// The device's action catalog.
pub fn write_device_actions(out: &mut impl Write, actions: &DeviceActions) -> io::Result<()> {
    writeln!(out, "Available actions ({}):", actions.len())?;
    for a in actions.actions() {
        writeln!(out, " {} - {} [{}]", a.action_id, a.action_name, a.action_type)?;
    }
    Ok(())
}

/// Outcome of an action-style call.
pub fn write_action_response(out: &mut impl Write, response: &ActionResponse) -> io::Result<()> {
    writeln!(
        out,
        "Device {}: status {} {}",
        or_dash(response.maas360_device_id.as_deref()),
        response.action_status.value(),
        response.description.as_deref().unwrap_or_default()
    )?;
    if let Some(id) = response.action_id.as_deref() {
        writeln!(out, " Action ID: {id}")?;
    }
    Ok(())
}

/// One line per catalog app.
pub fn write_catalog_apps(out: &mut impl Write, apps: &[CatalogApp]) -> io::Result<()> {
    writeln!(out, "Found {} catalog apps:", apps.len())?;
    for app in apps {
        writeln!(
            out,
            " {} ({}) | {} | version {} | {}",
            app.app_name,
            app.app_id,
            or_dash(app.platform.as_deref()),
            or_dash(app.app_full_version.as_deref()),
            or_dash(app.status.as_deref()),
        )?;
    }
    Ok(())
}

/// One line per installed app.
pub fn write_installed_apps(out: &mut impl Write, apps: &[InstalledApp]) -> io::Result<()> {
    writeln!(out, "Found {} installed apps:", apps.len())?;
    for app in apps {
        writeln!(
            out,
            " {} ({}) | {} | {} devices | {} major versions",
            app.app_name,
            app.app_id,
            or_dash(app.platform.as_deref()),
            app.device_count.value(),
            app.major_versions.value(),
        )?;
    }
    Ok(())
}
