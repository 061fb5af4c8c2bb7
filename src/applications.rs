//! App catalog and installed-app search for the MaaS360 API.
//!
//! Both searches take a filter map that is sent as query parameters and
//! return the records of one page. The client does not paginate; pass
//! `pageSize` (25, 50, 100, 200 or 250) and `pageNumber` to walk pages.
//!
//! ## Catalog filters
//!
//! `appId` (required, partial or full), `appName`, `appType`
//! (1 iOS enterprise, 2 iOS App Store, 3 Android enterprise, 4 Android
//! market, 8 iOS web clip, 10 Mac App Store, 11 Mac enterprise),
//! `enterpriseRating` (1-5), `category`, `status` (`Active` | `Deleted`),
//! `deviceType` (1 smartphone, 2 tablet, 3 both), `instantUpdate` (0 | 1).
//!
//! ## Installed-app filters
//!
//! `partialAppName`, `appID`, `platform` (`iOS`, `Android`, `BlackBerry`).

use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::devices::Filters;
use crate::error::{MaasError, Result};
use crate::flexible::{FlexibleInt, OneOrMany, null_as_default};
use crate::transport::Transport;

// ── Response types ─────────────────────────────────────────────────────

/// An app distributed through the customer's catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogApp {
    /// Bundle or package ID (e.g. `"com.example.app"`).
    #[serde(deserialize_with = "null_as_default")]
    pub app_id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub app_name: String,
    /// Platform (`"iOS"`, `"Android"`, ...).
    pub platform: Option<String>,
    /// Distribution type code; see the module docs.
    pub app_type: FlexibleInt,
    /// Full version string.
    pub app_full_version: Option<String>,
    /// Vendor version state code.
    pub app_version_state: FlexibleInt,
    /// Catalog category.
    pub category: Option<String>,
    /// Administrator rating, 1-5.
    pub enterprise_rating: Option<String>,
    /// Uploaded file name for enterprise apps.
    pub file_name: Option<String>,
    /// Uploaded file size as reported by the vendor.
    pub file_size: Option<String>,
    /// `"Active"` or `"Deleted"`.
    pub status: Option<String>,
    /// Target device class code.
    pub device_type: FlexibleInt,
    /// Upload timestamp.
    pub upload_date: Option<String>,
    /// Administrator who uploaded the app.
    pub uploaded_by: Option<String>,
    /// Last change timestamp.
    pub last_updated: Option<String>,
    /// Administrator who last changed the app.
    pub last_updated_by: Option<String>,
    /// `1` when updates are pushed immediately.
    pub instant_update: FlexibleInt,
    /// Distribution group name.
    pub group_name: Option<String>,
    /// Distribution group ID.
    pub group_id: FlexibleInt,
    /// Self-service portal ID.
    pub ss_id: FlexibleInt,
    /// VPP code summary.
    pub vpp_codes: Option<String>,
    /// Relative icon URL.
    #[serde(rename = "appIconURL")]
    pub app_icon_url: Option<String>,
    /// Absolute icon URL.
    #[serde(rename = "appIconFullURL")]
    pub app_icon_full_url: Option<String>,
}

/// One page of catalog search results.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogApps {
    /// Total number of matches across all pages.
    pub count: FlexibleInt,
    /// Requested page size.
    pub page_size: FlexibleInt,
    /// 1-based page number.
    pub page_number: FlexibleInt,
    /// Apps on this page.
    pub app: OneOrMany<CatalogApp>,
}

#[derive(Debug, Deserialize)]
struct CatalogAppsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    apps: CatalogApps,
}

/// An app found installed on managed devices, aggregated across devices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstalledApp {
    /// Bundle or package ID.
    #[serde(rename = "appID", alias = "appId", deserialize_with = "null_as_default")]
    pub app_id: String,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub app_name: String,
    /// Number of devices with the app installed.
    pub device_count: FlexibleInt,
    /// Number of distinct major versions in the fleet.
    pub major_versions: FlexibleInt,
    /// Platform (`"iOS"`, `"Android"`, ...).
    pub platform: Option<String>,
}

/// One page of installed-app search results.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstalledApps {
    /// Total number of matches across all pages.
    pub count: FlexibleInt,
    /// Requested page size.
    pub page_size: FlexibleInt,
    /// 1-based page number.
    pub page_number: FlexibleInt,
    /// Apps on this page.
    pub app: OneOrMany<InstalledApp>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstalledAppsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    installed_apps: InstalledApps,
}

// ── Endpoint functions ─────────────────────────────────────────────────

fn require_filters(filters: &Filters) -> Result<()> {
    if filters.is_empty() {
        return Err(MaasError::InvalidArgument {
            field: "filters",
            reason: "at least one search filter is required".to_string(),
        });
    }
    Ok(())
}

/// Searches the app catalog.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — `filters` is empty or has no
///   non-empty `appId`.
/// - `MaasError::NotFound` — no app matched.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn search_catalog(
    transport: &Transport,
    session: &Session,
    filters: &Filters,
) -> Result<Vec<CatalogApp>> {
    require_filters(filters)?;
    if filters.get("appId").is_none_or(|id| id.is_empty()) {
        return Err(MaasError::InvalidArgument {
            field: "appId",
            reason: "the catalog search requires an appId filter".to_string(),
        });
    }

    let billing_id = session.billing_id();
    let url = transport.url(
        billing_id,
        &format!("/application-apis/applications/2.0/search/customer/{billing_id}"),
        filters.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;
    let response: CatalogAppsResponse = transport.get(url, session.access_token()).await?;
    let apps = response.apps.app.into_vec();
    if apps.is_empty() {
        return Err(MaasError::NotFound { resource: "apps" });
    }
    tracing::debug!("Catalog search returned {} apps", apps.len());
    Ok(apps)
}

/// Searches apps installed across the customer's devices.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — `filters` is empty.
/// - `MaasError::NotFound` — no app matched.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn search_installed_apps(
    transport: &Transport,
    session: &Session,
    filters: &Filters,
) -> Result<Vec<InstalledApp>> {
    require_filters(filters)?;

    let billing_id = session.billing_id();
    let url = transport.url(
        billing_id,
        &format!("/application-apis/installedApps/1.0/search/{billing_id}"),
        filters.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;
    let response: InstalledAppsResponse = transport.get(url, session.access_token()).await?;
    let apps = response.installed_apps.app.into_vec();
    if apps.is_empty() {
        return Err(MaasError::NotFound {
            resource: "installed apps",
        });
    }
    tracing::debug!("Installed-app search returned {} apps", apps.len());
    Ok(apps)
}
