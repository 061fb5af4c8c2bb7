//! Device action catalog and dispatch for the MaaS360 API.
//!
//! MaaS360 exposes remote actions (lock, locate, wipe, OS update, custom
//! Android commands, ...) through a per-device catalog: the set of actions
//! available depends on platform, ownership and enrollment. Dispatch is a
//! two-step exchange:
//!
//! 1. **GET** `devices/1.0/deviceActions` returns the device's
//!    [`DeviceActions`] catalog.
//! 2. **POST** `actions/1.0/customer/{billing}/action/{action}/device/{device}`
//!    invokes one catalog entry by its canonical name.
//!
//! [`perform_device_action`] runs both steps. [`invoke_action`] is the fast
//! path for callers that already hold a catalog entry, and [`update_os`]
//! builds the OS-update parameters before dispatching.
//!
//! ## Action-style responses
//!
//! Action endpoints (here and in [`device_control`](crate::device_control))
//! answer with an [`ActionResponse`], either bare or wrapped in
//! `{"actionResponse": ...}`. A non-zero `actionStatus` is a remote failure
//! and surfaces as [`MaasError::RemoteActionFailed`].

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::error::{MaasError, Result, require};
use crate::flexible::{FlexibleInt, FlexibleString, OneOrMany, null_as_default};
use crate::transport::Transport;

/// Extra parameters sent as `additionalParams` with an action.
pub type ActionParams = BTreeMap<String, String>;

/// Seconds from dispatch until the vendor discards an undelivered action.
pub const ACTION_EXPIRY_SECS: i64 = 300;

/// Workflow tag recorded with every dispatched action.
pub const REQUESTER_WORKFLOW: &str = "TEST";

/// Catalog ID of the scheduled OS update action.
pub const MDM_SCHEDULE_OS_UPDATE: &str = "MDM_SCHEDULE_OS_UPDATE";

/// Catalog ID of the Android custom command action.
pub const ANDROID_CUSTOM_CMDS: &str = "ANDROID_CUSTOM_CMDS";

const OS_ENFORCEMENT: &str = "OS Enforcement";
const TARGET_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Whether dispatching `action_id` needs a non-empty `additionalParams` map.
pub fn requires_parameters(action_id: &str) -> bool {
    matches!(action_id, ANDROID_CUSTOM_CMDS | MDM_SCHEDULE_OS_UPDATE)
}

// ── Catalog types ──────────────────────────────────────────────────────

/// One entry of a device's action catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceAction {
    /// Stable action ID used in the dispatch URL (e.g. `"MDM_LOCK"`).
    #[serde(deserialize_with = "null_as_default")]
    pub action_id: String,
    /// Canonical display name; sent back as `name` when dispatching.
    #[serde(deserialize_with = "null_as_default")]
    pub action_name: String,
    /// Position of the action in the vendor console.
    pub action_order: FlexibleInt,
    /// Vendor grouping of the action (`"Security"`, `"Device"`, ...).
    #[serde(deserialize_with = "null_as_default")]
    pub action_type: String,
}

/// The actions available for one device, in vendor order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceActions {
    #[serde(rename = "deviceAction", default)]
    actions: OneOrMany<DeviceAction>,
}

impl DeviceActions {
    /// All catalog entries.
    pub fn actions(&self) -> &[DeviceAction] {
        &self.actions.0
    }

    /// Looks up an entry by its action ID (exact match).
    pub fn find_by_id(&self, action_id: &str) -> Option<&DeviceAction> {
        self.actions().iter().find(|a| a.action_id == action_id)
    }

    /// Looks up an entry by its display name (exact match).
    pub fn find_by_name(&self, action_name: &str) -> Option<&DeviceAction> {
        self.actions().iter().find(|a| a.action_name == action_name)
    }

    /// Number of available actions.
    pub fn len(&self) -> usize {
        self.actions().len()
    }

    /// Whether the device has no available actions.
    pub fn is_empty(&self) -> bool {
        self.actions().is_empty()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceActionsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    device_actions: DeviceActions,
}

// ── Request / response types ───────────────────────────────────────────

/// Body of the action invocation POST.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    /// Canonical action name from the catalog.
    pub name: String,
    /// Unix seconds after which the vendor drops the action.
    pub expiry_date: i64,
    /// Workflow tag, always [`REQUESTER_WORKFLOW`].
    pub requester_workflow: String,
    /// Action-specific parameters; omitted when there are none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_params: Option<ActionParams>,
}

impl ActionRequest {
    /// Builds a request for `action` expiring [`ACTION_EXPIRY_SECS`] from now.
    ///
    /// An empty parameter map is treated the same as no parameters.
    pub fn new(action: &DeviceAction, params: Option<&ActionParams>) -> Self {
        ActionRequest {
            name: action.action_name.clone(),
            expiry_date: Utc::now().timestamp() + ACTION_EXPIRY_SECS,
            requester_workflow: REQUESTER_WORKFLOW.to_string(),
            additional_params: params.filter(|p| !p.is_empty()).cloned(),
        }
    }
}

/// Outcome of an action-style call.
///
/// The vendor spells the device ID field both `maas360DeviceID` and
/// `maas360DeviceId` depending on endpoint; both decode here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionResponse {
    /// Device the action was recorded against.
    #[serde(rename = "maas360DeviceID", alias = "maas360DeviceId")]
    pub maas360_device_id: FlexibleString,
    /// `0` on success; anything else is a failure.
    pub action_status: FlexibleInt,
    /// Vendor tracking ID for the queued action.
    #[serde(rename = "actionID", alias = "actionId")]
    pub action_id: FlexibleString,
    /// Human-readable outcome.
    pub description: Option<String>,
}

impl ActionResponse {
    /// Fails with [`MaasError::RemoteActionFailed`] on a non-zero status.
    pub(crate) fn into_result(self) -> Result<Self> {
        match self.action_status.get() {
            Some(status) if status != 0 => {
                let description = self.description.unwrap_or_default();
                tracing::warn!("Action failed with status {}: {}", status, description);
                Err(MaasError::RemoteActionFailed {
                    status,
                    description,
                })
            }
            _ => Ok(self),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActionEnvelope {
    Wrapped {
        #[serde(rename = "actionResponse")]
        action_response: ActionResponse,
    },
    Bare(ActionResponse),
}

/// Decodes an action-style response body and checks its status.
///
/// An empty body decodes to a default (successful) response.
pub(crate) fn decode_action_response(body: &str) -> Result<ActionResponse> {
    if body.trim().is_empty() {
        return Ok(ActionResponse::default());
    }
    let response = match serde_json::from_str::<ActionEnvelope>(body)? {
        ActionEnvelope::Wrapped { action_response } => action_response,
        ActionEnvelope::Bare(response) => response,
    };
    response.into_result()
}

// ── Endpoint functions ─────────────────────────────────────────────────

/// Retrieves the action catalog of a device.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — empty `device_id`.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn get_device_actions(
    transport: &Transport,
    session: &Session,
    device_id: &str,
) -> Result<DeviceActions> {
    require("device_id", device_id)?;
    let billing_id = session.billing_id();
    let url = transport.url(
        billing_id,
        &format!("/device-apis/devices/1.0/deviceActions/{billing_id}"),
        [("deviceId", device_id)],
    )?;
    let response: DeviceActionsResponse = transport.get(url, session.access_token()).await?;
    tracing::debug!(
        "Device {} offers {} actions",
        device_id,
        response.device_actions.len()
    );
    Ok(response.device_actions)
}

/// Dispatches an action by ID after confirming it is in the device's
/// catalog.
///
/// `params` become the request's `additionalParams`. Actions for which
/// [`requires_parameters`] is true are refused without a non-empty map.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — empty `device_id` or `action_id`.
/// - `MaasError::ActionNotFound` — the catalog has no entry with this ID.
/// - `MaasError::MissingActionParameters` — the action needs parameters
///   and none were given. Only the catalog request has been sent.
/// - `MaasError::RemoteActionFailed` — the vendor rejected the action.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn perform_device_action(
    transport: &Transport,
    session: &Session,
    device_id: &str,
    action_id: &str,
    params: Option<&ActionParams>,
) -> Result<ActionResponse> {
    require("device_id", device_id)?;
    require("action_id", action_id)?;

    let catalog = get_device_actions(transport, session, device_id).await?;
    let action = catalog
        .find_by_id(action_id)
        .ok_or_else(|| MaasError::ActionNotFound {
            action_id: action_id.to_string(),
        })?;

    invoke_action(transport, session, device_id, action, params).await
}

/// Invokes a catalog entry directly, skipping the catalog lookup.
///
/// # Errors
///
/// Same as [`perform_device_action`], minus `ActionNotFound`.
pub async fn invoke_action(
    transport: &Transport,
    session: &Session,
    device_id: &str,
    action: &DeviceAction,
    params: Option<&ActionParams>,
) -> Result<ActionResponse> {
    require("device_id", device_id)?;
    require("action_id", &action.action_id)?;

    let has_params = params.is_some_and(|p| !p.is_empty());
    if requires_parameters(&action.action_id) && !has_params {
        return Err(MaasError::MissingActionParameters {
            action_id: action.action_id.clone(),
        });
    }

    let billing_id = session.billing_id();
    let url = transport.url(
        billing_id,
        &format!(
            "/action-apis/actions/1.0/customer/{billing_id}/action/{}/device/{device_id}",
            action.action_id
        ),
        [],
    )?;
    let request = ActionRequest::new(action, params);
    let body = transport
        .post_json(url, Some(session.access_token()), &request)
        .await?;
    let response = decode_action_response(&body)?;
    tracing::info!(
        "Action {} dispatched to device {}",
        action.action_name,
        device_id
    );
    Ok(response)
}

/// Builds the `additionalParams` for a scheduled OS update.
///
/// `service_url` is the instance base URL; the vendor links the update
/// record to its console at `{service_url}/emc/?#`.
pub fn os_update_params(
    service_url: &str,
    os_version: &str,
    target_local_time: NaiveDateTime,
) -> ActionParams {
    BTreeMap::from([
        ("productVersion".to_string(), os_version.to_string()),
        ("osUpdateActionType".to_string(), OS_ENFORCEMENT.to_string()),
        (
            "targetLocalTime".to_string(),
            target_local_time.format(TARGET_TIME_FORMAT).to_string(),
        ),
        ("detailsURL".to_string(), format!("{service_url}/emc/?#")),
    ])
}

/// Schedules an OS update to `os_version` at the device's local
/// `target_local_time`.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — empty `device_id` or `os_version`.
/// - Otherwise as [`perform_device_action`].
pub async fn update_os(
    transport: &Transport,
    session: &Session,
    device_id: &str,
    os_version: &str,
    target_local_time: NaiveDateTime,
) -> Result<ActionResponse> {
    require("device_id", device_id)?;
    require("os_version", os_version)?;
    let service_url = transport.service_url(session.billing_id())?;
    let params = os_update_params(&service_url, os_version, target_local_time);
    perform_device_action(
        transport,
        session,
        device_id,
        MDM_SCHEDULE_OS_UPDATE,
        Some(&params),
    )
    .await
}
