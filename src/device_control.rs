//! Direct device commands: lock, hide and send message.
//!
//! These endpoints act immediately without a catalog lookup. Each is a
//! single bodyless POST whose parameters travel in the query string, and
//! each answers with an [`ActionResponse`].
//!
//! | Function | API Path |
//! |----------|----------|
//! | [`lock_device`] | POST `devices/1.0/lockDevice/{billing}?deviceId=` |
//! | [`hide_device`] | POST `devices/1.0/hideDevice/{billing}?deviceId=` |
//! | [`send_message`] | POST `devices/1.0/sendMessage/{billing}?deviceId=&messageTitle=&message=` |

use crate::auth::Session;
use crate::device_actions::{ActionResponse, decode_action_response};
use crate::error::{MaasError, Result, require};
use crate::transport::Transport;

async fn post_device_command<'a>(
    transport: &Transport,
    session: &Session,
    command: &str,
    query: &[(&'a str, &'a str)],
) -> Result<ActionResponse> {
    let billing_id = session.billing_id();
    let url = transport.url(
        billing_id,
        &format!("/device-apis/devices/1.0/{command}/{billing_id}"),
        query.iter().copied(),
    )?;
    let body = transport.post_empty(url, session.access_token()).await?;
    decode_action_response(&body)
}

/// Locks a device's screen.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — empty `device_id`.
/// - `MaasError::RemoteActionFailed` — non-zero `actionStatus`.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn lock_device(
    transport: &Transport,
    session: &Session,
    device_id: &str,
) -> Result<ActionResponse> {
    require("device_id", device_id)?;
    let response =
        post_device_command(transport, session, "lockDevice", &[("deviceId", device_id)]).await?;
    tracing::info!("Device {} lock scheduled", device_id);
    Ok(response)
}

/// Hides a device from the console's default views.
///
/// # Errors
///
/// Same as [`lock_device`].
pub async fn hide_device(
    transport: &Transport,
    session: &Session,
    device_id: &str,
) -> Result<ActionResponse> {
    require("device_id", device_id)?;
    let response =
        post_device_command(transport, session, "hideDevice", &[("deviceId", device_id)]).await?;
    tracing::info!("Device {} hidden", device_id);
    Ok(response)
}

/// Sends a notification message to a device.
///
/// Title and message may be empty; they are URL-encoded either way.
///
/// # Errors
///
/// - `MaasError::InvalidArgument` — empty `device_id`.
/// - `MaasError::RemoteActionFailed` — non-zero `actionStatus`.
/// - `MaasError::IncompleteActionResponse` — the response names no device.
/// - `MaasError::UnexpectedStatus` / `Network` / `Parse` — transport and
///   decoding failures.
pub async fn send_message(
    transport: &Transport,
    session: &Session,
    device_id: &str,
    title: &str,
    message: &str,
) -> Result<ActionResponse> {
    require("device_id", device_id)?;
    let response = post_device_command(
        transport,
        session,
        "sendMessage",
        &[
            ("deviceId", device_id),
            ("messageTitle", title),
            ("message", message),
        ],
    )
    .await?;

    if !response.maas360_device_id.is_present() {
        tracing::warn!("Send message to {} returned no device ID", device_id);
        return Err(MaasError::IncompleteActionResponse {
            missing: "device ID",
        });
    }
    tracing::info!("Message sent to device {}", response.maas360_device_id);
    Ok(response)
}
