//! Authenticated façade over the MaaS360 resource modules.
//!
//! `MaasClient` bundles a [`Transport`], the credentials it was built from
//! and the current [`AuthTokens`]/[`Session`]. Every resource operation is
//! available as a method that threads the session through to the matching
//! module function, so callers that don't need per-call control never
//! handle a `Session` themselves.
//!
//! Token lifecycle:
//! - [`MaasClient::authenticate`] performs the password (or refresh-token)
//!   flow once, at construction.
//! - No expiry is tracked. When the vendor starts rejecting calls, call
//!   [`MaasClient::refresh`] to trade the refresh token for a new pair.
//! - Resource calls are never retried.

use chrono::NaiveDateTime;

use crate::applications::{self, CatalogApp, InstalledApp};
use crate::auth::{self, AuthTokens, Credentials, Session};
use crate::device_actions::{self, ActionParams, ActionResponse, DeviceAction, DeviceActions};
use crate::device_control;
use crate::devices::{self, Device, DeviceIdentifiers, Filters};
use crate::error::Result;
use crate::inventory::{self, DeviceAttribute, DeviceIdentity, DeviceSoftware, HardwareInventory};
use crate::transport::Transport;

/// Authenticated MaaS360 API client.
///
/// Cloning shares the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct MaasClient {
    transport: Transport,
    credentials: Credentials,
    tokens: AuthTokens,
    session: Session,
}

impl MaasClient {
    /// Authenticates with `credentials` and returns a ready client.
    ///
    /// # Errors
    ///
    /// Any error of [`auth::authenticate`].
    pub async fn authenticate(transport: Transport, credentials: Credentials) -> Result<Self> {
        let tokens = auth::authenticate(&transport, &credentials).await?;
        Self::with_tokens(transport, credentials, tokens)
    }

    /// Builds a client from an already issued token pair, without any
    /// network call.
    ///
    /// # Errors
    ///
    /// `MaasError::InvalidArgument` if the billing ID or access token is
    /// empty.
    pub fn with_tokens(
        transport: Transport,
        credentials: Credentials,
        tokens: AuthTokens,
    ) -> Result<Self> {
        let session = Session::new(credentials.billing_id.clone(), tokens.access_token.clone())?;
        Ok(MaasClient {
            transport,
            credentials,
            tokens,
            session,
        })
    }

    /// Trades the current refresh token for a new token pair.
    ///
    /// On failure the client keeps its previous tokens.
    ///
    /// # Errors
    ///
    /// Any error of [`auth::authenticate`]; `MissingCredential` if the
    /// client holds no refresh token.
    pub async fn refresh(&mut self) -> Result<()> {
        let credentials = Credentials {
            password: String::new(),
            refresh_token: self.tokens.refresh_token.clone(),
            ..self.credentials.clone()
        };
        let tokens = auth::authenticate(&self.transport, &credentials).await?;
        self.session = Session::new(self.session.billing_id(), tokens.access_token.clone())?;
        self.tokens = tokens;
        tracing::debug!("Token pair refreshed for {}", self.session.billing_id());
        Ok(())
    }

    /// The current token pair.
    pub fn tokens(&self) -> &AuthTokens {
        &self.tokens
    }

    /// The session used for resource calls.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The injected transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Base URL of the instance serving this customer.
    pub fn service_url(&self) -> Result<String> {
        self.transport.service_url(self.session.billing_id())
    }

    /// `Basic` authorization header for the administrator account, if a
    /// username and password were supplied.
    pub fn basic_auth(&self) -> Option<String> {
        auth::basic_auth(&self.credentials.username, &self.credentials.password)
    }

    // ── Devices ────────────────────────────────────────────────────────

    /// See [`devices::get_device`].
    pub async fn get_device(&self, device_id: &str) -> Result<DeviceIdentifiers> {
        devices::get_device(&self.transport, &self.session, device_id).await
    }

    /// See [`devices::search_devices`].
    pub async fn search_devices(&self, filters: &Filters) -> Result<Vec<Device>> {
        devices::search_devices(&self.transport, &self.session, filters).await
    }

    // ── Actions ────────────────────────────────────────────────────────

    /// See [`device_actions::get_device_actions`].
    pub async fn get_device_actions(&self, device_id: &str) -> Result<DeviceActions> {
        device_actions::get_device_actions(&self.transport, &self.session, device_id).await
    }

    /// See [`device_actions::perform_device_action`].
    pub async fn perform_device_action(
        &self,
        device_id: &str,
        action_id: &str,
        params: Option<&ActionParams>,
    ) -> Result<ActionResponse> {
        device_actions::perform_device_action(
            &self.transport,
            &self.session,
            device_id,
            action_id,
            params,
        )
        .await
    }

    /// See [`device_actions::invoke_action`].
    pub async fn invoke_action(
        &self,
        device_id: &str,
        action: &DeviceAction,
        params: Option<&ActionParams>,
    ) -> Result<ActionResponse> {
        device_actions::invoke_action(&self.transport, &self.session, device_id, action, params)
            .await
    }

    /// See [`device_actions::update_os`].
    pub async fn update_os(
        &self,
        device_id: &str,
        os_version: &str,
        target_local_time: NaiveDateTime,
    ) -> Result<ActionResponse> {
        device_actions::update_os(
            &self.transport,
            &self.session,
            device_id,
            os_version,
            target_local_time,
        )
        .await
    }

    /// See [`device_control::send_message`].
    pub async fn send_message(
        &self,
        device_id: &str,
        title: &str,
        message: &str,
    ) -> Result<ActionResponse> {
        device_control::send_message(&self.transport, &self.session, device_id, title, message)
            .await
    }

    /// See [`device_control::lock_device`].
    pub async fn lock_device(&self, device_id: &str) -> Result<ActionResponse> {
        device_control::lock_device(&self.transport, &self.session, device_id).await
    }

    /// See [`device_control::hide_device`].
    pub async fn hide_device(&self, device_id: &str) -> Result<ActionResponse> {
        device_control::hide_device(&self.transport, &self.session, device_id).await
    }

    // ── Inventory ──────────────────────────────────────────────────────

    /// See [`inventory::get_hardware_inventory`].
    pub async fn get_hardware_inventory(&self, device_id: &str) -> Result<HardwareInventory> {
        inventory::get_hardware_inventory(&self.transport, &self.session, device_id).await
    }

    /// See [`inventory::get_software_installed`].
    pub async fn get_software_installed(&self, device_id: &str) -> Result<DeviceSoftware> {
        inventory::get_software_installed(&self.transport, &self.session, device_id).await
    }

    /// See [`inventory::get_network_info`].
    pub async fn get_network_info(&self, device_id: &str) -> Result<Vec<DeviceAttribute>> {
        inventory::get_network_info(&self.transport, &self.session, device_id).await
    }

    /// See [`inventory::get_device_attributes`].
    pub async fn get_device_attributes(&self, device_id: &str) -> Result<DeviceIdentity> {
        inventory::get_device_attributes(&self.transport, &self.session, device_id).await
    }

    // ── Applications ───────────────────────────────────────────────────

    /// See [`applications::search_catalog`].
    pub async fn search_catalog(&self, filters: &Filters) -> Result<Vec<CatalogApp>> {
        applications::search_catalog(&self.transport, &self.session, filters).await
    }

    /// See [`applications::search_installed_apps`].
    pub async fn search_installed_apps(&self, filters: &Filters) -> Result<Vec<InstalledApp>> {
        applications::search_installed_apps(&self.transport, &self.session, filters).await
    }
}
