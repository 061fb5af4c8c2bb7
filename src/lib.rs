//! Async Rust client library for the IBM MaaS360 device-management REST API.
//!
//! Resolves the customer's service instance from the billing ID,
//! authenticates administrators with the vendor's token flow, and wraps the
//! device, action, inventory and application endpoints in typed
//! request/response functions. Each call is one HTTP exchange; there is no
//! caching, retrying or background work.
//!
//! # Modules
//!
//! - [`applications`] — App catalog and installed-app search.
//! - [`auth`] — Credential/refresh-token authentication and [`auth::Session`].
//! - [`client`] — `MaasClient` façade bundling transport and session.
//! - [`device_actions`] — Action catalog, dispatch and OS-update scheduling.
//! - [`device_control`] — Lock, hide and send-message commands.
//! - [`devices`] — Device detail and search.
//! - [`endpoint`] — Billing-ID to instance URL resolution.
//! - [`error`] — Typed error hierarchy (`MaasError`) for all library operations.
//! - [`flexible`] — Decoders for the vendor's string-or-number fields.
//! - [`inventory`] — Hardware, software, network and identity records.
//! - [`report`] — Human-readable summaries written to any `io::Write`.
//! - [`transport`] — The injected HTTP handle shared by every call.
//!
//! # Quick Start
//!
//! ```ignore
//! use maas360_api::auth::Credentials;
//! use maas360_api::client::MaasClient;
//! use maas360_api::devices::Filters;
//! use maas360_api::transport::Transport;
//!
//! let credentials = Credentials {
//!     billing_id: "30012345".into(),
//!     app_id: "com.example.api".into(),
//!     access_key: "...".into(),
//!     username: "admin".into(),
//!     password: "...".into(),
//!     ..Default::default()
//! };
//! let client = MaasClient::authenticate(Transport::new()?, credentials).await?;
//! let filters = Filters::from([("platformName".into(), "iOS".into())]);
//! let devices = client.search_devices(&filters).await?;
//! ```

#![warn(missing_docs)]

pub mod applications;
pub mod auth;
pub mod client;
pub mod device_actions;
pub mod device_control;
pub mod devices;
pub mod endpoint;
pub mod error;
pub mod flexible;
pub mod inventory;
pub mod report;
pub mod transport;
