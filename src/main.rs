//! CLI entry point for maas360, a command-line client for the MaaS360
//! device-management API.
//!
//! Authenticates with administrator credentials (or a refresh token), then
//! runs one subcommand and prints a human-readable summary to stdout.
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` to see
//! every request URL and status.
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (auth failure, API error, no results, etc.)
//! - 2: argument validation error (clap handles this automatically)

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use maas360_api::auth::Credentials;
use maas360_api::client::MaasClient;
use maas360_api::device_actions::ActionParams;
use maas360_api::devices::Filters;
use maas360_api::error::MaasError;
use maas360_api::report;
use maas360_api::transport::Transport;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Customer billing ID; its first digit selects the MaaS360 instance.
    #[arg(long, env = "MAAS360_BILLING_ID")]
    billing_id: String,

    /// Application ID issued for API access.
    #[arg(long, env = "MAAS360_APP_ID")]
    app_id: String,

    /// Application access key. Prefer the environment variable to keep the
    /// key out of process listings and shell history.
    #[arg(long, env = "MAAS360_ACCESS_KEY", hide_env_values = true)]
    access_key: String,

    /// Administrator user name.
    #[arg(long, env = "MAAS360_USERNAME")]
    username: String,

    /// Administrator password. Either this or --refresh-token is required.
    #[arg(long, env = "MAAS360_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Refresh token from a previous `auth` run, used when no password is
    /// given.
    #[arg(long, env = "MAAS360_REFRESH_TOKEN", hide_env_values = true)]
    refresh_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and print the token pair.
    Auth,
    /// Show core attributes of one device.
    Device { device_id: String },
    /// Search devices. Without filters, lists the first page of active devices.
    Search {
        /// Search filter as key=value (e.g. platformName=iOS). Repeatable.
        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,
    },
    /// List the actions available for a device.
    Actions { device_id: String },
    /// Dispatch a catalog action by ID (e.g. MDM_LOCATE).
    Action {
        device_id: String,
        action_id: String,
        /// Additional action parameter as key=value. Repeatable.
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
    /// Send a notification message to a device.
    Message {
        device_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
    },
    /// Lock a device.
    Lock { device_id: String },
    /// Hide a device from the console's default views.
    Hide { device_id: String },
    /// Schedule an OS update.
    UpdateOs {
        device_id: String,
        /// Target OS version (e.g. 17.4).
        #[arg(long)]
        version: String,
        /// Device-local time to apply the update, as YYYY-MM-DDTHH:MM:SS.
        #[arg(long, value_parser = parse_local_time)]
        at: NaiveDateTime,
    },
    /// Show the hardware inventory of a device.
    Hardware { device_id: String },
    /// Show the software installed on a device.
    Software { device_id: String },
    /// Show network information of a device.
    Network { device_id: String },
    /// Show identity and custom attributes of a device.
    Identity { device_id: String },
    /// Search the app catalog. Requires --filter appId=...
    Catalog {
        /// Search filter as key=value. Repeatable.
        #[arg(long = "filter", value_parser = parse_key_value, required = true)]
        filters: Vec<(String, String)>,
    },
    /// Search apps installed across devices.
    Installed {
        /// Search filter as key=value. Repeatable.
        #[arg(long = "filter", value_parser = parse_key_value, required = true)]
        filters: Vec<(String, String)>,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

fn parse_local_time(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM:SS: {e}"))
}

impl Cli {
    fn credentials(&self) -> Credentials {
        Credentials {
            billing_id: self.billing_id.clone(),
            app_id: self.app_id.clone(),
            access_key: self.access_key.clone(),
            username: self.username.clone(),
            password: self.password.clone().unwrap_or_default(),
            refresh_token: self.refresh_token.clone().unwrap_or_default(),
        }
    }
}

/// Runs one subcommand against an authenticated client.
async fn run(client: &MaasClient, command: Command, out: &mut impl Write) -> Result<(), MaasError> {
    match command {
        Command::Auth => {
            writeln!(out, "Authenticated against {}", client.service_url()?)?;
            writeln!(out, "Access token: {}", client.tokens().access_token)?;
            writeln!(out, "Refresh token: {}", client.tokens().refresh_token)?;
        }
        Command::Device { device_id } => {
            let device = client.get_device(&device_id).await?;
            report::write_device(out, &device)?;
        }
        Command::Search { filters } => {
            let filters: Filters = filters.into_iter().collect();
            let devices = client.search_devices(&filters).await?;
            report::write_devices(out, &devices)?;
        }
        Command::Actions { device_id } => {
            let actions = client.get_device_actions(&device_id).await?;
            report::write_device_actions(out, &actions)?;
        }
        Command::Action {
            device_id,
            action_id,
            params,
        } => {
            let params: ActionParams = params.into_iter().collect();
            let response = client
                .perform_device_action(&device_id, &action_id, Some(&params))
                .await?;
            report::write_action_response(out, &response)?;
        }
        Command::Message {
            device_id,
            title,
            message,
        } => {
            let response = client.send_message(&device_id, &title, &message).await?;
            report::write_action_response(out, &response)?;
        }
        Command::Lock { device_id } => {
            let response = client.lock_device(&device_id).await?;
            report::write_action_response(out, &response)?;
        }
        Command::Hide { device_id } => {
            let response = client.hide_device(&device_id).await?;
            report::write_action_response(out, &response)?;
        }
        Command::UpdateOs {
            device_id,
            version,
            at,
        } => {
            let response = client.update_os(&device_id, &version, at).await?;
            report::write_action_response(out, &response)?;
        }
        Command::Hardware { device_id } => {
            let inventory = client.get_hardware_inventory(&device_id).await?;
            report::write_hardware_inventory(out, &inventory)?;
        }
        Command::Software { device_id } => {
            let software = client.get_software_installed(&device_id).await?;
            report::write_software(out, &software)?;
        }
        Command::Network { device_id } => {
            let attributes = client.get_network_info(&device_id).await?;
            report::write_network_info(out, &device_id, &attributes)?;
        }
        Command::Identity { device_id } => {
            let identity = client.get_device_attributes(&device_id).await?;
            report::write_identity(out, &identity)?;
        }
        Command::Catalog { filters } => {
            let filters: Filters = filters.into_iter().collect();
            let apps = client.search_catalog(&filters).await?;
            report::write_catalog_apps(out, &apps)?;
        }
        Command::Installed { filters } => {
            let filters: Filters = filters.into_iter().collect();
            let apps = client.search_installed_apps(&filters).await?;
            report::write_installed_apps(out, &apps)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let transport = match Transport::new() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let client = match MaasClient::authenticate(transport, cli.credentials()).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(&client, cli.command, &mut out).await {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
