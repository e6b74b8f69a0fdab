//! authlink - command-line access to a hosted authentication service.
//!
//! `authlink fetch` prints the current session as camelCase JSON (or `null`
//! when there is none); `authlink logout` ends it and prints where to go next.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authlink_core::{ApiError, AuthClient, ClientConfig};

#[derive(Parser, Debug)]
#[command(name = "authlink", version, about = "Fetch or end a session on an auth service")]
struct Cli {
    /// Base URL of the auth service (overrides AUTHLINK_AUTH_URL and the config file)
    #[arg(long, global = true)]
    auth_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Cookie to send with requests, as NAME=VALUE (repeatable)
    #[arg(long = "cookie", global = true)]
    cookies: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the current session
    Fetch,
    /// Log out of the current session
    Logout,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load().context("Failed to load configuration")?;
    if let Some(ref url) = cli.auth_url {
        config.auth_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn build_client(cli: &Cli, config: &ClientConfig) -> Result<AuthClient> {
    let client = config
        .client_builder()
        .cookies(cli.cookies.iter().cloned())
        .build()?;
    Ok(client)
}

async fn run(cli: &Cli, client: &AuthClient) -> Result<()> {
    let output = match cli.command {
        Command::Fetch => {
            let info = client.fetch_authentication_info().await?;
            if info.is_none() {
                info!("No active session");
            }
            serde_json::to_string_pretty(&info)?
        }
        Command::Logout => serde_json::to_string_pretty(&client.logout().await?)?,
    };
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    debug!(auth_url = %config.auth_url, timeout_secs = config.request_timeout_secs, "Configured");

    let client = build_client(&cli, &config)?;

    if let Err(e) = run(&cli, &client).await {
        match e.downcast_ref::<ApiError>() {
            Some(api_err) => eprintln!("error {}: {}", api_err.status(), api_err.message()),
            None => eprintln!("Error: {:#}", e),
        }
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
