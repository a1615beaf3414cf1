//! notify-zammad - Icinga 2 notification plugin for Zammad.
//!
//! Parses one notification from the command line, dispatches it against the
//! Zammad API and exits. Success is silent with exit code 0; any failure is
//! one diagnostic line on stderr and a non-zero exit.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use notify_zammad::{cli::Cli, error::NotifyError, notify, zammad_client::ZammadClient};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging goes to stderr; stdout stays silent on success.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("notify_zammad=warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            // Notification commands follow the monitoring plugin convention,
            // UNKNOWN (3) for any failure.
            ExitCode::from(3)
        }
    }
}

/// Runs one notification under the configured overall deadline.
async fn run(cli: Cli) -> Result<()> {
    // Both of these fail before any network activity.
    let event = cli.event()?;
    let config = cli.config()?;

    tracing::debug!(
        kind = %event.kind,
        host = %event.host,
        service = ?event.service,
        zammad = %config.base_url,
        "dispatching notification"
    );

    let client = ZammadClient::new(&config).context("could not initialize Zammad client")?;

    let result = tokio::time::timeout(config.timeout, notify::dispatch(&client, &event))
        .await
        .unwrap_or(Err(NotifyError::Timeout {
            duration: config.timeout,
        }));

    if let Err(e) = &result {
        // A non-local error may have left a partial write sequence behind;
        // Zammad's state is the record of what actually happened.
        tracing::debug!(local = e.is_local(), "notification failed");
    }

    result.map_err(Into::into)
}
