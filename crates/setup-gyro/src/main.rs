//! Entry point: resolve, acquire, publish.

use clap::Parser;
use setup_gyro::cli::Cli;
use setup_gyro::install::{Installer, REPO};
use setup_gyro::{Error, Result};
use setup_gyro_core::{ToolCache, VersionRequest, runner};
use setup_gyro_github::ReleasesClient;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = error_chain(&err);
            error!("{message}");
            // Mark the job failed in the Actions UI.
            runner::report_failure(&message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    runtime.block_on(run_async(cli))
}

async fn run_async(cli: Cli) -> Result<()> {
    // Validate the requested version before any network activity.
    let request: VersionRequest = cli.version.parse().map_err(Error::Core)?;

    let client = ReleasesClient::new(REPO)
        .map_err(Error::Registry)?
        .with_token(cli.token);
    let version = client.resolve(&request).await?;
    info!(%version, "installing gyro");

    let cache_root = cli.tool_cache.unwrap_or_else(ToolCache::default_root);
    let installer = Installer::new(ToolCache::new(cache_root))?;
    let bin_dir = installer.ensure(&version).await?;

    runner::add_path(&bin_dir)?;
    info!(path = %bin_dir.display(), "gyro {version} is ready");
    Ok(())
}

/// Logs go to stderr; stdout is reserved for workflow commands.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("setup_gyro=info,setup_gyro_core=info,setup_gyro_github=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flatten an error and its causes into one failure message.
fn error_chain(err: &Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
