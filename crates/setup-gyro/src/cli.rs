//! Command-line and Actions-input surface.
//!
//! Every flag doubles as the environment variable the Actions runner
//! sets: `with.version` arrives as `INPUT_VERSION`, the workflow token
//! as `GITHUB_TOKEN`, and the hosted tool cache as `RUNNER_TOOL_CACHE`.

use clap::Parser;
use std::path::PathBuf;

/// Install the gyro package manager and put it on the job's PATH.
#[derive(Parser, Debug)]
#[command(name = "setup-gyro")]
pub struct Cli {
    /// Version to install: `latest` or an exact semantic version.
    #[arg(long, env = "INPUT_VERSION", default_value = "latest")]
    pub version: String,

    /// API token used for release-registry requests.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Root directory of the reusable tool cache.
    #[arg(long, env = "RUNNER_TOOL_CACHE")]
    pub tool_cache: Option<PathBuf>,
}
