//! Error types for the release registry client.

use miette::Diagnostic;
use thiserror::Error;

/// Error type for registry operations.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The primary rate limit was still in effect after every retry.
    #[error("rate limited by {url} after {attempts} attempts")]
    #[diagnostic(
        code(setup_gyro::github::rate_limited),
        help("supply a GITHUB_TOKEN to raise the API rate-limit ceiling")
    )]
    RateLimited {
        /// The throttled request URL.
        url: String,
        /// Requests issued before giving up.
        attempts: u32,
    },

    /// The secondary (abuse-detection) limit rejected the request.
    ///
    /// Never retried: hammering an abuse-flagged endpoint only extends
    /// the ban.
    #[error("request to {url} was rejected by the secondary rate limit")]
    #[diagnostic(
        code(setup_gyro::github::abuse_detected),
        help("wait a few minutes before re-running the job")
    )]
    AbuseDetected {
        /// The rejected request URL.
        url: String,
    },

    /// No published release survived draft/prerelease filtering.
    #[error("no installable releases found for {repo}")]
    #[diagnostic(
        code(setup_gyro::github::no_releases),
        help("request an explicit version, or check the repository's releases page")
    )]
    NoReleasesFound {
        /// The `owner/name` repository that was queried.
        repo: String,
    },

    /// The API answered with a non-throttle error status.
    #[error("{url} answered HTTP {status}: {message}")]
    #[diagnostic(code(setup_gyro::github::api))]
    Api {
        /// The request URL.
        url: String,
        /// HTTP status code.
        status: reqwest::StatusCode,
        /// Message from the API response body, if any.
        message: String,
    },

    /// Transport-level failure.
    #[error("registry request failed")]
    #[diagnostic(code(setup_gyro::github::http))]
    Http(#[from] reqwest::Error),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;
