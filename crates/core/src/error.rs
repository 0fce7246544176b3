//! Error types shared by the setup-gyro crates.

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for the core data model, cache, and runner integration.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The requested version is neither `latest` nor a semantic version.
    ///
    /// Raised before any network activity takes place.
    #[error("'{input}' is not a valid version request")]
    #[diagnostic(
        code(setup_gyro::core::invalid_version),
        help("pass `latest` or a full semantic version such as `0.4.0`")
    )]
    InvalidVersion {
        /// The rejected input string.
        input: String,
    },

    /// The host platform has no published gyro archive.
    #[error("unsupported platform: {os} {arch}")]
    #[diagnostic(
        code(setup_gyro::core::unsupported_platform),
        help("gyro archives are published for linux, macos, and windows on x86_64 only")
    )]
    UnsupportedPlatform {
        /// Host operating system identifier.
        os: String,
        /// Host CPU architecture identifier.
        arch: String,
    },

    /// Committing an install directory to the tool cache failed.
    #[error("failed to write cache entry at {}", .path.display())]
    #[diagnostic(
        code(setup_gyro::core::cache_write),
        help("check permissions on the tool cache root (RUNNER_TOOL_CACHE)")
    )]
    CacheWrite {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Destination path inside the cache.
        path: Box<Path>,
    },

    /// Appending to a runner environment file failed.
    #[error("failed to append to runner file {}", .path.display())]
    #[diagnostic(code(setup_gyro::core::env_file))]
    EnvFile {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// The environment file the runner handed us.
        path: Box<Path>,
    },
}

impl Error {
    /// Create an invalid-version error.
    #[must_use]
    pub fn invalid_version(input: impl Into<String>) -> Self {
        Self::InvalidVersion {
            input: input.into(),
        }
    }

    /// Create an unsupported-platform error.
    #[must_use]
    pub fn unsupported_platform(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Create a cache-write error with path context.
    #[must_use]
    pub fn cache_write(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::CacheWrite {
            source,
            path: path.as_ref().into(),
        }
    }

    /// Create an environment-file error with path context.
    #[must_use]
    pub fn env_file(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::EnvFile {
            source,
            path: path.as_ref().into(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
