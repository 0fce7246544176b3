//! Error types for the acquisition pipeline and orchestrator.

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for the install pipeline.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Failure in the shared data model or cache layer.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] setup_gyro_core::Error),

    /// Failure while talking to the release registry.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] setup_gyro_github::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build the HTTP client")]
    #[diagnostic(code(setup_gyro::http_client))]
    HttpClient(#[source] reqwest::Error),

    /// The artifact download failed at the transport level.
    #[error("failed to download {url}")]
    #[diagnostic(code(setup_gyro::download))]
    Download {
        /// The artifact URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The download endpoint answered with a non-success status.
    #[error("{url} answered HTTP {status}")]
    #[diagnostic(
        code(setup_gyro::download_status),
        help("check that the requested version has a published release asset")
    )]
    DownloadStatus {
        /// The artifact URL.
        url: String,
        /// HTTP status code.
        status: reqwest::StatusCode,
    },

    /// The archive could not be unpacked.
    #[error("failed to extract {archive}", archive = .archive.display())]
    #[diagnostic(code(setup_gyro::extraction))]
    Extraction {
        /// Path of the archive being unpacked.
        archive: Box<Path>,
        /// Underlying extraction error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The archive did not contain the expected directory layout.
    #[error("archive layout mismatch: expected {expected}", expected = .expected.display())]
    #[diagnostic(
        code(setup_gyro::layout),
        help("release archives must unpack to <artifact-name>/bin")
    )]
    Layout {
        /// The directory that should have existed after extraction.
        expected: Box<Path>,
    },

    /// A filesystem step of the pipeline failed.
    #[error("failed to {operation} at {path}", path = .path.display())]
    #[diagnostic(code(setup_gyro::io))]
    Io {
        /// The step being performed.
        operation: &'static str,
        /// The path involved.
        path: Box<Path>,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The async runtime could not be started.
    #[error("failed to start the async runtime")]
    #[diagnostic(code(setup_gyro::runtime))]
    Runtime(#[source] std::io::Error),

    /// A blocking extraction task was cancelled or panicked.
    #[error("archive extraction task failed")]
    #[diagnostic(code(setup_gyro::task))]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl Error {
    /// Build a [`Error::Download`] with an owned URL.
    #[must_use]
    pub fn download(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Download {
            url: url.into(),
            source,
        }
    }

    /// Build a [`Error::Extraction`] from any unpacking failure.
    #[must_use]
    pub fn extraction(
        archive: impl AsRef<Path>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Extraction {
            archive: archive.as_ref().into(),
            source: source.into(),
        }
    }

    /// Build a [`Error::Io`] tagged with the failing step.
    #[must_use]
    pub fn io(operation: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.as_ref().into(),
            source,
        }
    }
}

/// Result type for the install pipeline.
pub type Result<T> = std::result::Result<T, Error>;
