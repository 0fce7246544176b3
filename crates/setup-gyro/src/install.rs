//! Cache-aware artifact acquisition.
//!
//! The pipeline is check-then-act: a completed cache entry short-circuits
//! everything, otherwise the artifact is downloaded and unpacked in a
//! private staging directory and only a fully validated tree is committed
//! to the cache. A failure at any step leaves both the cache and the
//! job's search path untouched.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use semver::Version;
use setup_gyro_core::{ArchiveFormat, Artifact, Os, ToolCache};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// The tool this installer provisions.
pub const TOOL: &str = "gyro";
/// The repository its releases are published under.
pub const REPO: &str = "mattnite/gyro";

/// User agent attached to download requests.
const USER_AGENT: &str = concat!("setup-gyro/", env!("CARGO_PKG_VERSION"));
/// Generous timeout: release archives are a few megabytes.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Downloads, unpacks, and caches gyro release artifacts.
pub struct Installer {
    http: reqwest::Client,
    cache: ToolCache,
}

impl Installer {
    /// Create an installer committing into the given cache.
    pub fn new(cache: ToolCache) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(Error::HttpClient)?;
        Ok(Self { http, cache })
    }

    /// Make the given gyro version available locally.
    ///
    /// Returns the `bin` directory of the install, ready to be published
    /// to the search path. A completed cache entry is reused as is; a
    /// miss triggers download, extraction, and a cache commit.
    pub async fn ensure(&self, version: &Version) -> Result<PathBuf> {
        let os = Os::current()?;
        let artifact = Artifact::new(TOOL, version, os);

        if let Some(dir) = self.cache.find(TOOL, artifact.name()) {
            info!(path = %dir.display(), "reusing cached install");
            return Ok(dir.join("bin"));
        }

        let url = artifact.download_url(REPO);
        let staging =
            tempfile::tempdir().map_err(|e| Error::io("create staging directory", ".", e))?;
        let archive_path = staging.path().join(artifact.file_name());

        self.download(&url, &archive_path).await?;
        self.install_archive(&artifact, &archive_path).await
    }

    /// Unpack a downloaded archive, validate its layout, and commit it.
    ///
    /// The archive must unpack to `<artifact-name>/bin`; anything else is
    /// rejected before the cache is touched. Returns the committed `bin`
    /// directory.
    pub async fn install_archive(&self, artifact: &Artifact, archive: &Path) -> Result<PathBuf> {
        let extract_root = archive
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("extracted");
        fs::create_dir_all(&extract_root)
            .map_err(|e| Error::io("create extraction directory", &extract_root, e))?;

        // Archive decoding is CPU- and filesystem-bound; keep it off the
        // async worker threads.
        let format = artifact.format();
        let archive_owned = archive.to_path_buf();
        let dest = extract_root.clone();
        tokio::task::spawn_blocking(move || extract_archive(&archive_owned, &dest, format))
            .await??;

        let tool_dir = extract_root.join(artifact.name());
        let bin_dir = tool_dir.join("bin");
        if !bin_dir.is_dir() {
            return Err(Error::Layout {
                expected: bin_dir.into_boxed_path(),
            });
        }
        debug!(path = %tool_dir.display(), "archive layout validated");

        let cached = self.cache.write(&tool_dir, TOOL, artifact.name())?;
        Ok(cached.join("bin"))
    }

    /// Stream the artifact to disk, hashing as it arrives.
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        info!(%url, "downloading release artifact");
        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::DownloadStatus {
                url: url.to_string(),
                status,
            });
        }

        let mut file =
            fs::File::create(dest).map_err(|e| Error::io("create archive file", dest, e))?;
        let mut hasher = Sha256::new();
        let mut bytes = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|e| Error::download(url, e))? {
            hasher.update(&chunk);
            bytes += chunk.len() as u64;
            file.write_all(&chunk)
                .map_err(|e| Error::io("write archive file", dest, e))?;
        }

        info!(
            bytes,
            sha256 = %hex::encode(hasher.finalize()),
            "artifact downloaded"
        );
        Ok(())
    }
}

/// Unpack an archive into `dest` according to its format.
fn extract_archive(archive: &Path, dest: &Path, format: ArchiveFormat) -> Result<()> {
    let file = fs::File::open(archive).map_err(|e| Error::io("open archive", archive, e))?;
    match format {
        ArchiveFormat::TarGz => {
            tar::Archive::new(GzDecoder::new(file))
                .unpack(dest)
                .map_err(|e| Error::extraction(archive, e))?;
        }
        ArchiveFormat::Zip => {
            zip::ZipArchive::new(file)
                .map_err(|e| Error::extraction(archive, e))?
                .extract(dest)
                .map_err(|e| Error::extraction(archive, e))?;
        }
    }
    Ok(())
}
