//! Host platform mapping and deterministic archive naming.

use crate::error::{Error, Result};
use semver::Version;

/// Operating systems gyro publishes archives for.
///
/// A closed set with exhaustive matching: adding a platform is a
/// compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux (tar.gz archives).
    Linux,
    /// macOS (tar.gz archives).
    Macos,
    /// Windows (zip archives).
    Windows,
}

impl Os {
    /// Map a host identifier pair to a supported platform.
    ///
    /// Identifiers follow `std::env::consts`. Only `x86_64` hosts are
    /// supported; anything else fails fast with `UnsupportedPlatform`.
    pub fn from_host(os: &str, arch: &str) -> Result<Self> {
        if arch != "x86_64" {
            return Err(Error::unsupported_platform(os, arch));
        }
        match os {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            _ => Err(Error::unsupported_platform(os, arch)),
        }
    }

    /// Detect the current host platform.
    pub fn current() -> Result<Self> {
        Self::from_host(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// The OS tag used in published archive names.
    #[must_use]
    pub const fn archive_tag(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        }
    }

    /// The archive format published for this OS.
    #[must_use]
    pub const fn archive_format(self) -> ArchiveFormat {
        match self {
            Self::Linux | Self::Macos => ArchiveFormat::TarGz,
            Self::Windows => ArchiveFormat::Zip,
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.archive_tag())
    }
}

/// Archive formats used by upstream releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Gzip-compressed tarball.
    TarGz,
    /// Zip archive.
    Zip,
}

impl ArchiveFormat {
    /// File extension, without a leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }
}

/// A platform-specific release artifact.
///
/// The name is a deterministic function of (tool, version, platform) and
/// is used three ways: as the download archive base name, as the root
/// directory inside the archive (the `<name>/bin` layout contract), and
/// as the cache registration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    name: String,
    version: String,
    format: ArchiveFormat,
}

impl Artifact {
    /// Build the artifact for a tool version on a platform.
    #[must_use]
    pub fn new(tool: &str, version: &Version, os: Os) -> Self {
        Self {
            name: format!("{tool}-{version}-{}-x86_64", os.archive_tag()),
            version: version.to_string(),
            format: os.archive_format(),
        }
    }

    /// The archive base name, doubling as the cache key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The archive format for this artifact.
    #[must_use]
    pub const fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// The archive file name, extension included.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.format.extension())
    }

    /// The well-known, version-templated download URL for this artifact.
    ///
    /// `repo` is the `owner/name` the releases are published under.
    #[must_use]
    pub fn download_url(&self, repo: &str) -> String {
        format!(
            "https://github.com/{repo}/releases/download/{}/{}",
            self.version,
            self.file_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_supported_hosts_exactly() {
        assert_eq!(Os::from_host("linux", "x86_64").unwrap(), Os::Linux);
        assert_eq!(Os::from_host("macos", "x86_64").unwrap(), Os::Macos);
        assert_eq!(Os::from_host("windows", "x86_64").unwrap(), Os::Windows);
    }

    #[test]
    fn archive_table_is_exact() {
        assert_eq!(Os::Linux.archive_tag(), "linux");
        assert_eq!(Os::Linux.archive_format().extension(), "tar.gz");
        assert_eq!(Os::Macos.archive_tag(), "macos");
        assert_eq!(Os::Macos.archive_format().extension(), "tar.gz");
        assert_eq!(Os::Windows.archive_tag(), "windows");
        assert_eq!(Os::Windows.archive_format().extension(), "zip");
    }

    #[test]
    fn rejects_unsupported_hosts() {
        for (os, arch) in [
            ("freebsd", "x86_64"),
            ("android", "x86_64"),
            ("linux", "aarch64"),
            ("macos", "aarch64"),
            ("", ""),
        ] {
            let err = Os::from_host(os, arch).unwrap_err();
            assert!(
                matches!(err, Error::UnsupportedPlatform { .. }),
                "expected UnsupportedPlatform for {os}/{arch}"
            );
        }
    }

    #[test]
    fn artifact_name_is_deterministic() {
        let version = Version::new(1, 2, 3);
        let artifact = Artifact::new("gyro", &version, Os::Linux);
        assert_eq!(artifact.name(), "gyro-1.2.3-linux-x86_64");
        assert_eq!(artifact.file_name(), "gyro-1.2.3-linux-x86_64.tar.gz");

        let artifact = Artifact::new("gyro", &version, Os::Windows);
        assert_eq!(artifact.file_name(), "gyro-1.2.3-windows-x86_64.zip");
    }

    #[test]
    fn download_url_is_version_templated() {
        let version = Version::new(0, 4, 0);
        let artifact = Artifact::new("gyro", &version, Os::Macos);
        assert_eq!(
            artifact.download_url("mattnite/gyro"),
            "https://github.com/mattnite/gyro/releases/download/0.4.0/gyro-0.4.0-macos-x86_64.tar.gz"
        );
    }
}
