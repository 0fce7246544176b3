//! Version request parsing.

use crate::error::Error;
use semver::Version;

/// A user-supplied version request.
///
/// Either the literal `latest` or an explicit semantic version. Explicit
/// requests are validated at parse time, so a malformed version is
/// rejected before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// Resolve to the newest published, non-draft, non-prerelease release.
    Latest,
    /// Install exactly this version.
    Exact(Version),
}

impl std::str::FromStr for VersionRequest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        // Tags are sometimes written with a leading `v`; tolerate it.
        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
        bare.parse::<Version>()
            .map(Self::Exact)
            .map_err(|_| Error::invalid_version(s))
    }
}

impl std::fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Exact(v) => write!(f, "{v}"),
        }
    }
}
