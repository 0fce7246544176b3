//! Release records and latest-version selection.

use semver::Version;
use serde::Deserialize;

/// A published release as returned by the release-listing endpoint.
///
/// Fetched transiently per resolution call, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// The git tag the release was published under (e.g. `0.4.0`).
    pub tag_name: String,
    /// Draft releases are invisible to `latest` resolution.
    #[serde(default)]
    pub draft: bool,
    /// Prereleases are invisible to `latest` resolution.
    #[serde(default)]
    pub prerelease: bool,
}

impl Release {
    /// Whether this release is a candidate for `latest` resolution.
    #[must_use]
    pub fn is_installable(&self) -> bool {
        !self.draft && !self.prerelease
    }

    /// Parse the release tag as a semantic version.
    ///
    /// A leading `v` is tolerated. Returns `None` for tags that are not
    /// semantic versions; such releases never win `latest` resolution.
    #[must_use]
    pub fn version(&self) -> Option<Version> {
        let tag = self.tag_name.trim();
        let bare = tag.strip_prefix('v').unwrap_or(tag);
        bare.parse().ok()
    }
}

/// Select the newest installable release by semantic-version ordering.
///
/// Drafts, prereleases, and releases whose tags do not parse as semantic
/// versions are skipped. Ordering is semantic, not lexical, so `1.10.0`
/// beats `1.9.0`. The fold is stable: on a tie the first-seen maximum
/// wins.
#[must_use]
pub fn select_latest(releases: &[Release]) -> Option<&Release> {
    let mut best: Option<(&Release, Version)> = None;
    for release in releases {
        if !release.is_installable() {
            continue;
        }
        let Some(version) = release.version() else {
            continue;
        };
        match &best {
            Some((_, max)) if version <= *max => {}
            _ => best = Some((release, version)),
        }
    }
    best.map(|(release, _)| release)
}
