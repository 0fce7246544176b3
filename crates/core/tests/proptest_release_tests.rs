//! Property tests for latest-release selection.
//!
//! `select_latest` is a pure fold over a release list, so it can be
//! checked against a reference maximum over synthetic inputs.

use proptest::prelude::*;
use semver::Version;
use setup_gyro_core::{Release, select_latest};

fn release(tag: String, draft: bool, prerelease: bool) -> Release {
    let json = format!(
        r#"{{"tag_name": "{tag}", "draft": {draft}, "prerelease": {prerelease}}}"#
    );
    serde_json::from_str(&json).unwrap()
}

prop_compose! {
    /// An arbitrary release with a well-formed semver tag.
    fn arb_release()(
        major in 0u64..20,
        minor in 0u64..20,
        patch in 0u64..20,
        v_prefix in any::<bool>(),
        draft in any::<bool>(),
        prerelease in any::<bool>(),
    ) -> Release {
        let tag = if v_prefix {
            format!("v{major}.{minor}.{patch}")
        } else {
            format!("{major}.{minor}.{patch}")
        };
        release(tag, draft, prerelease)
    }
}

proptest! {
    /// The selected release carries the maximum version among
    /// installable entries, regardless of list order.
    #[test]
    fn selects_maximum_installable_version(releases in prop::collection::vec(arb_release(), 0..32)) {
        let expected_max = releases
            .iter()
            .filter(|r| r.is_installable())
            .filter_map(Release::version)
            .max();

        let selected = select_latest(&releases);
        prop_assert_eq!(selected.and_then(Release::version), expected_max);
    }

    /// Drafts and prereleases never win, even when they carry the
    /// highest version numbers.
    #[test]
    fn never_selects_excluded_releases(releases in prop::collection::vec(arb_release(), 0..32)) {
        if let Some(selected) = select_latest(&releases) {
            prop_assert!(selected.is_installable());
        }
    }

    /// Selection is stable: prepending a lower or equal version never
    /// changes the winner's version.
    #[test]
    fn lower_versions_do_not_displace_the_winner(
        releases in prop::collection::vec(arb_release(), 1..16),
    ) {
        let before = select_latest(&releases).and_then(Release::version);
        let mut extended = vec![release("0.0.0".to_string(), false, false)];
        extended.extend(releases.iter().cloned());
        let after = select_latest(&extended).and_then(Release::version);

        match before {
            Some(v) => prop_assert_eq!(after, Some(v)),
            None => prop_assert_eq!(after, Some(Version::new(0, 0, 0))),
        }
    }
}
