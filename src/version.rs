//! Forge the program version string.

use std::fmt::Write;

const UNKNOWN: &str = "unknown";

/// Version information, taken from the package manifest and from an optional
/// `GIT_COMMIT` variable set at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: String,
    /// A pre-release marker such as "dev", "beta" or "rc1". Empty for final
    /// releases.
    pub prerelease: String,
    pub revision: String,
}

impl VersionInfo {
    pub fn current() -> Self {
        let (version, prerelease) = match env!("CARGO_PKG_VERSION").split_once('-') {
            Some((v, pre)) => (v, pre),
            None => (env!("CARGO_PKG_VERSION"), ""),
        };

        VersionInfo {
            version: version.to_owned(),
            prerelease: prerelease.to_owned(),
            revision: option_env!("GIT_COMMIT").unwrap_or_default().to_owned(),
        }
    }

    fn is_unknown(&self) -> bool {
        self.version == UNKNOWN && self.prerelease == UNKNOWN
    }

    /// `version[-prerelease]`, followed by the revision when `rev` is set and
    /// one is known.
    pub fn full_version_number(&self, rev: bool) -> String {
        if self.is_unknown() {
            return "(version unknown)".into();
        }

        let mut s = self.version.clone();
        if !self.prerelease.is_empty() {
            let _ = write!(s, "-{}", self.prerelease);
        }
        if rev && !self.revision.is_empty() {
            let _ = write!(s, " ({})", self.revision);
        }

        s
    }
}

/// The line printed by the `version` subcommand.
pub fn version_line(program: &str, info: &VersionInfo) -> String {
    format!(
        "{} v{} ({}/{})",
        program,
        info.full_version_number(true),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(version: &str, prerelease: &str, revision: &str) -> VersionInfo {
        VersionInfo {
            version: version.into(),
            prerelease: prerelease.into(),
            revision: revision.into(),
        }
    }

    #[test]
    fn test_version_number() {
        assert_eq!(info("1.2.3", "", "").full_version_number(false), "1.2.3");
        assert_eq!(
            info("1.2.3", "dev", "abc").full_version_number(false),
            "1.2.3-dev"
        );
        assert_eq!(
            info(UNKNOWN, UNKNOWN, "abc").full_version_number(false),
            "(version unknown)"
        );
    }

    #[test]
    fn test_full_version_number() {
        let x = info("1.2.3", "rc1", "f00ba47");

        assert_eq!(x.full_version_number(true), "1.2.3-rc1 (f00ba47)");
        assert_eq!(x.full_version_number(false), "1.2.3-rc1");
        assert_eq!(info("1.2.3", "", "").full_version_number(true), "1.2.3");
        assert_eq!(
            info(UNKNOWN, UNKNOWN, "f00ba47").full_version_number(true),
            "(version unknown)"
        );
    }

    #[test]
    fn test_current() {
        let x = VersionInfo::current();

        assert!(env!("CARGO_PKG_VERSION").starts_with(&x.version));
    }

    #[test]
    fn test_version_line() {
        let line = version_line("mattermost-notify", &info("1.2.3", "", ""));

        assert!(line.starts_with("mattermost-notify v1.2.3 ("));
        assert!(line.ends_with(&format!(
            "{}/{})",
            std::env::consts::OS,
            std::env::consts::ARCH
        )));
    }
}
