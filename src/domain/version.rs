use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// The literal before/after version strings of a release.
///
/// Both strings are used verbatim; no semantic-version structure is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken {
    pub old: String,
    pub new: String,
}

impl VersionToken {
    /// Create a token, rejecting empty or identical versions
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Result<Self> {
        let old = old.into();
        let new = new.into();

        if old.trim().is_empty() || new.trim().is_empty() {
            return Err(ReleaseError::config("Versions must not be empty"));
        }

        if old == new {
            return Err(ReleaseError::config(format!(
                "Old and new versions are identical: '{}'",
                old
            )));
        }

        Ok(VersionToken { old, new })
    }

    /// Returns true when both versions are semver and the new one does not
    /// sort after the old one. Non-semver strings never count as a regression.
    pub fn is_regression(&self) -> bool {
        let old = semver::Version::parse(self.old.trim_start_matches('v'));
        let new = semver::Version::parse(self.new.trim_start_matches('v'));

        match (old, new) {
            (Ok(old), Ok(new)) => new <= old,
            _ => false,
        }
    }
}

/// Everything a release run needs, built once at entry and passed to each stage.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub token: VersionToken,
    /// Repository root all target paths are relative to
    pub root: PathBuf,
}

impl ReleaseContext {
    pub fn new(token: VersionToken, root: impl Into<PathBuf>) -> Self {
        ReleaseContext {
            token,
            root: root.into(),
        }
    }

    pub fn old_version(&self) -> &str {
        &self.token.old
    }

    pub fn new_version(&self) -> &str {
        &self.token.new
    }

    /// Resolve a repository-relative path against the root
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}
