use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{VersionPattern, VersionToken};

/// A file whose content embeds the release version in a known text pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTarget {
    /// Path relative to the repository root
    pub path: PathBuf,
    /// Surrounding text, e.g. `version: {version}`
    pub pattern: VersionPattern,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>, pattern: impl Into<VersionPattern>) -> Self {
        FileTarget {
            path: path.into(),
            pattern: pattern.into(),
        }
    }

    /// The literal (old, new) substrings for this target
    pub fn substrings(&self, token: &VersionToken) -> (String, String) {
        (
            self.pattern.render(&token.old),
            self.pattern.render(&token.new),
        )
    }
}

/// The four files of the Flutter SDK that carry its version.
pub fn default_targets() -> Vec<FileTarget> {
    vec![
        FileTarget::new("pubspec.yaml", "version: {version}"),
        FileTarget::new("lib/mixpanel_flutter.dart", r"'\$lib_version': '{version}'"),
        FileTarget::new(
            "test/mixpanel_flutter_test.dart",
            r"'\$lib_version': '{version}'",
        ),
        FileTarget::new("ios/mixpanel_flutter.podspec", "= '{version}'"),
    ]
}
