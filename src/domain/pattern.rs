use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};

/// Placeholder substituted with a version string.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Text template embedding a version (e.g., "v{version}", "version: {version}")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionPattern {
    pub pattern: String,
}

impl VersionPattern {
    /// Create a new pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        VersionPattern {
            pattern: pattern.into(),
        }
    }

    /// Render the pattern with a concrete version.
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn render(&self, version: &str) -> String {
        self.pattern.replace(VERSION_PLACEHOLDER, version)
    }

    /// Check that the pattern holds exactly one `{version}` placeholder
    pub fn validate(&self) -> Result<()> {
        match self.pattern.matches(VERSION_PLACEHOLDER).count() {
            1 => Ok(()),
            0 => Err(ReleaseError::config(format!(
                "Pattern '{}' must contain a {{version}} placeholder",
                self.pattern
            ))),
            n => Err(ReleaseError::config(format!(
                "Pattern '{}' has {} {{version}} placeholders, expected exactly one",
                self.pattern, n
            ))),
        }
    }
}

impl From<&str> for VersionPattern {
    fn from(pattern: &str) -> Self {
        VersionPattern::new(pattern)
    }
}

impl std::fmt::Display for VersionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_render() {
        let pattern = VersionPattern::new("v{version}");
        assert_eq!(pattern.render("1.2.3"), "v1.2.3");
    }

    #[test]
    fn test_pattern_render_keeps_surrounding_quotes() {
        let pattern = VersionPattern::new(r"'\$lib_version': '{version}'");
        assert_eq!(pattern.render("2.0.0"), r"'\$lib_version': '2.0.0'");
    }

    #[test]
    fn test_pattern_validate() {
        assert!(VersionPattern::new("version: {version}").validate().is_ok());
        assert!(VersionPattern::new("version").validate().is_err());
        assert!(VersionPattern::new("{version}-{version}").validate().is_err());
    }
}
