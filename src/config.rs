use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::target::default_targets;
use crate::domain::{FileTarget, VersionPattern};
use crate::error::{ReleaseError, Result};
use crate::process::CommandSpec;

/// File name looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "release.toml";

/// File name looked up in the user config directory.
pub const USER_CONFIG_FILE_NAME: &str = ".flutter-release.toml";

/// Represents the complete configuration for flutter-release.
///
/// Contains the version-bearing files, documentation and publish commands, and git naming.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_targets")]
    pub targets: Vec<FileTarget>,

    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub git: GitConfig,
}

fn default_output_dir() -> String {
    "docs".to_string()
}

fn default_publish_dir() -> String {
    "doc".to_string()
}

fn default_analyze_command() -> String {
    "flutter analyze --no-pub --no-current-package lib".to_string()
}

fn default_generate_command() -> String {
    "dartdoc --output {output}".to_string()
}

/// Configuration for documentation generation.
///
/// `generate_command` may reference the output directory through `{output}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DocsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory name the package manager expects documentation under
    #[serde(default = "default_publish_dir")]
    pub publish_dir: String,

    #[serde(default = "default_analyze_command")]
    pub analyze_command: String,

    #[serde(default = "default_generate_command")]
    pub generate_command: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        DocsConfig {
            output_dir: default_output_dir(),
            publish_dir: default_publish_dir(),
            analyze_command: default_analyze_command(),
            generate_command: default_generate_command(),
        }
    }
}

impl DocsConfig {
    pub fn analyze_spec(&self) -> Result<CommandSpec> {
        CommandSpec::parse(&self.analyze_command)
    }

    pub fn generate_spec(&self) -> Result<CommandSpec> {
        CommandSpec::parse(&self.generate_command.replace("{output}", &self.output_dir))
    }
}

fn default_dry_run_command() -> String {
    "dart pub publish --dry-run".to_string()
}

/// Configuration for the publish dry run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PublishConfig {
    #[serde(default = "default_dry_run_command")]
    pub dry_run_command: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig {
            dry_run_command: default_dry_run_command(),
        }
    }
}

impl PublishConfig {
    pub fn dry_run_spec(&self) -> Result<CommandSpec> {
        CommandSpec::parse(&self.dry_run_command)
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_pattern() -> VersionPattern {
    VersionPattern::new("v{version}")
}

fn default_tag_message() -> VersionPattern {
    VersionPattern::new("version {version}")
}

fn default_bump_commit_message() -> VersionPattern {
    VersionPattern::new("Version {version}")
}

fn default_docs_commit_message() -> String {
    "Update docs".to_string()
}

/// Configuration for commits, tags and pushes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: VersionPattern,

    #[serde(default = "default_tag_message")]
    pub tag_message: VersionPattern,

    #[serde(default = "default_bump_commit_message")]
    pub bump_commit_message: VersionPattern,

    #[serde(default = "default_docs_commit_message")]
    pub docs_commit_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            tag_pattern: default_tag_pattern(),
            tag_message: default_tag_message(),
            bump_commit_message: default_bump_commit_message(),
            docs_commit_message: default_docs_commit_message(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            targets: default_targets(),
            docs: DocsConfig::default(),
            publish: PublishConfig::default(),
            git: GitConfig::default(),
        }
    }
}

impl Config {
    /// Checks patterns, directory names and command strings.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(ReleaseError::config("At least one target file is required"));
        }

        for target in &self.targets {
            target.pattern.validate()?;
        }

        self.git.tag_pattern.validate()?;
        self.git.tag_message.validate()?;
        self.git.bump_commit_message.validate()?;

        if self.git.remote.trim().is_empty() {
            return Err(ReleaseError::config("Remote name must not be empty"));
        }

        if self.docs.output_dir.trim().is_empty() || self.docs.publish_dir.trim().is_empty() {
            return Err(ReleaseError::config("Docs directories must not be empty"));
        }

        if self.docs.output_dir == self.docs.publish_dir {
            return Err(ReleaseError::config(format!(
                "Docs output_dir and publish_dir are both '{}'",
                self.docs.output_dir
            )));
        }

        self.docs.analyze_spec()?;
        self.docs.generate_spec()?;
        self.publish.dry_run_spec()?;

        Ok(())
    }

    /// External commands the release runs, in execution order
    pub fn command_specs(&self, include_publish: bool) -> Result<Vec<CommandSpec>> {
        let mut specs = vec![self.docs.analyze_spec()?, self.docs.generate_spec()?];
        if include_publish {
            specs.push(self.publish.dry_run_spec()?);
        }
        Ok(specs)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in the repository root
/// 3. `.flutter-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// The loaded configuration is validated before it is returned.
pub fn load_config(config_path: Option<&Path>, repo_root: &Path) -> Result<Config> {
    let local = repo_root.join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        Some(read_config_file(path)?)
    } else if local.exists() {
        Some(read_config_file(&local)?)
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(USER_CONFIG_FILE_NAME);
        if user_path.exists() {
            Some(read_config_file(&user_path)?)
        } else {
            None
        }
    } else {
        None
    };

    let config = match config_str {
        Some(s) => parse_config(&s)?,
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}

/// Parse a TOML configuration string, filling unset fields with defaults.
pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).map_err(|e| ReleaseError::config(format!("Invalid config: {}", e)))
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("Cannot read config {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.targets.len(), 4);
        assert_eq!(config.git.remote, "origin");
        assert_eq!(config.docs.output_dir, "docs");
        assert_eq!(config.docs.publish_dir, "doc");
    }

    #[test]
    fn test_generate_spec_substitutes_output_dir() {
        let mut config = Config::default();
        config.docs.output_dir = "site".to_string();
        let spec = config.docs.generate_spec().unwrap();
        assert_eq!(spec.program, "dartdoc");
        assert_eq!(spec.args, vec!["--output".to_string(), "site".to_string()]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
[git]
remote = "upstream"
"#,
        )
        .unwrap();
        assert_eq!(config.git.remote, "upstream");
        assert_eq!(config.git.tag_pattern, VersionPattern::new("v{version}"));
        assert_eq!(config.targets, default_targets());
    }

    #[test]
    fn test_validate_rejects_same_docs_dirs() {
        let mut config = Config::default();
        config.docs.publish_dir = "docs".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_pattern_without_placeholder() {
        let mut config = Config::default();
        config.targets.push(FileTarget::new("README.md", "version"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_messages_without_placeholder() {
        let mut config = Config::default();
        config.git.tag_message = VersionPattern::new("release");
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.git.bump_commit_message = VersionPattern::new("Version {version} ({version})");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_command_specs_follow_publish_switch() {
        let config = Config::default();
        let programs = |publish| -> Vec<String> {
            config
                .command_specs(publish)
                .unwrap()
                .into_iter()
                .map(|spec| spec.program)
                .collect()
        };
        assert_eq!(programs(true), vec!["flutter", "dartdoc", "dart"]);
        assert_eq!(programs(false), vec!["flutter", "dartdoc"]);
    }

    #[test]
    fn test_validate_rejects_empty_command() {
        let mut config = Config::default();
        config.publish.dry_run_command = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_config("targets = 3").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
