use std::fmt;

/// Conditions worth telling the user about that do not stop a release on
/// their own. Interactive runs ask for confirmation before continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryWarning {
    /// The working tree has uncommitted changes that are not part of the release
    DirtyWorkingTree { paths: Vec<String> },
    /// Both versions are semver and the new one does not sort after the old one
    VersionNotIncreasing { old: String, new: String },
    /// No docs directory existed when the publish dry run started
    DocsDirectoryMissing { dir: String },
}

impl BoundaryWarning {
    /// Whether the user should confirm before the release continues
    pub fn needs_confirmation(&self) -> bool {
        !matches!(self, BoundaryWarning::DocsDirectoryMissing { .. })
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::DirtyWorkingTree { paths } => {
                let shown: Vec<&str> = paths.iter().take(5).map(String::as_str).collect();
                write!(
                    f,
                    "Working tree has {} uncommitted change(s): {}",
                    paths.len(),
                    shown.join(", ")
                )?;
                if paths.len() > shown.len() {
                    write!(f, ", ...")?;
                }
                Ok(())
            }
            BoundaryWarning::VersionNotIncreasing { old, new } => {
                write!(f, "New version '{}' is not greater than '{}'", new, old)
            }
            BoundaryWarning::DocsDirectoryMissing { dir } => {
                write!(
                    f,
                    "Docs directory '{}' not found, dry run used without docs",
                    dir
                )
            }
        }
    }
}
