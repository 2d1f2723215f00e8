//! Version substitution across the version-bearing files.
//!
//! Edits are planned fully in memory first. Only when every target contains
//! its old version substring is anything written, so a stale or already
//! bumped file leaves the whole tree untouched.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::{FileTarget, ReleaseContext, VersionToken};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// One pattern substituted within a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub before: String,
    pub after: String,
    pub occurrences: usize,
}

/// A validated, not yet written, edit of one file
///
/// Several targets may name the same file; their replacements are applied in
/// order to the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    /// Path relative to the repository root
    pub relative: PathBuf,
    /// Absolute path written to
    pub path: PathBuf,
    pub original: String,
    pub updated: String,
    pub replacements: Vec<Replacement>,
}

impl FileEdit {
    fn read(ctx: &ReleaseContext, relative: &Path) -> Result<Self> {
        let path = ctx.resolve(relative);
        let original = fs::read_to_string(&path).map_err(|e| {
            ReleaseError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read {}: {}", path.display(), e),
            ))
        })?;

        Ok(FileEdit {
            relative: relative.to_path_buf(),
            path,
            updated: original.clone(),
            original,
            replacements: Vec::new(),
        })
    }

    /// Substitute one target's pattern into the buffer as edited so far.
    fn substitute(&mut self, target: &FileTarget, token: &VersionToken) -> Result<()> {
        let (before, after) = target.substrings(token);
        let (updated, occurrences) = replace_version(&self.updated, &before, &after)
            .ok_or_else(|| ReleaseError::precondition(&target.path, before.clone()))?;

        self.updated = updated;
        self.replacements.push(Replacement {
            before,
            after,
            occurrences,
        });
        Ok(())
    }

    /// Total occurrences replaced across all patterns
    pub fn occurrences(&self) -> usize {
        self.replacements.iter().map(|r| r.occurrences).sum()
    }
}

/// Outcome of the bump stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpReport {
    pub files: Vec<(PathBuf, usize)>,
    pub commit: Option<String>,
}

/// Replace every occurrence of `old` in `content`.
///
/// Returns `None` when `old` does not occur, otherwise the updated text and
/// the number of replaced occurrences.
pub fn replace_version(content: &str, old: &str, new: &str) -> Option<(String, usize)> {
    let occurrences = content.matches(old).count();
    if old.is_empty() || occurrences == 0 {
        return None;
    }
    Some((content.replace(old, new), occurrences))
}

/// Plan one edit per distinct file, failing on the first missing substring.
///
/// Edits keep the order in which their file first appears in `targets`.
pub fn plan(ctx: &ReleaseContext, targets: &[FileTarget]) -> Result<Vec<FileEdit>> {
    let mut edits: Vec<FileEdit> = Vec::new();

    for target in targets {
        let index = match edits.iter().position(|e| e.relative == target.path) {
            Some(index) => index,
            None => {
                edits.push(FileEdit::read(ctx, &target.path)?);
                edits.len() - 1
            }
        };
        edits[index].substitute(target, &ctx.token)?;
    }

    Ok(edits)
}

/// Write back the original content of `edits`, returning the paths that
/// could not be restored.
fn restore_originals(edits: &[FileEdit]) -> Vec<PathBuf> {
    let mut failed = Vec::new();
    for edit in edits {
        if let Err(e) = fs::write(&edit.path, &edit.original) {
            crate::ui::display_error(&format!(
                "Could not restore {}: {}",
                edit.path.display(),
                e
            ));
            failed.push(edit.path.clone());
        }
    }
    failed
}

/// Write all planned edits.
///
/// If any write fails, files already written are restored to their original
/// content before the error is returned. Files that could not be restored
/// are named in the error.
pub fn apply(edits: &[FileEdit]) -> Result<()> {
    for (i, edit) in edits.iter().enumerate() {
        if let Err(e) = fs::write(&edit.path, &edit.updated) {
            let mut message = format!("cannot write {}: {}", edit.path.display(), e);
            let unrestored = restore_originals(&edits[..i]);
            if !unrestored.is_empty() {
                let names: Vec<String> =
                    unrestored.iter().map(|p| p.display().to_string()).collect();
                message.push_str(&format!("; left modified: {}", names.join(", ")));
            }
            return Err(ReleaseError::Io(std::io::Error::new(e.kind(), message)));
        }
    }
    Ok(())
}

/// Plan, apply, stage and commit the version bump, then push if asked.
pub fn bump_versions(
    ctx: &ReleaseContext,
    config: &Config,
    repo: &dyn Repository,
    push: bool,
) -> Result<BumpReport> {
    let edits = plan(ctx, &config.targets)?;
    apply(&edits)?;

    let paths: Vec<&Path> = edits.iter().map(|e| e.relative.as_path()).collect();
    repo.stage_paths(&paths)?;

    let message = config.git.bump_commit_message.render(ctx.new_version());
    let commit = repo.commit(&message)?;

    if push {
        repo.push_current_branch(&config.git.remote)?;
    }

    Ok(BumpReport {
        files: edits
            .iter()
            .map(|e| (e.relative.clone(), e.occurrences()))
            .collect(),
        commit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(root: &Path, old: &str, new: &str) -> ReleaseContext {
        ReleaseContext::new(VersionToken::new(old, new).unwrap(), root)
    }

    #[test]
    fn test_replace_version_all_occurrences() {
        let (text, count) = replace_version("a 1.0 b 1.0", "1.0", "1.1").unwrap();
        assert_eq!(text, "a 1.1 b 1.1");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_replace_version_absent() {
        assert!(replace_version("version: 1.2.1", "version: 1.2.0", "version: 1.2.2").is_none());
    }

    #[test]
    fn test_replace_version_is_quote_sensitive() {
        let content = r#"s.version = "1.2.0""#;
        assert!(replace_version(content, "= '1.2.0'", "= '1.2.1'").is_none());
    }

    #[test]
    fn test_plan_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pubspec.yaml"), "version: 1.2.0\n").unwrap();
        let targets = vec![FileTarget::new("pubspec.yaml", "version: {version}")];

        let edits = plan(&ctx(dir.path(), "1.2.0", "1.2.1"), &targets).unwrap();
        assert_eq!(edits[0].updated, "version: 1.2.1\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("pubspec.yaml")).unwrap(),
            "version: 1.2.0\n"
        );
    }

    #[test]
    fn test_plan_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let targets = vec![FileTarget::new("pubspec.yaml", "version: {version}")];
        let err = plan(&ctx(dir.path(), "1.2.0", "1.2.1"), &targets).unwrap_err();
        assert!(matches!(err, ReleaseError::Io(_)));
        assert!(err.to_string().contains("pubspec.yaml"));
    }

    #[test]
    fn test_apply_then_reapply_fails_precondition() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pubspec.yaml"), "version: 1.2.0\n").unwrap();
        let targets = vec![FileTarget::new("pubspec.yaml", "version: {version}")];
        let ctx = ctx(dir.path(), "1.2.0", "1.2.1");

        apply(&plan(&ctx, &targets).unwrap()).unwrap();
        let err = plan(&ctx, &targets).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_restore_reports_unwritable_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pubspec.yaml"), "version: 1.2.0\n").unwrap();
        let targets = vec![FileTarget::new("pubspec.yaml", "version: {version}")];
        let mut edits = plan(&ctx(dir.path(), "1.2.0", "1.2.1"), &targets).unwrap();

        // a directory can never be written as a file
        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        let mut unwritable = edits[0].clone();
        unwritable.path = blocked.clone();
        edits.push(unwritable);

        assert_eq!(restore_originals(&edits), vec![blocked]);
        assert_eq!(
            fs::read_to_string(dir.path().join("pubspec.yaml")).unwrap(),
            "version: 1.2.0\n"
        );
    }

    #[test]
    fn test_failed_write_restores_written_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pubspec.yaml"), "version: 1.2.0\n").unwrap();
        let targets = vec![FileTarget::new("pubspec.yaml", "version: {version}")];
        let mut edits = plan(&ctx(dir.path(), "1.2.0", "1.2.1"), &targets).unwrap();

        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        let mut unwritable = edits[0].clone();
        unwritable.path = blocked;
        edits.push(unwritable);

        let err = apply(&edits).unwrap_err();
        assert!(err.to_string().contains("blocked"));
        assert!(!err.to_string().contains("left modified"));
        assert_eq!(
            fs::read_to_string(dir.path().join("pubspec.yaml")).unwrap(),
            "version: 1.2.0\n"
        );
    }

    #[test]
    fn test_targets_sharing_a_file_produce_one_edit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pubspec.yaml"), "version: 1.2.0\n# 1.2.0\n").unwrap();
        let targets = vec![
            FileTarget::new("pubspec.yaml", "version: {version}"),
            FileTarget::new("pubspec.yaml", "# {version}"),
        ];

        let edits = plan(&ctx(dir.path(), "1.2.0", "1.2.1"), &targets).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].updated, "version: 1.2.1\n# 1.2.1\n");
        assert_eq!(edits[0].replacements.len(), 2);
        assert_eq!(edits[0].occurrences(), 2);
    }
}
