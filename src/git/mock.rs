use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// A git operation recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOp {
    Stage(Vec<String>),
    Commit(String),
    Tag { name: String, message: String },
    PushBranch(String),
    PushTags { remote: String, tags: Vec<String> },
}

/// Mock repository for testing without actual git operations
#[derive(Default)]
pub struct MockRepository {
    ops: RefCell<Vec<GitOp>>,
    tags: RefCell<HashSet<String>>,
    dirty: Vec<String>,
    reject_push: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an existing tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.get_mut().insert(name.into());
    }

    /// Report these paths as having uncommitted changes
    pub fn set_dirty(&mut self, paths: Vec<String>) {
        self.dirty = paths;
    }

    /// Make every push fail with a remote error
    pub fn reject_pushes(&mut self) {
        self.reject_push = true;
    }

    /// Operations performed so far, in order
    pub fn ops(&self) -> Vec<GitOp> {
        self.ops.borrow().clone()
    }

    fn record(&self, op: GitOp) {
        self.ops.borrow_mut().push(op);
    }
}

impl Repository for MockRepository {
    fn stage_paths(&self, paths: &[&Path]) -> Result<()> {
        self.record(GitOp::Stage(
            paths.iter().map(|p| p.display().to_string()).collect(),
        ));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<Option<String>> {
        self.record(GitOp::Commit(message.to_string()));
        Ok(Some(format!("{:040x}", self.ops.borrow().len())))
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().contains(name))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if !self.tags.borrow_mut().insert(name.to_string()) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        self.record(GitOp::Tag {
            name: name.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn push_current_branch(&self, remote: &str) -> Result<()> {
        if self.reject_push {
            return Err(ReleaseError::remote(format!("Push to '{}' rejected", remote)));
        }
        self.record(GitOp::PushBranch(remote.to_string()));
        Ok(())
    }

    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()> {
        if self.reject_push {
            return Err(ReleaseError::remote(format!("Push to '{}' rejected", remote)));
        }
        self.record(GitOp::PushTags {
            remote: remote.to_string(),
            tags: tag_names.iter().map(|t| t.to_string()).collect(),
        });
        Ok(())
    }

    fn dirty_paths(&self) -> Result<Vec<String>> {
        Ok(self.dirty.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_records_operations() {
        let repo = MockRepository::new();
        repo.stage_paths(&[Path::new("pubspec.yaml")]).unwrap();
        repo.commit("Version 1.0.1").unwrap();
        repo.push_current_branch("origin").unwrap();

        assert_eq!(
            repo.ops(),
            vec![
                GitOp::Stage(vec!["pubspec.yaml".to_string()]),
                GitOp::Commit("Version 1.0.1".to_string()),
                GitOp::PushBranch("origin".to_string()),
            ]
        );
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0");

        assert!(repo.tag_exists("v1.0.0").unwrap());
        assert!(!repo.tag_exists("v2.0.0").unwrap());
        assert!(repo.create_annotated_tag("v1.0.0", "version 1.0.0").is_err());
        assert!(repo.create_annotated_tag("v2.0.0", "version 2.0.0").is_ok());
        assert!(repo.tag_exists("v2.0.0").unwrap());
    }

    #[test]
    fn test_mock_repository_rejected_push() {
        let mut repo = MockRepository::new();
        repo.reject_pushes();
        assert!(repo.push_current_branch("origin").is_err());
        assert!(repo.push_tags("origin", &["v1.0.0"]).is_err());
        assert!(repo.ops().is_empty());
    }
}
