//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release performs: staging, committing, annotated tagging and pushing.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Release stages depend on the [Repository] trait rather than on a concrete
//! implementation.

pub mod mock;
pub mod repository;

pub use mock::{GitOp, MockRepository};
pub use repository::Git2Repository;

use std::path::Path;

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// `git2::Error` and push rejections to [crate::error::ReleaseError] variants.
pub trait Repository {
    /// Stage files or directories (relative to the work tree), including deletions
    fn stage_paths(&self, paths: &[&Path]) -> Result<()>;

    /// Commit the index on top of HEAD.
    ///
    /// # Returns
    /// * `Ok(Some(hash))` - The new commit id
    /// * `Ok(None)` - The index matches HEAD, nothing was committed
    fn commit(&self, message: &str) -> Result<Option<String>>;

    /// Whether a tag with this exact name exists locally
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Create an annotated tag on HEAD. Fails if the tag already exists.
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push the currently checked-out branch to `remote`
    fn push_current_branch(&self, remote: &str) -> Result<()>;

    /// Push the given tags to `remote`
    fn push_tags(&self, remote: &str, tag_names: &[&str]) -> Result<()>;

    /// Paths with uncommitted changes (ignored files excluded)
    fn dirty_paths(&self) -> Result<Vec<String>>;
}
